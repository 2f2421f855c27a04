/// Host-side commands a key binding can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    SwipeUp,
    SwipeDown,
    Button,
    /// Simulated tap on a visible list row.
    SelectRow(u8),
    SwitchApp,
    Exit,
}
