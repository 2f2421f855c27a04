use std::ops::BitOr;
use std::path::Path;

use crate::config::Theme;

/// Native color format of the display, 16bpp RGB565.
pub type Rgb565 = u16;

/// Wall-clock snapshot as delivered by the host RTC.
///
/// The weekday numbering is the host's; the grid engine only requires that it
/// is stable, since column `k` of the layout always holds weekday `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTime {
    pub year: i32,
    /// Calendar month, 1 (January) to 12 (December).
    pub month: u32,
    /// Day of month, 1-31.
    pub day: u32,
    /// Day of week, 0-6.
    pub weekday: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Sans18,
    Sans24,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    Up,
    Down,
}

/// Input events forwarded to the foregrounded application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Swipe(SwipeDirection),
    Button(bool),
    Touch { x: u32, y: u32 },
    Tick,
}

/// Set of event classes an application subscribes to on `foreground`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EventMask(u8);

impl EventMask {
    pub const NONE: EventMask = EventMask(0);
    pub const SWIPE_UPDOWN: EventMask = EventMask(1);
    pub const BUTTON: EventMask = EventMask(1 << 1);
    pub const TOUCH: EventMask = EventMask(1 << 2);

    pub fn contains(&self, other: EventMask) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 | rhs.0)
    }
}

pub trait ClockSource {
    fn localtime(&self) -> LocalTime;
}

/// Drawing primitives supplied by the host framework.
///
/// Coordinates are display pixels; `string` renders into a fixed-width field
/// so callers can lay out columns without measuring glyphs.
pub trait DisplaySurface {
    /// Clear from row `from_y` to the bottom of the display.
    fn fill(&mut self, color: Rgb565, from_y: u32);
    fn set_font(&mut self, font: Font);
    fn set_color(&mut self, fg: Rgb565);
    fn set_color_with_bg(&mut self, fg: Rgb565, bg: Rgb565);
    fn string(&mut self, text: &str, x: u32, y: u32, width: u32);
}

/// Everything an application may ask of the host while foregrounded.
pub trait HostContext {
    fn localtime(&self) -> LocalTime;
    fn display(&mut self) -> &mut dyn DisplaySurface;
    fn theme(&self) -> Theme;
    fn request_events(&mut self, mask: EventMask);
    fn request_tick(&mut self, period_ms: u32);
    /// Short haptic pulse, used as feedback on input that has no effect.
    fn vibrate(&mut self);
    /// Ask the host to foreground the next application.
    fn switch_app(&mut self);
    /// Root directory for application-private persistent files.
    fn data_dir(&self) -> &Path;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_mask_combines() {
        let mask = EventMask::SWIPE_UPDOWN | EventMask::TOUCH;

        assert!(mask.contains(EventMask::SWIPE_UPDOWN));
        assert!(mask.contains(EventMask::TOUCH));
        assert!(!mask.contains(EventMask::BUTTON));
        assert!(mask.contains(EventMask::NONE));
    }
}
