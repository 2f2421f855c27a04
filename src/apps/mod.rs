pub mod month;
pub mod timeto;

use crate::error::Result;
use crate::hal::{Event, HostContext};

/// A foregroundable application.
///
/// `foreground` subscribes to the events the application wants and renders
/// the initial screen; afterwards the host delivers each subscribed event to
/// `handle`, running every handle-and-redraw cycle to completion before the
/// next input.
pub trait App {
    fn name(&self) -> &'static str;
    fn foreground(&mut self, host: &mut dyn HostContext) -> Result<()>;
    fn handle(&mut self, event: Event, host: &mut dyn HostContext) -> Result<()>;
}
