// Relay Engine — Quartz wheel injection

use super::InputSink;
use crate::atoms::error::{RelayError, RelayResult};
use core_graphics::event::{CGEvent, CGEventTapLocation, ScrollEventUnit};
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

/// Posts a single-axis pixel scroll event at the HID tap. Needs the
/// Accessibility permission; without it macOS drops the event silently.
pub(super) struct QuartzWheel;

impl InputSink for QuartzWheel {
    fn name(&self) -> &'static str {
        "quartz"
    }

    fn emit_scroll(&self, ticks: i32) -> RelayResult<()> {
        let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
            .map_err(|_| RelayError::input("CGEventSource unavailable"))?;
        let event = CGEvent::new_scroll_event(source, ScrollEventUnit::PIXEL, 1, ticks, 0, 0)
            .map_err(|_| RelayError::input("CGEventCreateScrollWheelEvent failed"))?;
        event.post(CGEventTapLocation::HID);
        Ok(())
    }
}
