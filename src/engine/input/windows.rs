// Relay Engine — Win32 wheel injection

use super::InputSink;
use crate::atoms::error::RelayResult;
use windows::Win32::UI::Input::KeyboardAndMouse::{mouse_event, MOUSEEVENTF_WHEEL};

/// Posts `MOUSEEVENTF_WHEEL` through `mouse_event`; `ticks` goes into
/// `dwData` as a signed wheel delta.
pub(super) struct WindowsWheel;

impl InputSink for WindowsWheel {
    fn name(&self) -> &'static str {
        "win32"
    }

    fn emit_scroll(&self, ticks: i32) -> RelayResult<()> {
        // SAFETY: plain integer arguments, no pointers.
        unsafe { mouse_event(MOUSEEVENTF_WHEEL, 0, 0, ticks, 0) };
        Ok(())
    }
}
