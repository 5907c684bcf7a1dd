// Relay Engine — Host Input
//
// `InputSink` is the one privileged, host-specific operation the relay
// performs: inject a scroll-wheel event. Networking and decoding never see
// anything below this trait.

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

use crate::atoms::error::RelayResult;
use log::info;
use std::sync::Arc;

/// Synthesises scroll-wheel input on the host.
pub trait InputSink: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    /// Emit one wheel event of `ticks` units. Positive scrolls up / away.
    fn emit_scroll(&self, ticks: i32) -> RelayResult<()>;
}

/// Stand-in for hosts without wheel injection, and for `--dry-run`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogInput;

impl InputSink for LogInput {
    fn name(&self) -> &'static str {
        "log"
    }

    fn emit_scroll(&self, ticks: i32) -> RelayResult<()> {
        info!("[input] scroll {} (not injected)", ticks);
        Ok(())
    }
}

/// The wheel injector for the host this binary was built for.
pub fn platform_input() -> Arc<dyn InputSink> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsWheel)
    }
    #[cfg(target_os = "macos")]
    {
        Arc::new(macos::QuartzWheel)
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        log::warn!("[input] No wheel injection on this platform, scroll ticks will only be logged");
        Arc::new(LogInput)
    }
}
