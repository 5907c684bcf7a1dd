// Relay Engine — Action Sinks
//
// A sink consumes each decoded rotation. Which one a server runs is fixed
// when it is built; clients never negotiate it.

mod echo;
mod scroll;

pub use echo::EchoSink;
pub use scroll::{scroll_ticks, ScrollSink};

use crate::atoms::types::{RotationEvent, SinkKind};
use crate::engine::config::RelayConfig;
use crate::engine::input::{platform_input, InputSink, LogInput};
use std::sync::Arc;

/// What the gateway should do with the frame after the sink ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkOutcome {
    /// Nothing goes back to the client.
    Consumed,
    /// Send the original frame back unchanged.
    Echo,
}

pub trait ActionSink: Send + Sync {
    fn kind(&self) -> SinkKind;

    /// Handle one event. Never fails: side-effect errors are logged here.
    fn consume(&self, event: RotationEvent) -> SinkOutcome;
}

/// Build the sink `config` asks for, wired to the host's wheel injector
/// unless `dry_run` is set.
pub fn build_sink(config: &RelayConfig) -> Arc<dyn ActionSink> {
    match config.sink {
        SinkKind::Scroll => {
            let input: Arc<dyn InputSink> = if config.dry_run {
                Arc::new(LogInput)
            } else {
                platform_input()
            };
            Arc::new(ScrollSink::new(input, config.scroll_scale))
        }
        SinkKind::Echo => Arc::new(EchoSink),
    }
}
