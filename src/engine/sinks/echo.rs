// Relay Engine — Echo/Log Sink

use super::{ActionSink, SinkOutcome};
use crate::atoms::types::{RotationEvent, SinkKind};
use log::info;

/// Logs every rotation and asks for the frame to be echoed back.
#[derive(Debug, Default, Clone, Copy)]
pub struct EchoSink;

impl ActionSink for EchoSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Echo
    }

    fn consume(&self, event: RotationEvent) -> SinkOutcome {
        info!("[sink] Rotation: {}", event.rotation);
        SinkOutcome::Echo
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_sink_always_echoes() {
        for r in [0.0, 45.0, -0.5, 1e9] {
            assert_eq!(EchoSink.consume(RotationEvent::new(r)), SinkOutcome::Echo);
        }
    }
}
