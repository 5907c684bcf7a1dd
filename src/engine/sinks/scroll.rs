// Relay Engine — Scroll-Simulating Sink

use super::{ActionSink, SinkOutcome};
use crate::atoms::types::{RotationEvent, SinkKind};
use crate::engine::input::InputSink;
use log::{debug, warn};
use std::sync::Arc;

/// Wheel units for a rotation: whole degrees (truncated toward zero) times
/// `scale`. Out-of-range values saturate at the `i32` bounds.
pub fn scroll_ticks(rotation: f64, scale: i32) -> i32 {
    // float → int `as` saturates and maps NaN to 0
    let whole = rotation.trunc() as i32;
    whole.saturating_mul(scale)
}

/// Turns each rotation into exactly one host wheel event.
pub struct ScrollSink {
    input: Arc<dyn InputSink>,
    scale: i32,
}

impl ScrollSink {
    pub fn new(input: Arc<dyn InputSink>, scale: i32) -> Self {
        ScrollSink { input, scale }
    }
}

impl ActionSink for ScrollSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Scroll
    }

    fn consume(&self, event: RotationEvent) -> SinkOutcome {
        let ticks = scroll_ticks(event.rotation, self.scale);
        debug!("[sink] rotation {} → {} ticks via {}", event.rotation, ticks, self.input.name());
        if let Err(e) = self.input.emit_scroll(ticks) {
            warn!("[sink] Scroll injection failed: {}", e);
        }
        SinkOutcome::Consumed
    }
}
