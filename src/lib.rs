//! Relays drag-rotation gestures from a browser page to host scroll-wheel
//! input.
//!
//! A [`RelayServer`] serves the dial page, accepts WebSocket frames of the
//! form `{"rotation": <degrees>}` and hands each decoded [`RotationEvent`]
//! to an [`ActionSink`]: [`ScrollSink`] injects a wheel event through an
//! [`InputSink`], [`EchoSink`] logs the value and echoes the frame.

pub mod atoms;
pub mod engine;

pub use atoms::error::{RelayError, RelayResult};
pub use atoms::types::{RotationEvent, SinkKind};
pub use engine::config::RelayConfig;
pub use engine::input::{platform_input, InputSink, LogInput};
pub use engine::server::{RelayServer, RelayStats, StatsSnapshot, StopHandle};
pub use engine::sinks::{build_sink, scroll_ticks, ActionSink, EchoSink, ScrollSink, SinkOutcome};
