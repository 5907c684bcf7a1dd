// Relay Engine — Payload Decoder
//
// Socket frames carry `{"rotation": <float>}`; the rotate endpoint carries
// the bare decimal. Both end up as a `RotationEvent` or a `Decode` error.

use crate::atoms::error::{RelayError, RelayResult};
use crate::atoms::types::RotationEvent;

/// Decode one socket frame. Unknown extra keys are ignored.
pub fn decode(bytes: &[u8]) -> RelayResult<RotationEvent> {
    let event: RotationEvent =
        serde_json::from_slice(bytes).map_err(|e| RelayError::decode(e.to_string()))?;
    ensure_finite(event)
}

/// Decode a `POST /rotate` body such as `45.0`.
pub fn parse_rotation_text(text: &str) -> RelayResult<RotationEvent> {
    let trimmed = text.trim();
    let rotation: f64 = trimmed
        .parse()
        .map_err(|e| RelayError::decode(format!("'{}': {}", truncate(trimmed, 32), e)))?;
    ensure_finite(RotationEvent::new(rotation))
}

fn ensure_finite(event: RotationEvent) -> RelayResult<RotationEvent> {
    if event.rotation.is_finite() {
        Ok(event)
    } else {
        Err(RelayError::decode(format!("rotation is not finite: {}", event.rotation)))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}
