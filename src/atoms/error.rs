// ── Relay Atoms: Error Types ───────────────────────────────────────────────
// Single canonical error enum for the relay, built with `thiserror`.
//
//   • Variants are coarse-grained by domain (I/O, decode, HTTP, WebSocket…).
//   • `#[from]` wires std/external error conversions automatically.
//   • Boundaries log these and move on; none is ever sent to a client.

use thiserror::Error;

// ── Primary error enum ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum RelayError {
    /// Socket or OS-level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Inbound payload could not be turned into a rotation event.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Malformed or oversized HTTP request.
    #[error("HTTP error: {0}")]
    Http(String),

    /// WebSocket handshake or framing failure.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Host input injection failed.
    #[error("Input error: {0}")]
    Input(String),

    /// Configuration is invalid or could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catch-all for errors that do not have a dedicated variant.
    #[error("{0}")]
    Other(String),
}

// ── Convenience constructors ───────────────────────────────────────────────

impl RelayError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::Input(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

// ── String → RelayError ────────────────────────────────────────────────────
// Allows `?` on message-only errors built with `format!`.

impl From<String> for RelayError {
    fn from(s: String) -> Self {
        RelayError::Other(s)
    }
}

impl From<&str> for RelayError {
    fn from(s: &str) -> Self {
        RelayError::Other(s.to_string())
    }
}

// ── Convenience alias ──────────────────────────────────────────────────────

pub type RelayResult<T> = Result<T, RelayError>;
