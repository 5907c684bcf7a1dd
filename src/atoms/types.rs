// ── Relay Atoms: Data Types ────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

/// One gesture sample: the angular change, in degrees, since the previous
/// pointer-move the browser reported.
///
/// Lives only as long as it takes the action sink to consume it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationEvent {
    pub rotation: f64,
}

impl RotationEvent {
    pub fn new(rotation: f64) -> Self {
        RotationEvent { rotation }
    }
}

/// Which action sink a server is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// Turn each rotation into a host scroll-wheel event.
    #[default]
    Scroll,
    /// Send every frame back verbatim and log the decoded value.
    Echo,
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Scroll => "scroll",
            SinkKind::Echo => "echo",
        }
    }
}

impl std::fmt::Display for SinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SinkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scroll" => Ok(SinkKind::Scroll),
            "echo" => Ok(SinkKind::Echo),
            other => Err(format!("unknown sink '{}' (expected 'scroll' or 'echo')", other)),
        }
    }
}
