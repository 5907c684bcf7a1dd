// Relay Engine — Configuration
//
// Sources, lowest to highest precedence:
//   1. preset defaults for the selected sink (port 6610 scroll / 8080 echo)
//   2. optional TOML file
//   3. CLI flags and environment variables (applied by the binary)

use crate::atoms::constants::{
    DEFAULT_BIND_ADDRESS, ECHO_DEFAULT_PORT, SCROLL_DEFAULT_PORT, WHEEL_NOTCH,
};
use crate::atoms::error::{RelayError, RelayResult};
use crate::atoms::types::SinkKind;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ── Relay Config ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Address to bind: "127.0.0.1" (local only) or "0.0.0.0" (LAN)
    pub bind_address: String,
    /// 0 asks the OS for an ephemeral port.
    pub port: u16,
    pub sink: SinkKind,
    /// Wheel units emitted per whole degree of rotation.
    pub scroll_scale: i32,
    /// Serve `POST /rotate` + CORS preflight.
    pub rotate_endpoint: bool,
    /// Close sockets that stay silent this long. `None` waits forever.
    #[serde(default)]
    pub idle_timeout_secs: Option<u64>,
    /// Log scroll ticks instead of injecting them into the host.
    #[serde(default)]
    pub dry_run: bool,
}

impl RelayConfig {
    /// Defaults for one deployment flavour.
    pub fn preset(sink: SinkKind) -> Self {
        match sink {
            SinkKind::Scroll => RelayConfig {
                bind_address: DEFAULT_BIND_ADDRESS.into(),
                port: SCROLL_DEFAULT_PORT,
                sink,
                scroll_scale: WHEEL_NOTCH,
                rotate_endpoint: false,
                idle_timeout_secs: None,
                dry_run: false,
            },
            SinkKind::Echo => RelayConfig {
                bind_address: DEFAULT_BIND_ADDRESS.into(),
                port: ECHO_DEFAULT_PORT,
                sink,
                scroll_scale: WHEEL_NOTCH,
                rotate_endpoint: true,
                idle_timeout_secs: None,
                dry_run: false,
            },
        }
    }

    /// Build a config from the preset for `sink_override` (or the file's
    /// `sink`, or scroll) with the TOML file at `path` laid on top.
    pub fn load(path: Option<&Path>, sink_override: Option<SinkKind>) -> RelayResult<Self> {
        let file = match path {
            Some(p) => ConfigFile::read(p)?,
            None => ConfigFile::default(),
        };
        let sink = sink_override.or(file.sink).unwrap_or_default();
        let mut config = RelayConfig::preset(sink);
        file.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RelayResult<()> {
        if self.bind_address.trim().is_empty() {
            return Err(RelayError::config("bind_address must not be empty"));
        }
        if self.scroll_scale == 0 {
            return Err(RelayError::config("scroll_scale must be non-zero"));
        }
        if self.idle_timeout_secs == Some(0) {
            return Err(RelayError::config("idle_timeout_secs must be at least 1"));
        }
        Ok(())
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig::preset(SinkKind::default())
    }
}

// ── TOML overlay ───────────────────────────────────────────────────────

/// On-disk shape: every key optional, unset keys keep the preset value.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    bind_address: Option<String>,
    port: Option<u16>,
    sink: Option<SinkKind>,
    scroll_scale: Option<i32>,
    rotate_endpoint: Option<bool>,
    idle_timeout_secs: Option<u64>,
    dry_run: Option<bool>,
}

impl ConfigFile {
    fn read(path: &Path) -> RelayResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RelayError::config(format!("Read {}: {}", path.display(), e)))?;
        debug!("[config] Loaded {}", path.display());
        Self::parse(&text)
            .map_err(|e| RelayError::config(format!("Parse {}: {}", path.display(), e)))
    }

    fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    fn apply(self, config: &mut RelayConfig) {
        if let Some(v) = self.bind_address { config.bind_address = v; }
        if let Some(v) = self.port { config.port = v; }
        if let Some(v) = self.scroll_scale { config.scroll_scale = v; }
        if let Some(v) = self.rotate_endpoint { config.rotate_endpoint = v; }
        if let Some(v) = self.idle_timeout_secs { config.idle_timeout_secs = Some(v); }
        if let Some(v) = self.dry_run { config.dry_run = v; }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_preset() {
        let config = RelayConfig::preset(SinkKind::Scroll);
        assert_eq!(config.port, 6610);
        assert_eq!(config.scroll_scale, 120);
        assert!(!config.rotate_endpoint);
        assert_eq!(config.addr(), "127.0.0.1:6610");
    }

    #[test]
    fn test_echo_preset() {
        let config = RelayConfig::preset(SinkKind::Echo);
        assert_eq!(config.port, 8080);
        assert!(config.rotate_endpoint);
        assert!(config.idle_timeout().is_none());
    }

    #[test]
    fn test_file_overlays_preset() {
        let file = ConfigFile::parse(
            r#"
            sink = "echo"
            port = 9000
            idle_timeout_secs = 30
            "#,
        )
        .unwrap();
        let sink = file.sink.unwrap_or_default();
        let mut config = RelayConfig::preset(sink);
        file.apply(&mut config);
        assert_eq!(config.sink, SinkKind::Echo);
        assert_eq!(config.port, 9000);
        assert!(config.rotate_endpoint); // kept from echo preset
        assert_eq!(config.idle_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_file_rejects_unknown_keys() {
        assert!(ConfigFile::parse("prot = 1").is_err());
    }

    #[test]
    fn test_load_without_file_uses_override() {
        let config = RelayConfig::load(None, Some(SinkKind::Echo)).unwrap();
        assert_eq!(config, RelayConfig::preset(SinkKind::Echo));
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = RelayConfig::load(Some(Path::new("/nonexistent/relay.toml")), None).unwrap_err();
        assert!(matches!(err, RelayError::Config(_)));
    }

    #[test]
    fn test_validate() {
        let mut config = RelayConfig::default();
        assert!(config.validate().is_ok());
        config.scroll_scale = 0;
        assert!(config.validate().is_err());
        config.scroll_scale = 120;
        config.bind_address = "  ".into();
        assert!(config.validate().is_err());
        config.bind_address = "0.0.0.0".into();
        config.idle_timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }
}
