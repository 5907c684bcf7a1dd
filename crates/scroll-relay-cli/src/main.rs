// scroll-relay — command-line launcher
//
//   scroll-relay                     scroll preset on 127.0.0.1:6610
//   scroll-relay --sink echo         echo preset on 127.0.0.1:8080
//   scroll-relay -c relay.toml -p 0  file settings, ephemeral port

use clap::Parser;
use log::{error, info};
use scroll_relay::{build_sink, RelayConfig, RelayResult, RelayServer, SinkKind};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "scroll-relay", version, about = "Turn a browser dial into host scroll-wheel input")]
struct Cli {
    /// TOML config file; flags below override its values
    #[arg(short, long, env = "SCROLL_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Action sink: "scroll" injects wheel events, "echo" echoes and logs
    #[arg(short, long, env = "SCROLL_RELAY_SINK")]
    sink: Option<SinkKind>,

    /// Address to bind
    #[arg(short, long, env = "SCROLL_RELAY_BIND")]
    bind: Option<String>,

    /// Port to listen on (0 = ephemeral)
    #[arg(short, long, env = "SCROLL_RELAY_PORT")]
    port: Option<u16>,

    /// Wheel units per whole degree
    #[arg(long, env = "SCROLL_RELAY_SCALE", allow_negative_numbers = true)]
    scale: Option<i32>,

    /// Serve POST /rotate with CORS
    #[arg(long, overrides_with = "no_rotate_endpoint")]
    rotate_endpoint: bool,

    /// Do not serve /rotate
    #[arg(long, overrides_with = "rotate_endpoint")]
    no_rotate_endpoint: bool,

    /// Close sockets silent for this many seconds
    #[arg(long, value_name = "SECS")]
    idle_timeout: Option<u64>,

    /// Log scroll ticks instead of injecting them
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn into_config(self) -> RelayResult<RelayConfig> {
        let mut config = RelayConfig::load(self.config.as_deref(), self.sink)?;
        if let Some(v) = self.bind { config.bind_address = v; }
        if let Some(v) = self.port { config.port = v; }
        if let Some(v) = self.scale { config.scroll_scale = v; }
        if self.rotate_endpoint { config.rotate_endpoint = true; }
        if self.no_rotate_endpoint { config.rotate_endpoint = false; }
        if let Some(v) = self.idle_timeout { config.idle_timeout_secs = Some(v); }
        if self.dry_run { config.dry_run = true; }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match Cli::parse().into_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };

    if config.sink == SinkKind::Scroll && config.dry_run {
        info!("[cli] Dry run: scroll ticks will be logged, not injected");
    }

    let sink = build_sink(&config);
    let server = match RelayServer::bind(config, sink).await {
        Ok(s) => s,
        Err(e) => {
            error!("[server] {}", e);
            std::process::exit(1);
        }
    };

    let stop = server.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop.stop();
        }
    });

    if let Err(e) = server.run().await {
        error!("[server] {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_scroll_preset() {
        let cli = Cli::try_parse_from(["scroll-relay"]).unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.sink, SinkKind::Scroll);
        assert_eq!(config.port, 6610);
        assert!(!config.rotate_endpoint);
    }

    #[test]
    fn test_echo_flags_override_preset() {
        let cli = Cli::try_parse_from([
            "scroll-relay", "--sink", "echo", "--port", "0", "--no-rotate-endpoint", "--scale", "-60",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.sink, SinkKind::Echo);
        assert_eq!(config.port, 0);
        assert!(!config.rotate_endpoint);
        assert_eq!(config.scroll_scale, -60);
    }

    #[test]
    fn test_rejects_unknown_sink() {
        assert!(Cli::try_parse_from(["scroll-relay", "--sink", "wheel"]).is_err());
    }

    #[test]
    fn test_zero_scale_is_config_error() {
        let cli = Cli::try_parse_from(["scroll-relay", "--scale", "0"]).unwrap();
        assert!(cli.into_config().is_err());
    }
}
