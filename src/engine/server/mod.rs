// Relay Engine — Server Core
//
// Architecture:
//   - Binds a TCP listener on the configured address (port 0 = ephemeral)
//   - GET /           → serves the dial page
//   - GET /ws         → upgrades to WebSocket, frames go to the action sink
//   - /rotate         → plain-HTTP rotation input + CORS (when enabled)
//   - Any origin is accepted; there is no authentication.
//
// One tokio task per accepted connection. Tasks share only the read-only
// page, the sink and the atomic counters.

mod gateway;
pub(crate) mod http;
mod rotate;
mod stream;

use crate::atoms::constants::{ACCEPT_POLL_MS, ROTATE_PATH, WS_PATH};
use crate::atoms::error::{RelayError, RelayResult};
use crate::engine::config::RelayConfig;
use crate::engine::page::build_page_html;
use crate::engine::sinks::ActionSink;
use self::http::{read_request, write_response, write_text};
use log::{debug, info, warn};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use self::stream::ReplayStream;
use tokio::net::{TcpListener, TcpStream};

// ── Stats ──────────────────────────────────────────────────────────────

/// Per-server counters. Cheap to read at any time from any thread.
#[derive(Debug, Default)]
pub struct RelayStats {
    pub(crate) connections: AtomicU64,
    pub(crate) messages: AtomicU64,
    pub(crate) decode_failures: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Accepted TCP connections, any route.
    pub connections: u64,
    /// Rotation payloads received (socket frames + rotate bodies).
    pub messages: u64,
    /// Payloads that failed to decode and were dropped.
    pub decode_failures: u64,
}

impl RelayStats {
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            connections: self.connections.load(Ordering::Relaxed),
            messages: self.messages.load(Ordering::Relaxed),
            decode_failures: self.decode_failures.load(Ordering::Relaxed),
        }
    }
}

// ── Stop Handle ────────────────────────────────────────────────────────

/// Asks a running server to stop accepting. Open sockets finish on their own.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
        info!("[server] Stop signal sent");
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// ── Shared connection state ────────────────────────────────────────────

pub(crate) struct Shared {
    pub config: RelayConfig,
    pub sink: Arc<dyn ActionSink>,
    pub page: Arc<str>,
    pub stats: Arc<RelayStats>,
}

// ── Server ─────────────────────────────────────────────────────────────

pub struct RelayServer {
    listener: TcpListener,
    shared: Arc<Shared>,
    stop: StopHandle,
}

impl RelayServer {
    /// Bind the listener right away so a taken port fails here, not in `run`.
    pub async fn bind(config: RelayConfig, sink: Arc<dyn ActionSink>) -> RelayResult<Self> {
        config.validate()?;
        if sink.kind() != config.sink {
            warn!("[server] Config says '{}' sink but '{}' was supplied", config.sink, sink.kind());
        }

        let addr = config.addr();
        let listener = TcpListener::bind(&addr).await.map_err(|e| {
            RelayError::Io(std::io::Error::new(e.kind(), format!("Bind {} failed: {}", addr, e)))
        })?;

        if config.bind_address != "127.0.0.1" && config.bind_address != "localhost" {
            warn!("[server] Binding to {}: any host on the network can drive this machine's input", config.bind_address);
        }

        let page: Arc<str> = Arc::from(build_page_html(sink.kind()));
        let shared = Arc::new(Shared {
            config,
            sink,
            page,
            stats: Arc::new(RelayStats::default()),
        });

        Ok(RelayServer {
            listener,
            shared,
            stop: StopHandle(Arc::new(AtomicBool::new(false))),
        })
    }

    pub fn local_addr(&self) -> RelayResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stats(&self) -> Arc<RelayStats> {
        self.shared.stats.clone()
    }

    /// Accept until the stop handle fires.
    pub async fn run(self) -> RelayResult<()> {
        let addr = self.local_addr()?;
        info!(
            "[server] Running on http://{} (sink: {}, rotate endpoint: {})",
            addr,
            self.shared.sink.kind(),
            if self.shared.config.rotate_endpoint { "on" } else { "off" },
        );

        loop {
            if self.stop.is_stopped() { break; }

            // Accept with timeout so we can check the stop flag
            let accept = tokio::time::timeout(
                Duration::from_millis(ACCEPT_POLL_MS),
                self.listener.accept(),
            ).await;

            match accept {
                Ok(Ok((tcp_stream, peer))) => {
                    self.shared.stats.connections.fetch_add(1, Ordering::Relaxed);
                    let shared = self.shared.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(tcp_stream, peer, shared).await {
                            warn!("[server] Connection error from {}: {}", peer, e);
                        }
                    });
                }
                Ok(Err(e)) => {
                    warn!("[server] Accept error: {}", e);
                }
                Err(_) => { /* timeout, loop to check stop flag */ }
            }
        }

        info!("[server] Stopped");
        Ok(())
    }
}

// ── Connection Handler ─────────────────────────────────────────────────

async fn handle_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    shared: Arc<Shared>,
) -> RelayResult<()> {
    let Some(request) = read_request(&mut stream).await? else {
        return Ok(());
    };
    debug!("[server] {} {} from {}", request.method, request.path, peer);

    if request.path == WS_PATH && request.is_websocket_upgrade() {
        // Replay the consumed bytes so tungstenite can read the upgrade
        let replay = ReplayStream::new(request.raw, stream);
        return gateway::handle_websocket(replay, peer, shared).await;
    }

    if request.path == ROTATE_PATH {
        if shared.config.rotate_endpoint {
            return rotate::handle_rotate(&mut stream, &request, peer, &shared).await;
        }
        return write_text(&mut stream, 404, "Not found").await;
    }

    if request.method == "GET" {
        return write_response(
            &mut stream,
            200,
            &[("Content-Type", "text/html; charset=utf-8")],
            shared.page.as_bytes(),
        ).await;
    }

    write_text(&mut stream, 404, "Not found").await
}
