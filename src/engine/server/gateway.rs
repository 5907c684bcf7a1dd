// Relay Engine — Socket Gateway
//
// One read loop per upgraded connection. Frames are decoded one at a time
// and handed to the action sink; nothing carries over between frames.

use super::Shared;
use crate::atoms::error::RelayResult;
use crate::engine::decoder;
use crate::engine::sinks::SinkOutcome;
use futures::stream::StreamExt;
use futures::SinkExt;
use log::{debug, info, warn};
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_tungstenite::tungstenite::Message as WsMessage;

/// Decode one frame payload and run the sink. `None` means the payload was
/// malformed and has been logged.
pub(crate) fn dispatch_frame(shared: &Shared, payload: &[u8], peer: SocketAddr) -> Option<SinkOutcome> {
    shared.stats.messages.fetch_add(1, Ordering::Relaxed);
    match decoder::decode(payload) {
        Ok(event) => Some(shared.sink.consume(event)),
        Err(e) => {
            shared.stats.decode_failures.fetch_add(1, Ordering::Relaxed);
            warn!("[gateway] Dropping frame from {}: {}", peer, e);
            None
        }
    }
}

pub(crate) async fn handle_websocket<S: AsyncRead + AsyncWrite + Unpin>(
    stream: S,
    peer: SocketAddr,
    shared: Arc<Shared>,
) -> RelayResult<()> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let idle_timeout = shared.config.idle_timeout();

    info!("[gateway] WebSocket client connected from {}", peer);

    loop {
        let next = match idle_timeout {
            Some(limit) => match tokio::time::timeout(limit, ws_receiver.next()).await {
                Ok(next) => next,
                Err(_) => {
                    info!("[gateway] {} idle for {:?}, closing", peer, limit);
                    let _ = ws_sender.send(WsMessage::Close(None)).await;
                    break;
                }
            },
            None => ws_receiver.next().await,
        };

        let msg = match next {
            Some(Ok(m)) => m,
            Some(Err(e)) => {
                warn!("[gateway] Read error from {}: {}", peer, e);
                break;
            }
            None => break,
        };

        let outcome = match &msg {
            WsMessage::Text(text) => dispatch_frame(&shared, text.as_bytes(), peer),
            WsMessage::Binary(data) => dispatch_frame(&shared, data, peer),
            WsMessage::Ping(data) => {
                if ws_sender.send(WsMessage::Pong(data.clone())).await.is_err() {
                    break;
                }
                continue;
            }
            WsMessage::Close(_) => {
                debug!("[gateway] Close frame from {}", peer);
                break;
            }
            _ => continue,
        };

        if outcome == Some(SinkOutcome::Echo) {
            if let Err(e) = ws_sender.send(msg).await {
                warn!("[gateway] Write error to {}: {}", peer, e);
                break;
            }
        }
    }

    info!("[gateway] {} disconnected", peer);
    Ok(())
}
