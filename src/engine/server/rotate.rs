// Relay Engine — Rotate Endpoint
//
//   OPTIONS /rotate → 200, CORS headers only
//   POST    /rotate → body is a bare decimal ("45.0"); always 200
//   other           → 405
//
// A body that does not parse is logged and dropped; the caller still gets
// 200 and no indication of the failure.

use super::http::{write_response, write_text, HttpRequest};
use super::Shared;
use crate::atoms::constants::{CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN};
use crate::atoms::error::RelayResult;
use crate::engine::decoder::parse_rotation_text;
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use tokio::io::AsyncWrite;

const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", CORS_ALLOW_ORIGIN),
    ("Access-Control-Allow-Methods", CORS_ALLOW_METHODS),
    ("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS),
];

pub(crate) async fn handle_rotate<S: AsyncWrite + Unpin>(
    stream: &mut S,
    request: &HttpRequest,
    peer: SocketAddr,
    shared: &Shared,
) -> RelayResult<()> {
    match request.method.as_str() {
        "OPTIONS" => write_response(stream, 200, &CORS_HEADERS, b"").await,
        "POST" => {
            shared.stats.messages.fetch_add(1, Ordering::Relaxed);
            let body = String::from_utf8_lossy(&request.body);
            match parse_rotation_text(&body) {
                Ok(event) => {
                    info!("[rotate] {} from {}", event.rotation, peer);
                    // no frame to echo over plain HTTP
                    let _ = shared.sink.consume(event);
                }
                Err(e) => {
                    shared.stats.decode_failures.fetch_add(1, Ordering::Relaxed);
                    warn!("[rotate] Ignoring body from {}: {}", peer, e);
                }
            }
            write_response(stream, 200, &CORS_HEADERS, b"").await
        }
        _ => write_text(stream, 405, "Method not allowed").await,
    }
}
