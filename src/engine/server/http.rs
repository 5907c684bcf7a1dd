// Relay Engine — Minimal HTTP/1.1
//
// Just enough request parsing to route GET /, the /ws upgrade and /rotate,
// plus a response writer. Every response closes the connection.

use crate::atoms::constants::MAX_REQUEST_BYTES;
use crate::atoms::error::{RelayError, RelayResult};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

// ── Request ────────────────────────────────────────────────────────────

#[derive(Debug)]
pub(crate) struct HttpRequest {
    pub method: String,
    /// Path without the query string.
    pub path: String,
    headers: Vec<(String, String)>,
    /// Body bytes (Content-Length worth, or whatever arrived).
    pub body: Vec<u8>,
    /// Everything read off the socket, head included.
    pub raw: Vec<u8>,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_websocket_upgrade(&self) -> bool {
        self.header("upgrade")
            .map(|v| v.trim().eq_ignore_ascii_case("websocket"))
            .unwrap_or(false)
    }

    fn content_length(&self) -> RelayResult<usize> {
        match self.header("content-length") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| RelayError::Http(format!("Bad Content-Length: {}", v))),
            None => Ok(0),
        }
    }
}

/// Parse the request line and headers (everything before the blank line).
pub(crate) fn parse_head(head: &str) -> RelayResult<(String, String, Vec<(String, String)>)> {
    let mut lines = head.split("\r\n");
    let first_line = lines.next().unwrap_or("");
    let parts: Vec<&str> = first_line.split_whitespace().collect();
    if parts.len() < 3 || !parts[2].starts_with("HTTP/") {
        return Err(RelayError::Http(format!("Malformed request line: {:?}", first_line)));
    }
    let method = parts[0].to_string();
    let path = parts[1].split('?').next().unwrap_or("").to_string();

    let headers = lines
        .filter(|l| !l.is_empty())
        .filter_map(|l| {
            let (k, v) = l.split_once(':')?;
            Some((k.trim().to_string(), v.trim().to_string()))
        })
        .collect();

    Ok((method, path, headers))
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Read one request: the head, then the body up to Content-Length.
/// Returns `None` when the peer closes before sending anything.
pub(crate) async fn read_request<S: AsyncRead + Unpin>(stream: &mut S) -> RelayResult<Option<HttpRequest>> {
    let mut raw = Vec::with_capacity(1024);
    let mut chunk = [0u8; 8192];

    let head_end = loop {
        if let Some(pos) = find_head_end(&raw) {
            break pos;
        }
        if raw.len() >= MAX_REQUEST_BYTES {
            return Err(RelayError::Http("Request head too large".into()));
        }
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            if raw.is_empty() {
                return Ok(None);
            }
            return Err(RelayError::Http("Connection closed mid-request".into()));
        }
        raw.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&raw[..head_end]).to_string();
    let (method, path, headers) = parse_head(&head)?;
    let mut request = HttpRequest { method, path, headers, body: Vec::new(), raw: Vec::new() };

    let body_start = head_end + 4;
    let want = request.content_length()?;
    // `want` is client-controlled; compare without adding to it
    if want > MAX_REQUEST_BYTES.saturating_sub(body_start) {
        return Err(RelayError::Http(format!("Body too large: {} bytes", want)));
    }
    while raw.len() < body_start + want {
        let n = stream.read(&mut chunk).await?;
        if n == 0 { break; }
        raw.extend_from_slice(&chunk[..n]);
    }

    let body_end = raw.len().min(body_start + want);
    request.body = raw[body_start..body_end].to_vec();
    request.raw = raw;
    Ok(Some(request))
}

// ── Response ───────────────────────────────────────────────────────────

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        405 => "Method Not Allowed",
        _ => "Unknown",
    }
}

/// Write a complete response. `Content-Length` and `Connection: close` are
/// always added.
pub(crate) async fn write_response<S: AsyncWrite + Unpin>(
    stream: &mut S,
    status: u16,
    headers: &[(&str, &str)],
    body: &[u8],
) -> RelayResult<()> {
    let mut head = format!("HTTP/1.1 {} {}\r\n", status, status_text(status));
    for (k, v) in headers {
        head.push_str(k);
        head.push_str(": ");
        head.push_str(v);
        head.push_str("\r\n");
    }
    head.push_str(&format!("Content-Length: {}\r\nConnection: close\r\n\r\n", body.len()));

    stream.write_all(head.as_bytes()).await?;
    stream.write_all(body).await?;
    stream.flush().await?;
    Ok(())
}

pub(crate) async fn write_text<S: AsyncWrite + Unpin>(stream: &mut S, status: u16, text: &str) -> RelayResult<()> {
    write_response(stream, status, &[("Content-Type", "text/plain; charset=utf-8")], text.as_bytes()).await
}

// ── Tests ──────────────────────────────────────────────────────────────
