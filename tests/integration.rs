// Integration tests: a real server on an ephemeral port, driven by a
// tokio-tungstenite client and raw HTTP over TcpStream.

use futures::{SinkExt, StreamExt};
use scroll_relay::{
    EchoSink, InputSink, RelayConfig, RelayResult, RelayServer, RelayStats, ScrollSink, SinkKind,
    StopHandle,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

const WAIT: Duration = Duration::from_secs(5);

struct Running {
    addr: SocketAddr,
    stop: StopHandle,
    stats: Arc<RelayStats>,
}

impl Drop for Running {
    fn drop(&mut self) {
        self.stop.stop();
    }
}

async fn start(config: RelayConfig, sink: Arc<dyn scroll_relay::ActionSink>) -> Running {
    let server = RelayServer::bind(config, sink).await.unwrap();
    let running = Running {
        addr: server.local_addr().unwrap(),
        stop: server.stop_handle(),
        stats: server.stats(),
    };
    tokio::spawn(server.run());
    running
}

fn ephemeral(sink: SinkKind) -> RelayConfig {
    let mut config = RelayConfig::preset(sink);
    config.port = 0;
    config
}

async fn start_echo() -> Running {
    start(ephemeral(SinkKind::Echo), Arc::new(EchoSink)).await
}

/// Forwards every tick to the test over a channel.
struct ChannelInput(mpsc::UnboundedSender<i32>);

impl InputSink for ChannelInput {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn emit_scroll(&self, ticks: i32) -> RelayResult<()> {
        let _ = self.0.send(ticks);
        Ok(())
    }
}

async fn start_scroll() -> (Running, mpsc::UnboundedReceiver<i32>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let sink = Arc::new(ScrollSink::new(Arc::new(ChannelInput(tx)), 120));
    (start(ephemeral(SinkKind::Scroll), sink).await, rx)
}

async fn http(addr: SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut out = Vec::new();
    tokio::time::timeout(WAIT, stream.read_to_end(&mut out))
        .await
        .expect("response timed out")
        .unwrap();
    String::from_utf8(out).unwrap()
}

async fn next_text<S>(ws: &mut S) -> String
where
    S: futures::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let msg = tokio::time::timeout(WAIT, ws.next())
            .await
            .expect("no frame before timeout")
            .expect("stream ended")
            .unwrap();
        if let Message::Text(text) = msg {
            return text;
        }
    }
}

// ── Page ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_root_serves_page() {
    let server = start_echo().await;
    let resp = http(server.addr, "GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(resp.contains("Content-Type: text/html; charset=utf-8\r\n"));
    assert!(resp.contains(r#"id="disk""#));
}

#[tokio::test]
async fn test_unknown_post_is_404() {
    let server = start_echo().await;
    let resp = http(server.addr, "POST /nope HTTP/1.1\r\nContent-Length: 0\r\n\r\n").await;
    assert!(resp.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

// ── Echo gateway ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_echo_is_byte_identical() {
    let server = start_echo().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", server.addr))
        .await
        .unwrap();

    for payload in [
        r#"{"rotation": 12.5}"#,
        r#"{"rotation":-0.000123}"#,
        r#"{ "rotation" : 3 , "extra": true }"#,
    ] {
        ws.send(Message::Text(payload.to_string())).await.unwrap();
        assert_eq!(next_text(&mut ws).await, payload);
    }
}

#[tokio::test]
async fn test_binary_frames_echo_as_binary() {
    let server = start_echo().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", server.addr))
        .await
        .unwrap();

    let payload = br#"{"rotation": 7.0}"#.to_vec();
    ws.send(Message::Binary(payload.clone())).await.unwrap();
    let msg = tokio::time::timeout(WAIT, ws.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(msg, Message::Binary(payload));
}

#[tokio::test]
async fn test_malformed_frames_keep_connection_open() {
    let server = start_echo().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", server.addr))
        .await
        .unwrap();

    for bad in ["not json", r#"{"rotation": "12"}"#, r#"{"rotation": 1"#, "{}"] {
        ws.send(Message::Text(bad.to_string())).await.unwrap();
    }
    let good = r#"{"rotation": 1.5}"#;
    ws.send(Message::Text(good.to_string())).await.unwrap();

    // the only frame back is the well-formed one
    assert_eq!(next_text(&mut ws).await, good);
    let stats = server.stats.snapshot();
    assert_eq!(stats.messages, 5);
    assert_eq!(stats.decode_failures, 4);
}

#[tokio::test]
async fn test_concurrent_clients_are_isolated() {
    let server = start_echo().await;
    let url = format!("ws://{}/ws", server.addr);
    let (mut a, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    let (mut b, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();

    for i in 0..10 {
        let pa = format!(r#"{{"rotation": {}.25}}"#, i);
        let pb = format!(r#"{{"rotation": -{}.75}}"#, i);
        a.send(Message::Text(pa.clone())).await.unwrap();
        b.send(Message::Text(pb.clone())).await.unwrap();
        assert_eq!(next_text(&mut b).await, pb);
        assert_eq!(next_text(&mut a).await, pa);
    }
}

#[tokio::test]
async fn test_ping_gets_pong() {
    let server = start_echo().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", server.addr))
        .await
        .unwrap();
    ws.send(Message::Ping(b"hi".to_vec())).await.unwrap();
    let msg = tokio::time::timeout(WAIT, ws.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(msg, Message::Pong(b"hi".to_vec()));
}

#[tokio::test]
async fn test_idle_timeout_closes_socket() {
    let mut config = ephemeral(SinkKind::Echo);
    config.idle_timeout_secs = Some(1);
    let server = start(config, Arc::new(EchoSink)).await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", server.addr))
        .await
        .unwrap();

    let ended = tokio::time::timeout(WAIT, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => break,
                Some(Ok(_)) => continue,
            }
        }
    })
    .await;
    assert!(ended.is_ok(), "idle socket was not closed");
}

// ── Scroll gateway ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_scroll_sink_receives_scaled_ticks() {
    let (server, mut ticks) = start_scroll().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/ws", server.addr))
        .await
        .unwrap();

    for payload in [r#"{"rotation": 2.9}"#, "garbage", r#"{"rotation": -1.2}"#, r#"{"rotation": 0.4}"#] {
        ws.send(Message::Text(payload.to_string())).await.unwrap();
    }

    let mut got = Vec::new();
    for _ in 0..3 {
        got.push(tokio::time::timeout(WAIT, ticks.recv()).await.unwrap().unwrap());
    }
    assert_eq!(got, vec![240, -120, 0]);
    assert_eq!(server.stats.snapshot().decode_failures, 1);
}

#[tokio::test]
async fn test_scroll_preset_has_no_rotate_endpoint() {
    let (server, _ticks) = start_scroll().await;
    let resp = http(server.addr, "OPTIONS /rotate HTTP/1.1\r\n\r\n").await;
    assert!(resp.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

// ── Rotate endpoint ────────────────────────────────────────────────────

#[tokio::test]
async fn test_rotate_options_any_origin() {
    let server = start_echo().await;
    let resp = http(
        server.addr,
        "OPTIONS /rotate HTTP/1.1\r\nOrigin: https://anywhere.example\r\nAccess-Control-Request-Method: POST\r\n\r\n",
    )
    .await;
    assert!(resp.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(resp.contains("Access-Control-Allow-Origin: *\r\n"));
    assert!(resp.contains("Access-Control-Allow-Methods: POST, GET, OPTIONS\r\n"));
    assert!(resp.contains("Access-Control-Allow-Headers: Content-Type\r\n"));
    assert!(resp.ends_with("\r\n\r\n"));
}

#[tokio::test]
async fn test_rotate_post_lenient() {
    let server = start_echo().await;

    let ok = http(server.addr, "POST /rotate HTTP/1.1\r\nContent-Length: 4\r\n\r\n45.0").await;
    assert!(ok.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(ok.ends_with("\r\n\r\n"));

    let bad = http(server.addr, "POST /rotate HTTP/1.1\r\nContent-Length: 12\r\n\r\nnot-a-number").await;
    assert!(bad.starts_with("HTTP/1.1 200 OK\r\n"));

    let stats = server.stats.snapshot();
    assert_eq!(stats.messages, 2);
    assert_eq!(stats.decode_failures, 1);
}

#[tokio::test]
async fn test_rotate_get_is_405() {
    let server = start_echo().await;
    let resp = http(server.addr, "GET /rotate HTTP/1.1\r\n\r\n").await;
    assert!(resp.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));
    assert!(resp.ends_with("Method not allowed"));
}

// ── Lifecycle ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_bind_conflict_is_error() {
    let server = start_echo().await;
    let mut config = ephemeral(SinkKind::Echo);
    config.port = server.addr.port();
    assert!(RelayServer::bind(config, Arc::new(EchoSink)).await.is_err());
}

#[tokio::test]
async fn test_stop_handle_ends_run() {
    let server = RelayServer::bind(ephemeral(SinkKind::Echo), Arc::new(EchoSink)).await.unwrap();
    let stop = server.stop_handle();
    let task = tokio::spawn(server.run());
    stop.stop();
    let result = tokio::time::timeout(WAIT, task).await.expect("run did not return");
    assert!(result.unwrap().is_ok());
}
