//! Local single-request HTTP servers for adapter tests.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serve one canned response and report the request line received.
///
/// Returns the server's base URL and a handle resolving to the request line.
pub async fn serve_once(status: &str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|err| panic!("failed to bind local test listener: {err}"));
    let addr = listener.local_addr().expect("listener address");
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Length: {}\r\nContent-Type: application/json\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
    .into_bytes();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept request");
        let mut buf = vec![0_u8; 8192];
        let read = socket.read(&mut buf).await.expect("read request");
        socket.write_all(&response).await.expect("write response");
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&buf[..read])
            .lines()
            .next()
            .unwrap_or_default()
            .to_owned()
    });

    (format!("http://{addr}"), handle)
}

/// Accept one connection and never answer it.
pub async fn serve_silence() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|err| panic!("failed to bind local test listener: {err}"));
    let addr = listener.local_addr().expect("listener address");
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.expect("accept request");
        std::future::pending::<()>().await;
    });
    format!("http://{addr}")
}

/// Base URL of a port nothing listens on.
pub async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap_or_else(|err| panic!("failed to bind local test listener: {err}"));
    let addr = listener.local_addr().expect("listener address");
    drop(listener);
    format!("http://{addr}")
}
