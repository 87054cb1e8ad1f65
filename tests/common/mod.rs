//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use governance_accounts::Address;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Request bodies received by a mock node, in arrival order.
pub type Captured = Arc<Mutex<Vec<Value>>>;

/// Start a mock JSON-RPC node that answers every request with `status` and
/// `body`. Returns its URL and the captured request bodies.
pub async fn start_mock_node(status: u16, body: String) -> (String, Captured) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let requests = captured.clone();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let body = body.clone();
                    let requests = requests.clone();
                    tokio::spawn(async move {
                        if let Some(request) = read_request_body(&mut socket).await {
                            if let Ok(value) = serde_json::from_slice(&request) {
                                requests.lock().unwrap().push(value);
                            }
                        }
                        let status_text = match status {
                            200 => "200 OK",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };
                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\n\
                             Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (format!("http://{}", addr), captured)
}

/// Read one HTTP/1.1 request and return its body.
async fn read_request_body(socket: &mut tokio::net::TcpStream) -> Option<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
    let content_length = headers
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Some(buf[header_end..].to_vec())
}

/// A successful `getProgramAccounts` response holding `entries`.
pub fn rpc_result(entries: Vec<Value>) -> String {
    json!({ "jsonrpc": "2.0", "id": 1, "result": entries }).to_string()
}

/// One keyed account entry with a base64 payload.
pub fn account_entry(address: &Address, payload: &[u8]) -> Value {
    json!({
        "pubkey": address.to_base58(),
        "account": {
            "lamports": 2_039_280,
            "owner": Address::new([0xAB; 32]).to_base58(),
            "executable": false,
            "rentEpoch": 361,
            "space": payload.len(),
            "data": [STANDARD.encode(payload), "base64"]
        }
    })
}

/// An address that nothing listens on.
pub async fn closed_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
