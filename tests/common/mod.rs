//! Shared utilities for relay integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use webhook_relay::config::{apply_env, RelayConfig};
use webhook_relay::http::Headers;
use webhook_relay::security::compute_signature;

pub const SECRET: &str = "shpss_integration_secret";
pub const API_KEY: &str = "ns-api-key";
pub const INSTANCE_ID: &str = "acme-store";

/// One request as seen by the mock downstream.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Mock automation API that records every request it fully receives.
#[derive(Clone)]
pub struct MockDownstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockDownstream {
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

/// Start a downstream that answers every request with `status` and `body`.
pub async fn start_downstream(status: u16, body: &'static str) -> MockDownstream {
    start(Some((status, body))).await
}

/// Start a downstream that reads each request and never answers.
pub async fn start_hanging_downstream() -> MockDownstream {
    start(None).await
}

/// A base URL whose port refuses connections.
pub async fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/v1", addr)
}

async fn start(reply: Option<(u16, &'static str)>) -> MockDownstream {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let recorded = recorded.clone();
            tokio::spawn(async move {
                let Some(request) = read_request(&mut socket).await else {
                    return;
                };
                recorded.lock().unwrap().push(request);

                match reply {
                    Some((status, body)) => {
                        let reason = StatusCode::from_u16(status)
                            .ok()
                            .and_then(|s| s.canonical_reason())
                            .unwrap_or("Unknown");
                        let response = format!(
                            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status,
                            reason,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    }
                    None => tokio::time::sleep(Duration::from_secs(60)).await,
                }
            });
        }
    });

    MockDownstream { addr, requests }
}

async fn read_request(socket: &mut TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let header_end = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos;
        }
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let mut lines = head.split("\r\n");
    let request_line = lines.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let mut body = buf[header_end + 4..].to_vec();
    while body.len() < content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    Some(CapturedRequest {
        request_line,
        headers,
        body,
    })
}

/// Fully configured relay pointing at `base_url`, plus any extra variables.
pub fn relay_config(base_url: &str, extra: &[(&str, &str)]) -> RelayConfig {
    let mut vars: HashMap<&str, &str> = HashMap::from([
        ("SHOPIFY_SECRET", SECRET),
        ("MAISTRO_API_KEY", API_KEY),
        ("MAISTRO_INSTANCE_ID", INSTANCE_ID),
        ("MAISTRO_BASE_URL", base_url),
    ]);
    vars.extend(extra.iter().copied());
    config_from(&vars)
}

/// Relay config built only from `vars`; anything absent stays absent.
pub fn config_from(vars: &HashMap<&str, &str>) -> RelayConfig {
    let mut config = RelayConfig::default();
    apply_env(&mut config, |name| vars.get(name).map(|v| v.to_string())).unwrap();
    config
}

/// Shopify-style headers with a valid signature over `body`.
pub fn signed_headers(body: &[u8]) -> Headers {
    let mut headers = Headers::new();
    headers.insert("Content-Type", "application/json");
    headers.insert("X-Shopify-Hmac-Sha256", compute_signature(body, SECRET).unwrap());
    headers.insert("X-Shopify-Topic", "orders/fulfilled");
    headers.insert("X-Shopify-Shop-Domain", "acme.myshopify.com");
    headers
}
