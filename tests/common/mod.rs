//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sheet_redirect::config::RedirectorConfig;
use sheet_redirect::http::HttpServer;
use sheet_redirect::lifecycle::Shutdown;
use sheet_redirect::sheets::SheetsClient;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a programmable mock of the Sheets values API.
///
/// `f` receives the raw request head and returns `(status, json body)`.
pub async fn start_mock_sheet<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut head = Vec::new();
                        let mut buf = [0u8; 1024];
                        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut buf).await {
                                Ok(0) | Err(_) => break,
                                Ok(n) => head.extend_from_slice(&buf[..n]),
                            }
                        }

                        let (status, body) = f(String::from_utf8_lossy(&head).into_owned()).await;
                        let status_text = match status {
                            200 => "200 OK",
                            403 => "403 Forbidden",
                            404 => "404 Not Found",
                            429 => "429 Too Many Requests",
                            500 => "500 Internal Server Error",
                            503 => "503 Service Unavailable",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
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

    addr
}

/// A values response body for the given rows.
pub fn values_body(rows: serde_json::Value) -> String {
    serde_json::json!({
        "range": "Sheet1!A1:B1000",
        "majorDimension": "ROWS",
        "values": rows,
    })
    .to_string()
}

/// Config pointing at a mock sheet, with fast retries.
pub fn config_for(sheet_addr: SocketAddr) -> RedirectorConfig {
    let mut config = RedirectorConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.sheet.spreadsheet_id = "test-sheet".into();
    config.sheet.api_key = Some("test-key".into());
    config.sheet.endpoint = format!("http://{}", sheet_addr);
    config.timeouts.fetch_secs = 2;
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 50;
    config
}

/// Start the redirector; returns its address and the shutdown handle.
pub async fn start_redirector(config: RedirectorConfig) -> (SocketAddr, Shutdown) {
    let client = SheetsClient::new(&config).unwrap();
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, Arc::new(client));
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

/// HTTP client that does not follow redirects.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
