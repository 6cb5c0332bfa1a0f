//! In-process HTTP stub for exercising the NewsAPI client against canned
//! responses.

use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::Client;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::news::NewsApiClient;

/// Serves one response per connection. The handler gets the request target
/// (path and query); returning `None` drops the connection without answering.
pub struct StubServer {
    pub base_url: String,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub async fn start<F>(respond: F) -> Self
    where
        F: Fn(&str) -> Option<(u16, String)> + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let respond = Arc::new(respond);

        let handle = tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let respond = Arc::clone(&respond);
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 16 * 1024];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]);
                    let target = request
                        .lines()
                        .next()
                        .and_then(|line| line.split_whitespace().nth(1))
                        .unwrap_or("/")
                        .to_string();

                    let Some((status, body)) = respond(&target) else {
                        return;
                    };
                    let reason = if status == 200 { "OK" } else { "Error" };
                    let response = format!(
                        "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}/v2"),
            handle,
        }
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A base URL nothing listens on, for transport failures.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/v2")
}

/// Client that ignores any proxy configured in the environment.
pub fn test_client(config: &Config) -> NewsApiClient {
    let client = Client::builder().no_proxy().build().unwrap();
    NewsApiClient::with_client(client, config)
}

pub fn articles_body(records: &[(&str, Option<&str>)]) -> String {
    let articles: Vec<_> = records
        .iter()
        .map(|(title, url)| {
            serde_json::json!({
                "source": { "id": null, "name": "Stub" },
                "title": title,
                "description": format!("About {title}"),
                "url": url,
                "urlToImage": null,
                "publishedAt": "2024-05-02T10:15:30Z",
            })
        })
        .collect();
    serde_json::json!({ "status": "ok", "totalResults": articles.len(), "articles": articles })
        .to_string()
}
