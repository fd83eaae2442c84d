// src/services/feed.rs

//! Calendar feed client.
//!
//! Issues one request per subject identifier and reports the outcome as a
//! value. Retrying is left to callers; nothing here retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::error::Result;
use crate::models::{FeedConfig, FeedKind};

/// Successful response for one feed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedResponse {
    /// Non-empty calendar payload, verbatim
    Payload(Vec<u8>),
    /// The service answered with a zero-length body
    Empty,
}

/// Failure of a single feed request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = error.status() {
            FetchError::Status(status.as_u16())
        } else {
            FetchError::Transport(error.to_string())
        }
    }
}

/// Source of raw calendar feeds.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the feed of one subject identifier.
    async fn fetch(&self, id: u64, kind: FeedKind) -> std::result::Result<FeedResponse, FetchError>;
}

/// HTTP client for the remote calendar endpoint.
pub struct HttpFeedClient {
    client: Client,
    base_url: Url,
}

impl HttpFeedClient {
    /// Create a client with the configured user agent and timeout.
    pub fn new(config: &FeedConfig) -> Result<Self> {
        // The endpoint ignores content negotiation but expects this header.
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(headers)
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
        })
    }

    /// Build the feed URL for an identifier.
    pub fn feed_url(&self, id: u64, kind: FeedKind) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair(kind.query_param(), &id.to_string())
            .append_pair("iCal", "true");
        url
    }
}

#[async_trait]
impl FeedSource for HttpFeedClient {
    async fn fetch(
        &self,
        id: u64,
        kind: FeedKind,
    ) -> std::result::Result<FeedResponse, FetchError> {
        let response = self.client.get(self.feed_url(id, kind)).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        if body.is_empty() {
            Ok(FeedResponse::Empty)
        } else {
            Ok(FeedResponse::Payload(body.to_vec()))
        }
    }
}

/// Fetch one feed, then pause for `delay` whatever the outcome.
///
/// The pause keeps a uniform request cadence against the shared service.
pub async fn fetch_paced<S>(
    source: &S,
    id: u64,
    kind: FeedKind,
    delay: Duration,
) -> std::result::Result<FeedResponse, FetchError>
where
    S: FeedSource + ?Sized,
{
    let result = source.fetch(id, kind).await;
    if delay.as_millis() > 0 {
        tokio::time::sleep(delay).await;
    }
    result
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::services::testing::FakeFeed;

    /// Serve one canned HTTP response on a local port. The task yields the
    /// raw request head it received.
    async fn serve_once(response: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/api/Rasp", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            // The client may hang up as soon as it has the status line.
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    fn local_client(base_url: String) -> HttpFeedClient {
        HttpFeedClient::new(&FeedConfig {
            base_url,
            user_agent: "timetable-test/1.0".to_string(),
            ..FeedConfig::default()
        })
        .unwrap()
    }

    fn client() -> HttpFeedClient {
        HttpFeedClient::new(&FeedConfig {
            base_url: "https://example.com/api/Rasp".to_string(),
            ..FeedConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_room_url() {
        let url = client().feed_url(3115136, FeedKind::Room);
        assert_eq!(
            url.as_str(),
            "https://example.com/api/Rasp?idAudLine=3115136&iCal=true"
        );
    }

    #[test]
    fn test_group_url() {
        let url = client().feed_url(8149, FeedKind::Group);
        assert_eq!(url.as_str(), "https://example.com/api/Rasp?idGroup=8149&iCal=true");
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let config = FeedConfig {
            base_url: "not a url".to_string(),
            ..FeedConfig::default()
        };
        assert!(HttpFeedClient::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_paced_fetch_delays_after_failure() {
        let feed = FakeFeed::new().with(7, Err(FetchError::Status(502)));

        let started = Instant::now();
        let result = fetch_paced(&feed, 7, FeedKind::Room, Duration::from_millis(30)).await;

        assert_eq!(result, Err(FetchError::Status(502)));
        assert!(started.elapsed() >= Duration::from_millis(30));
        assert_eq!(feed.calls(), vec![(7, FeedKind::Room)]);
    }

    #[tokio::test]
    async fn test_http_payload_and_headers() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 15\r\nConnection: close\r\n\r\nBEGIN:VCALENDAR",
        )
        .await;

        let response = local_client(base_url).fetch(42, FeedKind::Group).await;
        assert_eq!(response, Ok(FeedResponse::Payload(b"BEGIN:VCALENDAR".to_vec())));

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /api/rasp?idgroup=42&ical=true "));
        assert!(request.contains("accept: application/json\r\n"));
        assert!(request.contains("user-agent: timetable-test/1.0\r\n"));
    }

    #[tokio::test]
    async fn test_http_zero_length_body_is_empty() {
        let (base_url, server) =
            serve_once("HTTP/1.1 200 OK\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;

        let response = local_client(base_url).fetch(1, FeedKind::Room).await;
        assert_eq!(response, Ok(FeedResponse::Empty));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let (base_url, server) = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\n\
             Content-Length: 4\r\nConnection: close\r\n\r\nbusy",
        )
        .await;

        let response = local_client(base_url).fetch(1, FeedKind::Room).await;
        assert_eq!(response, Err(FetchError::Status(503)));
        server.await.unwrap();
    }
}
