//! Feed download.
//!
//! [`FeedFetcher`] is the seam between the pipeline and the network.
//! [`HttpFetcher`] issues exactly one GET per call, bounded by the feed's
//! timeout, with no retry.

use async_trait::async_trait;
use quake_map_feed_models::FeedDefinition;
use serde_json::Value;

use crate::FeedError;

/// User-Agent sent with feed requests.
const USER_AGENT: &str = concat!("quake_map/", env!("CARGO_PKG_VERSION"));

/// Retrieves the raw `features` array of a feed.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetches the feed and returns its features in feed order.
    ///
    /// A response without a `features` array yields an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] on transport failure, non-success status, or
    /// an unparseable body.
    async fn fetch(&self, feed: &FeedDefinition) -> Result<Vec<Value>, FeedError>;
}

/// [`FeedFetcher`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a fetcher with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] if the client cannot be built.
    pub fn new() -> Result<Self, FeedError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_client(client))
    }

    /// Wraps an existing client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, feed: &FeedDefinition) -> Result<Vec<Value>, FeedError> {
        log::debug!("GET {} (timeout {:?})", feed.url, feed.timeout());

        let resp = self
            .client
            .get(&feed.url)
            .timeout(feed.timeout())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: feed.url.clone(),
            });
        }

        let body = resp.text().await?;
        extract_features(&body)
    }
}

/// Parses a feed body and takes its `features` array.
///
/// # Errors
///
/// Returns [`FeedError::Malformed`] if the body is not valid JSON.
pub fn extract_features(body: &str) -> Result<Vec<Value>, FeedError> {
    let json: Value = serde_json::from_str(body)?;

    let features = match json {
        Value::Object(mut map) => match map.remove("features") {
            Some(Value::Array(features)) => features,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    Ok(features)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use quake_map_feed_models::{CoordinatePolicy, PlaceMode};
    use tokio::io::{AsyncReadExt as _, AsyncWriteExt as _};
    use tokio::net::{TcpListener, TcpStream};

    use super::*;

    fn feed(url: String, timeout_secs: u64) -> FeedDefinition {
        FeedDefinition {
            id: "local".to_string(),
            name: "Local feed".to_string(),
            url,
            enabled: true,
            timeout_secs,
            ttl_secs: 60,
            coordinates: CoordinatePolicy::LonLatDepth,
            place: PlaceMode::Parsed,
        }
    }

    fn fetcher() -> HttpFetcher {
        HttpFetcher::with_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    async fn read_request(socket: &mut TcpStream) {
        let mut buf = vec![0_u8; 8192];
        let mut len = 0;
        while len < buf.len() {
            let n = socket.read(&mut buf[len..]).await.unwrap();
            if n == 0 {
                break;
            }
            len += n;
            if buf[..len].windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
    }

    /// Accepts one connection and answers it with `status` and `body`.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{addr}/feed.geojson")
    }

    /// Accepts one connection and never answers.
    async fn serve_silence() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;
            tokio::time::sleep(Duration::from_secs(30)).await;
            drop(socket);
        });
        format!("http://{addr}/feed.geojson")
    }

    #[tokio::test]
    async fn http_ok_returns_features() {
        let url = serve_once(
            "200 OK",
            r#"{"type": "FeatureCollection", "features": [{"id": "a"}, {"id": "b"}]}"#,
        )
        .await;

        let features = fetcher().fetch(&feed(url, 5)).await.unwrap();

        assert_eq!(features.len(), 2);
        assert_eq!(features[1]["id"], "b");
    }

    #[tokio::test]
    async fn http_error_status_is_transport() {
        let url = serve_once("503 Service Unavailable", "down").await;

        let err = fetcher().fetch(&feed(url.clone(), 5)).await.unwrap_err();

        assert!(err.is_transport());
        assert!(
            matches!(err, FeedError::Status { status: 503, url: ref u } if *u == url),
            "{err}"
        );
    }

    #[tokio::test]
    async fn http_ok_with_bad_body_is_malformed() {
        let url = serve_once("200 OK", "<html>oops</html>").await;

        let err = fetcher().fetch(&feed(url, 5)).await.unwrap_err();

        assert!(matches!(err, FeedError::Malformed(_)));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn silent_server_hits_feed_timeout() {
        let url = serve_silence().await;
        let start = Instant::now();

        let err = fetcher().fetch(&feed(url, 1)).await.unwrap_err();

        assert!(err.is_transport(), "{err}");
        assert!(matches!(err, FeedError::Transport(ref e) if e.is_timeout()), "{err}");
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn extracts_features_in_order() {
        let body = r#"{"type": "FeatureCollection", "features": [{"id": "a"}, {"id": "b"}]}"#;
        let features = extract_features(body).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["id"], "a");
        assert_eq!(features[1]["id"], "b");
    }

    #[test]
    fn empty_features_is_not_an_error() {
        assert!(extract_features(r#"{"features": []}"#).unwrap().is_empty());
    }

    #[test]
    fn missing_features_key_yields_empty() {
        assert!(extract_features(r#"{"type": "FeatureCollection"}"#).unwrap().is_empty());
        assert!(extract_features(r#"{"features": null}"#).unwrap().is_empty());
        assert!(extract_features("[1, 2, 3]").unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = extract_features("<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, FeedError::Malformed(_)));
    }
}
