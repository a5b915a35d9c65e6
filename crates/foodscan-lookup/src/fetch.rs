//! # Fetch Capability
//!
//! `fetch(url) -> bytes | error`, injected into the lookup pipeline.
//!
//! ```text
//! ┌──────────────────┐   &Url    ┌───────────────────────────────────────┐
//! │  ProductLookup   │ ────────► │  dyn Fetch                            │
//! │                  │ ◄──────── │  ├── HttpFetcher (reqwest, this file) │
//! └──────────────────┘  Vec<u8>  │  └── test stubs                       │
//!                       or       └───────────────────────────────────────┘
//!                       FetchError
//! ```
//!
//! ## Status Handling
//! The upstream database answers an unknown code with HTTP 404 *and* a JSON
//! body carrying `status: 0`. The body is what classifies the result, so
//! [`HttpFetcher`] hands back the body for any status except 429 and 5xx,
//! which never carry a product document.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default `User-Agent`. The upstream database asks clients to identify
/// themselves.
pub const DEFAULT_USER_AGENT: &str = concat!("foodscan/", env!("CARGO_PKG_VERSION"));

/// Retrieves the body at a URL.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}

// =============================================================================
// HTTP Fetcher
// =============================================================================

/// Settings for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Whole-request timeout (connect + body).
    pub timeout: Duration,

    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// [`Fetch`] over HTTP(S) using a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds the client.
    pub fn new(config: &HttpFetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!(%url, status = status.as_u16(), bytes = body.len(), "Fetched");
        Ok(body.to_vec())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, StatusCode as HttpStatus};
    use axum::routing::get;
    use axum::Router;
    use tokio::net::TcpListener;

    const FOUND_BODY: &str = r#"{"status":1,"product":{"code":"5941132022421"}}"#;
    const NOT_FOUND_BODY: &str =
        r#"{"code":"0000000000000","status":0,"status_verbose":"product not found"}"#;

    async fn spawn_server() -> String {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = Router::new()
            .route(
                "/api/v2/product/5941132022421.json",
                get(|| async { ([(header::CONTENT_TYPE, "application/json")], FOUND_BODY) }),
            )
            .route(
                "/api/v2/product/0000000000000.json",
                get(|| async { (HttpStatus::NOT_FOUND, NOT_FOUND_BODY) }),
            )
            .route(
                "/api/v2/product/503.json",
                get(|| async { (HttpStatus::SERVICE_UNAVAILABLE, "maintenance") }),
            )
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "late"
                }),
            )
            .route(
                "/user-agent",
                get(|headers: HeaderMap| async move {
                    headers
                        .get(header::USER_AGENT)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string()
                }),
            );

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        format!("http://{addr}")
    }

    fn url(base: &str, path: &str) -> Url {
        Url::parse(&format!("{base}{path}")).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body() {
        let base = spawn_server().await;
        let fetcher = HttpFetcher::new(&HttpFetcherConfig::default()).unwrap();

        let body = fetcher
            .fetch(&url(&base, "/api/v2/product/5941132022421.json"))
            .await
            .unwrap();
        assert_eq!(body, FOUND_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_not_found_status_still_returns_body() {
        let base = spawn_server().await;
        let fetcher = HttpFetcher::new(&HttpFetcherConfig::default()).unwrap();

        let body = fetcher
            .fetch(&url(&base, "/api/v2/product/0000000000000.json"))
            .await
            .unwrap();
        assert_eq!(body, NOT_FOUND_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_server_error_is_status_error() {
        let base = spawn_server().await;
        let fetcher = HttpFetcher::new(&HttpFetcherConfig::default()).unwrap();

        let err = fetcher
            .fetch(&url(&base, "/api/v2/product/503.json"))
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Status { status: 503 });
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_timeout() {
        let base = spawn_server().await;
        let fetcher = HttpFetcher::new(&HttpFetcherConfig {
            timeout: Duration::from_millis(100),
            ..Default::default()
        })
        .unwrap();

        let err = fetcher.fetch(&url(&base, "/slow")).await.unwrap_err();
        assert_eq!(err, FetchError::Timeout);
    }

    #[tokio::test]
    async fn test_connection_refused_is_not_connected() {
        std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let fetcher = HttpFetcher::new(&HttpFetcherConfig::default()).unwrap();
        let err = fetcher
            .fetch(&url(&format!("http://{addr}"), "/anything"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::NotConnected(_)), "{:?}", err);
    }

    #[tokio::test]
    async fn test_sends_user_agent() {
        let base = spawn_server().await;
        let fetcher = HttpFetcher::new(&HttpFetcherConfig {
            user_agent: "foodscan-test/1.0".to_string(),
            ..Default::default()
        })
        .unwrap();

        let body = fetcher.fetch(&url(&base, "/user-agent")).await.unwrap();
        assert_eq!(body, b"foodscan-test/1.0");
    }
}
