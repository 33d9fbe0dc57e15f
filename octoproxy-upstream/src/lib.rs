use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;
use tokio::time;

pub use reqwest::Url;

/// Deadline applied to each upstream request unless the caller overrides it.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// GitHub rejects anonymous requests that carry no User-Agent.
const USER_AGENT: &str = concat!("octoproxy/", env!("CARGO_PKG_VERSION"));

/// The slice of the GitHub API root payload the service consumes.
///
/// The live payload is a map of a few dozen endpoint URL templates; only
/// `current_user_url` is read, everything else is dropped on deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRoot {
    pub current_user_url: String,
}

/// Client that fetches the upstream API root over HTTP.
///
/// Every request is a single attempt bounded by the configured deadline —
/// there is no retry policy. The client is cheap to clone and all clones
/// share one connection pool, so it can be handed to each request handler.
///
/// # Errors
/// [`UpstreamClient::fetch_root`] returns [`UpstreamError`] when the request
/// cannot be sent, the upstream answers with a non-2xx status, the body does
/// not deserialize, or the deadline elapses.
///
/// # Examples
/// ```ignore
/// use octoproxy_upstream::UpstreamClient;
///
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let client = UpstreamClient::new("https://api.github.com".parse()?)?;
/// let root = client.fetch_root().await?;
/// println!("{}", root.current_user_url);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl UpstreamClient {
    /// Creates a client for `base_url` using the default deadline.
    ///
    /// # Errors
    /// Returns [`UpstreamError`] if the underlying HTTP client cannot be
    /// constructed (for example when no TLS backend is available).
    pub fn new(base_url: Url) -> Result<Self, UpstreamError> {
        Self::with_timeout(base_url, DEFAULT_REQUEST_TIMEOUT)
    }

    /// Creates a client that enforces a custom per-request deadline.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout,
            }),
        })
    }

    /// Returns the base URL this client targets.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Fetches and deserializes the API root payload.
    ///
    /// # Returns
    /// The [`ApiRoot`] view of the upstream body.
    ///
    /// # Errors
    /// Returns [`UpstreamError`] if the request fails, the upstream status is
    /// not 2xx, the body cannot be deserialized, or the deadline elapses.
    pub async fn fetch_root(&self) -> Result<ApiRoot, UpstreamError> {
        tracing::debug!(url = %self.inner.base_url, "fetching upstream api root");

        match time::timeout(self.inner.timeout, self.request_root()).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout(self.inner.timeout)),
        }
    }

    async fn request_root(&self) -> Result<ApiRoot, UpstreamError> {
        let response = self
            .inner
            .http
            .get(self.inner.base_url.clone())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status));
        }

        Ok(response.json().await?)
    }
}

/// Errors emitted by [`UpstreamClient`] when the upstream call fails.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected upstream status: {0}")]
    Status(StatusCode),
    #[error("upstream request timed out after {0:?}")]
    Timeout(Duration),
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT_PAYLOAD: &str = r#"{
        "current_user_url": "https://api.github.com/user",
        "current_user_authorizations_html_url": "https://github.com/settings/connections/applications{/client_id}",
        "emojis_url": "https://api.github.com/emojis",
        "events_url": "https://api.github.com/events",
        "rate_limit_url": "https://api.github.com/rate_limit"
    }"#;

    #[test]
    fn parses_root_payload_ignoring_extra_fields() {
        let root: ApiRoot = serde_json::from_str(ROOT_PAYLOAD).unwrap();
        assert_eq!(root.current_user_url, "https://api.github.com/user");
    }

    #[test]
    fn rejects_payload_without_current_user_url() {
        let result = serde_json::from_str::<ApiRoot>(r#"{"emojis_url": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn status_error_includes_canonical_reason() {
        let err = UpstreamError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "unexpected upstream status: 500 Internal Server Error"
        );
    }

    #[tokio::test]
    async fn fetch_times_out_against_silent_upstream() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Accept connections but never answer, so the deadline has to fire.
        tokio::spawn(async move {
            let mut held = Vec::new();
            loop {
                let (socket, _) = listener.accept().await.unwrap();
                held.push(socket);
            }
        });

        let url: Url = format!("http://{addr}/").parse().unwrap();
        let client = UpstreamClient::with_timeout(url, Duration::from_millis(100)).unwrap();

        match client.fetch_root().await {
            Err(UpstreamError::Timeout(timeout)) => {
                assert_eq!(timeout, Duration::from_millis(100));
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }
}
