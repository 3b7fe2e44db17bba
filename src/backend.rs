/*============================================================
  Synavera Project: Footer-Core
  Module: footer_core::backend
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1
  ------------------------------------------------------------
  Purpose:
    HTTP access for the footer: the backend version query and
    the remote custom links document.

  Security / Safety Notes:
    Performs read-only HTTPS GET requests. No credentials are
    transmitted.

  Dependencies:
    reqwest for HTTP, serde for response parsing.

  Operational Scope:
    Supplies the session cache with the two asynchronous
    footer sources.

  Revision History:
    2026-10-16 COD  Reworked the RPC client into footer sources.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Retry with exponential backoff on non-success status
    - Structured response parsing with explicit error paths
    - Configurable timeouts
============================================================*/

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use tokio::time::sleep;

use crate::config::ApiConfig;
use crate::error::{FooterError, Result, SourceError};
use crate::links::{parse_links_payload, CustomLinksGroup, LinksSource};
use crate::query::{QueryCache, QueryState, BACKEND_VERSION_KEY};
use crate::version::BackendVersion;

const BACKEND_VERSION_PATH: &str = "/api/v2/config/backend-version";

/// Anything able to answer the backend version query.
pub trait VersionSource {
    async fn fetch_backend_version(&self) -> std::result::Result<BackendVersion, SourceError>;
}

/// Client for the explorer API and the links host.
#[derive(Clone)]
pub struct FooterClient {
    client: reqwest::Client,
    base_url: String,
    max_retries: usize,
}

impl FooterClient {
    /// Construct a new client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout.max(1)))
            .user_agent(concat!("Footer-Core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| FooterError::Network(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries.max(1),
        })
    }

    fn version_url(&self) -> String {
        format!("{}{BACKEND_VERSION_PATH}", self.base_url)
    }

    /// GET `url`, retrying non-success statuses with backoff, and return the body.
    async fn get_bytes(&self, url: &str) -> std::result::Result<Vec<u8>, SourceError> {
        let mut attempt = 0;
        loop {
            let response =
                self.client
                    .get(url)
                    .send()
                    .await
                    .map_err(|err| SourceError::Transport {
                        url: url.to_string(),
                        reason: err.to_string(),
                    })?;

            let status = response.status();
            if status == StatusCode::OK {
                let body = response.bytes().await.map_err(|err| SourceError::Transport {
                    url: url.to_string(),
                    reason: err.to_string(),
                })?;
                return Ok(body.to_vec());
            }

            attempt += 1;
            if attempt >= self.max_retries || !is_retryable(status) {
                return Err(SourceError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            sleep(backoff(attempt)).await;
        }
    }
}

impl VersionSource for FooterClient {
    async fn fetch_backend_version(&self) -> std::result::Result<BackendVersion, SourceError> {
        let url = self.version_url();
        let body = self.get_bytes(&url).await?;
        parse_version_payload(&url, &body)
    }
}

impl LinksSource for FooterClient {
    async fn fetch_links(
        &self,
        url: &str,
    ) -> std::result::Result<Vec<CustomLinksGroup>, SourceError> {
        let body = self.get_bytes(url).await?;
        parse_links_payload(url, &body)
    }
}

#[derive(Debug, Deserialize)]
struct BackendVersionResponse {
    backend_version: String,
}

fn parse_version_payload(
    url: &str,
    body: &[u8],
) -> std::result::Result<BackendVersion, SourceError> {
    let payload: BackendVersionResponse =
        serde_json::from_slice(body).map_err(|err| SourceError::Malformed {
            url: url.to_string(),
            reason: err.to_string(),
        })?;
    Ok(BackendVersion::new(payload.backend_version))
}

fn is_retryable(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn backoff(attempt: usize) -> Duration {
    let exponent = (attempt as u32).min(8);
    Duration::from_millis(200_u64.saturating_mul(1_u64 << exponent))
}

/// The `config_backend_version` query, cached for the session.
pub struct BackendVersionQuery<'a, S> {
    source: &'a S,
    cache: &'a QueryCache<BackendVersion>,
}

impl<'a, S: VersionSource> BackendVersionQuery<'a, S> {
    pub fn new(source: &'a S, cache: &'a QueryCache<BackendVersion>) -> Self {
        Self { source, cache }
    }

    pub async fn load(&self) -> QueryState<BackendVersion> {
        self.cache
            .fetch(BACKEND_VERSION_KEY, || self.source.fetch_backend_version())
            .await
            .into()
    }

    pub fn snapshot(&self) -> QueryState<BackendVersion> {
        self.cache.state(BACKEND_VERSION_KEY)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// In-memory version source; `None` answers with a transport failure.
    pub(crate) struct FakeVersion {
        pub calls: AtomicUsize,
        pub version: Option<&'static str>,
    }

    impl FakeVersion {
        pub(crate) fn answering(version: Option<&'static str>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                version,
            }
        }
    }

    impl VersionSource for FakeVersion {
        async fn fetch_backend_version(
            &self,
        ) -> std::result::Result<BackendVersion, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.version {
                Some(version) => Ok(BackendVersion::new(version)),
                None => Err(SourceError::Transport {
                    url: "http://backend.test".into(),
                    reason: "connection refused".into(),
                }),
            }
        }
    }

    /// Serve one canned `(status, body)` response per connection on a local
    /// port and count the connections accepted.
    async fn canned_backend(responses: Vec<(u16, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        tokio::spawn(async move {
            for (status, body) in responses {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                counter.fetch_add(1, Ordering::SeqCst);

                let mut request = Vec::new();
                let mut chunk = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut chunk).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => request.extend_from_slice(&chunk[..n]),
                    }
                }

                let response = format!(
                    "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (format!("http://{addr}"), hits)
    }

    fn client_for(base_url: String, max_retries: usize) -> FooterClient {
        FooterClient::new(&ApiConfig {
            base_url,
            timeout: 5,
            max_retries,
            wait_ms: 1_000,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn transient_status_is_retried_until_success() {
        let (base_url, hits) = canned_backend(vec![
            (503, "{}"),
            (200, r#"{"backend_version": "v5.2.0"}"#),
        ])
        .await;
        let client = client_for(base_url, 3);

        let version = client.fetch_backend_version().await.unwrap();

        assert_eq!(version.as_str(), "v5.2.0");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn client_error_status_fails_without_retry() {
        let (base_url, hits) = canned_backend(vec![(404, "{}"), (200, "{}")]).await;
        let client = client_for(base_url, 3);

        let err = client.fetch_backend_version().await.unwrap_err();

        assert!(matches!(err, SourceError::Status { status: 404, .. }), "{err:?}");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_stop_at_the_configured_limit() {
        let (base_url, hits) =
            canned_backend(vec![(503, "{}"), (503, "{}"), (503, "{}")]).await;
        let client = client_for(base_url, 2);

        let err = client.fetch_backend_version().await.unwrap_err();

        assert!(matches!(err, SourceError::Status { status: 503, .. }), "{err:?}");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn version_payload_is_decoded() {
        let version =
            parse_version_payload("u", br#"{"backend_version": "v5.2.0", "extra": 1}"#).unwrap();
        assert_eq!(version.as_str(), "v5.2.0");
    }

    #[test]
    fn version_payload_without_field_is_malformed() {
        let err = parse_version_payload("u", br#"{"version": "v5.2.0"}"#).unwrap_err();
        assert_eq!(err.code(), "MALFORMED");
    }

    #[test]
    fn backoff_grows_and_saturates() {
        assert_eq!(backoff(1), Duration::from_millis(400));
        assert_eq!(backoff(2), Duration::from_millis(800));
        assert_eq!(backoff(50), backoff(8));
    }

    #[test]
    fn only_transient_statuses_retry() {
        assert!(is_retryable(StatusCode::BAD_GATEWAY));
        assert!(is_retryable(StatusCode::TOO_MANY_REQUESTS));
        assert!(!is_retryable(StatusCode::NOT_FOUND));
    }

    #[test]
    fn client_trims_base_url() {
        let client = FooterClient::new(&ApiConfig {
            base_url: "https://explorer.test/".into(),
            ..ApiConfig::default()
        })
        .unwrap();
        assert_eq!(
            client.version_url(),
            "https://explorer.test/api/v2/config/backend-version"
        );
    }

    #[tokio::test]
    async fn version_query_runs_once_per_session() {
        let source = FakeVersion::answering(Some("v5.2.0"));
        let cache = QueryCache::new();
        let query = BackendVersionQuery::new(&source, &cache);

        assert_eq!(query.snapshot(), QueryState::Idle);
        let first = query.load().await;
        let second = query.load().await;
        assert_eq!(first, second);
        assert_eq!(first.value().map(BackendVersion::as_str), Some("v5.2.0"));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn version_failure_is_permanent_for_the_session() {
        let source = FakeVersion::answering(None);
        let cache = QueryCache::new();
        let query = BackendVersionQuery::new(&source, &cache);

        assert!(query.load().await.error().is_some());
        assert!(query.load().await.error().is_some());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
