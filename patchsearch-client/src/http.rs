//! `QueryClient` backed by the search service's HTTP API.
//!
//! The blocking [`QueryClient`] trait is bridged to async `reqwest` calls by
//! an owned Tokio runtime, so the client can be embedded in synchronous
//! callers such as the CLI. Async callers use [`HttpQueryClient::submit_async`]
//! and [`HttpQueryClient::fetch_labels_async`] directly, or go through
//! [`AsyncQueryClient`].
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use patchsearch_client::{HttpQueryClient, HttpQueryClientConfig};
//! use patchsearch_core::QueryClient;
//!
//! let config = HttpQueryClientConfig::new("http://localhost:8080")
//!     .with_timeout(Duration::from_secs(10));
//! let client = HttpQueryClient::with_config(config)?;
//! let catalog = client.fetch_labels()?;
//! assert!(!catalog.is_empty());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use patchsearch_core::{LabelCatalog, QueryClient, QueryError, QueryKind, QueryRequest, QueryResult};
use reqwest::{Client, Response};
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use crate::AsyncQueryClient;
use crate::wire::{LabelsResponse, PatchNamesResponse};

/// Default base URL of the search backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "patchsearch/0.1";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const LABELS_PATH: &str = "labels";

/// Errors raised while constructing an [`HttpQueryClient`].
#[derive(Debug, Error)]
pub enum ClientBuildError {
    /// The base URL could not be parsed.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// The rejected base URL.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The Tokio runtime could not be built.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`HttpQueryClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpQueryClientConfig {
    /// Base URL of the backend, e.g. `"http://localhost:8080"`.
    pub base_url: String,
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent string.
    pub user_agent: String,
}

impl Default for HttpQueryClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpQueryClientConfig {
    /// Configuration for `base_url` with default timeout and user agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Absolute URLs of the three backend endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Endpoints {
    labels: Url,
    visual: Url,
    analogue: Url,
}

impl Endpoints {
    /// Resolve endpoint paths below `base_url`, keeping any path prefix.
    fn new(base_url: &str) -> Result<Self, url::ParseError> {
        let root = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        Ok(Self {
            labels: root.join(LABELS_PATH)?,
            visual: root.join(QueryKind::Visual.endpoint_path())?,
            analogue: root.join(QueryKind::Analogue.endpoint_path())?,
        })
    }

    const fn for_kind(&self, kind: QueryKind) -> &Url {
        match kind {
            QueryKind::Visual => &self.visual,
            QueryKind::Analogue => &self.analogue,
        }
    }
}

/// HTTP client for the patch search backend.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the blocking methods drive requests on an
/// owned current-thread runtime. Inside a multi-threaded runtime they use
/// the caller's handle with [`tokio::task::block_in_place`]. Blocking calls
/// from inside a `current_thread` runtime are not supported; use the async
/// methods there.
///
/// The owned runtime is shut down in the background on drop, so the client
/// may be dropped from async code.
pub struct HttpQueryClient {
    client: Client,
    config: HttpQueryClientConfig,
    endpoints: Endpoints,
    runtime: Option<Runtime>,
}

impl Drop for HttpQueryClient {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl std::fmt::Debug for HttpQueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpQueryClient")
            .field("config", &self.config)
            .field("endpoints", &self.endpoints)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl HttpQueryClient {
    /// Client for `base_url` with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] if the URL is invalid or the HTTP client
    /// or runtime cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientBuildError> {
        Self::with_config(HttpQueryClientConfig::new(base_url))
    }

    /// Client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientBuildError`] if the URL is invalid or the HTTP client
    /// or runtime cannot be built.
    pub fn with_config(config: HttpQueryClientConfig) -> Result<Self, ClientBuildError> {
        let endpoints =
            Endpoints::new(&config.base_url).map_err(|source| ClientBuildError::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ClientBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ClientBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            endpoints,
            runtime: Some(runtime),
        })
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &HttpQueryClientConfig {
        &self.config
    }

    /// URL that requests of `kind` are posted to.
    #[must_use]
    pub fn query_url(&self, kind: QueryKind) -> &str {
        self.endpoints.for_kind(kind).as_str()
    }

    /// URL the label catalogue is fetched from.
    #[must_use]
    pub fn labels_url(&self) -> &str {
        self.endpoints.labels.as_str()
    }

    /// Post `request` to its endpoint and decode the matching names.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] on transport failures, non-success statuses
    /// and undecodable bodies.
    pub async fn submit_async(&self, request: &QueryRequest) -> Result<QueryResult, QueryError> {
        let url = self.endpoints.for_kind(request.kind());
        debug!("posting {} query to {url}", request.kind());
        let response = self
            .client
            .post(url.clone())
            .json(request.payload())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        let body: PatchNamesResponse = self.decode(response, url).await?;
        Ok(body.into())
    }

    /// Fetch the label catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] on transport failures, non-success statuses
    /// and undecodable bodies.
    pub async fn fetch_labels_async(&self) -> Result<LabelCatalog, QueryError> {
        let url = &self.endpoints.labels;
        debug!("fetching labels from {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        let labels: LabelsResponse = self.decode(response, url).await?;
        Ok(LabelCatalog::new(labels))
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
        url: &Url,
    ) -> Result<T, QueryError> {
        let body = response
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        serde_json::from_slice(&body).map_err(|err| QueryError::Decode {
            url: url.to_string(),
            message: err.to_string(),
        })
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &Url) -> QueryError {
        if error.is_timeout() {
            return QueryError::Timeout {
                url: url.to_string(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return QueryError::Http {
                url: url.to_string(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        if error.is_decode() {
            return QueryError::Decode {
                url: url.to_string(),
                message: error.to_string(),
            };
        }

        QueryError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }

    fn block_on<T, F>(&self, future: F) -> Result<T, QueryError>
    where
        F: Future<Output = Result<T, QueryError>>,
    {
        match (Handle::try_current(), self.runtime.as_ref()) {
            (Ok(handle), _) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            (_, Some(runtime)) => runtime.block_on(future),
            (_, None) => Err(QueryError::Network {
                url: self.config.base_url.clone(),
                message: "client runtime has shut down".to_owned(),
            }),
        }
    }
}

impl QueryClient for HttpQueryClient {
    fn submit(&self, request: &QueryRequest) -> Result<QueryResult, QueryError> {
        self.block_on(self.submit_async(request))
    }

    fn fetch_labels(&self) -> Result<LabelCatalog, QueryError> {
        self.block_on(self.fetch_labels_async())
    }
}

#[async_trait]
impl AsyncQueryClient for HttpQueryClient {
    async fn submit(&self, request: &QueryRequest) -> Result<QueryResult, QueryError> {
        self.submit_async(request).await
    }

    async fn fetch_labels(&self) -> Result<LabelCatalog, QueryError> {
        self.fetch_labels_async().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::bare("http://search.example.com")]
    #[case::trailing_slash("http://search.example.com/")]
    fn endpoints_join_below_base(#[case] base: &str) {
        let client = HttpQueryClient::new(base).expect("client should build");

        assert_eq!(client.labels_url(), "http://search.example.com/labels");
        assert_eq!(
            client.query_url(QueryKind::Visual),
            "http://search.example.com/query-visual"
        );
        assert_eq!(
            client.query_url(QueryKind::Analogue),
            "http://search.example.com/query-analogue"
        );
    }

    #[rstest]
    fn endpoints_keep_path_prefix() {
        let client = HttpQueryClient::new("http://gateway.example.com/patches/")
            .expect("client should build");

        assert_eq!(
            client.query_url(QueryKind::Analogue),
            "http://gateway.example.com/patches/query-analogue"
        );
    }

    #[rstest]
    fn invalid_base_url_is_rejected() {
        let err = HttpQueryClient::new("not a url").expect_err("should fail");

        assert!(matches!(err, ClientBuildError::InvalidBaseUrl { .. }));
    }

    #[rstest]
    fn config_defaults() {
        let config = HttpQueryClientConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpQueryClientConfig::new("http://example.com")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }
}
