//! Boundary to the search backend.
//!
//! [`QueryClient`] abstracts the transport so the payload logic can be
//! exercised without a running backend. Failures are reported as
//! [`QueryError`] rather than folded into empty results; callers that want
//! the historic behaviour use [`crate::QueryResult::or_empty`].

use thiserror::Error;

use crate::labels::LabelCatalog;
use crate::query::QueryRequest;
use crate::result::QueryResult;

/// Errors from [`QueryClient`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The backend could not be reached.
    #[error("request to {url} failed: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The backend did not answer in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The backend answered with a non-success status.
    #[error("request to {url} returned HTTP {status}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to decode response from {url}: {message}")]
    Decode {
        /// Requested URL.
        url: String,
        /// Decoder error description.
        message: String,
    },
}

/// Submit queries and fetch the label catalogue.
///
/// One call per user action. Implementations do not retry.
///
/// # Examples
///
/// ```rust
/// use patchsearch_core::{LabelCatalog, QueryClient, QueryError, QueryRequest, QueryResult};
///
/// struct NoMatches;
///
/// impl QueryClient for NoMatches {
///     fn submit(&self, _request: &QueryRequest) -> Result<QueryResult, QueryError> {
///         Ok(QueryResult::empty())
///     }
///
///     fn fetch_labels(&self) -> Result<LabelCatalog, QueryError> {
///         Ok(LabelCatalog::bigearthnet())
///     }
/// }
///
/// let catalog = NoMatches.fetch_labels()?;
/// assert_eq!(catalog.len(), 44);
/// # Ok::<(), QueryError>(())
/// ```
pub trait QueryClient {
    /// Send `request` to the endpoint matching its kind.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] on transport, status or decode failures.
    fn submit(&self, request: &QueryRequest) -> Result<QueryResult, QueryError>;

    /// Load the label catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] on transport, status or decode failures.
    fn fetch_labels(&self) -> Result<LabelCatalog, QueryError>;
}
