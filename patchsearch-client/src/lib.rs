//! HTTP transport for the patch search backend.
//!
//! Responsibilities:
//! - Send [`QueryRequest`] bodies to `/query-visual` and `/query-analogue`
//!   and fetch `/labels`.
//! - Map transport, status and decode failures onto [`QueryError`].
//! - Keep displayed results in submission order with [`QuerySession`].
//!
//! Boundaries:
//! - Payload assembly and validation live in `patchsearch-core`.
//! - No retries; one call per user action.

use async_trait::async_trait;
use patchsearch_core::{LabelCatalog, QueryError, QueryRequest, QueryResult};

mod http;
mod session;
mod wire;

#[doc(hidden)]
pub mod test_support;

pub use http::{
    ClientBuildError, DEFAULT_BASE_URL, DEFAULT_USER_AGENT, HttpQueryClient, HttpQueryClientConfig,
};
pub use session::{QuerySession, SessionOutcome};
pub use wire::{LabelsResponse, PatchNamesResponse};

/// Async counterpart of [`patchsearch_core::QueryClient`].
///
/// Futures are `Send` so sessions can be driven from spawned tasks.
#[async_trait]
pub trait AsyncQueryClient: Send + Sync {
    /// Send `request` to the endpoint matching its kind.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] on transport, status or decode failures.
    async fn submit(&self, request: &QueryRequest) -> Result<QueryResult, QueryError>;

    /// Load the label catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] on transport, status or decode failures.
    async fn fetch_labels(&self) -> Result<LabelCatalog, QueryError>;
}
