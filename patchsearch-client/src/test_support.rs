//! Test utilities for async query clients.
//!
//! [`ScriptedClient`] answers [`AsyncQueryClient`] calls from canned data and
//! can hold selected requests open forever, which makes supersession
//! deterministic without timers.

use async_trait::async_trait;
use patchsearch_core::{LabelCatalog, QueryError, QueryRequest, QueryResult};
use tokio::sync::Mutex;

use crate::AsyncQueryClient;

/// Scripted [`AsyncQueryClient`] for tests.
///
/// Every request is recorded before it is answered or held.
#[derive(Debug)]
pub struct ScriptedClient {
    response: Result<QueryResult, QueryError>,
    catalog: Result<LabelCatalog, QueryError>,
    held_label: Option<String>,
    requests: Mutex<Vec<QueryRequest>>,
}

impl ScriptedClient {
    /// Answer every query with matches named `names`.
    #[must_use]
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            response: Ok(names.into_iter().map(|name| Some(name.into())).collect()),
            catalog: Ok(LabelCatalog::bigearthnet()),
            held_label: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fail every call with `error`.
    #[must_use]
    pub fn with_error(error: QueryError) -> Self {
        Self {
            response: Err(error.clone()),
            catalog: Err(error),
            held_label: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Never answer queries whose labels include `label`.
    #[must_use]
    pub fn holding(mut self, label: impl Into<String>) -> Self {
        self.held_label = Some(label.into());
        self
    }

    /// Requests received so far, oldest first.
    pub async fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().await.clone()
    }

    fn holds(&self, request: &QueryRequest) -> bool {
        self.held_label
            .as_deref()
            .is_some_and(|label| request.payload().labels.contains(label))
    }
}

#[async_trait]
impl AsyncQueryClient for ScriptedClient {
    async fn submit(&self, request: &QueryRequest) -> Result<QueryResult, QueryError> {
        self.requests.lock().await.push(request.clone());
        if self.holds(request) {
            std::future::pending::<()>().await;
        }
        self.response.clone()
    }

    async fn fetch_labels(&self) -> Result<LabelCatalog, QueryError> {
        self.catalog.clone()
    }
}
