//! In-memory `QueryClient` used by unit and behaviour tests.

use std::cell::RefCell;

use crate::{LabelCatalog, QueryClient, QueryError, QueryRequest, QueryResult};

/// `QueryClient` returning canned responses and recording every request.
#[derive(Debug)]
pub struct StubQueryClient {
    response: Result<QueryResult, QueryError>,
    catalog: Result<LabelCatalog, QueryError>,
    requests: RefCell<Vec<QueryRequest>>,
}

impl StubQueryClient {
    /// Answer every query with `result` and serve the BigEarthNet catalogue.
    #[must_use]
    pub fn with_result(result: QueryResult) -> Self {
        Self {
            response: Ok(result),
            catalog: Ok(LabelCatalog::bigearthnet()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Answer every query with matches named `names`.
    #[must_use]
    pub fn with_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_result(names.into_iter().map(|name| Some(name.into())).collect())
    }

    /// Fail every call with `error`.
    #[must_use]
    pub fn with_error(error: QueryError) -> Self {
        Self {
            response: Err(error.clone()),
            catalog: Err(error),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Serve `catalog` from [`QueryClient::fetch_labels`].
    #[must_use]
    pub fn with_catalog(mut self, catalog: LabelCatalog) -> Self {
        self.catalog = Ok(catalog);
        self
    }

    /// Requests submitted so far, oldest first.
    #[must_use]
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests.borrow().clone()
    }
}

impl QueryClient for StubQueryClient {
    fn submit(&self, request: &QueryRequest) -> Result<QueryResult, QueryError> {
        self.requests.borrow_mut().push(request.clone());
        self.response.clone()
    }

    fn fetch_labels(&self) -> Result<LabelCatalog, QueryError> {
        self.catalog.clone()
    }
}
