//! Test helpers: a shared stub backend and temporary geometry files.

use std::cell::RefCell;
use std::rc::Rc;

use camino::{Utf8Path, Utf8PathBuf};
use patchsearch_core::test_support::StubQueryClient;
use patchsearch_core::{LabelCatalog, QueryClient, QueryError, QueryRequest, QueryResult};
use tempfile::TempDir;

use crate::CliError;
use crate::client::QueryClientBuilder;

/// Hands out clones of one stub so tests can inspect it after a run.
#[derive(Debug)]
struct SharedStub(Rc<StubQueryClient>);

impl QueryClient for SharedStub {
    fn submit(&self, request: &QueryRequest) -> Result<QueryResult, QueryError> {
        self.0.submit(request)
    }

    fn fetch_labels(&self) -> Result<LabelCatalog, QueryError> {
        self.0.fetch_labels()
    }
}

#[derive(Debug)]
pub(super) struct StubClientBuilder {
    client: Rc<StubQueryClient>,
    base_urls: RefCell<Vec<String>>,
}

impl StubClientBuilder {
    pub(super) fn new(client: StubQueryClient) -> Self {
        Self {
            client: Rc::new(client),
            base_urls: RefCell::new(Vec::new()),
        }
    }

    pub(super) fn requests(&self) -> Vec<QueryRequest> {
        self.client.requests()
    }

    /// Base URLs clients were built for; empty when no client was built.
    pub(super) fn base_urls(&self) -> Vec<String> {
        self.base_urls.borrow().clone()
    }
}

impl QueryClientBuilder for StubClientBuilder {
    fn build(&self, base_url: &str) -> Result<Box<dyn QueryClient>, CliError> {
        self.base_urls.borrow_mut().push(base_url.to_owned());
        Ok(Box::new(SharedStub(Rc::clone(&self.client))))
    }
}

pub(super) fn small_catalog() -> LabelCatalog {
    LabelCatalog::new(["Airports", "Vineyards", "Pastures"])
}

/// Temporary directory that lives as long as the paths inside it.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &[u8]) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents);
        path
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path.as_std_path(), contents).expect("write test file");
}

pub(super) const SQUARE_GEOMETRY: &str = r#"{
    "type": "Polygon",
    "coordinates": [[[10.0, 50.0], [11.0, 50.0], [11.0, 49.0], [10.0, 49.0], [10.0, 50.0]]]
}"#;
