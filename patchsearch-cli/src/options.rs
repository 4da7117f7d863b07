//! Options shared by the query commands once configuration is merged.

use log::debug;
use patchsearch_client::DEFAULT_BASE_URL;
use patchsearch_core::{LabelCatalog, LabelSelection, QueryType, SpatialOperator};

use crate::CliError;

/// Backend location and query settings common to `analogue` and `visual`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct QueryOptions {
    pub(crate) base_url: String,
    pub(crate) labels: Vec<String>,
    pub(crate) query_type: QueryType,
    pub(crate) spatial_operator: SpatialOperator,
}

impl QueryOptions {
    pub(crate) fn resolve(
        base_url: Option<String>,
        labels: Vec<String>,
        query_type: Option<String>,
        operator: Option<String>,
    ) -> Self {
        Self {
            base_url: resolve_base_url(base_url),
            labels,
            query_type: query_type.map(QueryType::new).unwrap_or_default(),
            spatial_operator: operator.map(SpatialOperator::new).unwrap_or_default(),
        }
    }

    /// Check every `--label` against `catalog`, one selector row per label.
    pub(crate) fn select_labels(&self, catalog: &LabelCatalog) -> Result<LabelSelection, CliError> {
        let mut selection = LabelSelection::new();
        for label in &self.labels {
            selection.add_row(catalog, label.as_str())?;
        }
        if selection.is_unrestricted() {
            debug!("no labels selected; matching any of {} labels", catalog.len());
        }
        Ok(selection)
    }
}

pub(crate) fn resolve_base_url(base_url: Option<String>) -> String {
    base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
}
