//! Response bodies returned by the search backend.
//!
//! Query endpoints answer with `{"patchNames": [string | null, ...]}`; the
//! label endpoint answers with a bare array of strings.

use patchsearch_core::QueryResult;
use serde::Deserialize;

/// Body of `/query-visual` and `/query-analogue` responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchNamesResponse {
    /// Matching patch names. Absent or `null` means no matches.
    #[serde(default)]
    pub patch_names: Option<Vec<Option<String>>>,
}

impl From<PatchNamesResponse> for QueryResult {
    fn from(value: PatchNamesResponse) -> Self {
        Self::new(value.patch_names.unwrap_or_default())
    }
}

/// Body of `/labels` responses.
pub type LabelsResponse = Vec<String>;
