//! Category labels: the catalogue, resolved label sets and selector rows.
//!
//! The catalogue is loaded once and then only read. It is passed explicitly
//! to [`resolve_labels`] and to the payload builder rather than held in
//! global state.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Labels of the BigEarthNet land-cover nomenclature served by the backend.
pub const BIGEARTHNET_LABELS: [&str; 44] = [
    "Agro-forestry areas",
    "Airports",
    "Annual crops associated with permanent crops",
    "Bare rock",
    "Beaches, dunes, sands",
    "Broad-leaved forest",
    "Burnt areas",
    "Coastal lagoons",
    "Complex cultivation patterns",
    "Coniferous forest",
    "Construction sites",
    "Continuous urban fabric",
    "Discontinuous urban fabric",
    "Dump sites",
    "Estuaries",
    "Fruit trees and berry plantations",
    "Glaciers and perpetual snow",
    "Green urban areas",
    "Industrial or commercial units",
    "Inland marshes",
    "Intertidal flats",
    "Land principally occupied by agriculture, with significant areas of natural vegetation",
    "Mineral extraction sites",
    "Mixed forest",
    "Moors and heathland",
    "Natural grassland",
    "Non-irrigated arable land",
    "Olive groves",
    "Pastures",
    "Peatbogs",
    "Permanently irrigated land",
    "Port areas",
    "Rice fields",
    "Road and rail networks and associated land",
    "Salines",
    "Salt marshes",
    "Sclerophyllous vegetation",
    "Sea and ocean",
    "Sparsely vegetated areas",
    "Sport and leisure facilities",
    "Transitional woodland/shrub",
    "Vineyards",
    "Water bodies",
    "Water courses",
];

/// Unique labels in first-seen order.
///
/// Serialises as a plain JSON array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet(Vec<String>);

impl LabelSet {
    /// Borrow the labels in order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Number of labels.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set holds no labels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `label` is a member.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|known| known == label)
    }
}

impl<S> FromIterator<S> for LabelSet
where
    S: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        Self(
            iter.into_iter()
                .map(Into::into)
                .filter(|label: &String| seen.insert(label.clone()))
                .collect(),
        )
    }
}

impl IntoIterator for LabelSet {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// The read-only list of labels the backend knows.
///
/// # Examples
///
/// ```
/// use patchsearch_core::LabelCatalog;
///
/// let catalog = LabelCatalog::new(["Airports", "Vineyards", "Airports"]);
/// assert_eq!(catalog.len(), 2);
/// assert!(catalog.contains("Vineyards"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelCatalog {
    labels: LabelSet,
}

impl LabelCatalog {
    /// Build a catalogue, dropping duplicate entries.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().collect(),
        }
    }

    /// The 44-label BigEarthNet catalogue.
    #[must_use]
    pub fn bigearthnet() -> Self {
        Self::new(BIGEARTHNET_LABELS)
    }

    /// Labels in catalogue order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        self.labels.as_slice()
    }

    /// Number of labels.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the catalogue is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether `label` is known.
    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    /// The catalogue as a [`LabelSet`].
    #[must_use]
    pub fn to_label_set(&self) -> LabelSet {
        self.labels.clone()
    }
}

/// Resolve the labels a query filters on.
///
/// Duplicates in `selected` are dropped, keeping first occurrences. When
/// nothing is selected the whole catalogue is returned: no filter means
/// "match any label", not "match nothing".
///
/// # Examples
///
/// ```
/// use patchsearch_core::{LabelCatalog, resolve_labels};
///
/// let catalog = LabelCatalog::new(["a", "b", "c"]);
/// let labels = resolve_labels(&["a", "a", "b"], &catalog);
/// assert_eq!(labels.as_slice(), ["a", "b"]);
/// assert_eq!(resolve_labels::<&str>(&[], &catalog), catalog.to_label_set());
/// ```
#[must_use]
pub fn resolve_labels<S: AsRef<str>>(selected: &[S], catalog: &LabelCatalog) -> LabelSet {
    let labels: LabelSet = selected.iter().map(|label| label.as_ref()).collect();
    if labels.is_empty() {
        catalog.to_label_set()
    } else {
        labels
    }
}

/// Errors returned by [`LabelSelection::add_row`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelSelectionError {
    /// Every catalogue label already has a row.
    #[error("cannot add more than {limit} label rows")]
    TooManyRows {
        /// Catalogue size, which caps the number of rows.
        limit: usize,
    },
    /// The label is not part of the catalogue.
    #[error("unknown label {label:?}")]
    UnknownLabel {
        /// Rejected label.
        label: String,
    },
}

/// Active label-selector rows.
///
/// Each row holds one catalogue label. Rows may repeat a label; duplicates
/// are removed when the selection is resolved. With no rows the selection is
/// unrestricted and resolves to the full catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSelection {
    rows: Vec<String>,
}

impl LabelSelection {
    /// A selection with no active rows.
    #[must_use]
    pub const fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Append a row selecting `label` and return its index.
    ///
    /// # Errors
    ///
    /// Returns [`LabelSelectionError::UnknownLabel`] for labels outside the
    /// catalogue, and [`LabelSelectionError::TooManyRows`] once there are as
    /// many rows as catalogue labels.
    pub fn add_row(
        &mut self,
        catalog: &LabelCatalog,
        label: impl Into<String>,
    ) -> Result<usize, LabelSelectionError> {
        let owned = label.into();
        if !catalog.contains(&owned) {
            return Err(LabelSelectionError::UnknownLabel { label: owned });
        }
        if self.rows.len() >= catalog.len() {
            return Err(LabelSelectionError::TooManyRows {
                limit: catalog.len(),
            });
        }
        self.rows.push(owned);
        Ok(self.rows.len() - 1)
    }

    /// Remove the row at `index`, returning its label.
    pub fn remove_row(&mut self, index: usize) -> Option<String> {
        (index < self.rows.len()).then(|| self.rows.remove(index))
    }

    /// Number of active rows.
    #[must_use]
    pub const fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether no rows are active, i.e. all labels are selected.
    #[must_use]
    pub const fn is_unrestricted(&self) -> bool {
        self.rows.is_empty()
    }

    /// Labels of the active rows, in row order.
    #[must_use]
    pub fn selected(&self) -> &[String] {
        &self.rows
    }

    /// Resolve the rows against `catalog`.
    #[must_use]
    pub fn resolve(&self, catalog: &LabelCatalog) -> LabelSet {
        resolve_labels(&self.rows, catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn catalog() -> LabelCatalog {
        LabelCatalog::new(["Airports", "Vineyards", "Pastures"])
    }

    #[rstest]
    fn empty_selection_resolves_to_catalog(catalog: LabelCatalog) {
        let labels = resolve_labels::<String>(&[], &catalog);
        assert_eq!(labels.as_slice(), catalog.labels());
    }

    #[rstest]
    fn duplicates_are_dropped_in_first_seen_order(catalog: LabelCatalog) {
        let labels = resolve_labels(&["b", "a", "b", "a"], &catalog);
        assert_eq!(labels.as_slice(), ["b", "a"]);
    }

    #[rstest]
    fn selection_ignores_catalog_when_non_empty() {
        let labels = resolve_labels(&["a", "a", "b"], &LabelCatalog::default());
        assert_eq!(labels.len(), 2);
        assert!(labels.contains("a") && labels.contains("b"));
    }

    #[rstest]
    fn label_set_serialises_as_array() {
        let labels: LabelSet = ["x", "y"].into_iter().collect();
        let json = serde_json::to_string(&labels).expect("serialise labels");
        assert_eq!(json, r#"["x","y"]"#);
    }

    #[rstest]
    fn bigearthnet_catalog_has_every_label() {
        let catalog = LabelCatalog::bigearthnet();
        assert_eq!(catalog.len(), 44);
        assert!(catalog.contains("Sea and ocean"));
    }

    #[rstest]
    fn rows_are_capped_at_catalog_size(catalog: LabelCatalog) {
        let mut selection = LabelSelection::new();
        for _ in 0..catalog.len() {
            selection
                .add_row(&catalog, "Airports")
                .expect("row within limit");
        }
        let err = selection
            .add_row(&catalog, "Vineyards")
            .expect_err("row over limit");
        assert_eq!(err, LabelSelectionError::TooManyRows { limit: 3 });
        assert_eq!(selection.row_count(), 3);
    }

    #[rstest]
    fn unknown_labels_are_rejected(catalog: LabelCatalog) {
        let mut selection = LabelSelection::new();
        let err = selection
            .add_row(&catalog, "Glaciers")
            .expect_err("label outside catalogue");
        assert!(matches!(err, LabelSelectionError::UnknownLabel { .. }));
        assert!(selection.is_unrestricted());
    }

    #[rstest]
    fn empty_catalog_reports_unknown_label() {
        let mut selection = LabelSelection::new();
        let err = selection
            .add_row(&LabelCatalog::default(), "Airports")
            .expect_err("nothing to select from");
        assert_eq!(
            err,
            LabelSelectionError::UnknownLabel {
                label: "Airports".to_owned()
            }
        );
    }

    #[rstest]
    fn removing_last_row_restores_all_labels(catalog: LabelCatalog) {
        let mut selection = LabelSelection::new();
        let index = selection
            .add_row(&catalog, "Pastures")
            .expect("row within limit");
        assert!(!selection.is_unrestricted());
        assert_eq!(selection.resolve(&catalog).as_slice(), ["Pastures"]);

        assert_eq!(selection.remove_row(index).as_deref(), Some("Pastures"));
        assert!(selection.is_unrestricted());
        assert_eq!(selection.resolve(&catalog), catalog.to_label_set());
        assert_eq!(selection.remove_row(0), None);
    }
}
