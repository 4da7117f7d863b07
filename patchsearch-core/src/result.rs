//! Search results returned by the backend.

use log::warn;

use crate::client::QueryError;

/// Patch names matching a query, in backend order.
///
/// The backend may include `null` entries; they count towards
/// [`Self::reported_count`] but are skipped by [`Self::names`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResult {
    entries: Vec<Option<String>>,
}

impl QueryResult {
    /// Wrap the backend's entries.
    #[must_use]
    pub const fn new(entries: Vec<Option<String>>) -> Self {
        Self { entries }
    }

    /// A result without entries.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of entries the backend reported, nulls included.
    #[must_use]
    pub const fn reported_count(&self) -> usize {
        self.entries.len()
    }

    /// Non-null patch names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(Option::as_deref)
    }

    /// Whether at least one non-null name is present.
    #[must_use]
    pub fn has_matches(&self) -> bool {
        self.names().next().is_some()
    }

    /// Raw entries, nulls included.
    #[must_use]
    pub fn entries(&self) -> &[Option<String>] {
        &self.entries
    }

    /// Collapse a failed submission into an empty result.
    ///
    /// Reproduces the historic behaviour in which transport and decode
    /// failures looked like "no matches". The failure is logged.
    #[must_use]
    pub fn or_empty(outcome: Result<Self, QueryError>) -> Self {
        outcome.unwrap_or_else(|err| {
            warn!("query failed, showing no results: {err}");
            Self::empty()
        })
    }
}

impl FromIterator<Option<String>> for QueryResult {
    fn from_iter<I: IntoIterator<Item = Option<String>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn nulls_are_counted_but_not_named() {
        let result: QueryResult = [Some("S2A_1".to_owned()), None, Some("S2B_7".to_owned())]
            .into_iter()
            .collect();
        assert_eq!(result.reported_count(), 3);
        assert_eq!(result.names().collect::<Vec<_>>(), ["S2A_1", "S2B_7"]);
        assert!(result.has_matches());
    }

    #[rstest]
    fn only_nulls_have_no_matches() {
        let result = QueryResult::new(vec![None, None]);
        assert_eq!(result.reported_count(), 2);
        assert!(!result.has_matches());
    }

    #[rstest]
    fn failures_collapse_to_empty() {
        let failed = Err(QueryError::Network {
            url: "http://localhost:8080/query-visual".to_owned(),
            message: "connection refused".to_owned(),
        });
        assert_eq!(QueryResult::or_empty(failed), QueryResult::empty());
    }

    #[rstest]
    fn successes_pass_through_or_empty() {
        let result = QueryResult::new(vec![Some("S2A_1".to_owned())]);
        assert_eq!(QueryResult::or_empty(Ok(result.clone())), result);
    }
}
