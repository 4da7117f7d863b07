//! Assemble query requests from drawn shapes or typed box fields.
//!
//! Analogue submissions run through [`AnalogueState`]:
//!
//! ```text
//! Idle --submit--> ExclusiveLabelQuery | ValidatedBoxQuery | RejectedInvalidBox
//! ```
//!
//! `RejectedInvalidBox` carries no request, so an invalid box can never reach
//! the network; the caller shows the violations instead.

use log::debug;
use thiserror::Error;

use crate::bbox::{BoundingBox, BoundingBoxError, BoundingBoxFields, BoxRule};
use crate::labels::{LabelCatalog, resolve_labels};
use crate::query::{Geometry, QueryPayload, QueryRequest, QueryType, SpatialOperator};

/// How blank box fields are told apart from coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExclusivityPolicy {
    /// Label-only query when all four fields are absent. A zero is a
    /// coordinate.
    #[default]
    AbsentOnly,
    /// Label-only query when every field is absent, zero or NaN.
    ///
    /// Matches the historic form, which cannot express a box whose corners
    /// all lie on the equator or prime meridian.
    LegacyFalsy,
}

impl ExclusivityPolicy {
    /// Whether `fields` describe a label-only query.
    #[must_use]
    pub fn is_exclusive(self, fields: &BoundingBoxFields) -> bool {
        match self {
            Self::AbsentOnly => fields.all_absent(),
            Self::LegacyFalsy => fields.all_falsy(),
        }
    }
}

/// Outcome of an analogue submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AnalogueState {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// No spatial filter; labels only.
    ExclusiveLabelQuery(QueryRequest),
    /// The box passed validation.
    ValidatedBoxQuery(QueryRequest),
    /// The box failed validation. Terminal for this attempt.
    RejectedInvalidBox {
        /// Every rule the box violates.
        violations: Vec<BoxRule>,
    },
}

/// Why an [`AnalogueState`] holds no submittable request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalogueRejection {
    /// The form has not been submitted.
    #[error("analogue query has not been submitted")]
    NotSubmitted,
    /// The typed box is invalid.
    #[error(transparent)]
    InvalidBox(#[from] BoundingBoxError),
}

impl AnalogueState {
    /// Submit `fields` and `selected` labels through `builder`.
    ///
    /// Each submission starts from scratch, so calling this on any state,
    /// including a rejected one, simply evaluates the new input.
    #[must_use]
    pub fn submit<S: AsRef<str>>(
        builder: &QueryPayloadBuilder<'_>,
        fields: &BoundingBoxFields,
        selected: &[S],
    ) -> Self {
        builder.analogue_from_fields(fields, selected)
    }

    /// Whether the state holds a request that may be sent.
    #[must_use]
    pub const fn is_submittable(&self) -> bool {
        matches!(
            self,
            Self::ExclusiveLabelQuery(_) | Self::ValidatedBoxQuery(_)
        )
    }

    /// The request to send.
    ///
    /// # Errors
    ///
    /// Returns [`AnalogueRejection::InvalidBox`] for rejected boxes and
    /// [`AnalogueRejection::NotSubmitted`] while idle.
    pub fn into_request(self) -> Result<QueryRequest, AnalogueRejection> {
        match self {
            Self::ExclusiveLabelQuery(request) | Self::ValidatedBoxQuery(request) => Ok(request),
            Self::RejectedInvalidBox { violations } => {
                Err(BoundingBoxError::Invalid { violations }.into())
            }
            Self::Idle => Err(AnalogueRejection::NotSubmitted),
        }
    }
}

/// Builds [`QueryRequest`] values against a fixed catalogue and query
/// options.
///
/// # Examples
///
/// ```
/// use patchsearch_core::{
///     AnalogueState, BoundingBoxFields, LabelCatalog, QueryPayloadBuilder, QueryType,
///     SpatialOperator,
/// };
///
/// let catalog = LabelCatalog::new(["Airports", "Vineyards"]);
/// let builder =
///     QueryPayloadBuilder::new(&catalog, QueryType::default(), SpatialOperator::default());
/// let state = builder.analogue_from_fields::<&str>(&BoundingBoxFields::blank(), &[]);
/// let AnalogueState::ExclusiveLabelQuery(request) = state else {
///     panic!("blank fields should produce a label-only query");
/// };
/// assert!(request.payload().geometry.is_empty_polygon());
/// assert_eq!(request.payload().labels.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct QueryPayloadBuilder<'a> {
    catalog: &'a LabelCatalog,
    query_type: QueryType,
    spatial_operator: SpatialOperator,
    exclusivity: ExclusivityPolicy,
}

impl<'a> QueryPayloadBuilder<'a> {
    /// Create a builder using [`ExclusivityPolicy::AbsentOnly`].
    #[must_use]
    pub const fn new(
        catalog: &'a LabelCatalog,
        query_type: QueryType,
        spatial_operator: SpatialOperator,
    ) -> Self {
        Self {
            catalog,
            query_type,
            spatial_operator,
            exclusivity: ExclusivityPolicy::AbsentOnly,
        }
    }

    /// Choose how blank box fields are detected.
    #[must_use]
    pub fn with_exclusivity(mut self, exclusivity: ExclusivityPolicy) -> Self {
        self.exclusivity = exclusivity;
        self
    }

    /// The catalogue labels fall back to.
    #[must_use]
    pub const fn catalog(&self) -> &LabelCatalog {
        self.catalog
    }

    fn payload<S: AsRef<str>>(&self, geometry: Geometry, selected: &[S]) -> QueryPayload {
        QueryPayload {
            geometry,
            labels: resolve_labels(selected, self.catalog),
            query_type: self.query_type.clone(),
            spatial_operator: self.spatial_operator.clone(),
        }
    }

    /// Build a visual query around a drawn geometry.
    ///
    /// The geometry is passed through untouched.
    #[must_use]
    pub fn visual_from_geometry<S: AsRef<str>>(
        &self,
        geometry: Geometry,
        selected: &[S],
    ) -> QueryRequest {
        QueryRequest::Visual(self.payload(geometry, selected))
    }

    /// Build an analogue query from typed corner fields.
    ///
    /// Blank fields (per the builder's [`ExclusivityPolicy`]) yield a
    /// label-only query without consulting the validator. Otherwise the box
    /// must pass every rule; a failing box yields
    /// [`AnalogueState::RejectedInvalidBox`].
    #[must_use]
    pub fn analogue_from_fields<S: AsRef<str>>(
        &self,
        fields: &BoundingBoxFields,
        selected: &[S],
    ) -> AnalogueState {
        if self.exclusivity.is_exclusive(fields) {
            debug!("analogue query has no box; filtering by labels only");
            let payload = self.payload(Geometry::empty_polygon(), selected);
            return AnalogueState::ExclusiveLabelQuery(QueryRequest::Analogue(payload));
        }

        let (ulx, uly, lrx, lry) = fields.to_numeric();
        match BoundingBox::new(ulx, uly, lrx, lry) {
            Ok(bbox) => {
                let payload = self.payload(Geometry::polygon(&bbox.ring()), selected);
                AnalogueState::ValidatedBoxQuery(QueryRequest::Analogue(payload))
            }
            Err(BoundingBoxError::Invalid { violations }) => {
                debug!("rejecting analogue box {fields:?}: {violations:?}");
                AnalogueState::RejectedInvalidBox { violations }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};

    use crate::query::QueryKind;

    #[fixture]
    fn catalog() -> LabelCatalog {
        LabelCatalog::new(["Airports", "Vineyards", "Pastures"])
    }

    fn builder(catalog: &LabelCatalog) -> QueryPayloadBuilder<'_> {
        QueryPayloadBuilder::new(
            catalog,
            QueryType::new(QueryType::CONTAINS_ALL),
            SpatialOperator::new(SpatialOperator::GEO_WITHIN),
        )
    }

    #[rstest]
    fn blank_fields_build_label_only_query(catalog: LabelCatalog) {
        let state =
            builder(&catalog).analogue_from_fields(&BoundingBoxFields::blank(), &["Pastures"]);
        let AnalogueState::ExclusiveLabelQuery(request) = state else {
            panic!("expected a label-only query, got {state:?}");
        };
        assert_eq!(request.kind(), QueryKind::Analogue);
        assert!(request.payload().geometry.is_empty_polygon());
        assert_eq!(request.payload().labels.as_slice(), ["Pastures"]);
    }

    #[rstest]
    fn valid_box_builds_closed_ring(catalog: LabelCatalog) {
        let fields = BoundingBoxFields::new(-10.0, 10.0, 10.0, -10.0);
        let state = builder(&catalog).analogue_from_fields::<&str>(&fields, &[]);
        assert!(state.is_submittable());
        let AnalogueState::ValidatedBoxQuery(request) = state else {
            panic!("expected a validated box, got {state:?}");
        };
        let ring = request
            .payload()
            .geometry
            .exterior_ring()
            .expect("polygon ring");
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), Some(&Coord { x: -10.0, y: 10.0 }));
        assert_eq!(ring.first(), ring.last());
        assert_eq!(request.payload().labels.as_slice(), catalog.labels());
        assert_eq!(request.payload().query_type.as_str(), "CONTAINS_ALL");
        assert_eq!(request.payload().spatial_operator.as_str(), "GEO_WITHIN");
    }

    #[rstest]
    fn invalid_box_is_rejected_without_request(catalog: LabelCatalog) {
        let fields = BoundingBoxFields::new(10.0, 10.0, -10.0, -10.0);
        let state = builder(&catalog).analogue_from_fields::<&str>(&fields, &[]);
        assert!(!state.is_submittable());
        let err = state.into_request().expect_err("rejected box has no request");
        let AnalogueRejection::InvalidBox(BoundingBoxError::Invalid { violations }) = err else {
            panic!("expected an invalid box, got {err:?}");
        };
        assert!(violations.contains(&BoxRule::UpperLeftEastOfLowerRight));
    }

    #[rstest]
    fn partially_blank_fields_fail_numeric_rule(catalog: LabelCatalog) {
        let fields = BoundingBoxFields {
            ulx: Some(-10.0),
            uly: Some(10.0),
            ..BoundingBoxFields::blank()
        };
        let state = builder(&catalog).analogue_from_fields::<&str>(&fields, &[]);
        let AnalogueState::RejectedInvalidBox { violations } = state else {
            panic!("expected rejection, got {state:?}");
        };
        assert!(violations.contains(&BoxRule::NonNumeric));
    }

    #[rstest]
    fn zero_box_is_a_coordinate_by_default(catalog: LabelCatalog) {
        let fields = BoundingBoxFields::new(0.0, 0.0, 0.0, 0.0);
        let state = builder(&catalog).analogue_from_fields::<&str>(&fields, &[]);
        assert!(matches!(state, AnalogueState::RejectedInvalidBox { .. }));
    }

    #[rstest]
    fn zero_box_is_blank_under_legacy_policy(catalog: LabelCatalog) {
        let fields = BoundingBoxFields::new(0.0, 0.0, 0.0, 0.0);
        let state = builder(&catalog)
            .with_exclusivity(ExclusivityPolicy::LegacyFalsy)
            .analogue_from_fields::<&str>(&fields, &[]);
        assert!(matches!(state, AnalogueState::ExclusiveLabelQuery(_)));
    }

    #[rstest]
    fn box_touching_origin_is_kept_by_default(catalog: LabelCatalog) {
        let fields = BoundingBoxFields::new(0.0, 5.0, 5.0, 0.0);
        let state = builder(&catalog).analogue_from_fields::<&str>(&fields, &[]);
        assert!(matches!(state, AnalogueState::ValidatedBoxQuery(_)));
    }

    #[rstest]
    fn drawn_geometry_passes_through(catalog: LabelCatalog) {
        let geometry = Geometry::from_value(serde_json::json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
        }))
        .expect("typed geometry");
        let request = builder(&catalog).visual_from_geometry::<&str>(geometry.clone(), &[]);
        assert_eq!(request.kind(), QueryKind::Visual);
        assert_eq!(request.payload().geometry, geometry);
        assert_eq!(request.payload().labels, catalog.to_label_set());
    }

    #[rstest]
    fn idle_state_has_no_request() {
        let err = AnalogueState::default()
            .into_request()
            .expect_err("idle has no request");
        assert_eq!(err, AnalogueRejection::NotSubmitted);
    }

    #[rstest]
    fn resubmitting_replaces_a_rejection(catalog: LabelCatalog) {
        let builder = builder(&catalog);
        let rejected = AnalogueState::submit::<&str>(
            &builder,
            &BoundingBoxFields::new(10.0, 10.0, -10.0, -10.0),
            &[],
        );
        assert!(!rejected.is_submittable());
        let accepted = AnalogueState::submit(
            &builder,
            &BoundingBoxFields::new(-10.0, 10.0, 10.0, -10.0),
            &["Airports", "Airports"],
        );
        let request = accepted.into_request().expect("valid box");
        assert_eq!(request.payload().labels.as_slice(), ["Airports"]);
    }
}
