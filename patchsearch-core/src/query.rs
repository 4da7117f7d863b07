//! Query requests sent to the search backend.
//!
//! Both query kinds share one wire shape:
//!
//! ```json
//! {
//!   "geometry": { "type": "Polygon", "coordinates": [[[lon, lat], ...]] },
//!   "labels": ["Airports"],
//!   "queryType": "CONTAINS_SOME",
//!   "geospatialQueryOperator": "GEO_INTERSECTS"
//! }
//! ```
//!
//! The request variant selects the endpoint it is posted to.

use std::fmt;

use geo::Coord;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::labels::LabelSet;

/// Label-matching mode of a query.
///
/// Tokens are opaque: the backend owns the set of supported modes, so any
/// string is accepted here. The constants name the modes known at the time
/// of writing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryType(String);

impl QueryType {
    /// Patches carrying every requested label, possibly more.
    pub const CONTAINS_ALL: &'static str = "CONTAINS_ALL";
    /// Patches carrying exactly the requested labels.
    pub const CONTAINS_ONLY: &'static str = "CONTAINS_ONLY";
    /// Patches carrying at least one requested label.
    pub const CONTAINS_SOME: &'static str = "CONTAINS_SOME";

    /// Wrap a token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for QueryType {
    fn default() -> Self {
        Self::new(Self::CONTAINS_SOME)
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Spatial predicate applied between patches and the query geometry.
///
/// Like [`QueryType`], tokens are opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpatialOperator(String);

impl SpatialOperator {
    /// Patches intersecting the geometry.
    pub const GEO_INTERSECTS: &'static str = "GEO_INTERSECTS";
    /// Patches fully inside the geometry.
    pub const GEO_WITHIN: &'static str = "GEO_WITHIN";

    /// Wrap a token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SpatialOperator {
    fn default() -> Self {
        Self::new(Self::GEO_INTERSECTS)
    }
}

impl fmt::Display for SpatialOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors returned by [`Geometry::from_value`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The value is not a JSON object.
    #[error("geometry must be a JSON object")]
    NotAnObject,
    /// The object has no string `type` member.
    #[error("geometry is missing a string \"type\" member")]
    MissingType,
}

/// A GeoJSON geometry object.
///
/// Drawn geometries pass through untouched; only the presence of a `type`
/// member is checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Geometry(Value);

impl Geometry {
    /// Wrap an arbitrary GeoJSON geometry.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError`] when `value` is not an object with a string
    /// `type` member.
    pub fn from_value(value: Value) -> Result<Self, GeometryError> {
        let object = value.as_object().ok_or(GeometryError::NotAnObject)?;
        if !object.get("type").is_some_and(Value::is_string) {
            return Err(GeometryError::MissingType);
        }
        Ok(Self(value))
    }

    /// A `Polygon` with a single exterior ring.
    #[must_use]
    pub fn polygon(ring: &[Coord]) -> Self {
        let positions: Vec<[f64; 2]> = ring.iter().map(|point| [point.x, point.y]).collect();
        Self(json!({ "type": "Polygon", "coordinates": [positions] }))
    }

    /// A `Polygon` with no coordinates, meaning "no spatial filter".
    #[must_use]
    pub fn empty_polygon() -> Self {
        Self(json!({ "type": "Polygon", "coordinates": [] }))
    }

    /// The GeoJSON `type` member.
    #[must_use]
    pub fn geometry_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Whether this is a `Polygon` without coordinates.
    #[must_use]
    pub fn is_empty_polygon(&self) -> bool {
        self.geometry_type() == Some("Polygon")
            && self
                .0
                .get("coordinates")
                .and_then(Value::as_array)
                .is_some_and(Vec::is_empty)
    }

    /// Exterior ring of a `Polygon`, if the geometry is one.
    #[must_use]
    pub fn exterior_ring(&self) -> Option<Vec<Coord>> {
        if self.geometry_type() != Some("Polygon") {
            return None;
        }
        let ring = self.0.get("coordinates")?.as_array()?.first()?.as_array()?;
        ring.iter()
            .map(|position| {
                let pair = position.as_array()?;
                Some(Coord {
                    x: pair.first()?.as_f64()?,
                    y: pair.get(1)?.as_f64()?,
                })
            })
            .collect()
    }

    /// Borrow the underlying JSON value.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Body shared by both query kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryPayload {
    /// Area to search, or an empty polygon for label-only queries.
    pub geometry: Geometry,
    /// Labels to match; never empty when built from a non-empty catalogue.
    pub labels: LabelSet,
    /// Label-matching mode.
    pub query_type: QueryType,
    /// Spatial predicate.
    #[serde(rename = "geospatialQueryOperator")]
    pub spatial_operator: SpatialOperator,
}

/// Which input produced a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// A shape drawn on the map.
    Visual,
    /// Typed corner coordinates, or labels only.
    Analogue,
}

impl QueryKind {
    /// Endpoint path, relative to the backend's base URL.
    #[must_use]
    pub const fn endpoint_path(self) -> &'static str {
        match self {
            Self::Visual => "query-visual",
            Self::Analogue => "query-analogue",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Visual => "visual",
            Self::Analogue => "analogue",
        })
    }
}

/// A query ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryRequest {
    /// Query from a drawn geometry.
    Visual(QueryPayload),
    /// Query from typed coordinates or labels alone.
    Analogue(QueryPayload),
}

impl QueryRequest {
    /// The query kind.
    #[must_use]
    pub const fn kind(&self) -> QueryKind {
        match self {
            Self::Visual(_) => QueryKind::Visual,
            Self::Analogue(_) => QueryKind::Analogue,
        }
    }

    /// The request body.
    #[must_use]
    pub const fn payload(&self) -> &QueryPayload {
        match self {
            Self::Visual(payload) | Self::Analogue(payload) => payload,
        }
    }

    /// Endpoint path the request is posted to.
    #[must_use]
    pub const fn endpoint_path(&self) -> &'static str {
        self.kind().endpoint_path()
    }
}
