//! Bounding boxes typed into the analogue query form.
//!
//! A box is described by its upper-left `(ulx, uly)` and lower-right
//! `(lrx, lry)` corners in WGS84 degrees. [`bounding_box_violations`] checks
//! the eight rules a box must satisfy before it may be sent to the search
//! backend; [`is_valid_bounding_box`] is the boolean gate built on top of it.
//! [`BoundingBox`] values can only be constructed from boxes that pass.

use std::fmt;

use geo::{Coord, LineString, Polygon, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Smallest accepted longitude.
pub const MIN_LONGITUDE: f64 = -180.0;
/// Largest accepted longitude.
pub const MAX_LONGITUDE: f64 = 180.0;
/// Smallest accepted latitude.
pub const MIN_LATITUDE: f64 = -90.0;
/// Largest accepted latitude.
pub const MAX_LATITUDE: f64 = 90.0;
/// Exclusive upper bound on a box's longitude span.
///
/// The backend's geospatial query engine cannot evaluate polygons spanning a
/// hemisphere or more without an explicit CRS.
pub const MAX_LONGITUDE_SPAN: f64 = 180.0;

/// A single rule a bounding box must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoxRule {
    /// All four coordinates must be finite numbers.
    NonNumeric,
    /// `ulx` must not lie east of `lrx`.
    UpperLeftEastOfLowerRight,
    /// `ulx` and `lrx` must lie within `[-180, 180]`.
    LongitudeOutOfRange,
    /// `ulx` and `lrx` must differ.
    DegenerateLongitude,
    /// `lrx - ulx` must be strictly less than 180 degrees.
    LongitudeSpanTooWide,
    /// `lry` must not lie north of `uly`.
    LowerRightNorthOfUpperLeft,
    /// `lry` and `uly` must lie within `[-90, 90]`.
    LatitudeOutOfRange,
    /// `uly` and `lry` must differ.
    DegenerateLatitude,
}

impl fmt::Display for BoxRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NonNumeric => "all four coordinates must be finite numbers",
            Self::UpperLeftEastOfLowerRight => {
                "upper-left longitude must not exceed lower-right longitude"
            }
            Self::LongitudeOutOfRange => "longitudes must lie within [-180, 180]",
            Self::DegenerateLongitude => "upper-left and lower-right longitudes must differ",
            Self::LongitudeSpanTooWide => "longitude span must be less than 180 degrees",
            Self::LowerRightNorthOfUpperLeft => {
                "lower-right latitude must not exceed upper-left latitude"
            }
            Self::LatitudeOutOfRange => "latitudes must lie within [-90, 90]",
            Self::DegenerateLatitude => "upper-left and lower-right latitudes must differ",
        };
        f.write_str(text)
    }
}

/// Errors returned by [`BoundingBox::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoundingBoxError {
    /// One or more rules failed.
    #[error("invalid bounding box: {}", join_rules(.violations))]
    Invalid {
        /// Every rule the box violates, in rule order.
        violations: Vec<BoxRule>,
    },
}

fn join_rules(rules: &[BoxRule]) -> String {
    rules
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[expect(
    clippy::float_arithmetic,
    reason = "the hemisphere rule is defined on the longitude difference"
)]
fn longitude_span(ulx: f64, lrx: f64) -> f64 {
    lrx - ulx
}

#[expect(
    clippy::float_cmp,
    reason = "degenerate extents are defined by exact coordinate equality"
)]
fn rule_checks(ulx: f64, uly: f64, lrx: f64, lry: f64) -> [(BoxRule, bool); 8] {
    [
        (
            BoxRule::NonNumeric,
            [ulx, uly, lrx, lry].iter().all(|value| value.is_finite()),
        ),
        (BoxRule::UpperLeftEastOfLowerRight, ulx <= lrx),
        (
            BoxRule::LongitudeOutOfRange,
            ulx >= MIN_LONGITUDE && lrx <= MAX_LONGITUDE,
        ),
        (BoxRule::DegenerateLongitude, ulx != lrx),
        (
            BoxRule::LongitudeSpanTooWide,
            longitude_span(ulx, lrx) < MAX_LONGITUDE_SPAN,
        ),
        (BoxRule::LowerRightNorthOfUpperLeft, lry <= uly),
        (
            BoxRule::LatitudeOutOfRange,
            lry >= MIN_LATITUDE && uly <= MAX_LATITUDE,
        ),
        (BoxRule::DegenerateLatitude, uly != lry),
    ]
}

/// Return every rule the box `(ulx, uly, lrx, lry)` violates.
///
/// The list is empty exactly when [`is_valid_bounding_box`] returns `true`.
///
/// # Examples
///
/// ```
/// use patchsearch_core::{BoxRule, bounding_box_violations};
///
/// let violations = bounding_box_violations(10.0, 10.0, -10.0, -10.0);
/// assert!(violations.contains(&BoxRule::UpperLeftEastOfLowerRight));
/// ```
#[must_use]
pub fn bounding_box_violations(ulx: f64, uly: f64, lrx: f64, lry: f64) -> Vec<BoxRule> {
    rule_checks(ulx, uly, lrx, lry)
        .into_iter()
        .filter_map(|(rule, holds)| (!holds).then_some(rule))
        .collect()
}

/// Return whether the box `(ulx, uly, lrx, lry)` may be submitted.
///
/// # Examples
///
/// ```
/// use patchsearch_core::is_valid_bounding_box;
///
/// assert!(is_valid_bounding_box(-10.0, 10.0, 10.0, -10.0));
/// assert!(!is_valid_bounding_box(-170.0, 80.0, 10.0, -80.0));
/// ```
#[must_use]
pub fn is_valid_bounding_box(ulx: f64, uly: f64, lrx: f64, lry: f64) -> bool {
    rule_checks(ulx, uly, lrx, lry)
        .iter()
        .all(|(_, holds)| *holds)
}

/// A validated, axis-aligned box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    ulx: f64,
    uly: f64,
    lrx: f64,
    lry: f64,
}

impl BoundingBox {
    /// Validates and constructs a [`BoundingBox`].
    ///
    /// # Errors
    ///
    /// Returns [`BoundingBoxError::Invalid`] listing every violated rule.
    pub fn new(ulx: f64, uly: f64, lrx: f64, lry: f64) -> Result<Self, BoundingBoxError> {
        let violations = bounding_box_violations(ulx, uly, lrx, lry);
        if !violations.is_empty() {
            return Err(BoundingBoxError::Invalid { violations });
        }
        Ok(Self { ulx, uly, lrx, lry })
    }

    /// Upper-left corner.
    #[must_use]
    pub const fn upper_left(&self) -> Coord {
        Coord {
            x: self.ulx,
            y: self.uly,
        }
    }

    /// Lower-right corner.
    #[must_use]
    pub const fn lower_right(&self) -> Coord {
        Coord {
            x: self.lrx,
            y: self.lry,
        }
    }

    /// Closed ring tracing the corners clockwise from the upper-left.
    ///
    /// The last point repeats the first, as GeoJSON polygons require.
    #[must_use]
    pub const fn ring(&self) -> [Coord; 5] {
        let upper_left = self.upper_left();
        let lower_right = self.lower_right();
        [
            upper_left,
            Coord {
                x: lower_right.x,
                y: upper_left.y,
            },
            lower_right,
            Coord {
                x: upper_left.x,
                y: lower_right.y,
            },
            upper_left,
        ]
    }

    /// The box as a [`geo::Polygon`] without interior rings.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(LineString::from(self.ring().to_vec()), Vec::new())
    }

    /// Bounding rectangle of [`Self::ring`].
    ///
    /// The ring's opposite corners span it; [`Rect::new`] orders them into
    /// min and max. For a validated box this is the box itself.
    #[must_use]
    pub fn extent(&self) -> Rect {
        Rect::new(self.upper_left(), self.lower_right())
    }
}

/// Raw corner fields as typed by the user.
///
/// `None` means the field was left blank.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBoxFields {
    /// Upper-left longitude.
    pub ulx: Option<f64>,
    /// Upper-left latitude.
    pub uly: Option<f64>,
    /// Lower-right longitude.
    pub lrx: Option<f64>,
    /// Lower-right latitude.
    pub lry: Option<f64>,
}

impl BoundingBoxFields {
    /// Fields with every corner value present.
    #[must_use]
    pub const fn new(ulx: f64, uly: f64, lrx: f64, lry: f64) -> Self {
        Self {
            ulx: Some(ulx),
            uly: Some(uly),
            lrx: Some(lrx),
            lry: Some(lry),
        }
    }

    /// Fields with every corner left blank.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            ulx: None,
            uly: None,
            lrx: None,
            lry: None,
        }
    }

    const fn values(&self) -> [Option<f64>; 4] {
        [self.ulx, self.uly, self.lrx, self.lry]
    }

    /// Whether all four fields are blank.
    #[must_use]
    pub fn all_absent(&self) -> bool {
        self.values().iter().all(Option::is_none)
    }

    /// Whether every field is blank, zero or NaN.
    ///
    /// This is the historic "falsy" reading of the form, under which a box
    /// touching the equator and prime meridian looks blank.
    #[must_use]
    pub fn all_falsy(&self) -> bool {
        self.values()
            .iter()
            .all(|value| value.is_none_or(|v| v == 0.0 || v.is_nan()))
    }

    /// Corner values with blanks mapped to NaN, so they fail the numeric rule.
    #[must_use]
    pub fn to_numeric(&self) -> (f64, f64, f64, f64) {
        let numeric = |value: Option<f64>| value.unwrap_or(f64::NAN);
        (
            numeric(self.ulx),
            numeric(self.uly),
            numeric(self.lrx),
            numeric(self.lry),
        )
    }
}

impl From<BoundingBox> for BoundingBoxFields {
    fn from(value: BoundingBox) -> Self {
        Self::new(value.ulx, value.uly, value.lrx, value.lry)
    }
}
