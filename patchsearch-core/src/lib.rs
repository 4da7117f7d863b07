//! Core domain types for searching satellite image patches.
//!
//! Queries combine an area (a drawn geometry or a typed bounding box) with
//! a set of land-cover labels. This crate validates the box, resolves the
//! labels against the catalogue, and assembles the request body; the
//! transport lives behind [`QueryClient`].
//!
//! # Examples
//!
//! ```
//! use patchsearch_core::{
//!     BoundingBoxFields, LabelCatalog, QueryKind, QueryPayloadBuilder, QueryType,
//!     SpatialOperator,
//! };
//!
//! # fn main() -> Result<(), patchsearch_core::AnalogueRejection> {
//! let catalog = LabelCatalog::bigearthnet();
//! let builder =
//!     QueryPayloadBuilder::new(&catalog, QueryType::default(), SpatialOperator::default());
//! let fields = BoundingBoxFields::new(10.0, 50.0, 11.0, 49.0);
//! let request = builder
//!     .analogue_from_fields(&fields, &["Airports"])
//!     .into_request()?;
//! assert_eq!(request.kind(), QueryKind::Analogue);
//! assert_eq!(request.endpoint_path(), "query-analogue");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod bbox;
mod builder;
mod client;
mod labels;
mod query;
mod result;
mod sequence;

pub use bbox::{
    BoundingBox, BoundingBoxError, BoundingBoxFields, BoxRule, MAX_LATITUDE, MAX_LONGITUDE,
    MAX_LONGITUDE_SPAN, MIN_LATITUDE, MIN_LONGITUDE, bounding_box_violations,
    is_valid_bounding_box,
};
pub use builder::{AnalogueRejection, AnalogueState, ExclusivityPolicy, QueryPayloadBuilder};
pub use client::{QueryClient, QueryError};
pub use labels::{
    BIGEARTHNET_LABELS, LabelCatalog, LabelSelection, LabelSelectionError, LabelSet,
    resolve_labels,
};
pub use query::{
    Geometry, GeometryError, QueryKind, QueryPayload, QueryRequest, QueryType, SpatialOperator,
};
pub use result::QueryResult;
pub use sequence::{LatestResponse, RequestSequencer, RequestTicket};

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
#[doc(hidden)]
pub mod test_support;
