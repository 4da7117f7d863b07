//! Facade crate for the patch search client.
//!
//! This crate re-exports the query core and, behind the `http` feature, the
//! HTTP transport and query session.

#![forbid(unsafe_code)]

pub use patchsearch_core::{
    AnalogueRejection, AnalogueState, BoundingBox, BoundingBoxError, BoundingBoxFields, BoxRule,
    ExclusivityPolicy, Geometry, GeometryError, LabelCatalog, LabelSelection, LabelSelectionError,
    LabelSet, QueryClient, QueryError, QueryKind, QueryPayload, QueryPayloadBuilder, QueryRequest,
    QueryResult, QueryType, RequestSequencer, RequestTicket, SpatialOperator,
};

#[cfg(feature = "http")]
pub use patchsearch_client::{
    AsyncQueryClient, HttpQueryClient, HttpQueryClientConfig, QuerySession, SessionOutcome,
};
