//! Error types emitted by the patchsearch CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use patchsearch_client::ClientBuildError;
use patchsearch_core::{AnalogueRejection, GeometryError, LabelSelectionError, QueryError};
use thiserror::Error;

/// Errors emitted by the patchsearch CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The typed bounding box was rejected before any request was sent.
    #[error(transparent)]
    InvalidBoundingBox(#[from] AnalogueRejection),
    /// A `--label` value could not be selected against the catalogue.
    #[error("invalid label selection: {0}")]
    Label(#[from] LabelSelectionError),
    /// Constructing the HTTP client failed.
    #[error("failed to build query client for {base_url:?}: {source}")]
    BuildClient {
        base_url: String,
        #[source]
        source: ClientBuildError,
    },
    /// The backend call failed in transport, status or decoding.
    #[error("query failed: {0}")]
    Query(#[from] QueryError),
    /// Opening the geometry file failed.
    #[error("failed to open geometry at {path:?}: {source}")]
    ReadGeometry {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The geometry file is not valid JSON.
    #[error("failed to parse geometry JSON at {path:?}: {source}")]
    ParseGeometry {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The geometry file holds JSON that is not a GeoJSON geometry.
    #[error("geometry in {path:?} is not usable: {source}")]
    InvalidGeometry {
        path: Utf8PathBuf,
        #[source]
        source: GeometryError,
    },
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
