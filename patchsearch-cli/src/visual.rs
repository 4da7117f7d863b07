//! `visual` command: query patches against a GeoJSON geometry.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use patchsearch_core::QueryPayloadBuilder;
use serde::{Deserialize, Serialize};

use crate::client::{HttpClientBuilder, QueryClientBuilder};
use crate::geometry::load_geometry;
use crate::options::QueryOptions;
use crate::render::write_result;
use crate::{
    ARG_BASE_URL, ARG_GEOMETRY, ARG_LABEL, ARG_OPERATOR, ARG_QUERY_TYPE, CliError,
    ENV_VISUAL_GEOMETRY,
};

/// CLI arguments for the `visual` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "visual",
    long_about = "Query image patches against a GeoJSON geometry read from \
                 a file, as if it had been drawn on the map. The geometry is \
                 sent unchanged.",
    about = "Query patches intersecting a GeoJSON geometry"
)]
#[ortho_config(prefix = "PATCHSEARCH")]
pub(crate) struct VisualArgs {
    /// Path to a JSON file holding a GeoJSON geometry object.
    #[arg(long = ARG_GEOMETRY, value_name = "path")]
    #[serde(default)]
    pub(crate) geometry: Option<Utf8PathBuf>,
    /// Restrict matches to this label; repeat for several.
    #[arg(long = ARG_LABEL, value_name = "label")]
    #[serde(default)]
    pub(crate) labels: Vec<String>,
    /// Label combination rule, e.g. `CONTAINS_ALL`.
    #[arg(long = ARG_QUERY_TYPE, value_name = "type")]
    #[serde(default)]
    pub(crate) query_type: Option<String>,
    /// Spatial operator, e.g. `GEO_INTERSECTS`.
    #[arg(long = ARG_OPERATOR, value_name = "operator")]
    #[serde(default)]
    pub(crate) operator: Option<String>,
    /// Base URL of the patch search backend.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
}

impl VisualArgs {
    pub(crate) fn into_config(self) -> Result<VisualConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        VisualConfig::try_from(merged)
    }
}

/// Resolved `visual` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct VisualConfig {
    pub(crate) geometry: Utf8PathBuf,
    pub(crate) options: QueryOptions,
}

impl TryFrom<VisualArgs> for VisualConfig {
    type Error = CliError;

    fn try_from(args: VisualArgs) -> Result<Self, Self::Error> {
        let geometry = args.geometry.ok_or(CliError::MissingArgument {
            field: ARG_GEOMETRY,
            env: ENV_VISUAL_GEOMETRY,
        })?;
        Ok(Self {
            geometry,
            options: QueryOptions::resolve(
                args.base_url,
                args.labels,
                args.query_type,
                args.operator,
            ),
        })
    }
}

pub(crate) fn run_visual(args: VisualArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_visual_with(args, &HttpClientBuilder, &mut stdout)
}

pub(crate) fn run_visual_with(
    args: VisualArgs,
    builder: &dyn QueryClientBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    let geometry = load_geometry(&config.geometry)?;
    let client = builder.build(&config.options.base_url)?;
    let catalog = client.fetch_labels()?;
    let selection = config.options.select_labels(&catalog)?;
    let request = QueryPayloadBuilder::new(
        &catalog,
        config.options.query_type.clone(),
        config.options.spatial_operator.clone(),
    )
    .visual_from_geometry(geometry, selection.selected());
    let result = client.submit(&request)?;
    write_result(writer, &result)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<VisualConfig, CliError> {
    let merged = VisualArgs::merge_from_layers(layers).map_err(CliError::from)?;
    VisualConfig::try_from(merged)
}
