//! `analogue` command: query patches inside a typed bounding box.

use std::io::Write;

use clap::Parser;
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use patchsearch_core::{
    AnalogueRejection, AnalogueState, BoundingBox, BoundingBoxFields, ExclusivityPolicy,
    QueryPayloadBuilder, QueryRequest,
};
use serde::{Deserialize, Serialize};

use crate::client::{HttpClientBuilder, QueryClientBuilder};
use crate::options::QueryOptions;
use crate::render::write_result;
use crate::{
    ARG_BASE_URL, ARG_LABEL, ARG_LRX, ARG_LRY, ARG_OPERATOR, ARG_QUERY_TYPE, ARG_ULX, ARG_ULY,
    CliError,
};

/// CLI arguments for the `analogue` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "analogue",
    long_about = "Query image patches inside a bounding box given by its \
                 upper-left and lower-right corners in WGS84 degrees. Leave \
                 all four corners out to filter by label only.",
    about = "Query patches inside a typed bounding box"
)]
#[ortho_config(prefix = "PATCHSEARCH")]
pub(crate) struct AnalogueArgs {
    /// Upper-left longitude.
    #[arg(long = ARG_ULX, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) ulx: Option<f64>,
    /// Upper-left latitude.
    #[arg(long = ARG_ULY, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) uly: Option<f64>,
    /// Lower-right longitude.
    #[arg(long = ARG_LRX, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lrx: Option<f64>,
    /// Lower-right latitude.
    #[arg(long = ARG_LRY, value_name = "deg", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lry: Option<f64>,
    /// Restrict matches to this label; repeat for several.
    #[arg(long = ARG_LABEL, value_name = "label")]
    #[serde(default)]
    pub(crate) labels: Vec<String>,
    /// Label combination rule, e.g. `CONTAINS_ALL`.
    #[arg(long = ARG_QUERY_TYPE, value_name = "type")]
    #[serde(default)]
    pub(crate) query_type: Option<String>,
    /// Spatial operator, e.g. `GEO_WITHIN`.
    #[arg(long = ARG_OPERATOR, value_name = "operator")]
    #[serde(default)]
    pub(crate) operator: Option<String>,
    /// Base URL of the patch search backend.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
}

impl AnalogueArgs {
    pub(crate) fn into_config(self) -> Result<AnalogueConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(AnalogueConfig::from(merged))
    }
}

/// Resolved `analogue` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AnalogueConfig {
    pub(crate) fields: BoundingBoxFields,
    pub(crate) options: QueryOptions,
}

impl AnalogueConfig {
    /// Reject an invalid box before anything touches the network.
    pub(crate) fn check_box(&self) -> Result<(), CliError> {
        if ExclusivityPolicy::default().is_exclusive(&self.fields) {
            return Ok(());
        }
        let (ulx, uly, lrx, lry) = self.fields.to_numeric();
        BoundingBox::new(ulx, uly, lrx, lry)
            .map(|_| ())
            .map_err(|err| CliError::InvalidBoundingBox(AnalogueRejection::from(err)))
    }
}

impl From<AnalogueArgs> for AnalogueConfig {
    fn from(args: AnalogueArgs) -> Self {
        Self {
            fields: BoundingBoxFields {
                ulx: args.ulx,
                uly: args.uly,
                lrx: args.lrx,
                lry: args.lry,
            },
            options: QueryOptions::resolve(
                args.base_url,
                args.labels,
                args.query_type,
                args.operator,
            ),
        }
    }
}

pub(crate) fn run_analogue(args: AnalogueArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_analogue_with(args, &HttpClientBuilder, &mut stdout)
}

pub(crate) fn run_analogue_with(
    args: AnalogueArgs,
    builder: &dyn QueryClientBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    execute_analogue(&config, builder, writer)
}

pub(crate) fn execute_analogue(
    config: &AnalogueConfig,
    builder: &dyn QueryClientBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    config.check_box()?;
    let client = builder.build(&config.options.base_url)?;
    let catalog = client.fetch_labels()?;
    let selection = config.options.select_labels(&catalog)?;
    let payloads = QueryPayloadBuilder::new(
        &catalog,
        config.options.query_type.clone(),
        config.options.spatial_operator.clone(),
    );
    let state = AnalogueState::submit(&payloads, &config.fields, selection.selected());
    let request = describe(state)?;
    let result = client.submit(&request)?;
    write_result(writer, &result)
}

fn describe(state: AnalogueState) -> Result<QueryRequest, CliError> {
    match &state {
        AnalogueState::ExclusiveLabelQuery(_) => debug!("submitting label-only analogue query"),
        AnalogueState::ValidatedBoxQuery(_) => debug!("submitting analogue query with a box"),
        AnalogueState::RejectedInvalidBox { .. } | AnalogueState::Idle => {}
    }
    Ok(state.into_request()?)
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<AnalogueConfig, CliError> {
    let merged = AnalogueArgs::merge_from_layers(layers).map_err(CliError::from)?;
    Ok(AnalogueConfig::from(merged))
}
