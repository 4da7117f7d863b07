//! `labels` command: print the backend's label catalogue.

use std::io::Write;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::client::{HttpClientBuilder, QueryClientBuilder};
use crate::options::resolve_base_url;
use crate::render::write_catalog;
use crate::{ARG_BASE_URL, CliError};

/// CLI arguments for the `labels` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "labels",
    about = "List the labels the backend can filter on"
)]
#[ortho_config(prefix = "PATCHSEARCH")]
pub(crate) struct LabelsArgs {
    /// Base URL of the patch search backend.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
}

pub(crate) fn run_labels(args: LabelsArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_labels_with(args, &HttpClientBuilder, &mut stdout)
}

pub(crate) fn run_labels_with(
    args: LabelsArgs,
    builder: &dyn QueryClientBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let client = builder.build(&resolve_base_url(merged.base_url))?;
    let catalog = client.fetch_labels()?;
    write_catalog(writer, &catalog)
}
