//! Command-line client for the patch search backend.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod analogue;
mod client;
mod error;
mod geometry;
mod labels;
mod options;
mod render;
mod visual;

pub use error::CliError;

use analogue::{AnalogueArgs, run_analogue};
use labels::{LabelsArgs, run_labels};
use visual::{VisualArgs, run_visual};

const ARG_BASE_URL: &str = "base-url";
const ARG_LABEL: &str = "label";
const ARG_QUERY_TYPE: &str = "query-type";
const ARG_OPERATOR: &str = "operator";
const ARG_ULX: &str = "ulx";
const ARG_ULY: &str = "uly";
const ARG_LRX: &str = "lrx";
const ARG_LRY: &str = "lry";
const ARG_GEOMETRY: &str = "geometry";
const ENV_VISUAL_GEOMETRY: &str = "PATCHSEARCH_CMDS_VISUAL_GEOMETRY";

/// Run the patchsearch CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments, configuration, the backend or output
/// fail.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Labels(args) => run_labels(args),
        Command::Analogue(args) => run_analogue(args),
        Command::Visual(args) => run_visual(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "patchsearch",
    about = "Search satellite image patches by area and land-cover label",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the labels the backend can filter on.
    Labels(LabelsArgs),
    /// Query patches inside a typed bounding box.
    Analogue(AnalogueArgs),
    /// Query patches intersecting a GeoJSON geometry.
    Visual(VisualArgs),
}

#[cfg(test)]
mod tests;
