//! Plain-text rendering of command output.

use std::io::Write;

use patchsearch_core::{LabelCatalog, QueryResult};

use crate::CliError;

/// Write the result heading, then one line per named patch.
///
/// The heading counts every entry the backend reported, nulls included.
/// When no entry carries a name the body is `None`.
pub(crate) fn write_result(writer: &mut dyn Write, result: &QueryResult) -> Result<(), CliError> {
    writeln!(
        writer,
        "Names of matching image patches ({}):",
        result.reported_count()
    )
    .map_err(CliError::WriteOutput)?;
    if !result.has_matches() {
        return writeln!(writer, "None").map_err(CliError::WriteOutput);
    }
    for name in result.names() {
        writeln!(writer, "{name}").map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

pub(crate) fn write_catalog(writer: &mut dyn Write, catalog: &LabelCatalog) -> Result<(), CliError> {
    for label in catalog.labels() {
        writeln!(writer, "{label}").map_err(CliError::WriteOutput)?;
    }
    Ok(())
}
