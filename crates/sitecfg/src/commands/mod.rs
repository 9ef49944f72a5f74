//! CLI command implementations.

pub(crate) mod check;
pub(crate) mod resolve;

pub(crate) use check::CheckArgs;
pub(crate) use resolve::ResolveArgs;

use std::path::{Path, PathBuf};

use sitecfg_engine::{MalformedFailure, RejectedDocument, SourceDocument};
use sitecfg_source::{CONFIG_FILENAMES, discover_config, load_file};

use crate::error::CliError;
use crate::output::Output;

/// Pick the input files, in precedence order.
///
/// An explicit `--config` file always comes first. Without one, a discovered
/// config file is used only when no other files are given.
fn input_paths(config: Option<&Path>, files: &[PathBuf]) -> Result<Vec<PathBuf>, CliError> {
    let base = match config {
        Some(path) => Some(path.to_path_buf()),
        None if files.is_empty() => Some(discover_config().ok_or_else(|| {
            CliError::Validation(format!(
                "No configuration files given and none of {} found",
                CONFIG_FILENAMES.join(", ")
            ))
        })?),
        None => None,
    };
    Ok(base.into_iter().chain(files.iter().cloned()).collect())
}

/// Load every input file.
fn load_documents(config: Option<&Path>, files: &[PathBuf]) -> Result<Vec<SourceDocument>, CliError> {
    let paths = input_paths(config, files)?;
    tracing::info!(count = paths.len(), "Loading configuration documents");
    paths
        .iter()
        .map(|path| load_file(path).map_err(CliError::from))
        .collect()
}

/// Print the errors of documents left out of the merge.
fn report_rejected(output: &Output, rejected: &[RejectedDocument]) {
    for doc in rejected {
        output.error(&format!(
            "Skipped {} ({} error(s)):",
            doc.origin,
            doc.errors.len()
        ));
        for diagnostic in &doc.errors {
            output.diagnostic(diagnostic);
        }
    }
}

/// Print every malformed document, then the errors of the well-formed ones.
fn report_malformed(output: &Output, failure: &MalformedFailure) {
    for doc in &failure.documents {
        output.error(&format!("{}: expected a mapping, found a {}", doc.origin, doc.found));
    }
    report_rejected(output, &failure.rejected);
}
