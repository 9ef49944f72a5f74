//! `sitecfg check` command implementation.

use std::path::PathBuf;

use clap::Args;
use sitecfg_engine::{ResolveError, ValidatedDocument, validate_documents};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Files to check (default: auto-discover sitecfg.toml).
    files: Vec<PathBuf>,

    /// Treat warnings as errors.
    #[arg(long)]
    deny_warnings: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails or any document has errors (or
    /// warnings, with `--deny-warnings`).
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let documents = super::load_documents(None, &self.files)?;
        let validated = match validate_documents(documents) {
            Ok(validated) => validated,
            Err(ResolveError::MalformedInput(failure)) => {
                super::report_malformed(&output, &failure);
                return Err(ResolveError::MalformedInput(failure).into());
            }
            Err(err) => return Err(err.into()),
        };

        for doc in &validated {
            report(&output, doc);
        }

        summarize(&validated, self.deny_warnings)
    }
}

fn report(output: &Output, doc: &ValidatedDocument) {
    let result = &doc.result;
    if result.errors.is_empty() && result.warnings.is_empty() {
        output.success(&format!("{}: ok", doc.origin));
        return;
    }
    output.info(&format!(
        "{}: {} error(s), {} warning(s)",
        doc.origin,
        result.errors.len(),
        result.warnings.len()
    ));
    for diagnostic in result.errors.iter().chain(&result.warnings) {
        output.diagnostic(diagnostic);
    }
}

/// Turn the per-document results into the command outcome.
fn summarize(validated: &[ValidatedDocument], deny_warnings: bool) -> Result<(), CliError> {
    let invalid = validated.iter().filter(|d| !d.is_valid()).count();
    if invalid > 0 {
        let errors: usize = validated.iter().map(|d| d.result.errors.len()).sum();
        return Err(CliError::Validation(format!(
            "Validation failed: {errors} error(s) in {invalid} document(s)"
        )));
    }

    let warnings: usize = validated.iter().map(|d| d.result.warnings.len()).sum();
    if deny_warnings && warnings > 0 {
        return Err(CliError::Validation(format!(
            "{warnings} warning(s) with --deny-warnings"
        )));
    }
    Ok(())
}
