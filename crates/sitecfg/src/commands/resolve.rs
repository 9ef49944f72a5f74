//! `sitecfg resolve` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, ValueEnum};
use sitecfg_engine::{MergePrecedence, ResolveError, ResolveOptions, SiteConfig, resolve};

use crate::error::CliError;
use crate::output::Output;

/// Serialization format of the resolved configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// Overlay files, applied in order after the base config.
    files: Vec<PathBuf>,

    /// Base configuration file (default: auto-discover sitecfg.toml when no files are given).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Write the resolved configuration to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Let earlier documents override later ones.
    #[arg(long)]
    first_wins: bool,

    /// Fail if any document is rejected.
    #[arg(long, env = "SITECFG_STRICT")]
    strict: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, no document is usable, or the
    /// result cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let documents = super::load_documents(self.config.as_deref(), &self.files)?;
        let options = ResolveOptions {
            precedence: self.precedence(),
            strict: self.strict,
        };

        let resolution = match resolve(documents, &options) {
            Ok(resolution) => resolution,
            Err(ResolveError::Validation(failure)) => {
                super::report_rejected(&output, &failure.documents);
                return Err(ResolveError::Validation(failure).into());
            }
            Err(ResolveError::MalformedInput(failure)) => {
                super::report_malformed(&output, &failure);
                return Err(ResolveError::MalformedInput(failure).into());
            }
            Err(err) => return Err(err.into()),
        };

        for diagnostic in &resolution.diagnostics {
            output.diagnostic(diagnostic);
        }
        super::report_rejected(&output, &resolution.rejected);

        let rendered = render(&resolution.config, self.format)?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, rendered)?;
                output.success(&format!("Wrote {}", path.display()));
            }
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(rendered.as_bytes())?;
                stdout.flush()?;
            }
        }

        Ok(())
    }

    fn precedence(&self) -> MergePrecedence {
        if self.first_wins {
            MergePrecedence::FirstWins
        } else {
            MergePrecedence::LastWins
        }
    }
}

/// Serialize the resolved configuration.
fn render(config: &SiteConfig, format: OutputFormat) -> Result<String, CliError> {
    let mut rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(config)?,
        OutputFormat::Yaml => serde_yaml::to_string(config)?,
        OutputFormat::Toml => toml::to_string_pretty(config)?,
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}
