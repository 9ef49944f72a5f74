//! Colored terminal output utilities.

use console::{Style, Term};
use sitecfg_engine::{Diagnostic, Severity};

/// Terminal output formatter.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
        }
    }

    /// Print an info message.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Print a success message (green).
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Print a warning message (yellow).
    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Print a diagnostic colored by severity, with its related location dimmed.
    pub(crate) fn diagnostic(&self, diagnostic: &Diagnostic) {
        let line = format!("  {diagnostic}");
        match diagnostic.severity() {
            Severity::Error => self.error(&line),
            Severity::Warning => self.warning(&line),
        }
        if let Some(related) = &diagnostic.related_path {
            let note = format!("    first defined at {related}");
            let _ = self.term.write_line(&self.dim.apply_to(note).to_string());
        }
    }
}
