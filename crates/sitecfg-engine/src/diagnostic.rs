//! Validation diagnostics.
//!
//! Every problem found in a document is reported as a [`Diagnostic`] with a
//! field path, a [`DiagnosticKind`] and a human-readable message. The kind
//! determines the [`Severity`]: errors reject the document from merging,
//! warnings are surfaced but never block resolution.

use std::fmt;

use serde::Serialize;

/// Diagnostic severity tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Blocks merging of the offending document.
    Error,
    /// Reported but does not block merging.
    Warning,
}

/// Category of a validation finding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// Key not part of the recognized schema.
    UnknownField,
    /// Required field absent or empty.
    MissingRequired,
    /// Value has the wrong shape.
    TypeMismatch,
    /// Navigation nested deeper than root → group → leaf.
    DepthExceeded,
    /// Sidebar link filed more than once.
    DuplicateLink,
    /// Head tag lacks a required attribute or has an unknown tag name.
    InvalidHeadTag,
    /// Path-like value does not start with `/`.
    InvalidPath,
    /// Path-like value has leading or trailing whitespace.
    UntrimmedValue,
    /// Two sidebar groups in one document share a label.
    DuplicateGroupLabel,
    /// Value is present but has no effect.
    IgnoredField,
    /// Edit link pattern without a `:path` placeholder.
    MissingPlaceholder,
    /// Sidebar link moved to a group of a higher-precedence document.
    ShadowedLink,
}

impl DiagnosticKind {
    /// Severity tier of this kind.
    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            Self::UnknownField
            | Self::UntrimmedValue
            | Self::DuplicateGroupLabel
            | Self::IgnoredField
            | Self::MissingPlaceholder
            | Self::ShadowedLink => Severity::Warning,
            Self::MissingRequired
            | Self::TypeMismatch
            | Self::DepthExceeded
            | Self::DuplicateLink
            | Self::InvalidHeadTag
            | Self::InvalidPath => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A single validation finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Label of the document the finding belongs to (e.g. a file path).
    pub origin: String,
    /// Field path inside the document, e.g. `sidebarGroups[1].items[0].link`.
    pub path: String,
    /// Finding category.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
    /// Second offending path, for findings involving two locations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_path: Option<String>,
}

impl Diagnostic {
    /// Severity of this finding.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }

    /// Whether this finding blocks merging.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "origin: path: [Kind] message"
        write!(f, "{}: ", self.origin)?;
        if !self.path.is_empty() {
            write!(f, "{}: ", self.path)?;
        }
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

/// Outcome of validating one document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Blocking findings, in discovery order.
    pub errors: Vec<Diagnostic>,
    /// Non-blocking findings, in discovery order.
    pub warnings: Vec<Diagnostic>,
}

impl ValidationResult {
    /// True when the document has no errors.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// File a diagnostic under errors or warnings according to its kind.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
    }
}

/// Dotted field path used to locate diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct FieldPath(String);

impl FieldPath {
    /// The document root.
    pub(crate) fn root() -> Self {
        Self(String::new())
    }

    /// Path of a named child field.
    pub(crate) fn key(&self, key: &str) -> Self {
        if self.0.is_empty() {
            Self(key.to_owned())
        } else {
            Self(format!("{}.{key}", self.0))
        }
    }

    /// Path of a sequence element.
    pub(crate) fn index(&self, index: usize) -> Self {
        Self(format!("{}[{index}]", self.0))
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
