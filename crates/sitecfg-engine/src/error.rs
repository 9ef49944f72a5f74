//! Resolution errors.

use std::fmt;

use serde::Serialize;

use crate::diagnostic::Diagnostic;

/// Error returned by [`resolve`](crate::resolve).
///
/// `MalformedInput` and `Validation` are caused by the input documents.
/// `PreconditionViolation` and `IntegrityViolation` mean the engine broke its
/// own contract; they abort the call and must not be retried.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// One or more documents are not keyed mappings.
    #[error("{0}")]
    MalformedInput(MalformedFailure),
    /// No document could be merged (or, in strict mode, any document was rejected).
    #[error("{0}")]
    Validation(ValidationFailure),
    /// The merger was handed a document the validator rejected.
    #[error("Precondition violation: document {index} ({origin}) has validation errors")]
    PreconditionViolation {
        /// Position in the input sequence.
        index: usize,
        /// Document label.
        origin: String,
    },
    /// The merged configuration breaks an invariant.
    #[error("Integrity violation ({invariant}): {detail}")]
    IntegrityViolation {
        /// Invariant that does not hold.
        invariant: Invariant,
        /// Where and how it is broken.
        detail: String,
    },
}

impl ResolveError {
    /// Whether the error signals an engine bug rather than bad input.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::PreconditionViolation { .. } | Self::IntegrityViolation { .. }
        )
    }
}

/// A document that is not a keyed mapping.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MalformedDocument {
    /// Position in the input sequence.
    pub index: usize,
    /// Document label.
    pub origin: String,
    /// Shape actually found.
    pub found: &'static str,
}

/// Input failure listing every malformed document.
///
/// Well-formed documents are still validated in the same pass; those with
/// errors are listed in `rejected`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MalformedFailure {
    /// Every document that is not a mapping, in input order.
    pub documents: Vec<MalformedDocument>,
    /// Well-formed documents with validation errors.
    pub rejected: Vec<RejectedDocument>,
}

impl fmt::Display for MalformedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Malformed input: ")?;
        for (i, doc) in self.documents.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "document {} ({}) is a {}", doc.index, doc.origin, doc.found)?;
        }
        f.write_str("; expected mappings")?;
        if !self.rejected.is_empty() {
            write!(
                f,
                " ({} other document(s) have validation errors)",
                self.rejected.len()
            )?;
        }
        Ok(())
    }
}

/// Errors of one rejected document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RejectedDocument {
    /// Position in the input sequence.
    pub index: usize,
    /// Document label.
    pub origin: String,
    /// Every error found, in discovery order.
    pub errors: Vec<Diagnostic>,
}

/// Resolution failure carrying the errors of every rejected document.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    /// One entry per rejected document, in input order.
    pub documents: Vec<RejectedDocument>,
}

impl ValidationFailure {
    /// Total number of errors across all documents.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.documents.iter().map(|d| d.errors.len()).sum()
    }

    /// Iterate over all errors in document order.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.documents.iter().flat_map(|d| d.errors.iter())
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.documents.is_empty() {
            return write!(f, "Validation failed: no configuration documents");
        }
        write!(
            f,
            "Validation failed: {} error(s) in {} document(s)",
            self.error_count(),
            self.documents.len()
        )
    }
}

/// Invariant re-checked on the merged configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invariant {
    /// `title` is non-empty.
    TitleNonEmpty,
    /// Navigation is at most root → group → leaf.
    NavigationDepth,
    /// Navigation groups have at least one child.
    NavigationGroupNonEmpty,
    /// Navigation leaf targets are URLs or `/`-prefixed paths.
    NavigationTarget,
    /// Sidebar links are `/`-prefixed paths.
    SidebarLinkPath,
    /// Sidebar links are unique across all groups.
    SidebarLinkUnique,
    /// Sidebar group labels are unique.
    SidebarLabelUnique,
    /// Head tags carry their required attributes.
    HeadTagAttributes,
}

impl fmt::Display for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TitleNonEmpty => "title-non-empty",
            Self::NavigationDepth => "navigation-depth",
            Self::NavigationGroupNonEmpty => "navigation-group-non-empty",
            Self::NavigationTarget => "navigation-target",
            Self::SidebarLinkPath => "sidebar-link-path",
            Self::SidebarLinkUnique => "sidebar-link-unique",
            Self::SidebarLabelUnique => "sidebar-label-unique",
            Self::HeadTagAttributes => "head-tag-attributes",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;

    #[test]
    fn test_validation_failure_display() {
        let failure = ValidationFailure {
            documents: vec![RejectedDocument {
                index: 0,
                origin: "site.toml".to_owned(),
                errors: vec![Diagnostic {
                    origin: "site.toml".to_owned(),
                    path: "title".to_owned(),
                    kind: DiagnosticKind::MissingRequired,
                    message: "title is required".to_owned(),
                    related_path: None,
                }],
            }],
        };
        assert_eq!(failure.error_count(), 1);
        assert_eq!(
            failure.to_string(),
            "Validation failed: 1 error(s) in 1 document(s)"
        );
    }

    #[test]
    fn test_empty_failure_display() {
        let failure = ValidationFailure::default();
        assert!(failure.to_string().contains("no configuration documents"));
    }

    #[test]
    fn test_internal_errors() {
        let err = ResolveError::IntegrityViolation {
            invariant: Invariant::SidebarLinkUnique,
            detail: "/01 filed twice".to_owned(),
        };
        assert!(err.is_internal());
        assert!(err.to_string().contains("sidebar-link-unique"));

        let err = ResolveError::Validation(ValidationFailure::default());
        assert!(!err.is_internal());
    }

    #[test]
    fn test_malformed_failure_display_lists_every_document() {
        let failure = MalformedFailure {
            documents: vec![
                MalformedDocument {
                    index: 0,
                    origin: "a.yaml".to_owned(),
                    found: "string",
                },
                MalformedDocument {
                    index: 2,
                    origin: "c.json".to_owned(),
                    found: "sequence",
                },
            ],
            rejected: Vec::new(),
        };
        assert_eq!(
            failure.to_string(),
            "Malformed input: document 0 (a.yaml) is a string, document 2 (c.json) is a sequence; expected mappings"
        );
    }
}
