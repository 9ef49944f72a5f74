//! Validation and overlay resolution for documentation site configuration.
//!
//! Takes one or more declarative configuration documents (navigation,
//! sidebar, search, head tags, theme options), validates each one, merges the
//! valid ones in precedence order and emits a single canonical
//! [`SiteConfig`] for a static site generator to consume.
//!
//! # Pipeline
//!
//! 1. [`load`]: confirm every document is a keyed mapping
//! 2. [`validate`]: check structure, collect errors and warnings per document
//! 3. [`merge`]: fold valid documents, later ones overriding earlier ones
//! 4. [`emit`]: re-check invariants and freeze the result
//!
//! Documents with errors are left out of the merge; their errors are reported
//! in [`Resolution::rejected`]. Resolution fails only when no document
//! survives validation (or, with [`ResolveOptions::strict`], when any
//! document is rejected).
//!
//! The engine does no I/O. Every call is independent and works on owned
//! values, so concurrent calls share nothing.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use sitecfg_engine::{ResolveOptions, SourceDocument, resolve};
//!
//! let base = SourceDocument::new("base.json", json!({
//!     "title": "Docs",
//!     "sidebarGroups": [
//!         {"label": "Getting Started", "items": [{"label": "Overview", "link": "/01"}]}
//!     ]
//! }));
//! let overlay = SourceDocument::new("v2.json", json!({"title": "Docs v2"}));
//!
//! let resolution = resolve(vec![base, overlay], &ResolveOptions::default())?;
//! assert_eq!(resolution.config.title, "Docs v2");
//! assert_eq!(resolution.config.sidebar_groups.len(), 1);
//! # Ok::<(), sitecfg_engine::ResolveError>(())
//! ```

mod diagnostic;
mod emit;
mod error;
mod loader;
mod merge;
mod model;
mod validate;

pub use diagnostic::{Diagnostic, DiagnosticKind, Severity, ValidationResult};
pub use emit::{Resolution, check_integrity, emit};
pub use error::{
    Invariant, MalformedDocument, MalformedFailure, RejectedDocument, ResolveError,
    ValidationFailure,
};
pub use loader::{RawDocument, SourceDocument, load};
pub use merge::{MergePrecedence, Merged, merge};
pub use model::{
    EditLinkConfig, FooterConfig, HeadTag, HeadTagName, LastUpdatedConfig, LogoConfig,
    MarkdownConfig, NavEntry, Overlay, SearchConfig, SearchOptions, SearchProvider, SidebarGroup,
    SidebarItem, SiteConfig, SocialLink, ThemeConfig,
};
pub use validate::{TOP_LEVEL_KEYS, ValidatedDocument, validate};

/// Options for [`resolve`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ResolveOptions {
    /// Which end of the input sequence takes precedence.
    pub precedence: MergePrecedence,
    /// Fail when any document is rejected instead of merging the rest.
    pub strict: bool,
}

/// Load and validate documents without merging them.
///
/// # Errors
///
/// Returns [`ResolveError::MalformedInput`] if any document is not a
/// mapping. The well-formed documents are validated regardless, and those
/// with errors are carried in the failure.
pub fn validate_documents(
    documents: Vec<SourceDocument>,
) -> Result<Vec<ValidatedDocument>, ResolveError> {
    let (raw, malformed) = loader::split(documents);
    let validated: Vec<ValidatedDocument> = raw.iter().map(validate).collect();
    if malformed.is_empty() {
        return Ok(validated);
    }

    let rejected = validated
        .into_iter()
        .filter(|doc| !doc.is_valid())
        .map(rejection)
        .collect();
    Err(ResolveError::MalformedInput(MalformedFailure {
        documents: malformed,
        rejected,
    }))
}

fn rejection(doc: ValidatedDocument) -> RejectedDocument {
    RejectedDocument {
        index: doc.index,
        origin: doc.origin,
        errors: doc.result.errors,
    }
}

/// Resolve documents into one canonical configuration.
///
/// # Errors
///
/// - [`ResolveError::MalformedInput`] if any document is not a mapping
/// - [`ResolveError::Validation`] if no document is valid, or if
///   `options.strict` is set and any document is rejected
/// - [`ResolveError::PreconditionViolation`] / [`ResolveError::IntegrityViolation`]
///   on internal contract violations
pub fn resolve(
    documents: Vec<SourceDocument>,
    options: &ResolveOptions,
) -> Result<Resolution, ResolveError> {
    let validated = validate_documents(documents)?;

    let mut diagnostics: Vec<(usize, Diagnostic)> = validated
        .iter()
        .flat_map(|doc| doc.result.warnings.iter().map(|w| (doc.index, w.clone())))
        .collect();

    let (valid, invalid): (Vec<_>, Vec<_>) =
        validated.into_iter().partition(ValidatedDocument::is_valid);

    let rejected: Vec<RejectedDocument> = invalid.into_iter().map(rejection).collect();
    for doc in &rejected {
        tracing::warn!(
            origin = %doc.origin,
            errors = doc.errors.len(),
            "Configuration document rejected"
        );
    }

    if valid.is_empty() || (options.strict && !rejected.is_empty()) {
        return Err(ResolveError::Validation(ValidationFailure {
            documents: rejected,
        }));
    }

    let merged = merge(&valid, options.precedence)?;
    diagnostics.extend(merged.warnings);
    // stable: per document, validation warnings stay ahead of merge warnings
    diagnostics.sort_by_key(|(index, _)| *index);

    let resolution = emit(
        merged.config,
        diagnostics.into_iter().map(|(_, d)| d).collect(),
        rejected,
    )?;

    tracing::info!(
        merged = valid.len(),
        rejected = resolution.rejected.len(),
        warnings = resolution.diagnostics.len(),
        "Resolved site configuration"
    );
    Ok(resolution)
}
