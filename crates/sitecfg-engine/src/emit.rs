//! Canonical emitter.
//!
//! Re-checks every configuration invariant on the merged result before
//! handing it out as an immutable snapshot.

use std::collections::HashSet;
use std::sync::Arc;

use crate::diagnostic::Diagnostic;
use crate::error::{Invariant, RejectedDocument, ResolveError};
use crate::model::{NavEntry, SiteConfig};
use crate::validate::{MAX_NAV_DEPTH, is_http_url, missing_attributes};

/// Result of a successful resolution.
#[derive(Clone, Debug)]
pub struct Resolution {
    /// Canonical configuration.
    pub config: Arc<SiteConfig>,
    /// Every warning from every input document, in document order.
    pub diagnostics: Vec<Diagnostic>,
    /// Documents left out of the merge because of validation errors.
    pub rejected: Vec<RejectedDocument>,
}

impl Resolution {
    /// Whether any document was left out of the merge.
    #[must_use]
    pub fn has_rejections(&self) -> bool {
        !self.rejected.is_empty()
    }
}

/// Check invariants and freeze the merged configuration.
///
/// # Errors
///
/// Returns [`ResolveError::IntegrityViolation`] naming the first broken
/// invariant.
pub fn emit(
    config: SiteConfig,
    diagnostics: Vec<Diagnostic>,
    rejected: Vec<RejectedDocument>,
) -> Result<Resolution, ResolveError> {
    check_integrity(&config)?;
    Ok(Resolution {
        config: Arc::new(config),
        diagnostics,
        rejected,
    })
}

/// Verify every invariant of a resolved configuration.
///
/// # Errors
///
/// Returns [`ResolveError::IntegrityViolation`] naming the first broken
/// invariant.
pub fn check_integrity(config: &SiteConfig) -> Result<(), ResolveError> {
    if config.title.trim().is_empty() {
        return violation(Invariant::TitleNonEmpty, "title is empty");
    }

    for entry in &config.navigation {
        check_nav_entry(entry)?;
    }

    let mut labels = HashSet::new();
    for group in &config.sidebar_groups {
        if !labels.insert(group.label.as_str()) {
            return violation(
                Invariant::SidebarLabelUnique,
                format!("group '{}' appears twice", group.label),
            );
        }
    }

    let mut links = HashSet::new();
    for (group, item) in config.sidebar_items() {
        if !item.link.starts_with('/') {
            return violation(
                Invariant::SidebarLinkPath,
                format!("link '{}' in group '{}' is not a site path", item.link, group.label),
            );
        }
        if !links.insert(item.link.as_str()) {
            return violation(
                Invariant::SidebarLinkUnique,
                format!("link '{}' is filed more than once", item.link),
            );
        }
    }

    for tag in &config.head_tags {
        if let Some(problem) = missing_attributes(tag) {
            return violation(Invariant::HeadTagAttributes, problem);
        }
    }

    Ok(())
}

fn check_nav_entry(entry: &NavEntry) -> Result<(), ResolveError> {
    if entry.depth() > MAX_NAV_DEPTH {
        return violation(
            Invariant::NavigationDepth,
            format!("entry '{}' nests {} levels", entry.label(), entry.depth()),
        );
    }
    match entry {
        NavEntry::Leaf { label, target } => {
            if !(is_http_url(target) || target.starts_with('/')) {
                return violation(
                    Invariant::NavigationTarget,
                    format!("entry '{label}' targets '{target}'"),
                );
            }
        }
        NavEntry::Group { label, children } => {
            if children.is_empty() {
                return violation(
                    Invariant::NavigationGroupNonEmpty,
                    format!("group '{label}' has no children"),
                );
            }
            for child in children {
                check_nav_entry(child)?;
            }
        }
    }
    Ok(())
}

fn violation(invariant: Invariant, detail: impl Into<String>) -> Result<(), ResolveError> {
    Err(ResolveError::IntegrityViolation {
        invariant,
        detail: detail.into(),
    })
}
