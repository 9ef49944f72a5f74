//! Overlay merger.
//!
//! # Merge Rules
//!
//! Documents are folded in precedence order, each one layered over the
//! result so far:
//!
//! - `title`, `description`, `cleanUrls`: last definition wins
//! - `navigation`, `socialLinks`: replaced wholesale, never concatenated
//! - `sidebarGroups`: keyed by label; a group replaces the earlier group with
//!   the same label wholesale and keeps its position, new labels are appended
//! - `headTags`: concatenated, then de-duplicated by
//!   [`HeadTag::dedup_key`] keeping the last occurrence
//! - `search`, `theme`, `editLink`, `lastUpdated`, `logo`, `footer`,
//!   `markdown`: shallow merge, later keys override earlier keys
//!
//! A sidebar link filed by a higher-precedence group evicts the same link
//! from any group with a different label, so the merged sidebar never files
//! a page twice. Each eviction is reported as a [`DiagnosticKind::ShadowedLink`]
//! warning; a group left without items is dropped. Repeated labels within
//! one document collapse to their last definition before anything is
//! evicted.

use std::collections::{HashMap, HashSet};

use crate::diagnostic::{Diagnostic, DiagnosticKind, FieldPath};
use crate::error::ResolveError;
use crate::model::{HeadTag, SearchConfig, SidebarGroup, SiteConfig};
use crate::validate::ValidatedDocument;

/// Which end of the input sequence takes precedence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MergePrecedence {
    /// Later documents override earlier ones.
    #[default]
    LastWins,
    /// Earlier documents override later ones.
    FirstWins,
}

/// Merged configuration plus the warnings merging produced.
#[derive(Debug, Default)]
pub struct Merged {
    /// Merged configuration.
    pub config: SiteConfig,
    /// [`DiagnosticKind::ShadowedLink`] warnings, tagged with the document
    /// index that caused them.
    pub warnings: Vec<(usize, Diagnostic)>,
}

/// Merge valid documents into one configuration.
///
/// # Errors
///
/// Returns [`ResolveError::PreconditionViolation`] if any document has
/// validation errors.
pub fn merge(
    documents: &[ValidatedDocument],
    precedence: MergePrecedence,
) -> Result<Merged, ResolveError> {
    if let Some(rejected) = documents.iter().find(|d| !d.is_valid()) {
        return Err(ResolveError::PreconditionViolation {
            index: rejected.index,
            origin: rejected.origin.clone(),
        });
    }

    let ordered: Vec<&ValidatedDocument> = match precedence {
        MergePrecedence::LastWins => documents.iter().collect(),
        MergePrecedence::FirstWins => documents.iter().rev().collect(),
    };

    let mut merged = Merged::default();
    let mut head_tags = Vec::new();
    for doc in ordered {
        layer(&mut merged, &mut head_tags, doc);
    }
    merged.config.head_tags = dedup_head_tags(head_tags);

    tracing::debug!(
        documents = documents.len(),
        groups = merged.config.sidebar_groups.len(),
        head_tags = merged.config.head_tags.len(),
        "Merged documents"
    );
    Ok(merged)
}

/// Layer one document over the merge state.
fn layer(merged: &mut Merged, head_tags: &mut Vec<HeadTag>, doc: &ValidatedDocument) {
    let overlay = doc.overlay.clone();
    let config = &mut merged.config;

    if let Some(title) = overlay.title {
        config.title = title;
    }
    if let Some(description) = overlay.description {
        config.description = description;
    }
    if let Some(clean_urls) = overlay.clean_urls {
        config.clean_urls = clean_urls;
    }
    if let Some(navigation) = overlay.navigation {
        config.navigation = navigation;
    }
    if let Some(groups) = overlay.sidebar_groups {
        merge_sidebar(&mut config.sidebar_groups, groups, doc, &mut merged.warnings);
    }
    if let Some(tags) = overlay.head_tags {
        head_tags.extend(tags);
    }
    if let Some(search) = overlay.search {
        config.search = Some(match config.search.take() {
            Some(earlier) => SearchConfig {
                provider: search.provider,
                options: search.options.or(earlier.options),
            },
            None => search,
        });
    }
    if let Some(social_links) = overlay.social_links {
        config.social_links = social_links;
    }

    config.theme = shallow(config.theme.take(), overlay.theme, |a, b| a.overlay(b));
    config.edit_link = shallow(config.edit_link.take(), overlay.edit_link, |a, b| a.overlay(b));
    config.last_updated =
        shallow(config.last_updated.take(), overlay.last_updated, |a, b| a.overlay(b));
    config.logo = shallow(config.logo.take(), overlay.logo, |a, b| a.overlay(b));
    config.footer = shallow(config.footer.take(), overlay.footer, |a, b| a.overlay(b));
    config.markdown = shallow(config.markdown.take(), overlay.markdown, |a, b| a.overlay(b));
}

fn shallow<T>(earlier: Option<T>, later: Option<T>, overlay: impl FnOnce(T, T) -> T) -> Option<T> {
    match (earlier, later) {
        (Some(earlier), Some(later)) => Some(overlay(earlier, later)),
        (earlier, later) => later.or(earlier),
    }
}

fn merge_sidebar(
    groups: &mut Vec<SidebarGroup>,
    incoming: Vec<SidebarGroup>,
    doc: &ValidatedDocument,
    warnings: &mut Vec<(usize, Diagnostic)>,
) {
    let root = FieldPath::root().key("sidebarGroups");
    let mut emptied: HashSet<String> = HashSet::new();

    for (gi, group) in collapse_by_label(incoming) {
        for (ii, item) in group.items.iter().enumerate() {
            for other in groups.iter_mut().filter(|g| g.label != group.label) {
                let before = other.items.len();
                other.items.retain(|existing| existing.link != item.link);
                if other.items.len() == before {
                    continue;
                }
                let mut message = format!(
                    "link '{}' moves here from group '{}' of a lower-precedence document",
                    item.link, other.label
                );
                if other.items.is_empty() {
                    message.push_str(&format!("; group '{}' is now empty and is dropped", other.label));
                    emptied.insert(other.label.clone());
                }
                let path = root.index(gi).key("items").index(ii).key("link");
                warnings.push((
                    doc.index,
                    Diagnostic {
                        origin: doc.origin.clone(),
                        path: path.to_string(),
                        kind: DiagnosticKind::ShadowedLink,
                        message,
                        related_path: None,
                    },
                ));
            }
        }

        emptied.remove(&group.label);
        match groups.iter_mut().find(|g| g.label == group.label) {
            Some(existing) => *existing = group,
            None => groups.push(group),
        }
    }

    groups.retain(|g| !(g.items.is_empty() && emptied.contains(&g.label)));
}

/// Keep one group per label: the last definition, at the position of the
/// first, tagged with the index it was defined at.
fn collapse_by_label(incoming: Vec<SidebarGroup>) -> Vec<(usize, SidebarGroup)> {
    let mut collapsed: Vec<(usize, SidebarGroup)> = Vec::with_capacity(incoming.len());
    for (gi, group) in incoming.into_iter().enumerate() {
        match collapsed.iter_mut().find(|(_, g)| g.label == group.label) {
            Some(slot) => *slot = (gi, group),
            None => collapsed.push((gi, group)),
        }
    }
    collapsed
}

/// Drop head tags superseded by a later tag with the same key.
fn dedup_head_tags(tags: Vec<HeadTag>) -> Vec<HeadTag> {
    let mut last = HashMap::new();
    for (i, tag) in tags.iter().enumerate() {
        if let Some(key) = tag.dedup_key() {
            last.insert(key, i);
        }
    }

    tags.into_iter()
        .enumerate()
        .filter(|(i, tag)| tag.dedup_key().is_none_or(|key| last.get(&key) == Some(i)))
        .map(|(_, tag)| tag)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::ValidationResult;
    use crate::model::{
        HeadTagName, NavEntry, Overlay, SearchOptions, SearchProvider, SidebarItem, ThemeConfig,
    };
    use pretty_assertions::assert_eq;

    fn doc(index: usize, overlay: Overlay) -> ValidatedDocument {
        ValidatedDocument {
            index,
            origin: format!("doc{index}"),
            result: ValidationResult::default(),
            overlay,
        }
    }

    fn group(label: &str, items: &[(&str, &str)]) -> SidebarGroup {
        SidebarGroup {
            label: label.to_owned(),
            collapsed: false,
            items: items
                .iter()
                .map(|(label, link)| SidebarItem::new(*label, *link))
                .collect(),
        }
    }

    fn titled(title: &str) -> Overlay {
        Overlay {
            title: Some(title.to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_scalar_last_wins() {
        let docs = [
            doc(0, Overlay {
                description: Some("First".to_owned()),
                clean_urls: Some(true),
                ..titled("Docs")
            }),
            doc(1, titled("Docs v2")),
        ];

        let merged = merge(&docs, MergePrecedence::LastWins).unwrap();
        assert_eq!(merged.config.title, "Docs v2");
        assert_eq!(merged.config.description, "First");
        assert!(merged.config.clean_urls);
    }

    #[test]
    fn test_scalar_first_wins() {
        let docs = [doc(0, titled("Docs")), doc(1, titled("Docs v2"))];
        let merged = merge(&docs, MergePrecedence::FirstWins).unwrap();
        assert_eq!(merged.config.title, "Docs");
    }

    #[test]
    fn test_navigation_replaced_not_concatenated() {
        let docs = [
            doc(0, Overlay {
                navigation: Some(vec![NavEntry::leaf("Home", "/"), NavEntry::leaf("API", "/api")]),
                ..titled("Docs")
            }),
            doc(1, Overlay {
                navigation: Some(vec![NavEntry::leaf("Start", "/start")]),
                ..titled("Docs")
            }),
        ];

        let merged = merge(&docs, MergePrecedence::LastWins).unwrap();
        assert_eq!(merged.config.navigation, vec![NavEntry::leaf("Start", "/start")]);
    }

    #[test]
    fn test_navigation_kept_when_later_omits_it() {
        let docs = [
            doc(0, Overlay {
                navigation: Some(vec![NavEntry::leaf("Home", "/")]),
                ..titled("Docs")
            }),
            doc(1, titled("Docs v2")),
        ];
        let merged = merge(&docs, MergePrecedence::LastWins).unwrap();
        assert_eq!(merged.config.navigation.len(), 1);
    }

    #[test]
    fn test_sidebar_group_replaced_in_place() {
        let docs = [
            doc(0, Overlay {
                sidebar_groups: Some(vec![
                    group("Getting Started", &[("Overview", "/01")]),
                    group("Architecture", &[("Architecture", "/02"), ("State", "/04")]),
                ]),
                ..titled("Docs")
            }),
            doc(1, Overlay {
                sidebar_groups: Some(vec![
                    group("Architecture", &[("Routing", "/05")]),
                    group("Deployment", &[("Deployment Guide", "/11")]),
                ]),
                ..titled("Docs")
            }),
        ];

        let merged = merge(&docs, MergePrecedence::LastWins).unwrap();
        let labels: Vec<_> = merged
            .config
            .sidebar_groups
            .iter()
            .map(|g| g.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Getting Started", "Architecture", "Deployment"]);
        assert_eq!(
            merged.config.sidebar_group("Architecture").unwrap().items,
            vec![SidebarItem::new("Routing", "/05")]
        );
        assert!(merged.warnings.is_empty());
    }

    #[test]
    fn test_link_moved_to_later_group_is_shadowed() {
        let docs = [
            doc(0, Overlay {
                sidebar_groups: Some(vec![group("Getting Started", &[
                    ("Overview", "/01"),
                    ("Best Practices", "/10"),
                ])]),
                ..titled("Docs")
            }),
            doc(1, Overlay {
                sidebar_groups: Some(vec![group("Guides", &[("Best Practices", "/10")])]),
                ..titled("Docs")
            }),
        ];

        let merged = merge(&docs, MergePrecedence::LastWins).unwrap();
        assert_eq!(
            merged.config.sidebar_group("Getting Started").unwrap().items,
            vec![SidebarItem::new("Overview", "/01")]
        );
        assert_eq!(merged.warnings.len(), 1);
        let (index, warning) = &merged.warnings[0];
        assert_eq!(*index, 1);
        assert_eq!(warning.kind, DiagnosticKind::ShadowedLink);
        assert_eq!(warning.path, "sidebarGroups[0].items[0].link");
    }

    #[test]
    fn test_repeated_label_collapses_before_eviction() {
        let docs = [
            doc(0, Overlay {
                sidebar_groups: Some(vec![group("Reference", &[("Config", "/x")])]),
                ..titled("Docs")
            }),
            doc(1, Overlay {
                sidebar_groups: Some(vec![
                    group("Guides", &[("Config", "/x")]),
                    group("Guides", &[("Setup", "/y")]),
                ]),
                ..titled("Docs")
            }),
        ];

        let merged = merge(&docs, MergePrecedence::LastWins).unwrap();
        assert_eq!(
            merged.config.sidebar_groups,
            vec![
                group("Reference", &[("Config", "/x")]),
                group("Guides", &[("Setup", "/y")]),
            ]
        );
        assert!(merged.warnings.is_empty());
    }

    #[test]
    fn test_group_emptied_by_eviction_is_dropped() {
        let docs = [
            doc(0, Overlay {
                sidebar_groups: Some(vec![
                    group("Getting Started", &[("Overview", "/01")]),
                    group("Extras", &[("Best Practices", "/10")]),
                ]),
                ..titled("Docs")
            }),
            doc(1, Overlay {
                sidebar_groups: Some(vec![group("Guides", &[("Best Practices", "/10")])]),
                ..titled("Docs")
            }),
        ];

        let merged = merge(&docs, MergePrecedence::LastWins).unwrap();
        let labels: Vec<_> = merged
            .config
            .sidebar_groups
            .iter()
            .map(|g| g.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Getting Started", "Guides"]);

        assert_eq!(merged.warnings.len(), 1);
        let message = &merged.warnings[0].1.message;
        assert!(message.contains("lower-precedence document"));
        assert!(message.contains("group 'Extras' is now empty"));
    }

    #[test]
    fn test_first_wins_eviction_keeps_earlier_document_link() {
        let docs = [
            doc(0, Overlay {
                sidebar_groups: Some(vec![group("Guides", &[("Best Practices", "/10")])]),
                ..titled("Docs")
            }),
            doc(1, Overlay {
                sidebar_groups: Some(vec![group("Getting Started", &[
                    ("Overview", "/01"),
                    ("Best Practices", "/10"),
                ])]),
                ..titled("Docs")
            }),
        ];

        let merged = merge(&docs, MergePrecedence::FirstWins).unwrap();
        assert_eq!(
            merged.config.sidebar_group("Getting Started").unwrap().items,
            vec![SidebarItem::new("Overview", "/01")]
        );
        assert_eq!(
            merged.config.sidebar_group("Guides").unwrap().items,
            vec![SidebarItem::new("Best Practices", "/10")]
        );
        assert_eq!(merged.warnings[0].0, 0);
    }

    #[test]
    fn test_head_tags_dedup_keeps_last() {
        let viewport = |content: &'static str| {
            HeadTag::new(HeadTagName::Meta, [("name", "viewport"), ("content", content)])
        };
        let icon = HeadTag::new(HeadTagName::Link, [("rel", "icon"), ("href", "/favicon.ico")]);
        let docs = [
            doc(0, Overlay {
                head_tags: Some(vec![viewport("width=device-width"), icon.clone()]),
                ..titled("Docs")
            }),
            doc(1, Overlay {
                head_tags: Some(vec![viewport("width=device-width, initial-scale=1.0")]),
                ..titled("Docs")
            }),
        ];

        let merged = merge(&docs, MergePrecedence::LastWins).unwrap();
        assert_eq!(
            merged.config.head_tags,
            vec![icon, viewport("width=device-width, initial-scale=1.0")]
        );
    }

    #[test]
    fn test_search_shallow_merge() {
        let options = SearchOptions {
            locales: Some(serde_json::Map::new()),
        };
        let docs = [
            doc(0, Overlay {
                search: Some(SearchConfig {
                    provider: SearchProvider::Local,
                    options: Some(options.clone()),
                }),
                ..titled("Docs")
            }),
            doc(1, Overlay {
                search: Some(SearchConfig {
                    provider: SearchProvider::None,
                    options: None,
                }),
                ..titled("Docs")
            }),
        ];

        let merged = merge(&docs, MergePrecedence::LastWins).unwrap();
        let search = merged.config.search.unwrap();
        assert_eq!(search.provider, SearchProvider::None);
        assert_eq!(search.options, Some(options));
    }

    #[test]
    fn test_theme_shallow_merge() {
        let docs = [
            doc(0, Overlay {
                theme: Some(ThemeConfig {
                    site_title: Some("Docs".to_owned()),
                    return_to_top_label: Some("Return to top".to_owned()),
                    ..Default::default()
                }),
                ..titled("Docs")
            }),
            doc(1, Overlay {
                theme: Some(ThemeConfig {
                    site_title: Some("Docs v2".to_owned()),
                    ..Default::default()
                }),
                ..titled("Docs")
            }),
        ];

        let theme = merge(&docs, MergePrecedence::LastWins).unwrap().config.theme.unwrap();
        assert_eq!(theme.site_title.as_deref(), Some("Docs v2"));
        assert_eq!(theme.return_to_top_label.as_deref(), Some("Return to top"));
    }

    #[test]
    fn test_rejected_document_is_precondition_violation() {
        let mut bad = doc(1, titled("Docs"));
        bad.result.errors.push(Diagnostic {
            origin: bad.origin.clone(),
            path: "title".to_owned(),
            kind: DiagnosticKind::MissingRequired,
            message: "'title' is required".to_owned(),
            related_path: None,
        });

        let err = merge(&[doc(0, titled("Docs")), bad], MergePrecedence::LastWins).unwrap_err();
        assert!(matches!(err, ResolveError::PreconditionViolation { index: 1, .. }));
        assert!(err.is_internal());
    }
}
