//! Navigation bar checks.

use serde_json::Value;

use super::checker::Checker;
use crate::diagnostic::{DiagnosticKind, FieldPath};
use crate::model::NavEntry;

/// Deepest allowed navigation: root → group → leaf.
pub(crate) const MAX_NAV_DEPTH: usize = 2;

const ENTRY_KEYS: &[&str] = &["label", "target", "children"];

pub(super) fn check(checker: &mut Checker<'_>, value: &Value, path: &FieldPath) -> Option<Vec<NavEntry>> {
    let entries = checker.sequence(value, path)?;
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| check_entry(checker, entry, &path.index(i), 1))
        // collect into Vec<Option<_>> first so every entry gets checked
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

fn check_entry(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &FieldPath,
    level: usize,
) -> Option<NavEntry> {
    let map = checker.mapping(value, path)?;
    checker.unknown_keys(map, ENTRY_KEYS, path);
    let label = checker.required_string(map, "label", path);

    match (map.get("target"), map.get("children")) {
        (Some(_), Some(_)) => {
            checker.report(
                path,
                DiagnosticKind::TypeMismatch,
                "navigation entry cannot have both 'target' and 'children'",
            );
            None
        }
        (Some(target), None) => {
            let target = check_target(checker, target, &path.key("target"))?;
            label.map(|label| NavEntry::Leaf { label, target })
        }
        (None, Some(children)) => {
            let children_path = path.key("children");
            if level >= MAX_NAV_DEPTH {
                checker.report(
                    path,
                    DiagnosticKind::DepthExceeded,
                    format!("navigation groups may only nest {MAX_NAV_DEPTH} levels deep (root → group → leaf)"),
                );
                return None;
            }
            let items = checker.sequence(children, &children_path)?;
            if items.is_empty() {
                checker.report(
                    &children_path,
                    DiagnosticKind::MissingRequired,
                    "navigation group must have at least one child",
                );
                return None;
            }
            let children: Option<Vec<_>> = items
                .iter()
                .enumerate()
                .map(|(i, child)| check_entry(checker, child, &children_path.index(i), level + 1))
                .collect::<Vec<_>>()
                .into_iter()
                .collect();
            label.zip(children).map(|(label, children)| NavEntry::Group { label, children })
        }
        (None, None) => {
            checker.report(
                &path.key("target"),
                DiagnosticKind::MissingRequired,
                "navigation entry needs a 'target' or 'children'",
            );
            None
        }
    }
}

fn check_target(checker: &mut Checker<'_>, value: &Value, path: &FieldPath) -> Option<String> {
    let target = checker.string(value, path)?;
    if target.trim().is_empty() {
        checker.report(path, DiagnosticKind::MissingRequired, "'target' cannot be empty");
        return None;
    }
    checker.url_or_site_path(&target, path)
}
