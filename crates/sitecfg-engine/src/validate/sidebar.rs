//! Sidebar checks.
//!
//! Links must be site paths and unique across every group of the document;
//! a link filed twice means the same page appears in two places.

use std::collections::HashMap;

use serde_json::Value;

use super::checker::Checker;
use crate::diagnostic::{DiagnosticKind, FieldPath};
use crate::model::{SidebarGroup, SidebarItem};

const GROUP_KEYS: &[&str] = &["label", "collapsed", "items"];
const ITEM_KEYS: &[&str] = &["label", "link"];

pub(super) fn check(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &FieldPath,
) -> Option<Vec<SidebarGroup>> {
    let groups = checker.sequence(value, path)?;

    let mut links: HashMap<String, FieldPath> = HashMap::new();
    let mut labels: HashMap<String, FieldPath> = HashMap::new();
    let mut out = Vec::with_capacity(groups.len());
    let mut complete = true;

    for (i, group) in groups.iter().enumerate() {
        let group_path = path.index(i);
        let Some(map) = checker.mapping(group, &group_path) else {
            complete = false;
            continue;
        };
        checker.unknown_keys(map, GROUP_KEYS, &group_path);

        let label = checker.required_string(map, "label", &group_path);
        if let Some(label) = &label {
            let label_path = group_path.key("label");
            if let Some(first) = labels.get(label) {
                checker.report_related(
                    &label_path,
                    DiagnosticKind::DuplicateGroupLabel,
                    format!("group '{label}' is already defined at {first}; this definition replaces it"),
                    first,
                );
            } else {
                labels.insert(label.clone(), label_path);
            }
        }
        let collapsed = checker.optional_bool(map, "collapsed", &group_path);

        let items_path = group_path.key("items");
        let items = match map.get("items") {
            Some(items) => check_items(checker, items, &items_path, &mut links),
            None => {
                checker.report(&items_path, DiagnosticKind::MissingRequired, "'items' is required");
                None
            }
        };

        match (label, items) {
            (Some(label), Some(items)) => out.push(SidebarGroup {
                label,
                collapsed: collapsed.unwrap_or(false),
                items,
            }),
            _ => complete = false,
        }
    }

    complete.then_some(out)
}

fn check_items(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &FieldPath,
    links: &mut HashMap<String, FieldPath>,
) -> Option<Vec<SidebarItem>> {
    let items = checker.sequence(value, path)?;
    let mut out = Vec::with_capacity(items.len());
    let mut complete = true;

    for (i, item) in items.iter().enumerate() {
        let item_path = path.index(i);
        let Some(map) = checker.mapping(item, &item_path) else {
            complete = false;
            continue;
        };
        checker.unknown_keys(map, ITEM_KEYS, &item_path);

        let label = checker.required_string(map, "label", &item_path);
        let link = checker
            .required_string(map, "link", &item_path)
            .and_then(|link| check_link(checker, &link, &item_path.key("link"), links));

        match (label, link) {
            (Some(label), Some(link)) => out.push(SidebarItem { label, link }),
            _ => complete = false,
        }
    }

    complete.then_some(out)
}

/// Duplicate detection runs before the path rule so a repeated link is
/// reported as a duplicate rather than a bad path.
fn check_link(
    checker: &mut Checker<'_>,
    link: &str,
    path: &FieldPath,
    links: &mut HashMap<String, FieldPath>,
) -> Option<String> {
    let key = link.trim();
    if let Some(first) = links.get(key) {
        checker.report_related(
            path,
            DiagnosticKind::DuplicateLink,
            format!("link '{key}' is already filed at {first}"),
            first,
        );
        return None;
    }
    links.insert(key.to_owned(), path.clone());
    checker.site_path(link, path)
}
