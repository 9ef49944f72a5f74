//! Head tag checks.
//!
//! Accepts the mapping form `{tagName, attributes, content}` and the tuple
//! form `[tagName, attributes]` / `[tagName, attributes, content]`.

use std::collections::BTreeMap;

use serde_json::Value;

use super::checker::Checker;
use crate::diagnostic::{DiagnosticKind, FieldPath};
use crate::model::{HeadTag, HeadTagName};

const TAG_KEYS: &[&str] = &["tagName", "attributes", "content"];

pub(super) fn check(checker: &mut Checker<'_>, value: &Value, path: &FieldPath) -> Option<Vec<HeadTag>> {
    let tags = checker.sequence(value, path)?;
    // check every tag before giving up on the field
    tags.iter()
        .enumerate()
        .map(|(i, tag)| check_tag(checker, tag, &path.index(i)))
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

/// Tag parts located in either input form.
struct Parts<'v> {
    name: (Option<&'v Value>, FieldPath),
    attributes: (Option<&'v Value>, FieldPath),
    content: (Option<&'v Value>, FieldPath),
}

fn split<'v>(checker: &mut Checker<'_>, value: &'v Value, path: &FieldPath) -> Option<Parts<'v>> {
    match value {
        Value::Array(parts) if (2..=3).contains(&parts.len()) => Some(Parts {
            name: (parts.first(), path.index(0)),
            attributes: (parts.get(1), path.index(1)),
            content: (parts.get(2), path.index(2)),
        }),
        Value::Array(_) => {
            checker.report(
                path,
                DiagnosticKind::TypeMismatch,
                "expected [tagName, attributes] or [tagName, attributes, content]",
            );
            None
        }
        Value::Object(map) => {
            checker.unknown_keys(map, TAG_KEYS, path);
            Some(Parts {
                name: (map.get("tagName"), path.key("tagName")),
                attributes: (map.get("attributes"), path.key("attributes")),
                content: (map.get("content"), path.key("content")),
            })
        }
        _ => {
            checker.report(
                path,
                DiagnosticKind::TypeMismatch,
                "expected a head tag mapping or [tagName, attributes]",
            );
            None
        }
    }
}

fn check_tag(checker: &mut Checker<'_>, value: &Value, path: &FieldPath) -> Option<HeadTag> {
    let parts = split(checker, value, path)?;

    let tag_name = match parts.name {
        (None, name_path) => {
            checker.report(&name_path, DiagnosticKind::MissingRequired, "'tagName' is required");
            None
        }
        (Some(name), name_path) => checker.string(name, &name_path).and_then(|name| {
            let parsed = HeadTagName::parse(&name);
            if parsed.is_none() {
                checker.report(
                    &name_path,
                    DiagnosticKind::InvalidHeadTag,
                    format!("unknown head tag '{name}' (expected link, meta or script)"),
                );
            }
            parsed
        }),
    };

    let attributes = match parts.attributes {
        (None, _) => Some(BTreeMap::new()),
        (Some(attrs), attrs_path) => checker.string_map(attrs, &attrs_path),
    };

    let content = match parts.content {
        (None, _) => Some(None),
        (Some(content), content_path) => checker.string(content, &content_path).map(Some),
    };

    let tag = HeadTag {
        tag_name: tag_name?,
        attributes: attributes?,
        content: content?,
    };
    if let Some(problem) = missing_attributes(&tag) {
        checker.report(path, DiagnosticKind::InvalidHeadTag, problem);
        return None;
    }
    Some(tag)
}

/// Describe the required attributes a tag lacks, if any.
pub(crate) fn missing_attributes(tag: &HeadTag) -> Option<&'static str> {
    let has = |name: &str| tag.attributes.contains_key(name);
    match tag.tag_name {
        HeadTagName::Meta if !(has("name") || has("property")) || !has("content") => {
            Some("meta tag requires 'content' and one of 'name' or 'property'")
        }
        HeadTagName::Link if !has("rel") => Some("link tag requires 'rel'"),
        HeadTagName::Script if !has("src") && tag.content.is_none() => {
            Some("script tag requires 'src' or inline content")
        }
        _ => None,
    }
}
