//! Field readers that record diagnostics instead of failing.
//!
//! Every reader returns `None` when the value is absent or unusable and
//! records why, so sibling fields keep being checked.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::diagnostic::{Diagnostic, DiagnosticKind, FieldPath, ValidationResult};
use crate::loader::value_kind;

/// Diagnostic collector for one document.
pub(crate) struct Checker<'a> {
    origin: &'a str,
    result: ValidationResult,
}

impl<'a> Checker<'a> {
    pub(crate) fn new(origin: &'a str) -> Self {
        Self {
            origin,
            result: ValidationResult::default(),
        }
    }

    pub(crate) fn finish(self) -> ValidationResult {
        self.result
    }

    pub(crate) fn report(&mut self, path: &FieldPath, kind: DiagnosticKind, message: impl Into<String>) {
        self.push(path, kind, message.into(), None);
    }

    /// Record a finding that involves a second location.
    pub(crate) fn report_related(
        &mut self,
        path: &FieldPath,
        kind: DiagnosticKind,
        message: impl Into<String>,
        related: &FieldPath,
    ) {
        self.push(path, kind, message.into(), Some(related.to_string()));
    }

    fn push(
        &mut self,
        path: &FieldPath,
        kind: DiagnosticKind,
        message: String,
        related_path: Option<String>,
    ) {
        self.result.push(Diagnostic {
            origin: self.origin.to_owned(),
            path: path.to_string(),
            kind,
            message,
            related_path,
        });
    }

    fn type_mismatch(&mut self, path: &FieldPath, expected: &str, found: &Value) {
        self.report(
            path,
            DiagnosticKind::TypeMismatch,
            format!("expected {expected}, found {}", value_kind(found)),
        );
    }

    /// Warn about every key of `map` not listed in `known`.
    pub(crate) fn unknown_keys(&mut self, map: &Map<String, Value>, known: &[&str], path: &FieldPath) {
        for key in map.keys().filter(|k| !known.contains(&k.as_str())) {
            self.report(
                &path.key(key),
                DiagnosticKind::UnknownField,
                format!("unknown field '{key}' is ignored"),
            );
        }
    }

    pub(crate) fn string(&mut self, value: &Value, path: &FieldPath) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.type_mismatch(path, "a string", other);
                None
            }
        }
    }

    pub(crate) fn boolean(&mut self, value: &Value, path: &FieldPath) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            other => {
                self.type_mismatch(path, "a boolean", other);
                None
            }
        }
    }

    pub(crate) fn sequence<'v>(&mut self, value: &'v Value, path: &FieldPath) -> Option<&'v [Value]> {
        match value {
            Value::Array(items) => Some(items),
            other => {
                self.type_mismatch(path, "a sequence", other);
                None
            }
        }
    }

    pub(crate) fn mapping<'v>(
        &mut self,
        value: &'v Value,
        path: &FieldPath,
    ) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.type_mismatch(path, "a mapping", other);
                None
            }
        }
    }

    /// Mapping whose values must all be strings.
    pub(crate) fn string_map(
        &mut self,
        value: &Value,
        path: &FieldPath,
    ) -> Option<BTreeMap<String, String>> {
        let map = self.mapping(value, path)?;
        let mut out = BTreeMap::new();
        let mut complete = true;
        for (key, value) in map {
            match self.string(value, &path.key(key)) {
                Some(s) => {
                    out.insert(key.clone(), s);
                }
                None => complete = false,
            }
        }
        complete.then_some(out)
    }

    /// Non-empty string field that must be present.
    pub(crate) fn required_string(
        &mut self,
        map: &Map<String, Value>,
        key: &str,
        parent: &FieldPath,
    ) -> Option<String> {
        let path = parent.key(key);
        let Some(value) = map.get(key) else {
            self.report(&path, DiagnosticKind::MissingRequired, format!("'{key}' is required"));
            return None;
        };
        let s = self.string(value, &path)?;
        if s.trim().is_empty() {
            self.report(&path, DiagnosticKind::MissingRequired, format!("'{key}' cannot be empty"));
            return None;
        }
        Some(s)
    }

    pub(crate) fn optional_string(
        &mut self,
        map: &Map<String, Value>,
        key: &str,
        parent: &FieldPath,
    ) -> Option<String> {
        map.get(key).and_then(|v| self.string(v, &parent.key(key)))
    }

    pub(crate) fn optional_bool(
        &mut self,
        map: &Map<String, Value>,
        key: &str,
        parent: &FieldPath,
    ) -> Option<bool> {
        map.get(key).and_then(|v| self.boolean(v, &parent.key(key)))
    }

    /// Check a site path (must start with `/`) and return it trimmed.
    ///
    /// Surrounding whitespace is tolerated with a warning.
    pub(crate) fn site_path(&mut self, value: &str, path: &FieldPath) -> Option<String> {
        let trimmed = self.trimmed(value, path);
        if !trimmed.starts_with('/') {
            self.report(
                path,
                DiagnosticKind::InvalidPath,
                format!("'{trimmed}' must be a site path starting with '/'"),
            );
            return None;
        }
        Some(trimmed.to_owned())
    }

    /// Check a value that may be an absolute http(s) URL or a site path.
    pub(crate) fn url_or_site_path(&mut self, value: &str, path: &FieldPath) -> Option<String> {
        if is_http_url(value.trim()) {
            return Some(self.trimmed(value, path).to_owned());
        }
        self.site_path(value, path)
    }

    fn trimmed<'v>(&mut self, value: &'v str, path: &FieldPath) -> &'v str {
        let trimmed = value.trim();
        if trimmed.len() != value.len() {
            self.report(
                path,
                DiagnosticKind::UntrimmedValue,
                format!("'{value}' has surrounding whitespace; using '{trimmed}'"),
            );
        }
        trimmed
    }
}

/// Whether a value is an absolute `http://` or `https://` URL.
pub(crate) fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kinds(result: &ValidationResult) -> Vec<DiagnosticKind> {
        result
            .errors
            .iter()
            .chain(&result.warnings)
            .map(|d| d.kind)
            .collect()
    }

    #[test]
    fn test_required_string_missing() {
        let mut checker = Checker::new("doc");
        let map = Map::new();
        assert!(checker.required_string(&map, "title", &FieldPath::root()).is_none());

        let result = checker.finish();
        assert_eq!(kinds(&result), vec![DiagnosticKind::MissingRequired]);
        assert_eq!(result.errors[0].path, "title");
    }

    #[test]
    fn test_required_string_empty_is_missing() {
        let mut checker = Checker::new("doc");
        let map = json!({"title": "   "});
        let map = map.as_object().unwrap();
        assert!(checker.required_string(map, "title", &FieldPath::root()).is_none());
        assert_eq!(kinds(&checker.finish()), vec![DiagnosticKind::MissingRequired]);
    }

    #[test]
    fn test_required_string_wrong_type() {
        let mut checker = Checker::new("doc");
        let map = json!({"title": 42});
        let map = map.as_object().unwrap();
        assert!(checker.required_string(map, "title", &FieldPath::root()).is_none());

        let result = checker.finish();
        assert_eq!(kinds(&result), vec![DiagnosticKind::TypeMismatch]);
        assert!(result.errors[0].message.contains("found number"));
    }

    #[test]
    fn test_site_path_untrimmed_warns_and_trims() {
        let mut checker = Checker::new("doc");
        let path = checker.site_path("/logo-light.svg ", &FieldPath::root().key("dark"));
        assert_eq!(path.as_deref(), Some("/logo-light.svg"));

        let result = checker.finish();
        assert!(result.is_valid());
        assert_eq!(kinds(&result), vec![DiagnosticKind::UntrimmedValue]);
    }

    #[test]
    fn test_site_path_requires_leading_slash() {
        let mut checker = Checker::new("doc");
        assert!(checker.site_path("guide", &FieldPath::root()).is_none());
        assert_eq!(kinds(&checker.finish()), vec![DiagnosticKind::InvalidPath]);
    }

    #[test]
    fn test_url_or_site_path_accepts_urls() {
        let mut checker = Checker::new("doc");
        let url = checker.url_or_site_path("https://github.com/org/repo", &FieldPath::root());
        assert_eq!(url.as_deref(), Some("https://github.com/org/repo"));
        assert!(checker.finish().errors.is_empty());
    }

    #[test]
    fn test_unknown_keys_in_document_order() {
        let mut checker = Checker::new("doc");
        let map = json!({"title": "Docs", "banana": true, "apple": 1});
        checker.unknown_keys(map.as_object().unwrap(), &["title"], &FieldPath::root());

        let result = checker.finish();
        let paths: Vec<_> = result.warnings.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["banana", "apple"]);
    }

    #[test]
    fn test_string_map_rejects_non_string_values() {
        let mut checker = Checker::new("doc");
        let value = json!({"dateStyle": "short", "hour12": false});
        assert!(checker.string_map(&value, &FieldPath::root().key("formatOptions")).is_none());

        let result = checker.finish();
        assert_eq!(result.errors[0].path, "formatOptions.hour12");
    }
}
