//! Structural validator.
//!
//! Walks every recognized field of a [`RawDocument`] and records problems as
//! diagnostics. Checks never short-circuit: a bad sibling field does not hide
//! problems elsewhere in the document. Alongside the [`ValidationResult`] the
//! validator produces the document's typed [`Overlay`], which only the merger
//! consumes, and only when the result is valid.
//!
//! Per field, the first violated rule wins, in this order: missing required
//! value, type mismatch, navigation depth, duplicate sidebar link, head tag
//! attributes, site path shape.

mod checker;
mod head;
mod navigation;
mod sections;
mod sidebar;

use serde_json::{Map, Value};

use crate::diagnostic::{FieldPath, ValidationResult};
use crate::loader::RawDocument;
use crate::model::Overlay;

use checker::Checker;

pub(crate) use checker::is_http_url;
pub(crate) use head::missing_attributes;
pub(crate) use navigation::MAX_NAV_DEPTH;

/// Top-level keys of a configuration document.
pub const TOP_LEVEL_KEYS: &[&str] = &[
    "title",
    "description",
    "cleanUrls",
    "navigation",
    "sidebarGroups",
    "search",
    "headTags",
    "theme",
    "editLink",
    "lastUpdated",
    "logo",
    "socialLinks",
    "footer",
    "markdown",
];

/// A document after validation.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidatedDocument {
    /// Position in the input sequence.
    pub index: usize,
    /// Document label.
    pub origin: String,
    /// Errors and warnings found.
    pub result: ValidationResult,
    /// Fields the document defines. Complete only when `result` is valid.
    pub overlay: Overlay,
}

impl ValidatedDocument {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.result.is_valid()
    }
}

/// Validate one document.
#[must_use]
pub fn validate(doc: &RawDocument) -> ValidatedDocument {
    let mut checker = Checker::new(&doc.origin);
    let root = FieldPath::root();
    let fields = &doc.fields;

    checker.unknown_keys(fields, TOP_LEVEL_KEYS, &root);

    let overlay = Overlay {
        title: checker.required_string(fields, "title", &root),
        description: checker.optional_string(fields, "description", &root),
        clean_urls: checker.optional_bool(fields, "cleanUrls", &root),
        navigation: field(&mut checker, fields, "navigation", navigation::check),
        sidebar_groups: field(&mut checker, fields, "sidebarGroups", sidebar::check),
        search: field(&mut checker, fields, "search", sections::search),
        head_tags: field(&mut checker, fields, "headTags", head::check),
        theme: field(&mut checker, fields, "theme", sections::theme),
        edit_link: field(&mut checker, fields, "editLink", sections::edit_link),
        last_updated: field(&mut checker, fields, "lastUpdated", sections::last_updated),
        logo: field(&mut checker, fields, "logo", sections::logo),
        social_links: field(&mut checker, fields, "socialLinks", sections::social_links),
        footer: field(&mut checker, fields, "footer", sections::footer),
        markdown: field(&mut checker, fields, "markdown", sections::markdown),
    };

    let result = checker.finish();
    tracing::debug!(
        origin = %doc.origin,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "Validated document"
    );

    ValidatedDocument {
        index: doc.index,
        origin: doc.origin.clone(),
        result,
        overlay,
    }
}

/// Run `check` on an optional top-level field.
fn field<T>(
    checker: &mut Checker<'_>,
    fields: &Map<String, Value>,
    key: &str,
    check: impl FnOnce(&mut Checker<'_>, &Value, &FieldPath) -> Option<T>,
) -> Option<T> {
    let value = fields.get(key)?;
    check(checker, value, &FieldPath::root().key(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DiagnosticKind;
    use crate::loader::{SourceDocument, load};
    use crate::model::{NavEntry, SidebarItem};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn validate_value(value: Value) -> ValidatedDocument {
        let docs = load(vec![SourceDocument::new("doc", value)]).unwrap();
        validate(&docs[0])
    }

    #[test]
    fn test_minimal_document() {
        let doc = validate_value(json!({"title": "Docs"}));
        assert!(doc.is_valid());
        assert_eq!(doc.overlay.title.as_deref(), Some("Docs"));
        assert!(doc.overlay.navigation.is_none());
    }

    #[test]
    fn test_missing_title() {
        let doc = validate_value(json!({"description": "no title"}));
        assert!(!doc.is_valid());
        assert_eq!(doc.result.errors[0].kind, DiagnosticKind::MissingRequired);
        assert_eq!(doc.result.errors[0].path, "title");
    }

    #[test]
    fn test_empty_title() {
        let doc = validate_value(json!({"title": ""}));
        assert_eq!(doc.result.errors.len(), 1);
        assert_eq!(doc.result.errors[0].kind, DiagnosticKind::MissingRequired);
    }

    #[test]
    fn test_unknown_top_level_key_is_warning() {
        let doc = validate_value(json!({"title": "Docs", "banana": true}));
        assert!(doc.is_valid());
        assert_eq!(doc.result.warnings.len(), 1);
        assert_eq!(doc.result.warnings[0].kind, DiagnosticKind::UnknownField);
        assert_eq!(doc.result.warnings[0].path, "banana");
    }

    #[test]
    fn test_type_mismatches_in_sibling_fields_all_reported() {
        let doc = validate_value(json!({
            "title": "Docs",
            "cleanUrls": "yes",
            "navigation": {"label": "Home"},
            "sidebarGroups": "none"
        }));

        let paths: Vec<_> = doc.result.errors.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["cleanUrls", "navigation", "sidebarGroups"]);
        assert!(
            doc.result
                .errors
                .iter()
                .all(|d| d.kind == DiagnosticKind::TypeMismatch)
        );
    }

    #[test]
    fn test_full_document_overlay() {
        let doc = validate_value(json!({
            "title": "Cepro.ai Documentation",
            "description": "Comprehensive documentation",
            "cleanUrls": true,
            "navigation": [
                {"label": "Home", "target": "/"},
                {"label": "More", "children": [{"label": "Theming", "target": "/08-theming"}]}
            ],
            "sidebarGroups": [
                {"label": "Getting Started", "items": [{"label": "Overview", "link": "/01-application-overview"}]}
            ],
            "search": {"provider": "local"},
            "headTags": [["link", {"rel": "icon", "href": "/favicon.ico"}]],
            "theme": {"siteTitle": "Cepro.ai Docs"},
            "editLink": {"pattern": "https://github.com/your-org/cepro-frontend/edit/main/docs/:path"},
            "lastUpdated": {"text": "Last updated"},
            "footer": {"message": "Built with VitePress"},
            "markdown": {"lineNumbers": true}
        }));

        assert!(doc.is_valid(), "{:?}", doc.result);
        assert!(doc.result.warnings.is_empty());
        let overlay = doc.overlay;
        assert_eq!(overlay.clean_urls, Some(true));
        assert_eq!(
            overlay.navigation.unwrap()[1],
            NavEntry::group("More", vec![NavEntry::leaf("Theming", "/08-theming")])
        );
        assert_eq!(
            overlay.sidebar_groups.unwrap()[0].items,
            vec![SidebarItem::new("Overview", "/01-application-overview")]
        );
        assert_eq!(overlay.head_tags.unwrap().len(), 1);
        assert!(overlay.search.is_some());
        assert!(overlay.footer.is_some());
    }
}
