//! Typed site configuration.
//!
//! [`SiteConfig`] is the canonical, resolved configuration handed to a site
//! generator. [`Overlay`] holds what a single validated document defines; the
//! merger folds overlays into a `SiteConfig`.
//!
//! Serialization uses the camelCase keys of the input documents so the
//! emitted configuration reads the same way it was written.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

/// Canonical site configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Site title.
    pub title: String,
    /// Site description.
    pub description: String,
    /// Whether the generator should emit extension-less URLs.
    pub clean_urls: bool,
    /// Top navigation bar entries.
    pub navigation: Vec<NavEntry>,
    /// Sidebar groups in display order.
    pub sidebar_groups: Vec<SidebarGroup>,
    /// Search provider configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchConfig>,
    /// Tags injected into every page's `<head>`.
    pub head_tags: Vec<HeadTag>,
    /// Theme labels and switches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeConfig>,
    /// "Edit this page" link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_link: Option<EditLinkConfig>,
    /// "Last updated" stamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<LastUpdatedConfig>,
    /// Site logo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoConfig>,
    /// Social profile links.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub social_links: Vec<SocialLink>,
    /// Page footer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<FooterConfig>,
    /// Markdown rendering options passed through to the generator.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<MarkdownConfig>,
}

impl SiteConfig {
    /// Iterate over every sidebar item together with its group.
    pub fn sidebar_items(&self) -> impl Iterator<Item = (&SidebarGroup, &SidebarItem)> {
        self.sidebar_groups
            .iter()
            .flat_map(|group| group.items.iter().map(move |item| (group, item)))
    }

    /// Find a sidebar group by label.
    #[must_use]
    pub fn sidebar_group(&self, label: &str) -> Option<&SidebarGroup> {
        self.sidebar_groups.iter().find(|g| g.label == label)
    }
}

/// Navigation bar entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum NavEntry {
    /// Link to a page or external URL.
    Leaf {
        /// Display label.
        label: String,
        /// URL or site path.
        target: String,
    },
    /// Dropdown of entries.
    Group {
        /// Display label.
        label: String,
        /// Entries inside the dropdown.
        children: Vec<NavEntry>,
    },
}

impl NavEntry {
    /// Create a leaf entry.
    #[must_use]
    pub fn leaf(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Leaf {
            label: label.into(),
            target: target.into(),
        }
    }

    /// Create a group entry.
    #[must_use]
    pub fn group(label: impl Into<String>, children: Vec<NavEntry>) -> Self {
        Self::Group {
            label: label.into(),
            children,
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Leaf { label, .. } | Self::Group { label, .. } => label,
        }
    }

    /// Number of levels from this entry down to its deepest leaf (a leaf is 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Group { children, .. } => {
                1 + children.iter().map(NavEntry::depth).max().unwrap_or(0)
            }
        }
    }
}

/// Labelled group of sidebar links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarGroup {
    /// Group heading; also the merge key.
    pub label: String,
    /// Whether the group starts collapsed.
    pub collapsed: bool,
    /// Links in display order.
    pub items: Vec<SidebarItem>,
}

/// Sidebar link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SidebarItem {
    /// Display label.
    pub label: String,
    /// Site path starting with `/`.
    pub link: String,
}

impl SidebarItem {
    #[must_use]
    pub fn new(label: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            link: link.into(),
        }
    }
}

/// Search provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    /// Generator-side local full-text search.
    Local,
    /// Search disabled.
    None,
}

impl SearchProvider {
    /// Parse a provider name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "local" => Some(Self::Local),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Search configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchConfig {
    /// Selected provider.
    pub provider: SearchProvider,
    /// Provider options.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<SearchOptions>,
}

/// Options of the local search provider.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchOptions {
    /// Locale id → translation strings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locales: Option<Map<String, Value>>,
}

/// Kind of injected head tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadTagName {
    Link,
    Meta,
    Script,
}

impl HeadTagName {
    /// Parse a tag name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "link" => Some(Self::Link),
            "meta" => Some(Self::Meta),
            "script" => Some(Self::Script),
            _ => None,
        }
    }
}

/// Tag injected into the page `<head>`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadTag {
    /// Element name.
    pub tag_name: HeadTagName,
    /// Element attributes.
    pub attributes: BTreeMap<String, String>,
    /// Inline element content (scripts only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl HeadTag {
    /// Create a tag from attribute pairs.
    #[must_use]
    pub fn new<'a>(
        tag_name: HeadTagName,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            tag_name,
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
            content: None,
        }
    }

    /// Attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Identity used to de-duplicate head tags.
    ///
    /// - `meta`: its `name`, else its `property`
    /// - `link`: `rel` together with `href` (several preconnect links may coexist)
    /// - `script`: its `src`
    ///
    /// Tags without a key (e.g. inline scripts) are never de-duplicated.
    #[must_use]
    pub fn dedup_key(&self) -> Option<(HeadTagName, String)> {
        let key = match self.tag_name {
            HeadTagName::Meta => self
                .attribute("name")
                .map(|name| format!("name={name}"))
                .or_else(|| {
                    self.attribute("property")
                        .map(|property| format!("property={property}"))
                }),
            HeadTagName::Link => self
                .attribute("rel")
                .map(|rel| format!("rel={rel} href={}", self.attribute("href").unwrap_or(""))),
            HeadTagName::Script => self.attribute("src").map(|src| format!("src={src}")),
        };
        key.map(|key| (self.tag_name, key))
    }
}

/// Theme labels and switches.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode_switch_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode_switch_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light_mode_switch_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidebar_menu_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_to_top_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_link_icon: Option<bool>,
}

impl ThemeConfig {
    /// Shallow merge: keys set in `later` override keys set here.
    #[must_use]
    pub fn overlay(self, later: Self) -> Self {
        Self {
            site_title: later.site_title.or(self.site_title),
            dark_mode_switch_label: later.dark_mode_switch_label.or(self.dark_mode_switch_label),
            dark_mode_switch_title: later.dark_mode_switch_title.or(self.dark_mode_switch_title),
            light_mode_switch_title: later
                .light_mode_switch_title
                .or(self.light_mode_switch_title),
            sidebar_menu_label: later.sidebar_menu_label.or(self.sidebar_menu_label),
            return_to_top_label: later.return_to_top_label.or(self.return_to_top_label),
            outline_title: later.outline_title.or(self.outline_title),
            external_link_icon: later.external_link_icon.or(self.external_link_icon),
        }
    }
}

/// "Edit this page" link.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EditLinkConfig {
    /// URL pattern with a `:path` placeholder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Link text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl EditLinkConfig {
    #[must_use]
    pub fn overlay(self, later: Self) -> Self {
        Self {
            pattern: later.pattern.or(self.pattern),
            text: later.text.or(self.text),
        }
    }
}

/// "Last updated" stamp.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastUpdatedConfig {
    /// Label text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// `Intl.DateTimeFormat`-style options, e.g. `dateStyle = "short"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_options: Option<BTreeMap<String, String>>,
}

impl LastUpdatedConfig {
    #[must_use]
    pub fn overlay(self, later: Self) -> Self {
        Self {
            text: later.text.or(self.text),
            format_options: later.format_options.or(self.format_options),
        }
    }
}

/// Site logo: a single image or a light/dark pair.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LogoConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub light: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark: Option<String>,
}

impl LogoConfig {
    #[must_use]
    pub fn overlay(self, later: Self) -> Self {
        Self {
            src: later.src.or(self.src),
            light: later.light.or(self.light),
            dark: later.dark.or(self.dark),
        }
    }
}

/// Social profile link.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SocialLink {
    /// Icon name, e.g. `github`.
    pub icon: String,
    /// Absolute profile URL.
    pub link: String,
}

/// Page footer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FooterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
}

impl FooterConfig {
    #[must_use]
    pub fn overlay(self, later: Self) -> Self {
        Self {
            message: later.message.or(self.message),
            copyright: later.copyright.or(self.copyright),
        }
    }
}

/// Markdown options passed through to the generator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkdownConfig {
    /// Syntax highlighting theme.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Show line numbers in code blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_numbers: Option<bool>,
}

impl MarkdownConfig {
    #[must_use]
    pub fn overlay(self, later: Self) -> Self {
        Self {
            theme: later.theme.or(self.theme),
            line_numbers: later.line_numbers.or(self.line_numbers),
        }
    }
}

/// Fields defined by one validated document.
///
/// `None` means the document does not define the field, so an earlier
/// document's value survives the merge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Overlay {
    pub title: Option<String>,
    pub description: Option<String>,
    pub clean_urls: Option<bool>,
    pub navigation: Option<Vec<NavEntry>>,
    pub sidebar_groups: Option<Vec<SidebarGroup>>,
    pub search: Option<SearchConfig>,
    pub head_tags: Option<Vec<HeadTag>>,
    pub theme: Option<ThemeConfig>,
    pub edit_link: Option<EditLinkConfig>,
    pub last_updated: Option<LastUpdatedConfig>,
    pub logo: Option<LogoConfig>,
    pub social_links: Option<Vec<SocialLink>>,
    pub footer: Option<FooterConfig>,
    pub markdown: Option<MarkdownConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_depth() {
        let leaf = NavEntry::leaf("Home", "/");
        assert_eq!(leaf.depth(), 1);

        let group = NavEntry::group("More", vec![NavEntry::leaf("Theming", "/08-theming")]);
        assert_eq!(group.depth(), 2);

        let nested = NavEntry::group("Outer", vec![group]);
        assert_eq!(nested.depth(), 3);

        assert_eq!(NavEntry::group("Empty", Vec::new()).depth(), 1);
    }

    #[test]
    fn test_meta_dedup_key_prefers_name() {
        let tag = HeadTag::new(
            HeadTagName::Meta,
            [("name", "theme-color"), ("content", "#00d4aa")],
        );
        assert_eq!(
            tag.dedup_key(),
            Some((HeadTagName::Meta, "name=theme-color".to_owned()))
        );

        let og = HeadTag::new(
            HeadTagName::Meta,
            [("property", "og:type"), ("content", "website")],
        );
        assert_eq!(
            og.dedup_key(),
            Some((HeadTagName::Meta, "property=og:type".to_owned()))
        );
    }

    #[test]
    fn test_link_dedup_key_distinguishes_href() {
        let a = HeadTag::new(
            HeadTagName::Link,
            [("rel", "preconnect"), ("href", "https://fonts.googleapis.com")],
        );
        let b = HeadTag::new(
            HeadTagName::Link,
            [("rel", "preconnect"), ("href", "https://fonts.gstatic.com")],
        );
        assert_ne!(a.dedup_key(), b.dedup_key());
    }

    #[test]
    fn test_inline_script_has_no_dedup_key() {
        let tag = HeadTag {
            tag_name: HeadTagName::Script,
            attributes: BTreeMap::new(),
            content: Some("window.x = 1".to_owned()),
        };
        assert!(tag.dedup_key().is_none());
    }

    #[test]
    fn test_theme_overlay_is_shallow() {
        let base = ThemeConfig {
            site_title: Some("Docs".to_owned()),
            sidebar_menu_label: Some("Menu".to_owned()),
            ..Default::default()
        };
        let later = ThemeConfig {
            site_title: Some("Docs v2".to_owned()),
            external_link_icon: Some(true),
            ..Default::default()
        };

        let merged = base.overlay(later);
        assert_eq!(merged.site_title.as_deref(), Some("Docs v2"));
        assert_eq!(merged.sidebar_menu_label.as_deref(), Some("Menu"));
        assert_eq!(merged.external_link_icon, Some(true));
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let config = SiteConfig {
            title: "Docs".to_owned(),
            clean_urls: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["cleanUrls"], serde_json::json!(true));
        assert!(json.get("sidebarGroups").is_some());
        assert!(json.get("search").is_none());
        assert!(json.get("socialLinks").is_none());
    }

    #[test]
    fn test_nav_entry_serializes_untagged() {
        let entry = NavEntry::group("More", vec![NavEntry::leaf("API", "/06-api-integration")]);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "label": "More",
                "children": [{"label": "API", "target": "/06-api-integration"}]
            })
        );
    }
}
