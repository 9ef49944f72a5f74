//! Checks for the option sections: search, theme, edit link, last updated,
//! logo, social links, footer and markdown.

use serde_json::{Map, Value};

use super::checker::{Checker, is_http_url};
use crate::diagnostic::{DiagnosticKind, FieldPath};
use crate::model::{
    EditLinkConfig, FooterConfig, LastUpdatedConfig, LogoConfig, MarkdownConfig, SearchConfig,
    SearchOptions, SearchProvider, SocialLink, ThemeConfig,
};

const SEARCH_KEYS: &[&str] = &["provider", "options"];
const SEARCH_OPTION_KEYS: &[&str] = &["locales"];
const THEME_KEYS: &[&str] = &[
    "siteTitle",
    "darkModeSwitchLabel",
    "darkModeSwitchTitle",
    "lightModeSwitchTitle",
    "sidebarMenuLabel",
    "returnToTopLabel",
    "outlineTitle",
    "externalLinkIcon",
];
const EDIT_LINK_KEYS: &[&str] = &["pattern", "text"];
const LAST_UPDATED_KEYS: &[&str] = &["text", "formatOptions"];
const LOGO_KEYS: &[&str] = &["src", "light", "dark"];
const SOCIAL_LINK_KEYS: &[&str] = &["icon", "link"];
const FOOTER_KEYS: &[&str] = &["message", "copyright"];
const MARKDOWN_KEYS: &[&str] = &["theme", "lineNumbers"];

/// Placeholder the edit link pattern substitutes with the page path.
const PATH_PLACEHOLDER: &str = ":path";

/// Mapping section with its unknown keys reported.
fn section<'v>(
    checker: &mut Checker<'_>,
    value: &'v Value,
    path: &FieldPath,
    known: &[&str],
) -> Option<&'v Map<String, Value>> {
    let map = checker.mapping(value, path)?;
    checker.unknown_keys(map, known, path);
    Some(map)
}

pub(super) fn search(checker: &mut Checker<'_>, value: &Value, path: &FieldPath) -> Option<SearchConfig> {
    let map = section(checker, value, path, SEARCH_KEYS)?;

    let provider_path = path.key("provider");
    let provider = match map.get("provider") {
        None => {
            checker.report(&provider_path, DiagnosticKind::MissingRequired, "'provider' is required");
            None
        }
        Some(v) => checker.string(v, &provider_path).and_then(|name| {
            let parsed = SearchProvider::parse(&name);
            if parsed.is_none() {
                checker.report(
                    &provider_path,
                    DiagnosticKind::TypeMismatch,
                    format!("unknown search provider '{name}' (expected local or none)"),
                );
            }
            parsed
        }),
    };

    let options_path = path.key("options");
    let options = match map.get("options") {
        None => Some(None),
        Some(v) if provider == Some(SearchProvider::None) => {
            checker.report(
                &options_path,
                DiagnosticKind::IgnoredField,
                "search options have no effect when provider is 'none'",
            );
            checker.mapping(v, &options_path).map(|_| None)
        }
        Some(v) => search_options(checker, v, &options_path).map(Some),
    };

    Some(SearchConfig {
        provider: provider?,
        options: options?,
    })
}

fn search_options(checker: &mut Checker<'_>, value: &Value, path: &FieldPath) -> Option<SearchOptions> {
    let map = section(checker, value, path, SEARCH_OPTION_KEYS)?;

    let locales = match map.get("locales") {
        None => None,
        Some(v) => {
            let locales_path = path.key("locales");
            let locales = checker.mapping(v, &locales_path)?;
            let mut complete = true;
            for (locale, strings) in locales {
                complete &= checker.mapping(strings, &locales_path.key(locale)).is_some();
            }
            if !complete {
                return None;
            }
            Some(locales.clone())
        }
    };

    Some(SearchOptions { locales })
}

pub(super) fn theme(checker: &mut Checker<'_>, value: &Value, path: &FieldPath) -> Option<ThemeConfig> {
    let map = section(checker, value, path, THEME_KEYS)?;
    Some(ThemeConfig {
        site_title: checker.optional_string(map, "siteTitle", path),
        dark_mode_switch_label: checker.optional_string(map, "darkModeSwitchLabel", path),
        dark_mode_switch_title: checker.optional_string(map, "darkModeSwitchTitle", path),
        light_mode_switch_title: checker.optional_string(map, "lightModeSwitchTitle", path),
        sidebar_menu_label: checker.optional_string(map, "sidebarMenuLabel", path),
        return_to_top_label: checker.optional_string(map, "returnToTopLabel", path),
        outline_title: checker.optional_string(map, "outlineTitle", path),
        external_link_icon: checker.optional_bool(map, "externalLinkIcon", path),
    })
}

pub(super) fn edit_link(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &FieldPath,
) -> Option<EditLinkConfig> {
    let map = section(checker, value, path, EDIT_LINK_KEYS)?;
    let pattern = checker.optional_string(map, "pattern", path);
    if let Some(pattern) = &pattern
        && !pattern.contains(PATH_PLACEHOLDER)
    {
        checker.report(
            &path.key("pattern"),
            DiagnosticKind::MissingPlaceholder,
            format!("pattern has no '{PATH_PLACEHOLDER}' placeholder; every page links to the same URL"),
        );
    }
    Some(EditLinkConfig {
        pattern,
        text: checker.optional_string(map, "text", path),
    })
}

pub(super) fn last_updated(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &FieldPath,
) -> Option<LastUpdatedConfig> {
    let map = section(checker, value, path, LAST_UPDATED_KEYS)?;
    Some(LastUpdatedConfig {
        text: checker.optional_string(map, "text", path),
        format_options: map
            .get("formatOptions")
            .and_then(|v| checker.string_map(v, &path.key("formatOptions"))),
    })
}

/// A logo is either a single path or a `{light, dark}` pair.
pub(super) fn logo(checker: &mut Checker<'_>, value: &Value, path: &FieldPath) -> Option<LogoConfig> {
    if let Value::String(src) = value {
        return Some(LogoConfig {
            src: Some(checker.url_or_site_path(src, path)?),
            ..Default::default()
        });
    }

    let map = section(checker, value, path, LOGO_KEYS)?;
    let mut image = |key: &str| -> Option<Option<String>> {
        let image_path = path.key(key);
        match map.get(key) {
            None => Some(None),
            Some(v) => checker
                .string(v, &image_path)
                .and_then(|s| checker.url_or_site_path(&s, &image_path))
                .map(Some),
        }
    };
    let (src, light, dark) = (image("src"), image("light"), image("dark"));
    Some(LogoConfig {
        src: src?,
        light: light?,
        dark: dark?,
    })
}

pub(super) fn social_links(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &FieldPath,
) -> Option<Vec<SocialLink>> {
    let links = checker.sequence(value, path)?;
    links
        .iter()
        .enumerate()
        .map(|(i, link)| {
            let link_path = path.index(i);
            let map = section(checker, link, &link_path, SOCIAL_LINK_KEYS)?;
            let icon = checker.required_string(map, "icon", &link_path);
            let url_path = link_path.key("link");
            let url = checker.required_string(map, "link", &link_path).and_then(|url| {
                if is_http_url(url.trim()) {
                    checker.url_or_site_path(&url, &url_path)
                } else {
                    checker.report(
                        &url_path,
                        DiagnosticKind::InvalidPath,
                        format!("'{url}' must be an absolute http(s) URL"),
                    );
                    None
                }
            });
            Some(SocialLink {
                icon: icon?,
                link: url?,
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .collect()
}

pub(super) fn footer(checker: &mut Checker<'_>, value: &Value, path: &FieldPath) -> Option<FooterConfig> {
    let map = section(checker, value, path, FOOTER_KEYS)?;
    Some(FooterConfig {
        message: checker.optional_string(map, "message", path),
        copyright: checker.optional_string(map, "copyright", path),
    })
}

pub(super) fn markdown(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &FieldPath,
) -> Option<MarkdownConfig> {
    let map = section(checker, value, path, MARKDOWN_KEYS)?;
    Some(MarkdownConfig {
        theme: checker.optional_string(map, "theme", path),
        line_numbers: checker.optional_bool(map, "lineNumbers", path),
    })
}
