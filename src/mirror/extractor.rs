//! Resource discovery in rendered markup
//!
//! Scans the fixed set of tag/attribute pairs that carry asset references,
//! resolves each against the page URL, and keeps the ones whose path matches
//! the configured extension allowlist.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Tag/attribute pairs scanned for resource references
const RESOURCE_ATTRS: &[(&str, &str)] = &[
    ("script", "src"),
    ("link", "href"),
    ("img", "src"),
    ("source", "src"),
    ("video", "src"),
    ("iframe", "src"),
];

/// Extracts resource URLs from a parsed document
///
/// Each attribute value is resolved against `base_url`, so relative
/// references become absolute. A resolved URL is kept only when its path
/// ends (case-insensitively) with one of the allowed extensions. Tags or
/// attributes absent from the document are skipped; values that fail to
/// resolve are ignored.
///
/// # Arguments
///
/// * `document` - The parsed page markup
/// * `base_url` - The page's own URL, used to resolve relative references
/// * `allowlist` - Allowed extensions, lowercase with leading dot
///
/// # Returns
///
/// The set of resolved resource URLs (no duplicates, order irrelevant)
pub fn extract_resources(
    document: &Html,
    base_url: &Url,
    allowlist: &[&str],
) -> HashSet<Url> {
    let mut resources = HashSet::new();

    if allowlist.is_empty() {
        return resources;
    }

    for (tag, attr) in RESOURCE_ATTRS {
        let Ok(selector) = Selector::parse(&format!("{}[{}]", tag, attr)) else {
            continue;
        };

        for element in document.select(&selector) {
            let Some(value) = element.value().attr(attr) else {
                continue;
            };

            let Ok(resolved) = base_url.join(value.trim()) else {
                continue;
            };

            if has_allowed_extension(resolved.path(), allowlist) {
                resources.insert(resolved);
            }
        }
    }

    resources
}

/// Checks whether a URL path ends with one of the allowed extensions
fn has_allowed_extension(path: &str, allowlist: &[&str]) -> bool {
    let lower = path.to_ascii_lowercase();
    allowlist.iter().any(|ext| lower.ends_with(ext))
}
