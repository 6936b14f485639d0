//! URL to on-disk path mapping
//!
//! One rule maps both the save path of a crawled page and the rewritten
//! target of an anchor pointing at that page, so the two always agree.

use url::Url;

/// Maps a page URL to its path relative to the site root
///
/// # Rules
///
/// 1. Take the URL's path component and strip leading/trailing slashes.
/// 2. An empty result (the site root) becomes `index.html`.
/// 3. A path that ended in `/` maps into that directory: `/docs/` becomes
///    `docs/index.html`.
/// 4. Anything else gets a `.html` suffix unless it already has one.
///
/// Query strings and fragments are discarded. The mapping is pure and
/// deterministic: the same URL always yields the same path.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemirror::url::page_rel_path;
///
/// let url = Url::parse("https://example.com/about").unwrap();
/// assert_eq!(page_rel_path(&url), "about.html");
///
/// let url = Url::parse("https://example.com/").unwrap();
/// assert_eq!(page_rel_path(&url), "index.html");
/// ```
pub fn page_rel_path(url: &Url) -> String {
    let raw = url.path();
    let trimmed = raw.trim_matches('/');

    if trimmed.is_empty() {
        return "index.html".to_string();
    }

    if raw.ends_with('/') {
        return format!("{}/index.html", trimmed);
    }

    if trimmed.ends_with(".html") {
        trimmed.to_string()
    } else {
        format!("{}.html", trimmed)
    }
}

/// Maps a resource URL to its path relative to the site root
///
/// The path is the URL's path component with the leading slash stripped,
/// kept with forward slashes so it can be embedded in markup as-is.
/// Returns `None` when the path is empty; such resources are skipped.
pub fn resource_rel_path(url: &Url) -> Option<String> {
    let rel = url.path().trim_start_matches('/');
    if rel.is_empty() {
        None
    } else {
        Some(rel.to_string())
    }
}
