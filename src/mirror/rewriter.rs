//! In-place link rewriting
//!
//! One pass over a page's markup, run after the page's full fetch batch has
//! completed so the document is never left half-rewritten:
//!
//! 1. Every `src`/`href` whose resolved URL matches a downloaded resource is
//!    pointed at the local copy.
//! 2. Every same-site anchor is pointed at the page path the target will be
//!    saved under, and reported back so the coordinator can enqueue it.
//!
//! Off-domain anchors and references to resources that failed to download
//! are left untouched, still pointing at the network.

use crate::mirror::fetcher::ResourceRecord;
use crate::url::{is_same_site, page_rel_path};
use crate::MirrorError;
use lol_html::html_content::Element;
use lol_html::{element, rewrite_str, RewriteStrSettings};
use std::collections::{HashMap, HashSet};
use url::Url;

/// Result of rewriting one page
#[derive(Debug)]
pub struct RewriteOutcome {
    /// The rewritten markup, ready to serialize
    pub html: String,

    /// Resolved same-site anchor targets, in document order (may repeat)
    pub discovered: Vec<Url>,
}

/// Rewrites resource references and same-site anchors in page markup
///
/// # Arguments
///
/// * `html` - The rendered markup
/// * `page_url` - The page's own absolute URL, base for resolving references
/// * `site_domain` - The crawl's target domain for the same-site check
/// * `records` - Resources downloaded for this page
///
/// # Returns
///
/// * `Ok(RewriteOutcome)` - Rewritten markup plus discovered same-site links
/// * `Err(MirrorError::Rewrite)` - The markup could not be processed
pub fn rewrite_page(
    html: &str,
    page_url: &Url,
    site_domain: &str,
    records: &[ResourceRecord],
) -> Result<RewriteOutcome, MirrorError> {
    let by_source: HashMap<&str, &str> = records
        .iter()
        .map(|r| (r.url.as_str(), r.local_path.as_str()))
        .collect();
    let local_paths: HashSet<&str> =
        records.iter().map(|r| r.local_path.as_str()).collect();

    let mut discovered = Vec::new();

    let rewritten = rewrite_str(
        html,
        RewriteStrSettings {
            element_content_handlers: vec![
                element!("*[src]", |el| {
                    rewrite_resource_attr(el, "src", page_url, &by_source);
                    Ok(())
                }),
                element!("*[href]", |el| {
                    rewrite_resource_attr(el, "href", page_url, &by_source);
                    Ok(())
                }),
                element!("a[href]", |el| {
                    let Some(href) = el.get_attribute("href") else {
                        return Ok(());
                    };
                    // Already rewritten to a fetched resource above; leave it
                    if local_paths.contains(href.as_str()) {
                        return Ok(());
                    }
                    let Ok(resolved) = page_url.join(href.trim()) else {
                        return Ok(());
                    };
                    if !is_same_site(&resolved, site_domain) {
                        return Ok(());
                    }
                    el.set_attribute("href", &page_rel_path(&resolved))?;
                    discovered.push(resolved);
                    Ok(())
                }),
            ],
            ..RewriteStrSettings::default()
        },
    )
    .map_err(|e| MirrorError::Rewrite {
        url: page_url.to_string(),
        message: e.to_string(),
    })?;

    Ok(RewriteOutcome {
        html: rewritten,
        discovered,
    })
}

/// Points one resource attribute at its local copy, if one was downloaded
fn rewrite_resource_attr(
    el: &mut Element,
    attr: &str,
    page_url: &Url,
    by_source: &HashMap<&str, &str>,
) {
    let Some(value) = el.get_attribute(attr) else {
        return;
    };
    let Ok(resolved) = page_url.join(value.trim()) else {
        return;
    };
    if let Some(local) = by_source.get(resolved.as_str()) {
        // Attribute name came from get_attribute, so this cannot fail
        let _ = el.set_attribute(attr, local);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://example.com/").unwrap()
    }

    fn record(url: &str, local: &str) -> ResourceRecord {
        ResourceRecord {
            url: Url::parse(url).unwrap(),
            local_path: local.to_string(),
        }
    }

    #[test]
    fn test_resource_src_rewritten() {
        let records = vec![record("https://example.com/assets/logo.png", "assets/logo.png")];
        let html = r#"<img src="/assets/logo.png">"#;
        let outcome = rewrite_page(html, &page_url(), "example.com", &records).unwrap();
        assert!(outcome.html.contains(r#"src="assets/logo.png""#));
    }

    #[test]
    fn test_resource_href_rewritten() {
        let records = vec![record("https://example.com/style.css", "style.css")];
        let html = r#"<link rel="stylesheet" href="style.css?ignored">"#;
        // Attribute resolves to a different URL than the record; not rewritten
        let outcome = rewrite_page(html, &page_url(), "example.com", &records).unwrap();
        assert!(outcome.html.contains("style.css?ignored"));

        let html = r#"<link rel="stylesheet" href="/style.css">"#;
        let outcome = rewrite_page(html, &page_url(), "example.com", &records).unwrap();
        assert!(outcome.html.contains(r#"href="style.css""#));
    }

    #[test]
    fn test_failed_resource_left_untouched() {
        let html = r#"<img src="/assets/logo.png">"#;
        let outcome = rewrite_page(html, &page_url(), "example.com", &[]).unwrap();
        assert!(outcome.html.contains(r#"src="/assets/logo.png""#));
    }

    #[test]
    fn test_same_site_anchor_rewritten_and_discovered() {
        let html = r#"<a href="/about">About</a>"#;
        let outcome = rewrite_page(html, &page_url(), "example.com", &[]).unwrap();
        assert!(outcome.html.contains(r#"href="about.html""#));
        assert_eq!(
            outcome.discovered,
            vec![Url::parse("https://example.com/about").unwrap()]
        );
    }

    #[test]
    fn test_subdomain_anchor_counts_as_same_site() {
        let html = r#"<a href="https://blog.example.com/post">Post</a>"#;
        let outcome = rewrite_page(html, &page_url(), "example.com", &[]).unwrap();
        assert!(outcome.html.contains(r#"href="post.html""#));
        assert_eq!(outcome.discovered.len(), 1);
    }

    #[test]
    fn test_off_domain_anchor_untouched() {
        let html = r#"<a href="https://other.org/page">Elsewhere</a>"#;
        let outcome = rewrite_page(html, &page_url(), "example.com", &[]).unwrap();
        assert!(outcome.html.contains(r#"href="https://other.org/page""#));
        assert!(outcome.discovered.is_empty());
    }

    #[test]
    fn test_anchor_to_fetched_resource_not_treated_as_page() {
        let records = vec![record("https://example.com/report.png", "report.png")];
        let html = r#"<a href="/report.png">Chart</a>"#;
        let outcome = rewrite_page(html, &page_url(), "example.com", &records).unwrap();
        // The resource pass rewrote the href; the anchor pass must not
        // re-map it to report.png.html or enqueue it.
        assert!(outcome.html.contains(r#"href="report.png""#));
        assert!(outcome.discovered.is_empty());
    }

    #[test]
    fn test_repeated_anchor_reported_each_time() {
        let html = r#"<a href="/a">one</a><a href="/a">two</a>"#;
        let outcome = rewrite_page(html, &page_url(), "example.com", &[]).unwrap();
        // Dedup is the coordinator's job, not the rewriter's
        assert_eq!(outcome.discovered.len(), 2);
    }

    #[test]
    fn test_malformed_href_ignored() {
        let html = r#"<a href="http://[">broken</a>"#;
        let outcome = rewrite_page(html, &page_url(), "example.com", &[]).unwrap();
        assert!(outcome.discovered.is_empty());
    }
}
