use url::Url;

/// Extracts the domain from a URL
///
/// Returns the host portion of the URL, lowercased. Ports are not part of the
/// domain, so `https://example.com:8080/` yields `example.com`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitemirror::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether a URL belongs to the site being mirrored
///
/// The check is substring containment: the URL's host is considered part of
/// the site when it contains `site_domain` anywhere. Containment means
/// subdomains like `cdn.example.com` count as `example.com`, but it also
/// matches unrelated hosts that merely contain the domain as a substring
/// (e.g. `example.com.evil.net`). Tightening this to an exact-host or
/// suffix check would change which pages get mirrored, so callers relying on
/// the current mirror layout should not assume a stricter match.
pub fn is_same_site(url: &Url, site_domain: &str) -> bool {
    match url.host_str() {
        Some(host) => host.to_lowercase().contains(site_domain),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_domain() {
        let url = Url::parse("https://example.com/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_lowercases_host() {
        let url = Url::parse("https://Example.COM/page").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_ignores_port() {
        let url = Url::parse("http://127.0.0.1:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("127.0.0.1".to_string()));
    }

    #[test]
    fn test_same_site_exact_host() {
        let url = Url::parse("https://example.com/about").unwrap();
        assert!(is_same_site(&url, "example.com"));
    }

    #[test]
    fn test_same_site_subdomain() {
        let url = Url::parse("https://blog.example.com/post").unwrap();
        assert!(is_same_site(&url, "example.com"));
    }

    #[test]
    fn test_same_site_substring_containment() {
        // Documented quirk: containment also matches hosts that merely
        // embed the domain.
        let url = Url::parse("https://example.com.evil.net/").unwrap();
        assert!(is_same_site(&url, "example.com"));
    }

    #[test]
    fn test_off_site_host() {
        let url = Url::parse("https://other.org/page").unwrap();
        assert!(!is_same_site(&url, "example.com"));
    }

    #[test]
    fn test_same_site_case_insensitive() {
        let url = Url::parse("https://EXAMPLE.com/page").unwrap();
        assert!(is_same_site(&url, "example.com"));
    }
}
