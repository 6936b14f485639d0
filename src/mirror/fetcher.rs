//! Concurrent resource downloading
//!
//! Downloads one page's resource set into the mirror tree. Failures are
//! per-item: a 404, timeout, or write error for one resource is logged and
//! skipped without affecting its siblings or the enclosing page.

use crate::config::FetchConfig;
use crate::url::resource_rel_path;
use crate::{MirrorError, USER_AGENT};
use futures::stream::{self, StreamExt};
use reqwest::{Client, StatusCode};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// A successfully downloaded resource
///
/// `local_path` is relative to the site root, always forward-slashed so it
/// can be written straight into markup attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub url: Url,
    pub local_path: String,
}

/// Downloads resource batches with bounded parallelism
pub struct ResourceFetcher {
    client: Client,
    timeout: Duration,
    concurrency: usize,
}

impl ResourceFetcher {
    /// Builds a fetcher from the fetch configuration
    pub fn new(config: &FetchConfig) -> Result<Self, MirrorError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(config.resource_timeout),
            concurrency: config.max_concurrent_downloads,
        })
    }

    /// Downloads a page's resource set into `site_root`
    ///
    /// Downloads run concurrently up to the configured parallelism;
    /// completion order is unspecified. Returns a record for each resource
    /// that was actually saved - failed items are simply absent.
    pub async fn fetch_all(&self, urls: HashSet<Url>, site_root: &Path) -> Vec<ResourceRecord> {
        stream::iter(urls)
            .map(|url| self.fetch_one(url, site_root))
            .buffer_unordered(self.concurrency)
            .filter_map(|record| async move { record })
            .collect()
            .await
    }

    /// Downloads a single resource; returns None on any per-item failure
    async fn fetch_one(&self, url: Url, site_root: &Path) -> Option<ResourceRecord> {
        let Some(rel_path) = resource_rel_path(&url) else {
            tracing::trace!("Skipping resource with empty path: {}", url);
            return None;
        };

        let target = site_root.join(&rel_path);
        if let Some(parent) = target.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                tracing::warn!("Failed to create directory for {}: {}", url, e);
                return None;
            }
        }

        let response = match self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to fetch resource {}: {}", url, e);
                return None;
            }
        };

        if response.status() != StatusCode::OK {
            tracing::warn!(
                "Skipping resource {}: HTTP {}",
                url,
                response.status().as_u16()
            );
            return None;
        }

        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Failed to read resource body {}: {}", url, e);
                return None;
            }
        };

        if let Err(e) = tokio::fs::write(&target, &body).await {
            tracing::warn!("Failed to write {}: {}", target.display(), e);
            return None;
        }

        tracing::debug!("Saved resource {} -> {}", url, rel_path);
        Some(ResourceRecord {
            url,
            local_path: rel_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> ResourceFetcher {
        ResourceFetcher::new(&FetchConfig::default()).unwrap()
    }

    fn urls(server: &MockServer, paths: &[&str]) -> HashSet<Url> {
        paths
            .iter()
            .map(|p| Url::parse(&format!("{}{}", server.uri(), p)).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_fetch_saves_resource() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/assets/logo.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png-bytes".to_vec()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let records = fetcher()
            .fetch_all(urls(&server, &["/assets/logo.png"]), dir.path())
            .await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].local_path, "assets/logo.png");
        let saved = std::fs::read(dir.path().join("assets/logo.png")).unwrap();
        assert_eq!(saved, b"png-bytes");
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ok.css"))
            .respond_with(ResponseTemplate::new(200).set_body_string("body{}"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/gone.css"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let records = fetcher()
            .fetch_all(urls(&server, &["/ok.css", "/gone.css"]), dir.path())
            .await;

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].local_path, "ok.css");
        assert!(dir.path().join("ok.css").exists());
        assert!(!dir.path().join("gone.css").exists());
    }

    #[tokio::test]
    async fn test_empty_path_skipped() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let records = fetcher().fetch_all(urls(&server, &["/"]), dir.path()).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_non_200_not_written() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/moved.js"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/elsewhere.js"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let records = fetcher()
            .fetch_all(urls(&server, &["/moved.js"]), dir.path())
            .await;
        assert!(records.is_empty());
    }
}
