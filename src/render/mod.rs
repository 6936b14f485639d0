//! Page rendering
//!
//! The coordinator only needs one capability from a renderer: navigate to a
//! URL and hand back the page's markup. [`PageRenderer`] is that seam.
//! [`HttpRenderer`] is the built-in implementation: a plain HTTP GET, so the
//! markup is the server-rendered snapshot. A headless-browser renderer that
//! executes scripts and waits for network idle can be slotted in behind the
//! same trait without touching the crawl logic.

use crate::USER_AGENT;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors a renderer can report for a single page
///
/// All of these are per-page failures: the coordinator logs them and moves on
/// to the next frontier entry.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Navigation timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Expected HTML for {url}, got {content_type}")]
    ContentMismatch { url: String, content_type: String },
}

/// Turns a URL into fully rendered markup
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Navigates to `url` and returns the page's markup
    async fn render(&self, url: &Url) -> Result<String, RenderError>;
}

/// Renderer backed by a plain HTTP client
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    /// Builds a renderer with the given navigation timeout
    ///
    /// # Arguments
    ///
    /// * `navigation_timeout` - Upper bound on the whole request, connect
    ///   included
    pub fn new(navigation_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(navigation_timeout)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &Url) -> Result<String, RenderError> {
        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            if e.is_timeout() {
                RenderError::Timeout {
                    url: url.to_string(),
                }
            } else {
                RenderError::Http {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // Servers that omit Content-Type get the benefit of the doubt
        if !content_type.is_empty() && !content_type.contains("text/html") {
            return Err(RenderError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        response.text().await.map_err(|e| RenderError::Http {
            url: url.to_string(),
            source: e,
        })
    }
}
