//! Sitemirror: a depth-bounded website mirroring crawler
//!
//! This crate mirrors a website to local disk: starting from a seed URL it
//! follows same-site hyperlinks breadth-first up to a configured depth,
//! downloads the assets each page references, and rewrites the saved pages so
//! links and asset references resolve against the local copy.

pub mod config;
pub mod mirror;
pub mod render;
pub mod state;
pub mod url;

use thiserror::Error;

/// User agent sent with every page and resource request.
pub(crate) const USER_AGENT: &str = concat!("sitemirror/", env!("CARGO_PKG_VERSION"));

/// Main error type for mirroring operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to rewrite {url}: {message}")]
    Rewrite { url: String, message: String },

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for mirroring operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, ResourceCategory};
pub use mirror::{Coordinator, MirrorHandle, MirrorReport, ProgressObserver};
pub use render::{HttpRenderer, PageRenderer, RenderError};
pub use state::{CrawlPhase, CrawlState};
pub use url::{extract_domain, is_same_site, page_rel_path, resource_rel_path};
