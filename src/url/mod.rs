//! URL handling module for sitemirror
//!
//! This module provides domain extraction, the same-site check used to decide
//! which anchors are followed, and the URL-to-local-path mapping shared by
//! page saving and link rewriting.

mod domain;
mod paths;

// Re-export main functions
pub use domain::{extract_domain, is_same_site};
pub use paths::{page_rel_path, resource_rel_path};
