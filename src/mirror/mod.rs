//! Mirroring module: crawl orchestration and its per-page steps
//!
//! This module contains the core mirroring logic:
//! - Crawl coordination and frontier management
//! - Resource discovery in rendered markup
//! - Concurrent resource downloading
//! - In-place link rewriting

mod coordinator;
mod extractor;
mod fetcher;
mod rewriter;

pub use coordinator::{Coordinator, FrontierEntry, MirrorReport};
pub use extractor::extract_resources;
pub use fetcher::{ResourceFetcher, ResourceRecord};
pub use rewriter::{rewrite_page, RewriteOutcome};

use crate::config::Config;
use crate::render::HttpRenderer;
use crate::MirrorError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Cooperative stop signal shared between the coordinator and its caller
///
/// Cloning yields another handle to the same flag. Setting it never
/// interrupts in-flight work; the coordinator checks it once per frontier
/// pop and finishes the page it is on.
#[derive(Debug, Clone, Default)]
pub struct MirrorHandle {
    stop: Arc<AtomicBool>,
}

impl MirrorHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that the crawl stop after the current page
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    /// Returns true once a stop has been requested
    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }
}

/// Receives progress updates, once per processed page
///
/// `total` grows monotonically as new links are discovered, so the pair can
/// drive a bounded progress indicator.
pub trait ProgressObserver: Send {
    fn on_progress(&mut self, processed: usize, total: usize);
}

impl<F: FnMut(usize, usize) + Send> ProgressObserver for F {
    fn on_progress(&mut self, processed: usize, total: usize) {
        self(processed, total)
    }
}

/// Runs a complete mirror operation with the built-in HTTP renderer
///
/// This is the main entry point for mirroring a site. It will:
/// 1. Create the domain-keyed mirror root
/// 2. Seed the frontier with the configured seed URL
/// 3. Render, download, rewrite, and persist pages breadth-first
/// 4. Return a summary of what was written
///
/// # Arguments
///
/// * `config` - The validated mirror configuration
/// * `handle` - Stop signal; pass a fresh handle if cancellation is not needed
///
/// # Returns
///
/// * `Ok(MirrorReport)` - Crawl completed or was stopped cooperatively
/// * `Err(MirrorError)` - Fatal setup failure (mirror root, HTTP client)
pub async fn mirror(config: Config, handle: MirrorHandle) -> Result<MirrorReport, MirrorError> {
    let renderer = HttpRenderer::new(Duration::from_secs(config.fetch.page_timeout))?;
    let mut coordinator = Coordinator::new(config, renderer, handle)?;
    coordinator.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_clones_share_flag() {
        let handle = MirrorHandle::new();
        let clone = handle.clone();
        assert!(!clone.stop_requested());
        handle.stop();
        assert!(clone.stop_requested());
    }

    #[test]
    fn test_handle_visible_across_threads() {
        let handle = MirrorHandle::new();
        let clone = handle.clone();
        std::thread::spawn(move || clone.stop()).join().unwrap();
        assert!(handle.stop_requested());
    }

    #[test]
    fn test_closures_are_observers() {
        fn drive(observer: &mut impl ProgressObserver) {
            observer.on_progress(1, 3);
            observer.on_progress(2, 3);
        }

        let mut seen = Vec::new();
        let mut closure = |processed, total| seen.push((processed, total));
        drive(&mut closure);
        drop(closure);
        assert_eq!(seen, vec![(1, 3), (2, 3)]);
    }
}
