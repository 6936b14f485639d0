//! Crawl coordinator - main mirroring orchestration logic
//!
//! The coordinator owns all mutable crawl state: the FIFO frontier, the
//! visited and queued sets, and the progress counters. It processes one page
//! at a time; the only concurrency inside the loop is the page's own
//! resource fetch batch. The stop flag is the single piece of state shared
//! with the outside and is polled once per frontier pop.

use crate::config::Config;
use crate::mirror::extractor::extract_resources;
use crate::mirror::fetcher::ResourceFetcher;
use crate::mirror::rewriter::rewrite_page;
use crate::mirror::{MirrorHandle, ProgressObserver};
use crate::render::PageRenderer;
use crate::state::{CrawlPhase, CrawlState};
use crate::url::{extract_domain, page_rel_path};
use crate::{MirrorError, UrlError};
use scraper::Html;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use url::Url;

/// A URL waiting in the frontier, with the depth it was discovered at
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
}

/// Summary of a finished (or stopped) crawl
#[derive(Debug, Clone)]
pub struct MirrorReport {
    /// Pages written to disk
    pub pages_saved: usize,

    /// Pages abandoned after a render or write failure
    pub pages_failed: usize,

    /// Resources written to disk, summed over all pages
    pub resources_saved: usize,

    /// Frontier entries taken up for processing
    pub processed: usize,

    /// URLs ever queued, including entries later discarded by the depth bound
    pub discovered: usize,

    /// `Completed` when the frontier ran dry, `Stopped` after a stop request
    pub phase: CrawlPhase,
}

/// Main mirroring coordinator structure
pub struct Coordinator<R: PageRenderer> {
    renderer: R,
    fetcher: ResourceFetcher,
    allowlist: Vec<&'static str>,
    max_depth: u32,
    site_domain: String,
    site_root: PathBuf,
    frontier: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    queued: HashSet<String>,
    state: CrawlState,
    handle: MirrorHandle,
    observer: Option<Box<dyn ProgressObserver>>,
    pages_saved: usize,
    pages_failed: usize,
    resources_saved: usize,
}

impl<R: PageRenderer> Coordinator<R> {
    /// Creates a new coordinator and its mirror root on disk
    ///
    /// The mirror root is `<save-root>/<seed domain>`. Failing to create it
    /// is fatal: without the root no page or resource can be persisted.
    ///
    /// # Arguments
    ///
    /// * `config` - The validated mirror configuration
    /// * `renderer` - Renderer used to obtain each page's markup
    /// * `handle` - Shared stop signal, polled once per frontier pop
    pub fn new(config: Config, renderer: R, handle: MirrorHandle) -> Result<Self, MirrorError> {
        let seed =
            Url::parse(&config.mirror.seed_url).map_err(|e| UrlError::Parse(e.to_string()))?;
        let site_domain = extract_domain(&seed).ok_or(UrlError::MissingDomain)?;

        let site_root = Path::new(&config.mirror.save_root).join(&site_domain);
        std::fs::create_dir_all(&site_root)?;

        let fetcher = ResourceFetcher::new(&config.fetch)?;
        let allowlist = config.extension_allowlist();

        let mut state = CrawlState::new();
        let mut frontier = VecDeque::new();
        let mut queued = HashSet::new();

        // Seed the frontier at depth 0
        queued.insert(seed.as_str().to_string());
        state.record_discovered();
        frontier.push_back(FrontierEntry {
            url: seed,
            depth: 0,
        });

        Ok(Self {
            renderer,
            fetcher,
            allowlist,
            max_depth: config.mirror.max_depth,
            site_domain,
            site_root,
            frontier,
            visited: HashSet::new(),
            queued,
            state,
            handle,
            observer: None,
            pages_saved: 0,
            pages_failed: 0,
            resources_saved: 0,
        })
    }

    /// Installs a progress observer, called once per processed page
    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The directory the mirror is written under (`<save-root>/<domain>`)
    pub fn site_root(&self) -> &Path {
        &self.site_root
    }

    /// Runs the main crawl loop until the frontier is empty or stop is requested
    ///
    /// Breadth-first order: entries are popped FIFO, so shallower pages and
    /// their resources are materialized before deeper ones. Per-page failures
    /// are logged and contained; only fatal setup errors surface here.
    pub async fn run(&mut self) -> Result<MirrorReport, MirrorError> {
        self.state.transition(CrawlPhase::Running)?;
        tracing::info!(
            "Mirroring {} into {}",
            self.site_domain,
            self.site_root.display()
        );

        loop {
            if self.handle.stop_requested() {
                tracing::info!("Stop requested, leaving remaining frontier unprocessed");
                self.state.transition(CrawlPhase::Stopping)?;
                break;
            }

            let Some(entry) = self.frontier.pop_front() else {
                break;
            };

            let url_key = entry.url.as_str().to_string();

            // Discarded entries stay counted in the discovered total
            if self.visited.contains(&url_key) || entry.depth > self.max_depth {
                continue;
            }

            self.visited.insert(url_key);
            self.state.record_processed();
            if let Some(observer) = &mut self.observer {
                observer.on_progress(self.state.processed(), self.state.discovered());
            }

            self.process_page(&entry).await;
        }

        match self.state.phase() {
            CrawlPhase::Stopping => self.state.transition(CrawlPhase::Stopped)?,
            _ => self.state.transition(CrawlPhase::Completed)?,
        }

        let report = self.report();
        tracing::info!(
            "Crawl {}: {} pages saved, {} resources saved, {} page failures",
            report.phase,
            report.pages_saved,
            report.resources_saved,
            report.pages_failed
        );
        Ok(report)
    }

    /// Processes a single frontier entry: render, extract, fetch, rewrite, persist
    ///
    /// Nothing here aborts the crawl; each failure abandons only this page.
    async fn process_page(&mut self, entry: &FrontierEntry) {
        tracing::debug!("Visiting {} (depth {})", entry.url, entry.depth);

        let markup = match self.renderer.render(&entry.url).await {
            Ok(markup) => markup,
            Err(e) => {
                tracing::warn!("Failed to render {}: {}", entry.url, e);
                self.pages_failed += 1;
                return;
            }
        };

        // The parsed document must not live across an await point
        let resources = {
            let document = Html::parse_document(&markup);
            extract_resources(&document, &entry.url, &self.allowlist)
        };

        let records = self.fetcher.fetch_all(resources, &self.site_root).await;
        self.resources_saved += records.len();

        let outcome = match rewrite_page(&markup, &entry.url, &self.site_domain, &records) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!("{}", e);
                self.pages_failed += 1;
                return;
            }
        };

        for link in outcome.discovered {
            self.enqueue(link, entry.depth + 1);
        }

        let save_path = self.site_root.join(page_rel_path(&entry.url));
        if let Err(e) = self.persist_page(&save_path, &outcome.html).await {
            tracing::warn!("Failed to write {}: {}", save_path.display(), e);
            self.pages_failed += 1;
            return;
        }

        self.pages_saved += 1;
        tracing::debug!("Saved page {} -> {}", entry.url, save_path.display());
    }

    /// Queues a discovered link unless it was already visited or queued
    ///
    /// The queued set replaces a linear scan over pending entries; the dedup
    /// semantics are the same. Entries beyond the depth bound are still
    /// queued and counted - the bound is enforced at pop time.
    fn enqueue(&mut self, url: Url, depth: u32) {
        let key = url.as_str().to_string();
        if self.visited.contains(&key) || self.queued.contains(&key) {
            return;
        }
        self.queued.insert(key);
        self.state.record_discovered();
        self.frontier.push_back(FrontierEntry { url, depth });
    }

    /// Writes rewritten markup to its mapped path, creating parent directories
    async fn persist_page(&self, path: &Path, html: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, html).await
    }

    fn report(&self) -> MirrorReport {
        MirrorReport {
            pages_saved: self.pages_saved,
            pages_failed: self.pages_failed,
            resources_saved: self.resources_saved,
            processed: self.state.processed(),
            discovered: self.state.discovered(),
            phase: self.state.phase(),
        }
    }
}
