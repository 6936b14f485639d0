//! Sitemirror main entry point
//!
//! Command-line interface for the sitemirror website mirroring crawler.

use anyhow::Context;
use clap::Parser;
use sitemirror::config::load_config;
use sitemirror::mirror::MirrorHandle;
use sitemirror::render::HttpRenderer;
use sitemirror::state::CrawlPhase;
use sitemirror::Coordinator;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Sitemirror: mirror a website to local disk
///
/// Starting from the configured seed URL, sitemirror follows same-site links
/// breadth-first up to the configured depth, downloads the selected resource
/// categories, and rewrites the saved pages so they browse locally.
#[derive(Parser, Debug)]
#[command(name = "sitemirror")]
#[command(version)]
#[command(about = "Mirror a website to local disk", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be mirrored without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    if cli.dry_run {
        print_dry_run(&config);
        return Ok(());
    }

    // Ctrl-C requests a cooperative stop; the current page is finished first
    let handle = MirrorHandle::new();
    {
        let handle = handle.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Stop requested, finishing the current page");
                handle.stop();
            }
        });
    }

    let renderer = HttpRenderer::new(Duration::from_secs(config.fetch.page_timeout))
        .context("failed to build HTTP client")?;

    let mut coordinator = Coordinator::new(config, renderer, handle)
        .context("failed to initialize mirror")?
        .with_observer(Box::new(|processed: usize, total: usize| {
            tracing::info!("Progress: {}/{} pages", processed, total);
        }));

    let report = coordinator.run().await.context("mirror failed")?;

    println!(
        "{}: {} pages saved, {} resources saved, {} discovered",
        if report.phase == CrawlPhase::Stopped {
            "Stopped"
        } else {
            "Done"
        },
        report.pages_saved,
        report.resources_saved,
        report.discovered
    );
    if report.pages_failed > 0 {
        println!("{} pages failed; see log for details", report.pages_failed);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemirror=info,warn"),
            1 => EnvFilter::new("sitemirror=debug,info"),
            2 => EnvFilter::new("sitemirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: validates config and shows what would be mirrored
fn print_dry_run(config: &sitemirror::Config) {
    println!("=== Sitemirror Dry Run ===\n");

    println!("Mirror:");
    println!("  Seed URL: {}", config.mirror.seed_url);
    println!("  Max depth: {}", config.mirror.max_depth);
    println!("  Save root: {}", config.mirror.save_root);
    println!("  Categories: {:?}", config.mirror.categories);

    println!("\nFetch:");
    println!("  Page timeout: {}s", config.fetch.page_timeout);
    println!("  Resource timeout: {}s", config.fetch.resource_timeout);
    println!(
        "  Max concurrent downloads: {}",
        config.fetch.max_concurrent_downloads
    );

    println!(
        "\nResource extensions: {}",
        config.extension_allowlist().join(", ")
    );

    println!("\n✓ Configuration is valid");
}
