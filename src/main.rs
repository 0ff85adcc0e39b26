// src/main.rs

//! Interview announcement collector CLI.

use std::sync::Arc;

use clap::{Parser, Subcommand};
use kaoqing::{
    error::Result,
    models::Config,
    pipeline::{self, CollectOutcome, DigestInput, FallbackReport, Validator},
    push::PushClient,
    sources,
    storage::LocalCache,
    utils,
};

/// kaoqing - teacher recruitment interview intel collector
#[derive(Parser, Debug)]
#[command(
    name = "kaoqing",
    version,
    about = "Collects teacher-recruitment structured-interview announcements"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Collect, validate, render the digest, and push if configured
    Run,

    /// Collect announcements and update the cache snapshot
    Collect,

    /// Validate configuration and the cached batch
    Validate {
        /// Probe link reachability (slow, network-bound)
        #[arg(long)]
        check_links: bool,
    },

    /// Render the digest from the cached batch without scraping
    Digest,

    /// Show cache snapshot info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Run the active adapter; no enabled source yields an empty outcome
/// without touching the cache snapshot.
async fn collect_step(config: &Arc<Config>, cache: &LocalCache) -> Result<CollectOutcome> {
    let Some(adapter) = sources::select_adapter(config) else {
        log::warn!("No data source enabled; nothing to collect");
        return Ok(CollectOutcome::default());
    };

    log::info!("Collecting via {} source...", adapter.kind());
    let outcome = pipeline::run_collect(config, adapter, cache).await?;
    log::info!(
        "Collected {} announcement(s) from {} task(s) ({} failed)",
        outcome.announcements.len(),
        outcome.region_total,
        outcome.region_failures
    );
    Ok(outcome)
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("kaoqing collector starting...");

    let config = Arc::new(Config::load_or_default(&cli.config));
    let cache = LocalCache::new(&config.output.cache_file);

    match cli.command {
        Command::Run => {
            let outcome = collect_step(&config, &cache).await?;

            let validator = Validator::new(config.validation.probe_timeout_secs);
            let (_, summary) = validator
                .validate_batch(&outcome.announcements, config.validation.check_links)
                .await;
            log::info!(
                "Validation: {}/{} valid ({:.1}%)",
                summary.valid,
                summary.total,
                summary.validation_rate
            );

            let date = utils::today_shanghai();
            let input = DigestInput {
                announcements: outcome.announcements,
                questions: Vec::new(),
                validation: summary,
                date: date.clone(),
            };
            let path = pipeline::run_digest(&config.output, &FallbackReport, &input).await?;

            if config.push.enabled {
                let push = PushClient::new(&config.push);
                let content = tokio::fs::read_to_string(&path).await?;
                let title = format!("🎓 教师考编结构化面试简报 {}", date);
                push.send(&title, &content).await?;
            }
        }

        Command::Collect => {
            collect_step(&config, &cache).await?;
        }

        Command::Validate { check_links } => {
            log::info!("Validating configuration...");
            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} target region(s), {} site(s))",
                config.target_regions.len(),
                config.data_sources.sites.urls.len()
            );

            match cache.load().await? {
                Some(snapshot) => {
                    let validator = Validator::new(config.validation.probe_timeout_secs);
                    let (_, summary) = validator
                        .validate_batch(&snapshot.announcements, check_links)
                        .await;
                    log::info!(
                        "Cached batch: {}/{} valid ({:.1}%), {} link(s) reachable",
                        summary.valid,
                        summary.total,
                        summary.validation_rate,
                        summary.link_accessible_count
                    );
                    for sample in &summary.errors {
                        log::warn!(
                            "#{} {}: {}",
                            sample.index,
                            sample.title,
                            sample.errors.join("、")
                        );
                    }
                }
                None => log::info!("No cache snapshot to validate yet."),
            }
        }

        Command::Digest => {
            let announcements = cache
                .load()
                .await?
                .map(|snapshot| snapshot.announcements)
                .unwrap_or_default();
            log::info!("Rendering digest from {} cached record(s)", announcements.len());

            let validator = Validator::new(config.validation.probe_timeout_secs);
            let (_, summary) = validator.validate_batch(&announcements, false).await;

            let input = DigestInput {
                announcements,
                questions: Vec::new(),
                validation: summary,
                date: utils::today_shanghai(),
            };
            pipeline::run_digest(&config.output, &FallbackReport, &input).await?;
        }

        Command::Info => {
            log::info!("Config file: {}", cli.config);
            log::info!("Cache file: {}", config.output.cache_file);

            match cache.load().await? {
                Some(snapshot) => {
                    log::info!("Last updated: {}", snapshot.updated_at);
                    log::info!("Cached announcements: {}", snapshot.announcements.len());
                }
                None => log::info!("No snapshot found yet."),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
