// src/pipeline/collect.rs

//! Collection orchestrator.
//!
//! Fans per-region scrapes out over a bounded worker pool, merges the
//! partial results, deduplicates by URL hash, and persists the batch
//! snapshot. One failing region never aborts its siblings.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::{Instant, timeout_at};

use crate::error::Result;
use crate::models::{Announcement, Config, Source};
use crate::sources::SourceAdapter;
use crate::storage::LocalCache;

/// Summary of one collection run.
#[derive(Debug, Default)]
pub struct CollectOutcome {
    /// Merged, deduplicated batch
    pub announcements: Vec<Announcement>,
    /// Collection tasks dispatched (regions, or 1 for single-call sources)
    pub region_total: usize,
    /// Tasks that failed or timed out
    pub region_failures: usize,
    /// Records dropped by the URL-hash dedup pass
    pub duplicates_dropped: usize,
    /// Whether any task overran the batch deadline
    pub deadline_exceeded: bool,
}

/// Run one collection pass with the given adapter.
///
/// The site adapter is fanned out one task per target region, bounded by
/// `crawler.max_workers`; search and fixture adapters get a single
/// region-less invocation. Every task runs under the shared batch deadline.
pub async fn run_collect(
    config: &Arc<Config>,
    adapter: Arc<dyn SourceAdapter>,
    cache: &LocalCache,
) -> Result<CollectOutcome> {
    let max_age_days = config.filters.max_age_days;
    let deadline = Instant::now() + Duration::from_secs(config.crawler.batch_deadline_secs);

    let mut outcome = CollectOutcome::default();
    let mut buffer = Vec::new();

    if adapter.kind() == Source::Site {
        let regions: Vec<String> = config.target_regions.clone();
        let concurrency = config.crawler.max_workers.max(1);
        outcome.region_total = regions.len();

        let mut task_stream = stream::iter(regions)
            .map(|region| {
                let adapter = Arc::clone(&adapter);
                async move {
                    let result =
                        timeout_at(deadline, adapter.collect(Some(&region), max_age_days)).await;
                    (region, result)
                }
            })
            .buffer_unordered(concurrency);

        while let Some((region, result)) = task_stream.next().await {
            match result {
                Ok(Ok(records)) => {
                    log::info!("{}: {} announcement(s) collected", region, records.len());
                    buffer.extend(records);
                }
                Ok(Err(error)) => {
                    outcome.region_failures += 1;
                    log::warn!("Failed to collect {}: {}", region, error);
                }
                Err(_) => {
                    outcome.region_failures += 1;
                    outcome.deadline_exceeded = true;
                    log::warn!("Collection for {} exceeded the batch deadline", region);
                }
            }
        }
    } else {
        outcome.region_total = 1;
        match timeout_at(deadline, adapter.collect(None, max_age_days)).await {
            Ok(Ok(records)) => {
                log::info!("{} announcement(s) collected", records.len());
                buffer.extend(records);
            }
            Ok(Err(error)) => {
                outcome.region_failures += 1;
                log::warn!("Collection failed: {}", error);
            }
            Err(_) => {
                outcome.region_failures += 1;
                outcome.deadline_exceeded = true;
                log::warn!("Collection exceeded the batch deadline");
            }
        }
    }

    // Merge pass: first occurrence of a URL hash wins.
    let mut seen = HashSet::new();
    for record in buffer {
        if seen.insert(record.url_hash.clone()) {
            outcome.announcements.push(record);
        } else {
            outcome.duplicates_dropped += 1;
        }
    }
    if outcome.duplicates_dropped > 0 {
        log::info!(
            "{} duplicate announcement(s) dropped",
            outcome.duplicates_dropped
        );
    }

    // The snapshot matters less than the batch itself; losing it only
    // costs the next informational read.
    if let Err(error) = cache.store(&outcome.announcements).await {
        log::warn!("Failed to write cache snapshot: {}", error);
    }

    Ok(outcome)
}
