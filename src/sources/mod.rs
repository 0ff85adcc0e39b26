//! Source adapters that produce announcement records.
//!
//! This module contains one adapter per collection strategy:
//! - Government site scraping (`SiteAdapter`)
//! - Sogou WeChat search (`SearchAdapter`)
//! - Canned demo records (`FixtureAdapter`)
//!
//! Exactly one adapter is active per run, chosen by [`select_adapter`].

mod fixture;
mod search;
mod site;

pub use fixture::FixtureAdapter;
pub use search::SearchAdapter;
pub use site::SiteAdapter;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Announcement, Config, Source};

/// A collection strategy producing announcement records.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// The source tag this adapter stamps on its records.
    fn kind(&self) -> Source;

    /// Collect announcements for one region, or across all configured
    /// regions/keywords when `region` is `None`.
    ///
    /// `max_age_days` is the recency window; records older than that are
    /// dropped when the adapter can tell their age.
    async fn collect(&self, region: Option<&str>, max_age_days: u32)
        -> Result<Vec<Announcement>>;
}

/// Choose the adapter for this run.
///
/// Priority order: search, then fixture, then sites. Returns `None` when no
/// source is enabled; the caller treats that as an empty batch.
pub fn select_adapter(config: &Arc<Config>) -> Option<Arc<dyn SourceAdapter>> {
    let sources = &config.data_sources;
    if sources.search.enabled {
        Some(Arc::new(SearchAdapter::new(Arc::clone(config))))
    } else if sources.fixture.enabled {
        Some(Arc::new(FixtureAdapter::new()))
    } else if sources.sites.enabled {
        Some(Arc::new(SiteAdapter::new(Arc::clone(config))))
    } else {
        None
    }
}
