// src/sources/site.rs

//! Static-site adapter.
//!
//! Harvests announcement links from configured education-bureau pages by
//! keyword-filtering every anchor on the page. Sites vary too much for
//! per-site selectors, so this deliberately stays at the link-text level.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::fetch::FetchClient;
use crate::models::{Announcement, Config, Source};
use crate::sources::SourceAdapter;
use crate::utils::{older_than_days, resolve_url};

/// Interview-specific title keywords.
const INTERVIEW_KEYWORDS: [&str; 6] = [
    "结构化面试",
    "面试安排",
    "面试通知",
    "面试公告",
    "答辩",
    "面试时间",
];

/// Broader recruitment title keywords.
const RECRUITMENT_KEYWORDS: [&str; 5] =
    ["教师招聘", "公开招聘", "招聘公告", "事业编制", "招录"];

/// Anchors with shorter visible text are navigation noise.
const MIN_TITLE_CHARS: usize = 8;

/// Hard cap on records harvested from a single page.
const MAX_RECORDS_PER_SITE: usize = 50;

/// Adapter scraping configured region sites for announcement links.
pub struct SiteAdapter {
    config: Arc<Config>,
    fetcher: FetchClient,
}

impl SiteAdapter {
    /// Create a new site adapter with the given configuration.
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_fetcher(config, FetchClient::new())
    }

    /// Create an adapter backed by a specific fetch client.
    pub fn with_fetcher(config: Arc<Config>, fetcher: FetchClient) -> Self {
        Self { config, fetcher }
    }

    /// Fetch and parse one region's site.
    async fn collect_site(
        &self,
        region: &str,
        site_url: &str,
        max_age_days: u32,
    ) -> Result<Vec<Announcement>> {
        let timeout = Duration::from_secs(self.config.crawler.timeout_secs);
        // No politeness delay here: region sites run under the
        // orchestrator's bounded fan-out.
        let html = self
            .fetcher
            .fetch(site_url, timeout, false)
            .await
            .ok_or_else(|| AppError::collect(region, format!("no response from {site_url}")))?;

        self.parse_page(region, site_url, &html, max_age_days)
    }

    /// Harvest matching anchors from a fetched page.
    ///
    /// Synchronous on purpose: `Html` is not `Send` and must not live
    /// across an await point.
    fn parse_page(
        &self,
        region: &str,
        site_url: &str,
        html: &str,
        max_age_days: u32,
    ) -> Result<Vec<Announcement>> {
        let base_url = Url::parse(site_url)?;
        let document = Html::parse_document(html);
        let anchor_sel = Self::parse_selector("a[href]")?;

        let mut records = Vec::new();
        for element in document.select(&anchor_sel) {
            let text: String = element.text().collect();
            let title = text.split_whitespace().collect::<Vec<_>>().join(" ");

            if title.chars().count() < MIN_TITLE_CHARS {
                continue;
            }
            if !Self::keyword_match(&title) {
                continue;
            }
            if older_than_days(&title, max_age_days) {
                continue;
            }

            let href = match element.value().attr("href") {
                Some(href) if !href.trim().is_empty() => href,
                _ => continue,
            };
            let link = resolve_url(&base_url, href);

            records.push(Announcement::new(region, title, link));
            if records.len() >= MAX_RECORDS_PER_SITE {
                log::debug!("Record cap reached for {}", region);
                break;
            }
        }

        Ok(records)
    }

    fn keyword_match(title: &str) -> bool {
        INTERVIEW_KEYWORDS
            .iter()
            .chain(RECRUITMENT_KEYWORDS.iter())
            .any(|keyword| title.contains(keyword))
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

#[async_trait]
impl SourceAdapter for SiteAdapter {
    fn kind(&self) -> Source {
        Source::Site
    }

    async fn collect(&self, region: Option<&str>, max_age_days: u32) -> Result<Vec<Announcement>> {
        let sites = &self.config.data_sources.sites.urls;

        match region {
            Some(region) => {
                let site_url = sites
                    .get(region)
                    .ok_or_else(|| AppError::collect(region, "no site configured for region"))?;
                self.collect_site(region, site_url, max_age_days).await
            }
            None => {
                // Sequential sweep; one failing site must not abort the rest.
                let mut records = Vec::new();
                for (region, site_url) in sites {
                    match self.collect_site(region, site_url, max_age_days).await {
                        Ok(found) => {
                            log::info!("{}: {} announcement(s)", region, found.len());
                            records.extend(found);
                        }
                        Err(error) => {
                            log::warn!("Failed to collect {}: {}", region, error);
                        }
                    }
                }
                Ok(records)
            }
        }
    }
}
