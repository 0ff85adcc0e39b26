//! Application configuration structures.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Regions to collect announcements for
    #[serde(default = "defaults::target_regions")]
    pub target_regions: Vec<String>,

    /// HTTP and fan-out behavior settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Record filtering settings
    #[serde(default)]
    pub filters: FilterConfig,

    /// Data source selection and per-source settings
    #[serde(default)]
    pub data_sources: DataSourcesConfig,

    /// Validation behavior settings
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Output file locations
    #[serde(default)]
    pub output: OutputConfig,

    /// Push notification settings
    #[serde(default)]
    pub push: PushConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    ///
    /// An empty region list or site map is not an error here: it resolves
    /// to an empty collection run, which downstream handles as degraded mode.
    pub fn validate(&self) -> Result<()> {
        if self.crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if self.crawler.max_workers == 0 {
            return Err(AppError::validation("crawler.max_workers must be > 0"));
        }
        if self.crawler.batch_deadline_secs == 0 {
            return Err(AppError::validation(
                "crawler.batch_deadline_secs must be > 0",
            ));
        }
        if self.filters.max_age_days == 0 {
            return Err(AppError::validation("filters.max_age_days must be > 0"));
        }
        if self.data_sources.search.max_results == 0 {
            return Err(AppError::validation(
                "data_sources.search.max_results must be > 0",
            ));
        }
        if self.data_sources.search.endpoint.trim().is_empty() {
            return Err(AppError::validation("data_sources.search.endpoint is empty"));
        }
        if self.validation.probe_timeout_secs == 0 {
            return Err(AppError::validation(
                "validation.probe_timeout_secs must be > 0",
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_regions: defaults::target_regions(),
            crawler: CrawlerConfig::default(),
            filters: FilterConfig::default(),
            data_sources: DataSourcesConfig::default(),
            validation: ValidationConfig::default(),
            output: OutputConfig::default(),
            push: PushConfig::default(),
        }
    }
}

/// HTTP client and fan-out behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Maximum concurrent per-region fetch tasks
    #[serde(default = "defaults::max_workers")]
    pub max_workers: usize,

    /// Wall-clock budget for one collection batch in seconds
    #[serde(default = "defaults::batch_deadline")]
    pub batch_deadline_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            timeout_secs: defaults::timeout(),
            max_workers: defaults::max_workers(),
            batch_deadline_secs: defaults::batch_deadline(),
        }
    }
}

/// Record filtering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Skip announcements whose extracted date is older than this many days
    #[serde(default = "defaults::max_age_days")]
    pub max_age_days: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_age_days: defaults::max_age_days(),
        }
    }
}

/// Data source selection flags and per-source settings.
///
/// Exactly one adapter runs per batch; selection priority is
/// search → fixture → sites.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DataSourcesConfig {
    #[serde(default)]
    pub sites: SitesConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub fixture: FixtureConfig,
}

/// Static government-site source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitesConfig {
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    /// Region name → announcement listing page URL
    #[serde(default = "defaults::site_urls")]
    pub urls: BTreeMap<String, String>,
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            urls: defaults::site_urls(),
        }
    }
}

/// Search aggregator source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Search endpoint (Sogou-WeChat style article search)
    #[serde(default = "defaults::search_endpoint")]
    pub endpoint: String,

    /// Stop issuing keyword queries once this many records accumulated
    #[serde(default = "defaults::max_results")]
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: defaults::search_endpoint(),
            max_results: defaults::max_results(),
        }
    }
}

/// Canned demo source settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FixtureConfig {
    #[serde(default)]
    pub enabled: bool,
}

/// Validation behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Probe link reachability during batch validation (slow, network-bound)
    #[serde(default)]
    pub check_links: bool,

    /// Timeout for a single reachability probe in seconds
    #[serde(default = "defaults::probe_timeout")]
    pub probe_timeout_secs: u64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            check_links: false,
            probe_timeout_secs: defaults::probe_timeout(),
        }
    }
}

/// Output file locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for rendered digest files
    #[serde(default = "defaults::digests_dir")]
    pub digests_dir: String,

    /// Scrape cache file path
    #[serde(default = "defaults::cache_file")]
    pub cache_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            digests_dir: defaults::digests_dir(),
            cache_file: defaults::cache_file(),
        }
    }
}

/// Push notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Push service endpoint; the token is appended as a path segment
    #[serde(default = "defaults::push_endpoint")]
    pub endpoint: String,

    /// Access token; falls back to the PUSHPLUS_TOKEN environment variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: defaults::push_endpoint(),
            token: None,
        }
    }
}

mod defaults {
    use std::collections::BTreeMap;

    pub fn target_regions() -> Vec<String> {
        vec!["深圳".into(), "苏州".into(), "大连".into()]
    }

    // Crawler defaults
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_workers() -> usize {
        5
    }
    pub fn batch_deadline() -> u64 {
        300
    }

    // Filter defaults
    pub fn max_age_days() -> u32 {
        90
    }

    // Data source defaults
    pub fn enabled() -> bool {
        true
    }
    pub fn site_urls() -> BTreeMap<String, String> {
        BTreeMap::from([
            ("深圳".to_string(), "https://szeb.sz.gov.cn/".to_string()),
            ("苏州".to_string(), "https://hrss.suzhou.gov.cn/".to_string()),
            ("大连".to_string(), "https://jyj.dl.gov.cn/".to_string()),
        ])
    }
    pub fn search_endpoint() -> String {
        "https://weixin.sogou.com/weixin".into()
    }
    pub fn max_results() -> usize {
        20
    }

    // Validation defaults
    pub fn probe_timeout() -> u64 {
        10
    }

    // Output defaults
    pub fn digests_dir() -> String {
        "digests".into()
    }
    pub fn cache_file() -> String {
        "data/exam_schedule.json".into()
    }

    // Push defaults
    pub fn push_endpoint() -> String {
        "https://www.pushplus.plus/send".into()
    }
}
