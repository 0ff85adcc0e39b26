// src/sources/search.rs

//! Search-index adapter.
//!
//! Queries a Sogou-WeChat style article search for each keyword and parses
//! the result blocks. Sogou hands out redirect links rather than the final
//! article URLs, so records keep the redirect link as their `url`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::error::{AppError, Result};
use crate::fetch::FetchClient;
use crate::models::{Announcement, Config, Source};
use crate::sources::SourceAdapter;
use crate::utils::{older_than_days, resolve_url, sanitize_content};

/// Keywords queried in order, one request each.
const SEARCH_KEYWORDS: [&str; 5] = [
    "教师招聘",
    "结构化面试",
    "教师编制",
    "面试通知",
    "招聘公告",
];

/// Grapheme cap for the result summary.
const SUMMARY_MAX_GRAPHEMES: usize = 200;

/// Account name used when a result block carries none.
const DEFAULT_ACCOUNT: &str = "未知公众号";

/// Region tag for results not scoped to a region.
const DEFAULT_REGION: &str = "全国";

/// Adapter querying a third-party article search aggregator.
pub struct SearchAdapter {
    config: Arc<Config>,
    fetcher: FetchClient,
}

impl SearchAdapter {
    /// Create a new search adapter with the given configuration.
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_fetcher(config, FetchClient::new())
    }

    /// Create an adapter backed by a specific fetch client.
    pub fn with_fetcher(config: Arc<Config>, fetcher: FetchClient) -> Self {
        Self { config, fetcher }
    }

    /// Build the article-search URL for one keyword, region-scoped when a
    /// region is given. `type=2` selects article search.
    fn build_query_url(&self, keyword: &str, region: Option<&str>) -> Result<Url> {
        let query = match region {
            Some(region) => format!("{region} {keyword}"),
            None => keyword.to_string(),
        };
        let url = Url::parse_with_params(
            &self.config.data_sources.search.endpoint,
            &[("type", "2"), ("query", query.as_str()), ("ie", "utf8")],
        )?;
        Ok(url)
    }

    /// Parse result blocks out of a search response page.
    ///
    /// Synchronous on purpose: `Html` is not `Send` and must not live
    /// across an await point.
    fn parse_results(
        &self,
        html: &str,
        region: Option<&str>,
        max_age_days: u32,
    ) -> Result<Vec<Announcement>> {
        let endpoint = Url::parse(&self.config.data_sources.search.endpoint)?;
        let document = Html::parse_document(html);

        let box_sel = Self::parse_selector("div.news-box")?;
        let title_sel = Self::parse_selector("h3")?;
        let link_sel = Self::parse_selector("a[href]")?;
        let account_sel = Self::parse_selector("a.account")?;
        let summary_sel = Self::parse_selector("p.txt-info")?;
        let time_sel = Self::parse_selector("span.s2")?;

        let mut records = Vec::new();
        for item in document.select(&box_sel) {
            let Some(title_elem) = item.select(&title_sel).next() else {
                continue;
            };
            let raw_title: String = title_elem.text().collect();
            let title = raw_title.split_whitespace().collect::<Vec<_>>().join(" ");
            if title.is_empty() {
                continue;
            }

            // Sogou wraps results in redirect links; the first anchor in the
            // block is the article link.
            let Some(href) = item
                .select(&link_sel)
                .next()
                .and_then(|e| e.value().attr("href"))
            else {
                continue;
            };
            let link = resolve_url(&endpoint, href);

            let account = item
                .select(&account_sel)
                .next()
                .map(|e| e.text().collect::<String>().trim().to_string())
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());

            let summary = item
                .select(&summary_sel)
                .next()
                .map(|e| {
                    let text: String = e.text().collect();
                    sanitize_content(&text, SUMMARY_MAX_GRAPHEMES)
                })
                .filter(|text| !text.is_empty());

            let publish_time = item
                .select(&time_sel)
                .next()
                .map(|e| e.text().collect::<String>().trim().to_string())
                .filter(|text| !text.is_empty());

            if let Some(time) = publish_time.as_deref() {
                if older_than_days(time, max_age_days) {
                    continue;
                }
            }

            let mut record =
                Announcement::new(region.unwrap_or(DEFAULT_REGION), title, link);
            record.account = Some(account);
            record.summary = summary;
            record.publish_time = publish_time;
            record.source = Source::Search;
            records.push(record);
        }

        Ok(records)
    }

    fn parse_selector(s: &str) -> Result<Selector> {
        Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
    }
}

#[async_trait]
impl SourceAdapter for SearchAdapter {
    fn kind(&self) -> Source {
        Source::Search
    }

    async fn collect(&self, region: Option<&str>, max_age_days: u32) -> Result<Vec<Announcement>> {
        let max_results = self.config.data_sources.search.max_results;
        let timeout = Duration::from_secs(self.config.crawler.timeout_secs);

        let mut records = Vec::new();
        for keyword in SEARCH_KEYWORDS {
            if records.len() >= max_results {
                log::debug!("Result cap of {} reached, stopping queries", max_results);
                break;
            }

            // One failing keyword query must not abort the rest.
            let query_url = match self.build_query_url(keyword, region) {
                Ok(url) => url,
                Err(error) => {
                    log::warn!("Bad query URL for '{}': {}", keyword, error);
                    continue;
                }
            };

            let Some(html) = self.fetcher.fetch(query_url.as_str(), timeout, true).await else {
                log::warn!("No response for query '{}'", keyword);
                continue;
            };

            match self.parse_results(&html, region, max_age_days) {
                Ok(found) => {
                    log::debug!("{} result(s) for '{}'", found.len(), keyword);
                    records.extend(found);
                }
                Err(error) => {
                    log::warn!("Failed to parse results for '{}': {}", keyword, error);
                }
            }
        }

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{Transport, TransportResponse};
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const RESULT_PAGE: &str = r#"
        <div class="news-box">
            <h3><a href="/link?url=abc123">深圳教师招聘结构化面试公告</a></h3>
            <a class="account">深圳教育</a>
            <p class="txt-info">某区教育局公开招聘教师，面试形式为结构化面试。</p>
            <span class="s2">RECENT</span>
        </div>
        <div class="news-box">
            <h3><a href="https://mp.weixin.qq.com/s/xyz">苏州教师编制面试通知</a></h3>
        </div>
        <div class="news-box"><p>无标题块</p></div>
    "#;

    struct CountingTransport {
        body: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for CountingTransport {
        async fn get(&self, _url: &str, _timeout: Duration) -> Result<TransportResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TransportResponse {
                status: 200,
                body: self.body.clone(),
            })
        }
    }

    struct FlakyTransport {
        body: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for FlakyTransport {
        async fn get(&self, url: &str, _timeout: Duration) -> Result<TransportResponse> {
            // Both attempts of the first keyword query fail, later ones work.
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < 2 {
                Err(AppError::collect(url, "connection reset"))
            } else {
                Ok(TransportResponse {
                    status: 200,
                    body: self.body.clone(),
                })
            }
        }
    }

    struct OfflineStub;

    #[async_trait]
    impl Transport for OfflineStub {
        async fn get(&self, url: &str, _timeout: Duration) -> Result<TransportResponse> {
            Err(AppError::collect(url, "offline"))
        }
    }

    fn recent_page() -> String {
        RESULT_PAGE.replace("RECENT", &Utc::now().format("%Y-%m-%d").to_string())
    }

    fn adapter(config: Config, transport: Arc<dyn Transport>) -> SearchAdapter {
        SearchAdapter::with_fetcher(Arc::new(config), FetchClient::with_transport(transport))
    }

    #[test]
    fn test_build_query_url_with_region() {
        let adapter = adapter(Config::default(), Arc::new(OfflineStub));
        let url = adapter.build_query_url("教师招聘", Some("深圳")).unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(pairs.contains(&("type".to_string(), "2".to_string())));
        assert!(pairs.contains(&("query".to_string(), "深圳 教师招聘".to_string())));
        assert!(pairs.contains(&("ie".to_string(), "utf8".to_string())));
    }

    #[test]
    fn test_parse_results_extracts_fields() {
        let adapter = adapter(Config::default(), Arc::new(OfflineStub));
        let records = adapter.parse_results(&recent_page(), None, 90).unwrap();

        assert_eq!(records.len(), 2);

        let first = &records[0];
        assert_eq!(first.title, "深圳教师招聘结构化面试公告");
        assert_eq!(first.url, "https://weixin.sogou.com/link?url=abc123");
        assert_eq!(first.account.as_deref(), Some("深圳教育"));
        assert!(first.summary.as_deref().unwrap().contains("结构化面试"));
        assert_eq!(first.region, "全国");
        assert_eq!(first.source, Source::Search);

        let second = &records[1];
        assert_eq!(second.url, "https://mp.weixin.qq.com/s/xyz");
        assert_eq!(second.account.as_deref(), Some(DEFAULT_ACCOUNT));
        assert!(second.summary.is_none());
        assert!(second.publish_time.is_none());
    }

    #[test]
    fn test_parse_results_region_scoped() {
        let adapter = adapter(Config::default(), Arc::new(OfflineStub));
        let records = adapter
            .parse_results(&recent_page(), Some("深圳"), 90)
            .unwrap();
        assert!(records.iter().all(|r| r.region == "深圳"));
    }

    #[test]
    fn test_parse_results_drops_stale_publish_time() {
        let adapter = adapter(Config::default(), Arc::new(OfflineStub));
        let page = RESULT_PAGE.replace("RECENT", "2020-01-15");
        let records = adapter.parse_results(&page, None, 90).unwrap();

        // The dated block is dropped, the undated one is kept.
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "苏州教师编制面试通知");
    }

    #[tokio::test]
    async fn test_collect_stops_at_max_results() {
        let mut config = Config::default();
        config.data_sources.search.enabled = true;
        config.data_sources.search.max_results = 2;

        let transport = Arc::new(CountingTransport {
            body: recent_page(),
            calls: AtomicUsize::new(0),
        });
        let adapter = adapter(config, Arc::clone(&transport) as Arc<dyn Transport>);

        let records = adapter.collect(None, 90).await.unwrap();

        // The cap stops further queries but does not truncate the batch.
        assert_eq!(records.len(), 2);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_collect_isolates_keyword_failures() {
        let mut config = Config::default();
        config.data_sources.search.enabled = true;
        config.data_sources.search.max_results = 2;

        let transport = Arc::new(FlakyTransport {
            body: recent_page(),
            calls: AtomicUsize::new(0),
        });
        let adapter = adapter(config, transport);

        // First keyword fails both attempts, second succeeds.
        let records = adapter.collect(None, 90).await.unwrap();
        assert_eq!(records.len(), 2);
    }
}
