//! Announcement data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Which adapter produced a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Harvested from a configured government site
    #[default]
    Site,
    /// Found through the search aggregator
    Search,
    /// Canned demo record
    Fixture,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            Source::Site => "site",
            Source::Search => "search",
            Source::Fixture => "fixture",
        };
        f.write_str(tag)
    }
}

/// A recruitment/interview announcement collected from some source.
///
/// `title` and `url` are required for a record to validate; everything else
/// is best-effort. Records with missing required fields are still kept so
/// that validation can annotate them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Announcement {
    /// Region name (e.g. "深圳"), or "全国" when not region-bound
    #[serde(default)]
    pub region: String,

    /// Announcement title as shown on the source page
    pub title: String,

    /// Absolute URL of the announcement
    pub url: String,

    /// Content address of `url`, used as the dedup key
    #[serde(default)]
    pub url_hash: String,

    /// When this record was discovered; assigned once, never updated
    pub found_at: DateTime<Utc>,

    /// Publishing account name (search results only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    /// Short summary text (search results only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Publish time string as found on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<String>,

    /// Free-form description (fixture records only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Which adapter produced this record
    #[serde(default)]
    pub source: Source,
}

impl Announcement {
    /// Create a record discovered right now, with its URL hash computed.
    pub fn new(
        region: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        let url = url.into();
        Self {
            region: region.into(),
            title: title.into(),
            url_hash: url_hash(&url),
            url,
            found_at: Utc::now(),
            account: None,
            summary: None,
            publish_time: None,
            description: None,
            source: Source::default(),
        }
    }
}

/// Content address of a URL: lowercase hex SHA-256 of the URL string.
///
/// Pure function of the input; equal URLs always hash equal.
pub fn url_hash(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_hash_is_deterministic() {
        let a = url_hash("https://example.com/a");
        let b = url_hash("https://example.com/a");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn url_hash_differs_for_different_urls() {
        assert_ne!(
            url_hash("https://example.com/a"),
            url_hash("https://example.com/b")
        );
    }

    #[test]
    fn new_computes_hash_and_timestamp() {
        let before = Utc::now();
        let record = Announcement::new("深圳", "测试公告", "https://example.com/1");
        assert_eq!(record.url_hash, url_hash("https://example.com/1"));
        assert!(record.found_at >= before);
        assert_eq!(record.source, Source::Site);
    }

    #[test]
    fn source_tag_serializes_lowercase() {
        let record = {
            let mut r = Announcement::new("全国", "t", "https://example.com/x");
            r.source = Source::Search;
            r
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"source\":\"search\""));
    }

    #[test]
    fn missing_source_defaults_to_site() {
        let json = r#"{
            "region": "苏州",
            "title": "公告",
            "url": "https://example.com/2",
            "found_at": "2026-01-10T08:00:00Z"
        }"#;
        let record: Announcement = serde_json::from_str(json).unwrap();
        assert_eq!(record.source, Source::Site);
        assert!(record.account.is_none());
    }
}
