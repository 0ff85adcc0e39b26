// src/sources/fixture.rs

//! Fixture adapter: deterministic canned records for demo and degraded mode.

use async_trait::async_trait;
use chrono::{Duration, Utc};

use crate::error::Result;
use crate::models::{Announcement, Source};
use crate::sources::SourceAdapter;

/// Adapter serving a fixed set of example announcements.
pub struct FixtureAdapter;

impl FixtureAdapter {
    pub fn new() -> Self {
        Self
    }

    fn record(region: &str, title: &str, url: &str, days_ago: i64, description: &str) -> Announcement {
        let mut record = Announcement::new(region, title, url);
        record.found_at = Utc::now() - Duration::days(days_ago);
        record.description = Some(description.to_string());
        record.source = Source::Fixture;
        record
    }
}

impl Default for FixtureAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceAdapter for FixtureAdapter {
    fn kind(&self) -> Source {
        Source::Fixture
    }

    async fn collect(
        &self,
        _region: Option<&str>,
        _max_age_days: u32,
    ) -> Result<Vec<Announcement>> {
        Ok(vec![
            Self::record(
                "深圳",
                "深圳市盐田区教育局2026年面向应届毕业生公开招聘教师公告",
                "https://www.yantian.gov.cn/ytjyj/gkmlpt/content/12/12459/post_12459198.html",
                0,
                "招聘62名编制教师,包含结构化面试环节",
            ),
            Self::record(
                "苏州",
                "苏州市吴江区教育系统2026年公开招聘事业编制教师公告",
                "https://hrss.suzhou.gov.cn/jsszhrss/gsgg/202512/0f825d50ecab47a28e55993181b946b3.shtml",
                2,
                "招聘100名教师,面试形式为结构化面试",
            ),
            Self::record(
                "大连",
                "大连市西岗区2026年教育系统自主招聘应届毕业生公告",
                "https://lsdjyw.lnnu.edu.cn/news/view/aid/297794/tag/zpxx",
                5,
                "招聘16名教师,含结构化面试和试讲",
            ),
            Self::record(
                "深圳",
                "深圳市公办中小学2025年12月面向2026年应届毕业生公开招聘",
                "https://szeb.sz.gov.cn/home/xxgk/flzy/rsxx2/ryzp/content/post_12564466.html",
                7,
                "招聘888名教师,结构化面试安排另行通知",
            ),
            Self::record(
                "玉环",
                "玉环市公开招聘2026年事业编制教师公告（浙师大专场）",
                "http://www.yuhuan.gov.cn/art/2025/10/29/art_1229304968_4079109.html",
                10,
                "招聘30名教师,面试包含结构化问答",
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_collect_returns_five_records() {
        let records = FixtureAdapter::new().collect(None, 90).await.unwrap();

        assert_eq!(records.len(), 5);
        assert!(records.iter().all(|r| r.source == Source::Fixture));
        assert!(records.iter().all(|r| r.url_hash.len() == 64));
        assert!(records.iter().all(|r| r.description.is_some()));
    }

    #[tokio::test]
    async fn test_found_at_offsets_descend() {
        let records = FixtureAdapter::new().collect(None, 90).await.unwrap();

        for pair in records.windows(2) {
            assert!(pair[0].found_at >= pair[1].found_at);
        }
    }
}
