//! Utility functions and helpers.

use chrono::{FixedOffset, Utc};
use unicode_segmentation::UnicodeSegmentation;
use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Collapse whitespace runs and truncate to at most `max_graphemes`.
///
/// Truncation is grapheme-aware so CJK text is never cut mid-character;
/// a truncated result ends with "...".
pub fn sanitize_content(content: &str, max_graphemes: usize) -> String {
    let collapsed = content.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.graphemes(true).count() <= max_graphemes {
        return collapsed;
    }

    let truncated: String = collapsed.graphemes(true).take(max_graphemes).collect();
    format!("{}...", truncated.trim_end())
}

/// Extract the first date found in `text`, normalized to YYYY-MM-DD.
///
/// Recognizes `2024-01-15`, `2024年1月15日`, and `2024/01/15` style dates.
pub fn extract_date(text: &str) -> Option<String> {
    let patterns = [
        regex::Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").ok()?,
        regex::Regex::new(r"(\d{4})年(\d{1,2})月(\d{1,2})日").ok()?,
        regex::Regex::new(r"(\d{4})/(\d{1,2})/(\d{1,2})").ok()?,
    ];

    for pattern in &patterns {
        if let Some(caps) = pattern.captures(text) {
            let (year, month, day) = (&caps[1], &caps[2], &caps[3]);
            return Some(format!("{}-{:0>2}-{:0>2}", year, month, day));
        }
    }
    None
}

/// Today's date in Asia/Shanghai (UTC+8), formatted YYYY-MM-DD.
pub fn today_shanghai() -> String {
    let shanghai = FixedOffset::east_opt(8 * 3600).expect("fixed UTC+8 offset");
    Utc::now().with_timezone(&shanghai).format("%Y-%m-%d").to_string()
}

/// Whether `text` carries a date older than `max_days` days ago.
///
/// Best-effort: returns false when no date can be extracted, so records
/// without a recognizable date are never filtered out.
pub fn older_than_days(text: &str, max_days: u32) -> bool {
    let Some(date) = extract_date(text) else {
        return false;
    };
    let Ok(parsed) = chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d") else {
        return false;
    };
    let cutoff = (Utc::now() - chrono::Duration::days(i64::from(max_days))).date_naive();
    parsed < cutoff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://example.com/path/").unwrap();
        assert_eq!(
            resolve_url(&base, "page.html"),
            "https://example.com/path/page.html"
        );
        assert_eq!(
            resolve_url(&base, "/root.html"),
            "https://example.com/root.html"
        );
        assert_eq!(
            resolve_url(&base, "https://other.com/x"),
            "https://other.com/x"
        );
    }

    #[test]
    fn test_sanitize_collapses_whitespace() {
        assert_eq!(sanitize_content("a  b\n\tc", 100), "a b c");
    }

    #[test]
    fn test_sanitize_truncates_cjk_on_grapheme_boundary() {
        let text = "深圳市教育局公开招聘教师公告";
        let cut = sanitize_content(text, 4);
        assert_eq!(cut, "深圳市教...");
    }

    #[test]
    fn test_sanitize_short_text_unchanged() {
        assert_eq!(sanitize_content("招聘", 200), "招聘");
    }

    #[test]
    fn test_extract_date_formats() {
        assert_eq!(
            extract_date("报名截止 2024-1-15 前"),
            Some("2024-01-15".to_string())
        );
        assert_eq!(
            extract_date("2024年1月5日发布"),
            Some("2024-01-05".to_string())
        );
        assert_eq!(
            extract_date("更新于2024/01/15"),
            Some("2024-01-15".to_string())
        );
        assert_eq!(extract_date("近期发布"), None);
    }

    #[test]
    fn test_today_shanghai_shape() {
        let today = today_shanghai();
        assert_eq!(today.len(), 10);
        assert_eq!(today.matches('-').count(), 2);
    }

    #[test]
    fn test_older_than_days() {
        assert!(older_than_days("2020年1月5日发布的公告", 90));

        let recent = Utc::now().format("%Y-%m-%d").to_string();
        assert!(!older_than_days(&format!("发布于 {recent}"), 90));

        // No recognizable date: never filtered.
        assert!(!older_than_days("近期发布的招聘公告", 90));
    }
}
