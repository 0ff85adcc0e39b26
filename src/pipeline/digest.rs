// src/pipeline/digest.rs

//! Digest rendering boundary.
//!
//! Report generation is pluggable behind [`ReportGenerator`]; the built-in
//! [`FallbackReport`] renders a deterministic markdown digest so a report
//! is produced even when a richer generator is unavailable or failing.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Announcement, OutputConfig, QuestionRecord};
use crate::pipeline::validate::ValidationSummary;

/// Announcements shown in a report.
const MAX_REPORT_ANNOUNCEMENTS: usize = 20;

/// Questions shown in a report.
const MAX_REPORT_QUESTIONS: usize = 10;

/// Everything a report generator gets to work with.
#[derive(Debug, Clone)]
pub struct DigestInput {
    pub announcements: Vec<Announcement>,
    pub questions: Vec<QuestionRecord>,
    pub validation: ValidationSummary,
    /// Report date, YYYY-MM-DD in Asia/Shanghai
    pub date: String,
}

/// Renders a report from a digest input.
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn generate(&self, input: &DigestInput) -> Result<String>;
}

/// Deterministic markdown renderer.
pub struct FallbackReport;

#[async_trait]
impl ReportGenerator for FallbackReport {
    async fn generate(&self, input: &DigestInput) -> Result<String> {
        Ok(render_fallback(input))
    }
}

fn render_fallback(input: &DigestInput) -> String {
    let mut lines = vec![
        format!("# 教师考编结构化面试考情简报 ({})", input.date),
        String::new(),
        "## 📊 今日数据统计".to_string(),
        String::new(),
        format!("- 抓取到 {} 条相关公告", input.announcements.len()),
        format!("- 数据验证通过率 {:.1}%", input.validation.validation_rate),
        String::new(),
    ];

    if !input.announcements.is_empty() {
        lines.push("## 📋 公告列表".to_string());
        lines.push(String::new());
        for (i, record) in input
            .announcements
            .iter()
            .take(MAX_REPORT_ANNOUNCEMENTS)
            .enumerate()
        {
            lines.push(format!("{}. **{}**", i + 1, record.title));
            lines.push(format!("   - 地区: {}", record.region));
            lines.push(format!("   - 链接: {}", record.url));
            lines.push(String::new());
        }
    }

    if !input.questions.is_empty() {
        lines.push("## 面试真题信息".to_string());
        lines.push(String::new());
        for (i, question) in input.questions.iter().take(MAX_REPORT_QUESTIONS).enumerate() {
            lines.push(format!("{}. {}", i + 1, question.question));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Render the report and write it to the dated digest file.
///
/// The given generator is tried first; on error the fallback renderer
/// takes over, so this only fails on I/O.
pub async fn run_digest(
    output: &OutputConfig,
    generator: &dyn ReportGenerator,
    input: &DigestInput,
) -> Result<PathBuf> {
    let report = match generator.generate(input).await {
        Ok(report) => report,
        Err(error) => {
            log::warn!("Report generator failed, using fallback: {}", error);
            render_fallback(input)
        }
    };

    let dir = PathBuf::from(&output.digests_dir);
    tokio::fs::create_dir_all(&dir).await?;

    let path = dir.join(format!("interview-digest-{}.md", input.date));
    tokio::fs::write(&path, report.as_bytes()).await?;

    log::info!("Digest written to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use tempfile::TempDir;

    struct BrokenGenerator;

    #[async_trait]
    impl ReportGenerator for BrokenGenerator {
        async fn generate(&self, _input: &DigestInput) -> Result<String> {
            Err(AppError::digest("generator offline"))
        }
    }

    fn input(announcement_count: usize, question_count: usize) -> DigestInput {
        let announcements = (0..announcement_count)
            .map(|i| {
                Announcement::new(
                    "深圳",
                    format!("第{}号教师招聘结构化面试公告", i + 1),
                    format!("https://example.com/{}", i + 1),
                )
            })
            .collect();
        let questions = (0..question_count)
            .map(|i| QuestionRecord {
                region: Some("深圳".to_string()),
                question: format!("第{}道结构化面试真题", i + 1),
                category: None,
            })
            .collect();

        DigestInput {
            announcements,
            questions,
            validation: ValidationSummary {
                total: announcement_count,
                valid: announcement_count,
                validation_rate: if announcement_count > 0 { 100.0 } else { 0.0 },
                ..ValidationSummary::default()
            },
            date: "2026-03-01".to_string(),
        }
    }

    #[test]
    fn test_fallback_renders_sections() {
        let report = render_fallback(&input(2, 1));

        assert!(report.starts_with("# 教师考编结构化面试考情简报 (2026-03-01)"));
        assert!(report.contains("- 抓取到 2 条相关公告"));
        assert!(report.contains("- 数据验证通过率 100.0%"));
        assert!(report.contains("1. **第1号教师招聘结构化面试公告**"));
        assert!(report.contains("- 链接: https://example.com/2"));
        assert!(report.contains("## 面试真题信息"));
        assert!(report.contains("1. 第1道结构化面试真题"));
    }

    #[test]
    fn test_fallback_caps_lists() {
        let report = render_fallback(&input(25, 12));

        assert!(report.contains("20. **第20号教师招聘结构化面试公告**"));
        assert!(!report.contains("21. **"));
        assert!(report.contains("10. 第10道结构化面试真题"));
        assert!(!report.contains("第11道结构化面试真题"));
    }

    #[test]
    fn test_fallback_empty_batch() {
        let report = render_fallback(&input(0, 0));

        assert!(report.contains("- 抓取到 0 条相关公告"));
        assert!(report.contains("- 数据验证通过率 0.0%"));
        assert!(!report.contains("## 📋 公告列表"));
        assert!(!report.contains("## 面试真题信息"));
    }

    #[tokio::test]
    async fn test_run_digest_writes_dated_file() {
        let tmp = TempDir::new().unwrap();
        let output = OutputConfig {
            digests_dir: tmp.path().join("digests").to_string_lossy().into_owned(),
            ..OutputConfig::default()
        };

        let path = run_digest(&output, &FallbackReport, &input(1, 0))
            .await
            .unwrap();

        assert!(path.ends_with("interview-digest-2026-03-01.md"));
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("教师考编结构化面试考情简报"));
    }

    #[tokio::test]
    async fn test_run_digest_survives_generator_failure() {
        let tmp = TempDir::new().unwrap();
        let output = OutputConfig {
            digests_dir: tmp.path().join("digests").to_string_lossy().into_owned(),
            ..OutputConfig::default()
        };

        let path = run_digest(&output, &BrokenGenerator, &input(1, 0))
            .await
            .unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("1. **第1号教师招聘结构化面试公告**"));
    }
}
