// src/pipeline/validate.rs

//! Record validation.
//!
//! Scores collected announcements without dropping any: defects are
//! annotated per record and rolled up into batch statistics. Reachability
//! probing is opt-in because it is network-bound and slow.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use url::Url;

use crate::models::Announcement;

/// Cap on entries retained in the batch error sample.
const MAX_ERROR_SAMPLE: usize = 10;

/// Title shown in the error sample when a record has none.
const UNTITLED: &str = "未知";

/// Validation outcome for one record.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub link_accessible: bool,
    pub errors: Vec<String>,
}

/// One entry in the capped error sample.
#[derive(Debug, Clone, Serialize)]
pub struct RecordErrors {
    pub index: usize,
    pub title: String,
    pub errors: Vec<String>,
}

/// Aggregate statistics for a validated batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub link_accessible_count: usize,
    /// valid / total × 100, exactly 0.0 for an empty batch
    pub validation_rate: f64,
    /// First [`MAX_ERROR_SAMPLE`] defective records, for operator triage
    pub errors: Vec<RecordErrors>,
}

/// Announcement validator with an optional reachability probe.
pub struct Validator {
    client: Client,
    probe_timeout: Duration,
}

impl Validator {
    /// Create a validator; `probe_timeout_secs` bounds each link probe.
    pub fn new(probe_timeout_secs: u64) -> Self {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36")
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            probe_timeout: Duration::from_secs(probe_timeout_secs),
        }
    }

    /// Check one record's shape. Pure, no network.
    ///
    /// A missing region is advisory: it lands in `errors` but does not
    /// invalidate the record.
    pub fn validate_record(record: &Announcement) -> ValidationResult {
        let mut errors = Vec::new();
        let mut is_valid = true;

        if record.title.is_empty() {
            errors.push("缺少标题".to_string());
            is_valid = false;
        }

        if record.url.is_empty() {
            errors.push("缺少链接".to_string());
            is_valid = false;
        } else if !Self::is_absolute_url(&record.url) {
            errors.push(format!("链接格式无效: {}", record.url));
            is_valid = false;
        }

        if record.region.is_empty() {
            errors.push("缺少地区信息".to_string());
        }

        ValidationResult {
            is_valid,
            link_accessible: false,
            errors,
        }
    }

    /// Validate a batch, optionally probing each well-formed link.
    pub async fn validate_batch(
        &self,
        records: &[Announcement],
        check_links: bool,
    ) -> (Vec<ValidationResult>, ValidationSummary) {
        let mut results = Vec::with_capacity(records.len());
        let mut summary = ValidationSummary {
            total: records.len(),
            ..ValidationSummary::default()
        };

        for (index, record) in records.iter().enumerate() {
            let mut result = Self::validate_record(record);

            if check_links && !record.url.is_empty() && Self::is_absolute_url(&record.url) {
                result.link_accessible = self.probe_link(&record.url).await;
            }

            if result.is_valid {
                summary.valid += 1;
            } else {
                summary.invalid += 1;
            }
            if result.link_accessible {
                summary.link_accessible_count += 1;
            }

            if !result.errors.is_empty() && summary.errors.len() < MAX_ERROR_SAMPLE {
                summary.errors.push(RecordErrors {
                    index,
                    title: if record.title.is_empty() {
                        UNTITLED.to_string()
                    } else {
                        record.title.clone()
                    },
                    errors: result.errors.clone(),
                });
            }

            results.push(result);
        }

        if summary.total > 0 {
            summary.validation_rate = summary.valid as f64 / summary.total as f64 * 100.0;
        }

        (results, summary)
    }

    /// Absolute URL with both a scheme and a host.
    fn is_absolute_url(url: &str) -> bool {
        Url::parse(url).map(|u| u.has_host()).unwrap_or(false)
    }

    /// Lightweight reachability probe. Never raises.
    ///
    /// HEAD first; some servers reject HEAD, so transport-level failure
    /// falls back to a GET that reads a single body chunk.
    async fn probe_link(&self, url: &str) -> bool {
        match self
            .client
            .head(url)
            .timeout(self.probe_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().as_u16() < 400,
            Err(_) => match self
                .client
                .get(url)
                .timeout(self.probe_timeout)
                .send()
                .await
            {
                Ok(mut response) => {
                    let accessible = response.status().as_u16() < 400;
                    let _ = response.chunk().await;
                    accessible
                }
                Err(_) => false,
            },
        }
    }
}
