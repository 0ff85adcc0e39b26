//! Interview question data structure.

use serde::{Deserialize, Serialize};

/// A past structured-interview question, fed to the digest boundary.
///
/// There is no live question source yet; records arrive from curated files
/// or future adapters and are passed through to the report generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuestionRecord {
    /// Region the question was reported from, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Question text
    pub question: String,

    /// Question category (e.g. "综合分析", "应急应变")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_with_optional_fields_absent() {
        let q: QuestionRecord = serde_json::from_str(r#"{"question": "如何看待双减政策？"}"#).unwrap();
        assert_eq!(q.question, "如何看待双减政策？");
        assert!(q.region.is_none());
        assert!(q.category.is_none());
    }
}
