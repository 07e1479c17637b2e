use crate::model::highlight::Highlight;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CheckType {
    Plagiarism,
    AiContent,
}

impl CheckType {
    pub const ALL: [CheckType; 2] = [CheckType::Plagiarism, CheckType::AiContent];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckType::Plagiarism => "plagiarism",
            CheckType::AiContent => "ai_content",
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pending,
    Passed,
    Failed,
    Error,
}

impl ValidationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ValidationStatus::Pending)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Pending => "pending",
            ValidationStatus::Passed => "passed",
            ValidationStatus::Failed => "failed",
            ValidationStatus::Error => "error",
        }
    }
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Auxiliary context stored next to the score.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanMetadata {
    pub run_id: String,
    pub detector_id: String,
    pub text_sha256: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_count: Option<usize>,
    pub scanned_at: String,
}

/// The single live row for one `(submission_id, check_type)` pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckResult {
    pub submission_id: String,
    pub check_type: CheckType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub highlights: Vec<Highlight>,
    pub status: ValidationStatus,
    pub metadata: ScanMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub updated_at: String,
}

impl CheckResult {
    pub fn pending(submission_id: &str, check_type: CheckType, metadata: ScanMetadata) -> Self {
        Self {
            submission_id: submission_id.to_string(),
            check_type,
            score: None,
            highlights: Vec::new(),
            status: ValidationStatus::Pending,
            updated_at: metadata.scanned_at.clone(),
            metadata,
            error: None,
        }
    }

    pub fn key(&self) -> (String, CheckType) {
        (self.submission_id.clone(), self.check_type)
    }
}
