use crate::model::check_result::{CheckResult, CheckType, ValidationStatus};
use crate::model::highlight::Highlight;
use crate::policy::publication_gate::{
    evaluate_publication_gate, PublicationBlockReason, PublicationGateInputs,
};
use crate::policy::thresholds::Thresholds;
use serde::{Deserialize, Serialize};

/// Read-only view over the current rows of one submission. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationSummary {
    pub submission_id: String,
    pub thresholds: Thresholds,
    pub checks: Vec<CheckResult>,
    pub overall: ValidationStatus,
    pub block_reason: Option<PublicationBlockReason>,
}

impl ValidationSummary {
    /// Rows for other submissions are ignored; a missing check reads as pending.
    pub fn from_results(
        submission_id: &str,
        results: &[CheckResult],
        thresholds: Thresholds,
    ) -> Self {
        let mut checks: Vec<CheckResult> = results
            .iter()
            .filter(|r| r.submission_id == submission_id)
            .cloned()
            .collect();
        checks.sort_by_key(|r| r.check_type);
        checks.dedup_by_key(|r| r.check_type);

        let status_of = |ct: CheckType| {
            checks
                .iter()
                .find(|r| r.check_type == ct)
                .map(|r| r.status)
                .unwrap_or(ValidationStatus::Pending)
        };
        let statuses: Vec<ValidationStatus> = CheckType::ALL.iter().map(|ct| status_of(*ct)).collect();
        let overall = if statuses.contains(&ValidationStatus::Pending) {
            ValidationStatus::Pending
        } else if statuses.contains(&ValidationStatus::Error) {
            ValidationStatus::Error
        } else if statuses.contains(&ValidationStatus::Failed) {
            ValidationStatus::Failed
        } else {
            ValidationStatus::Passed
        };

        let find = |ct: CheckType| checks.iter().find(|r| r.check_type == ct);
        let gate = PublicationGateInputs {
            thresholds,
            plagiarism_status: find(CheckType::Plagiarism).map(|r| r.status),
            plagiarism_score: find(CheckType::Plagiarism).and_then(|r| r.score),
            ai_content_status: find(CheckType::AiContent).map(|r| r.status),
            ai_content_score: find(CheckType::AiContent).and_then(|r| r.score),
        };
        let block_reason = evaluate_publication_gate(&gate).err();

        Self {
            submission_id: submission_id.to_string(),
            thresholds,
            checks,
            overall,
            block_reason,
        }
    }

    /// True only when every check individually passed its threshold.
    pub fn passed(&self) -> bool {
        self.overall == ValidationStatus::Passed && self.block_reason.is_none()
    }

    pub fn check(&self, check_type: CheckType) -> Option<&CheckResult> {
        self.checks.iter().find(|r| r.check_type == check_type)
    }

    pub fn status_of(&self, check_type: CheckType) -> ValidationStatus {
        self.check(check_type)
            .map(|r| r.status)
            .unwrap_or(ValidationStatus::Pending)
    }

    pub fn pending_checks(&self) -> Vec<CheckType> {
        CheckType::ALL
            .into_iter()
            .filter(|ct| self.status_of(*ct) == ValidationStatus::Pending)
            .collect()
    }

    /// Checks the submitter may re-run; re-running overwrites the row.
    pub fn retryable_checks(&self) -> Vec<CheckType> {
        CheckType::ALL
            .into_iter()
            .filter(|ct| self.status_of(*ct) == ValidationStatus::Error)
            .collect()
    }

    pub fn to_record(&self) -> ValidationRecord {
        let p = self.check(CheckType::Plagiarism);
        let a = self.check(CheckType::AiContent);
        ValidationRecord {
            submission_id: self.submission_id.clone(),
            plagiarism_score: p.and_then(|r| r.score),
            plagiarism_highlights: p.map(|r| r.highlights.clone()),
            ai_content_score: a.and_then(|r| r.score),
            ai_content_highlights: a.map(|r| r.highlights.clone()),
            validation_status: self.overall,
        }
    }
}

/// Combined result shape consumed by the moderation UI and the renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationRecord {
    pub submission_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plagiarism_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plagiarism_highlights: Option<Vec<Highlight>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_content_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_content_highlights: Option<Vec<Highlight>>,
    pub validation_status: ValidationStatus,
}

impl ValidationRecord {
    pub fn highlights(&self) -> Vec<Highlight> {
        let mut out = Vec::new();
        if let Some(h) = &self.plagiarism_highlights {
            out.extend(h.iter().cloned());
        }
        if let Some(h) = &self.ai_content_highlights {
            out.extend(h.iter().cloned());
        }
        out
    }
}
