use crate::model::check_result::ValidationStatus;
use crate::policy::thresholds::Thresholds;
use serde::{Deserialize, Serialize};

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PublicationBlockReason {
    CHECK_PENDING,
    CHECK_ERRORED,
    PLAGIARISM_ABOVE_THRESHOLD,
    AI_CONTENT_ABOVE_THRESHOLD,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationGateInputs {
    pub thresholds: Thresholds,
    pub plagiarism_status: Option<ValidationStatus>,
    pub plagiarism_score: Option<f64>,
    pub ai_content_status: Option<ValidationStatus>,
    pub ai_content_score: Option<f64>,
}

/// A missing row counts as pending. Both checks must individually pass.
pub fn evaluate_publication_gate(i: &PublicationGateInputs) -> Result<(), PublicationBlockReason> {
    let statuses = [i.plagiarism_status, i.ai_content_status];
    if statuses
        .iter()
        .any(|s| matches!(s, None | Some(ValidationStatus::Pending)))
    {
        return Err(PublicationBlockReason::CHECK_PENDING);
    }
    if statuses.contains(&Some(ValidationStatus::Error)) {
        return Err(PublicationBlockReason::CHECK_ERRORED);
    }

    let plagiarism_ok = i.plagiarism_status == Some(ValidationStatus::Passed)
        && i
            .plagiarism_score
            .map(|s| s <= i.thresholds.plagiarism_fail)
            .unwrap_or(false);
    if !plagiarism_ok {
        return Err(PublicationBlockReason::PLAGIARISM_ABOVE_THRESHOLD);
    }

    let ai_ok = i.ai_content_status == Some(ValidationStatus::Passed)
        && i
            .ai_content_score
            .map(|s| s <= i.thresholds.ai_content_fail)
            .unwrap_or(false);
    if !ai_ok {
        return Err(PublicationBlockReason::AI_CONTENT_ABOVE_THRESHOLD);
    }
    Ok(())
}
