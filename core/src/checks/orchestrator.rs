use crate::audit::event::AuditEvent;
use crate::audit::log::AuditLog;
use crate::checks::ai_content::evaluate_ai_content;
use crate::checks::normalize::{normalize_response, CheckEvaluation};
use crate::checks::plagiarism::evaluate_plagiarism;
use crate::detector::interface::{Detector, DetectorError};
use crate::determinism::json_canonical::score_basis_points;
use crate::determinism::run_id::{check_run_id, now_rfc3339_utc, sha256_hex};
use crate::error::{CoreError, CoreResult};
use crate::model::check_result::{CheckResult, CheckType, ScanMetadata, ValidationStatus};
use crate::model::highlight::Highlight;
use crate::model::submission::Submission;
use crate::policy::thresholds::Thresholds;
use crate::storage::store::ResultStore;
use crate::summary::aggregate::{ValidationRecord, ValidationSummary};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Mutex;
use tracing::{error, info, instrument, warn};

/// Response of one check invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub success: bool,
    pub submission_id: String,
    pub check_type: CheckType,
    pub run_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub highlights: Vec<Highlight>,
    pub status: ValidationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckOutcome {
    fn from_row(row: &CheckResult) -> Self {
        Self {
            success: row.status != ValidationStatus::Error,
            submission_id: row.submission_id.clone(),
            check_type: row.check_type,
            run_id: row.metadata.run_id.clone(),
            score: row.score,
            highlights: row.highlights.clone(),
            status: row.status,
            word_count: row.metadata.word_count,
            sentence_count: row.metadata.sentence_count,
            error: row.error.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionValidation {
    pub plagiarism: CheckOutcome,
    pub ai_content: CheckOutcome,
    pub summary: ValidationSummary,
}

/// Runs checks against injected detectors and persists one row per check.
///
/// Detector failures end in an `error` row and an unsuccessful outcome.
/// Store and audit failures are returned as errors.
pub struct ValidationOrchestrator<S: ResultStore> {
    store: S,
    plagiarism: Box<dyn Detector>,
    ai_content: Box<dyn Detector>,
    thresholds: Thresholds,
    audit: Option<Mutex<AuditLog>>,
}

impl<S: ResultStore> ValidationOrchestrator<S> {
    pub fn new(store: S, plagiarism: Box<dyn Detector>, ai_content: Box<dyn Detector>) -> Self {
        Self {
            store,
            plagiarism,
            ai_content,
            thresholds: Thresholds::default(),
            audit: None,
        }
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> CoreResult<Self> {
        thresholds.validate()?;
        self.thresholds = thresholds;
        Ok(self)
    }

    pub fn with_audit_log(mut self, audit: AuditLog) -> Self {
        self.audit = Some(Mutex::new(audit));
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn run_plagiarism_check(&self, submission: &Submission) -> CoreResult<CheckOutcome> {
        self.run_check(CheckType::Plagiarism, submission)
    }

    pub fn run_ai_content_check(&self, submission: &Submission) -> CoreResult<CheckOutcome> {
        self.run_check(CheckType::AiContent, submission)
    }

    #[instrument(skip_all, fields(submission_id = %submission.id, check_type = %check_type))]
    pub fn run_check(
        &self,
        check_type: CheckType,
        submission: &Submission,
    ) -> CoreResult<CheckOutcome> {
        submission.validate()?;
        let detector = self.detector(check_type);
        let run_id = check_run_id();
        let text_sha256 = sha256_hex(submission.text.as_bytes());
        let started_at = now_rfc3339_utc()?;

        self.audit(AuditEvent::system(
            &started_at,
            "CHECK_STARTED",
            &run_id,
            &submission.id,
            json!({
                "check_type": check_type.as_str(),
                "detector_id": detector.detector_id(),
                "text_sha256": text_sha256,
            }),
        ))?;

        let metadata = ScanMetadata {
            run_id: run_id.clone(),
            detector_id: detector.detector_id().to_string(),
            text_sha256,
            word_count: None,
            sentence_count: None,
            scanned_at: started_at,
        };
        self.store
            .upsert(&CheckResult::pending(&submission.id, check_type, metadata.clone()))?;

        // Events after the pending row are buffered so that an audit failure
        // cannot leave that row behind without a terminal status.
        let mut events = Vec::new();
        let row = match self.score_with(detector, check_type, &submission.text) {
            Ok(eval) => {
                events.push(AuditEvent::system(
                    &now_rfc3339_utc()?,
                    "DETECTOR_CALL_COMPLETED",
                    &run_id,
                    &submission.id,
                    json!({
                        "check_type": check_type.as_str(),
                        "score_bp": score_basis_points(eval.score),
                        "highlight_count": eval.highlights.len(),
                    }),
                ));
                terminal_row(&submission.id, check_type, metadata, eval)?
            }
            Err(e) => {
                warn!(code = %e.code, retryable = e.retryable, "detector call failed: {}", e.message);
                events.push(AuditEvent::system(
                    &now_rfc3339_utc()?,
                    "DETECTOR_CALL_FAILED",
                    &run_id,
                    &submission.id,
                    json!({
                        "check_type": check_type.as_str(),
                        "error_category": e.category,
                        "error_code": e.code,
                        "retryable": e.retryable,
                    }),
                ));
                error_row(&submission.id, check_type, metadata, &e)?
            }
        };

        if let Err(e) = self.store.upsert(&row) {
            error!("failed to persist {} result: {}", check_type, e);
            return Err(e);
        }
        events.push(AuditEvent::system(
            &row.updated_at,
            "CHECK_RESULT_UPSERTED",
            &run_id,
            &submission.id,
            json!({ "check_type": check_type.as_str(), "status": row.status.as_str() }),
        ));
        events.push(AuditEvent::system(
            &row.updated_at,
            "CHECK_COMPLETED",
            &run_id,
            &submission.id,
            json!({
                "check_type": check_type.as_str(),
                "status": row.status.as_str(),
                "highlight_count": row.highlights.len(),
            }),
        ));
        for ev in events {
            self.audit(ev)?;
        }

        info!(
            status = %row.status,
            score = row.score,
            highlights = row.highlights.len(),
            "check completed"
        );
        Ok(CheckOutcome::from_row(&row))
    }

    /// Runs both checks concurrently and derives the summary once both rows are terminal.
    #[instrument(skip_all, fields(submission_id = %submission.id))]
    pub fn validate_submission(&self, submission: &Submission) -> CoreResult<SubmissionValidation> {
        submission.validate()?;
        let (plagiarism, ai_content) = std::thread::scope(|s| {
            let p = s.spawn(|| self.run_check(CheckType::Plagiarism, submission));
            let a = s.spawn(|| self.run_check(CheckType::AiContent, submission));
            (join_check(p, CheckType::Plagiarism), join_check(a, CheckType::AiContent))
        });
        let plagiarism = plagiarism?;
        let ai_content = ai_content?;

        let summary = self.summary_for(&submission.id)?;
        self.audit(AuditEvent::system(
            &now_rfc3339_utc()?,
            "VALIDATION_SUMMARY_DERIVED",
            &plagiarism.run_id,
            &submission.id,
            json!({
                "overall": summary.overall.as_str(),
                "publishable": summary.passed(),
                "ai_content_run_id": ai_content.run_id,
            }),
        ))?;
        info!(overall = %summary.overall, publishable = summary.passed(), "submission validated");
        Ok(SubmissionValidation {
            plagiarism,
            ai_content,
            summary,
        })
    }

    pub fn summary_for(&self, submission_id: &str) -> CoreResult<ValidationSummary> {
        let rows = self.store.list_for_submission(submission_id)?;
        Ok(ValidationSummary::from_results(
            submission_id,
            &rows,
            self.thresholds,
        ))
    }

    pub fn record_for(&self, submission_id: &str) -> CoreResult<ValidationRecord> {
        Ok(self.summary_for(submission_id)?.to_record())
    }

    fn detector(&self, check_type: CheckType) -> &dyn Detector {
        match check_type {
            CheckType::Plagiarism => self.plagiarism.as_ref(),
            CheckType::AiContent => self.ai_content.as_ref(),
        }
    }

    fn score_with(
        &self,
        detector: &dyn Detector,
        check_type: CheckType,
        text: &str,
    ) -> Result<CheckEvaluation, DetectorError> {
        let resp = normalize_response(detector.score(text)?)?;
        let eval = match check_type {
            CheckType::Plagiarism => evaluate_plagiarism(text, &resp, &self.thresholds),
            CheckType::AiContent => evaluate_ai_content(text, &resp, &self.thresholds),
        };
        eval.map_err(|e| DetectorError::malformed(e.to_string()))
    }

    fn audit(&self, event: AuditEvent) -> CoreResult<()> {
        if let Some(log) = &self.audit {
            log.lock()
                .map_err(|_| CoreError::Persistence("audit log lock poisoned".to_string()))?
                .append(event)?;
        }
        Ok(())
    }
}

fn join_check(
    handle: std::thread::ScopedJoinHandle<'_, CoreResult<CheckOutcome>>,
    check_type: CheckType,
) -> CoreResult<CheckOutcome> {
    handle.join().unwrap_or_else(|_| {
        Err(CoreError::Persistence(format!(
            "{} check worker panicked before reporting",
            check_type
        )))
    })
}

fn terminal_row(
    submission_id: &str,
    check_type: CheckType,
    mut metadata: ScanMetadata,
    eval: CheckEvaluation,
) -> CoreResult<CheckResult> {
    metadata.word_count = eval.word_count;
    metadata.sentence_count = eval.sentence_count;
    Ok(CheckResult {
        submission_id: submission_id.to_string(),
        check_type,
        score: Some(eval.score),
        highlights: eval.highlights,
        status: eval.status,
        metadata,
        error: None,
        updated_at: now_rfc3339_utc()?,
    })
}

fn error_row(
    submission_id: &str,
    check_type: CheckType,
    metadata: ScanMetadata,
    e: &DetectorError,
) -> CoreResult<CheckResult> {
    Ok(CheckResult {
        submission_id: submission_id.to_string(),
        check_type,
        score: None,
        highlights: Vec::new(),
        status: ValidationStatus::Error,
        metadata,
        error: Some(e.to_string()),
        updated_at: now_rfc3339_utc()?,
    })
}
