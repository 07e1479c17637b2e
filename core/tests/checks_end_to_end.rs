mod common;

use common::{response, word_span, FakeDetector};
use guestpost_core::checks::orchestrator::ValidationOrchestrator;
use guestpost_core::detector::interface::classify_detector_error;
use guestpost_core::error::CoreError;
use guestpost_core::error::CoreResult;
use guestpost_core::model::check_result::{CheckResult, CheckType, ValidationStatus};
use guestpost_core::model::highlight::HighlightKind;
use guestpost_core::model::submission::Submission;
use guestpost_core::policy::publication_gate::PublicationBlockReason;
use guestpost_core::policy::thresholds::Thresholds;
use guestpost_core::storage::store::{MemoryResultStore, ResultStore};

/// Accepts pending rows and refuses every terminal one.
struct TerminalWriteFailsStore {
    inner: MemoryResultStore,
}

impl ResultStore for TerminalWriteFailsStore {
    fn upsert(&self, result: &CheckResult) -> CoreResult<()> {
        if result.status != ValidationStatus::Pending {
            return Err(CoreError::Persistence("disk full".to_string()));
        }
        self.inner.upsert(result)
    }

    fn get(&self, submission_id: &str, check_type: CheckType) -> CoreResult<Option<CheckResult>> {
        self.inner.get(submission_id, check_type)
    }

    fn list_for_submission(&self, submission_id: &str) -> CoreResult<Vec<CheckResult>> {
        self.inner.list_for_submission(submission_id)
    }

    fn delete_submission(&self, submission_id: &str) -> CoreResult<usize> {
        self.inner.delete_submission(submission_id)
    }
}

const THREE_SENTENCES: &str = "Sentence one. Sentence two. Sentence three.";

fn orchestrator(
    plagiarism: FakeDetector,
    ai_content: FakeDetector,
) -> ValidationOrchestrator<MemoryResultStore> {
    ValidationOrchestrator::new(
        MemoryResultStore::new(),
        Box::new(plagiarism),
        Box::new(ai_content),
    )
}

#[test]
fn plagiarism_above_threshold_fails_with_highlights() {
    let text = "word ".repeat(100);
    let o = orchestrator(
        FakeDetector::new("plag", vec![Ok(response(25.0, vec![word_span(0, 5)]))]),
        FakeDetector::scoring("ai", 0.0),
    );
    let out = o
        .run_plagiarism_check(&Submission::new("post_a", "u1", text))
        .unwrap();

    assert!(out.success);
    assert_eq!(out.status, ValidationStatus::Failed);
    assert_eq!(out.score, Some(25.0));
    assert_eq!(out.word_count, Some(100));
    assert_eq!(out.highlights.len(), 1);
    let h = &out.highlights[0];
    assert_eq!((h.start, h.end), (0, 24));
    assert_eq!(h.text, "word word word word word");
    assert_eq!(h.kind(), HighlightKind::Plagiarism);
    assert_eq!(h.source(), Some("https://blog.test/original"));

    let row = o
        .store()
        .get("post_a", CheckType::Plagiarism)
        .unwrap()
        .unwrap();
    assert_eq!(row.status, ValidationStatus::Failed);
    assert_eq!(row.highlights, out.highlights);
}

#[test]
fn plagiarism_at_threshold_passes_without_highlights() {
    let text = "word ".repeat(10);
    let o = orchestrator(
        FakeDetector::new("plag", vec![Ok(response(20.0, vec![word_span(0, 2)]))]),
        FakeDetector::scoring("ai", 0.0),
    );
    let out = o
        .run_plagiarism_check(&Submission::new("post_t", "u1", text))
        .unwrap();
    assert_eq!(out.status, ValidationStatus::Passed);
    assert!(out.highlights.is_empty());
}

#[test]
fn ai_content_below_highlight_threshold_passes_clean() {
    let o = orchestrator(
        FakeDetector::scoring("plag", 0.0),
        FakeDetector::scoring("ai", 10.0),
    );
    let out = o
        .run_ai_content_check(&Submission::new("post_b", "u1", THREE_SENTENCES))
        .unwrap();
    assert_eq!(out.status, ValidationStatus::Passed);
    assert!(out.highlights.is_empty());
    assert_eq!(out.sentence_count, Some(3));
}

#[test]
fn ai_content_between_thresholds_passes_but_highlights() {
    let o = orchestrator(
        FakeDetector::scoring("plag", 0.0),
        FakeDetector::scoring("ai", 20.0),
    );
    let out = o
        .run_ai_content_check(&Submission::new("post_c", "u1", THREE_SENTENCES))
        .unwrap();

    assert_eq!(out.status, ValidationStatus::Passed);
    assert!(!out.highlights.is_empty());
    let h = &out.highlights[0];
    assert_eq!(h.kind(), HighlightKind::AiContent);
    assert_eq!((h.start, h.end), (0, 12));
    assert_eq!(h.text, "Sentence one");
    assert!((h.confidence - 0.2).abs() < 1e-9);
}

#[test]
fn ai_content_above_fail_threshold_fails() {
    let o = orchestrator(
        FakeDetector::scoring("plag", 0.0),
        FakeDetector::scoring("ai", 30.5),
    );
    let out = o
        .run_ai_content_check(&Submission::new("post_d", "u1", THREE_SENTENCES))
        .unwrap();
    assert_eq!(out.status, ValidationStatus::Failed);
    assert!(!out.highlights.is_empty());
}

#[test]
fn detector_failure_leaves_error_row_not_pending() {
    let o = orchestrator(
        FakeDetector::scoring("plag", 5.0),
        FakeDetector::failing("ai", classify_detector_error("request timed out after 30s")),
    );
    let out = o
        .run_ai_content_check(&Submission::new("post_e", "u1", THREE_SENTENCES))
        .unwrap();

    assert!(!out.success);
    assert_eq!(out.status, ValidationStatus::Error);
    assert!(out.error.as_deref().unwrap().starts_with("DETECTOR_TIMEOUT"));
    assert_eq!(out.score, None);

    let row = o.store().get("post_e", CheckType::AiContent).unwrap().unwrap();
    assert_eq!(row.status, ValidationStatus::Error);
    assert!(row.status.is_terminal());
}

#[test]
fn non_finite_score_is_a_malformed_response() {
    let o = orchestrator(
        FakeDetector::scoring("plag", f64::NAN),
        FakeDetector::scoring("ai", 0.0),
    );
    let out = o
        .run_plagiarism_check(&Submission::new("post_n", "u1", "some words here"))
        .unwrap();
    assert_eq!(out.status, ValidationStatus::Error);
    assert!(out
        .error
        .as_deref()
        .unwrap()
        .starts_with("DETECTOR_MALFORMED_RESPONSE"));
}

#[test]
fn out_of_range_score_is_clamped() {
    let o = orchestrator(
        FakeDetector::scoring("plag", 140.0),
        FakeDetector::scoring("ai", 0.0),
    );
    let out = o
        .run_plagiarism_check(&Submission::new("post_o", "u1", "some words here"))
        .unwrap();
    assert_eq!(out.score, Some(100.0));
    assert_eq!(out.status, ValidationStatus::Failed);
}

#[test]
fn rerun_supersedes_the_previous_row() {
    let text = "word ".repeat(20);
    let o = orchestrator(
        FakeDetector::new(
            "plag",
            vec![
                Ok(response(25.0, vec![word_span(0, 3)])),
                Ok(response(5.0, vec![])),
            ],
        ),
        FakeDetector::scoring("ai", 0.0),
    );
    let s = Submission::new("post_f", "u1", text);
    let first = o.run_plagiarism_check(&s).unwrap();
    let second = o.run_plagiarism_check(&s).unwrap();

    assert_ne!(first.run_id, second.run_id);
    assert_eq!(o.store().row_count().unwrap(), 1);
    let row = o.store().get("post_f", CheckType::Plagiarism).unwrap().unwrap();
    assert_eq!(row.score, Some(5.0));
    assert!(row.highlights.is_empty());
    assert_eq!(row.metadata.run_id, second.run_id);
}

#[test]
fn one_check_done_reads_as_pending_overall() {
    let o = orchestrator(
        FakeDetector::scoring("plag", 3.0),
        FakeDetector::scoring("ai", 3.0),
    );
    o.run_plagiarism_check(&Submission::new("post_g", "u1", THREE_SENTENCES))
        .unwrap();

    let summary = o.summary_for("post_g").unwrap();
    assert_eq!(summary.overall, ValidationStatus::Pending);
    assert_eq!(summary.pending_checks(), vec![CheckType::AiContent]);
    assert_eq!(summary.block_reason, Some(PublicationBlockReason::CHECK_PENDING));
    assert!(!summary.passed());
}

#[test]
fn both_checks_pass() {
    let o = orchestrator(
        FakeDetector::scoring("plag", 5.0),
        FakeDetector::scoring("ai", 10.0),
    );
    let v = o
        .validate_submission(&Submission::new("post_h", "u1", THREE_SENTENCES))
        .unwrap();
    assert_eq!(v.summary.overall, ValidationStatus::Passed);
    assert!(v.summary.passed());
    assert_eq!(o.store().row_count().unwrap(), 2);

    let record = o.record_for("post_h").unwrap();
    assert_eq!(record.validation_status, ValidationStatus::Passed);
    assert_eq!(record.plagiarism_score, Some(5.0));
    assert_eq!(record.ai_content_score, Some(10.0));
}

#[test]
fn one_failing_check_fails_overall() {
    let text = "word ".repeat(30);
    let o = orchestrator(
        FakeDetector::new("plag", vec![Ok(response(25.0, vec![word_span(2, 4)]))]),
        FakeDetector::scoring("ai", 5.0),
    );
    let v = o
        .validate_submission(&Submission::new("post_i", "u1", text))
        .unwrap();
    assert_eq!(v.plagiarism.status, ValidationStatus::Failed);
    assert_eq!(v.ai_content.status, ValidationStatus::Passed);
    assert_eq!(v.summary.overall, ValidationStatus::Failed);
    assert_eq!(
        v.summary.block_reason,
        Some(PublicationBlockReason::PLAGIARISM_ABOVE_THRESHOLD)
    );
    let record = o.record_for("post_i").unwrap();
    assert_eq!(record.highlights().len(), 1);
    assert!(record.ai_content_highlights.unwrap().is_empty());
}

#[test]
fn errored_check_is_offered_for_retry() {
    let o = orchestrator(
        FakeDetector::scoring("plag", 5.0),
        FakeDetector::failing("ai", classify_detector_error("connection refused")),
    );
    let v = o
        .validate_submission(&Submission::new("post_j", "u1", THREE_SENTENCES))
        .unwrap();
    assert!(v.plagiarism.success);
    assert!(!v.ai_content.success);
    assert_eq!(v.summary.overall, ValidationStatus::Error);
    assert_eq!(v.summary.retryable_checks(), vec![CheckType::AiContent]);
}

#[test]
fn custom_thresholds_apply() {
    let o = orchestrator(
        FakeDetector::scoring("plag", 12.0),
        FakeDetector::scoring("ai", 0.0),
    )
    .with_thresholds(Thresholds {
        plagiarism_fail: 10.0,
        plagiarism_flag: 10.0,
        ..Thresholds::default()
    })
    .unwrap();
    let out = o
        .run_plagiarism_check(&Submission::new("post_k", "u1", "a b c"))
        .unwrap();
    assert_eq!(out.status, ValidationStatus::Failed);
}

#[test]
fn blank_submission_is_rejected_before_any_row() {
    let o = orchestrator(
        FakeDetector::scoring("plag", 5.0),
        FakeDetector::scoring("ai", 5.0),
    );
    let err = o
        .validate_submission(&Submission::new("post_l", "u1", "   \n "))
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidInput(_)));
    assert_eq!(o.store().row_count().unwrap(), 0);
}

#[test]
fn score_only_plagiarism_above_threshold_still_highlights() {
    let text = "word ".repeat(100);
    let o = orchestrator(
        FakeDetector::scoring("plag", 25.0),
        FakeDetector::scoring("ai", 0.0),
    );
    let out = o
        .run_plagiarism_check(&Submission::new("post_m", "u1", text))
        .unwrap();

    assert_eq!(out.status, ValidationStatus::Failed);
    assert_eq!(out.highlights.len(), 1);
    let h = &out.highlights[0];
    assert_eq!((h.start, h.end), (0, 124));
    assert_eq!(h.source(), None);
    assert!((h.confidence - 0.25).abs() < 1e-9);
}

#[test]
fn failed_terminal_write_is_a_hard_error() {
    let o = ValidationOrchestrator::new(
        TerminalWriteFailsStore {
            inner: MemoryResultStore::new(),
        },
        Box::new(FakeDetector::scoring("plag", 5.0)),
        Box::new(FakeDetector::scoring("ai", 5.0)),
    );
    let s = Submission::new("post_p", "u1", THREE_SENTENCES);

    let err = o.run_check(CheckType::Plagiarism, &s).unwrap_err();
    assert!(matches!(err, CoreError::Persistence(_)));

    let err = o.validate_submission(&s).unwrap_err();
    assert!(matches!(err, CoreError::Persistence(_)));
}
