use crate::error::CoreResult;
use crate::model::check_result::{CheckResult, CheckType, ValidationStatus};
use crate::summary::aggregate::ValidationSummary;

fn check_label(ct: CheckType) -> &'static str {
    match ct {
        CheckType::Plagiarism => "Plagiarism",
        CheckType::AiContent => "AI content",
    }
}

fn threshold_for(summary: &ValidationSummary, ct: CheckType) -> f64 {
    match ct {
        CheckType::Plagiarism => summary.thresholds.plagiarism_fail,
        CheckType::AiContent => summary.thresholds.ai_content_fail,
    }
}

/// Results panel shown to the submitter. A pending check reads as in
/// progress, never as a pass or a fail.
pub fn render_summary_markdown(summary: &ValidationSummary) -> String {
    let mut out = Vec::new();
    out.push(format!("# Content Validation: {}", summary.submission_id));
    out.push("".to_string());

    let headline = match summary.overall {
        ValidationStatus::Pending => "Validation in progress".to_string(),
        ValidationStatus::Error => "Validation could not complete".to_string(),
        ValidationStatus::Failed => "Validation failed".to_string(),
        ValidationStatus::Passed if summary.passed() => "Validation passed".to_string(),
        ValidationStatus::Passed => "Validation blocked".to_string(),
    };
    out.push(format!("**{}**", headline));
    out.push("".to_string());

    for ct in CheckType::ALL {
        let label = check_label(ct);
        let max = threshold_for(summary, ct);
        let line = match summary.check(ct) {
            None => format!("- {}: in progress", label),
            Some(r) => match r.status {
                ValidationStatus::Pending => format!("- {}: in progress", label),
                ValidationStatus::Error => format!(
                    "- {}: error ({}). Retry this check.",
                    label,
                    r.error.as_deref().unwrap_or("detector unavailable")
                ),
                status => format!(
                    "- {}: {} with score {:.1}% (max {:.0}%), {} highlighted passage(s)",
                    label,
                    status,
                    r.score.unwrap_or(0.0),
                    max,
                    r.highlights.len()
                ),
            },
        };
        out.push(line);
    }
    out.push("".to_string());
    out.join("\n")
}

/// Moderation export, one row per stored check result.
pub fn render_results_csv(rows: &[CheckResult]) -> CoreResult<String> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        a.submission_id
            .cmp(&b.submission_id)
            .then(a.check_type.cmp(&b.check_type))
    });

    let mut wtr = csv::WriterBuilder::new().from_writer(vec![]);
    wtr.write_record([
        "submission_id",
        "check_type",
        "status",
        "score",
        "highlight_count",
        "run_id",
        "updated_at",
    ])?;
    for r in sorted {
        wtr.write_record([
            r.submission_id.clone(),
            r.check_type.as_str().to_string(),
            r.status.as_str().to_string(),
            r.score.map(|s| format!("{:.2}", s)).unwrap_or_default(),
            r.highlights.len().to_string(),
            r.metadata.run_id.clone(),
            r.updated_at.clone(),
        ])?;
    }
    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).replace("\r\n", "\n"))
}
