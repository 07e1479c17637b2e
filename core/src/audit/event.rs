use crate::determinism::json_canonical;
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEvent {
    pub ts_utc: String, // RFC3339 UTC string
    pub event_type: String,
    pub run_id: String,
    pub submission_id: String,
    pub actor: Actor,
    pub details: serde_json::Value,
    pub prev_event_hash: String, // hex 64
    pub event_hash: String,      // hex 64
}

impl AuditEvent {
    /// Unchained event; `AuditLog::append` fills both hashes.
    pub fn system(
        ts_utc: &str,
        event_type: &str,
        run_id: &str,
        submission_id: &str,
        details: serde_json::Value,
    ) -> Self {
        Self {
            ts_utc: ts_utc.to_string(),
            event_type: event_type.to_string(),
            run_id: run_id.to_string(),
            submission_id: submission_id.to_string(),
            actor: Actor::System,
            details,
            prev_event_hash: String::new(),
            event_hash: String::new(),
        }
    }
}

pub const ZERO_HASH_64: &str = "0000000000000000000000000000000000000000000000000000000000000000";

// event_hash = SHA-256 of the canonical envelope with event_hash itself zeroed.
pub fn compute_event_hash(event: &AuditEvent) -> CoreResult<String> {
    let mut e = event.clone();
    e.event_hash = ZERO_HASH_64.to_string();
    let bytes = json_canonical::to_canonical_bytes(&e)?;
    let mut h = Sha256::new();
    h.update(bytes);
    Ok(hex::encode(h.finalize()))
}

pub fn finalize_event(mut event: AuditEvent) -> CoreResult<AuditEvent> {
    if event.prev_event_hash.len() != 64
        || !event.prev_event_hash.chars().all(|c| c.is_ascii_hexdigit())
    {
        return Err(CoreError::InvalidInput(
            "prev_event_hash must be 64 hex chars".to_string(),
        ));
    }
    validate_event_taxonomy(&event)?;
    event.event_hash = compute_event_hash(&event)?;
    Ok(event)
}

fn validate_event_taxonomy(event: &AuditEvent) -> CoreResult<()> {
    let allowed = [
        "CHECK_STARTED",
        "DETECTOR_CALL_COMPLETED",
        "DETECTOR_CALL_FAILED",
        "CHECK_RESULT_UPSERTED",
        "CHECK_COMPLETED",
        "VALIDATION_SUMMARY_DERIVED",
    ];
    if !allowed.contains(&event.event_type.as_str()) {
        return Err(CoreError::InvalidInput(format!(
            "unknown event_type {}",
            event.event_type
        )));
    }
    for k in required_detail_keys(&event.event_type) {
        if event.details.get(k).is_none() {
            return Err(CoreError::InvalidInput(format!(
                "event {} missing details.{}",
                event.event_type, k
            )));
        }
    }
    Ok(())
}

fn required_detail_keys(event_type: &str) -> &'static [&'static str] {
    match event_type {
        "CHECK_STARTED" => &["check_type", "detector_id", "text_sha256"],
        "DETECTOR_CALL_COMPLETED" => &["check_type", "score_bp", "highlight_count"],
        "DETECTOR_CALL_FAILED" => &["check_type", "error_category", "error_code", "retryable"],
        "CHECK_RESULT_UPSERTED" => &["check_type", "status"],
        "CHECK_COMPLETED" => &["check_type", "status", "highlight_count"],
        "VALIDATION_SUMMARY_DERIVED" => &["overall", "publishable"],
        _ => &[],
    }
}

/// Recomputes every hash and checks `prev_event_hash` links.
pub fn verify_chain(events: &[AuditEvent]) -> CoreResult<()> {
    let mut prev = ZERO_HASH_64.to_string();
    for (i, e) in events.iter().enumerate() {
        if e.prev_event_hash != prev {
            return Err(CoreError::InvalidInput(format!(
                "audit chain broken at line {}",
                i + 1
            )));
        }
        if compute_event_hash(e)? != e.event_hash {
            return Err(CoreError::InvalidInput(format!(
                "audit event hash mismatch at line {}",
                i + 1
            )));
        }
        prev = e.event_hash.clone();
    }
    Ok(())
}
