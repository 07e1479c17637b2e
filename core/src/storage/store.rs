use crate::error::{CoreError, CoreResult};
use crate::model::check_result::{CheckResult, CheckType};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Persistence for check results, keyed by `(submission_id, check_type)`.
///
/// `upsert` fully replaces the row for its key; there is never more than one
/// live row per pair, so concurrent checks of one submission cannot race.
pub trait ResultStore: Send + Sync {
    fn upsert(&self, result: &CheckResult) -> CoreResult<()>;
    fn get(&self, submission_id: &str, check_type: CheckType) -> CoreResult<Option<CheckResult>>;
    /// Rows for one submission, ordered by check type.
    fn list_for_submission(&self, submission_id: &str) -> CoreResult<Vec<CheckResult>>;
    /// Cascade from submission deletion. Returns the number of rows removed.
    fn delete_submission(&self, submission_id: &str) -> CoreResult<usize>;
}

#[derive(Default)]
pub struct MemoryResultStore {
    rows: Mutex<BTreeMap<(String, CheckType), CheckResult>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> CoreResult<usize> {
        Ok(self.lock()?.len())
    }

    fn lock(
        &self,
    ) -> CoreResult<std::sync::MutexGuard<'_, BTreeMap<(String, CheckType), CheckResult>>> {
        self.rows
            .lock()
            .map_err(|_| CoreError::Persistence("result store lock poisoned".to_string()))
    }
}

impl ResultStore for MemoryResultStore {
    fn upsert(&self, result: &CheckResult) -> CoreResult<()> {
        self.lock()?.insert(result.key(), result.clone());
        Ok(())
    }

    fn get(&self, submission_id: &str, check_type: CheckType) -> CoreResult<Option<CheckResult>> {
        Ok(self
            .lock()?
            .get(&(submission_id.to_string(), check_type))
            .cloned())
    }

    fn list_for_submission(&self, submission_id: &str) -> CoreResult<Vec<CheckResult>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|((sid, _), _)| sid == submission_id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    fn delete_submission(&self, submission_id: &str) -> CoreResult<usize> {
        let mut rows = self.lock()?;
        let before = rows.len();
        rows.retain(|(sid, _), _| sid != submission_id);
        Ok(before - rows.len())
    }
}
