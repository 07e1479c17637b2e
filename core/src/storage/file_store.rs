use crate::error::{CoreError, CoreResult};
use crate::model::check_result::{CheckResult, CheckType};
use crate::storage::store::ResultStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use ulid::Ulid;

/// One JSON document per row: `<root>/<hex(submission_id)>/<check_type>.json`.
///
/// Writes go to a temp file in the same directory and are renamed over the
/// target, so readers see either the previous row or the new one.
pub struct FileResultStore {
    root: PathBuf,
}

impl FileResultStore {
    pub fn open(root: impl AsRef<Path>) -> CoreResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root).map_err(persist_err)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn submission_dir(&self, submission_id: &str) -> PathBuf {
        self.root.join(hex::encode(submission_id.as_bytes()))
    }

    fn row_path(&self, submission_id: &str, check_type: CheckType) -> PathBuf {
        self.submission_dir(submission_id)
            .join(format!("{}.json", check_type.as_str()))
    }
}

fn persist_err(e: impl std::fmt::Display) -> CoreError {
    CoreError::Persistence(e.to_string())
}

impl ResultStore for FileResultStore {
    fn upsert(&self, result: &CheckResult) -> CoreResult<()> {
        let dir = self.submission_dir(&result.submission_id);
        fs::create_dir_all(&dir).map_err(persist_err)?;
        let target = self.row_path(&result.submission_id, result.check_type);
        let tmp = dir.join(format!(".{}.{}.tmp", result.check_type.as_str(), Ulid::new()));
        let bytes = serde_json::to_vec_pretty(result).map_err(persist_err)?;
        fs::write(&tmp, bytes).map_err(persist_err)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(persist_err(e));
        }
        Ok(())
    }

    fn get(&self, submission_id: &str, check_type: CheckType) -> CoreResult<Option<CheckResult>> {
        match fs::read(self.row_path(submission_id, check_type)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes).map_err(persist_err)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(persist_err(e)),
        }
    }

    fn list_for_submission(&self, submission_id: &str) -> CoreResult<Vec<CheckResult>> {
        let mut out = Vec::new();
        for ct in CheckType::ALL {
            if let Some(r) = self.get(submission_id, ct)? {
                out.push(r);
            }
        }
        Ok(out)
    }

    fn delete_submission(&self, submission_id: &str) -> CoreResult<usize> {
        let count = self.list_for_submission(submission_id)?.len();
        match fs::remove_dir_all(self.submission_dir(submission_id)) {
            Ok(()) => Ok(count),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(0),
            Err(e) => Err(persist_err(e)),
        }
    }
}
