use crate::detector::placeholder::PlaceholderDetectorConfig;
use crate::error::{CoreError, CoreResult};
use crate::policy::thresholds::Thresholds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    pub thresholds: Thresholds,
    pub store_dir: PathBuf,
    pub audit_log_path: Option<PathBuf>,
    pub plagiarism_detector: PlaceholderDetectorConfig,
    pub ai_content_detector: PlaceholderDetectorConfig,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            store_dir: PathBuf::from("validation_results"),
            audit_log_path: None,
            plagiarism_detector: PlaceholderDetectorConfig::plagiarism_default(),
            ai_content_detector: PlaceholderDetectorConfig::ai_content_default(),
        }
    }
}

impl ValidationConfig {
    /// Reads a JSON config; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let cfg: Self = match fs::read(path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                CoreError::Config(format!("{}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e.into()),
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> CoreResult<()> {
        self.thresholds.validate()?;
        if self.store_dir.as_os_str().is_empty() {
            return Err(CoreError::Config("store_dir cannot be empty".to_string()));
        }
        Ok(())
    }

    pub fn write(&self, path: impl AsRef<Path>) -> CoreResult<()> {
        fs::write(path, serde_json::to_vec_pretty(self)?)?;
        Ok(())
    }
}
