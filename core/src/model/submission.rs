use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Text under review. Owned by the authoring side; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Submission {
    pub id: String,
    pub owner_id: String,
    pub text: String,
}

impl Submission {
    pub fn new(id: impl Into<String>, owner_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            text: text.into(),
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if self.id.trim().is_empty() {
            return Err(CoreError::InvalidInput(
                "submission id cannot be empty".to_string(),
            ));
        }
        if self.text.trim().is_empty() {
            return Err(CoreError::InvalidInput(format!(
                "submission {} has empty text",
                self.id
            )));
        }
        Ok(())
    }
}
