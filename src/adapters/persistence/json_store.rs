//! Implements ProfileStore using a JSON file.
//!
//! The file holds an array of profile documents, each with an `id`. It is
//! re-read on every query: profiles are owned and edited by someone else.

use crate::domain::{DomainError, UserId, UserProfile};
use crate::ports::ProfileStore;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// JSON file-based profile store.
pub struct JsonProfileStore {
    path: PathBuf,
}

impl JsonProfileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    async fn read_all(&self) -> Result<Vec<UserProfile>, DomainError> {
        let raw = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::ProfileStore(format!("read {}: {}", self.path.display(), e))
        })?;
        let docs: Vec<serde_json::Value> = serde_json::from_str(&raw).map_err(|e| {
            DomainError::ProfileStore(format!("parse {}: {}", self.path.display(), e))
        })?;

        // One broken document must not hide every other profile.
        let total = docs.len();
        let profiles: Vec<UserProfile> = docs
            .into_iter()
            .enumerate()
            .filter_map(|(idx, doc)| match serde_json::from_value(doc) {
                Ok(p) => Some(p),
                Err(e) => {
                    warn!(path = %self.path.display(), index = idx, error = %e, "skipping malformed profile document");
                    None
                }
            })
            .collect();
        debug!(
            path = %self.path.display(),
            count = profiles.len(),
            skipped = total - profiles.len(),
            "loaded profiles"
        );
        Ok(profiles)
    }
}

#[async_trait::async_trait]
impl ProfileStore for JsonProfileStore {
    async fn get_profile(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        Ok(self.read_all().await?.into_iter().find(|p| &p.id == id))
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, DomainError> {
        self.read_all().await
    }
}
