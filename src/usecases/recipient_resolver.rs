//! Recipient resolution: who became available, and who should hear about it.
//!
//! Two read-only queries against the ProfileStore:
//! - fetch the subject's profile (for the display name)
//! - scan every profile and collect the other users' push tokens

use crate::domain::{DomainError, Recipients, UserId};
use crate::ports::ProfileStore;
use std::sync::Arc;
use tracing::debug;

pub struct RecipientResolver {
    store: Arc<dyn ProfileStore>,
}

impl RecipientResolver {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// Resolve the subject's display name and every other user's push token.
    ///
    /// Returns `Ok(None)` when the subject has no profile. An empty `tokens`
    /// list is still a successful resolution; the caller decides to skip dispatch.
    pub async fn resolve(&self, subject_id: &UserId) -> Result<Option<Recipients>, DomainError> {
        let Some(subject) = self.store.get_profile(subject_id).await? else {
            return Ok(None);
        };
        let display_name = subject.display_name();

        let profiles = self.store.list_profiles().await?;
        let scanned = profiles.len();
        let tokens: Vec<String> = profiles
            .iter()
            .filter(|p| &p.id != subject_id)
            .filter_map(|p| p.push_token())
            .map(str::to_string)
            .collect();

        debug!(
            user_id = %subject_id,
            scanned,
            tokens = tokens.len(),
            "collected push tokens"
        );

        Ok(Some(Recipients {
            display_name,
            tokens,
        }))
    }
}
