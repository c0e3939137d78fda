//! In-memory ProfileStore. Keeps insertion order, like a collection scan would.

use crate::domain::{DomainError, UserId, UserProfile};
use crate::ports::ProfileStore;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<Vec<UserProfile>>,
}

impl InMemoryProfileStore {
    pub fn new(profiles: Vec<UserProfile>) -> Self {
        Self {
            profiles: RwLock::new(profiles),
        }
    }

    /// Insert or replace by id. New profiles go to the end.
    pub async fn upsert(&self, profile: UserProfile) {
        let mut profiles = self.profiles.write().await;
        match profiles.iter_mut().find(|p| p.id == profile.id) {
            Some(existing) => *existing = profile,
            None => profiles.push(profile),
        }
    }
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.iter().find(|p| &p.id == id).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<UserProfile>, DomainError> {
        Ok(self.profiles.read().await.clone())
    }
}
