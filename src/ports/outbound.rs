//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, NotificationPayload, SendResponse, UserId, UserProfile};

/// Profile store. Read-only from this crate's point of view.
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch one profile. `Ok(None)` when no document exists for `id`.
    async fn get_profile(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError>;

    /// Full collection scan. No filtering; enumeration order is preserved by callers.
    async fn list_profiles(&self) -> Result<Vec<UserProfile>, DomainError>;
}

/// Push transport. Fans a payload out to every token in it.
#[async_trait::async_trait]
pub trait PushGateway: Send + Sync {
    /// Send `payload` to each of `payload.tokens`.
    ///
    /// Returns one `SendResponse` per token in submission order. Per-token
    /// failures are reported there; `Err` means the multicast call itself failed.
    async fn send_multicast(
        &self,
        payload: &NotificationPayload,
    ) -> Result<Vec<SendResponse>, DomainError>;
}
