//! Dry-run push gateway. Logs what would be sent and reports success.
//!
//! Used when FCM credentials are not configured.

use crate::domain::{DomainError, NotificationPayload, SendResponse};
use crate::ports::PushGateway;
use tracing::info;

#[derive(Debug, Default)]
pub struct LogPushGateway;

impl LogPushGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl PushGateway for LogPushGateway {
    async fn send_multicast(
        &self,
        payload: &NotificationPayload,
    ) -> Result<Vec<SendResponse>, DomainError> {
        for (idx, token) in payload.tokens.iter().enumerate() {
            info!(
                token_index = idx,
                token = %token,
                title = %payload.title,
                body = %payload.body,
                "[DRY RUN] would send push notification"
            );
        }
        Ok(vec![SendResponse::ok(); payload.tokens.len()])
    }
}
