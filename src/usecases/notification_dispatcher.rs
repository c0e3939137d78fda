//! Notification dispatch: build one payload, send it as a single multicast,
//! partition the per-token results.
//!
//! Individual token failures never fail the dispatch; only a failure of the
//! multicast call itself is returned as an error.

use crate::domain::{
    DATA_USER_ID_KEY, DeliveryOutcome, DomainError, FailedDelivery, NotificationPayload,
    SendResponse, UserId,
};
use crate::ports::PushGateway;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{error, info};

pub const DEFAULT_TITLE: &str = "Usuario Disponible";
/// `{name}` is replaced with the subject's display name.
pub const DEFAULT_BODY_TEMPLATE: &str = "{name} ahora está disponible";
const NAME_PLACEHOLDER: &str = "{name}";
const MISSING_RESPONSE_CAUSE: &str = "no response from transport";

/// Localized notification text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTemplate {
    pub title: String,
    pub body: String,
}

impl NotificationTemplate {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn render_body(&self, display_name: &str) -> String {
        self.body.replace(NAME_PLACEHOLDER, display_name)
    }
}

impl Default for NotificationTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, DEFAULT_BODY_TEMPLATE)
    }
}

pub struct NotificationDispatcher {
    push: Arc<dyn PushGateway>,
    template: NotificationTemplate,
}

impl NotificationDispatcher {
    pub fn new(push: Arc<dyn PushGateway>, template: NotificationTemplate) -> Self {
        Self { push, template }
    }

    pub fn build_payload(
        &self,
        subject_id: &UserId,
        display_name: &str,
        tokens: Vec<String>,
    ) -> NotificationPayload {
        let mut data = BTreeMap::new();
        data.insert(DATA_USER_ID_KEY.to_string(), subject_id.to_string());
        NotificationPayload {
            title: self.template.title.clone(),
            body: self.template.render_body(display_name),
            data,
            tokens,
        }
    }

    /// Send one multicast to `tokens` and report per-token results.
    pub async fn dispatch(
        &self,
        subject_id: &UserId,
        display_name: &str,
        tokens: Vec<String>,
    ) -> Result<DeliveryOutcome, DomainError> {
        let payload = self.build_payload(subject_id, display_name, tokens);
        let responses = self.push.send_multicast(&payload).await?;
        let outcome = partition_responses(&payload.tokens, &responses);

        for failed in &outcome.failed_tokens {
            error!(
                user_id = %subject_id,
                token_index = failed.index,
                error = %failed.cause,
                "failed to send to token"
            );
        }
        info!(
            user_id = %subject_id,
            success_count = outcome.success_count,
            failure_count = outcome.failure_count,
            "notification multicast finished"
        );

        Ok(outcome)
    }
}

/// Pair each token with its response (same order) and split successes from failures.
///
/// Tokens without a matching response are counted as failed. Extra responses are ignored.
/// No logging here; `dispatch` reports the result.
pub fn partition_responses(tokens: &[String], responses: &[SendResponse]) -> DeliveryOutcome {
    let mut outcome = DeliveryOutcome::default();
    for (idx, token) in tokens.iter().enumerate() {
        match responses.get(idx) {
            Some(resp) if resp.success => outcome.success_count += 1,
            other => {
                let cause = other
                    .and_then(|r| r.error.clone())
                    .unwrap_or_else(|| MISSING_RESPONSE_CAUSE.to_string());
                outcome.failed_tokens.push(FailedDelivery {
                    index: idx,
                    token: token.clone(),
                    cause,
                });
            }
        }
    }
    outcome.failure_count = outcome.failed_tokens.len();
    outcome
}
