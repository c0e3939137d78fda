//! Firebase Cloud Messaging adapter (HTTP v1 API).
//!
//! Implements `PushGateway` the way "send each for multicast" does: one
//! `messages:send` request per token, in order, each result recorded
//! independently. A bad token never aborts the rest of the batch.

use crate::domain::{DomainError, NotificationPayload, SendResponse};
use crate::ports::PushGateway;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub const FCM_API_BASE: &str = "https://fcm.googleapis.com/v1";

/// FCM refuses multicast batches larger than this.
pub const MAX_MULTICAST_TOKENS: usize = 500;

/// FCM HTTP v1 adapter.
///
/// Requires a Google Cloud project id and an OAuth2 access token with the
/// `firebase.messaging` scope (e.g. from `gcloud auth print-access-token`).
pub struct FcmAdapter {
    client: reqwest::Client,
    api_base: String,
    project_id: String,
    access_token: String,
}

impl FcmAdapter {
    pub fn new(project_id: String, access_token: String) -> Self {
        Self::with_api_base(FCM_API_BASE.to_string(), project_id, access_token)
    }

    /// Point the adapter at a different API root (emulator, proxy).
    pub fn with_api_base(api_base: String, project_id: String, access_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base,
            project_id,
            access_token,
        }
    }

    fn send_url(&self) -> String {
        format!(
            "{}/projects/{}/messages:send",
            self.api_base.trim_end_matches('/'),
            self.project_id
        )
    }

    fn build_request<'a>(payload: &'a NotificationPayload, token: &'a str) -> SendRequest<'a> {
        SendRequest {
            message: FcmMessage {
                token,
                notification: FcmNotification {
                    title: &payload.title,
                    body: &payload.body,
                },
                data: &payload.data,
            },
        }
    }

    /// Turn an FCM error body into a short cause, preferring the FCM error code.
    fn error_cause(status: reqwest::StatusCode, body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(env) => {
                let code = env
                    .error
                    .details
                    .iter()
                    .find_map(|d| d.error_code.clone())
                    .or(env.error.status)
                    .unwrap_or_else(|| status.as_u16().to_string());
                format!("{}: {}", code, env.error.message)
            }
            Err(_) => format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            ),
        }
    }

    async fn send_one(&self, url: &str, payload: &NotificationPayload, token: &str) -> SendResponse {
        let request = Self::build_request(payload, token);
        let response = match self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return SendResponse::failed(format!("HTTP request failed: {}", e)),
        };

        let status = response.status();
        if status.is_success() {
            return SendResponse::ok();
        }
        let text = response.text().await.unwrap_or_default();
        warn!(status = %status, "FCM rejected message");
        SendResponse::failed(Self::error_cause(status, &text))
    }
}

/// FCM v1 `messages:send` request body.
#[derive(Serialize)]
struct SendRequest<'a> {
    message: FcmMessage<'a>,
}

#[derive(Serialize)]
struct FcmMessage<'a> {
    token: &'a str,
    notification: FcmNotification<'a>,
    data: &'a BTreeMap<String, String>,
}

#[derive(Serialize)]
struct FcmNotification<'a> {
    title: &'a str,
    body: &'a str,
}

/// Google API error envelope.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    #[serde(default, rename = "errorCode")]
    error_code: Option<String>,
}

#[async_trait::async_trait]
impl PushGateway for FcmAdapter {
    async fn send_multicast(
        &self,
        payload: &NotificationPayload,
    ) -> Result<Vec<SendResponse>, DomainError> {
        if payload.tokens.is_empty() {
            return Err(DomainError::Push("multicast needs at least one token".into()));
        }
        if payload.tokens.len() > MAX_MULTICAST_TOKENS {
            return Err(DomainError::Push(format!(
                "multicast supports at most {} tokens, got {}",
                MAX_MULTICAST_TOKENS,
                payload.tokens.len()
            )));
        }
        if self.access_token.is_empty() {
            return Err(DomainError::Push("missing FCM access token".into()));
        }

        let url = self.send_url();
        debug!(url = %url, tokens = payload.tokens.len(), "sending FCM multicast");

        let mut responses = Vec::with_capacity(payload.tokens.len());
        for token in &payload.tokens {
            responses.push(self.send_one(&url, payload, token).await);
        }
        Ok(responses)
    }
}
