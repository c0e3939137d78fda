//! Domain entities. Pure data structures for the core business.
//!
//! No store/transport types here; adapters map into these.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Display name used when a profile has neither a name nor an email.
pub const FALLBACK_DISPLAY_NAME: &str = "Usuario";

/// Key under which the subject id travels in the notification data.
pub const DATA_USER_ID_KEY: &str = "userId";

/// Identity of a user profile document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Raw value of the watched field as the upstream store hands it over.
///
/// The store is loosely typed, so anything may show up here. Only `Bool(true)`
/// counts as "available"; `null`, `"false"`, `0` and friends do not.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// Field missing or explicitly `null`.
    #[default]
    Absent,
    Bool(bool),
    /// Any non-boolean value (string, number, object, array).
    Other(serde_json::Value),
}

impl FieldValue {
    /// Strict check: exactly the boolean `true`.
    pub fn is_true(&self) -> bool {
        matches!(self, FieldValue::Bool(true))
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => FieldValue::Absent,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            other => FieldValue::Other(other),
        }
    }
}

impl From<Option<serde_json::Value>> for FieldValue {
    fn from(v: Option<serde_json::Value>) -> Self {
        v.map(FieldValue::from).unwrap_or_default()
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => f.write_str("absent"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Other(v) => write!(f, "{}", v),
        }
    }
}

/// One write of the watched field for one user. Built per trigger, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityEvent {
    pub subject_id: UserId,
    pub before: FieldValue,
    pub after: FieldValue,
}

impl AvailabilityEvent {
    pub fn new(
        subject_id: impl Into<UserId>,
        before: impl Into<FieldValue>,
        after: impl Into<FieldValue>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            before: before.into(),
            after: after.into(),
        }
    }
}

/// A user profile document. Owned by the profile store; read-only here.
///
/// The store does not enforce types, so a non-string optional field reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, rename = "lastName", deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(default, rename = "fcmToken", deserialize_with = "lenient_string")]
    pub fcm_token: Option<String>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

impl UserProfile {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// "{name} {lastName}" trimmed; otherwise the local part of the email; otherwise "Usuario".
    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        );
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }
        let source = self
            .email
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(FALLBACK_DISPLAY_NAME);
        source.split('@').next().unwrap_or_default().to_string()
    }

    /// The push token, if present and not blank. Returned as stored (untrimmed).
    pub fn push_token(&self) -> Option<&str> {
        self.fcm_token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

/// Result of recipient resolution: who triggered it and where to deliver.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Recipients {
    pub display_name: String,
    /// Push tokens of every other user, in store enumeration order.
    pub tokens: Vec<String>,
}

/// A single multicast notification, built once per qualifying event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub data: BTreeMap<String, String>,
    pub tokens: Vec<String>,
}

/// Transport result for one token of a multicast send.
#[derive(Debug, Clone, PartialEq)]
pub struct SendResponse {
    pub success: bool,
    pub error: Option<String>,
}

impl SendResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(cause: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(cause.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FailedDelivery {
    /// Position of the token in the submitted list.
    pub index: usize,
    pub token: String,
    pub cause: String,
}

/// Partitioned multicast result. Logged and dropped.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeliveryOutcome {
    pub success_count: usize,
    pub failure_count: usize,
    /// Failed tokens in their original relative order.
    pub failed_tokens: Vec<FailedDelivery>,
}

impl DeliveryOutcome {
    pub fn failed_token_list(&self) -> Vec<&str> {
        self.failed_tokens.iter().map(|f| f.token.as_str()).collect()
    }
}

/// Why an event stopped before delivery.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscardReason {
    IgnorableTransition,
    SubjectNotFound,
    NoRecipients,
    ResolutionFailure(String),
    DispatchFailure(String),
}

/// Terminal state of one event. Every event ends in one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    Completed(DeliveryOutcome),
    Discarded(DiscardReason),
}

impl EventOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, EventOutcome::Completed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: Option<&str>, last: Option<&str>, email: Option<&str>) -> UserProfile {
        UserProfile {
            id: UserId::from("u"),
            name: name.map(String::from),
            last_name: last.map(String::from),
            email: email.map(String::from),
            fcm_token: None,
        }
    }

    #[test]
    fn test_display_name_full_name() {
        assert_eq!(
            profile(Some("Ana"), Some("Ruiz"), None).display_name(),
            "Ana Ruiz"
        );
    }

    #[test]
    fn test_display_name_single_part() {
        assert_eq!(profile(Some("Ana"), None, None).display_name(), "Ana");
        assert_eq!(profile(None, Some("Ruiz"), None).display_name(), "Ruiz");
    }

    #[test]
    fn test_display_name_email_fallback() {
        assert_eq!(
            profile(Some(""), Some(""), Some("ana@x.com")).display_name(),
            "ana"
        );
        assert_eq!(
            profile(Some("  "), None, Some("ana@x.com")).display_name(),
            "ana"
        );
    }

    #[test]
    fn test_display_name_email_without_at() {
        assert_eq!(profile(None, None, Some("ana")).display_name(), "ana");
    }

    #[test]
    fn test_display_name_default() {
        assert_eq!(profile(None, None, None).display_name(), "Usuario");
        assert_eq!(profile(None, None, Some("")).display_name(), "Usuario");
    }

    #[test]
    fn test_push_token_blank_is_none() {
        let mut p = UserProfile::new("u2");
        p.fcm_token = Some("  ".into());
        assert_eq!(p.push_token(), None);
        p.fcm_token = Some(String::new());
        assert_eq!(p.push_token(), None);
        p.fcm_token = Some("t2".into());
        assert_eq!(p.push_token(), Some("t2"));
    }

    #[test]
    fn test_field_value_from_json() {
        assert_eq!(FieldValue::from(serde_json::Value::Null), FieldValue::Absent);
        assert_eq!(FieldValue::from(None::<serde_json::Value>), FieldValue::Absent);
        assert_eq!(FieldValue::from(serde_json::json!(true)), FieldValue::Bool(true));
        assert_eq!(
            FieldValue::from(serde_json::json!("true")),
            FieldValue::Other(serde_json::json!("true"))
        );
        assert!(!FieldValue::from(serde_json::json!("true")).is_true());
        assert!(!FieldValue::from(serde_json::json!(1)).is_true());
    }

    #[test]
    fn test_profile_non_string_fields_read_as_absent() {
        let p: UserProfile = serde_json::from_str(
            r#"{"id":"u3","name":42,"lastName":null,"email":["x"],"fcmToken":{"t":1}}"#,
        )
        .unwrap();
        assert_eq!(p.name, None);
        assert_eq!(p.last_name, None);
        assert_eq!(p.email, None);
        assert_eq!(p.push_token(), None);
        assert_eq!(p.display_name(), "Usuario");
    }

    #[test]
    fn test_profile_deserializes_store_field_names() {
        let p: UserProfile = serde_json::from_str(
            r#"{"id":"u1","name":"Joe","lastName":"X","fcmToken":"t1","extra":42}"#,
        )
        .unwrap();
        assert_eq!(p.id, UserId::from("u1"));
        assert_eq!(p.last_name.as_deref(), Some("X"));
        assert_eq!(p.fcm_token.as_deref(), Some("t1"));
        assert_eq!(p.email, None);
    }
}
