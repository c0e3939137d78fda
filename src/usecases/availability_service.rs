//! Availability use case: detect -> resolve -> dispatch, once per change event.
//!
//! Nothing here is ever returned as an error. Every event ends as
//! `EventOutcome::Completed` or `EventOutcome::Discarded`, and all failure
//! detail goes to the log. Retrying at the trigger layer would re-run a stale
//! comparison, so the caller always sees a clean completion.

use crate::domain::{
    AvailabilityEvent, DiscardReason, EventOutcome, FieldPath, FieldValue,
    is_qualifying_transition,
};
use crate::usecases::{NotificationDispatcher, RecipientResolver};
use tracing::{debug, error, info, warn};

pub struct AvailabilityService {
    watched: FieldPath,
    resolver: RecipientResolver,
    dispatcher: NotificationDispatcher,
}

impl AvailabilityService {
    pub fn new(
        watched: FieldPath,
        resolver: RecipientResolver,
        dispatcher: NotificationDispatcher,
    ) -> Self {
        Self {
            watched,
            resolver,
            dispatcher,
        }
    }

    /// Entry point for raw change records. Paths outside the watched template are ignored.
    pub async fn handle_change(
        &self,
        path: &str,
        before: FieldValue,
        after: FieldValue,
    ) -> EventOutcome {
        let Some(subject_id) = self.watched.match_path(path) else {
            debug!(path, watched = self.watched.template(), "path not watched, ignoring");
            return EventOutcome::Discarded(DiscardReason::IgnorableTransition);
        };
        self.handle_event(&AvailabilityEvent {
            subject_id,
            before,
            after,
        })
        .await
    }

    /// Process one event to a terminal state.
    pub async fn handle_event(&self, event: &AvailabilityEvent) -> EventOutcome {
        let user_id = &event.subject_id;
        info!(
            user_id = %user_id,
            before = %event.before,
            after = %event.after,
            "availability change detected"
        );

        if !is_qualifying_transition(&event.before, &event.after) {
            info!(user_id = %user_id, "not an unavailable -> available change, ignoring");
            return EventOutcome::Discarded(DiscardReason::IgnorableTransition);
        }

        info!(user_id = %user_id, "user became available, resolving recipients");
        let recipients = match self.resolver.resolve(user_id).await {
            Ok(Some(r)) => r,
            Ok(None) => {
                warn!(user_id = %user_id, "user has no profile, ignoring");
                return EventOutcome::Discarded(DiscardReason::SubjectNotFound);
            }
            Err(e) => {
                error!(user_id = %user_id, error = %e, "failed to resolve recipients");
                return EventOutcome::Discarded(DiscardReason::ResolutionFailure(e.to_string()));
            }
        };

        info!(
            user_id = %user_id,
            display_name = %recipients.display_name,
            "processing availability notification"
        );

        if recipients.tokens.is_empty() {
            info!(user_id = %user_id, "no push tokens available, nothing to send");
            return EventOutcome::Discarded(DiscardReason::NoRecipients);
        }

        info!(
            user_id = %user_id,
            recipients = recipients.tokens.len(),
            "sending notifications"
        );

        match self
            .dispatcher
            .dispatch(user_id, &recipients.display_name, recipients.tokens)
            .await
        {
            Ok(outcome) => EventOutcome::Completed(outcome),
            Err(e) => {
                error!(user_id = %user_id, error = %e, "failed to dispatch availability notification");
                EventOutcome::Discarded(DiscardReason::DispatchFailure(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::InMemoryProfileStore;
    use crate::domain::{
        DomainError, NotificationPayload, SendResponse, UserId, UserProfile,
    };
    use crate::ports::{ProfileStore, PushGateway};
    use crate::usecases::NotificationTemplate;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    /// Records every payload; fails tokens listed in `reject`.
    #[derive(Default)]
    struct RecordingGateway {
        sent: Mutex<Vec<NotificationPayload>>,
        reject: Vec<String>,
        unreachable: bool,
    }

    #[async_trait::async_trait]
    impl PushGateway for RecordingGateway {
        async fn send_multicast(
            &self,
            payload: &NotificationPayload,
        ) -> Result<Vec<SendResponse>, DomainError> {
            self.sent.lock().await.push(payload.clone());
            if self.unreachable {
                return Err(DomainError::Push("connection refused".into()));
            }
            Ok(payload
                .tokens
                .iter()
                .map(|t| {
                    if self.reject.contains(t) {
                        SendResponse::failed("registration-token-not-registered")
                    } else {
                        SendResponse::ok()
                    }
                })
                .collect())
        }
    }

    struct BrokenStore;

    #[async_trait::async_trait]
    impl ProfileStore for BrokenStore {
        async fn get_profile(&self, _id: &UserId) -> Result<Option<UserProfile>, DomainError> {
            Err(DomainError::ProfileStore("deadline exceeded".into()))
        }

        async fn list_profiles(&self) -> Result<Vec<UserProfile>, DomainError> {
            Err(DomainError::ProfileStore("deadline exceeded".into()))
        }
    }

    fn profile(id: &str, name: Option<&str>, last: Option<&str>, token: Option<&str>) -> UserProfile {
        UserProfile {
            name: name.map(String::from),
            last_name: last.map(String::from),
            fcm_token: token.map(String::from),
            ..UserProfile::new(id)
        }
    }

    /// u1 "Joe X", u2 with token, u3 without, u4 with an empty token.
    fn scenario_store() -> Arc<InMemoryProfileStore> {
        Arc::new(InMemoryProfileStore::new(vec![
            profile("u1", Some("Joe"), Some("X"), Some("t1")),
            profile("u2", None, None, Some("t2")),
            profile("u3", None, None, None),
            profile("u4", None, None, Some("")),
        ]))
    }

    fn service(store: Arc<dyn ProfileStore>, gw: Arc<RecordingGateway>) -> AvailabilityService {
        AvailabilityService::new(
            FieldPath::default(),
            RecipientResolver::new(store),
            NotificationDispatcher::new(gw, NotificationTemplate::default()),
        )
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let gw = Arc::new(RecordingGateway::default());
        let svc = service(scenario_store(), gw.clone());

        let outcome = svc
            .handle_event(&AvailabilityEvent::new("u1", false, true))
            .await;

        let sent = gw.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].tokens, vec!["t2"]);
        let template = NotificationTemplate::default();
        assert_eq!(sent[0].body, template.render_body("Joe X"));
        assert!(sent[0].body.starts_with("Joe X "));
        assert_eq!(sent[0].data.get("userId").map(String::as_str), Some("u1"));

        match outcome {
            EventOutcome::Completed(o) => {
                assert_eq!(o.success_count, 1);
                assert_eq!(o.failure_count, 0);
            }
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_qualifying_transition_skips_everything() {
        let gw = Arc::new(RecordingGateway::default());
        let svc = service(Arc::new(BrokenStore), gw.clone());

        for (before, after) in [(true, true), (true, false), (false, false)] {
            let outcome = svc
                .handle_event(&AvailabilityEvent::new("u1", before, after))
                .await;
            assert_eq!(
                outcome,
                EventOutcome::Discarded(DiscardReason::IgnorableTransition)
            );
        }
        assert!(gw.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_absent_before_qualifies() {
        let gw = Arc::new(RecordingGateway::default());
        let svc = service(scenario_store(), gw.clone());

        let outcome = svc
            .handle_event(&AvailabilityEvent::new("u1", FieldValue::Absent, true))
            .await;
        assert!(outcome.is_completed());
    }

    #[tokio::test]
    async fn test_missing_subject_is_discarded() {
        let gw = Arc::new(RecordingGateway::default());
        let svc = service(scenario_store(), gw.clone());

        let outcome = svc
            .handle_event(&AvailabilityEvent::new("ghost", false, true))
            .await;
        assert_eq!(outcome, EventOutcome::Discarded(DiscardReason::SubjectNotFound));
        assert!(gw.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_no_recipients_skips_transport() {
        let store = Arc::new(InMemoryProfileStore::new(vec![
            profile("u1", Some("Joe"), None, Some("t1")),
            profile("u3", None, None, None),
            profile("u4", None, None, Some("  ")),
        ]));
        let gw = Arc::new(RecordingGateway::default());
        let svc = service(store, gw.clone());

        let outcome = svc
            .handle_event(&AvailabilityEvent::new("u1", false, true))
            .await;
        assert_eq!(outcome, EventOutcome::Discarded(DiscardReason::NoRecipients));
        assert!(gw.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let gw = Arc::new(RecordingGateway::default());
        let svc = service(Arc::new(BrokenStore), gw.clone());

        let outcome = svc
            .handle_event(&AvailabilityEvent::new("u1", false, true))
            .await;
        assert!(matches!(
            outcome,
            EventOutcome::Discarded(DiscardReason::ResolutionFailure(_))
        ));
        assert!(gw.sent.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_swallowed() {
        let gw = Arc::new(RecordingGateway {
            unreachable: true,
            ..Default::default()
        });
        let svc = service(scenario_store(), gw.clone());

        let outcome = svc
            .handle_event(&AvailabilityEvent::new("u1", false, true))
            .await;
        assert!(matches!(
            outcome,
            EventOutcome::Discarded(DiscardReason::DispatchFailure(_))
        ));
    }

    #[tokio::test]
    async fn test_partial_failure_still_completes() {
        let store = Arc::new(InMemoryProfileStore::new(vec![
            profile("u1", Some("Ana"), None, None),
            profile("u2", None, None, Some("t2")),
            profile("u3", None, None, Some("t3")),
            profile("u4", None, None, Some("t4")),
        ]));
        let gw = Arc::new(RecordingGateway {
            reject: vec!["t3".into()],
            ..Default::default()
        });
        let svc = service(store, gw);

        let outcome = svc
            .handle_event(&AvailabilityEvent::new("u1", false, true))
            .await;
        match outcome {
            EventOutcome::Completed(o) => {
                assert_eq!(o.success_count, 2);
                assert_eq!(o.failure_count, 1);
                assert_eq!(o.failed_token_list(), vec!["t3"]);
            }
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_handle_change_matches_watched_path() {
        let gw = Arc::new(RecordingGateway::default());
        let svc = service(scenario_store(), gw.clone());

        let ignored = svc
            .handle_change("users/u1/name", FieldValue::Absent, FieldValue::Bool(true))
            .await;
        assert_eq!(ignored, EventOutcome::Discarded(DiscardReason::IgnorableTransition));
        assert!(gw.sent.lock().await.is_empty());

        let done = svc
            .handle_change("users/u1/shareWith", FieldValue::Bool(false), FieldValue::Bool(true))
            .await;
        assert!(done.is_completed());
        assert_eq!(gw.sent.lock().await[0].data["userId"], "u1");
    }

    #[tokio::test]
    async fn test_subject_id_identity_not_equal_to_token_owner() {
        let gw = Arc::new(RecordingGateway::default());
        let svc = service(scenario_store(), gw.clone());

        svc.handle_event(&AvailabilityEvent::new("u2", false, true))
            .await;
        let sent = gw.sent.lock().await;
        assert_eq!(sent[0].tokens, vec!["t1"]);
        assert!(!sent[0].tokens.contains(&"t2".to_string()));
        assert_eq!(UserId::from("u2").as_str(), sent[0].data["userId"]);
    }
}
