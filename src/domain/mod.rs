//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod field_path;
pub mod transition;

pub use entities::{
    AvailabilityEvent, DATA_USER_ID_KEY, DeliveryOutcome, DiscardReason, EventOutcome,
    FALLBACK_DISPLAY_NAME, FailedDelivery, FieldValue, NotificationPayload, Recipients,
    SendResponse, UserId, UserProfile,
};
pub use errors::DomainError;
pub use field_path::{DEFAULT_WATCHED_PATH, FieldPath};
pub use transition::is_qualifying_transition;
