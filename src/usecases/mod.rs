//! Application use cases. Orchestrate domain logic via ports.

pub mod availability_service;
pub mod notification_dispatcher;
pub mod recipient_resolver;

pub use availability_service::AvailabilityService;
pub use notification_dispatcher::{
    NotificationDispatcher, NotificationTemplate, partition_responses,
};
pub use recipient_resolver::RecipientResolver;
