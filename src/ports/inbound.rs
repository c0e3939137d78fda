//! Inbound port. The change-feed adapter calls into the application.

use crate::domain::DomainError;

/// Change feed: delivers writes of the watched field to the availability use case.
#[async_trait::async_trait]
pub trait ChangeFeedPort: Send + Sync {
    /// Consume change records until the feed ends. Each record is processed to
    /// completion before the next one is read.
    ///
    /// Only feed-level failures (the source itself breaking) are returned;
    /// per-event failures are logged and swallowed by the use case.
    async fn run(&self) -> Result<(), DomainError>;
}
