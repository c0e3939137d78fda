//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Profile store error: {0}")]
    ProfileStore(String),

    /// The multicast call itself failed. Per-token failures are reported in `SendResponse` instead.
    #[error("Push transport error: {0}")]
    Push(String),

    #[error("Change feed error: {0}")]
    Feed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
