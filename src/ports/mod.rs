//! Port traits. API boundaries for the hexagon.
//!
//! - Inbound: Called by the change-feed adapter into the application
//! - Outbound: Called by application into infrastructure

pub mod inbound;
pub mod outbound;

pub use inbound::ChangeFeedPort;
pub use outbound::{ProfileStore, PushGateway};
