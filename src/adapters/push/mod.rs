//! Push transport adapters. Implement PushGateway.
//!
//! FCM for real delivery, a logging gateway for dry runs.

pub mod fcm_adapter;
pub mod log_adapter;

pub use fcm_adapter::FcmAdapter;
pub use log_adapter::LogPushGateway;
