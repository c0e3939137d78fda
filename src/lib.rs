//! availability-notifier: push a notification to everyone else when a user becomes available.
//! Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
