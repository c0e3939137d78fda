//! Infrastructure adapters. Implement ports.
//!
//! Profile store, push transport, change feed. Map errors to DomainError.

pub mod feed;
pub mod persistence;
pub mod push;
