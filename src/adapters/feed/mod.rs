//! Change feed adapters. Implement ChangeFeedPort.

pub mod json_lines;

pub use json_lines::{ChangeRecord, FeedStats, JsonLinesFeed};
