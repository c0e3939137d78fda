//! Profile store adapters.

pub mod json_store;
pub mod memory_store;

pub use json_store::JsonProfileStore;
pub use memory_store::InMemoryProfileStore;
