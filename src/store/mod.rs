//! Storage layer
//!
//! SQLite-backed document store with one lazily created table per project,
//! tracked by a persistent collection registry.

mod registry;
mod sqlite;

pub use registry::{table_name, CollectionRegistry};
pub use sqlite::IssueStore;
