//! Tracklet - Minimal per-project issue tracking REST API
//!
//! Tracklet exposes create, read, update, and delete operations for issue
//! records scoped to a named project, backed by SQLite. A project's
//! collection is materialized lazily on its first write and reused
//! thereafter.
//!
//! # Architecture
//!
//! - **issue**: Core data structures (Issue, IssueId, draft/update/filter)
//! - **store**: SQLite document store with the per-project collection registry
//! - **service**: CRUD semantics and wire-shape outcomes
//! - **server**: axum HTTP surface under `/api/issues/{project}`
//! - **config**: YAML configuration

pub mod config;
pub mod error;
pub mod issue;
pub mod logging;
pub mod server;
pub mod service;
pub mod store;

// Re-exports
pub use error::{Result, TrackletError};
