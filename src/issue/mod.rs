//! Issue domain types
//!
//! The issue record itself plus the id wrapper and the input types derived
//! from raw request fields.

mod ids;
mod record;

pub use ids::{IssueId, ParseIdError};
pub use record::{non_empty, Issue, IssueDraft, IssueFilter, IssueUpdate};
