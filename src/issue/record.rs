//! Issue data structures
//!
//! Represents a single issue record plus the derived input types for the
//! create, query, and update operations. Serde renames match the wire
//! format of the service (`_id`, snake_case fields).

use super::IssueId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One trackable work item, scoped to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Unique identifier, assigned at creation, immutable
    #[serde(rename = "_id")]
    pub id: IssueId,

    /// Issue title (required at creation)
    pub issue_title: String,

    /// Issue description (required at creation)
    pub issue_text: String,

    /// Creator (required at creation)
    pub created_by: String,

    /// Assignee, defaults to the empty string
    pub assigned_to: String,

    /// Free-form status text, defaults to the empty string
    pub status_text: String,

    /// Creation timestamp, set once
    pub created_on: DateTime<Utc>,

    /// Last-update timestamp, refreshed on every successful update
    pub updated_on: DateTime<Utc>,

    /// Open flag; true at creation, never transitioned by this API
    pub open: bool,
}

impl Issue {
    /// Materialize a new issue from a validated draft
    ///
    /// Assigns a fresh id, sets `created_on == updated_on == now` and
    /// `open = true`.
    pub fn create(draft: IssueDraft) -> Self {
        let now = Utc::now();
        Self {
            id: IssueId::generate(),
            issue_title: draft.issue_title,
            issue_text: draft.issue_text,
            created_by: draft.created_by,
            assigned_to: draft.assigned_to,
            status_text: draft.status_text,
            created_on: now,
            updated_on: now,
            open: true,
        }
    }
}

/// Validated input for issue creation
///
/// Construction via [`IssueDraft::from_fields`] enforces the required
/// fields and applies the empty-string defaults for the optional ones.
#[derive(Debug, Clone)]
pub struct IssueDraft {
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
}

impl IssueDraft {
    /// Build a draft from raw request fields
    ///
    /// Returns `None` when any required field is absent or empty. Optional
    /// fields default to `""`.
    pub fn from_fields(
        issue_title: Option<String>,
        issue_text: Option<String>,
        created_by: Option<String>,
        assigned_to: Option<String>,
        status_text: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            issue_title: non_empty(issue_title)?,
            issue_text: non_empty(issue_text)?,
            created_by: non_empty(created_by)?,
            assigned_to: non_empty(assigned_to).unwrap_or_default(),
            status_text: non_empty(status_text).unwrap_or_default(),
        })
    }
}

/// Partial update set for an existing issue
///
/// Only fields that were present and non-empty in the request are carried;
/// everything else is left untouched by the update.
#[derive(Debug, Clone, Default)]
pub struct IssueUpdate {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
}

impl IssueUpdate {
    /// Build an update set from raw request fields, dropping absent and
    /// empty values
    pub fn from_fields(
        issue_title: Option<String>,
        issue_text: Option<String>,
        created_by: Option<String>,
        assigned_to: Option<String>,
        status_text: Option<String>,
    ) -> Self {
        Self {
            issue_title: non_empty(issue_title),
            issue_text: non_empty(issue_text),
            created_by: non_empty(created_by),
            assigned_to: non_empty(assigned_to),
            status_text: non_empty(status_text),
        }
    }

    /// True when no field survived normalization
    pub fn is_empty(&self) -> bool {
        self.issue_title.is_none()
            && self.issue_text.is_none()
            && self.created_by.is_none()
            && self.assigned_to.is_none()
            && self.status_text.is_none()
    }
}

/// Conjunctive exact-match filter for issue queries
///
/// Absent fields impose no constraint; an empty filter matches the whole
/// collection.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    pub id: Option<String>,
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
}

/// Normalize an optional field to "present and non-empty"
///
/// The original service treated every falsy value as "not supplied"; here
/// the rule is explicit: only a present, non-empty string counts.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
