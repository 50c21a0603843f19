//! Issue store service
//!
//! Implements the create/query/update/delete semantics on top of the
//! store: required-field checks, the present-and-non-empty update rule,
//! and the exact outcome shapes of the wire contract. Every domain outcome
//! is an ordinary value here; infrastructure failures surface as errors.

use crate::issue::{Issue, IssueDraft, IssueFilter, IssueId, IssueUpdate};
use crate::store::IssueStore;
use crate::Result;
use serde_json::{json, Value};

/// The issue store service
pub struct IssueService {
    store: IssueStore,
}

/// Outcome of a create request
#[derive(Debug)]
pub enum CreateOutcome {
    /// The full persisted record
    Created(Issue),
    /// A required field was absent or empty; nothing was persisted
    MissingRequired,
}

/// Outcome of an update request
///
/// Variants are ordered the way the checks run: missing id, then empty
/// update set, then malformed id, then lookup.
#[derive(Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated { id: String },
    MissingId,
    NoUpdateFields { id: String },
    InvalidId { id: String },
    NotFound { id: String },
}

/// Outcome of a delete request
#[derive(Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { id: String },
    MissingId,
    InvalidId { id: String },
    NotFound { id: String },
}

impl IssueService {
    /// Create a service over an open store
    pub fn new(store: IssueStore) -> Self {
        Self { store }
    }

    /// Create an issue in the project's collection
    ///
    /// `draft` is `None` when a required field was absent or empty; the
    /// collection is only created (lazily) when the draft is valid.
    pub fn create(&mut self, project: &str, draft: Option<IssueDraft>) -> Result<CreateOutcome> {
        let Some(draft) = draft else {
            return Ok(CreateOutcome::MissingRequired);
        };

        let issue = Issue::create(draft);
        self.store.insert(project, &issue)?;
        Ok(CreateOutcome::Created(issue))
    }

    /// Return the project's issues matching all supplied filters
    ///
    /// Storage failures on the read path are logged and reported as an
    /// empty result; there is no user-visible distinction from a project
    /// with zero issues.
    pub fn query(&self, project: &str, filter: &IssueFilter) -> Vec<Issue> {
        match self.store.query(project, filter) {
            Ok(issues) => issues,
            Err(e) => {
                tracing::error!(project = project, error = %e, "Query failed");
                Vec::new()
            }
        }
    }

    /// Apply a partial update to one issue
    pub fn update(
        &self,
        project: &str,
        id: Option<String>,
        update: IssueUpdate,
    ) -> Result<UpdateOutcome> {
        let Some(raw_id) = crate::issue::non_empty(id) else {
            return Ok(UpdateOutcome::MissingId);
        };
        if update.is_empty() {
            return Ok(UpdateOutcome::NoUpdateFields { id: raw_id });
        }
        let Ok(parsed) = IssueId::parse(&raw_id) else {
            return Ok(UpdateOutcome::InvalidId { id: raw_id });
        };

        if self.store.update(project, &parsed, &update)? {
            Ok(UpdateOutcome::Updated { id: raw_id })
        } else {
            Ok(UpdateOutcome::NotFound { id: raw_id })
        }
    }

    /// Remove one issue
    pub fn delete(&self, project: &str, id: Option<String>) -> Result<DeleteOutcome> {
        let Some(raw_id) = crate::issue::non_empty(id) else {
            return Ok(DeleteOutcome::MissingId);
        };
        let Ok(parsed) = IssueId::parse(&raw_id) else {
            return Ok(DeleteOutcome::InvalidId { id: raw_id });
        };

        if self.store.delete(project, &parsed)? {
            Ok(DeleteOutcome::Deleted { id: raw_id })
        } else {
            Ok(DeleteOutcome::NotFound { id: raw_id })
        }
    }
}

impl CreateOutcome {
    /// Wire shape of the outcome
    pub fn to_json(&self) -> Value {
        match self {
            Self::Created(issue) => json!(issue),
            Self::MissingRequired => json!({ "error": "required field(s) missing" }),
        }
    }
}

impl UpdateOutcome {
    /// Wire shape of the outcome; updated fields are never echoed
    pub fn to_json(&self) -> Value {
        match self {
            Self::Updated { id } => json!({ "result": "successfully updated", "_id": id }),
            Self::MissingId => json!({ "error": "missing _id" }),
            Self::NoUpdateFields { id } => json!({ "error": "no update field(s) sent", "_id": id }),
            Self::InvalidId { id } => json!({ "error": "invalid _id", "_id": id }),
            Self::NotFound { id } => json!({ "error": "could not update", "_id": id }),
        }
    }
}

impl DeleteOutcome {
    /// Wire shape of the outcome
    pub fn to_json(&self) -> Value {
        match self {
            Self::Deleted { id } => json!({ "result": "successfully deleted", "_id": id }),
            Self::MissingId => json!({ "error": "missing _id" }),
            Self::InvalidId { id } => json!({ "error": "invalid _id", "_id": id }),
            Self::NotFound { id } => json!({ "error": "could not delete", "_id": id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> IssueService {
        IssueService::new(IssueStore::open_in_memory().unwrap())
    }

    fn full_draft() -> Option<IssueDraft> {
        IssueDraft::from_fields(
            Some("Title".into()),
            Some("Text".into()),
            Some("alice".into()),
            Some("bob".into()),
            Some("new".into()),
        )
    }

    #[test]
    fn test_create_returns_full_record() {
        let mut svc = service();
        let outcome = svc.create("p", full_draft()).unwrap();

        match outcome {
            CreateOutcome::Created(issue) => {
                assert!(issue.open);
                assert_eq!(issue.issue_title, "Title");
                assert_eq!(issue.created_on, issue.updated_on);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(svc.query("p", &IssueFilter::default()).len(), 1);
    }

    #[test]
    fn test_create_missing_required_persists_nothing() {
        let mut svc = service();
        let outcome = svc.create("p", None).unwrap();

        assert_eq!(
            outcome.to_json(),
            json!({ "error": "required field(s) missing" })
        );
        assert!(svc.query("p", &IssueFilter::default()).is_empty());
    }

    #[test]
    fn test_update_check_ordering() {
        let svc = service();

        // Missing id beats everything
        let outcome = svc.update("p", None, IssueUpdate::default()).unwrap();
        assert_eq!(outcome, UpdateOutcome::MissingId);
        let outcome = svc.update("p", Some("".into()), IssueUpdate::default()).unwrap();
        assert_eq!(outcome, UpdateOutcome::MissingId);

        // No update fields is reported before the id is even parsed
        let outcome = svc
            .update("p", Some("garbage".into()), IssueUpdate::default())
            .unwrap();
        assert_eq!(
            outcome,
            UpdateOutcome::NoUpdateFields { id: "garbage".into() }
        );

        // Malformed id with fields present
        let update = IssueUpdate {
            issue_title: Some("x".into()),
            ..Default::default()
        };
        let outcome = svc.update("p", Some("garbage".into()), update.clone()).unwrap();
        assert_eq!(outcome, UpdateOutcome::InvalidId { id: "garbage".into() });

        // Well-formed but absent
        let absent = IssueId::generate().to_string();
        let outcome = svc.update("p", Some(absent.clone()), update).unwrap();
        assert_eq!(outcome, UpdateOutcome::NotFound { id: absent });
    }

    #[test]
    fn test_update_success_shape() {
        let mut svc = service();
        let CreateOutcome::Created(issue) = svc.create("p", full_draft()).unwrap() else {
            panic!("create failed");
        };

        let update = IssueUpdate {
            status_text: Some("closed out".into()),
            ..Default::default()
        };
        let outcome = svc.update("p", Some(issue.id.to_string()), update).unwrap();
        assert_eq!(
            outcome.to_json(),
            json!({ "result": "successfully updated", "_id": issue.id.to_string() })
        );

        // Only the supplied field changed
        let issues = svc.query("p", &IssueFilter::default());
        assert_eq!(issues[0].status_text, "closed out");
        assert_eq!(issues[0].issue_title, "Title");
    }

    #[test]
    fn test_delete_idempotence() {
        let mut svc = service();
        let CreateOutcome::Created(issue) = svc.create("p", full_draft()).unwrap() else {
            panic!("create failed");
        };
        let id = issue.id.to_string();

        let outcome = svc.delete("p", Some(id.clone())).unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted { id: id.clone() });

        let outcome = svc.delete("p", Some(id.clone())).unwrap();
        assert_eq!(outcome, DeleteOutcome::NotFound { id });
    }

    #[test]
    fn test_delete_missing_and_invalid_id() {
        let svc = service();

        assert_eq!(svc.delete("p", None).unwrap(), DeleteOutcome::MissingId);
        assert_eq!(
            svc.delete("p", Some("nope".into())).unwrap(),
            DeleteOutcome::InvalidId { id: "nope".into() }
        );
    }
}
