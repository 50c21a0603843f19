//! SQLite-backed issue store
//!
//! One table per project, created lazily on first write through the
//! [`CollectionRegistry`]. Reads and single-record mutations against a
//! project that was never written to operate on an effectively empty
//! collection instead of failing.

use super::registry::CollectionRegistry;
use crate::issue::{Issue, IssueFilter, IssueId, IssueUpdate};
use crate::Result;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params_from_iter, Connection, Row};
use std::path::Path;

const ISSUE_COLUMNS: &str =
    "id, issue_title, issue_text, created_by, assigned_to, status_text, created_on, updated_on, open";

/// Document store for issues, partitioned by project key
pub struct IssueStore {
    conn: Connection,
    registry: CollectionRegistry,
}

impl IssueStore {
    /// Open or create the store database
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        tracing::info!(path = %path.display(), "Opening issue database");

        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::with_connection(conn)
    }

    /// Open an in-memory store (tests)
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let registry = CollectionRegistry::load(&conn)?;
        Ok(Self { conn, registry })
    }

    /// Persist a new issue, creating the project's collection if this is
    /// the first write to that project key
    pub fn insert(&mut self, project: &str, issue: &Issue) -> Result<()> {
        let table = self.registry.get_or_create(&self.conn, project)?;

        self.conn.execute(
            &format!(
                r#"INSERT INTO "{table}" ({ISSUE_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#
            ),
            rusqlite::params![
                issue.id.to_string(),
                &issue.issue_title,
                &issue.issue_text,
                &issue.created_by,
                &issue.assigned_to,
                &issue.status_text,
                issue.created_on.to_rfc3339(),
                issue.updated_on.to_rfc3339(),
                issue.open as i64,
            ],
        )?;

        tracing::debug!(project = project, id = %issue.id, "Inserted issue");
        Ok(())
    }

    /// Return every issue in the project matching the conjunction of the
    /// supplied filters, in storage (insertion) order
    ///
    /// An unknown project and a malformed `_id` filter both cleanly match
    /// nothing.
    pub fn query(&self, project: &str, filter: &IssueFilter) -> Result<Vec<Issue>> {
        let Some(table) = self.registry.resolve(project) else {
            return Ok(Vec::new());
        };

        let mut conditions: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(raw) = &filter.id {
            match IssueId::parse(raw) {
                Ok(id) => {
                    conditions.push("id = ?");
                    values.push(id.to_string());
                }
                Err(_) => {
                    tracing::debug!(project = project, id = raw, "Malformed id filter");
                    return Ok(Vec::new());
                }
            }
        }
        // Filter values always travel as bound parameters
        for (clause, value) in [
            ("issue_title = ?", &filter.issue_title),
            ("issue_text = ?", &filter.issue_text),
            ("created_by = ?", &filter.created_by),
            ("assigned_to = ?", &filter.assigned_to),
            ("status_text = ?", &filter.status_text),
        ] {
            if let Some(value) = value {
                conditions.push(clause);
                values.push(value.clone());
            }
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            r#"SELECT {ISSUE_COLUMNS} FROM "{table}"{where_clause} ORDER BY rowid"#
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), row_to_issue)?;

        let mut issues = Vec::new();
        for row in rows {
            issues.push(row?);
        }
        Ok(issues)
    }

    /// Apply a partial update to the issue with the given id
    ///
    /// Sets `updated_on` to now plus every field carried by `update` in a
    /// single statement. Returns false when no record matched (including an
    /// unknown project).
    pub fn update(&self, project: &str, id: &IssueId, update: &IssueUpdate) -> Result<bool> {
        let Some(table) = self.registry.resolve(project) else {
            return Ok(false);
        };

        let mut assignments = vec!["updated_on = ?"];
        let mut values = vec![Utc::now().to_rfc3339()];

        for (clause, value) in [
            ("issue_title = ?", &update.issue_title),
            ("issue_text = ?", &update.issue_text),
            ("created_by = ?", &update.created_by),
            ("assigned_to = ?", &update.assigned_to),
            ("status_text = ?", &update.status_text),
        ] {
            if let Some(value) = value {
                assignments.push(clause);
                values.push(value.clone());
            }
        }
        values.push(id.to_string());

        let sql = format!(
            r#"UPDATE "{table}" SET {} WHERE id = ?"#,
            assignments.join(", ")
        );
        let changed = self.conn.execute(&sql, params_from_iter(values.iter()))?;

        tracing::debug!(project = project, id = %id, changed = changed, "Updated issue");
        Ok(changed > 0)
    }

    /// Remove the issue with the given id
    ///
    /// Returns false when no record matched (including an unknown project).
    pub fn delete(&self, project: &str, id: &IssueId) -> Result<bool> {
        let Some(table) = self.registry.resolve(project) else {
            return Ok(false);
        };

        let changed = self.conn.execute(
            &format!(r#"DELETE FROM "{table}" WHERE id = ?"#),
            [id.to_string()],
        )?;

        tracing::debug!(project = project, id = %id, changed = changed, "Deleted issue");
        Ok(changed > 0)
    }
}

fn row_to_issue(row: &Row<'_>) -> rusqlite::Result<Issue> {
    let id: String = row.get(0)?;
    let created_on: String = row.get(6)?;
    let updated_on: String = row.get(7)?;

    Ok(Issue {
        id: IssueId::parse(&id)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?,
        issue_title: row.get(1)?,
        issue_text: row.get(2)?,
        created_by: row.get(3)?,
        assigned_to: row.get(4)?,
        status_text: row.get(5)?,
        created_on: parse_timestamp(6, &created_on)?,
        updated_on: parse_timestamp(7, &updated_on)?,
        open: row.get::<_, i64>(8)? != 0,
    })
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
