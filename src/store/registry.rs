//! Per-project collection registry
//!
//! Maps a project key to the SQLite table backing its issues. Collections
//! are created lazily on first write and recorded in a `collections` meta
//! table so the mapping survives restarts. Resolution for reads never
//! creates anything; an unknown project simply resolves to `None`.

use crate::Result;
use rusqlite::{params, Connection};
use std::collections::HashMap;

/// Registry of project key -> backing table name
///
/// All mutation happens through an exclusive borrow of the owning store, so
/// two concurrent first-writes to the same new project cannot race on
/// registration.
#[derive(Debug)]
pub struct CollectionRegistry {
    tables: HashMap<String, String>,
}

impl CollectionRegistry {
    /// Load the registry from the database, creating the meta table if needed
    pub fn load(conn: &Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS collections (
                project TEXT PRIMARY KEY,
                table_name TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )?;

        let mut tables = HashMap::new();
        let mut stmt = conn.prepare("SELECT project, table_name FROM collections")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        for row in rows {
            let (project, table) = row?;
            tables.insert(project, table);
        }

        tracing::debug!(collections = tables.len(), "Loaded collection registry");
        Ok(Self { tables })
    }

    /// Resolve the table backing a project, if one has been created
    pub fn resolve(&self, project: &str) -> Option<&str> {
        self.tables.get(project).map(String::as_str)
    }

    /// Resolve the table backing a project, creating it on first write
    pub fn get_or_create(&mut self, conn: &Connection, project: &str) -> Result<String> {
        if let Some(table) = self.tables.get(project) {
            return Ok(table.clone());
        }

        let table = table_name(project);
        conn.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS "{table}" (
                id TEXT PRIMARY KEY,
                issue_title TEXT NOT NULL,
                issue_text TEXT NOT NULL,
                created_by TEXT NOT NULL,
                assigned_to TEXT NOT NULL DEFAULT '',
                status_text TEXT NOT NULL DEFAULT '',
                created_on TEXT NOT NULL,
                updated_on TEXT NOT NULL,
                open INTEGER NOT NULL DEFAULT 1
            );
            "#
        ))?;
        conn.execute(
            "INSERT OR IGNORE INTO collections (project, table_name, created_at) VALUES (?, ?, ?)",
            params![project, &table, chrono::Utc::now().to_rfc3339()],
        )?;

        tracing::info!(project = project, table = %table, "Created collection");
        self.tables.insert(project.to_string(), table.clone());
        Ok(table)
    }
}

/// Derive a table name from a project key
///
/// Lowercase ASCII alphanumerics pass through; every other byte is
/// hex-escaped as `_xx`. Uppercase bytes are escaped too because SQLite
/// compares table identifiers case-insensitively even when quoted, so
/// `"Alpha"` and `"alpha"` must not map to names that differ only in case.
/// The encoding is injective at the SQLite level, so distinct project keys
/// can never share a table, and the result is always a valid (quoted)
/// identifier.
pub fn table_name(project: &str) -> String {
    let mut name = String::with_capacity(project.len() + 7);
    name.push_str("issues_");
    for byte in project.bytes() {
        if byte.is_ascii_lowercase() || byte.is_ascii_digit() {
            name.push(byte as char);
        } else {
            name.push_str(&format!("_{:02x}", byte));
        }
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_conn() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    #[test]
    fn test_table_name_passthrough() {
        assert_eq!(table_name("apitest"), "issues_apitest");
        assert_eq!(table_name("project1"), "issues_project1");
    }

    #[test]
    fn test_table_name_escapes_non_lowercase() {
        assert_eq!(table_name("my-project"), "issues_my_2dproject");
        assert_eq!(table_name("a_b"), "issues_a_5fb");
        // Uppercase is escaped; SQLite identifiers are case-insensitive
        assert_eq!(table_name("Alpha"), "issues__41lpha");
    }

    #[test]
    fn test_table_name_is_injective() {
        // "a_62" must not collide with "ab"
        assert_ne!(table_name("a_62"), table_name("ab"));
    }

    #[test]
    fn test_case_distinct_keys_get_case_distinct_free_names() {
        // The encodings must differ in more than letter case, since SQLite
        // matches "t_A" and "t_a" as the same table
        let upper = table_name("A");
        let lower = table_name("a");
        assert_ne!(upper.to_ascii_lowercase(), lower.to_ascii_lowercase());
    }

    #[test]
    fn test_resolve_does_not_create() {
        let conn = test_conn();
        let registry = CollectionRegistry::load(&conn).unwrap();
        assert!(registry.resolve("ghost").is_none());
    }

    #[test]
    fn test_get_or_create_registers_once() {
        let conn = test_conn();
        let mut registry = CollectionRegistry::load(&conn).unwrap();

        let first = registry.get_or_create(&conn, "apitest").unwrap();
        let second = registry.get_or_create(&conn, "apitest").unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.resolve("apitest"), Some(first.as_str()));

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM collections", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_registry_survives_reload() {
        let conn = test_conn();
        {
            let mut registry = CollectionRegistry::load(&conn).unwrap();
            registry.get_or_create(&conn, "persisted").unwrap();
        }

        let registry = CollectionRegistry::load(&conn).unwrap();
        assert!(registry.resolve("persisted").is_some());
    }
}
