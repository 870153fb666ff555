//! Connection readiness checks shared by repository constructors.

use super::{RepoError, RepoResult};
use crate::db::migrations::latest_version;
use rusqlite::Connection;

pub(super) const USERS_COLUMNS: &[&str] = &["id", "username", "icon"];
pub(super) const DRAFTS_COLUMNS: &[&str] = &[
    "id",
    "owner",
    "name",
    "content",
    "published_id",
    "created_at",
    "updated_at",
];
pub(super) const PUBLISHED_COLUMNS: &[&str] = &[
    "id",
    "name",
    "publisher",
    "content",
    "published_at",
    "updated_at",
];

/// Tables the lifecycle facade reads and writes.
pub(super) const LIFECYCLE_TABLES: &[(&str, &[&str])] = &[
    ("drafts", DRAFTS_COLUMNS),
    ("published_levels", PUBLISHED_COLUMNS),
];

/// Verifies the connection is migrated and carries the given tables/columns.
pub(super) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[(&'static str, &[&'static str])],
) -> RepoResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in tables {
        let present = table_columns(conn, table)?;
        if present.is_empty() {
            return Err(RepoError::MissingRequiredTable(table));
        }
        if let Some(&column) = columns
            .iter()
            .find(|column| !present.iter().any(|name| name.as_str() == **column))
        {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

/// Column names of `table`; empty when the table does not exist.
fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();
    while let Some(row) = rows.next()? {
        columns.push(row.get(1)?);
    }
    Ok(columns)
}
