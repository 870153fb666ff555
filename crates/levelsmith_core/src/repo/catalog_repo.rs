//! Read access to the public catalog.
//!
//! # Responsibility
//! - Serve published-level reads used to observe publication effects.
//!
//! # Invariants
//! - This module never writes `published_levels`; only
//!   `publication_repo` creates, re-syncs or deletes catalog rows.

use super::readiness::{ensure_connection_ready, PUBLISHED_COLUMNS};
use super::{parse_stored_id, parse_stored_name, parse_stored_payload, RepoResult};
use crate::model::ids::{PublishedLevelId, UserId};
use crate::model::level::PublishedLevel;
use rusqlite::{Connection, Row};

pub(crate) const PUBLISHED_SELECT_SQL: &str = "SELECT
    id,
    name,
    publisher,
    content,
    published_at,
    updated_at
FROM published_levels";

pub trait CatalogRepository {
    fn get_published(&self, id: PublishedLevelId) -> RepoResult<Option<PublishedLevel>>;
    /// Newest first.
    fn list_by_publisher(&self, publisher: UserId) -> RepoResult<Vec<PublishedLevel>>;
}

pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("published_levels", PUBLISHED_COLUMNS)])?;
        Ok(Self { conn })
    }

    /// Skips the readiness check; `conn` must have passed
    /// `ensure_lifecycle_ready`.
    pub(crate) fn from_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn get_published(&self, id: PublishedLevelId) -> RepoResult<Option<PublishedLevel>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PUBLISHED_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_published_row(row)?));
        }
        Ok(None)
    }

    fn list_by_publisher(&self, publisher: UserId) -> RepoResult<Vec<PublishedLevel>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PUBLISHED_SELECT_SQL}
             WHERE publisher = ?1
             ORDER BY published_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([publisher.to_string()])?;
        let mut levels = Vec::new();
        while let Some(row) = rows.next()? {
            levels.push(parse_published_row(row)?);
        }
        Ok(levels)
    }
}

pub(crate) fn parse_published_row(row: &Row<'_>) -> RepoResult<PublishedLevel> {
    let id: String = row.get("id")?;
    let name: String = row.get("name")?;
    let publisher: String = row.get("publisher")?;
    let content: String = row.get("content")?;

    Ok(PublishedLevel {
        id: parse_stored_id(&id, "published_levels.id")?,
        name: parse_stored_name(&name, "published_levels.name")?,
        publisher: parse_stored_id(&publisher, "published_levels.publisher")?,
        content: parse_stored_payload(&content, "published_levels.content")?,
        published_at: row.get("published_at")?,
        updated_at: row.get("updated_at")?,
    })
}
