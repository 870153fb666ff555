//! Draft repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide owner-scoped CRUD over the `drafts` table.
//! - Reserve a draft name with one guarded insert and report a clash as
//!   `NameTaken` so callers can retry name allocation.
//!
//! # Invariants
//! - Every statement filters on `owner`; there is no unscoped draft access.
//! - Mutations are single-statement; `published_id` is never written here.
//! - Names are unique per owner at creation only. The insert checks and
//!   writes in one statement under SQLite's write lock; rename does not
//!   check at all.
//! - Deleting a draft leaves its published level in place.

use super::readiness::{ensure_connection_ready, DRAFTS_COLUMNS};
use super::{parse_stored_id, parse_stored_name, parse_stored_payload, RepoError, RepoResult};
use crate::model::ids::{DraftId, PublishedLevelId, UserId};
use crate::model::level::{Draft, DraftSummary, LevelName, LevelPayload};
use rusqlite::{params, Connection, OptionalExtension, Row};

const DRAFT_SELECT_SQL: &str = "SELECT
    id,
    owner,
    name,
    content,
    published_id,
    created_at,
    updated_at
FROM drafts";

/// Insert request for one draft.
#[derive(Debug, Clone)]
pub struct NewDraft {
    pub id: DraftId,
    pub owner: UserId,
    pub name: LevelName,
    pub content: LevelPayload,
}

/// Repository interface for owner-scoped draft operations.
pub trait DraftRepository {
    /// Inserts a draft; a name already used by the same owner yields
    /// `RepoError::NameTaken` and writes nothing.
    fn insert_draft(&self, draft: &NewDraft) -> RepoResult<Draft>;
    fn get_draft(&self, owner: UserId, id: DraftId) -> RepoResult<Option<Draft>>;
    fn list_drafts(&self, owner: UserId) -> RepoResult<Vec<DraftSummary>>;
    /// Replaces the whole payload.
    fn set_content(&self, owner: UserId, id: DraftId, content: &LevelPayload) -> RepoResult<()>;
    /// Renames without a uniqueness check; siblings may end up sharing a name.
    fn rename(&self, owner: UserId, id: DraftId, name: &LevelName) -> RepoResult<()>;
    fn delete(&self, owner: UserId, id: DraftId) -> RepoResult<()>;
}

/// SQLite-backed draft repository.
pub struct SqliteDraftRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDraftRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[("drafts", DRAFTS_COLUMNS)])?;
        Ok(Self { conn })
    }

    /// Skips the readiness check; `conn` must have passed
    /// `ensure_lifecycle_ready`.
    pub(crate) fn from_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl DraftRepository for SqliteDraftRepository<'_> {
    fn insert_draft(&self, draft: &NewDraft) -> RepoResult<Draft> {
        let (created_at, updated_at) = self
            .conn
            .query_row(
                "INSERT INTO drafts (id, owner, name, content)
                 SELECT ?1, ?2, ?3, ?4
                 WHERE NOT EXISTS (
                    SELECT 1
                    FROM drafts
                    WHERE owner = ?2
                      AND name = ?3
                 )
                 RETURNING created_at, updated_at;",
                params![
                    draft.id.to_string(),
                    draft.owner.to_string(),
                    draft.name.as_str(),
                    draft.content.to_json(),
                ],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?
            .ok_or(RepoError::NameTaken { owner: draft.owner })?;
        Ok(Draft {
            id: draft.id,
            owner: draft.owner,
            name: draft.name.clone(),
            content: draft.content.clone(),
            published_id: None,
            created_at,
            updated_at,
        })
    }

    fn get_draft(&self, owner: UserId, id: DraftId) -> RepoResult<Option<Draft>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DRAFT_SELECT_SQL}
             WHERE id = ?1
               AND owner = ?2;"
        ))?;

        let mut rows = stmt.query(params![id.to_string(), owner.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_draft_row(row)?));
        }

        Ok(None)
    }

    fn list_drafts(&self, owner: UserId) -> RepoResult<Vec<DraftSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, published_id
             FROM drafts
             WHERE owner = ?1
             ORDER BY created_at ASC, id ASC;",
        )?;
        let mut rows = stmt.query([owner.to_string()])?;
        let mut drafts = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get("id")?;
            let name: String = row.get("name")?;
            drafts.push(DraftSummary {
                id: parse_stored_id(&id, "drafts.id")?,
                name: parse_stored_name(&name, "drafts.name")?,
                published_id: parse_link(row)?,
            });
        }
        Ok(drafts)
    }

    fn set_content(&self, owner: UserId, id: DraftId, content: &LevelPayload) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE drafts
             SET
                content = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND owner = ?2;",
            params![id.to_string(), owner.to_string(), content.to_json()],
        )?;

        if changed == 0 {
            return Err(RepoError::DraftNotFound(id));
        }

        Ok(())
    }

    fn rename(&self, owner: UserId, id: DraftId, name: &LevelName) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE drafts
             SET
                name = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND owner = ?2;",
            params![id.to_string(), owner.to_string(), name.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::DraftNotFound(id));
        }

        Ok(())
    }

    fn delete(&self, owner: UserId, id: DraftId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM drafts
             WHERE id = ?1
               AND owner = ?2;",
            params![id.to_string(), owner.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::DraftNotFound(id));
        }

        Ok(())
    }
}

pub(crate) fn parse_draft_row(row: &Row<'_>) -> RepoResult<Draft> {
    let id: String = row.get("id")?;
    let owner: String = row.get("owner")?;
    let name: String = row.get("name")?;
    let content: String = row.get("content")?;

    Ok(Draft {
        id: parse_stored_id(&id, "drafts.id")?,
        owner: parse_stored_id(&owner, "drafts.owner")?,
        name: parse_stored_name(&name, "drafts.name")?,
        content: parse_stored_payload(&content, "drafts.content")?,
        published_id: parse_link(row)?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_link(row: &Row<'_>) -> RepoResult<Option<PublishedLevelId>> {
    match row.get::<_, Option<String>>("published_id")? {
        Some(value) => Ok(Some(parse_stored_id(&value, "drafts.published_id")?)),
        None => Ok(None),
    }
}
