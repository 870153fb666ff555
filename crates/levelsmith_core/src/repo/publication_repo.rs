//! Publication state machine persistence.
//!
//! # Responsibility
//! - Move a draft between `Unpublished` and `Published` and re-sync its
//!   public copy, each as one atomic unit.
//!
//! # Invariants
//! - Every transition runs in a `BEGIN IMMEDIATE` transaction; the draft's
//!   link is read and checked inside it, so concurrent transitions on one
//!   draft serialize on the write lock and observe each other's result.
//! - A draft links to at most one published level and that level's
//!   publisher equals the draft's owner.
//! - Published content is a verbatim copy of the draft's stored text.
//! - Dropping an uncommitted transaction rolls back every statement in it.

use super::catalog_repo::parse_published_row;
use super::readiness::{ensure_connection_ready, DRAFTS_COLUMNS, PUBLISHED_COLUMNS};
use super::{parse_stored_id, RepoError, RepoResult};
use crate::model::ids::{DraftId, PublishedLevelId, UserId};
use crate::model::level::PublishedLevel;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

const RETURNING_PUBLISHED_SQL: &str =
    "RETURNING id, name, publisher, content, published_at, updated_at";

/// Repository interface for publish / re-sync / unpublish transitions.
pub trait PublicationRepository {
    /// `Unpublished -> Published`. Fails with `AlreadyPublished` when the
    /// draft already has a link.
    fn publish(&self, owner: UserId, draft_id: DraftId) -> RepoResult<PublishedLevel>;
    /// `Published -> Published`: copies the draft's current name and content
    /// over its published level. Fails with `NotPublished` without a link.
    fn resync(&self, owner: UserId, draft_id: DraftId) -> RepoResult<PublishedLevel>;
    /// `Published -> Unpublished`: deletes the published level and clears the
    /// link. Fails with `NotPublished` without a link.
    fn unpublish(&self, owner: UserId, draft_id: DraftId) -> RepoResult<PublishedLevelId>;
}

/// SQLite-backed publication repository.
pub struct SqlitePublicationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePublicationRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                ("drafts", DRAFTS_COLUMNS),
                ("published_levels", PUBLISHED_COLUMNS),
            ],
        )?;
        Ok(Self { conn })
    }

    /// Skips the readiness check; `conn` must have passed
    /// `ensure_lifecycle_ready`.
    pub(crate) fn from_ready(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn begin(&self) -> RepoResult<Transaction<'_>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl PublicationRepository for SqlitePublicationRepository<'_> {
    fn publish(&self, owner: UserId, draft_id: DraftId) -> RepoResult<PublishedLevel> {
        let tx = self.begin()?;
        let draft = load_draft_link(&tx, owner, draft_id)?;
        if let Some(published_id) = draft.published_id {
            return Err(RepoError::AlreadyPublished {
                draft_id,
                published_id,
            });
        }

        let published_id = PublishedLevelId::new();
        let level = tx.query_row(
            &format!(
                "INSERT INTO published_levels (id, name, publisher, content)
                 VALUES (?1, ?2, ?3, ?4)
                 {RETURNING_PUBLISHED_SQL};"
            ),
            params![
                published_id.to_string(),
                draft.name,
                owner.to_string(),
                draft.content,
            ],
            |row| Ok(parse_published_row(row)),
        )??;

        let linked = tx.execute(
            "UPDATE drafts
             SET
                published_id = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND owner = ?2
               AND published_id IS NULL;",
            params![
                draft_id.to_string(),
                owner.to_string(),
                published_id.to_string(),
            ],
        )?;
        if linked != 1 {
            return Err(RepoError::InvalidData(format!(
                "draft {draft_id} link changed inside publish transaction"
            )));
        }

        tx.commit()?;
        Ok(level)
    }

    fn resync(&self, owner: UserId, draft_id: DraftId) -> RepoResult<PublishedLevel> {
        let tx = self.begin()?;
        let draft = load_draft_link(&tx, owner, draft_id)?;
        let published_id = draft
            .published_id
            .ok_or(RepoError::NotPublished(draft_id))?;

        let level = tx
            .query_row(
                &format!(
                    "UPDATE published_levels
                     SET
                        name = ?3,
                        content = ?4,
                        updated_at = (strftime('%s', 'now') * 1000)
                     WHERE id = ?1
                       AND publisher = ?2
                     {RETURNING_PUBLISHED_SQL};"
                ),
                params![
                    published_id.to_string(),
                    owner.to_string(),
                    draft.name,
                    draft.content,
                ],
                |row| Ok(parse_published_row(row)),
            )
            .optional()?
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "draft {draft_id} links to {published_id}, which is missing or has another publisher"
                ))
            })??;

        tx.commit()?;
        Ok(level)
    }

    fn unpublish(&self, owner: UserId, draft_id: DraftId) -> RepoResult<PublishedLevelId> {
        let tx = self.begin()?;
        let draft = load_draft_link(&tx, owner, draft_id)?;
        let published_id = draft
            .published_id
            .ok_or(RepoError::NotPublished(draft_id))?;

        tx.execute(
            "UPDATE drafts
             SET
                published_id = NULL,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1
               AND owner = ?2;",
            params![draft_id.to_string(), owner.to_string()],
        )?;

        let deleted = tx.execute(
            "DELETE FROM published_levels
             WHERE id = ?1
               AND publisher = ?2;",
            params![published_id.to_string(), owner.to_string()],
        )?;
        if deleted == 0 {
            return Err(RepoError::InvalidData(format!(
                "draft {draft_id} links to {published_id}, which is missing or has another publisher"
            )));
        }

        tx.commit()?;
        Ok(published_id)
    }
}

/// Stored draft columns a transition needs, as raw text.
struct DraftLink {
    name: String,
    content: String,
    published_id: Option<PublishedLevelId>,
}

fn load_draft_link(
    tx: &Transaction<'_>,
    owner: UserId,
    draft_id: DraftId,
) -> RepoResult<DraftLink> {
    let row = tx
        .query_row(
            "SELECT name, content, published_id
             FROM drafts
             WHERE id = ?1
               AND owner = ?2;",
            params![draft_id.to_string(), owner.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>("name")?,
                    row.get::<_, String>("content")?,
                    row.get::<_, Option<String>>("published_id")?,
                ))
            },
        )
        .optional()?
        .ok_or(RepoError::DraftNotFound(draft_id))?;

    let (name, content, link) = row;
    let published_id = match link {
        Some(value) => Some(parse_stored_id(&value, "drafts.published_id")?),
        None => None,
    };

    Ok(DraftLink {
        name,
        content,
        published_id,
    })
}
