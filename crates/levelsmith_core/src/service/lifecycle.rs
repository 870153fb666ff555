//! Token-taking facade over the draft, publication and catalog services.
//!
//! # Responsibility
//! - Resolve the caller token through the identity gate before any storage
//!   access.
//! - Open repositories on the shared connection per call and delegate.
//! - Verify the schema once per facade, on the first storage access.
//!
//! # Invariants
//! - No draft or published state is cached between calls; SQLite is the
//!   only shared state, so several facades (threads or processes, one
//!   connection each) may run against one database file.

use super::catalog_service::CatalogService;
use super::draft_service::DraftService;
use super::publication_service::PublicationService;
use crate::error::LevelResult;
use crate::identity::{Caller, IdentityGate};
use crate::model::ids::{DraftId, PublishedLevelId};
use crate::model::level::{Draft, DraftSummary, LevelName, LevelPayload, PublishedLevel};
use crate::names::{NameAllocator, WordSource};
use crate::repo::catalog_repo::SqliteCatalogRepository;
use crate::repo::ensure_lifecycle_ready;
use crate::repo::draft_repo::SqliteDraftRepository;
use crate::repo::publication_repo::SqlitePublicationRepository;
use once_cell::unsync::OnceCell;
use rusqlite::Connection;
use serde::Serialize;

/// Reply for `create_draft`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedDraft {
    pub draft_id: DraftId,
    pub name: LevelName,
}

impl From<Draft> for CreatedDraft {
    fn from(draft: Draft) -> Self {
        Self {
            draft_id: draft.id,
            name: draft.name,
        }
    }
}

/// Level lifecycle entry points keyed by caller token.
pub struct LevelLifecycle<'conn, G, W> {
    conn: &'conn Connection,
    gate: G,
    allocator: NameAllocator<W>,
    schema_checked: OnceCell<()>,
}

impl<'conn, G: IdentityGate, W: WordSource> LevelLifecycle<'conn, G, W> {
    pub fn new(conn: &'conn Connection, gate: G, allocator: NameAllocator<W>) -> Self {
        Self {
            conn,
            gate,
            allocator,
            schema_checked: OnceCell::new(),
        }
    }

    pub fn create_draft(&self, token: &str) -> LevelResult<CreatedDraft> {
        let caller = self.caller(token)?;
        self.drafts()?
            .create_draft(&caller, &self.allocator)
            .map(CreatedDraft::from)
    }

    pub fn list_drafts(&self, token: &str) -> LevelResult<Vec<DraftSummary>> {
        let caller = self.caller(token)?;
        self.drafts()?.list_drafts(&caller)
    }

    pub fn get_draft(&self, token: &str, draft_id: DraftId) -> LevelResult<Draft> {
        let caller = self.caller(token)?;
        self.drafts()?.get_draft(&caller, draft_id)
    }

    pub fn get_draft_content(&self, token: &str, draft_id: DraftId) -> LevelResult<LevelPayload> {
        let caller = self.caller(token)?;
        self.drafts()?.get_content(&caller, draft_id)
    }

    pub fn set_draft_content(
        &self,
        token: &str,
        draft_id: DraftId,
        content: &LevelPayload,
    ) -> LevelResult<()> {
        let caller = self.caller(token)?;
        self.drafts()?.set_content(&caller, draft_id, content)
    }

    pub fn rename_draft(&self, token: &str, draft_id: DraftId, name: &str) -> LevelResult<()> {
        let caller = self.caller(token)?;
        self.drafts()?.rename(&caller, draft_id, name).map(|_| ())
    }

    pub fn delete_draft(&self, token: &str, draft_id: DraftId) -> LevelResult<()> {
        let caller = self.caller(token)?;
        self.drafts()?.delete(&caller, draft_id)
    }

    pub fn publish(&self, token: &str, draft_id: DraftId) -> LevelResult<PublishedLevelId> {
        let caller = self.caller(token)?;
        self.publication()?
            .publish(&caller, draft_id)
            .map(|level| level.id)
    }

    pub fn update_published(&self, token: &str, draft_id: DraftId) -> LevelResult<()> {
        let caller = self.caller(token)?;
        self.publication()?
            .update_published(&caller, draft_id)
            .map(|_| ())
    }

    pub fn unpublish(&self, token: &str, draft_id: DraftId) -> LevelResult<()> {
        let caller = self.caller(token)?;
        self.publication()?.unpublish(&caller, draft_id).map(|_| ())
    }

    /// Public catalog read; no token needed.
    pub fn get_published(&self, published_id: PublishedLevelId) -> LevelResult<PublishedLevel> {
        self.catalog()?.get_published(published_id)
    }

    pub fn get_published_content(
        &self,
        published_id: PublishedLevelId,
    ) -> LevelResult<LevelPayload> {
        self.get_published(published_id).map(|level| level.content)
    }

    /// Levels the caller has published, newest first.
    pub fn list_my_published(&self, token: &str) -> LevelResult<Vec<PublishedLevel>> {
        let caller = self.caller(token)?;
        self.catalog()?.list_by_publisher(caller.user_id())
    }

    fn caller(&self, token: &str) -> LevelResult<Caller> {
        Caller::resolve(&self.gate, token)
    }

    fn ready_conn(&self) -> LevelResult<&'conn Connection> {
        self.schema_checked
            .get_or_try_init(|| ensure_lifecycle_ready(self.conn))?;
        Ok(self.conn)
    }

    fn drafts(&self) -> LevelResult<DraftService<SqliteDraftRepository<'conn>>> {
        let conn = self.ready_conn()?;
        Ok(DraftService::new(SqliteDraftRepository::from_ready(conn)))
    }

    fn publication(&self) -> LevelResult<PublicationService<SqlitePublicationRepository<'conn>>> {
        let conn = self.ready_conn()?;
        Ok(PublicationService::new(
            SqlitePublicationRepository::from_ready(conn),
        ))
    }

    fn catalog(&self) -> LevelResult<CatalogService<SqliteCatalogRepository<'conn>>> {
        let conn = self.ready_conn()?;
        Ok(CatalogService::new(SqliteCatalogRepository::from_ready(conn)))
    }
}
