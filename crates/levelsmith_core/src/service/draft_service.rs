//! Draft use-case service.
//!
//! # Responsibility
//! - Create drafts with an allocated collision-free name.
//! - Provide owner-only read, content replace, rename and delete.
//!
//! # Invariants
//! - Content updates are full replacement, last writer wins.
//! - Names are unique per owner when a draft is created. Rename is not
//!   checked and may reuse a sibling's name.
//! - Draft edits never touch the published copy.

use super::log_outcome;
use crate::error::{LevelError, LevelResult, NotFoundTarget};
use crate::identity::Caller;
use crate::model::ids::DraftId;
use crate::model::level::{Draft, DraftSummary, LevelName, LevelPayload};
use crate::names::{NameAllocator, WordSource};
use crate::repo::draft_repo::{DraftRepository, NewDraft};
use std::time::Instant;

const MODULE: &str = "drafts";

/// Use-case service for owner-scoped draft operations.
pub struct DraftService<R: DraftRepository> {
    repo: R,
}

impl<R: DraftRepository> DraftService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an empty draft owned by `caller`.
    ///
    /// The draft row insert doubles as the name reservation, so the allocator
    /// retries with a fresh name whenever the owner already has that name.
    pub fn create_draft<W: WordSource>(
        &self,
        caller: &Caller,
        allocator: &NameAllocator<W>,
    ) -> LevelResult<Draft> {
        let started_at = Instant::now();
        let owner = caller.user_id();
        let id = DraftId::new();

        let result = allocator
            .allocate(owner, |name| {
                self.repo.insert_draft(&NewDraft {
                    id,
                    owner,
                    name: name.clone(),
                    content: LevelPayload::empty(),
                })
            })
            .map(|allocation| allocation.reserved);

        log_outcome("draft_create", MODULE, id, started_at, &result);
        result
    }

    pub fn get_draft(&self, caller: &Caller, id: DraftId) -> LevelResult<Draft> {
        self.repo
            .get_draft(caller.user_id(), id)?
            .ok_or(LevelError::NotFound(NotFoundTarget::Draft(id)))
    }

    pub fn get_content(&self, caller: &Caller, id: DraftId) -> LevelResult<LevelPayload> {
        self.get_draft(caller, id).map(|draft| draft.content)
    }

    pub fn list_drafts(&self, caller: &Caller) -> LevelResult<Vec<DraftSummary>> {
        Ok(self.repo.list_drafts(caller.user_id())?)
    }

    /// Replaces the draft's whole payload.
    pub fn set_content(
        &self,
        caller: &Caller,
        id: DraftId,
        content: &LevelPayload,
    ) -> LevelResult<()> {
        let started_at = Instant::now();
        let result = self
            .repo
            .set_content(caller.user_id(), id, content)
            .map_err(LevelError::from);
        log_outcome("draft_set_content", MODULE, id, started_at, &result);
        result
    }

    pub fn rename(&self, caller: &Caller, id: DraftId, name: &str) -> LevelResult<LevelName> {
        let started_at = Instant::now();
        let result = LevelName::parse(name)
            .map_err(LevelError::from)
            .and_then(|name| {
                self.repo.rename(caller.user_id(), id, &name)?;
                Ok(name)
            });
        log_outcome("draft_rename", MODULE, id, started_at, &result);
        result
    }

    /// Deletes the draft. A linked published level stays in the catalog.
    pub fn delete(&self, caller: &Caller, id: DraftId) -> LevelResult<()> {
        let started_at = Instant::now();
        let result = self
            .repo
            .delete(caller.user_id(), id)
            .map_err(LevelError::from);
        log_outcome("draft_delete", MODULE, id, started_at, &result);
        result
    }
}
