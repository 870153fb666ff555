//! Publication use-case service.
//!
//! # Responsibility
//! - Expose publish, re-sync and unpublish for a caller's draft.
//!
//! # Invariants
//! - Publishing twice yields `Conflict`; re-sync and unpublish without a
//!   link yield `FailedPrecondition`. Neither is retried.
//! - Re-sync is the only path from draft edits to public content.

use super::log_outcome;
use crate::error::{LevelError, LevelResult};
use crate::identity::Caller;
use crate::model::ids::{DraftId, PublishedLevelId};
use crate::model::level::PublishedLevel;
use crate::repo::publication_repo::PublicationRepository;
use std::time::Instant;

const MODULE: &str = "publication";

pub struct PublicationService<R: PublicationRepository> {
    repo: R,
}

impl<R: PublicationRepository> PublicationService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Snapshots the draft into a new published level and links it.
    pub fn publish(&self, caller: &Caller, draft_id: DraftId) -> LevelResult<PublishedLevel> {
        let started_at = Instant::now();
        let result = self
            .repo
            .publish(caller.user_id(), draft_id)
            .map_err(LevelError::from);
        log_outcome("level_publish", MODULE, draft_id, started_at, &result);
        result
    }

    /// Overwrites the linked published level with the draft's current name
    /// and content. Id, publisher and `published_at` are unchanged.
    pub fn update_published(
        &self,
        caller: &Caller,
        draft_id: DraftId,
    ) -> LevelResult<PublishedLevel> {
        let started_at = Instant::now();
        let result = self
            .repo
            .resync(caller.user_id(), draft_id)
            .map_err(LevelError::from);
        log_outcome("level_resync", MODULE, draft_id, started_at, &result);
        result
    }

    /// Removes the published level and clears the draft's link.
    pub fn unpublish(&self, caller: &Caller, draft_id: DraftId) -> LevelResult<PublishedLevelId> {
        let started_at = Instant::now();
        let result = self
            .repo
            .unpublish(caller.user_id(), draft_id)
            .map_err(LevelError::from);
        log_outcome("level_unpublish", MODULE, draft_id, started_at, &result);
        result
    }
}
