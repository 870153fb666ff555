//! Caller-facing error taxonomy for level lifecycle operations.
//!
//! # Invariants
//! - Ownership failures surface as `NotFound`, never as a distinct
//!   "exists but not yours" error.
//! - Only `StorageUnavailable` is eligible for caller retry.

use crate::model::ids::{DraftId, PublishedLevelId};
use crate::model::level::LevelNameError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LevelResult<T> = Result<T, LevelError>;

/// What a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundTarget {
    Draft(DraftId),
    PublishedLevel(PublishedLevelId),
}

/// Why a write was rejected as conflicting with existing state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictReason {
    /// Publish on a draft that already links to a published level.
    AlreadyPublished(PublishedLevelId),
    /// A name reservation found the owner's name already taken.
    NameInUse,
    UsernameTaken,
}

#[derive(Debug)]
pub enum LevelError {
    /// The identity gate did not yield a user.
    NotAuthenticated,
    /// Missing, or not owned by the caller.
    NotFound(NotFoundTarget),
    Conflict(ConflictReason),
    /// Update/unpublish on a draft with no published link.
    FailedPrecondition(DraftId),
    /// Name allocation gave up after this many reservation attempts.
    NameSpaceExhausted { attempts: u32 },
    InvalidName(LevelNameError),
    /// Transient lock or availability failure; safe to retry with backoff.
    StorageUnavailable(RepoError),
    /// Non-transient persistence failure.
    Storage(RepoError),
}

impl LevelError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }

    /// Stable short code for logs and machine-readable replies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "not_authenticated",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::FailedPrecondition(_) => "failed_precondition",
            Self::NameSpaceExhausted { .. } => "name_space_exhausted",
            Self::InvalidName(_) => "invalid_name",
            Self::StorageUnavailable(_) => "storage_unavailable",
            Self::Storage(_) => "storage",
        }
    }
}

impl Display for LevelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::NotFound(NotFoundTarget::Draft(id)) => write!(f, "draft not found: {id}"),
            Self::NotFound(NotFoundTarget::PublishedLevel(id)) => {
                write!(f, "published level not found: {id}")
            }
            Self::Conflict(ConflictReason::AlreadyPublished(id)) => {
                write!(f, "draft is already published as {id}")
            }
            Self::Conflict(ConflictReason::NameInUse) => {
                write!(f, "another draft already uses this name")
            }
            Self::Conflict(ConflictReason::UsernameTaken) => write!(f, "username is taken"),
            Self::FailedPrecondition(id) => write!(f, "draft {id} is not published"),
            Self::NameSpaceExhausted { attempts } => {
                write!(f, "no free draft name found after {attempts} attempts")
            }
            Self::InvalidName(err) => write!(f, "{err}"),
            Self::StorageUnavailable(err) => write!(f, "storage unavailable: {err}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for LevelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidName(err) => Some(err),
            Self::StorageUnavailable(err) | Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LevelNameError> for LevelError {
    fn from(value: LevelNameError) -> Self {
        Self::InvalidName(value)
    }
}

impl From<RepoError> for LevelError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Db(err) if err.is_transient() => {
                Self::StorageUnavailable(RepoError::Db(err))
            }
            RepoError::DraftNotFound(id) => Self::NotFound(NotFoundTarget::Draft(id)),
            RepoError::PublishedNotFound(id) => {
                Self::NotFound(NotFoundTarget::PublishedLevel(id))
            }
            RepoError::NameTaken { .. } => Self::Conflict(ConflictReason::NameInUse),
            RepoError::UsernameTaken => Self::Conflict(ConflictReason::UsernameTaken),
            RepoError::AlreadyPublished { published_id, .. } => {
                Self::Conflict(ConflictReason::AlreadyPublished(published_id))
            }
            RepoError::NotPublished(id) => Self::FailedPrecondition(id),
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ConflictReason, LevelError, NotFoundTarget};
    use crate::db::DbError;
    use crate::model::ids::{DraftId, PublishedLevelId, UserId};
    use crate::repo::RepoError;

    fn sqlite_failure(code: i32) -> RepoError {
        RepoError::Db(DbError::Sqlite(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(code),
            None,
        )))
    }

    #[test]
    fn busy_and_locked_map_to_retryable_storage_unavailable() {
        for code in [rusqlite::ffi::SQLITE_BUSY, rusqlite::ffi::SQLITE_LOCKED] {
            let err = LevelError::from(sqlite_failure(code));
            assert!(matches!(err, LevelError::StorageUnavailable(_)));
            assert!(err.is_retryable());
        }
    }

    #[test]
    fn other_storage_failures_are_not_retryable() {
        let err = LevelError::from(sqlite_failure(rusqlite::ffi::SQLITE_CORRUPT));
        assert!(matches!(err, LevelError::Storage(_)));
        assert!(!err.is_retryable());

        let err = LevelError::from(RepoError::InvalidData("bad".to_string()));
        assert_eq!(err.code(), "storage");
    }

    #[test]
    fn semantic_repo_errors_map_to_taxonomy() {
        let draft_id = DraftId::new();
        let published_id = PublishedLevelId::new();

        assert!(matches!(
            LevelError::from(RepoError::DraftNotFound(draft_id)),
            LevelError::NotFound(NotFoundTarget::Draft(id)) if id == draft_id
        ));
        assert!(matches!(
            LevelError::from(RepoError::AlreadyPublished { draft_id, published_id }),
            LevelError::Conflict(ConflictReason::AlreadyPublished(id)) if id == published_id
        ));
        assert!(matches!(
            LevelError::from(RepoError::NameTaken { owner: UserId::new() }),
            LevelError::Conflict(ConflictReason::NameInUse)
        ));
        let precondition = LevelError::from(RepoError::NotPublished(draft_id));
        assert!(matches!(precondition, LevelError::FailedPrecondition(id) if id == draft_id));
        assert!(!precondition.is_retryable());
    }
}
