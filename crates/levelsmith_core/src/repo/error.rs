use crate::db::DbError;
use crate::model::ids::{DraftId, PublishedLevelId, UserId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for user, draft, catalog and publication persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    UserNotFound(UserId),
    /// Missing or owned by someone else; the two are indistinguishable.
    DraftNotFound(DraftId),
    PublishedNotFound(PublishedLevelId),
    /// The owner already has a draft with that name; nothing was written.
    NameTaken {
        owner: UserId,
    },
    UsernameTaken,
    AlreadyPublished {
        draft_id: DraftId,
        published_id: PublishedLevelId,
    },
    NotPublished(DraftId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::DraftNotFound(id) => write!(f, "draft not found: {id}"),
            Self::PublishedNotFound(id) => write!(f, "published level not found: {id}"),
            Self::NameTaken { owner } => {
                write!(f, "draft name already used by another draft of {owner}")
            }
            Self::UsernameTaken => write!(f, "username is taken"),
            Self::AlreadyPublished {
                draft_id,
                published_id,
            } => write!(f, "draft {draft_id} is already published as {published_id}"),
            Self::NotPublished(id) => write!(f, "draft {id} is not published"),
            Self::InvalidData(message) => write!(f, "invalid persisted level data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
