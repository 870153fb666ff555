//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Every draft statement is scoped by owner; a non-owner observes
//!   `RepoError::DraftNotFound`, never an ownership error.
//! - Publication state changes run inside one immediate transaction.
//! - Repository APIs return semantic errors (`DraftNotFound`, `NameTaken`,
//!   `AlreadyPublished`, `NotPublished`) in addition to DB transport errors.

pub mod catalog_repo;
pub mod draft_repo;
mod error;
pub mod publication_repo;
mod readiness;
pub mod user_repo;

pub use error::{RepoError, RepoResult};

/// Checks once what the draft, catalog and publication repositories each
/// check on construction.
pub(crate) fn ensure_lifecycle_ready(conn: &rusqlite::Connection) -> RepoResult<()> {
    readiness::ensure_connection_ready(conn, readiness::LIFECYCLE_TABLES)
}

use crate::model::level::{LevelName, LevelPayload};
use std::str::FromStr;

/// Parses a stored UUID column into a typed id.
fn parse_stored_id<T: FromStr>(value: &str, column: &'static str) -> RepoResult<T> {
    T::from_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid id value `{value}` in {column}")))
}

fn parse_stored_name(value: &str, column: &'static str) -> RepoResult<LevelName> {
    LevelName::parse(value)
        .map_err(|err| RepoError::InvalidData(format!("invalid name in {column}: {err}")))
}

fn parse_stored_payload(value: &str, column: &'static str) -> RepoResult<LevelPayload> {
    LevelPayload::from_json(value)
        .map_err(|err| RepoError::InvalidData(format!("invalid JSON payload in {column}: {err}")))
}
