//! Level lifecycle core for a level-sharing service.
//!
//! Drafts are private and owner-editable; publishing snapshots a draft into
//! the public catalog and links the two. This crate owns the rules for that
//! link (publish, re-sync, unpublish), collision-free draft naming, and the
//! owner scoping of every draft operation.

pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod logging;
pub mod model;
pub mod names;
pub mod repo;
pub mod service;

pub use config::{ConfigError, CoreConfig};
pub use error::{ConflictReason, LevelError, LevelResult, NotFoundTarget};
pub use identity::{Caller, IdentityGate, StaticIdentityGate};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::ids::{DraftId, PublishedLevelId, UserId};
pub use model::level::{
    Draft, DraftSummary, LevelName, LevelNameError, LevelPayload, PublicationState,
    PublishedLevel,
};
pub use model::user::User;
pub use names::{Allocation, NameAllocator, RandomWordSource, WordSource};
pub use repo::catalog_repo::{CatalogRepository, SqliteCatalogRepository};
pub use repo::draft_repo::{DraftRepository, NewDraft, SqliteDraftRepository};
pub use repo::publication_repo::{PublicationRepository, SqlitePublicationRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::catalog_service::CatalogService;
pub use service::draft_service::DraftService;
pub use service::lifecycle::{CreatedDraft, LevelLifecycle};
pub use service::publication_service::PublicationService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
