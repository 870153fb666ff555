//! Public catalog reads.

use crate::error::{LevelError, LevelResult, NotFoundTarget};
use crate::model::ids::{PublishedLevelId, UserId};
use crate::model::level::PublishedLevel;
use crate::repo::catalog_repo::CatalogRepository;

pub struct CatalogService<R: CatalogRepository> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Published levels are public; no caller identity is required.
    pub fn get_published(&self, id: PublishedLevelId) -> LevelResult<PublishedLevel> {
        self.repo
            .get_published(id)?
            .ok_or(LevelError::NotFound(NotFoundTarget::PublishedLevel(id)))
    }

    pub fn list_by_publisher(&self, publisher: UserId) -> LevelResult<Vec<PublishedLevel>> {
        Ok(self.repo.list_by_publisher(publisher)?)
    }
}
