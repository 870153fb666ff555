//! Draft and published level records.
//!
//! # Responsibility
//! - Define the draft/published pair and the link that ties them together.
//! - Validate display names and wrap level content as an opaque payload.
//!
//! # Invariants
//! - A draft's `published_id` is the only publication state discriminator.
//! - `PublishedLevel::publisher` is fixed at publish time.
//! - `LevelPayload` is never inspected by the core; it round-trips exactly.

use crate::model::ids::{DraftId, PublishedLevelId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum display-name length in characters.
pub const LEVEL_NAME_MAX_CHARS: usize = 64;

/// Validated level display name.
///
/// Construction trims surrounding whitespace and rejects blank or overlong
/// values. Uniqueness is a storage concern, not checked here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LevelName(String);

impl LevelName {
    pub fn parse(value: impl AsRef<str>) -> Result<Self, LevelNameError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LevelNameError::Blank);
        }
        let chars = trimmed.chars().count();
        if chars > LEVEL_NAME_MAX_CHARS {
            return Err(LevelNameError::TooLong { chars });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for LevelName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LevelName {
    type Error = LevelNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<LevelName> for String {
    fn from(value: LevelName) -> Self {
        value.0
    }
}

/// Display-name validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelNameError {
    Blank,
    TooLong { chars: usize },
}

impl Display for LevelNameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "level name must not be blank"),
            Self::TooLong { chars } => write!(
                f,
                "level name has {chars} characters; at most {LEVEL_NAME_MAX_CHARS} allowed"
            ),
        }
    }
}

impl Error for LevelNameError {}

/// Opaque level content.
///
/// The gameplay document is owned by the editor; the core stores and copies
/// it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelPayload(Value);

impl LevelPayload {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Content of a freshly created draft: an empty JSON object.
    pub fn empty() -> Self {
        Self(Value::Object(serde_json::Map::new()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Serializes the payload for storage.
    pub fn to_json(&self) -> String {
        self.0.to_string()
    }

    /// Parses stored payload text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text).map(Self)
    }
}

impl Default for LevelPayload {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for LevelPayload {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Publication state of a draft, derived from its link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationState {
    Unpublished,
    Published(PublishedLevelId),
}

/// Private, owner-editable level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Draft {
    pub id: DraftId,
    /// Immutable after creation.
    pub owner: UserId,
    /// Unique among the owner's drafts.
    pub name: LevelName,
    pub content: LevelPayload,
    /// Link to the public copy, if published.
    pub published_id: Option<PublishedLevelId>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

impl Draft {
    pub fn state(&self) -> PublicationState {
        match self.published_id {
            Some(id) => PublicationState::Published(id),
            None => PublicationState::Unpublished,
        }
    }
}

/// Listing row for an owner's drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftSummary {
    pub id: DraftId,
    pub name: LevelName,
    pub published_id: Option<PublishedLevelId>,
}

/// Public catalog level: a snapshot of a draft at publish or last re-sync.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedLevel {
    pub id: PublishedLevelId,
    pub name: LevelName,
    pub publisher: UserId,
    pub content: LevelPayload,
    /// Unix epoch milliseconds; set once at publish.
    pub published_at: i64,
    /// Unix epoch milliseconds; bumped by every re-sync.
    pub updated_at: i64,
}
