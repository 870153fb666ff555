//! Domain model for drafts, published levels and their owners.
//!
//! # Responsibility
//! - Define typed identifiers so user, draft and published ids never mix.
//! - Define the records shared by repositories and services.
//!
//! # Invariants
//! - Every record is identified by a stable UUID-backed id.
//! - Level content is an opaque JSON document; no schema is enforced here.

pub mod ids;
pub mod level;
pub mod user;
