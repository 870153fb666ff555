//! Account record as seen by the core.
//!
//! Accounts are created and authenticated elsewhere; the core only needs
//! the id and the public profile fields.

use crate::model::ids::UserId;
use serde::Serialize;

/// Icon assigned to accounts that never chose one.
pub const DEFAULT_USER_ICON: &str = "gradient";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub icon: String,
}
