//! Username-as-token identity for local use.

use levelsmith_core::{IdentityGate, RepoResult, UserId, UserRepository};

/// Treats the `--as` username as the caller token.
///
/// The users table is read once in [`UserDirectoryGate::lookup`], so a
/// storage failure reaches the caller as a storage error instead of being
/// folded into an unknown token by `IdentityGate::resolve`.
pub struct UserDirectoryGate {
    known: Option<(String, UserId)>,
}

impl UserDirectoryGate {
    pub fn lookup<R: UserRepository>(users: &R, username: Option<&str>) -> RepoResult<Self> {
        let username = match username.map(str::trim).filter(|name| !name.is_empty()) {
            Some(username) => username,
            None => return Ok(Self { known: None }),
        };
        let known = users
            .find_by_username(username)?
            .map(|user| (user.username, user.id));
        Ok(Self { known })
    }
}

impl IdentityGate for UserDirectoryGate {
    fn resolve(&self, token: &str) -> Option<UserId> {
        self.known
            .as_ref()
            .filter(|(username, _)| username == token.trim())
            .map(|(_, id)| *id)
    }
}
