//! Identity gate seam.
//!
//! # Responsibility
//! - Define the contract for turning an opaque caller token into a user id.
//! - Carry the resolved identity explicitly into every core operation.
//!
//! # Invariants
//! - A `Caller` only exists after successful resolution (or explicit
//!   construction by a trusted embedding layer).
//! - Resolution failure is reported before any storage access.

use crate::error::LevelError;
use crate::model::ids::UserId;
use std::collections::HashMap;

/// Resolves caller tokens to user ids. Session and credential mechanics live
/// behind implementations of this trait.
pub trait IdentityGate {
    fn resolve(&self, token: &str) -> Option<UserId>;
}

impl<G: IdentityGate + ?Sized> IdentityGate for &G {
    fn resolve(&self, token: &str) -> Option<UserId> {
        (**self).resolve(token)
    }
}

/// Authenticated caller identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    user_id: UserId,
}

impl Caller {
    /// Resolves `token` through `gate`.
    pub fn resolve<G: IdentityGate + ?Sized>(gate: &G, token: &str) -> Result<Self, LevelError> {
        gate.resolve(token)
            .map(|user_id| Self { user_id })
            .ok_or(LevelError::NotAuthenticated)
    }

    /// Wraps an identity the embedding layer has already verified.
    pub fn from_verified(user_id: UserId) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// In-process token table.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityGate {
    tokens: HashMap<String, UserId>,
}

impl StaticIdentityGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `token` for `user_id`, replacing any previous mapping.
    pub fn insert(&mut self, token: impl Into<String>, user_id: UserId) {
        self.tokens.insert(token.into(), user_id);
    }

    pub fn with_token(mut self, token: impl Into<String>, user_id: UserId) -> Self {
        self.insert(token, user_id);
        self
    }

    pub fn revoke(&mut self, token: &str) {
        self.tokens.remove(token);
    }
}

impl IdentityGate for StaticIdentityGate {
    fn resolve(&self, token: &str) -> Option<UserId> {
        self.tokens.get(token).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{Caller, StaticIdentityGate};
    use crate::error::LevelError;
    use crate::model::ids::UserId;

    #[test]
    fn resolves_registered_token() {
        let user = UserId::new();
        let gate = StaticIdentityGate::new().with_token("session-a", user);
        let caller = Caller::resolve(&gate, "session-a").unwrap();
        assert_eq!(caller.user_id(), user);
    }

    #[test]
    fn unknown_or_revoked_token_is_not_authenticated() {
        let user = UserId::new();
        let mut gate = StaticIdentityGate::new().with_token("session-a", user);
        assert!(matches!(
            Caller::resolve(&gate, "session-b"),
            Err(LevelError::NotAuthenticated)
        ));

        gate.revoke("session-a");
        assert!(matches!(
            Caller::resolve(&gate, "session-a"),
            Err(LevelError::NotAuthenticated)
        ));
    }
}
