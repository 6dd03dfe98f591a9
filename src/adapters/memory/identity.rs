//! Fixed identity provider.
//!
//! Resolves to a preconfigured user. Embedders that authenticate elsewhere
//! build one per request; tests use it to play different callers.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::domain::foundation::{DomainError, UserId, UserRef};
use crate::ports::IdentityProvider;

#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    current: Option<UserRef>,
    admins: HashSet<UserId>,
}

impl StaticIdentityProvider {
    /// A provider for an anonymous request.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A provider for a signed-in user.
    pub fn signed_in(user: UserRef) -> Self {
        Self {
            current: Some(user),
            admins: HashSet::new(),
        }
    }

    /// Grants administrator rights to a user id.
    pub fn with_admin(mut self, user: UserId) -> Self {
        self.admins.insert(user);
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn current_identity(&self) -> Result<Option<UserRef>, DomainError> {
        Ok(self.current.clone())
    }

    async fn is_admin(&self, user: &UserRef) -> Result<bool, DomainError> {
        Ok(self.admins.contains(&user.id()))
    }
}
