//! Identity provider port.
//!
//! Authentication lives outside the crate. The caller supplies a provider
//! scoped to the current request and resolves it into an [`Actor`].

use async_trait::async_trait;

use crate::domain::foundation::{Actor, DomainError, UserRef};

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The authenticated user, or `None` for an anonymous request.
    async fn current_identity(&self) -> Result<Option<UserRef>, DomainError>;

    async fn is_admin(&self, user: &UserRef) -> Result<bool, DomainError>;
}

/// Resolves the current request into an actor.
pub async fn resolve_actor(provider: &dyn IdentityProvider) -> Result<Actor, DomainError> {
    match provider.current_identity().await? {
        None => Ok(Actor::Anonymous),
        Some(user) => {
            if provider.is_admin(&user).await? {
                Ok(Actor::admin(user))
            } else {
                Ok(Actor::user(user))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    struct Fixed {
        user: Option<UserRef>,
        admin: bool,
    }

    #[async_trait]
    impl IdentityProvider for Fixed {
        async fn current_identity(&self) -> Result<Option<UserRef>, DomainError> {
            Ok(self.user.clone())
        }

        async fn is_admin(&self, _user: &UserRef) -> Result<bool, DomainError> {
            Ok(self.admin)
        }
    }

    #[tokio::test]
    async fn anonymous_when_no_identity() {
        let actor = resolve_actor(&Fixed { user: None, admin: true }).await.unwrap();
        assert_eq!(actor, Actor::Anonymous);
    }

    #[tokio::test]
    async fn admin_flag_is_applied() {
        let user = UserRef::new(UserId::from_raw(3), "root").unwrap();
        let actor = resolve_actor(&Fixed {
            user: Some(user.clone()),
            admin: true,
        })
        .await
        .unwrap();
        assert_eq!(actor, Actor::admin(user));
    }
}
