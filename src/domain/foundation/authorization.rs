//! Capability checks for decision-scoped resources.
//!
//! Every operation asks one question: may this actor exercise this capability
//! on this resource? The answer is an [`AuthorizationResult`] that can be logged
//! and converted into a `Forbidden` error.
//!
//! | Capability         | Granted to                                        |
//! |--------------------|---------------------------------------------------|
//! | `View`             | anyone if public, otherwise the owner             |
//! | `Manage`           | owner or administrator                            |
//! | `Contribute`       | authenticated non-owner, decision must be public  |
//! | `ProposeStageEdit` | authenticated non-owner                           |
//!
//! Administrators get no exemption from the non-owner rules: an admin who owns
//! a decision still cannot suggest on it.

use std::fmt;

use super::{Actor, UserId, WorkflowError};

/// What the actor wants to do with a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    View,
    Manage,
    Contribute,
    ProposeStageEdit,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::View => "view",
            Capability::Manage => "manage",
            Capability::Contribute => "contribute",
            Capability::ProposeStageEdit => "propose_stage_edit",
        };
        write!(f, "{}", s)
    }
}

/// Resources that participate in capability checks.
pub trait Authorizable {
    /// The type name for authorization logs (e.g., "Decision").
    const RESOURCE_TYPE: &'static str;

    /// Returns a string representation of this resource's ID.
    fn resource_id(&self) -> String;

    /// Returns the owning user.
    fn owner_id(&self) -> UserId;

    /// Whether non-owners may see the resource.
    fn is_public(&self) -> bool;

    /// True if the given user owns this resource.
    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == *user_id
    }
}

/// Result of an authorization check.
///
/// Contains both the verdict and context for logging/auditing.
#[derive(Debug, Clone)]
pub struct AuthorizationResult {
    /// Whether access was granted.
    pub granted: bool,

    /// The resource type being accessed.
    pub resource_type: &'static str,

    /// The ID of the resource being accessed.
    pub resource_id: String,

    /// The actor who requested access.
    pub actor: String,

    /// Optional reason for denial (if denied).
    pub denial_reason: Option<String>,
}

impl AuthorizationResult {
    /// Creates a successful authorization result.
    pub fn granted(
        resource_type: &'static str,
        resource_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            granted: true,
            resource_type,
            resource_id: resource_id.into(),
            actor: actor.into(),
            denial_reason: None,
        }
    }

    /// Creates a denied authorization result.
    pub fn denied(
        resource_type: &'static str,
        resource_id: impl Into<String>,
        actor: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            granted: false,
            resource_type,
            resource_id: resource_id.into(),
            actor: actor.into(),
            denial_reason: Some(reason.into()),
        }
    }

    /// Returns true if access was granted.
    pub fn is_granted(&self) -> bool {
        self.granted
    }

    /// Returns true if access was denied.
    pub fn is_denied(&self) -> bool {
        !self.granted
    }

    /// Emits a trace record for the verdict.
    pub fn log(&self, action: &str) -> &Self {
        if self.granted {
            tracing::debug!(
                action,
                resource_type = self.resource_type,
                resource_id = %self.resource_id,
                actor = %self.actor,
                "authorization granted"
            );
        } else {
            tracing::warn!(
                action,
                resource_type = self.resource_type,
                resource_id = %self.resource_id,
                actor = %self.actor,
                reason = self.denial_reason.as_deref().unwrap_or(""),
                "authorization denied"
            );
        }
        self
    }

    /// Converts this result to `Ok(())` or `Err(Forbidden)`.
    pub fn into_result(self) -> Result<(), WorkflowError> {
        if self.granted {
            Ok(())
        } else {
            Err(WorkflowError::Forbidden(
                self.denial_reason
                    .unwrap_or_else(|| "Access denied".to_string()),
            ))
        }
    }
}

/// The single capability check used by every workflow operation.
pub fn check_capability<T>(actor: &Actor, resource: &T, capability: Capability) -> AuthorizationResult
where
    T: Authorizable,
{
    let deny = |reason: &str| {
        AuthorizationResult::denied(
            T::RESOURCE_TYPE,
            resource.resource_id(),
            actor.to_string(),
            reason,
        )
    };
    let grant = || {
        AuthorizationResult::granted(T::RESOURCE_TYPE, resource.resource_id(), actor.to_string())
    };

    let is_owner = actor
        .user_id()
        .map(|id| resource.is_owner(&id))
        .unwrap_or(false);

    match capability {
        Capability::View => {
            if resource.is_public() || is_owner {
                grant()
            } else {
                deny("Only the owner may view a private decision")
            }
        }
        Capability::Manage => {
            if !actor.is_authenticated() {
                deny("Authentication required")
            } else if is_owner || actor.is_admin() {
                grant()
            } else {
                deny("Only the owner or an administrator may change this decision")
            }
        }
        Capability::Contribute => {
            if !actor.is_authenticated() {
                deny("Authentication required")
            } else if is_owner {
                deny("Owners cannot contribute to their own decision")
            } else if !resource.is_public() {
                deny("Contributions are only accepted on public decisions")
            } else {
                grant()
            }
        }
        Capability::ProposeStageEdit => {
            if !actor.is_authenticated() {
                deny("Authentication required")
            } else if is_owner {
                deny("Owners cannot propose edits to their own decision")
            } else {
                grant()
            }
        }
    }
}

/// Checks that the actor is an administrator.
pub fn check_admin(actor: &Actor, resource_type: &'static str) -> AuthorizationResult {
    if actor.is_admin() {
        AuthorizationResult::granted(resource_type, "*", actor.to_string())
    } else {
        AuthorizationResult::denied(
            resource_type,
            "*",
            actor.to_string(),
            "Administrator rights required",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserRef;

    struct TestResource {
        owner: UserId,
        public: bool,
    }

    impl Authorizable for TestResource {
        const RESOURCE_TYPE: &'static str = "TestResource";

        fn resource_id(&self) -> String {
            "res-1".to_string()
        }

        fn owner_id(&self) -> UserId {
            self.owner
        }

        fn is_public(&self) -> bool {
            self.public
        }
    }

    fn user(id: i64) -> Actor {
        Actor::user(UserRef::new(UserId::from_raw(id), format!("user{}", id)).unwrap())
    }

    fn admin(id: i64) -> Actor {
        Actor::admin(UserRef::new(UserId::from_raw(id), format!("admin{}", id)).unwrap())
    }

    fn resource(public: bool) -> TestResource {
        TestResource {
            owner: UserId::from_raw(1),
            public,
        }
    }

    #[test]
    fn anyone_can_view_public_resource() {
        let r = resource(true);
        assert!(check_capability(&Actor::Anonymous, &r, Capability::View).is_granted());
        assert!(check_capability(&user(2), &r, Capability::View).is_granted());
    }

    #[test]
    fn only_owner_can_view_private_resource() {
        let r = resource(false);
        assert!(check_capability(&user(1), &r, Capability::View).is_granted());
        assert!(check_capability(&user(2), &r, Capability::View).is_denied());
        assert!(check_capability(&Actor::Anonymous, &r, Capability::View).is_denied());
    }

    #[test]
    fn manage_requires_owner_or_admin() {
        let r = resource(true);
        assert!(check_capability(&user(1), &r, Capability::Manage).is_granted());
        assert!(check_capability(&admin(9), &r, Capability::Manage).is_granted());
        assert!(check_capability(&user(2), &r, Capability::Manage).is_denied());
        assert!(check_capability(&Actor::Anonymous, &r, Capability::Manage).is_denied());
    }

    #[test]
    fn contribute_rejects_owner_and_private() {
        assert!(check_capability(&user(2), &resource(true), Capability::Contribute).is_granted());
        assert!(check_capability(&user(1), &resource(true), Capability::Contribute).is_denied());
        assert!(check_capability(&user(2), &resource(false), Capability::Contribute).is_denied());
    }

    #[test]
    fn admin_owner_is_not_exempt_from_self_suggestion_rule() {
        let r = resource(true);
        assert!(check_capability(&admin(1), &r, Capability::Contribute).is_denied());
        assert!(check_capability(&admin(1), &r, Capability::ProposeStageEdit).is_denied());
    }

    #[test]
    fn stage_edit_proposals_allowed_on_private_resource() {
        let r = resource(false);
        assert!(check_capability(&user(2), &r, Capability::ProposeStageEdit).is_granted());
        assert!(check_capability(&Actor::Anonymous, &r, Capability::ProposeStageEdit).is_denied());
    }

    #[test]
    fn denied_result_converts_to_forbidden() {
        let err = check_capability(&user(2), &resource(false), Capability::Manage)
            .into_result()
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }

    #[test]
    fn check_admin_grants_only_admins() {
        assert!(check_admin(&admin(3), "InteractionReport").is_granted());
        assert!(check_admin(&user(3), "InteractionReport").is_denied());
        assert!(check_admin(&Actor::Anonymous, "InteractionReport").is_denied());
    }
}
