//! Who is performing an operation.
//!
//! Authentication happens outside the crate; callers resolve the current
//! identity and admin flag into an [`Actor`] before invoking a handler.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{UserId, ValidationError, WorkflowError};

/// Reference to a user account: the id plus the name shown in attributions.
///
/// Identity comparisons always go through [`UserRef::id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    id: UserId,
    username: String,
}

impl UserRef {
    /// Creates a user reference, rejecting an empty username.
    pub fn new(id: UserId, username: impl Into<String>) -> Result<Self, ValidationError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(ValidationError::empty_field("username"));
        }
        Ok(Self { id, username })
    }

    /// Rebuilds a reference from storage without validation.
    pub fn reconstitute(id: UserId, username: String) -> Self {
        Self { id, username }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// True when both references point at the same account.
    pub fn same_user(&self, other: &UserId) -> bool {
        self.id == *other
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.username, self.id)
    }
}

/// The caller of a workflow operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// No authenticated identity.
    Anonymous,
    /// An authenticated user, possibly with administrator rights.
    User { user: UserRef, is_admin: bool },
}

impl Actor {
    /// Authenticated non-admin user.
    pub fn user(user: UserRef) -> Self {
        Actor::User {
            user,
            is_admin: false,
        }
    }

    /// Authenticated administrator.
    pub fn admin(user: UserRef) -> Self {
        Actor::User {
            user,
            is_admin: true,
        }
    }

    /// Returns the user reference if authenticated.
    pub fn user_ref(&self) -> Option<&UserRef> {
        match self {
            Actor::Anonymous => None,
            Actor::User { user, .. } => Some(user),
        }
    }

    /// Returns the user id if authenticated.
    pub fn user_id(&self) -> Option<UserId> {
        self.user_ref().map(UserRef::id)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Actor::User { .. })
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Actor::User { is_admin: true, .. })
    }

    /// True when the actor is the given user.
    pub fn is(&self, user_id: &UserId) -> bool {
        self.user_id().as_ref() == Some(user_id)
    }

    /// Returns the authenticated user or a `Forbidden` error.
    pub fn require_user(&self) -> Result<&UserRef, WorkflowError> {
        self.user_ref()
            .ok_or_else(|| WorkflowError::forbidden("Authentication required"))
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Anonymous => write!(f, "anonymous"),
            Actor::User { user, .. } => write!(f, "{}", user),
        }
    }
}
