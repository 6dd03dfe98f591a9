//! Command infrastructure for workflow handlers.
//!
//! Every handler accepts a single `CommandMetadata` carrying the actor and the
//! tracing context instead of a loose list of `actor`, `correlation_id` and
//! `source` parameters.

use uuid::Uuid;

use super::Actor;

/// Metadata context for command and query handlers.
///
/// # Example
///
/// ```ignore
/// let metadata = CommandMetadata::new(Actor::user(alice)).with_source("api");
/// let result = handler.handle(cmd, metadata).await?;
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandMetadata {
    /// Who is performing the operation (required for authorization).
    pub actor: Actor,

    /// Links related operations across a single user request.
    correlation_id: String,

    /// Source of this command (e.g., "api", "admin", "scheduler").
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates metadata for the actor with a fresh correlation id.
    pub fn new(actor: Actor) -> Self {
        Self {
            actor,
            correlation_id: Uuid::new_v4().to_string(),
            source: None,
        }
    }

    /// Metadata for a request without an authenticated identity.
    pub fn anonymous() -> Self {
        Self::new(Actor::Anonymous)
    }

    /// Builder: use a correlation id propagated from the caller.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = id.into();
        self
    }

    /// Builder: add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{UserId, UserRef};

    #[test]
    fn new_generates_correlation_id_once() {
        let metadata = CommandMetadata::anonymous();
        assert!(!metadata.correlation_id().is_empty());
        assert_eq!(metadata.correlation_id(), metadata.correlation_id());
    }

    #[test]
    fn builder_chain_sets_fields() {
        let user = UserRef::new(UserId::from_raw(4), "dana").unwrap();
        let metadata = CommandMetadata::new(Actor::user(user))
            .with_correlation_id("corr-123")
            .with_source("api");

        assert_eq!(metadata.correlation_id(), "corr-123");
        assert_eq!(metadata.source(), Some("api"));
        assert!(metadata.actor.is(&UserId::from_raw(4)));
    }
}
