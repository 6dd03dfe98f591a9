//! Requests for more detail on a decision.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ClarificationId, DecisionId, StateMachine, Timestamp, UserRef, ValidationError, WorkflowError,
};

use super::ClarificationStatus;

/// A question posed to the decision owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clarification {
    id: ClarificationId,
    decision_id: DecisionId,
    author: UserRef,
    message: String,
    created_at: Timestamp,
    status: ClarificationStatus,
}

impl Clarification {
    /// Creates a pending clarification.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the message is blank
    pub fn new(
        id: ClarificationId,
        decision_id: DecisionId,
        author: UserRef,
        message: &str,
    ) -> Result<Self, ValidationError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::empty_field("message"));
        }
        Ok(Self {
            id,
            decision_id,
            author,
            message: message.to_string(),
            created_at: Timestamp::now(),
            status: ClarificationStatus::Pending,
        })
    }

    pub fn reconstitute(
        id: ClarificationId,
        decision_id: DecisionId,
        author: UserRef,
        message: String,
        created_at: Timestamp,
        status: ClarificationStatus,
    ) -> Self {
        Self {
            id,
            decision_id,
            author,
            message,
            created_at,
            status,
        }
    }

    pub fn id(&self) -> ClarificationId {
        self.id
    }

    pub fn decision_id(&self) -> DecisionId {
        self.decision_id
    }

    pub fn author(&self) -> &UserRef {
        &self.author
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn status(&self) -> ClarificationStatus {
        self.status
    }

    pub fn ignore(&mut self) -> Result<(), WorkflowError> {
        self.status = self.status.transition_to(ClarificationStatus::Ignored)?;
        Ok(())
    }

    /// Records that the owner acted on the feedback. No content changes.
    pub fn apply(&mut self) -> Result<(), WorkflowError> {
        self.status = self.status.transition_to(ClarificationStatus::Applied)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn author() -> UserRef {
        UserRef::new(UserId::from_raw(2), "bob").unwrap()
    }

    #[test]
    fn blank_message_is_rejected() {
        let result = Clarification::new(
            ClarificationId::from_raw(1),
            DecisionId::from_raw(1),
            author(),
            "  \n",
        );
        assert_eq!(result, Err(ValidationError::empty_field("message")));
    }

    #[test]
    fn apply_is_terminal() {
        let mut c = Clarification::new(
            ClarificationId::from_raw(1),
            DecisionId::from_raw(1),
            author(),
            "What is the salary gap?",
        )
        .unwrap();

        c.apply().unwrap();
        assert_eq!(c.status(), ClarificationStatus::Applied);
        assert!(c.ignore().is_err());
        assert!(c.apply().is_err());
    }
}
