//! Whole-decision alternative proposals.

use serde::{Deserialize, Serialize};

use crate::domain::decision::{DecisionOption, OptionDetails};
use crate::domain::foundation::{
    DecisionId, OptionId, StateMachine, SuggestionId, Timestamp, UserRef, WorkflowError,
};

use super::ReviewStatus;

/// An option proposed by someone other than the decision owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    id: SuggestionId,
    decision_id: DecisionId,
    author: UserRef,
    details: OptionDetails,
    created_at: Timestamp,
    status: ReviewStatus,
}

impl Suggestion {
    /// Creates a pending suggestion.
    pub fn new(
        id: SuggestionId,
        decision_id: DecisionId,
        author: UserRef,
        details: OptionDetails,
    ) -> Self {
        Self {
            id,
            decision_id,
            author,
            details,
            created_at: Timestamp::now(),
            status: ReviewStatus::Pending,
        }
    }

    pub fn reconstitute(
        id: SuggestionId,
        decision_id: DecisionId,
        author: UserRef,
        details: OptionDetails,
        created_at: Timestamp,
        status: ReviewStatus,
    ) -> Self {
        Self {
            id,
            decision_id,
            author,
            details,
            created_at,
            status,
        }
    }

    pub fn id(&self) -> SuggestionId {
        self.id
    }

    pub fn decision_id(&self) -> DecisionId {
        self.decision_id
    }

    pub fn author(&self) -> &UserRef {
        &self.author
    }

    pub fn details(&self) -> &OptionDetails {
        &self.details
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn status(&self) -> ReviewStatus {
        self.status
    }

    /// Marks the suggestion accepted and returns the option it becomes.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the suggestion was already reviewed
    pub fn accept(&mut self, option_id: OptionId) -> Result<DecisionOption, WorkflowError> {
        self.status = self.status.transition_to(ReviewStatus::Accepted)?;
        Ok(DecisionOption::new(
            option_id,
            self.decision_id,
            self.details.clone(),
        ))
    }

    /// # Errors
    ///
    /// - `InvalidTransition` if the suggestion was already reviewed
    pub fn ignore(&mut self) -> Result<(), WorkflowError> {
        self.status = self.status.transition_to(ReviewStatus::Ignored)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn suggestion() -> Suggestion {
        Suggestion::new(
            SuggestionId::from_raw(1),
            DecisionId::from_raw(7),
            UserRef::new(UserId::from_raw(2), "bob").unwrap(),
            OptionDetails::new("Freelance", "Go solo", "Flexibility", "Income risk").unwrap(),
        )
    }

    #[test]
    fn accept_copies_fields_into_option() {
        let mut s = suggestion();
        let option = s.accept(OptionId::from_raw(3)).unwrap();

        assert_eq!(s.status(), ReviewStatus::Accepted);
        assert_eq!(option.decision_id(), DecisionId::from_raw(7));
        assert_eq!(option.details(), s.details());
    }

    #[test]
    fn second_accept_fails() {
        let mut s = suggestion();
        s.accept(OptionId::from_raw(3)).unwrap();
        let err = s.accept(OptionId::from_raw(4)).unwrap_err();
        assert!(matches!(err, WorkflowError::InvalidTransition { entity: "Suggestion", .. }));
    }

    #[test]
    fn ignored_cannot_be_accepted() {
        let mut s = suggestion();
        s.ignore().unwrap();
        assert!(s.accept(OptionId::from_raw(3)).is_err());
        assert_eq!(s.status(), ReviewStatus::Ignored);
    }
}
