//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state transitions
//! across contribution lifecycle statuses (Suggestion, Clarification, StageSuggestion).

use std::fmt::{Debug, Display};

use super::WorkflowError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ReviewStatus {
///     const ENTITY: &'static str = "Suggestion";
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Pending => vec![Accepted, Ignored],
///             Accepted | Ignored => vec![],
///         }
///     }
/// }
///
/// let next = current.transition_to(ReviewStatus::Accepted)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + Debug + Display {
    /// Entity name used in transition errors.
    const ENTITY: &'static str;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    /// Performs transition with validation.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if `target` is not reachable from `self`
    fn transition_to(&self, target: Self) -> Result<Self, WorkflowError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(WorkflowError::InvalidTransition {
                entity: Self::ENTITY,
                from: self.to_string(),
                to: target.to_string(),
            })
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestStatus {
        Draft,
        Active,
        Done,
    }

    impl fmt::Display for TestStatus {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{:?}", self)
        }
    }

    impl StateMachine for TestStatus {
        const ENTITY: &'static str = "Test";

        fn valid_transitions(&self) -> Vec<Self> {
            use TestStatus::*;
            match self {
                Draft => vec![Active],
                Active => vec![Done],
                Done => vec![],
            }
        }
    }

    #[test]
    fn transition_to_succeeds_for_valid_transition() {
        assert_eq!(
            TestStatus::Draft.transition_to(TestStatus::Active),
            Ok(TestStatus::Active)
        );
    }

    #[test]
    fn transition_to_fails_for_invalid_transition() {
        let err = TestStatus::Draft.transition_to(TestStatus::Done).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::InvalidTransition {
                entity: "Test",
                from: "Draft".to_string(),
                to: "Done".to_string(),
            }
        );
    }

    #[test]
    fn is_terminal_only_for_states_without_exits() {
        assert!(TestStatus::Done.is_terminal());
        assert!(!TestStatus::Draft.is_terminal());
    }
}
