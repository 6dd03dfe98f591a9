//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors, the actor model and the
//! capability check that form the vocabulary of the deliberation domain.

mod actor;
mod authorization;
mod command;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use actor::{Actor, UserRef};
pub use authorization::{
    check_admin, check_capability, Authorizable, AuthorizationResult, Capability,
};
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError, WorkflowError};
pub use ids::{
    ActionId, ClarificationId, DecisionId, OptionId, StageSuggestionId, SuggestionId, UserId,
};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
