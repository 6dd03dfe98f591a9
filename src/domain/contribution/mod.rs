//! Contribution module - input from users other than the decision owner.
//!
//! - [`Suggestion`] proposes a whole alternative; accepting it creates an option
//! - [`Clarification`] asks the owner for more detail; purely informational
//! - [`StageSuggestion`] proposes text for one stage; accepting it merges

mod clarification;
mod stage_suggestion;
mod status;
mod suggestion;

pub use clarification::Clarification;
pub use stage_suggestion::StageSuggestion;
pub use status::{ClarificationStatus, ReviewStatus};
pub use suggestion::Suggestion;
