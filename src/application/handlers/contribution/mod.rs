//! Contribution command handlers: suggestions, clarifications and stage
//! proposals, plus the owner's review of each.

mod request_clarification;
mod resolve_clarification;
mod review_stage_suggestion;
mod review_suggestion;
mod submit_stage_suggestion;
mod submit_suggestion;

use serde::{Deserialize, Serialize};

pub use request_clarification::{RequestClarificationCommand, RequestClarificationHandler};
pub use resolve_clarification::{ResolveClarificationCommand, ResolveClarificationHandler};
pub use review_stage_suggestion::{
    ReviewStageSuggestionCommand, ReviewStageSuggestionHandler, ReviewStageSuggestionResult,
};
pub use review_suggestion::{
    ReviewSuggestionCommand, ReviewSuggestionHandler, ReviewSuggestionResult,
};
pub use submit_stage_suggestion::{SubmitStageSuggestionCommand, SubmitStageSuggestionHandler};
pub use submit_suggestion::{SubmitSuggestionCommand, SubmitSuggestionHandler};

/// The owner's verdict on a suggestion or stage proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewVerdict {
    Accept,
    Ignore,
}

/// How the owner closes a clarification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClarificationResolution {
    Ignore,
    Apply,
}
