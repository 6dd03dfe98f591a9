//! Decision assistant port - text-completion collaborators.
//!
//! The workflow asks a handful of narrow questions. Which provider answers
//! them is an adapter concern chosen by configuration.
//!
//! Callers never propagate an [`AssistError`]: classification falls back to
//! the default category, option ideas fall back to rule-based ideas, option
//! refinement and description rewrites fall back to canned text, and stage
//! text reports itself unavailable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::decision::{DecisionRecord, OptionDetails};
use crate::domain::stage::StageId;

/// Text-completion collaborator.
#[async_trait]
pub trait DecisionAssistant: Send + Sync {
    /// Classifies a decision title into a short category (1-3 words).
    async fn classify(&self, title: &str) -> Result<String, AssistError>;

    /// Drafts text for one stage of a decision.
    async fn suggest_text(&self, request: &StageTextRequest) -> Result<String, AssistError>;

    /// Proposes distinct options for a decision.
    async fn suggest_options(
        &self,
        request: &OptionIdeasRequest,
    ) -> Result<Vec<OptionDetails>, AssistError>;

    /// Fills in description, pros and cons for an option the owner named.
    async fn refine_option(&self, request: &RefineOptionRequest)
        -> Result<OptionDetails, AssistError>;

    /// Rewrites a decision description to be clearer. Returns HTML.
    async fn clarify_description(
        &self,
        request: &ClarifyDescriptionRequest,
    ) -> Result<String, AssistError>;

    /// Provider name for logs.
    fn name(&self) -> &str;
}

/// Context for a stage text draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTextRequest {
    pub decision_title: String,
    pub decision_description: Option<String>,
    pub stage: StageId,
    pub current_content: String,
}

impl StageTextRequest {
    pub fn for_decision(decision: &DecisionRecord, stage: StageId) -> Self {
        Self {
            decision_title: decision.title().to_string(),
            decision_description: decision.description().map(str::to_string),
            stage,
            current_content: decision.stage_text(stage).to_string(),
        }
    }
}

/// Context for option ideas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionIdeasRequest {
    pub decision_title: String,
    pub decision_description: Option<String>,
    pub count: usize,
}

impl OptionIdeasRequest {
    pub fn for_decision(decision: &DecisionRecord, count: usize) -> Self {
        Self {
            decision_title: decision.title().to_string(),
            decision_description: decision.description().map(str::to_string),
            count,
        }
    }
}

/// Context for fleshing out one option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefineOptionRequest {
    pub decision_title: String,
    pub decision_description: Option<String>,
    pub option_title: String,
}

impl RefineOptionRequest {
    pub fn for_decision(decision: &DecisionRecord, option_title: impl Into<String>) -> Self {
        Self {
            decision_title: decision.title().to_string(),
            decision_description: decision.description().map(str::to_string),
            option_title: option_title.into(),
        }
    }
}

/// Title and draft description to rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarifyDescriptionRequest {
    pub title: String,
    pub description: String,
}

/// Why the assistant could not answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssistError {
    /// No provider configured.
    #[error("assistant disabled")]
    Disabled,

    /// Provider reachable but refused or failed.
    #[error("provider unavailable: {0}")]
    Unavailable(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Provider answered with something unusable.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DecisionId, UserId, UserRef};

    #[test]
    fn decision_assistant_is_object_safe() {
        fn _accepts_dyn(_assistant: &dyn DecisionAssistant) {}
    }

    #[test]
    fn stage_text_request_copies_decision_context() {
        let mut decision = DecisionRecord::new(
            DecisionId::from_raw(1),
            UserRef::new(UserId::from_raw(1), "alice").unwrap(),
            "Which car?",
            "Shopping",
        )
        .unwrap()
        .with_description(Some("Family of four".to_string()));
        decision.set_stage_text(StageId::Options, "Hybrid or EV");

        let request = StageTextRequest::for_decision(&decision, StageId::Options);
        assert_eq!(request.decision_title, "Which car?");
        assert_eq!(request.decision_description.as_deref(), Some("Family of four"));
        assert_eq!(request.current_content, "Hybrid or EV");
    }

    #[test]
    fn errors_display_reason() {
        assert_eq!(
            AssistError::Timeout { timeout_secs: 30 }.to_string(),
            "request timed out after 30s"
        );
    }
}
