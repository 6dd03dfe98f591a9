//! ReviewSuggestionHandler - Command handler for accepting or ignoring a
//! suggestion. Accepting turns it into an option in the same unit of work.

use std::sync::Arc;

use crate::domain::contribution::Suggestion;
use crate::domain::decision::DecisionOption;
use crate::domain::foundation::{
    Capability, CommandMetadata, OptionId, SuggestionId, WorkflowError,
};
use crate::ports::{DecisionChild, IdSequence, WorkflowStore};

use super::super::support::{authorize, load_parent};
use super::ReviewVerdict;

/// Command to review a suggestion.
#[derive(Debug, Clone)]
pub struct ReviewSuggestionCommand {
    pub suggestion_id: SuggestionId,
    pub verdict: ReviewVerdict,
}

/// Result of a review.
#[derive(Debug, Clone)]
pub struct ReviewSuggestionResult {
    pub suggestion: Suggestion,
    /// The option created on accept.
    pub option: Option<DecisionOption>,
}

/// Handler for reviewing suggestions.
pub struct ReviewSuggestionHandler {
    store: Arc<dyn WorkflowStore>,
}

impl ReviewSuggestionHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: ReviewSuggestionCommand,
        metadata: CommandMetadata,
    ) -> Result<ReviewSuggestionResult, WorkflowError> {
        let mut unit = self.store.begin().await?;
        let decision =
            load_parent(unit.as_mut(), DecisionChild::Suggestion(cmd.suggestion_id)).await?;
        let mut suggestion = unit
            .find_suggestion(cmd.suggestion_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Suggestion", cmd.suggestion_id.as_i64()))?;
        authorize(&metadata.actor, &decision, Capability::Manage, "review_suggestion")?;

        let option = match cmd.verdict {
            ReviewVerdict::Accept => {
                let id = OptionId::from_raw(unit.next_id(IdSequence::Option).await?);
                let option = suggestion.accept(id)?;
                unit.insert_option(&option).await?;
                Some(option)
            }
            ReviewVerdict::Ignore => {
                suggestion.ignore()?;
                None
            }
        };

        unit.update_suggestion(&suggestion).await?;
        unit.commit().await?;

        tracing::info!(
            decision_id = %decision.id(),
            suggestion_id = %suggestion.id(),
            status = suggestion.status().as_str(),
            actor = %metadata.actor,
            "suggestion reviewed"
        );

        Ok(ReviewSuggestionResult { suggestion, option })
    }
}
