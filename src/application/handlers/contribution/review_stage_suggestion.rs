//! ReviewStageSuggestionHandler - Command handler for accepting or ignoring a
//! stage proposal.
//!
//! Accepting merges the proposal into the target stage: an empty slot takes
//! the proposal verbatim, otherwise it is appended below a separator with an
//! attribution line naming the author.

use std::sync::Arc;

use crate::domain::contribution::StageSuggestion;
use crate::domain::foundation::{Capability, CommandMetadata, StageSuggestionId, WorkflowError};
use crate::ports::{DecisionChild, WorkflowStore};

use super::super::support::{authorize, load_parent};
use super::ReviewVerdict;

/// Command to review a stage proposal.
#[derive(Debug, Clone)]
pub struct ReviewStageSuggestionCommand {
    pub stage_suggestion_id: StageSuggestionId,
    pub verdict: ReviewVerdict,
}

/// Result of a stage review.
#[derive(Debug, Clone)]
pub struct ReviewStageSuggestionResult {
    pub proposal: StageSuggestion,
    /// Stage text after the merge, on accept.
    pub merged_text: Option<String>,
}

/// Handler for reviewing stage proposals.
pub struct ReviewStageSuggestionHandler {
    store: Arc<dyn WorkflowStore>,
}

impl ReviewStageSuggestionHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: ReviewStageSuggestionCommand,
        metadata: CommandMetadata,
    ) -> Result<ReviewStageSuggestionResult, WorkflowError> {
        let mut unit = self.store.begin().await?;
        let mut decision = load_parent(
            unit.as_mut(),
            DecisionChild::StageSuggestion(cmd.stage_suggestion_id),
        )
        .await?;
        let mut proposal = unit
            .find_stage_suggestion(cmd.stage_suggestion_id)
            .await?
            .ok_or_else(|| {
                WorkflowError::not_found("StageSuggestion", cmd.stage_suggestion_id.as_i64())
            })?;
        authorize(&metadata.actor, &decision, Capability::Manage, "review_stage_suggestion")?;

        let merged_text = match cmd.verdict {
            ReviewVerdict::Accept => {
                proposal.accept_into(&mut decision)?;
                unit.update_decision(&decision).await?;
                Some(decision.stage_text(proposal.stage()).to_string())
            }
            ReviewVerdict::Ignore => {
                proposal.ignore()?;
                None
            }
        };

        unit.update_stage_suggestion(&proposal).await?;
        unit.commit().await?;

        tracing::info!(
            decision_id = %decision.id(),
            stage_suggestion_id = %proposal.id(),
            stage = %proposal.stage(),
            status = proposal.status().as_str(),
            "stage suggestion reviewed"
        );

        Ok(ReviewStageSuggestionResult {
            proposal,
            merged_text,
        })
    }
}
