//! SubmitSuggestionHandler - Command handler for proposing a whole option on
//! someone else's public decision.

use std::sync::Arc;

use crate::domain::activity::ActionType;
use crate::domain::contribution::Suggestion;
use crate::domain::decision::OptionDetails;
use crate::domain::foundation::{
    Capability, CommandMetadata, DecisionId, SuggestionId, WorkflowError,
};
use crate::ports::{IdSequence, WorkflowStore};

use super::super::support::{authorize, load_decision, record_action, validated};

/// Command to submit a suggestion.
#[derive(Debug, Clone)]
pub struct SubmitSuggestionCommand {
    pub decision_id: DecisionId,
    pub details: OptionDetails,
}

/// Handler for submitting suggestions.
pub struct SubmitSuggestionHandler {
    store: Arc<dyn WorkflowStore>,
}

impl SubmitSuggestionHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: SubmitSuggestionCommand,
        metadata: CommandMetadata,
    ) -> Result<Suggestion, WorkflowError> {
        let author = metadata.actor.require_user()?.clone();
        let details = validated(cmd.details)?;

        let mut unit = self.store.begin().await?;
        let decision = load_decision(unit.as_mut(), cmd.decision_id).await?;
        authorize(&metadata.actor, &decision, Capability::Contribute, "submit_suggestion")?;

        let id = SuggestionId::from_raw(unit.next_id(IdSequence::Suggestion).await?);
        let suggestion = Suggestion::new(id, decision.id(), author.clone(), details);
        unit.insert_suggestion(&suggestion).await?;
        record_action(unit.as_mut(), &author, decision.id(), ActionType::Suggestion).await?;
        unit.commit().await?;

        tracing::info!(
            decision_id = %decision.id(),
            suggestion_id = %id,
            author = %author,
            "suggestion submitted"
        );
        Ok(suggestion)
    }
}
