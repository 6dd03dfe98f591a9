//! SubmitStageSuggestionHandler - Command handler for proposing text for one
//! stage of someone else's decision.

use std::sync::Arc;

use crate::domain::activity::ActionType;
use crate::domain::contribution::StageSuggestion;
use crate::domain::foundation::{
    Capability, CommandMetadata, DecisionId, StageSuggestionId, WorkflowError,
};
use crate::domain::stage::StageId;
use crate::ports::{IdSequence, WorkflowStore};

use super::super::support::{authorize, load_decision, record_action};

/// Command to propose stage text.
#[derive(Debug, Clone)]
pub struct SubmitStageSuggestionCommand {
    pub decision_id: DecisionId,
    pub stage_key: String,
    pub content: String,
}

/// Handler for stage proposals.
pub struct SubmitStageSuggestionHandler {
    store: Arc<dyn WorkflowStore>,
}

impl SubmitStageSuggestionHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: SubmitStageSuggestionCommand,
        metadata: CommandMetadata,
    ) -> Result<StageSuggestion, WorkflowError> {
        let author = metadata.actor.require_user()?.clone();
        let stage: StageId = cmd.stage_key.parse()?;

        let mut unit = self.store.begin().await?;
        let decision = load_decision(unit.as_mut(), cmd.decision_id).await?;
        authorize(
            &metadata.actor,
            &decision,
            Capability::ProposeStageEdit,
            "submit_stage_suggestion",
        )?;

        let id = StageSuggestionId::from_raw(unit.next_id(IdSequence::StageSuggestion).await?);
        let proposal = StageSuggestion::new(id, decision.id(), author.clone(), stage, cmd.content)?;
        unit.insert_stage_suggestion(&proposal).await?;
        record_action(unit.as_mut(), &author, decision.id(), ActionType::StageSuggestion).await?;
        unit.commit().await?;

        tracing::info!(
            decision_id = %decision.id(),
            stage_suggestion_id = %id,
            stage = %stage,
            author = %author,
            "stage suggestion submitted"
        );
        Ok(proposal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryWorkflowStore;
    use crate::application::handlers::testing::{alice, anonymous, as_user, bob, seed_decision};
    use crate::domain::contribution::ReviewStatus;
    use crate::domain::stage::EMPTY_RICH_TEXT;

    fn cmd(decision_id: DecisionId, key: &str, content: &str) -> SubmitStageSuggestionCommand {
        SubmitStageSuggestionCommand {
            decision_id,
            stage_key: key.to_string(),
            content: content.to_string(),
        }
    }

    #[tokio::test]
    async fn non_owner_proposes_on_private_decision() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Quiet plan", false).await;

        let proposal = SubmitStageSuggestionHandler::new(Arc::new(store.clone()))
            .handle(cmd(id, "6_evaluation", "<p>Cost matters most</p>"), as_user(bob()))
            .await
            .unwrap();

        assert_eq!(proposal.stage(), StageId::Evaluation);
        assert_eq!(proposal.status(), ReviewStatus::Pending);
        let last = store.actions().await.pop().unwrap();
        assert_eq!(last.action_type(), ActionType::StageSuggestion);
    }

    #[tokio::test]
    async fn empty_editor_content_is_rejected() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", true).await;

        let err = SubmitStageSuggestionHandler::new(Arc::new(store))
            .handle(cmd(id, "2_framing", EMPTY_RICH_TEXT), as_user(bob()))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Validation { .. }));
    }

    #[tokio::test]
    async fn unknown_stage_key_is_rejected() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", true).await;

        let err = SubmitStageSuggestionHandler::new(Arc::new(store))
            .handle(cmd(id, "11_afterthoughts", "<p>x</p>"), as_user(bob()))
            .await
            .unwrap_err();

        assert_eq!(err, WorkflowError::UnknownStage("11_afterthoughts".to_string()));
    }

    #[tokio::test]
    async fn owner_and_anonymous_are_rejected() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", true).await;
        let handler = SubmitStageSuggestionHandler::new(Arc::new(store));

        for metadata in [as_user(alice()), anonymous()] {
            let err = handler
                .handle(cmd(id, "2_framing", "<p>x</p>"), metadata)
                .await
                .unwrap_err();
            assert!(matches!(err, WorkflowError::Forbidden(_)));
        }
    }
}
