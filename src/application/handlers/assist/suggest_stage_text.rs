//! SuggestStageTextHandler - Query handler that asks the assistant to draft
//! text for one stage. Nothing is persisted; the owner decides what to keep.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::foundation::{Capability, CommandMetadata, DecisionId, WorkflowError};
use crate::domain::stage::StageId;
use crate::ports::{DecisionAssistant, StageTextRequest, WorkflowStore};

use super::super::support::{authorize, load_decision};

/// Query for a stage draft.
#[derive(Debug, Clone)]
pub struct SuggestStageTextQuery {
    pub decision_id: DecisionId,
    pub stage_key: String,
}

/// What the assistant produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StageDraft {
    Drafted { stage: StageId, text: String },
    Unavailable { stage: StageId, reason: String },
}

impl StageDraft {
    pub fn text(&self) -> Option<&str> {
        match self {
            StageDraft::Drafted { text, .. } => Some(text),
            StageDraft::Unavailable { .. } => None,
        }
    }
}

/// Handler for stage drafts.
pub struct SuggestStageTextHandler {
    store: Arc<dyn WorkflowStore>,
    assistant: Arc<dyn DecisionAssistant>,
}

impl SuggestStageTextHandler {
    pub fn new(store: Arc<dyn WorkflowStore>, assistant: Arc<dyn DecisionAssistant>) -> Self {
        Self { store, assistant }
    }

    pub async fn handle(
        &self,
        query: SuggestStageTextQuery,
        metadata: CommandMetadata,
    ) -> Result<StageDraft, WorkflowError> {
        let stage: StageId = query.stage_key.parse()?;

        // Read-only unit, released before the provider call.
        let request = {
            let mut unit = self.store.begin().await?;
            let decision = load_decision(unit.as_mut(), query.decision_id).await?;
            authorize(&metadata.actor, &decision, Capability::Manage, "suggest_stage_text")?;
            StageTextRequest::for_decision(&decision, stage)
        };

        match self.assistant.suggest_text(&request).await {
            Ok(text) if !text.trim().is_empty() => {
                tracing::debug!(
                    decision_id = %query.decision_id,
                    stage = %stage,
                    provider = self.assistant.name(),
                    "stage text drafted"
                );
                Ok(StageDraft::Drafted { stage, text })
            }
            Ok(_) => Ok(Self::unavailable(query.decision_id, stage, "empty draft".to_string())),
            Err(e) => Ok(Self::unavailable(query.decision_id, stage, e.to_string())),
        }
    }

    fn unavailable(decision_id: DecisionId, stage: StageId, reason: String) -> StageDraft {
        tracing::warn!(
            decision_id = %decision_id,
            stage = %stage,
            reason = %reason,
            "stage text assistant unavailable"
        );
        StageDraft::Unavailable { stage, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::assistant::ScriptedCall;
    use crate::adapters::{InMemoryWorkflowStore, ScriptedAssistant};
    use crate::application::handlers::testing::{alice, as_admin, as_user, bob, root, seed_decision};
    use crate::ports::AssistError;

    fn query(decision_id: DecisionId, key: &str) -> SuggestStageTextQuery {
        SuggestStageTextQuery {
            decision_id,
            stage_key: key.to_string(),
        }
    }

    #[tokio::test]
    async fn owner_gets_draft() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", false).await;
        let assistant = ScriptedAssistant::new().with_stage_text("<p>List three criteria</p>");

        let draft = SuggestStageTextHandler::new(Arc::new(store), Arc::new(assistant.clone()))
            .handle(query(id, "3_objectives"), as_user(alice()))
            .await
            .unwrap();

        assert_eq!(draft.text(), Some("<p>List three criteria</p>"));
        assert_eq!(assistant.calls(), vec![ScriptedCall::SuggestText(StageId::Objectives)]);
    }

    #[tokio::test]
    async fn provider_failure_is_reported_unavailable() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", true).await;
        let assistant =
            ScriptedAssistant::new().with_stage_text_error(AssistError::Timeout { timeout_secs: 30 });

        let draft = SuggestStageTextHandler::new(Arc::new(store), Arc::new(assistant))
            .handle(query(id, "3_objectives"), as_admin(root()))
            .await
            .unwrap();

        assert!(matches!(draft, StageDraft::Unavailable { stage: StageId::Objectives, .. }));
        assert_eq!(draft.text(), None);
    }

    #[tokio::test]
    async fn non_owner_is_forbidden_before_any_call() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", true).await;
        let assistant = ScriptedAssistant::new().with_stage_text("ignored");

        let err = SuggestStageTextHandler::new(Arc::new(store), Arc::new(assistant.clone()))
            .handle(query(id, "3_objectives"), as_user(bob()))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Forbidden(_)));
        assert!(assistant.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_stage_is_rejected() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", true).await;

        let err = SuggestStageTextHandler::new(Arc::new(store), Arc::new(ScriptedAssistant::new()))
            .handle(query(id, "0_prelude"), as_user(alice()))
            .await
            .unwrap_err();

        assert_eq!(err, WorkflowError::UnknownStage("0_prelude".to_string()));
    }
}
