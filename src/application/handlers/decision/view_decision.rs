//! ViewDecisionHandler - Query handler that opens a decision for reading.
//!
//! Viewing is not side-effect free: every authenticated view appends a `read`
//! entry to the action log.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::activity::ActionType;
use crate::domain::contribution::{Clarification, StageSuggestion, Suggestion};
use crate::domain::decision::{DecisionOption, DecisionRecord};
use crate::domain::foundation::{Capability, CommandMetadata, DecisionId, WorkflowError};
use crate::ports::WorkflowStore;

use super::super::support::{authorize, load_decision, record_action};

/// Query to view a decision.
#[derive(Debug, Clone)]
pub struct ViewDecisionQuery {
    pub decision_id: DecisionId,
}

/// A decision with everything attached to it.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionView {
    pub decision: DecisionRecord,
    pub options: Vec<DecisionOption>,
    pub suggestions: Vec<Suggestion>,
    pub clarifications: Vec<Clarification>,
    pub stage_suggestions: Vec<StageSuggestion>,
}

/// Handler for viewing decisions.
pub struct ViewDecisionHandler {
    store: Arc<dyn WorkflowStore>,
}

impl ViewDecisionHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: ViewDecisionQuery,
        metadata: CommandMetadata,
    ) -> Result<DecisionView, WorkflowError> {
        let mut unit = self.store.begin().await?;
        let decision = load_decision(unit.as_mut(), query.decision_id).await?;
        authorize(&metadata.actor, &decision, Capability::View, "view_decision")?;

        let view = DecisionView {
            options: unit.list_options(decision.id()).await?,
            suggestions: unit.list_suggestions(decision.id()).await?,
            clarifications: unit.list_clarifications(decision.id()).await?,
            stage_suggestions: unit.list_stage_suggestions(decision.id()).await?,
            decision,
        };

        if let Some(reader) = metadata.actor.user_ref() {
            record_action(unit.as_mut(), reader, view.decision.id(), ActionType::Read).await?;
            unit.commit().await?;
        }

        tracing::debug!(
            decision_id = %view.decision.id(),
            actor = %metadata.actor,
            "decision viewed"
        );
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryWorkflowStore;
    use crate::application::handlers::testing::{
        alice, anonymous, as_admin, as_user, bob, root, seed_decision,
    };

    fn handler(store: &InMemoryWorkflowStore) -> ViewDecisionHandler {
        ViewDecisionHandler::new(Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn owner_can_view_private_decision() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Private matter", false).await;

        let view = handler(&store)
            .handle(ViewDecisionQuery { decision_id: id }, as_user(alice()))
            .await
            .unwrap();

        assert_eq!(view.decision.title(), "Private matter");
        assert!(view.options.is_empty());
    }

    #[tokio::test]
    async fn anonymous_cannot_view_private_decision() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Private matter", false).await;

        let err = handler(&store)
            .handle(ViewDecisionQuery { decision_id: id }, anonymous())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn admin_is_not_exempt_from_private_view_rule() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Private matter", false).await;

        let err = handler(&store)
            .handle(ViewDecisionQuery { decision_id: id }, as_admin(root()))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }

    #[tokio::test]
    async fn every_authenticated_view_appends_read() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", true).await;
        let handler = handler(&store);

        for _ in 0..2 {
            handler
                .handle(ViewDecisionQuery { decision_id: id }, as_user(bob()))
                .await
                .unwrap();
        }
        handler
            .handle(ViewDecisionQuery { decision_id: id }, as_user(alice()))
            .await
            .unwrap();

        let reads: Vec<_> = store
            .actions()
            .await
            .into_iter()
            .filter(|a| a.action_type() == ActionType::Read)
            .collect();
        assert_eq!(reads.len(), 3);
        assert_eq!(reads.iter().filter(|a| a.user() == &bob()).count(), 2);
    }

    #[tokio::test]
    async fn anonymous_view_of_public_decision_logs_nothing() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", true).await;
        let before = store.actions().await.len();

        handler(&store)
            .handle(ViewDecisionQuery { decision_id: id }, anonymous())
            .await
            .unwrap();

        assert_eq!(store.actions().await.len(), before);
    }
}
