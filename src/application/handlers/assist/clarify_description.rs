//! ClarifyDescriptionHandler - Query handler that rewrites a decision
//! description for the owner.
//!
//! The owner may pass the title and description they are still editing;
//! missing fields come from the stored decision. Nothing is stored.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::assist::clarified_description_fallback;
use crate::domain::foundation::{Capability, CommandMetadata, DecisionId, WorkflowError};
use crate::ports::{ClarifyDescriptionRequest, DecisionAssistant, WorkflowStore};

use super::super::support::{authorize, load_decision};
use super::IdeaSource;

/// Query for a clearer description.
#[derive(Debug, Clone)]
pub struct ClarifyDescriptionQuery {
    pub decision_id: DecisionId,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Rewritten description as HTML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClarifiedDescription {
    pub source: IdeaSource,
    pub html: String,
}

/// Handler for description rewrites.
pub struct ClarifyDescriptionHandler {
    store: Arc<dyn WorkflowStore>,
    assistant: Arc<dyn DecisionAssistant>,
}

impl ClarifyDescriptionHandler {
    pub fn new(store: Arc<dyn WorkflowStore>, assistant: Arc<dyn DecisionAssistant>) -> Self {
        Self { store, assistant }
    }

    pub async fn handle(
        &self,
        query: ClarifyDescriptionQuery,
        metadata: CommandMetadata,
    ) -> Result<ClarifiedDescription, WorkflowError> {
        let request = {
            let mut unit = self.store.begin().await?;
            let decision = load_decision(unit.as_mut(), query.decision_id).await?;
            authorize(
                &metadata.actor,
                &decision,
                Capability::Manage,
                "clarify_description",
            )?;
            ClarifyDescriptionRequest {
                title: query
                    .title
                    .unwrap_or_else(|| decision.title().to_string()),
                description: query
                    .description
                    .unwrap_or_else(|| decision.description().unwrap_or("").to_string()),
            }
        };

        match self.assistant.clarify_description(&request).await {
            Ok(html) => Ok(ClarifiedDescription {
                source: IdeaSource::Assistant,
                html,
            }),
            Err(e) => {
                tracing::warn!(
                    decision_id = %query.decision_id,
                    provider = self.assistant.name(),
                    reason = %e,
                    "description rewrite unavailable, returning draft with note"
                );
                Ok(ClarifiedDescription {
                    source: IdeaSource::RuleBased,
                    html: clarified_description_fallback(&request.description),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::assistant::ScriptedCall;
    use crate::adapters::{InMemoryWorkflowStore, ScriptedAssistant};
    use crate::application::handlers::testing::{alice, as_user, bob, seed_decision};
    use crate::ports::AssistError;

    fn query(decision_id: DecisionId) -> ClarifyDescriptionQuery {
        ClarifyDescriptionQuery {
            decision_id,
            title: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn assistant_rewrite_is_returned() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", true).await;
        let assistant = ScriptedAssistant::new().with_rewrite("<p>Pick a family car.</p>");

        let result = ClarifyDescriptionHandler::new(Arc::new(store), Arc::new(assistant.clone()))
            .handle(query(id), as_user(alice()))
            .await
            .unwrap();

        assert_eq!(result.source, IdeaSource::Assistant);
        assert_eq!(result.html, "<p>Pick a family car.</p>");
        assert_eq!(
            assistant.calls(),
            vec![ScriptedCall::ClarifyDescription("Which car?".to_string())]
        );
    }

    #[tokio::test]
    async fn draft_fields_override_stored_values() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", true).await;
        let assistant =
            ScriptedAssistant::new().with_rewrite_error(AssistError::Network("reset".into()));

        let result = ClarifyDescriptionHandler::new(Arc::new(store), Arc::new(assistant.clone()))
            .handle(
                ClarifyDescriptionQuery {
                    decision_id: id,
                    title: Some("Which family car?".to_string()),
                    description: Some("need car".to_string()),
                },
                as_user(alice()),
            )
            .await
            .unwrap();

        assert_eq!(result.source, IdeaSource::RuleBased);
        assert_eq!(
            result.html,
            "<p>need car</p><p><em>(Note: AI clarification unavailable. Consider adding more \
             context about the goals, constraints, and stakeholders involved in this \
             decision.)</em></p>"
        );
        assert_eq!(
            assistant.calls(),
            vec![ScriptedCall::ClarifyDescription("Which family car?".to_string())]
        );
    }

    #[tokio::test]
    async fn non_owner_is_forbidden() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", true).await;
        let assistant = ScriptedAssistant::new();

        let err = ClarifyDescriptionHandler::new(Arc::new(store), Arc::new(assistant.clone()))
            .handle(query(id), as_user(bob()))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Forbidden(_)));
        assert!(assistant.calls().is_empty());
    }
}
