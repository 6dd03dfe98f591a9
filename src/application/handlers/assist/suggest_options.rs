//! SuggestOptionsHandler - Query handler for option ideas.
//!
//! Falls back to canned, theme-keyed ideas whenever the assistant cannot
//! answer, so the caller always gets something to show.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::assist::rule_based_ideas;
use crate::domain::decision::OptionDetails;
use crate::domain::foundation::{Capability, CommandMetadata, DecisionId, WorkflowError};
use crate::ports::{DecisionAssistant, OptionIdeasRequest, WorkflowStore};

use super::super::support::{authorize, load_decision};

/// Ideas requested per call.
pub const IDEA_COUNT: usize = 3;

/// Query for option ideas.
#[derive(Debug, Clone)]
pub struct SuggestOptionsQuery {
    pub decision_id: DecisionId,
}

/// Where the ideas came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaSource {
    Assistant,
    RuleBased,
}

/// Ideas for the owner to pick from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionIdeas {
    pub source: IdeaSource,
    pub ideas: Vec<OptionDetails>,
}

/// Handler for option ideas.
pub struct SuggestOptionsHandler {
    store: Arc<dyn WorkflowStore>,
    assistant: Arc<dyn DecisionAssistant>,
}

impl SuggestOptionsHandler {
    pub fn new(store: Arc<dyn WorkflowStore>, assistant: Arc<dyn DecisionAssistant>) -> Self {
        Self { store, assistant }
    }

    pub async fn handle(
        &self,
        query: SuggestOptionsQuery,
        metadata: CommandMetadata,
    ) -> Result<OptionIdeas, WorkflowError> {
        let request = {
            let mut unit = self.store.begin().await?;
            let decision = load_decision(unit.as_mut(), query.decision_id).await?;
            authorize(&metadata.actor, &decision, Capability::Manage, "suggest_options")?;
            OptionIdeasRequest::for_decision(&decision, IDEA_COUNT)
        };

        match self.assistant.suggest_options(&request).await {
            Ok(ideas) if !ideas.is_empty() => Ok(OptionIdeas {
                source: IdeaSource::Assistant,
                ideas: ideas.into_iter().take(IDEA_COUNT).collect(),
            }),
            outcome => {
                let reason = match outcome {
                    Err(e) => e.to_string(),
                    Ok(_) => "no ideas returned".to_string(),
                };
                tracing::warn!(
                    decision_id = %query.decision_id,
                    provider = self.assistant.name(),
                    reason = %reason,
                    "option ideas assistant unavailable, using rule-based ideas"
                );
                Ok(OptionIdeas {
                    source: IdeaSource::RuleBased,
                    ideas: rule_based_ideas(
                        &request.decision_title,
                        request.decision_description.as_deref(),
                    ),
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

    #[tokio::test]
    async fn assistant_ideas_are_returned() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", true).await;
        let ideas = vec![
            OptionDetails::titled("Bike").unwrap(),
            OptionDetails::titled("Bus").unwrap(),
        ];
        let assistant = ScriptedAssistant::new().with_options(ideas.clone());

        let result = SuggestOptionsHandler::new(Arc::new(store), Arc::new(assistant.clone()))
            .handle(SuggestOptionsQuery { decision_id: id }, as_user(alice()))
            .await
            .unwrap();

        assert_eq!(result.source, IdeaSource::Assistant);
        assert_eq!(result.ideas, ideas);
        assert_eq!(assistant.calls(), vec![ScriptedCall::SuggestOptions(IDEA_COUNT)]);
    }

    #[tokio::test]
    async fn failure_falls_back_to_vehicle_ideas() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car should I buy?", true).await;
        let assistant =
            ScriptedAssistant::new().with_options_error(AssistError::Network("reset".into()));

        let result = SuggestOptionsHandler::new(Arc::new(store), Arc::new(assistant))
            .handle(SuggestOptionsQuery { decision_id: id }, as_user(alice()))
            .await
            .unwrap();

        assert_eq!(result.source, IdeaSource::RuleBased);
        assert_eq!(result.ideas.len(), 3);
        assert_eq!(result.ideas[0].title, "Buy a used hybrid");
    }

    #[tokio::test]
    async fn non_owner_is_forbidden() {
        let store = InMemoryWorkflowStore::new();
        let id = seed_decision(&store, alice(), "Which car?", true).await;

        let err = SuggestOptionsHandler::new(Arc::new(store), Arc::new(ScriptedAssistant::new()))
            .handle(SuggestOptionsQuery { decision_id: id }, as_user(bob()))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }
}
