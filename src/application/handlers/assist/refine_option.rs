//! RefineOptionHandler - Query handler that fleshes out an option the owner
//! has only named.
//!
//! Nothing is stored. The owner reviews the details and adds the option
//! through `AddOptionHandler` if they like it.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::assist::refined_option_fallback;
use crate::domain::decision::OptionDetails;
use crate::domain::foundation::{Capability, CommandMetadata, DecisionId, WorkflowError};
use crate::ports::{DecisionAssistant, RefineOptionRequest, WorkflowStore};

use super::super::support::{authorize, load_decision};
use super::IdeaSource;

/// Query for details about one named option.
#[derive(Debug, Clone)]
pub struct RefineOptionQuery {
    pub decision_id: DecisionId,
    pub option_title: String,
}

/// Suggested details for the named option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefinedOption {
    pub source: IdeaSource,
    pub details: OptionDetails,
}

/// Handler for option refinement.
pub struct RefineOptionHandler {
    store: Arc<dyn WorkflowStore>,
    assistant: Arc<dyn DecisionAssistant>,
}

impl RefineOptionHandler {
    pub fn new(store: Arc<dyn WorkflowStore>, assistant: Arc<dyn DecisionAssistant>) -> Self {
        Self { store, assistant }
    }

    pub async fn handle(
        &self,
        query: RefineOptionQuery,
        metadata: CommandMetadata,
    ) -> Result<RefinedOption, WorkflowError> {
        let option_title = OptionDetails::titled(query.option_title)?.title;

        let request = {
            let mut unit = self.store.begin().await?;
            let decision = load_decision(unit.as_mut(), query.decision_id).await?;
            authorize(&metadata.actor, &decision, Capability::Manage, "refine_option")?;
            RefineOptionRequest::for_decision(&decision, option_title)
        };

        match self.assistant.refine_option(&request).await {
            Ok(details) => Ok(RefinedOption {
                source: IdeaSource::Assistant,
                details,
            }),
            Err(e) => {
                tracing::warn!(
                    decision_id = %query.decision_id,
                    provider = self.assistant.name(),
                    reason = %e,
                    "option refinement unavailable, using placeholder details"
                );
                Ok(RefinedOption {
                    source: IdeaSource::RuleBased,
                    details: refined_option_fallback(
                        &request.option_title,
                        &request.decision_title,
                    ),
                })
            }
        }
    }
}
