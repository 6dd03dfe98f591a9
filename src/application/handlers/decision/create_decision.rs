//! CreateDecisionHandler - Command handler for opening a new decision.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::activity::ActionType;
use crate::domain::decision::{validate_title, DecisionRecord, DEFAULT_CATEGORY};
use crate::domain::foundation::{CommandMetadata, DecisionId, Timestamp, WorkflowError};
use crate::domain::stage::{StageContent, StageId};
use crate::ports::{DecisionAssistant, IdSequence, WorkflowStore};

use super::super::support::record_action;

/// Command to create a decision.
#[derive(Debug, Clone, Default)]
pub struct CreateDecisionCommand {
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<Timestamp>,
    /// Stage key to start at; the first stage when absent.
    pub initial_stage: Option<String>,
    pub is_public: bool,
    /// Initial text keyed by stage key. Missing stages start empty.
    pub stage_contents: BTreeMap<String, String>,
}

impl CreateDecisionCommand {
    /// A public decision with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_public: true,
            ..Default::default()
        }
    }
}

/// Result of successful decision creation.
#[derive(Debug, Clone)]
pub struct CreateDecisionResult {
    pub decision: DecisionRecord,
    /// False when the classifier failed and the default category was used.
    pub classified: bool,
}

/// Handler for creating decisions.
pub struct CreateDecisionHandler {
    store: Arc<dyn WorkflowStore>,
    assistant: Arc<dyn DecisionAssistant>,
}

impl CreateDecisionHandler {
    pub fn new(store: Arc<dyn WorkflowStore>, assistant: Arc<dyn DecisionAssistant>) -> Self {
        Self { store, assistant }
    }

    pub async fn handle(
        &self,
        cmd: CreateDecisionCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateDecisionResult, WorkflowError> {
        // 1. Caller must be signed in; input must be well formed
        let owner = metadata.actor.require_user()?.clone();
        validate_title(&cmd.title)?;
        let stage = match cmd.initial_stage.as_deref() {
            Some(key) => key.parse::<StageId>()?,
            None => StageId::default(),
        };
        let content = parse_stage_contents(&cmd.stage_contents)?;

        // 2. Classify; failure never aborts creation
        let (category, classified) = self.classify(&cmd.title).await;

        // 3. Persist decision and the `asked` entry together
        let mut unit = self.store.begin().await?;
        let id = DecisionId::from_raw(unit.next_id(IdSequence::Decision).await?);
        let decision = DecisionRecord::new(id, owner.clone(), &cmd.title, &category)?
            .with_description(cmd.description)
            .with_deadline(cmd.deadline)
            .with_stage(stage)
            .with_visibility(cmd.is_public)
            .with_content(content);

        unit.insert_decision(&decision).await?;
        record_action(unit.as_mut(), &owner, id, ActionType::Asked).await?;
        unit.commit().await?;

        tracing::info!(
            decision_id = %id,
            owner = %owner,
            category = decision.category(),
            correlation_id = metadata.correlation_id(),
            "decision created"
        );

        Ok(CreateDecisionResult {
            decision,
            classified,
        })
    }

    async fn classify(&self, title: &str) -> (String, bool) {
        match self.assistant.classify(title).await {
            Ok(category) if !category.trim().is_empty() => (category, true),
            Ok(_) => {
                tracing::warn!(
                    assistant = self.assistant.name(),
                    "classifier returned an empty category"
                );
                (DEFAULT_CATEGORY.to_string(), false)
            }
            Err(e) => {
                tracing::warn!(
                    assistant = self.assistant.name(),
                    error = %e,
                    "classification failed, using default category"
                );
                (DEFAULT_CATEGORY.to_string(), false)
            }
        }
    }
}

/// Parses keyed stage text, rejecting keys outside the catalog.
fn parse_stage_contents(
    entries: &BTreeMap<String, String>,
) -> Result<StageContent, WorkflowError> {
    let mut content = StageContent::empty();
    for (key, text) in entries {
        let stage: StageId = key.parse()?;
        content.set(stage, text.clone());
    }
    Ok(content)
}
