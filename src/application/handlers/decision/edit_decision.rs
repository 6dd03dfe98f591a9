//! EditDecisionHandler - Command handler for owner edits to a decision.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::decision::{DecisionRecord, DecisionStatus};
use crate::domain::foundation::{
    Capability, CommandMetadata, DecisionId, Timestamp, WorkflowError,
};
use crate::domain::stage::StageId;
use crate::ports::WorkflowStore;

use super::super::support::{authorize, load_decision};

/// Command to edit a decision. Only supplied fields change.
#[derive(Debug, Clone)]
pub struct EditDecisionCommand {
    pub decision_id: DecisionId,
    pub title: Option<String>,
    /// `Some("")` clears the description.
    pub description: Option<String>,
    /// `Some(None)` clears the deadline.
    pub deadline: Option<Option<Timestamp>>,
    pub is_public: Option<bool>,
    pub status: Option<DecisionStatus>,
    pub current_stage: Option<String>,
    /// Replacement text per stage key; each supplied slot is overwritten.
    pub stage_entries: BTreeMap<String, String>,
}

impl EditDecisionCommand {
    pub fn for_decision(decision_id: DecisionId) -> Self {
        Self {
            decision_id,
            title: None,
            description: None,
            deadline: None,
            is_public: None,
            status: None,
            current_stage: None,
            stage_entries: BTreeMap::new(),
        }
    }
}

/// Result of a successful edit.
#[derive(Debug, Clone)]
pub struct EditDecisionResult {
    pub decision: DecisionRecord,
}

/// Handler for editing decisions.
pub struct EditDecisionHandler {
    store: Arc<dyn WorkflowStore>,
}

impl EditDecisionHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: EditDecisionCommand,
        metadata: CommandMetadata,
    ) -> Result<EditDecisionResult, WorkflowError> {
        // Stage keys are checked up front so a bad key changes nothing
        let stage = cmd
            .current_stage
            .as_deref()
            .map(str::parse::<StageId>)
            .transpose()?;
        let entries: Vec<(StageId, String)> = cmd
            .stage_entries
            .into_iter()
            .map(|(key, text)| -> Result<_, WorkflowError> { Ok((key.parse::<StageId>()?, text)) })
            .collect::<Result<_, _>>()?;

        let mut unit = self.store.begin().await?;
        let mut decision = load_decision(unit.as_mut(), cmd.decision_id).await?;
        authorize(&metadata.actor, &decision, Capability::Manage, "edit_decision")?;

        if let Some(title) = &cmd.title {
            decision.rename(title)?;
        }
        if let Some(description) = cmd.description {
            decision.set_description(Some(description));
        }
        if let Some(deadline) = cmd.deadline {
            decision.set_deadline(deadline);
        }
        if let Some(is_public) = cmd.is_public {
            decision.set_visibility(is_public);
        }
        if let Some(status) = cmd.status {
            decision.set_status(status);
        }
        if let Some(stage) = stage {
            decision.move_to_stage(stage);
        }
        for (stage, text) in entries {
            decision.set_stage_text(stage, text);
        }

        unit.update_decision(&decision).await?;
        unit.commit().await?;

        tracing::info!(
            decision_id = %decision.id(),
            actor = %metadata.actor,
            correlation_id = metadata.correlation_id(),
            "decision edited"
        );

        Ok(EditDecisionResult { decision })
    }
}
