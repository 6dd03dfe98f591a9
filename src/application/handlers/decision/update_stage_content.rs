//! UpdateStageContentHandler - Command handler for the owner's direct
//! overwrite of one stage slot.

use std::sync::Arc;

use crate::domain::foundation::{Capability, CommandMetadata, DecisionId, WorkflowError};
use crate::domain::stage::StageId;
use crate::ports::WorkflowStore;

use super::super::support::{authorize, load_decision};

/// Command to overwrite one stage.
#[derive(Debug, Clone)]
pub struct UpdateStageContentCommand {
    pub decision_id: DecisionId,
    pub stage_key: String,
    pub content: String,
}

/// Result of a stage overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStageContentResult {
    pub decision_id: DecisionId,
    pub stage: StageId,
    pub content: String,
}

/// Handler for stage overwrites.
pub struct UpdateStageContentHandler {
    store: Arc<dyn WorkflowStore>,
}

impl UpdateStageContentHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: UpdateStageContentCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateStageContentResult, WorkflowError> {
        let stage: StageId = cmd.stage_key.parse()?;

        let mut unit = self.store.begin().await?;
        let mut decision = load_decision(unit.as_mut(), cmd.decision_id).await?;
        authorize(&metadata.actor, &decision, Capability::Manage, "update_stage_content")?;

        decision.set_stage_text(stage, cmd.content.clone());
        unit.update_decision(&decision).await?;
        unit.commit().await?;

        tracing::debug!(decision_id = %decision.id(), stage = %stage, "stage content updated");

        Ok(UpdateStageContentResult {
            decision_id: decision.id(),
            stage,
            content: cmd.content,
        })
    }
}
