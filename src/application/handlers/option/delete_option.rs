//! DeleteOptionHandler - Command handler for removing an option.

use std::sync::Arc;

use crate::domain::foundation::{Capability, CommandMetadata, OptionId, WorkflowError};
use crate::ports::{DecisionChild, WorkflowStore};

use super::super::support::{authorize, load_parent};

/// Command to delete an option.
#[derive(Debug, Clone)]
pub struct DeleteOptionCommand {
    pub option_id: OptionId,
}

/// Handler for deleting options.
pub struct DeleteOptionHandler {
    store: Arc<dyn WorkflowStore>,
}

impl DeleteOptionHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: DeleteOptionCommand,
        metadata: CommandMetadata,
    ) -> Result<(), WorkflowError> {
        let mut unit = self.store.begin().await?;
        let decision = load_parent(unit.as_mut(), DecisionChild::Option(cmd.option_id)).await?;
        let option = unit
            .find_option(cmd.option_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Option", cmd.option_id.as_i64()))?;
        authorize(&metadata.actor, &decision, Capability::Manage, "delete_option")?;

        unit.delete_option(option.id()).await?;
        unit.commit().await?;

        tracing::debug!(decision_id = %decision.id(), option_id = %option.id(), "option deleted");
        Ok(())
    }
}
