//! EditOptionHandler - Command handler for replacing an option's fields.

use std::sync::Arc;

use crate::domain::decision::{DecisionOption, OptionDetails};
use crate::domain::foundation::{Capability, CommandMetadata, OptionId, WorkflowError};
use crate::ports::{DecisionChild, WorkflowStore};

use super::super::support::{authorize, load_parent, validated};

/// Command to edit an option.
#[derive(Debug, Clone)]
pub struct EditOptionCommand {
    pub option_id: OptionId,
    pub details: OptionDetails,
}

/// Handler for editing options.
pub struct EditOptionHandler {
    store: Arc<dyn WorkflowStore>,
}

impl EditOptionHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: EditOptionCommand,
        metadata: CommandMetadata,
    ) -> Result<DecisionOption, WorkflowError> {
        let details = validated(cmd.details)?;

        let mut unit = self.store.begin().await?;
        let decision = load_parent(unit.as_mut(), DecisionChild::Option(cmd.option_id)).await?;
        let mut option = unit
            .find_option(cmd.option_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Option", cmd.option_id.as_i64()))?;
        authorize(&metadata.actor, &decision, Capability::Manage, "edit_option")?;

        option.update(details);
        unit.update_option(&option).await?;
        unit.commit().await?;

        Ok(option)
    }
}
