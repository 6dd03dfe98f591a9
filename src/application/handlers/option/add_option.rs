//! AddOptionHandler - Command handler for the owner adding an option.

use std::sync::Arc;

use crate::domain::decision::{DecisionOption, OptionDetails};
use crate::domain::foundation::{Capability, CommandMetadata, DecisionId, OptionId, WorkflowError};
use crate::ports::{IdSequence, WorkflowStore};

use super::super::support::{authorize, load_decision, validated};

/// Command to add an option.
#[derive(Debug, Clone)]
pub struct AddOptionCommand {
    pub decision_id: DecisionId,
    pub details: OptionDetails,
}

/// Handler for adding options.
pub struct AddOptionHandler {
    store: Arc<dyn WorkflowStore>,
}

impl AddOptionHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: AddOptionCommand,
        metadata: CommandMetadata,
    ) -> Result<DecisionOption, WorkflowError> {
        let details = validated(cmd.details)?;

        let mut unit = self.store.begin().await?;
        let decision = load_decision(unit.as_mut(), cmd.decision_id).await?;
        authorize(&metadata.actor, &decision, Capability::Manage, "add_option")?;

        let id = OptionId::from_raw(unit.next_id(IdSequence::Option).await?);
        let option = DecisionOption::new(id, decision.id(), details);
        unit.insert_option(&option).await?;
        unit.commit().await?;

        tracing::debug!(decision_id = %decision.id(), option_id = %id, "option added");
        Ok(option)
    }
}
