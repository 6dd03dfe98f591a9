//! DeleteDecisionHandler - Command handler for removing a decision and
//! everything that references it.

use std::sync::Arc;

use crate::domain::foundation::{Capability, CommandMetadata, DecisionId, WorkflowError};
use crate::ports::{CascadeSummary, WorkflowStore};

use super::super::support::{authorize, load_decision};

/// Command to delete a decision.
#[derive(Debug, Clone)]
pub struct DeleteDecisionCommand {
    pub decision_id: DecisionId,
}

/// Result of a cascade delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteDecisionResult {
    pub decision_id: DecisionId,
    /// Dependent rows removed per table.
    pub removed: CascadeSummary,
}

/// Handler for deleting decisions.
pub struct DeleteDecisionHandler {
    store: Arc<dyn WorkflowStore>,
}

impl DeleteDecisionHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: DeleteDecisionCommand,
        metadata: CommandMetadata,
    ) -> Result<DeleteDecisionResult, WorkflowError> {
        let mut unit = self.store.begin().await?;
        let decision = load_decision(unit.as_mut(), cmd.decision_id).await?;
        authorize(&metadata.actor, &decision, Capability::Manage, "delete_decision")?;

        let removed = unit.delete_decision(decision.id()).await?;
        unit.commit().await?;

        tracing::info!(
            decision_id = %decision.id(),
            actor = %metadata.actor,
            dependents = removed.dependents(),
            correlation_id = metadata.correlation_id(),
            "decision deleted"
        );

        Ok(DeleteDecisionResult {
            decision_id: decision.id(),
            removed,
        })
    }
}
