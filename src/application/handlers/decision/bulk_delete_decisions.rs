//! BulkDeleteDecisionsHandler - Administrator command removing many
//! decisions in one unit of work.

use std::sync::Arc;

use crate::domain::foundation::{check_admin, CommandMetadata, DecisionId, WorkflowError};
use crate::ports::{CascadeSummary, WorkflowStore};

/// Command to delete several decisions.
#[derive(Debug, Clone)]
pub struct BulkDeleteDecisionsCommand {
    pub decision_ids: Vec<DecisionId>,
}

/// Result of a bulk delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDeleteDecisionsResult {
    pub deleted: Vec<DecisionId>,
    /// Ids that did not exist.
    pub skipped: Vec<DecisionId>,
    pub removed: CascadeSummary,
}

/// Handler for bulk deletes.
pub struct BulkDeleteDecisionsHandler {
    store: Arc<dyn WorkflowStore>,
}

impl BulkDeleteDecisionsHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: BulkDeleteDecisionsCommand,
        metadata: CommandMetadata,
    ) -> Result<BulkDeleteDecisionsResult, WorkflowError> {
        let verdict = check_admin(&metadata.actor, "Decision");
        verdict.log("bulk_delete_decisions");
        verdict.into_result()?;

        let mut ids = cmd.decision_ids;
        ids.sort();
        ids.dedup();

        let mut unit = self.store.begin().await?;
        let mut deleted = Vec::new();
        let mut skipped = Vec::new();
        let mut removed = CascadeSummary::default();

        for id in ids {
            if unit.find_decision(id).await?.is_none() {
                skipped.push(id);
                continue;
            }
            removed.absorb(unit.delete_decision(id).await?);
            deleted.push(id);
        }
        unit.commit().await?;

        tracing::info!(
            actor = %metadata.actor,
            deleted = deleted.len(),
            skipped = skipped.len(),
            correlation_id = metadata.correlation_id(),
            "decisions bulk deleted"
        );

        Ok(BulkDeleteDecisionsResult {
            deleted,
            skipped,
            removed,
        })
    }
}
