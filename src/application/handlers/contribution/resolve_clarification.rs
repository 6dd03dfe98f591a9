//! ResolveClarificationHandler - Command handler for the owner closing a
//! clarification request.

use std::sync::Arc;

use crate::domain::contribution::Clarification;
use crate::domain::foundation::{Capability, ClarificationId, CommandMetadata, WorkflowError};
use crate::ports::{DecisionChild, WorkflowStore};

use super::super::support::{authorize, load_parent};
use super::ClarificationResolution;

/// Command to resolve a clarification.
#[derive(Debug, Clone)]
pub struct ResolveClarificationCommand {
    pub clarification_id: ClarificationId,
    pub resolution: ClarificationResolution,
}

/// Handler for resolving clarifications.
pub struct ResolveClarificationHandler {
    store: Arc<dyn WorkflowStore>,
}

impl ResolveClarificationHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: ResolveClarificationCommand,
        metadata: CommandMetadata,
    ) -> Result<Clarification, WorkflowError> {
        let mut unit = self.store.begin().await?;
        let decision = load_parent(
            unit.as_mut(),
            DecisionChild::Clarification(cmd.clarification_id),
        )
        .await?;
        let mut clarification = unit
            .find_clarification(cmd.clarification_id)
            .await?
            .ok_or_else(|| {
                WorkflowError::not_found("Clarification", cmd.clarification_id.as_i64())
            })?;
        authorize(&metadata.actor, &decision, Capability::Manage, "resolve_clarification")?;

        match cmd.resolution {
            ClarificationResolution::Ignore => clarification.ignore()?,
            ClarificationResolution::Apply => clarification.apply()?,
        }
        unit.update_clarification(&clarification).await?;
        unit.commit().await?;

        tracing::info!(
            decision_id = %decision.id(),
            clarification_id = %clarification.id(),
            status = clarification.status().as_str(),
            "clarification resolved"
        );
        Ok(clarification)
    }
}
