//! RequestClarificationHandler - Command handler for asking the owner to
//! explain part of a decision.

use std::sync::Arc;

use crate::domain::activity::ActionType;
use crate::domain::contribution::Clarification;
use crate::domain::foundation::{
    Capability, ClarificationId, CommandMetadata, DecisionId, WorkflowError,
};
use crate::ports::{IdSequence, WorkflowStore};

use super::super::support::{authorize, load_decision, record_action};

/// Command to request a clarification.
#[derive(Debug, Clone)]
pub struct RequestClarificationCommand {
    pub decision_id: DecisionId,
    pub message: String,
}

/// Handler for clarification requests.
pub struct RequestClarificationHandler {
    store: Arc<dyn WorkflowStore>,
}

impl RequestClarificationHandler {
    pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: RequestClarificationCommand,
        metadata: CommandMetadata,
    ) -> Result<Clarification, WorkflowError> {
        let author = metadata.actor.require_user()?.clone();

        let mut unit = self.store.begin().await?;
        let decision = load_decision(unit.as_mut(), cmd.decision_id).await?;
        authorize(&metadata.actor, &decision, Capability::Contribute, "request_clarification")?;

        let id = ClarificationId::from_raw(unit.next_id(IdSequence::Clarification).await?);
        let clarification = Clarification::new(id, decision.id(), author.clone(), &cmd.message)?;
        unit.insert_clarification(&clarification).await?;
        record_action(unit.as_mut(), &author, decision.id(), ActionType::Clarification).await?;
        unit.commit().await?;

        tracing::info!(
            decision_id = %decision.id(),
            clarification_id = %id,
            author = %author,
            correlation_id = metadata.correlation_id(),
            "clarification requested"
        );
        Ok(clarification)
    }
}
