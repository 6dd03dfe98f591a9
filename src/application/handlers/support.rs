//! Steps shared by the workflow handlers.

use crate::domain::activity::{ActionLogEntry, ActionType};
use crate::domain::decision::{DecisionRecord, OptionDetails};
use crate::domain::foundation::{
    check_capability, ActionId, Actor, Capability, DecisionId, UserRef, WorkflowError,
};
use crate::ports::{DecisionChild, IdSequence, WorkflowUnit};

/// Loads a decision inside the unit or fails with `NotFound`.
pub(crate) async fn load_decision(
    unit: &mut dyn WorkflowUnit,
    id: DecisionId,
) -> Result<DecisionRecord, WorkflowError> {
    unit.find_decision(id)
        .await?
        .ok_or_else(|| WorkflowError::not_found("Decision", id.as_i64()))
}

/// Loads and locks the decision that owns `child`, before the child itself
/// is locked. Fails with `NotFound` naming the child when it does not exist.
pub(crate) async fn load_parent(
    unit: &mut dyn WorkflowUnit,
    child: DecisionChild,
) -> Result<DecisionRecord, WorkflowError> {
    let decision_id = unit
        .parent_of(child)
        .await?
        .ok_or_else(|| WorkflowError::not_found(child.resource(), child.raw_id()))?;
    load_decision(unit, decision_id).await
}

/// Runs the capability check, logging the verdict under `action`.
pub(crate) fn authorize(
    actor: &Actor,
    decision: &DecisionRecord,
    capability: Capability,
    action: &str,
) -> Result<(), WorkflowError> {
    let verdict = check_capability(actor, decision, capability);
    verdict.log(action);
    verdict.into_result()
}

/// Appends one action-log row in the same unit.
pub(crate) async fn record_action(
    unit: &mut dyn WorkflowUnit,
    user: &UserRef,
    decision: DecisionId,
    action_type: ActionType,
) -> Result<(), WorkflowError> {
    let id = ActionId::from_raw(unit.next_id(IdSequence::Action).await?);
    let entry = ActionLogEntry::new(id, user.clone(), decision, action_type);
    unit.append_action(&entry).await?;
    Ok(())
}

/// Re-validates option fields that may have been built without
/// [`OptionDetails::new`].
pub(crate) fn validated(details: OptionDetails) -> Result<OptionDetails, WorkflowError> {
    Ok(OptionDetails::new(
        details.title,
        details.description,
        details.pros,
        details.cons,
    )?)
}
