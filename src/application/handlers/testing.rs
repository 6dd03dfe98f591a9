//! Fixtures shared by handler tests.

use std::sync::Arc;

use crate::adapters::{InMemoryWorkflowStore, ScriptedAssistant};
use crate::domain::decision::DecisionRecord;
use crate::domain::foundation::{Actor, CommandMetadata, DecisionId, UserId, UserRef};
use crate::ports::{WorkflowStore, WorkflowUnit};

use super::decision::{CreateDecisionCommand, CreateDecisionHandler};

pub(crate) fn alice() -> UserRef {
    UserRef::new(UserId::from_raw(1), "alice").unwrap()
}

pub(crate) fn bob() -> UserRef {
    UserRef::new(UserId::from_raw(2), "bob").unwrap()
}

pub(crate) fn carol() -> UserRef {
    UserRef::new(UserId::from_raw(3), "carol").unwrap()
}

pub(crate) fn root() -> UserRef {
    UserRef::new(UserId::from_raw(99), "root").unwrap()
}

pub(crate) fn as_user(user: UserRef) -> CommandMetadata {
    CommandMetadata::new(Actor::user(user))
}

pub(crate) fn as_admin(user: UserRef) -> CommandMetadata {
    CommandMetadata::new(Actor::admin(user))
}

pub(crate) fn anonymous() -> CommandMetadata {
    CommandMetadata::anonymous()
}

/// Creates a decision through the real handler and returns its id.
pub(crate) async fn seed_decision(
    store: &InMemoryWorkflowStore,
    owner: UserRef,
    title: &str,
    is_public: bool,
) -> DecisionId {
    let handler = CreateDecisionHandler::new(
        Arc::new(store.clone()),
        Arc::new(ScriptedAssistant::new().with_category("General")),
    );
    let cmd = CreateDecisionCommand {
        is_public,
        ..CreateDecisionCommand::titled(title)
    };
    handler.handle(cmd, as_user(owner)).await.unwrap().decision.id()
}

/// Reads the committed decision back.
pub(crate) async fn stored_decision(store: &InMemoryWorkflowStore, id: DecisionId) -> DecisionRecord {
    let mut unit: Box<dyn WorkflowUnit> = store.begin().await.unwrap();
    unit.find_decision(id).await.unwrap().unwrap()
}
