//! Activity module - the append-only interaction log.
//!
//! Rows are never edited. They disappear only when their decision is deleted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ActionId, DecisionId, Timestamp, UserRef, ValidationError};

/// Kind of interaction recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// The user created a decision.
    Asked,
    /// The user opened a decision.
    Read,
    Suggestion,
    Clarification,
    StageSuggestion,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Asked => "asked",
            ActionType::Read => "read",
            ActionType::Suggestion => "suggestion",
            ActionType::Clarification => "clarification",
            ActionType::StageSuggestion => "stage_suggestion",
        }
    }

    /// Suggestions and clarifications count towards high interaction.
    pub fn is_feedback(&self) -> bool {
        matches!(self, ActionType::Suggestion | ActionType::Clarification)
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asked" => Ok(ActionType::Asked),
            "read" => Ok(ActionType::Read),
            "suggestion" => Ok(ActionType::Suggestion),
            "clarification" => Ok(ActionType::Clarification),
            "stage_suggestion" => Ok(ActionType::StageSuggestion),
            other => Err(ValidationError::invalid_format(
                "action_type",
                format!("unknown action type '{}'", other),
            )),
        }
    }
}

/// One row of the action log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLogEntry {
    id: ActionId,
    user: UserRef,
    decision_id: DecisionId,
    action_type: ActionType,
    timestamp: Timestamp,
}

impl ActionLogEntry {
    pub fn new(
        id: ActionId,
        user: UserRef,
        decision_id: DecisionId,
        action_type: ActionType,
    ) -> Self {
        Self {
            id,
            user,
            decision_id,
            action_type,
            timestamp: Timestamp::now(),
        }
    }

    pub fn reconstitute(
        id: ActionId,
        user: UserRef,
        decision_id: DecisionId,
        action_type: ActionType,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id,
            user,
            decision_id,
            action_type,
            timestamp,
        }
    }

    pub fn id(&self) -> ActionId {
        self.id
    }

    pub fn user(&self) -> &UserRef {
        &self.user
    }

    pub fn decision_id(&self) -> DecisionId {
        self.decision_id
    }

    pub fn action_type(&self) -> ActionType {
        self.action_type
    }

    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }
}
