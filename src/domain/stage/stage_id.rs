//! The closed set of deliberation stages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::foundation::WorkflowError;

/// One of the ten fixed phases a decision moves through.
///
/// Declaration order is progression order. Progression is advisory: a
/// decision may jump to any stage.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum StageId {
    #[default]
    #[serde(rename = "1_trigger")]
    Trigger,
    #[serde(rename = "2_framing")]
    Framing,
    #[serde(rename = "3_objectives")]
    Objectives,
    #[serde(rename = "4_options")]
    Options,
    #[serde(rename = "5_information")]
    Information,
    #[serde(rename = "6_evaluation")]
    Evaluation,
    #[serde(rename = "7_emotions")]
    Emotions,
    #[serde(rename = "8_commitment")]
    Commitment,
    #[serde(rename = "9_execution")]
    Execution,
    #[serde(rename = "10_review")]
    Review,
}

impl StageId {
    /// Number of stages.
    pub const COUNT: usize = 10;

    /// All stages in progression order.
    pub const ALL: [StageId; StageId::COUNT] = [
        StageId::Trigger,
        StageId::Framing,
        StageId::Objectives,
        StageId::Options,
        StageId::Information,
        StageId::Evaluation,
        StageId::Emotions,
        StageId::Commitment,
        StageId::Execution,
        StageId::Review,
    ];

    /// The storage / wire key, e.g. `"6_evaluation"`.
    pub fn key(&self) -> &'static str {
        match self {
            StageId::Trigger => "1_trigger",
            StageId::Framing => "2_framing",
            StageId::Objectives => "3_objectives",
            StageId::Options => "4_options",
            StageId::Information => "5_information",
            StageId::Evaluation => "6_evaluation",
            StageId::Emotions => "7_emotions",
            StageId::Commitment => "8_commitment",
            StageId::Execution => "9_execution",
            StageId::Review => "10_review",
        }
    }

    /// Zero-based position in progression order.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The following stage, if any.
    pub fn next(&self) -> Option<StageId> {
        StageId::ALL.get(self.index() + 1).copied()
    }

    /// The preceding stage, if any.
    pub fn previous(&self) -> Option<StageId> {
        self.index().checked_sub(1).map(|i| StageId::ALL[i])
    }

    pub fn is_first(&self) -> bool {
        *self == StageId::Trigger
    }

    pub fn is_last(&self) -> bool {
        *self == StageId::Review
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A stage key outside the fixed catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown stage key '{key}'")]
pub struct UnknownStageError {
    pub key: String,
}

impl UnknownStageError {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl From<UnknownStageError> for WorkflowError {
    fn from(err: UnknownStageError) -> Self {
        WorkflowError::UnknownStage(err.key)
    }
}

impl FromStr for StageId {
    type Err = UnknownStageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageId::ALL
            .iter()
            .find(|stage| stage.key() == s)
            .copied()
            .ok_or_else(|| UnknownStageError::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_round_trip_through_from_str() {
        for stage in StageId::ALL {
            assert_eq!(stage.key().parse::<StageId>(), Ok(stage));
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = "11_regret".parse::<StageId>().unwrap_err();
        assert_eq!(err.key, "11_regret");

        let workflow: WorkflowError = err.into();
        assert_eq!(workflow, WorkflowError::UnknownStage("11_regret".to_string()));
    }

    #[test]
    fn keys_are_case_sensitive() {
        assert!("1_TRIGGER".parse::<StageId>().is_err());
    }

    #[test]
    fn order_follows_progression() {
        assert!(StageId::Trigger < StageId::Framing);
        assert!(StageId::Execution < StageId::Review);
        assert_eq!(StageId::Review.index(), 9);
    }

    #[test]
    fn next_and_previous_stop_at_the_ends() {
        assert_eq!(StageId::Trigger.previous(), None);
        assert_eq!(StageId::Trigger.next(), Some(StageId::Framing));
        assert_eq!(StageId::Review.next(), None);
        assert_eq!(StageId::Review.previous(), Some(StageId::Execution));
    }

    #[test]
    fn serializes_as_storage_key() {
        let json = serde_json::to_string(&StageId::Evaluation).unwrap();
        assert_eq!(json, "\"6_evaluation\"");

        let back: StageId = serde_json::from_str("\"10_review\"").unwrap();
        assert_eq!(back, StageId::Review);
    }
}
