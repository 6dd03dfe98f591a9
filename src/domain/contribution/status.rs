//! Review statuses for contributions.
//!
//! ```text
//! Suggestion / StageSuggestion      Clarification
//!
//!   Pending ──► Accepted              Pending ──► Applied
//!      │                                 │
//!      └──────► Ignored                  └──────► Ignored
//! ```
//!
//! Every non-pending state is terminal.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{StateMachine, ValidationError, WorkflowError};

/// Lifecycle of suggestions and stage suggestions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Accepted,
    Ignored,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Accepted => "accepted",
            ReviewStatus::Ignored => "ignored",
        }
    }

    pub fn is_pending(&self) -> bool {
        *self == ReviewStatus::Pending
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReviewStatus::Pending),
            "accepted" => Ok(ReviewStatus::Accepted),
            "ignored" => Ok(ReviewStatus::Ignored),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown review status '{}'", other),
            )),
        }
    }
}

impl StateMachine for ReviewStatus {
    const ENTITY: &'static str = "Suggestion";

    fn valid_transitions(&self) -> Vec<Self> {
        use ReviewStatus::*;
        match self {
            Pending => vec![Accepted, Ignored],
            Accepted | Ignored => vec![],
        }
    }
}

/// Lifecycle of clarification requests.
///
/// `Applied` only records that the owner used the feedback; it never edits
/// content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClarificationStatus {
    #[default]
    Pending,
    Ignored,
    Applied,
}

impl ClarificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClarificationStatus::Pending => "pending",
            ClarificationStatus::Ignored => "ignored",
            ClarificationStatus::Applied => "applied",
        }
    }

    pub fn is_pending(&self) -> bool {
        *self == ClarificationStatus::Pending
    }
}

impl fmt::Display for ClarificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClarificationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ClarificationStatus::Pending),
            "ignored" => Ok(ClarificationStatus::Ignored),
            "applied" => Ok(ClarificationStatus::Applied),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown clarification status '{}'", other),
            )),
        }
    }
}

impl StateMachine for ClarificationStatus {
    const ENTITY: &'static str = "Clarification";

    fn valid_transitions(&self) -> Vec<Self> {
        use ClarificationStatus::*;
        match self {
            Pending => vec![Ignored, Applied],
            Ignored | Applied => vec![],
        }
    }
}

/// Re-labels a transition error with the entity actually being moved.
pub(crate) fn relabel(err: WorkflowError, entity: &'static str) -> WorkflowError {
    match err {
        WorkflowError::InvalidTransition { from, to, .. } => {
            WorkflowError::InvalidTransition { entity, from, to }
        }
        other => other,
    }
}
