//! Decision reader port (read side / listing and analytics queries).
//!
//! Queries here run outside any unit of work and never lock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::activity::ActionLogEntry;
use crate::domain::analytics::DecisionFacts;
use crate::domain::decision::{DecisionRecord, DecisionStatus};
use crate::domain::foundation::{DecisionId, DomainError, Timestamp, UserId, UserRef};
use crate::domain::stage::StageId;

/// Reader port for decision listings.
#[async_trait]
pub trait DecisionReader: Send + Sync {
    /// Decisions owned by `owner`, newest first.
    async fn list_owned(
        &self,
        owner: UserId,
        category: Option<&str>,
    ) -> Result<Vec<DecisionSummary>, DomainError>;

    /// Public decisions, newest first, optionally excluding one owner's.
    async fn list_public(
        &self,
        exclude_owner: Option<UserId>,
        category: Option<&str>,
    ) -> Result<Vec<DecisionSummary>, DomainError>;

    /// Distinct non-empty categories across all decisions, sorted.
    async fn categories(&self) -> Result<Vec<String>, DomainError>;

    /// Pending contributions on decisions owned by `owner`.
    async fn pending_counts(&self, owner: UserId) -> Result<PendingCounts, DomainError>;

    /// Everything interaction aggregation needs, actions in log order.
    /// Decisions and actions come from one consistent point in time.
    async fn analytics_snapshot(&self) -> Result<AnalyticsSnapshot, DomainError>;
}

/// List row for a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub id: DecisionId,
    pub title: String,
    pub owner: UserRef,
    pub category: String,
    pub status: DecisionStatus,
    pub current_stage: StageId,
    pub is_public: bool,
    pub deadline: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<&DecisionRecord> for DecisionSummary {
    fn from(d: &DecisionRecord) -> Self {
        Self {
            id: d.id(),
            title: d.title().to_string(),
            owner: d.owner().clone(),
            category: d.category().to_string(),
            status: d.status(),
            current_stage: d.current_stage(),
            is_public: d.is_public(),
            deadline: d.deadline().copied(),
            created_at: *d.created_at(),
        }
    }
}

/// Items awaiting the owner's review.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCounts {
    pub suggestions: u64,
    pub clarifications: u64,
}

/// Decisions and the full action log at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub decisions: Vec<DecisionFacts>,
    pub actions: Vec<ActionLogEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn DecisionReader) {}
    }
}
