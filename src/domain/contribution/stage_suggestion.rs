//! Proposed edits to a single stage.

use serde::{Deserialize, Serialize};

use crate::domain::decision::DecisionRecord;
use crate::domain::foundation::{
    DecisionId, StageSuggestionId, StateMachine, Timestamp, UserRef, ValidationError,
    WorkflowError,
};
use crate::domain::stage::{is_blank, StageId};

use super::status::relabel;
use super::ReviewStatus;

const ENTITY: &str = "StageSuggestion";

/// Rich-text proposed for one stage of someone else's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSuggestion {
    id: StageSuggestionId,
    decision_id: DecisionId,
    author: UserRef,
    stage: StageId,
    content: String,
    created_at: Timestamp,
    status: ReviewStatus,
}

impl StageSuggestion {
    /// Creates a pending stage suggestion.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the content is blank (including an empty editor)
    pub fn new(
        id: StageSuggestionId,
        decision_id: DecisionId,
        author: UserRef,
        stage: StageId,
        content: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let content = content.into();
        if is_blank(&content) {
            return Err(ValidationError::empty_field("content"));
        }
        Ok(Self {
            id,
            decision_id,
            author,
            stage,
            content,
            created_at: Timestamp::now(),
            status: ReviewStatus::Pending,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: StageSuggestionId,
        decision_id: DecisionId,
        author: UserRef,
        stage: StageId,
        content: String,
        created_at: Timestamp,
        status: ReviewStatus,
    ) -> Self {
        Self {
            id,
            decision_id,
            author,
            stage,
            content,
            created_at,
            status,
        }
    }

    pub fn id(&self) -> StageSuggestionId {
        self.id
    }

    pub fn decision_id(&self) -> DecisionId {
        self.decision_id
    }

    pub fn author(&self) -> &UserRef {
        &self.author
    }

    pub fn stage(&self) -> StageId {
        self.stage
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn status(&self) -> ReviewStatus {
        self.status
    }

    /// Merges the proposal into the decision and marks it accepted.
    ///
    /// The status check happens before the decision is touched, so a failed
    /// accept leaves both untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if already reviewed
    /// - `Validation` if `decision` is not the one this suggestion targets
    pub fn accept_into(&mut self, decision: &mut DecisionRecord) -> Result<(), WorkflowError> {
        if decision.id() != self.decision_id {
            return Err(WorkflowError::validation(
                "decision_id",
                format!(
                    "stage suggestion {} targets decision {}, not {}",
                    self.id,
                    self.decision_id,
                    decision.id()
                ),
            ));
        }
        let next = self
            .status
            .transition_to(ReviewStatus::Accepted)
            .map_err(|e| relabel(e, ENTITY))?;

        decision.merge_into_stage(self.stage, &self.content, self.author.username());
        self.status = next;
        Ok(())
    }

    pub fn ignore(&mut self) -> Result<(), WorkflowError> {
        self.status = self
            .status
            .transition_to(ReviewStatus::Ignored)
            .map_err(|e| relabel(e, ENTITY))?;
        Ok(())
    }
}
