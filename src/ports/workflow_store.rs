//! Workflow store port (write side, unit of work).
//!
//! Every workflow operation runs inside exactly one [`WorkflowUnit`] obtained
//! from [`WorkflowStore::begin`]. Reads inside a unit see the unit's own
//! writes. Nothing is visible to other units until [`WorkflowUnit::commit`];
//! dropping a unit without committing discards every change it made.
//!
//! # Design
//!
//! - **Atomic multi-row changes**: accept-suggestion, merge and cascade
//!   delete touch several tables and must all-or-nothing
//! - **Serialized contention**: implementations lock what a unit reads, so two
//!   concurrent reviews of one contribution serialize and the second sees the
//!   terminal status
//! - **Parent first**: a unit locks the decision before any row under it.
//!   Handlers reach a child's decision through [`WorkflowUnit::parent_of`],
//!   which takes no lock
//! - **Store-allocated ids**: ids are drawn from per-table sequences

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::activity::ActionLogEntry;
use crate::domain::contribution::{Clarification, StageSuggestion, Suggestion};
use crate::domain::decision::{DecisionOption, DecisionRecord};
use crate::domain::foundation::{
    ClarificationId, DecisionId, DomainError, OptionId, StageSuggestionId, SuggestionId,
};

/// The id sequences a store allocates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdSequence {
    Decision,
    Option,
    Suggestion,
    Clarification,
    StageSuggestion,
    Action,
}

impl IdSequence {
    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            IdSequence::Decision => "decisions",
            IdSequence::Option => "options",
            IdSequence::Suggestion => "suggestions",
            IdSequence::Clarification => "clarifications",
            IdSequence::StageSuggestion => "stage_suggestions",
            IdSequence::Action => "action_log",
        }
    }
}

/// A row that belongs to exactly one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionChild {
    Option(OptionId),
    Suggestion(SuggestionId),
    Clarification(ClarificationId),
    StageSuggestion(StageSuggestionId),
}

impl DecisionChild {
    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            DecisionChild::Option(_) => IdSequence::Option.table(),
            DecisionChild::Suggestion(_) => IdSequence::Suggestion.table(),
            DecisionChild::Clarification(_) => IdSequence::Clarification.table(),
            DecisionChild::StageSuggestion(_) => IdSequence::StageSuggestion.table(),
        }
    }

    /// Resource name used in not-found errors.
    pub fn resource(&self) -> &'static str {
        match self {
            DecisionChild::Option(_) => "Option",
            DecisionChild::Suggestion(_) => "Suggestion",
            DecisionChild::Clarification(_) => "Clarification",
            DecisionChild::StageSuggestion(_) => "StageSuggestion",
        }
    }

    pub fn raw_id(&self) -> i64 {
        match self {
            DecisionChild::Option(id) => id.as_i64(),
            DecisionChild::Suggestion(id) => id.as_i64(),
            DecisionChild::Clarification(id) => id.as_i64(),
            DecisionChild::StageSuggestion(id) => id.as_i64(),
        }
    }
}

/// Rows removed by a cascading decision delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CascadeSummary {
    pub options: u64,
    pub suggestions: u64,
    pub clarifications: u64,
    pub stage_suggestions: u64,
    pub actions: u64,
}

impl CascadeSummary {
    /// Dependent rows removed, excluding the decision itself.
    pub fn dependents(&self) -> u64 {
        self.options + self.suggestions + self.clarifications + self.stage_suggestions + self.actions
    }

    /// Adds another summary's counts to this one.
    pub fn absorb(&mut self, other: CascadeSummary) {
        self.options += other.options;
        self.suggestions += other.suggestions;
        self.clarifications += other.clarifications;
        self.stage_suggestions += other.stage_suggestions;
        self.actions += other.actions;
    }
}

/// Factory for units of work.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
    /// Opens a new unit of work.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` if the store cannot start a transaction
    async fn begin(&self) -> Result<Box<dyn WorkflowUnit>, DomainError>;
}

/// One transactional scope over all workflow tables.
///
/// Implementations roll back on drop unless [`commit`](Self::commit) ran.
#[async_trait]
pub trait WorkflowUnit: Send {
    /// Draws the next id from a sequence.
    async fn next_id(&mut self, sequence: IdSequence) -> Result<i64, DomainError>;

    // ─────────────────────────────────────────────────────────────────────────
    // Decisions
    // ─────────────────────────────────────────────────────────────────────────

    /// Decision a child row belongs to, read without taking a lock.
    ///
    /// The parent link never changes, so the answer stays valid after the
    /// decision is locked.
    async fn parent_of(&mut self, child: DecisionChild) -> Result<Option<DecisionId>, DomainError>;

    /// Finds and locks a decision.
    async fn find_decision(&mut self, id: DecisionId)
        -> Result<Option<DecisionRecord>, DomainError>;

    async fn insert_decision(&mut self, decision: &DecisionRecord) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `DecisionNotFound` if no row matched
    async fn update_decision(&mut self, decision: &DecisionRecord) -> Result<(), DomainError>;

    /// Deletes a decision and every row referencing it.
    ///
    /// # Errors
    ///
    /// - `DecisionNotFound` if no row matched
    async fn delete_decision(&mut self, id: DecisionId) -> Result<CascadeSummary, DomainError>;

    // ─────────────────────────────────────────────────────────────────────────
    // Options
    // ─────────────────────────────────────────────────────────────────────────

    async fn find_option(&mut self, id: OptionId) -> Result<Option<DecisionOption>, DomainError>;

    /// Options of a decision in creation order.
    async fn list_options(&mut self, decision: DecisionId)
        -> Result<Vec<DecisionOption>, DomainError>;

    async fn insert_option(&mut self, option: &DecisionOption) -> Result<(), DomainError>;

    async fn update_option(&mut self, option: &DecisionOption) -> Result<(), DomainError>;

    async fn delete_option(&mut self, id: OptionId) -> Result<(), DomainError>;

    // ─────────────────────────────────────────────────────────────────────────
    // Contributions
    // ─────────────────────────────────────────────────────────────────────────

    async fn find_suggestion(&mut self, id: SuggestionId)
        -> Result<Option<Suggestion>, DomainError>;

    async fn list_suggestions(&mut self, decision: DecisionId)
        -> Result<Vec<Suggestion>, DomainError>;

    async fn insert_suggestion(&mut self, suggestion: &Suggestion) -> Result<(), DomainError>;

    async fn update_suggestion(&mut self, suggestion: &Suggestion) -> Result<(), DomainError>;

    async fn find_clarification(
        &mut self,
        id: ClarificationId,
    ) -> Result<Option<Clarification>, DomainError>;

    async fn list_clarifications(
        &mut self,
        decision: DecisionId,
    ) -> Result<Vec<Clarification>, DomainError>;

    async fn insert_clarification(&mut self, clarification: &Clarification)
        -> Result<(), DomainError>;

    async fn update_clarification(&mut self, clarification: &Clarification)
        -> Result<(), DomainError>;

    async fn find_stage_suggestion(
        &mut self,
        id: StageSuggestionId,
    ) -> Result<Option<StageSuggestion>, DomainError>;

    async fn list_stage_suggestions(
        &mut self,
        decision: DecisionId,
    ) -> Result<Vec<StageSuggestion>, DomainError>;

    async fn insert_stage_suggestion(&mut self, proposal: &StageSuggestion)
        -> Result<(), DomainError>;

    async fn update_stage_suggestion(&mut self, proposal: &StageSuggestion)
        -> Result<(), DomainError>;

    // ─────────────────────────────────────────────────────────────────────────
    // Action log
    // ─────────────────────────────────────────────────────────────────────────

    /// Appends one row. Rows are never updated.
    async fn append_action(&mut self, entry: &ActionLogEntry) -> Result<(), DomainError>;

    /// Makes every change in this unit visible atomically.
    async fn commit(self: Box<Self>) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ports_are_object_safe() {
        fn _store(_s: &dyn WorkflowStore) {}
        fn _unit(_u: Box<dyn WorkflowUnit>) {}
    }

    #[test]
    fn decision_children_name_their_tables() {
        let children = [
            (DecisionChild::Option(OptionId::from_raw(1)), "options", "Option"),
            (DecisionChild::Suggestion(SuggestionId::from_raw(2)), "suggestions", "Suggestion"),
            (
                DecisionChild::Clarification(ClarificationId::from_raw(3)),
                "clarifications",
                "Clarification",
            ),
            (
                DecisionChild::StageSuggestion(StageSuggestionId::from_raw(4)),
                "stage_suggestions",
                "StageSuggestion",
            ),
        ];
        for (i, (child, table, resource)) in children.into_iter().enumerate() {
            assert_eq!(child.table(), table);
            assert_eq!(child.resource(), resource);
            assert_eq!(child.raw_id(), i as i64 + 1);
        }
    }

    #[test]
    fn cascade_summary_sums_dependents() {
        let mut total = CascadeSummary {
            options: 3,
            suggestions: 2,
            clarifications: 1,
            stage_suggestions: 0,
            actions: 4,
        };
        assert_eq!(total.dependents(), 10);

        total.absorb(CascadeSummary {
            actions: 2,
            ..Default::default()
        });
        assert_eq!(total.actions, 6);
    }
}
