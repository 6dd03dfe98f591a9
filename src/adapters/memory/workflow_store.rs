//! In-memory implementation of the workflow store and decision reader.
//!
//! Units of work are serialized by an async mutex. Each unit edits a private
//! working copy of the whole state, which replaces the shared state only on
//! commit. Dropping a unit releases the lock and discards the copy.
//!
//! Useful for:
//! - Handler and scenario tests
//! - Embedding the engine without a database

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::activity::ActionLogEntry;
use crate::domain::analytics::DecisionFacts;
use crate::domain::contribution::{Clarification, StageSuggestion, Suggestion};
use crate::domain::decision::{DecisionOption, DecisionRecord};
use crate::domain::foundation::{
    ClarificationId, DecisionId, DomainError, ErrorCode, OptionId, StageSuggestionId,
    SuggestionId, UserId,
};
use crate::ports::{
    AnalyticsSnapshot, CascadeSummary, DecisionChild, DecisionReader, DecisionSummary,
    IdSequence, PendingCounts, WorkflowStore, WorkflowUnit,
};

#[derive(Debug, Clone, Default)]
struct StoreState {
    sequences: HashMap<IdSequence, i64>,
    decisions: BTreeMap<DecisionId, DecisionRecord>,
    options: BTreeMap<OptionId, DecisionOption>,
    suggestions: BTreeMap<SuggestionId, Suggestion>,
    clarifications: BTreeMap<ClarificationId, Clarification>,
    stage_suggestions: BTreeMap<StageSuggestionId, StageSuggestion>,
    actions: Vec<ActionLogEntry>,
}

impl StoreState {
    fn rows_referencing(&self, decision: DecisionId) -> usize {
        self.options.values().filter(|o| o.decision_id() == decision).count()
            + self.suggestions.values().filter(|s| s.decision_id() == decision).count()
            + self.clarifications.values().filter(|c| c.decision_id() == decision).count()
            + self.stage_suggestions.values().filter(|s| s.decision_id() == decision).count()
            + self.actions.iter().filter(|a| a.decision_id() == decision).count()
    }
}

#[derive(Debug, Default)]
struct Faults {
    fail_commit: AtomicBool,
    fail_action_append: AtomicBool,
}

/// In-memory workflow store.
///
/// Cloning shares the underlying state.
///
/// # Example
///
/// ```ignore
/// let store = InMemoryWorkflowStore::new();
/// let handler = CreateDecisionHandler::new(Arc::new(store.clone()), assistant);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowStore {
    state: Arc<Mutex<StoreState>>,
    faults: Arc<Faults>,
}

impl InMemoryWorkflowStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent commit fail until switched off.
    pub fn fail_commits(&self, fail: bool) {
        self.faults.fail_commit.store(fail, Ordering::SeqCst);
    }

    /// Makes every subsequent action-log append fail until switched off.
    pub fn fail_action_appends(&self, fail: bool) {
        self.faults.fail_action_append.store(fail, Ordering::SeqCst);
    }

    /// Number of stored decisions.
    pub async fn decision_count(&self) -> usize {
        self.state.lock().await.decisions.len()
    }

    /// Rows in any table that reference the decision.
    pub async fn rows_referencing(&self, decision: DecisionId) -> usize {
        self.state.lock().await.rows_referencing(decision)
    }

    /// Copy of the action log in append order.
    pub async fn actions(&self) -> Vec<ActionLogEntry> {
        self.state.lock().await.actions.clone()
    }
}

#[async_trait]
impl WorkflowStore for InMemoryWorkflowStore {
    async fn begin(&self) -> Result<Box<dyn WorkflowUnit>, DomainError> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(InMemoryUnit {
            guard,
            working,
            faults: self.faults.clone(),
        }))
    }
}

/// A unit of work over [`InMemoryWorkflowStore`].
pub struct InMemoryUnit {
    guard: OwnedMutexGuard<StoreState>,
    working: StoreState,
    faults: Arc<Faults>,
}

fn not_found(code: ErrorCode, what: &str, id: impl std::fmt::Display) -> DomainError {
    DomainError::new(code, format!("{} not found: {}", what, id))
}

#[async_trait]
impl WorkflowUnit for InMemoryUnit {
    async fn next_id(&mut self, sequence: IdSequence) -> Result<i64, DomainError> {
        let next = self.working.sequences.entry(sequence).or_insert(0);
        *next += 1;
        Ok(*next)
    }

    async fn parent_of(&mut self, child: DecisionChild) -> Result<Option<DecisionId>, DomainError> {
        let state = &self.working;
        Ok(match child {
            DecisionChild::Option(id) => state.options.get(&id).map(|o| o.decision_id()),
            DecisionChild::Suggestion(id) => state.suggestions.get(&id).map(|s| s.decision_id()),
            DecisionChild::Clarification(id) => {
                state.clarifications.get(&id).map(|c| c.decision_id())
            }
            DecisionChild::StageSuggestion(id) => {
                state.stage_suggestions.get(&id).map(|p| p.decision_id())
            }
        })
    }

    async fn find_decision(
        &mut self,
        id: DecisionId,
    ) -> Result<Option<DecisionRecord>, DomainError> {
        Ok(self.working.decisions.get(&id).cloned())
    }

    async fn insert_decision(&mut self, decision: &DecisionRecord) -> Result<(), DomainError> {
        self.working.decisions.insert(decision.id(), decision.clone());
        Ok(())
    }

    async fn update_decision(&mut self, decision: &DecisionRecord) -> Result<(), DomainError> {
        match self.working.decisions.get_mut(&decision.id()) {
            Some(slot) => {
                *slot = decision.clone();
                Ok(())
            }
            None => Err(not_found(ErrorCode::DecisionNotFound, "Decision", decision.id())),
        }
    }

    async fn delete_decision(&mut self, id: DecisionId) -> Result<CascadeSummary, DomainError> {
        if self.working.decisions.remove(&id).is_none() {
            return Err(not_found(ErrorCode::DecisionNotFound, "Decision", id));
        }

        let state = &mut self.working;
        let before = (
            state.options.len(),
            state.suggestions.len(),
            state.clarifications.len(),
            state.stage_suggestions.len(),
            state.actions.len(),
        );
        state.options.retain(|_, o| o.decision_id() != id);
        state.suggestions.retain(|_, s| s.decision_id() != id);
        state.clarifications.retain(|_, c| c.decision_id() != id);
        state.stage_suggestions.retain(|_, s| s.decision_id() != id);
        state.actions.retain(|a| a.decision_id() != id);

        Ok(CascadeSummary {
            options: (before.0 - state.options.len()) as u64,
            suggestions: (before.1 - state.suggestions.len()) as u64,
            clarifications: (before.2 - state.clarifications.len()) as u64,
            stage_suggestions: (before.3 - state.stage_suggestions.len()) as u64,
            actions: (before.4 - state.actions.len()) as u64,
        })
    }

    async fn find_option(&mut self, id: OptionId) -> Result<Option<DecisionOption>, DomainError> {
        Ok(self.working.options.get(&id).cloned())
    }

    async fn list_options(
        &mut self,
        decision: DecisionId,
    ) -> Result<Vec<DecisionOption>, DomainError> {
        Ok(self
            .working
            .options
            .values()
            .filter(|o| o.decision_id() == decision)
            .cloned()
            .collect())
    }

    async fn insert_option(&mut self, option: &DecisionOption) -> Result<(), DomainError> {
        self.working.options.insert(option.id(), option.clone());
        Ok(())
    }

    async fn update_option(&mut self, option: &DecisionOption) -> Result<(), DomainError> {
        match self.working.options.get_mut(&option.id()) {
            Some(slot) => {
                *slot = option.clone();
                Ok(())
            }
            None => Err(not_found(ErrorCode::OptionNotFound, "Option", option.id())),
        }
    }

    async fn delete_option(&mut self, id: OptionId) -> Result<(), DomainError> {
        self.working
            .options
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(ErrorCode::OptionNotFound, "Option", id))
    }

    async fn find_suggestion(
        &mut self,
        id: SuggestionId,
    ) -> Result<Option<Suggestion>, DomainError> {
        Ok(self.working.suggestions.get(&id).cloned())
    }

    async fn list_suggestions(
        &mut self,
        decision: DecisionId,
    ) -> Result<Vec<Suggestion>, DomainError> {
        Ok(self
            .working
            .suggestions
            .values()
            .filter(|s| s.decision_id() == decision)
            .cloned()
            .collect())
    }

    async fn insert_suggestion(&mut self, suggestion: &Suggestion) -> Result<(), DomainError> {
        self.working
            .suggestions
            .insert(suggestion.id(), suggestion.clone());
        Ok(())
    }

    async fn update_suggestion(&mut self, suggestion: &Suggestion) -> Result<(), DomainError> {
        match self.working.suggestions.get_mut(&suggestion.id()) {
            Some(slot) => {
                *slot = suggestion.clone();
                Ok(())
            }
            None => Err(not_found(
                ErrorCode::SuggestionNotFound,
                "Suggestion",
                suggestion.id(),
            )),
        }
    }

    async fn find_clarification(
        &mut self,
        id: ClarificationId,
    ) -> Result<Option<Clarification>, DomainError> {
        Ok(self.working.clarifications.get(&id).cloned())
    }

    async fn list_clarifications(
        &mut self,
        decision: DecisionId,
    ) -> Result<Vec<Clarification>, DomainError> {
        Ok(self
            .working
            .clarifications
            .values()
            .filter(|c| c.decision_id() == decision)
            .cloned()
            .collect())
    }

    async fn insert_clarification(
        &mut self,
        clarification: &Clarification,
    ) -> Result<(), DomainError> {
        self.working
            .clarifications
            .insert(clarification.id(), clarification.clone());
        Ok(())
    }

    async fn update_clarification(
        &mut self,
        clarification: &Clarification,
    ) -> Result<(), DomainError> {
        match self.working.clarifications.get_mut(&clarification.id()) {
            Some(slot) => {
                *slot = clarification.clone();
                Ok(())
            }
            None => Err(not_found(
                ErrorCode::ClarificationNotFound,
                "Clarification",
                clarification.id(),
            )),
        }
    }

    async fn find_stage_suggestion(
        &mut self,
        id: StageSuggestionId,
    ) -> Result<Option<StageSuggestion>, DomainError> {
        Ok(self.working.stage_suggestions.get(&id).cloned())
    }

    async fn list_stage_suggestions(
        &mut self,
        decision: DecisionId,
    ) -> Result<Vec<StageSuggestion>, DomainError> {
        Ok(self
            .working
            .stage_suggestions
            .values()
            .filter(|s| s.decision_id() == decision)
            .cloned()
            .collect())
    }

    async fn insert_stage_suggestion(
        &mut self,
        proposal: &StageSuggestion,
    ) -> Result<(), DomainError> {
        self.working
            .stage_suggestions
            .insert(proposal.id(), proposal.clone());
        Ok(())
    }

    async fn update_stage_suggestion(
        &mut self,
        proposal: &StageSuggestion,
    ) -> Result<(), DomainError> {
        match self.working.stage_suggestions.get_mut(&proposal.id()) {
            Some(slot) => {
                *slot = proposal.clone();
                Ok(())
            }
            None => Err(not_found(
                ErrorCode::StageSuggestionNotFound,
                "StageSuggestion",
                proposal.id(),
            )),
        }
    }

    async fn append_action(&mut self, entry: &ActionLogEntry) -> Result<(), DomainError> {
        if self.faults.fail_action_append.load(Ordering::SeqCst) {
            return Err(DomainError::database("injected action-log failure"));
        }
        self.working.actions.push(entry.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        if self.faults.fail_commit.load(Ordering::SeqCst) {
            return Err(DomainError::database("injected commit failure"));
        }
        let InMemoryUnit {
            mut guard, working, ..
        } = *self;
        *guard = working;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Read side
// ════════════════════════════════════════════════════════════════════════════════

fn newest_first(mut rows: Vec<DecisionSummary>) -> Vec<DecisionSummary> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
    rows
}

fn category_matches(decision: &DecisionRecord, category: Option<&str>) -> bool {
    category.map_or(true, |c| decision.category() == c)
}

#[async_trait]
impl DecisionReader for InMemoryWorkflowStore {
    async fn list_owned(
        &self,
        owner: UserId,
        category: Option<&str>,
    ) -> Result<Vec<DecisionSummary>, DomainError> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state
                .decisions
                .values()
                .filter(|d| d.owner().id() == owner && category_matches(d, category))
                .map(DecisionSummary::from)
                .collect(),
        ))
    }

    async fn list_public(
        &self,
        exclude_owner: Option<UserId>,
        category: Option<&str>,
    ) -> Result<Vec<DecisionSummary>, DomainError> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state
                .decisions
                .values()
                .filter(|d| d.is_public())
                .filter(|d| Some(d.owner().id()) != exclude_owner)
                .filter(|d| category_matches(d, category))
                .map(DecisionSummary::from)
                .collect(),
        ))
    }

    async fn categories(&self) -> Result<Vec<String>, DomainError> {
        let state = self.state.lock().await;
        let categories: BTreeSet<String> = state
            .decisions
            .values()
            .map(|d| d.category().trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();
        Ok(categories.into_iter().collect())
    }

    async fn pending_counts(&self, owner: UserId) -> Result<PendingCounts, DomainError> {
        let state = self.state.lock().await;
        let owned = |id: DecisionId| {
            state
                .decisions
                .get(&id)
                .map_or(false, |d| d.owner().id() == owner)
        };
        Ok(PendingCounts {
            suggestions: state
                .suggestions
                .values()
                .filter(|s| s.status().is_pending() && owned(s.decision_id()))
                .count() as u64,
            clarifications: state
                .clarifications
                .values()
                .filter(|c| c.status().is_pending() && owned(c.decision_id()))
                .count() as u64,
        })
    }

    async fn analytics_snapshot(&self) -> Result<AnalyticsSnapshot, DomainError> {
        let state = self.state.lock().await;
        Ok(AnalyticsSnapshot {
            decisions: state.decisions.values().map(DecisionFacts::from).collect(),
            actions: state.actions.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::activity::ActionType;
    use crate::domain::decision::OptionDetails;
    use crate::domain::foundation::{ActionId, UserRef};

    fn alice() -> UserRef {
        UserRef::new(UserId::from_raw(1), "alice").unwrap()
    }

    fn decision(id: i64) -> DecisionRecord {
        DecisionRecord::new(DecisionId::from_raw(id), alice(), "Which car?", "Shopping").unwrap()
    }

    #[tokio::test]
    async fn committed_writes_are_visible() {
        let store = InMemoryWorkflowStore::new();
        let mut unit = store.begin().await.unwrap();
        unit.insert_decision(&decision(1)).await.unwrap();
        unit.commit().await.unwrap();

        assert_eq!(store.decision_count().await, 1);
    }

    #[tokio::test]
    async fn dropped_unit_rolls_back() {
        let store = InMemoryWorkflowStore::new();
        {
            let mut unit = store.begin().await.unwrap();
            unit.insert_decision(&decision(1)).await.unwrap();
        }
        assert_eq!(store.decision_count().await, 0);
    }

    #[tokio::test]
    async fn failed_commit_discards_changes() {
        let store = InMemoryWorkflowStore::new();
        store.fail_commits(true);
        let mut unit = store.begin().await.unwrap();
        unit.insert_decision(&decision(1)).await.unwrap();
        assert!(unit.commit().await.is_err());

        store.fail_commits(false);
        assert_eq!(store.decision_count().await, 0);
    }

    #[tokio::test]
    async fn sequences_are_per_table_and_survive_commit() {
        let store = InMemoryWorkflowStore::new();
        let mut unit = store.begin().await.unwrap();
        assert_eq!(unit.next_id(IdSequence::Decision).await.unwrap(), 1);
        assert_eq!(unit.next_id(IdSequence::Decision).await.unwrap(), 2);
        assert_eq!(unit.next_id(IdSequence::Option).await.unwrap(), 1);
        unit.commit().await.unwrap();

        let mut unit = store.begin().await.unwrap();
        assert_eq!(unit.next_id(IdSequence::Decision).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn delete_decision_cascades() {
        let store = InMemoryWorkflowStore::new();
        let id = DecisionId::from_raw(1);
        let mut unit = store.begin().await.unwrap();
        unit.insert_decision(&decision(1)).await.unwrap();
        unit.insert_decision(&decision(2)).await.unwrap();
        for n in 1..=3 {
            let option = DecisionOption::new(
                OptionId::from_raw(n),
                id,
                OptionDetails::titled(format!("Option {}", n)).unwrap(),
            );
            unit.insert_option(&option).await.unwrap();
        }
        unit.append_action(&ActionLogEntry::new(
            ActionId::from_raw(1),
            alice(),
            id,
            ActionType::Asked,
        ))
        .await
        .unwrap();
        unit.append_action(&ActionLogEntry::new(
            ActionId::from_raw(2),
            alice(),
            DecisionId::from_raw(2),
            ActionType::Asked,
        ))
        .await
        .unwrap();

        let summary = unit.delete_decision(id).await.unwrap();
        unit.commit().await.unwrap();

        assert_eq!(summary.options, 3);
        assert_eq!(summary.actions, 1);
        assert_eq!(store.rows_referencing(id).await, 0);
        assert_eq!(store.rows_referencing(DecisionId::from_raw(2)).await, 1);
    }

    #[tokio::test]
    async fn parent_of_finds_owning_decision() {
        let store = InMemoryWorkflowStore::new();
        let mut unit = store.begin().await.unwrap();
        unit.insert_decision(&decision(4)).await.unwrap();
        let option = DecisionOption::new(
            OptionId::from_raw(1),
            DecisionId::from_raw(4),
            OptionDetails::titled("Bike").unwrap(),
        );
        unit.insert_option(&option).await.unwrap();

        assert_eq!(
            unit.parent_of(DecisionChild::Option(OptionId::from_raw(1)))
                .await
                .unwrap(),
            Some(DecisionId::from_raw(4))
        );
        assert_eq!(
            unit.parent_of(DecisionChild::Suggestion(SuggestionId::from_raw(1)))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found() {
        let store = InMemoryWorkflowStore::new();
        let mut unit = store.begin().await.unwrap();
        let err = unit.update_decision(&decision(9)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DecisionNotFound);
    }

    #[tokio::test]
    async fn reader_lists_and_filters() {
        let store = InMemoryWorkflowStore::new();
        let bob = UserRef::new(UserId::from_raw(2), "bob").unwrap();
        let mut unit = store.begin().await.unwrap();
        unit.insert_decision(&decision(1)).await.unwrap();
        unit.insert_decision(&decision(2).with_visibility(false))
            .await
            .unwrap();
        unit.insert_decision(
            &DecisionRecord::new(DecisionId::from_raw(3), bob.clone(), "New job?", "Career")
                .unwrap(),
        )
        .await
        .unwrap();
        unit.commit().await.unwrap();

        assert_eq!(store.list_owned(alice().id(), None).await.unwrap().len(), 2);
        let public_for_alice = store.list_public(Some(alice().id()), None).await.unwrap();
        assert_eq!(public_for_alice.len(), 1);
        assert_eq!(public_for_alice[0].owner, bob);
        assert_eq!(
            store.list_public(None, Some("Shopping")).await.unwrap().len(),
            1
        );
        assert_eq!(
            store.categories().await.unwrap(),
            vec!["Career".to_string(), "Shopping".to_string()]
        );
    }
}
