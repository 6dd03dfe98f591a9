//! Interaction Aggregator - per-user counts over decisions and the action log.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::domain::activity::{ActionLogEntry, ActionType};
use crate::domain::decision::DecisionRecord;
use crate::domain::foundation::{DecisionId, Timestamp, UserId, UserRef};

/// A decision counts as high interaction above this many feedback rows.
pub const HIGH_INTERACTION_THRESHOLD: usize = 3;

/// Maximum number of categories reported per user.
pub const TOP_CATEGORY_LIMIT: usize = 3;

/// The decision fields aggregation needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionFacts {
    pub id: DecisionId,
    pub owner: UserRef,
    pub category: String,
}

impl From<&DecisionRecord> for DecisionFacts {
    fn from(decision: &DecisionRecord) -> Self {
        Self {
            id: decision.id(),
            owner: decision.owner().clone(),
            category: decision.category().to_string(),
        }
    }
}

/// Aggregated counts for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInteractionStats {
    pub user: UserRef,
    pub asked: usize,
    pub read: usize,
    pub clarifications: usize,
    pub suggestions: usize,
    pub stage_suggestions: usize,
    /// Owned decisions with more than [`HIGH_INTERACTION_THRESHOLD`] feedback rows.
    pub high_interaction: usize,
    pub top_categories: Vec<String>,
}

impl UserInteractionStats {
    fn empty(user: UserRef) -> Self {
        Self {
            user,
            asked: 0,
            read: 0,
            clarifications: 0,
            suggestions: 0,
            stage_suggestions: 0,
            high_interaction: 0,
            top_categories: Vec::new(),
        }
    }

    /// Total action rows attributed to the user.
    pub fn total_actions(&self) -> usize {
        self.asked + self.read + self.clarifications + self.suggestions + self.stage_suggestions
    }
}

/// Result of one aggregation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionReport {
    pub generated_at: Timestamp,
    pub users: Vec<UserInteractionStats>,
}

impl InteractionReport {
    pub fn for_user(&self, user_id: UserId) -> Option<&UserInteractionStats> {
        self.users.iter().find(|s| s.user.id() == user_id)
    }
}

/// Pure aggregation functions.
pub struct InteractionAggregator;

impl InteractionAggregator {
    /// Builds a report over the given decisions and action log.
    ///
    /// # Algorithm
    /// - count each user's action rows by type
    /// - per decision, count feedback rows (suggestion + clarification) from
    ///   anyone; each owned decision above the threshold adds one to the
    ///   owner's `high_interaction`
    /// - per user, count action rows by the category of the decision they
    ///   touch; keep the three largest, ties in order of first appearance
    ///
    /// # Edge Cases
    /// - `roster` given: exactly those users, in roster order; a user listed
    ///   twice keeps the first listing only
    /// - no roster: every decision owner and every logged user, by id
    /// - actions on decisions missing from `decisions` still count by type
    ///   but contribute no category
    /// - empty categories never appear in `top_categories`
    pub fn aggregate(
        decisions: &[DecisionFacts],
        actions: &[ActionLogEntry],
        roster: Option<&[UserRef]>,
    ) -> InteractionReport {
        let users: Vec<UserRef> = match roster {
            Some(roster) => Self::distinct_roster(roster),
            None => Self::discover_users(decisions, actions),
        };

        let feedback_per_decision = Self::feedback_counts(actions);
        let categories: HashMap<DecisionId, &str> = decisions
            .iter()
            .map(|d| (d.id, d.category.as_str()))
            .collect();

        let mut stats: Vec<UserInteractionStats> =
            users.into_iter().map(UserInteractionStats::empty).collect();
        let index: HashMap<UserId, usize> = stats
            .iter()
            .enumerate()
            .map(|(i, s)| (s.user.id(), i))
            .collect();

        let mut category_counts: Vec<Vec<(String, usize)>> = vec![Vec::new(); stats.len()];

        for action in actions {
            let Some(&slot) = index.get(&action.user().id()) else {
                continue;
            };
            let entry = &mut stats[slot];
            match action.action_type() {
                ActionType::Asked => entry.asked += 1,
                ActionType::Read => entry.read += 1,
                ActionType::Clarification => entry.clarifications += 1,
                ActionType::Suggestion => entry.suggestions += 1,
                ActionType::StageSuggestion => entry.stage_suggestions += 1,
            }

            if let Some(category) = categories.get(&action.decision_id()) {
                let category = category.trim();
                if category.is_empty() {
                    continue;
                }
                let counts = &mut category_counts[slot];
                match counts.iter_mut().find(|(name, _)| name == category) {
                    Some((_, n)) => *n += 1,
                    None => counts.push((category.to_string(), 1)),
                }
            }
        }

        for decision in decisions {
            let feedback = feedback_per_decision
                .get(&decision.id)
                .copied()
                .unwrap_or(0);
            if feedback > HIGH_INTERACTION_THRESHOLD {
                if let Some(&slot) = index.get(&decision.owner.id()) {
                    stats[slot].high_interaction += 1;
                }
            }
        }

        for (entry, mut counts) in stats.iter_mut().zip(category_counts) {
            // Stable sort keeps first-appearance order among equal counts.
            counts.sort_by(|a, b| b.1.cmp(&a.1));
            entry.top_categories = counts
                .into_iter()
                .take(TOP_CATEGORY_LIMIT)
                .map(|(name, _)| name)
                .collect();
        }

        InteractionReport {
            generated_at: Timestamp::now(),
            users: stats,
        }
    }

    /// Feedback rows (suggestion + clarification) per decision.
    pub fn feedback_counts(actions: &[ActionLogEntry]) -> HashMap<DecisionId, usize> {
        let mut counts = HashMap::new();
        for action in actions.iter().filter(|a| a.action_type().is_feedback()) {
            *counts.entry(action.decision_id()).or_insert(0) += 1;
        }
        counts
    }

    fn distinct_roster(roster: &[UserRef]) -> Vec<UserRef> {
        let mut seen = HashSet::new();
        roster
            .iter()
            .filter(|user| seen.insert(user.id()))
            .cloned()
            .collect()
    }

    fn discover_users(decisions: &[DecisionFacts], actions: &[ActionLogEntry]) -> Vec<UserRef> {
        let mut users: BTreeMap<UserId, UserRef> = BTreeMap::new();
        for decision in decisions {
            users
                .entry(decision.owner.id())
                .or_insert_with(|| decision.owner.clone());
        }
        for action in actions {
            users
                .entry(action.user().id())
                .or_insert_with(|| action.user().clone());
        }
        users.into_values().collect()
    }
}
