//! GetInteractionReportHandler - Query handler for per-user interaction
//! counts. Administrators only.

use std::sync::Arc;

use crate::domain::analytics::{InteractionAggregator, InteractionReport};
use crate::domain::foundation::{check_admin, CommandMetadata, UserRef, WorkflowError};
use crate::ports::DecisionReader;

/// Query for the interaction report.
#[derive(Debug, Clone, Default)]
pub struct GetInteractionReportQuery {
    /// Report exactly these users in this order. `None` reports every owner
    /// and every logged user.
    pub roster: Option<Vec<UserRef>>,
}

/// Handler for the interaction report.
pub struct GetInteractionReportHandler {
    reader: Arc<dyn DecisionReader>,
}

impl GetInteractionReportHandler {
    pub fn new(reader: Arc<dyn DecisionReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetInteractionReportQuery,
        metadata: CommandMetadata,
    ) -> Result<InteractionReport, WorkflowError> {
        let verdict = check_admin(&metadata.actor, "InteractionReport");
        verdict.log("get_interaction_report");
        verdict.into_result()?;

        let snapshot = self.reader.analytics_snapshot().await?;
        let report = InteractionAggregator::aggregate(
            &snapshot.decisions,
            &snapshot.actions,
            query.roster.as_deref(),
        );

        tracing::info!(
            users = report.users.len(),
            decisions = snapshot.decisions.len(),
            actions = snapshot.actions.len(),
            correlation_id = metadata.correlation_id(),
            "interaction report generated"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryWorkflowStore;
    use crate::application::handlers::contribution::{
        RequestClarificationCommand, RequestClarificationHandler, SubmitSuggestionCommand,
        SubmitSuggestionHandler,
    };
    use crate::application::handlers::decision::{ViewDecisionHandler, ViewDecisionQuery};
    use crate::application::handlers::testing::{
        alice, as_admin, as_user, bob, carol, root, seed_decision,
    };
    use crate::domain::decision::OptionDetails;
    use crate::domain::foundation::DecisionId;

    async fn five_asked_two_read(store: &InMemoryWorkflowStore) -> Vec<DecisionId> {
        let mut ids = Vec::new();
        for n in 0..5 {
            ids.push(seed_decision(store, alice(), &format!("Question {}", n), true).await);
        }
        let view = ViewDecisionHandler::new(Arc::new(store.clone()));
        for id in &ids[..2] {
            view.handle(ViewDecisionQuery { decision_id: *id }, as_user(alice()))
                .await
                .unwrap();
        }
        ids
    }

    #[tokio::test]
    async fn counts_asked_and_read_per_user() {
        let store = InMemoryWorkflowStore::new();
        five_asked_two_read(&store).await;

        let report = GetInteractionReportHandler::new(Arc::new(store))
            .handle(GetInteractionReportQuery::default(), as_admin(root()))
            .await
            .unwrap();

        let stats = report.for_user(alice().id()).unwrap();
        assert_eq!(stats.asked, 5);
        assert_eq!(stats.read, 2);
        assert_eq!(stats.top_categories, vec!["General".to_string()]);
        assert_eq!(stats.high_interaction, 0);
    }

    #[tokio::test]
    async fn four_feedback_rows_mark_high_interaction() {
        let store = InMemoryWorkflowStore::new();
        let ids = five_asked_two_read(&store).await;
        let suggest = SubmitSuggestionHandler::new(Arc::new(store.clone()));
        let clarify = RequestClarificationHandler::new(Arc::new(store.clone()));

        for title in ["Option A", "Option B"] {
            suggest
                .handle(
                    SubmitSuggestionCommand {
                        decision_id: ids[0],
                        details: OptionDetails::titled(title).unwrap(),
                    },
                    as_user(bob()),
                )
                .await
                .unwrap();
        }
        for message in ["Budget?", "Timeline?"] {
            clarify
                .handle(
                    RequestClarificationCommand {
                        decision_id: ids[0],
                        message: message.to_string(),
                    },
                    as_user(carol()),
                )
                .await
                .unwrap();
        }

        let report = GetInteractionReportHandler::new(Arc::new(store))
            .handle(GetInteractionReportQuery::default(), as_admin(root()))
            .await
            .unwrap();

        assert_eq!(report.for_user(alice().id()).unwrap().high_interaction, 1);
        assert_eq!(report.for_user(bob().id()).unwrap().suggestions, 2);
        assert_eq!(report.for_user(carol().id()).unwrap().clarifications, 2);
    }

    #[tokio::test]
    async fn roster_limits_and_orders_users() {
        let store = InMemoryWorkflowStore::new();
        five_asked_two_read(&store).await;

        let report = GetInteractionReportHandler::new(Arc::new(store))
            .handle(
                GetInteractionReportQuery {
                    roster: Some(vec![carol(), alice()]),
                },
                as_admin(root()),
            )
            .await
            .unwrap();

        let names: Vec<&str> = report.users.iter().map(|s| s.user.username()).collect();
        assert_eq!(names, vec!["carol", "alice"]);
        assert_eq!(report.users[0].total_actions(), 0);
    }

    #[tokio::test]
    async fn non_admin_is_forbidden() {
        let store = InMemoryWorkflowStore::new();

        let err = GetInteractionReportHandler::new(Arc::new(store))
            .handle(GetInteractionReportQuery::default(), as_user(alice()))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }
}
