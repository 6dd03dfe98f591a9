//! PostgreSQL implementation of the workflow store.
//!
//! Each unit of work is one database transaction. Rows read through a unit
//! are locked with `FOR UPDATE`, so two reviews of the same contribution
//! serialize and the second one sees the terminal status. `parent_of` is the
//! one unlocked read; handlers use it to lock the decision before its rows.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::domain::activity::ActionLogEntry;
use crate::domain::contribution::{Clarification, StageSuggestion, Suggestion};
use crate::domain::decision::{DecisionOption, DecisionRecord};
use crate::domain::foundation::{
    ClarificationId, DecisionId, DomainError, ErrorCode, OptionId, StageSuggestionId,
    SuggestionId,
};
use crate::ports::{CascadeSummary, DecisionChild, IdSequence, WorkflowStore, WorkflowUnit};

use super::rows::{
    row_to_clarification, row_to_decision, row_to_option, row_to_stage_suggestion,
    row_to_suggestion, DECISION_COLUMNS,
};

/// PostgreSQL implementation of WorkflowStore.
#[derive(Clone)]
pub struct PostgresWorkflowStore {
    pool: PgPool,
}

impl PostgresWorkflowStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkflowStore for PostgresWorkflowStore {
    async fn begin(&self) -> Result<Box<dyn WorkflowUnit>, DomainError> {
        let tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin transaction: {}", e),
            )
        })?;
        Ok(Box::new(PostgresUnit { tx }))
    }
}

/// One open transaction. Dropping it rolls back.
pub struct PostgresUnit {
    tx: Transaction<'static, Postgres>,
}

impl PostgresUnit {
    fn conn(&mut self) -> &mut PgConnection {
        &mut *self.tx
    }
}

#[async_trait]
impl WorkflowUnit for PostgresUnit {
    async fn next_id(&mut self, sequence: IdSequence) -> Result<i64, DomainError> {
        let (id,): (i64,) = sqlx::query_as("SELECT nextval(pg_get_serial_sequence($1, 'id'))")
            .bind(sequence.table())
            .fetch_one(self.conn())
            .await
            .map_err(|e| db_error(&format!("allocate {} id", sequence.table()), e))?;
        Ok(id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Decisions
    // ─────────────────────────────────────────────────────────────────────────

    async fn parent_of(&mut self, child: DecisionChild) -> Result<Option<DecisionId>, DomainError> {
        let sql = parent_query(child);
        let row: Option<(i64,)> = sqlx::query_as(&sql)
            .bind(child.raw_id())
            .fetch_optional(self.conn())
            .await
            .map_err(|e| db_error(&format!("look up {} parent", child.table()), e))?;
        Ok(row.map(|(id,)| DecisionId::from_raw(id)))
    }

    async fn find_decision(
        &mut self,
        id: DecisionId,
    ) -> Result<Option<DecisionRecord>, DomainError> {
        let sql = format!(
            "SELECT {} FROM decisions WHERE id = $1 FOR UPDATE",
            DECISION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(self.conn())
            .await
            .map_err(|e| db_error("fetch decision", e))?;

        row.as_ref().map(row_to_decision).transpose()
    }

    async fn insert_decision(&mut self, decision: &DecisionRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO decisions (
                id, owner_id, owner_name, title, description, deadline, created_at,
                status, current_stage, category, is_public, stage_content
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(decision.id().as_i64())
        .bind(decision.owner().id().as_i64())
        .bind(decision.owner().username())
        .bind(decision.title())
        .bind(decision.description())
        .bind(decision.deadline().map(|d| *d.as_datetime()))
        .bind(decision.created_at().as_datetime())
        .bind(decision.status().as_str())
        .bind(decision.current_stage().key())
        .bind(decision.category())
        .bind(decision.is_public())
        .bind(Json(decision.stage_content()))
        .execute(self.conn())
        .await
        .map_err(|e| db_error("insert decision", e))?;

        Ok(())
    }

    async fn update_decision(&mut self, decision: &DecisionRecord) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE decisions SET
                title = $2,
                description = $3,
                deadline = $4,
                status = $5,
                current_stage = $6,
                category = $7,
                is_public = $8,
                stage_content = $9
            WHERE id = $1
            "#,
        )
        .bind(decision.id().as_i64())
        .bind(decision.title())
        .bind(decision.description())
        .bind(decision.deadline().map(|d| *d.as_datetime()))
        .bind(decision.status().as_str())
        .bind(decision.current_stage().key())
        .bind(decision.category())
        .bind(decision.is_public())
        .bind(Json(decision.stage_content()))
        .execute(self.conn())
        .await
        .map_err(|e| db_error("update decision", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DecisionNotFound,
                format!("Decision not found: {}", decision.id()),
            ));
        }
        Ok(())
    }

    async fn delete_decision(&mut self, id: DecisionId) -> Result<CascadeSummary, DomainError> {
        let conn = self.conn();
        let summary = CascadeSummary {
            options: delete_dependents(conn, "options", id).await?,
            suggestions: delete_dependents(conn, "suggestions", id).await?,
            clarifications: delete_dependents(conn, "clarifications", id).await?,
            stage_suggestions: delete_dependents(conn, "stage_suggestions", id).await?,
            actions: delete_dependents(conn, "action_log", id).await?,
        };

        let result = sqlx::query("DELETE FROM decisions WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.conn())
            .await
            .map_err(|e| db_error("delete decision", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::DecisionNotFound,
                format!("Decision not found: {}", id),
            ));
        }
        Ok(summary)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Options
    // ─────────────────────────────────────────────────────────────────────────

    async fn find_option(&mut self, id: OptionId) -> Result<Option<DecisionOption>, DomainError> {
        let row = sqlx::query(
            "SELECT id, decision_id, title, description, pros, cons FROM options WHERE id = $1 FOR UPDATE",
        )
        .bind(id.as_i64())
        .fetch_optional(self.conn())
        .await
        .map_err(|e| db_error("fetch option", e))?;

        row.as_ref().map(row_to_option).transpose()
    }

    async fn list_options(
        &mut self,
        decision: DecisionId,
    ) -> Result<Vec<DecisionOption>, DomainError> {
        let rows = sqlx::query(
            "SELECT id, decision_id, title, description, pros, cons FROM options WHERE decision_id = $1 ORDER BY id",
        )
        .bind(decision.as_i64())
        .fetch_all(self.conn())
        .await
        .map_err(|e| db_error("list options", e))?;

        rows.iter().map(row_to_option).collect()
    }

    async fn insert_option(&mut self, option: &DecisionOption) -> Result<(), DomainError> {
        let details = option.details();
        sqlx::query(
            r#"
            INSERT INTO options (id, decision_id, title, description, pros, cons)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(option.id().as_i64())
        .bind(option.decision_id().as_i64())
        .bind(&details.title)
        .bind(&details.description)
        .bind(&details.pros)
        .bind(&details.cons)
        .execute(self.conn())
        .await
        .map_err(|e| db_error("insert option", e))?;

        Ok(())
    }

    async fn update_option(&mut self, option: &DecisionOption) -> Result<(), DomainError> {
        let details = option.details();
        let result = sqlx::query(
            "UPDATE options SET title = $2, description = $3, pros = $4, cons = $5 WHERE id = $1",
        )
        .bind(option.id().as_i64())
        .bind(&details.title)
        .bind(&details.description)
        .bind(&details.pros)
        .bind(&details.cons)
        .execute(self.conn())
        .await
        .map_err(|e| db_error("update option", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::OptionNotFound,
                format!("Option not found: {}", option.id()),
            ));
        }
        Ok(())
    }

    async fn delete_option(&mut self, id: OptionId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM options WHERE id = $1")
            .bind(id.as_i64())
            .execute(self.conn())
            .await
            .map_err(|e| db_error("delete option", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::OptionNotFound,
                format!("Option not found: {}", id),
            ));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Contributions
    // ─────────────────────────────────────────────────────────────────────────

    async fn find_suggestion(
        &mut self,
        id: SuggestionId,
    ) -> Result<Option<Suggestion>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, decision_id, author_id, author_name, title, description, pros, cons,
                   created_at, status
            FROM suggestions WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(self.conn())
        .await
        .map_err(|e| db_error("fetch suggestion", e))?;

        row.as_ref().map(row_to_suggestion).transpose()
    }

    async fn list_suggestions(
        &mut self,
        decision: DecisionId,
    ) -> Result<Vec<Suggestion>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, decision_id, author_id, author_name, title, description, pros, cons,
                   created_at, status
            FROM suggestions WHERE decision_id = $1 ORDER BY id
            "#,
        )
        .bind(decision.as_i64())
        .fetch_all(self.conn())
        .await
        .map_err(|e| db_error("list suggestions", e))?;

        rows.iter().map(row_to_suggestion).collect()
    }

    async fn insert_suggestion(&mut self, suggestion: &Suggestion) -> Result<(), DomainError> {
        let details = suggestion.details();
        sqlx::query(
            r#"
            INSERT INTO suggestions (
                id, decision_id, author_id, author_name, title, description, pros, cons,
                created_at, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(suggestion.id().as_i64())
        .bind(suggestion.decision_id().as_i64())
        .bind(suggestion.author().id().as_i64())
        .bind(suggestion.author().username())
        .bind(&details.title)
        .bind(&details.description)
        .bind(&details.pros)
        .bind(&details.cons)
        .bind(suggestion.created_at().as_datetime())
        .bind(suggestion.status().as_str())
        .execute(self.conn())
        .await
        .map_err(|e| db_error("insert suggestion", e))?;

        Ok(())
    }

    async fn update_suggestion(&mut self, suggestion: &Suggestion) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE suggestions SET status = $2 WHERE id = $1")
            .bind(suggestion.id().as_i64())
            .bind(suggestion.status().as_str())
            .execute(self.conn())
            .await
            .map_err(|e| db_error("update suggestion", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SuggestionNotFound,
                format!("Suggestion not found: {}", suggestion.id()),
            ));
        }
        Ok(())
    }

    async fn find_clarification(
        &mut self,
        id: ClarificationId,
    ) -> Result<Option<Clarification>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, decision_id, author_id, author_name, message, created_at, status
            FROM clarifications WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(self.conn())
        .await
        .map_err(|e| db_error("fetch clarification", e))?;

        row.as_ref().map(row_to_clarification).transpose()
    }

    async fn list_clarifications(
        &mut self,
        decision: DecisionId,
    ) -> Result<Vec<Clarification>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, decision_id, author_id, author_name, message, created_at, status
            FROM clarifications WHERE decision_id = $1 ORDER BY id
            "#,
        )
        .bind(decision.as_i64())
        .fetch_all(self.conn())
        .await
        .map_err(|e| db_error("list clarifications", e))?;

        rows.iter().map(row_to_clarification).collect()
    }

    async fn insert_clarification(
        &mut self,
        clarification: &Clarification,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO clarifications (
                id, decision_id, author_id, author_name, message, created_at, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(clarification.id().as_i64())
        .bind(clarification.decision_id().as_i64())
        .bind(clarification.author().id().as_i64())
        .bind(clarification.author().username())
        .bind(clarification.message())
        .bind(clarification.created_at().as_datetime())
        .bind(clarification.status().as_str())
        .execute(self.conn())
        .await
        .map_err(|e| db_error("insert clarification", e))?;

        Ok(())
    }

    async fn update_clarification(
        &mut self,
        clarification: &Clarification,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE clarifications SET status = $2 WHERE id = $1")
            .bind(clarification.id().as_i64())
            .bind(clarification.status().as_str())
            .execute(self.conn())
            .await
            .map_err(|e| db_error("update clarification", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::ClarificationNotFound,
                format!("Clarification not found: {}", clarification.id()),
            ));
        }
        Ok(())
    }

    async fn find_stage_suggestion(
        &mut self,
        id: StageSuggestionId,
    ) -> Result<Option<StageSuggestion>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, decision_id, author_id, author_name, stage, content, created_at, status
            FROM stage_suggestions WHERE id = $1 FOR UPDATE
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(self.conn())
        .await
        .map_err(|e| db_error("fetch stage suggestion", e))?;

        row.as_ref().map(row_to_stage_suggestion).transpose()
    }

    async fn list_stage_suggestions(
        &mut self,
        decision: DecisionId,
    ) -> Result<Vec<StageSuggestion>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, decision_id, author_id, author_name, stage, content, created_at, status
            FROM stage_suggestions WHERE decision_id = $1 ORDER BY id
            "#,
        )
        .bind(decision.as_i64())
        .fetch_all(self.conn())
        .await
        .map_err(|e| db_error("list stage suggestions", e))?;

        rows.iter().map(row_to_stage_suggestion).collect()
    }

    async fn insert_stage_suggestion(
        &mut self,
        proposal: &StageSuggestion,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO stage_suggestions (
                id, decision_id, author_id, author_name, stage, content, created_at, status
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(proposal.id().as_i64())
        .bind(proposal.decision_id().as_i64())
        .bind(proposal.author().id().as_i64())
        .bind(proposal.author().username())
        .bind(proposal.stage().key())
        .bind(proposal.content())
        .bind(proposal.created_at().as_datetime())
        .bind(proposal.status().as_str())
        .execute(self.conn())
        .await
        .map_err(|e| db_error("insert stage suggestion", e))?;

        Ok(())
    }

    async fn update_stage_suggestion(
        &mut self,
        proposal: &StageSuggestion,
    ) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE stage_suggestions SET status = $2 WHERE id = $1")
            .bind(proposal.id().as_i64())
            .bind(proposal.status().as_str())
            .execute(self.conn())
            .await
            .map_err(|e| db_error("update stage suggestion", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::StageSuggestionNotFound,
                format!("Stage suggestion not found: {}", proposal.id()),
            ));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Action log
    // ─────────────────────────────────────────────────────────────────────────

    async fn append_action(&mut self, entry: &ActionLogEntry) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO action_log (id, user_id, user_name, decision_id, action_type, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(entry.id().as_i64())
        .bind(entry.user().id().as_i64())
        .bind(entry.user().username())
        .bind(entry.decision_id().as_i64())
        .bind(entry.action_type().as_str())
        .bind(entry.timestamp().as_datetime())
        .execute(self.conn())
        .await
        .map_err(|e| db_error("append action", e))?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let unit = *self;
        unit.tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Helper functions
// ════════════════════════════════════════════════════════════════════════════

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to {}: {}", action, e),
    )
}

/// Reads a child's decision id. No `FOR UPDATE`: the caller locks the
/// decision next and the child after it.
fn parent_query(child: DecisionChild) -> String {
    format!("SELECT decision_id FROM {} WHERE id = $1", child.table())
}

/// Deletes every row of `table` that references the decision.
async fn delete_dependents(
    conn: &mut PgConnection,
    table: &'static str,
    decision: DecisionId,
) -> Result<u64, DomainError> {
    let sql = format!("DELETE FROM {} WHERE decision_id = $1", table);
    let result = sqlx::query(&sql)
        .bind(decision.as_i64())
        .execute(conn)
        .await
        .map_err(|e| db_error(&format!("delete from {}", table), e))?;
    Ok(result.rows_affected())
}
