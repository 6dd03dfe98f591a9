//! PostgreSQL implementation of DecisionReader.
//!
//! Plain reads against the pool, outside any unit of work. The analytics
//! snapshot reads both tables inside one repeatable-read transaction.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::{AnalyticsSnapshot, DecisionReader, DecisionSummary, PendingCounts};

use super::rows::{row_to_action, row_to_facts, row_to_summary};

/// First statement of the analytics transaction. Both reads see the same
/// snapshot, so no action can point at a decision the report has not loaded.
const SNAPSHOT_ISOLATION: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

const SUMMARY_COLUMNS: &str =
    "id, title, owner_id, owner_name, category, status, current_stage, is_public, deadline, created_at";

/// PostgreSQL implementation of DecisionReader.
#[derive(Clone)]
pub struct PostgresDecisionReader {
    pool: PgPool,
}

impl PostgresDecisionReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DecisionReader for PostgresDecisionReader {
    async fn list_owned(
        &self,
        owner: UserId,
        category: Option<&str>,
    ) -> Result<Vec<DecisionSummary>, DomainError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM decisions
            WHERE owner_id = $1
              AND ($2::TEXT IS NULL OR category = $2)
            ORDER BY created_at DESC, id DESC
            "#,
            SUMMARY_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(owner.as_i64())
            .bind(category)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to list owned decisions: {}", e),
                )
            })?;

        rows.iter().map(row_to_summary).collect()
    }

    async fn list_public(
        &self,
        exclude_owner: Option<UserId>,
        category: Option<&str>,
    ) -> Result<Vec<DecisionSummary>, DomainError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM decisions
            WHERE is_public
              AND ($1::BIGINT IS NULL OR owner_id <> $1)
              AND ($2::TEXT IS NULL OR category = $2)
            ORDER BY created_at DESC, id DESC
            "#,
            SUMMARY_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(exclude_owner.map(|id| id.as_i64()))
            .bind(category)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to list public decisions: {}", e),
                )
            })?;

        rows.iter().map(row_to_summary).collect()
    }

    async fn categories(&self) -> Result<Vec<String>, DomainError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT TRIM(category) AS category
            FROM decisions
            WHERE TRIM(category) <> ''
            ORDER BY category
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list categories: {}", e),
            )
        })?;

        Ok(rows.into_iter().map(|(c,)| c).collect())
    }

    async fn pending_counts(&self, owner: UserId) -> Result<PendingCounts, DomainError> {
        let (suggestions, clarifications): (i64, i64) = sqlx::query_as(
            r#"
            SELECT
                (SELECT COUNT(*) FROM suggestions s
                   JOIN decisions d ON d.id = s.decision_id
                  WHERE d.owner_id = $1 AND s.status = 'pending'),
                (SELECT COUNT(*) FROM clarifications c
                   JOIN decisions d ON d.id = c.decision_id
                  WHERE d.owner_id = $1 AND c.status = 'pending')
            "#,
        )
        .bind(owner.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to count pending feedback: {}", e),
            )
        })?;

        Ok(PendingCounts {
            suggestions: suggestions.max(0) as u64,
            clarifications: clarifications.max(0) as u64,
        })
    }

    async fn analytics_snapshot(&self) -> Result<AnalyticsSnapshot, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to begin snapshot transaction: {}", e),
            )
        })?;

        sqlx::query(SNAPSHOT_ISOLATION)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to set snapshot isolation: {}", e),
                )
            })?;

        let decision_rows =
            sqlx::query("SELECT id, owner_id, owner_name, category FROM decisions ORDER BY id")
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Failed to read decisions for analytics: {}", e),
                    )
                })?;

        let action_rows = sqlx::query(
            "SELECT id, user_id, user_name, decision_id, action_type, timestamp FROM action_log ORDER BY id",
        )
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to read action log: {}", e),
            )
        })?;

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit transaction: {}", e),
            )
        })?;

        Ok(AnalyticsSnapshot {
            decisions: decision_rows
                .iter()
                .map(row_to_facts)
                .collect::<Result<_, _>>()?,
            actions: action_rows
                .iter()
                .map(row_to_action)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_isolation_is_repeatable_read_and_read_only() {
        assert!(SNAPSHOT_ISOLATION.starts_with("SET TRANSACTION"));
        assert!(SNAPSHOT_ISOLATION.contains("REPEATABLE READ"));
        assert!(SNAPSHOT_ISOLATION.contains("READ ONLY"));
    }

    #[test]
    fn summary_columns_cover_row_mapping() {
        for column in ["id", "owner_id", "status", "current_stage", "is_public", "deadline"] {
            assert!(SUMMARY_COLUMNS.split(", ").any(|c| c == column), "{}", column);
        }
    }
}
