//! Row to domain conversions shared by the store and the reader.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::Row;
use std::str::FromStr;

use crate::domain::activity::{ActionLogEntry, ActionType};
use crate::domain::analytics::DecisionFacts;
use crate::domain::contribution::{
    Clarification, ClarificationStatus, ReviewStatus, StageSuggestion, Suggestion,
};
use crate::domain::decision::{DecisionOption, DecisionRecord, DecisionStatus, OptionDetails};
use crate::domain::foundation::{
    ActionId, ClarificationId, DecisionId, DomainError, ErrorCode, OptionId, StageSuggestionId,
    SuggestionId, Timestamp, UserId, UserRef,
};
use crate::domain::stage::{StageContent, StageId};
use crate::ports::DecisionSummary;

/// Column list selected for every decision query.
pub(super) const DECISION_COLUMNS: &str = "id, owner_id, owner_name, title, description, \
     deadline, created_at, status, current_stage, category, is_public, stage_content";

/// Reads a column, mapping decode failures to `DatabaseError`.
fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name).map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Failed to get {}: {}", name, e),
        )
    })
}

fn parsed<T>(row: &PgRow, name: &str) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = column(row, name)?;
    parse_text(name, &raw)
}

/// Parses a text column value. A value the domain rejects is a
/// `DatabaseError`: the row was written by something other than this crate.
fn parse_text<T>(name: &str, raw: &str) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} '{}': {}", name, raw, e),
        )
    })
}

fn timestamp(row: &PgRow, name: &str) -> Result<Timestamp, DomainError> {
    let value: DateTime<Utc> = column(row, name)?;
    Ok(Timestamp::from_datetime(value))
}

fn user(row: &PgRow, id_column: &str, name_column: &str) -> Result<UserRef, DomainError> {
    let id: i64 = column(row, id_column)?;
    let name: String = column(row, name_column)?;
    Ok(UserRef::reconstitute(UserId::from_raw(id), name))
}

fn details(row: &PgRow) -> Result<OptionDetails, DomainError> {
    Ok(OptionDetails {
        title: column(row, "title")?,
        description: column(row, "description")?,
        pros: column(row, "pros")?,
        cons: column(row, "cons")?,
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Entity mappers
// ════════════════════════════════════════════════════════════════════════════

pub(super) fn row_to_decision(row: &PgRow) -> Result<DecisionRecord, DomainError> {
    let deadline: Option<DateTime<Utc>> = column(row, "deadline")?;
    let content: Json<StageContent> = column(row, "stage_content")?;
    let status: DecisionStatus = parsed(row, "status")?;
    let stage: StageId = parsed(row, "current_stage")?;

    Ok(DecisionRecord::reconstitute(
        DecisionId::from_raw(column(row, "id")?),
        user(row, "owner_id", "owner_name")?,
        column(row, "title")?,
        column(row, "description")?,
        deadline.map(Timestamp::from_datetime),
        timestamp(row, "created_at")?,
        status,
        stage,
        column(row, "category")?,
        column(row, "is_public")?,
        content.0,
    ))
}

pub(super) fn row_to_summary(row: &PgRow) -> Result<DecisionSummary, DomainError> {
    let deadline: Option<DateTime<Utc>> = column(row, "deadline")?;
    Ok(DecisionSummary {
        id: DecisionId::from_raw(column(row, "id")?),
        title: column(row, "title")?,
        owner: user(row, "owner_id", "owner_name")?,
        category: column(row, "category")?,
        status: parsed(row, "status")?,
        current_stage: parsed(row, "current_stage")?,
        is_public: column(row, "is_public")?,
        deadline: deadline.map(Timestamp::from_datetime),
        created_at: timestamp(row, "created_at")?,
    })
}

pub(super) fn row_to_facts(row: &PgRow) -> Result<DecisionFacts, DomainError> {
    Ok(DecisionFacts {
        id: DecisionId::from_raw(column(row, "id")?),
        owner: user(row, "owner_id", "owner_name")?,
        category: column(row, "category")?,
    })
}

pub(super) fn row_to_option(row: &PgRow) -> Result<DecisionOption, DomainError> {
    Ok(DecisionOption::new(
        OptionId::from_raw(column(row, "id")?),
        DecisionId::from_raw(column(row, "decision_id")?),
        details(row)?,
    ))
}

pub(super) fn row_to_suggestion(row: &PgRow) -> Result<Suggestion, DomainError> {
    let status: ReviewStatus = parsed(row, "status")?;
    Ok(Suggestion::reconstitute(
        SuggestionId::from_raw(column(row, "id")?),
        DecisionId::from_raw(column(row, "decision_id")?),
        user(row, "author_id", "author_name")?,
        details(row)?,
        timestamp(row, "created_at")?,
        status,
    ))
}

pub(super) fn row_to_clarification(row: &PgRow) -> Result<Clarification, DomainError> {
    let status: ClarificationStatus = parsed(row, "status")?;
    Ok(Clarification::reconstitute(
        ClarificationId::from_raw(column(row, "id")?),
        DecisionId::from_raw(column(row, "decision_id")?),
        user(row, "author_id", "author_name")?,
        column(row, "message")?,
        timestamp(row, "created_at")?,
        status,
    ))
}

pub(super) fn row_to_stage_suggestion(row: &PgRow) -> Result<StageSuggestion, DomainError> {
    let status: ReviewStatus = parsed(row, "status")?;
    let stage: StageId = parsed(row, "stage")?;
    Ok(StageSuggestion::reconstitute(
        StageSuggestionId::from_raw(column(row, "id")?),
        DecisionId::from_raw(column(row, "decision_id")?),
        user(row, "author_id", "author_name")?,
        stage,
        column(row, "content")?,
        timestamp(row, "created_at")?,
        status,
    ))
}

pub(super) fn row_to_action(row: &PgRow) -> Result<ActionLogEntry, DomainError> {
    let action_type: ActionType = parsed(row, "action_type")?;
    Ok(ActionLogEntry::reconstitute(
        ActionId::from_raw(column(row, "id")?),
        user(row, "user_id", "user_name")?,
        DecisionId::from_raw(column(row, "decision_id")?),
        action_type,
        timestamp(row, "timestamp")?,
    ))
}
