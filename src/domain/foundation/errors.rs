//! Error types for the domain layer.
//!
//! - `ValidationError` - value object construction failures
//! - `DomainError` - coded errors returned by ports and adapters
//! - `WorkflowError` - the taxonomy reported to callers of workflow operations

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be at most {max} characters, got {actual}")]
    TooLong {
        field: String,
        max: usize,
        actual: usize,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a too-long validation error.
    pub fn too_long(field: impl Into<String>, max: usize, actual: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    UnknownStage,

    // Not found errors
    DecisionNotFound,
    OptionNotFound,
    SuggestionNotFound,
    ClarificationNotFound,
    StageSuggestionNotFound,

    // State errors
    InvalidStateTransition,

    // Authorization errors
    Forbidden,

    // Collaborator errors
    AssistantUnavailable,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::UnknownStage => "UNKNOWN_STAGE",
            ErrorCode::DecisionNotFound => "DECISION_NOT_FOUND",
            ErrorCode::OptionNotFound => "OPTION_NOT_FOUND",
            ErrorCode::SuggestionNotFound => "SUGGESTION_NOT_FOUND",
            ErrorCode::ClarificationNotFound => "CLARIFICATION_NOT_FOUND",
            ErrorCode::StageSuggestionNotFound => "STAGE_SUGGESTION_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::AssistantUnavailable => "ASSISTANT_UNAVAILABLE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// Ports and adapters speak this type; handlers convert it into
/// [`WorkflowError`] at the boundary.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Shorthand for a storage failure.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

/// Errors reported to callers of workflow operations.
///
/// All variants are surfaced synchronously and none are retried internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Malformed input (empty or oversized title, blank content, ...).
    #[error("Validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// A stage key outside the fixed catalog.
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    /// The actor lacks ownership/admin rights or breaks the self-suggestion rule.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The contribution is already in a terminal state.
    #[error("Cannot move {entity} from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    /// A referenced id does not exist.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: i64 },

    /// Storage or other infrastructure failure.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl WorkflowError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        WorkflowError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn forbidden(reason: impl Into<String>) -> Self {
        WorkflowError::Forbidden(reason.into())
    }

    pub fn not_found(resource: &'static str, id: i64) -> Self {
        WorkflowError::NotFound { resource, id }
    }

    /// Maps the error onto the shared code table.
    pub fn code(&self) -> ErrorCode {
        match self {
            WorkflowError::Validation { .. } => ErrorCode::ValidationFailed,
            WorkflowError::UnknownStage(_) => ErrorCode::UnknownStage,
            WorkflowError::Forbidden(_) => ErrorCode::Forbidden,
            WorkflowError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            WorkflowError::NotFound { resource, .. } => match *resource {
                "Option" => ErrorCode::OptionNotFound,
                "Suggestion" => ErrorCode::SuggestionNotFound,
                "Clarification" => ErrorCode::ClarificationNotFound,
                "StageSuggestion" => ErrorCode::StageSuggestionNotFound,
                _ => ErrorCode::DecisionNotFound,
            },
            WorkflowError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<ValidationError> for WorkflowError {
    fn from(err: ValidationError) -> Self {
        WorkflowError::Validation {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for WorkflowError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => WorkflowError::Validation {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::UnknownStage => WorkflowError::UnknownStage(err.message),
            ErrorCode::Forbidden => WorkflowError::Forbidden(err.message),
            ErrorCode::InvalidStateTransition => WorkflowError::InvalidTransition {
                entity: "record",
                from: err.details.get("from").cloned().unwrap_or_default(),
                to: err.details.get("to").cloned().unwrap_or_default(),
            },
            _ => WorkflowError::Infrastructure(err.to_string()),
        }
    }
}
