//! Decision record aggregate.
//!
//! A decision owns one content slot per stage and cascades ownership of every
//! option, contribution and action-log row that references it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    Authorizable, DecisionId, Timestamp, UserId, UserRef, ValidationError,
};
use crate::domain::stage::{merge_stage_text, StageContent, StageId};

use super::option::validate_title;

/// Maximum length for decision and option titles.
pub const MAX_TITLE_LENGTH: usize = 140;

/// Maximum length for a category label.
pub const MAX_CATEGORY_LENGTH: usize = 50;

/// Category used when classification fails or returns nothing.
pub const DEFAULT_CATEGORY: &str = "General";

/// Whether the decision is still being deliberated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    #[default]
    Open,
    Closed,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionStatus::Open => "open",
            DecisionStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DecisionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(DecisionStatus::Open),
            "closed" => Ok(DecisionStatus::Closed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("expected open or closed, got '{}'", other),
            )),
        }
    }
}

/// A personal decision walked through the ten stages.
///
/// # Invariants
///
/// - `title` is 1-140 characters after trimming
/// - `category` is non-empty and at most 50 characters
/// - `stage_content` has exactly one slot per stage
/// - `owner` never changes after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionRecord {
    id: DecisionId,
    owner: UserRef,
    title: String,
    description: Option<String>,
    deadline: Option<Timestamp>,
    created_at: Timestamp,
    status: DecisionStatus,
    current_stage: StageId,
    category: String,
    is_public: bool,
    stage_content: StageContent,
}

impl DecisionRecord {
    /// Creates an open, public decision at the first stage.
    ///
    /// # Errors
    ///
    /// - `EmptyField` / `TooLong` for an invalid title
    pub fn new(
        id: DecisionId,
        owner: UserRef,
        title: &str,
        category: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            owner,
            title: validate_title(title)?,
            description: None,
            deadline: None,
            created_at: Timestamp::now(),
            status: DecisionStatus::Open,
            current_stage: StageId::default(),
            category: normalize_category(category),
            is_public: true,
            stage_content: StageContent::empty(),
        })
    }

    /// Reconstitute from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: DecisionId,
        owner: UserRef,
        title: String,
        description: Option<String>,
        deadline: Option<Timestamp>,
        created_at: Timestamp,
        status: DecisionStatus,
        current_stage: StageId,
        category: String,
        is_public: bool,
        stage_content: StageContent,
    ) -> Self {
        Self {
            id,
            owner,
            title,
            description,
            deadline,
            created_at,
            status,
            current_stage,
            category,
            is_public,
            stage_content,
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.set_description(description);
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Timestamp>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn with_stage(mut self, stage: StageId) -> Self {
        self.current_stage = stage;
        self
    }

    pub fn with_visibility(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn with_content(mut self, content: StageContent) -> Self {
        self.stage_content = content;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> DecisionId {
        self.id
    }

    pub fn owner(&self) -> &UserRef {
        &self.owner
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn deadline(&self) -> Option<&Timestamp> {
        self.deadline.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn status(&self) -> DecisionStatus {
        self.status
    }

    pub fn current_stage(&self) -> StageId {
        self.current_stage
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn stage_content(&self) -> &StageContent {
        &self.stage_content
    }

    pub fn stage_text(&self, stage: StageId) -> &str {
        self.stage_content.get(stage)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations (callers check Manage capability first)
    // ─────────────────────────────────────────────────────────────────────────

    /// # Errors
    ///
    /// - `EmptyField` / `TooLong` for an invalid title
    pub fn rename(&mut self, title: &str) -> Result<(), ValidationError> {
        self.title = validate_title(title)?;
        Ok(())
    }

    /// Sets the description; blank text clears it.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description.filter(|d| !d.trim().is_empty());
    }

    pub fn set_deadline(&mut self, deadline: Option<Timestamp>) {
        self.deadline = deadline;
    }

    pub fn set_status(&mut self, status: DecisionStatus) {
        self.status = status;
    }

    pub fn set_visibility(&mut self, is_public: bool) {
        self.is_public = is_public;
    }

    pub fn move_to_stage(&mut self, stage: StageId) {
        self.current_stage = stage;
    }

    pub fn set_category(&mut self, category: &str) {
        self.category = normalize_category(category);
    }

    /// Overwrites one stage slot wholesale.
    pub fn set_stage_text(&mut self, stage: StageId, text: impl Into<String>) {
        self.stage_content.set(stage, text);
    }

    /// Folds a proposal into a stage slot and returns the new text.
    pub fn merge_into_stage(&mut self, stage: StageId, proposal: &str, author: &str) -> &str {
        let merged = merge_stage_text(self.stage_content.get(stage), proposal, author);
        self.stage_content.set(stage, merged);
        self.stage_content.get(stage)
    }
}

impl Authorizable for DecisionRecord {
    const RESOURCE_TYPE: &'static str = "Decision";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }

    fn owner_id(&self) -> UserId {
        self.owner.id()
    }

    fn is_public(&self) -> bool {
        self.is_public
    }
}

/// Trims a category and bounds it; blank input becomes the default category.
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches(|c| c == '"' || c == '.').trim();
    if trimmed.is_empty() {
        return DEFAULT_CATEGORY.to_string();
    }
    trimmed.chars().take(MAX_CATEGORY_LENGTH).collect()
}
