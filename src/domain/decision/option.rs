//! Options attached to a decision.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DecisionId, OptionId, ValidationError};

use super::MAX_TITLE_LENGTH;

/// The four text fields shared by options and whole-decision suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDetails {
    pub title: String,
    pub description: String,
    pub pros: String,
    pub cons: String,
}

impl OptionDetails {
    /// Validates the title (1-140 characters after trimming).
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        pros: impl Into<String>,
        cons: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            title: validate_title(&title.into())?,
            description: description.into(),
            pros: pros.into(),
            cons: cons.into(),
        })
    }

    /// Only a title; the other fields empty.
    pub fn titled(title: impl Into<String>) -> Result<Self, ValidationError> {
        Self::new(title, "", "", "")
    }
}

/// An alternative under consideration for a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionOption {
    id: OptionId,
    decision_id: DecisionId,
    details: OptionDetails,
}

impl DecisionOption {
    pub fn new(id: OptionId, decision_id: DecisionId, details: OptionDetails) -> Self {
        Self {
            id,
            decision_id,
            details,
        }
    }

    pub fn id(&self) -> OptionId {
        self.id
    }

    pub fn decision_id(&self) -> DecisionId {
        self.decision_id
    }

    pub fn details(&self) -> &OptionDetails {
        &self.details
    }

    pub fn title(&self) -> &str {
        &self.details.title
    }

    /// Overwrites all four fields.
    pub fn update(&mut self, details: OptionDetails) {
        self.details = details;
    }
}

/// Trims and bounds a title.
pub(crate) fn validate_title(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("title"));
    }
    let len = trimmed.chars().count();
    if len > MAX_TITLE_LENGTH {
        return Err(ValidationError::too_long("title", MAX_TITLE_LENGTH, len));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_trim_title() {
        let details = OptionDetails::new("  Stay put  ", "d", "p", "c").unwrap();
        assert_eq!(details.title, "Stay put");
    }

    #[test]
    fn details_reject_blank_title() {
        assert_eq!(
            OptionDetails::titled("   "),
            Err(ValidationError::empty_field("title"))
        );
    }

    #[test]
    fn details_reject_long_title() {
        let long = "x".repeat(141);
        assert!(matches!(
            OptionDetails::titled(long),
            Err(ValidationError::TooLong { max: 140, actual: 141, .. })
        ));
        assert!(OptionDetails::titled("x".repeat(140)).is_ok());
    }

    #[test]
    fn update_replaces_all_fields() {
        let mut option = DecisionOption::new(
            OptionId::from_raw(1),
            DecisionId::from_raw(1),
            OptionDetails::new("A", "a", "pro", "con").unwrap(),
        );
        option.update(OptionDetails::titled("B").unwrap());
        assert_eq!(option.title(), "B");
        assert_eq!(option.details().pros, "");
    }
}
