//! Strongly-typed identifier value objects.
//!
//! Every persisted entity is keyed by a store-allocated 64-bit surrogate id.
//! The newtypes keep a `DecisionId` from being passed where a `SuggestionId`
//! is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

/// Declares an integer-backed identifier newtype.
macro_rules! surrogate_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Wraps a raw id, rejecting non-positive values.
            pub fn new(raw: i64) -> Result<Self, ValidationError> {
                if raw <= 0 {
                    return Err(ValidationError::invalid_format($field, "id must be positive"));
                }
                Ok(Self(raw))
            }

            /// Wraps a raw id coming from the store without validation.
            pub fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw integer value.
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw: i64 = s
                    .trim()
                    .parse()
                    .map_err(|_| ValidationError::invalid_format($field, "expected an integer id"))?;
                Self::new(raw)
            }
        }
    };
}

surrogate_id!(
    /// Identifier of a user account (owned by the identity system).
    UserId,
    "user_id"
);
surrogate_id!(
    /// Identifier of a decision record.
    DecisionId,
    "decision_id"
);
surrogate_id!(
    /// Identifier of an option attached to a decision.
    OptionId,
    "option_id"
);
surrogate_id!(
    /// Identifier of a whole-decision suggestion.
    SuggestionId,
    "suggestion_id"
);
surrogate_id!(
    /// Identifier of a clarification request.
    ClarificationId,
    "clarification_id"
);
surrogate_id!(
    /// Identifier of a proposed stage edit.
    StageSuggestionId,
    "stage_suggestion_id"
);
surrogate_id!(
    /// Identifier of an action log row.
    ActionId,
    "action_id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decision_id_parses_from_valid_string() {
        let id: DecisionId = "42".parse().unwrap();
        assert_eq!(id.as_i64(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn decision_id_rejects_non_numeric_string() {
        let result = "abc".parse::<DecisionId>();
        match result {
            Err(ValidationError::InvalidFormat { field, .. }) => assert_eq!(field, "decision_id"),
            other => panic!("Expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn user_id_rejects_zero_and_negative() {
        assert!(UserId::new(0).is_err());
        assert!(UserId::new(-5).is_err());
        assert!(UserId::new(1).is_ok());
    }

    #[test]
    fn ids_serialize_as_plain_integers() {
        let id = SuggestionId::from_raw(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");

        let back: SuggestionId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn ids_order_by_raw_value() {
        assert!(ActionId::from_raw(1) < ActionId::from_raw(2));
    }
}
