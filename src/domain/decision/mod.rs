//! Decision module - the decision record and its options.

mod option;
mod record;

pub(crate) use option::validate_title;
pub use option::{DecisionOption, OptionDetails};
pub use record::{
    normalize_category, DecisionRecord, DecisionStatus, DEFAULT_CATEGORY, MAX_CATEGORY_LENGTH,
    MAX_TITLE_LENGTH,
};
