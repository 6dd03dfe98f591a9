//! Assistant-backed query handlers.

mod clarify_description;
mod refine_option;
mod suggest_options;
mod suggest_stage_text;

pub use clarify_description::{
    ClarifiedDescription, ClarifyDescriptionHandler, ClarifyDescriptionQuery,
};
pub use refine_option::{RefineOptionHandler, RefineOptionQuery, RefinedOption};
pub use suggest_options::{
    IdeaSource, OptionIdeas, SuggestOptionsHandler, SuggestOptionsQuery, IDEA_COUNT,
};
pub use suggest_stage_text::{StageDraft, SuggestStageTextHandler, SuggestStageTextQuery};
