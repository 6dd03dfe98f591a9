//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Each handler
//! runs in exactly one unit of work and checks one capability.

pub mod analytics;
pub mod assist;
pub mod contribution;
pub mod decision;
pub mod option;

pub(crate) mod support;

#[cfg(test)]
pub(crate) mod testing;

pub use analytics::{GetInteractionReportHandler, GetInteractionReportQuery};
pub use assist::{
    ClarifiedDescription, ClarifyDescriptionHandler, ClarifyDescriptionQuery, IdeaSource,
    OptionIdeas, RefineOptionHandler, RefineOptionQuery, RefinedOption, StageDraft,
    SuggestOptionsHandler, SuggestOptionsQuery, SuggestStageTextHandler, SuggestStageTextQuery,
};
pub use contribution::{
    ClarificationResolution, RequestClarificationCommand, RequestClarificationHandler,
    ResolveClarificationCommand, ResolveClarificationHandler, ReviewStageSuggestionCommand,
    ReviewStageSuggestionHandler, ReviewStageSuggestionResult, ReviewSuggestionCommand,
    ReviewSuggestionHandler, ReviewSuggestionResult, ReviewVerdict, SubmitStageSuggestionCommand,
    SubmitStageSuggestionHandler, SubmitSuggestionCommand, SubmitSuggestionHandler,
};
pub use decision::{
    BulkDeleteDecisionsCommand, BulkDeleteDecisionsHandler, BulkDeleteDecisionsResult,
    CreateDecisionCommand, CreateDecisionHandler, CreateDecisionResult, DecisionListing,
    DecisionView, DeleteDecisionCommand, DeleteDecisionHandler, DeleteDecisionResult,
    EditDecisionCommand, EditDecisionHandler, EditDecisionResult, ListDecisionsHandler,
    ListDecisionsQuery, UpdateStageContentCommand, UpdateStageContentHandler,
    UpdateStageContentResult, ViewDecisionHandler, ViewDecisionQuery,
};
pub use option::{
    AddOptionCommand, AddOptionHandler, DeleteOptionCommand, DeleteOptionHandler,
    EditOptionCommand, EditOptionHandler,
};
