//! Decision command and query handlers.

mod bulk_delete_decisions;
mod create_decision;
mod delete_decision;
mod edit_decision;
mod list_decisions;
mod update_stage_content;
mod view_decision;

pub use bulk_delete_decisions::{
    BulkDeleteDecisionsCommand, BulkDeleteDecisionsHandler, BulkDeleteDecisionsResult,
};
pub use create_decision::{CreateDecisionCommand, CreateDecisionHandler, CreateDecisionResult};
pub use delete_decision::{DeleteDecisionCommand, DeleteDecisionHandler, DeleteDecisionResult};
pub use edit_decision::{EditDecisionCommand, EditDecisionHandler, EditDecisionResult};
pub use list_decisions::{DecisionListing, ListDecisionsHandler, ListDecisionsQuery};
pub use update_stage_content::{
    UpdateStageContentCommand, UpdateStageContentHandler, UpdateStageContentResult,
};
pub use view_decision::{DecisionView, ViewDecisionHandler, ViewDecisionQuery};
