//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `WorkflowStore` / `WorkflowUnit` - Transactional unit of work over all workflow tables
//! - `DecisionReader` - Listing and analytics queries
//!
//! ## Collaborator Ports
//!
//! - `DecisionAssistant` - Classification, stage text, option ideas and rewrites
//! - `IdentityProvider` - The current caller and their admin flag

mod assistant;
mod decision_reader;
mod identity;
mod workflow_store;

pub use assistant::{
    AssistError, ClarifyDescriptionRequest, DecisionAssistant, OptionIdeasRequest,
    RefineOptionRequest, StageTextRequest,
};
pub use decision_reader::{AnalyticsSnapshot, DecisionReader, DecisionSummary, PendingCounts};
pub use identity::{resolve_actor, IdentityProvider};
pub use workflow_store::{
    CascadeSummary, DecisionChild, IdSequence, WorkflowStore, WorkflowUnit,
};
