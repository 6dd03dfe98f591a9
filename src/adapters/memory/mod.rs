//! In-process adapters.
//!
//! - `InMemoryWorkflowStore` - transactional store and reader without a database
//! - `StaticIdentityProvider` - fixed caller identity

mod identity;
mod workflow_store;

pub use identity::StaticIdentityProvider;
pub use workflow_store::{InMemoryUnit, InMemoryWorkflowStore};
