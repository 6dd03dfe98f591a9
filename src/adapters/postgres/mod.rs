//! PostgreSQL adapters.
//!
//! Stage content is stored as a JSONB object keyed by stage key. User
//! references are copied onto rows as `(id, name)` pairs since accounts live
//! in an external identity system.

mod decision_reader;
mod pool;
mod rows;
mod workflow_store;

pub use decision_reader::PostgresDecisionReader;
pub use pool::connect;
pub use workflow_store::{PostgresUnit, PostgresWorkflowStore};
