//! Adapters - Implementations of port interfaces.
//!
//! - `postgres` - transactional store and reader on PostgreSQL
//! - `memory` - the same ports held in process, for tests and demos
//! - `assistant` - text-completion providers

pub mod assistant;
pub mod memory;
pub mod postgres;

pub use assistant::{
    assistant_from_config, ChatCompletionsAssistant, ChatCompletionsConfig, DisabledAssistant,
    ScriptedAssistant, ScriptedCall,
};
pub use memory::{InMemoryUnit, InMemoryWorkflowStore, StaticIdentityProvider};
pub use postgres::{PostgresDecisionReader, PostgresUnit, PostgresWorkflowStore};
