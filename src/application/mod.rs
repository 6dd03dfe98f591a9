//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Commands go through a [`WorkflowStore`](crate::ports::WorkflowStore) unit of
//! work; listing and analytics queries read through a
//! [`DecisionReader`](crate::ports::DecisionReader).

pub mod handlers;

pub use handlers::*;
