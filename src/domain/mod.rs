//! Domain layer - Core business logic and domain types.
//!
//! This layer contains:
//! - `foundation` - Shared value objects, IDs, errors and the capability check
//! - `stage` - The ten deliberation stages and per-stage content
//! - `decision` - Decision records and options
//! - `contribution` - Suggestions, clarifications and stage suggestions
//! - `activity` - The append-only action log
//! - `analytics` - Interaction aggregation
//! - `assist` - Rule-based option ideas

pub mod activity;
pub mod analytics;
pub mod assist;
pub mod contribution;
pub mod decision;
pub mod foundation;
pub mod stage;
