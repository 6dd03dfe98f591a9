//! Deliberation - collaborative decision workflow engine
//!
//! Decisions move through a fixed ten-stage catalog. Owners fill stage
//! content and options; other users contribute suggestions, clarification
//! requests and stage proposals, which the owner accepts or ignores. Every
//! interaction lands in an append-only action log that feeds per-user
//! analytics.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
