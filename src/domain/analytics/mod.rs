//! Analytics module - on-demand interaction aggregation.
//!
//! Nothing here is cached; every report is re-derived from decisions and the
//! action log.

mod aggregator;

pub use aggregator::{
    DecisionFacts, InteractionAggregator, InteractionReport, UserInteractionStats,
    HIGH_INTERACTION_THRESHOLD, TOP_CATEGORY_LIMIT,
};
