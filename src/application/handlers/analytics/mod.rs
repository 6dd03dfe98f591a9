//! Analytics query handlers.

mod get_interaction_report;

pub use get_interaction_report::{GetInteractionReportHandler, GetInteractionReportQuery};
