//! Stage module - the ten fixed deliberation phases.
//!
//! - [`StageId`] is the closed set of stage keys
//! - the catalog maps each stage to its label and guidance text
//! - [`StageContent`] holds one rich-text slot per stage and the merge rule

pub mod catalog;
mod content;
mod stage_id;

pub use catalog::{all_stages, label_of, lookup, metadata_of, StageDetails};
pub use content::{is_blank, merge_stage_text, StageContent, EMPTY_RICH_TEXT, MERGE_SEPARATOR};
pub use stage_id::{StageId, UnknownStageError};
