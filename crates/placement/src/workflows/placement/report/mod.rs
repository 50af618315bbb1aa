pub mod export;
mod summary;
pub mod views;

pub use export::ExportError;
pub use summary::{capacity_reconciliation, explain, slot_summaries, PlacementReport};

/// Separator between candidate names in a slot recommendation.
pub const CANDIDATE_SEPARATOR: &str = " + ";
