use super::super::domain::{AssignmentStatus, Criterion};
use serde::Serialize;

/// Row of the ranked results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub score: u8,
    pub candidate_name: String,
    pub candidate_id: String,
    pub slot_field: String,
    pub slot_city: String,
    pub slot_name: String,
    pub supervisor: String,
    pub status: AssignmentStatus,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotSummaryEntry {
    pub slot_name: String,
    pub slot_field: String,
    pub supervisor: String,
    pub candidate_count: usize,
    /// Candidate names in assignment order.
    pub candidate_names: Vec<String>,
    /// Names joined with [`super::CANDIDATE_SEPARATOR`].
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityEntry {
    pub slot_name: String,
    pub capacity: u32,
    pub used: u32,
    /// Capacity minus used; negative only when the input capacities were inconsistent.
    pub balance: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationPart {
    pub criterion: Criterion,
    pub label: &'static str,
    pub raw: u8,
    pub weight: f64,
    pub contribution: i32,
}

/// Why a candidate ended up where they did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplanationView {
    pub candidate_id: String,
    pub candidate_name: String,
    pub slot_name: String,
    pub status: AssignmentStatus,
    pub status_label: &'static str,
    pub score: u8,
    pub parts: Vec<ExplanationPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacementReportSummary {
    pub assigned: usize,
    pub unassigned: usize,
    pub results: Vec<ResultRow>,
    pub slot_summaries: Vec<SlotSummaryEntry>,
    pub capacities: Vec<CapacityEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_explanation: Option<ExplanationView>,
}
