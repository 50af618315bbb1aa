//! Scoring and greedy allocation of students to internship sites.
//!
//! A run scores every eligible site for each student in input order, takes the best one
//! (first in site order on ties), and consumes a seat and one unit of the supervisor's quota.
//! Capacity and quota state is created per run and handed back to the caller inside the
//! [`AllocationOutcome`]; nothing is retained between runs.

pub mod allocator;
pub mod domain;
pub mod eligibility;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use allocator::{AllocationOutcome, GreedyAllocator};
pub use domain::{
    AssignmentRecord, AssignmentStatus, Candidate, Criterion, CriterionScore, PlacementError,
    ScoreBreakdown, Slot, UNASSIGNED_LABEL,
};
pub use eligibility::{eligible, Eligibility, SlotState, SupervisorCounter};
pub use report::{PlacementReport, CANDIDATE_SEPARATOR};
pub use repository::{RunId, RunRecord, RunRepository, RunStoreError, RunView};
pub use router::{placement_router, CreateRunRequest};
pub use scoring::{
    CriterionRule, MatchScore, MatchingConfig, MatchingConfigError, ScoreModel, ScoringVariant,
    WeightedCriterion,
};
pub use service::{PlacementService, PlacementServiceError};
