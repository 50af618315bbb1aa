use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::allocator::AllocationOutcome;
use super::domain::Slot;
use super::report::views::PlacementReportSummary;
use super::report::PlacementReport;
use super::scoring::{MatchingConfig, ScoringVariant};
use crate::workflows::roster::ImportDiagnostic;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RunId(pub String);

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A finished allocation run with everything needed to rebuild its reports.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub run_id: RunId,
    pub created_at: DateTime<Utc>,
    pub config: MatchingConfig,
    pub slots: Vec<Slot>,
    pub outcome: AllocationOutcome,
    pub diagnostics: Vec<ImportDiagnostic>,
}

impl RunRecord {
    pub fn report(&self) -> PlacementReport<'_> {
        PlacementReport::new(&self.slots, &self.outcome)
    }

    pub fn view(&self) -> RunView {
        RunView {
            run_id: self.run_id.clone(),
            created_at: self.created_at,
            scoring_variant: self.config.scoring_variant,
            supervisor_quota: self.config.supervisor_quota,
            summary: self.report().summary(),
            diagnostics: self.diagnostics.clone(),
        }
    }
}

/// Storage for finished runs, keyed per run so concurrent callers never share results.
pub trait RunRepository: Send + Sync {
    fn insert(&self, record: RunRecord) -> Result<RunRecord, RunStoreError>;
    fn fetch(&self, id: &RunId) -> Result<Option<RunRecord>, RunStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RunStoreError {
    #[error("run already exists")]
    Conflict,
    #[error("run not found")]
    NotFound,
    #[error("run store unavailable: {0}")]
    Unavailable(String),
}

/// API representation of a stored run.
#[derive(Debug, Clone, Serialize)]
pub struct RunView {
    pub run_id: RunId,
    pub created_at: DateTime<Utc>,
    pub scoring_variant: ScoringVariant,
    pub supervisor_quota: u32,
    pub summary: PlacementReportSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<ImportDiagnostic>,
}
