use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::allocator::GreedyAllocator;
use super::domain::{Candidate, PlacementError, Slot};
use super::report::explain;
use super::report::views::ExplanationView;
use super::repository::{RunId, RunRecord, RunRepository, RunStoreError};
use super::scoring::{MatchingConfig, MatchingConfigError};
use crate::workflows::roster::{ImportDiagnostic, RosterImportError, RosterImporter};

/// Runs allocations and keeps each result under its own run id.
pub struct PlacementService<R> {
    repository: Arc<R>,
    config: MatchingConfig,
}

static RUN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_run_id() -> RunId {
    let id = RUN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RunId(format!("run-{id:06}"))
}

impl<R> PlacementService<R>
where
    R: RunRepository + 'static,
{
    pub fn new(repository: Arc<R>, config: MatchingConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Allocate with the service's default configuration.
    pub fn run(
        &self,
        candidates: &[Candidate],
        slots: Vec<Slot>,
    ) -> Result<RunRecord, PlacementServiceError> {
        self.run_with_config(candidates, slots, self.config.clone(), Vec::new())
    }

    pub fn run_with_config(
        &self,
        candidates: &[Candidate],
        slots: Vec<Slot>,
        config: MatchingConfig,
        diagnostics: Vec<ImportDiagnostic>,
    ) -> Result<RunRecord, PlacementServiceError> {
        config.validate()?;

        let outcome = GreedyAllocator::from_config(&config).allocate(candidates, &slots);
        let record = RunRecord {
            run_id: next_run_id(),
            created_at: Utc::now(),
            config,
            slots,
            outcome,
            diagnostics,
        };

        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Resolve both CSV rosters, then allocate. Either roster failing to resolve aborts the
    /// run before anything is stored.
    pub fn import_and_run(
        &self,
        students_csv: &str,
        sites_csv: &str,
        config: Option<MatchingConfig>,
    ) -> Result<RunRecord, PlacementServiceError> {
        let config = config.unwrap_or_else(|| self.config.clone());
        config.validate()?;

        let importer = RosterImporter::from_config(&config);
        let students = importer.candidates_from_reader(Cursor::new(students_csv.as_bytes()))?;
        let sites = importer.slots_from_reader(Cursor::new(sites_csv.as_bytes()))?;

        let mut diagnostics = students.diagnostics;
        diagnostics.extend(sites.diagnostics);

        self.run_with_config(&students.candidates, sites.slots, config, diagnostics)
    }

    pub fn get(&self, run_id: &RunId) -> Result<RunRecord, PlacementServiceError> {
        let record = self
            .repository
            .fetch(run_id)?
            .ok_or(RunStoreError::NotFound)?;
        Ok(record)
    }

    pub fn explain(
        &self,
        run_id: &RunId,
        candidate_id: &str,
    ) -> Result<ExplanationView, PlacementServiceError> {
        let record = self.get(run_id)?;
        let assignment = record.outcome.record_for(candidate_id)?;
        Ok(explain(assignment))
    }

    pub fn explain_at(
        &self,
        run_id: &RunId,
        index: usize,
    ) -> Result<ExplanationView, PlacementServiceError> {
        let record = self.get(run_id)?;
        let assignment = record.outcome.record_at(index)?;
        Ok(explain(assignment))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlacementServiceError {
    #[error(transparent)]
    Config(#[from] MatchingConfigError),
    #[error("roster resolution failed: {0}")]
    Import(#[from] RosterImportError),
    #[error(transparent)]
    Repository(#[from] RunStoreError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}
