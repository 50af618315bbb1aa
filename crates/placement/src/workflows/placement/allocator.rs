use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::{AssignmentRecord, AssignmentStatus, Candidate, PlacementError, Slot};
use super::eligibility::{eligible, Eligibility, SlotState, SupervisorCounter};
use super::scoring::{MatchScore, MatchingConfig, ScoreModel};

/// Single-pass greedy allocator. Candidates are placed strictly in input order and a
/// placement is never revisited.
#[derive(Debug, Clone)]
pub struct GreedyAllocator {
    model: ScoreModel,
    supervisor_quota: u32,
}

impl GreedyAllocator {
    pub fn new(model: ScoreModel, supervisor_quota: u32) -> Self {
        Self {
            model,
            supervisor_quota,
        }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(config.score_model(), config.supervisor_quota)
    }

    pub fn model(&self) -> &ScoreModel {
        &self.model
    }

    /// Runs one allocation. Capacity and supervisor counters live only inside this call;
    /// the caller's slot list is never mutated.
    pub fn allocate(&self, candidates: &[Candidate], slots: &[Slot]) -> AllocationOutcome {
        let mut run = AllocationRun::new(slots);
        let records = candidates
            .iter()
            .map(|candidate| run.place(candidate, &self.model, self.supervisor_quota))
            .collect::<Vec<_>>();

        let assigned = records.iter().filter(|record| record.is_assigned()).count();
        info!(
            candidates = records.len(),
            assigned,
            unassigned = records.len() - assigned,
            slots = slots.len(),
            "allocation run finished"
        );

        AllocationOutcome {
            records,
            slots: run.slots,
            supervisor_load: run.supervisors,
        }
    }
}

/// Mutable state of one run.
struct AllocationRun {
    slots: Vec<SlotState>,
    supervisors: SupervisorCounter,
}

impl AllocationRun {
    fn new(slots: &[Slot]) -> Self {
        Self {
            slots: slots.iter().cloned().map(SlotState::new).collect(),
            supervisors: SupervisorCounter::default(),
        }
    }

    fn place(&mut self, candidate: &Candidate, model: &ScoreModel, quota: u32) -> AssignmentRecord {
        let eligibility = eligible(&self.slots, &self.supervisors, quota);
        let status = match eligibility {
            Eligibility::NoCapacity => {
                debug!(candidate = %candidate.id, "no slot with remaining capacity");
                return AssignmentRecord::unassigned(candidate, model.empty_breakdown());
            }
            Eligibility::WithinQuota(_) => AssignmentStatus::Assigned,
            Eligibility::QuotaRelaxed(_) => AssignmentStatus::AssignedOverQuota,
        };

        // Strict comparison keeps the first slot in list order on ties.
        let mut best: Option<(usize, MatchScore)> = None;
        for &index in eligibility.indices() {
            let scored = model.score(candidate, &self.slots[index].slot);
            let better = match &best {
                Some((_, current)) => scored.score > current.score,
                None => true,
            };
            if better {
                best = Some((index, scored));
            }
        }

        let Some((index, MatchScore { score, breakdown })) = best else {
            return AssignmentRecord::unassigned(candidate, model.empty_breakdown());
        };

        let state = &mut self.slots[index];
        state.capacity_remaining -= 1;
        self.supervisors.record(&state.slot.supervisor);

        debug!(
            candidate = %candidate.id,
            slot = %state.slot.name,
            score,
            quota_relaxed = (status == AssignmentStatus::AssignedOverQuota),
            "candidate placed"
        );

        AssignmentRecord {
            candidate_id: candidate.id.clone(),
            first_name: candidate.first_name.clone(),
            last_name: candidate.last_name.clone(),
            status,
            slot_name: state.slot.name.clone(),
            slot_city: state.slot.city.clone(),
            slot_field: state.slot.field.clone(),
            supervisor: state.slot.supervisor.clone(),
            score,
            breakdown,
        }
    }
}

/// Result of one allocation run, owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationOutcome {
    /// One record per candidate, in input order.
    pub records: Vec<AssignmentRecord>,
    /// Final per-slot state, in input order.
    pub slots: Vec<SlotState>,
    pub supervisor_load: SupervisorCounter,
}

impl AllocationOutcome {
    pub fn assigned_count(&self) -> usize {
        self.records.iter().filter(|record| record.is_assigned()).count()
    }

    pub fn unassigned_count(&self) -> usize {
        self.records.len() - self.assigned_count()
    }

    /// The single record carrying the candidate id. Duplicate ids are refused; use
    /// [`Self::record_at`] for those.
    pub fn record_for(&self, candidate_id: &str) -> Result<&AssignmentRecord, PlacementError> {
        let mut matches = self
            .records
            .iter()
            .filter(|record| record.candidate_id == candidate_id);
        let first = matches
            .next()
            .ok_or_else(|| PlacementError::CandidateNotFound(candidate_id.to_string()))?;

        let others = matches.count();
        if others > 0 {
            return Err(PlacementError::AmbiguousCandidateId {
                id: candidate_id.to_string(),
                occurrences: others + 1,
            });
        }
        Ok(first)
    }

    /// Record by its zero-based position in run order.
    pub fn record_at(&self, index: usize) -> Result<&AssignmentRecord, PlacementError> {
        self.records
            .get(index)
            .ok_or(PlacementError::PositionOutOfRange {
                index,
                len: self.records.len(),
            })
    }

    /// Records sorted by score, highest first; equal scores keep run order.
    pub fn ranked(&self) -> Vec<&AssignmentRecord> {
        let mut ranked: Vec<&AssignmentRecord> = self.records.iter().collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }
}
