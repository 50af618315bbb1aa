use super::super::allocator::AllocationOutcome;
use super::super::domain::{AssignmentRecord, Slot};
use super::views::{
    CapacityEntry, ExplanationPart, ExplanationView, PlacementReportSummary, ResultRow,
    SlotSummaryEntry,
};
use super::CANDIDATE_SEPARATOR;
use std::collections::BTreeMap;

/// Read-only view over a finished run and the slot list it was run against.
#[derive(Debug, Clone, Copy)]
pub struct PlacementReport<'a> {
    slots: &'a [Slot],
    outcome: &'a AllocationOutcome,
}

impl<'a> PlacementReport<'a> {
    pub fn new(slots: &'a [Slot], outcome: &'a AllocationOutcome) -> Self {
        Self { slots, outcome }
    }

    pub fn results(&self) -> Vec<ResultRow> {
        self.outcome.ranked().into_iter().map(result_row).collect()
    }

    pub fn slot_summaries(&self) -> Vec<SlotSummaryEntry> {
        slot_summaries(&self.outcome.records)
    }

    pub fn capacities(&self) -> Vec<CapacityEntry> {
        capacity_reconciliation(self.slots, &self.outcome.records)
    }

    pub fn summary(&self) -> PlacementReportSummary {
        PlacementReportSummary {
            assigned: self.outcome.assigned_count(),
            unassigned: self.outcome.unassigned_count(),
            results: self.results(),
            slot_summaries: self.slot_summaries(),
            capacities: self.capacities(),
            first_explanation: self.outcome.records.first().map(explain),
        }
    }
}

fn result_row(record: &AssignmentRecord) -> ResultRow {
    ResultRow {
        score: record.score,
        candidate_name: record.candidate_name(),
        candidate_id: record.candidate_id.clone(),
        slot_field: record.slot_field.clone(),
        slot_city: record.slot_city.clone(),
        slot_name: record.placement_label().to_string(),
        supervisor: record.supervisor.clone(),
        status: record.status,
        status_label: record.status.label(),
    }
}

/// Groups every record by (slot name, field, supervisor), ordered by that key. Unassigned
/// candidates form their own group under the unassigned label with empty field and supervisor.
pub fn slot_summaries(records: &[AssignmentRecord]) -> Vec<SlotSummaryEntry> {
    let mut groups: BTreeMap<(&str, &str, &str), Vec<String>> = BTreeMap::new();
    for record in records {
        groups
            .entry((
                record.placement_label(),
                record.slot_field.as_str(),
                record.supervisor.as_str(),
            ))
            .or_default()
            .push(record.candidate_name());
    }

    groups
        .into_iter()
        .map(|((slot_name, slot_field, supervisor), candidate_names)| {
            SlotSummaryEntry {
                slot_name: slot_name.to_string(),
                slot_field: slot_field.to_string(),
                supervisor: supervisor.to_string(),
                candidate_count: candidate_names.len(),
                recommendation: candidate_names.join(CANDIDATE_SEPARATOR),
                candidate_names,
            }
        })
        .collect()
}

/// Capacity against actual use for every known slot name, ordered by name. Slots sharing a
/// name have their capacities summed.
pub fn capacity_reconciliation(slots: &[Slot], records: &[AssignmentRecord]) -> Vec<CapacityEntry> {
    let mut capacities: BTreeMap<&str, u32> = BTreeMap::new();
    for slot in slots {
        *capacities.entry(slot.name.as_str()).or_insert(0) += slot.capacity;
    }

    let mut used: BTreeMap<&str, u32> = BTreeMap::new();
    for record in records.iter().filter(|record| record.is_assigned()) {
        *used.entry(record.slot_name.as_str()).or_insert(0) += 1;
    }

    capacities
        .into_iter()
        .map(|(slot_name, capacity)| {
            let used = used.get(slot_name).copied().unwrap_or(0);
            CapacityEntry {
                slot_name: slot_name.to_string(),
                capacity,
                used,
                balance: i64::from(capacity) - i64::from(used),
            }
        })
        .collect()
}

pub fn explain(record: &AssignmentRecord) -> ExplanationView {
    ExplanationView {
        candidate_id: record.candidate_id.clone(),
        candidate_name: record.candidate_name(),
        slot_name: record.placement_label().to_string(),
        status: record.status,
        status_label: record.status.label(),
        score: record.score,
        parts: record
            .breakdown
            .entries()
            .iter()
            .map(|entry| ExplanationPart {
                criterion: entry.criterion,
                label: entry.criterion.label(),
                raw: entry.raw,
                weight: entry.weight,
                contribution: entry.contribution,
            })
            .collect(),
    }
}
