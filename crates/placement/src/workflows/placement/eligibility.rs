use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::domain::Slot;

/// A slot plus the seats still open in the current run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotState {
    pub slot: Slot,
    pub capacity_remaining: u32,
}

impl SlotState {
    pub fn new(slot: Slot) -> Self {
        let capacity_remaining = slot.capacity;
        Self {
            slot,
            capacity_remaining,
        }
    }

    pub fn has_capacity(&self) -> bool {
        self.capacity_remaining > 0
    }

    pub fn used(&self) -> u32 {
        self.slot.capacity.saturating_sub(self.capacity_remaining)
    }
}

/// Assignments per supervisor within one run. The empty name is an ordinary key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupervisorCounter {
    counts: BTreeMap<String, u32>,
}

impl SupervisorCounter {
    pub fn count(&self, supervisor: &str) -> u32 {
        self.counts.get(supervisor).copied().unwrap_or(0)
    }

    pub fn record(&mut self, supervisor: &str) {
        *self.counts.entry(supervisor.to_string()).or_insert(0) += 1;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

/// Slots a candidate may be placed in right now, as indices into the run's slot list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// No slot has a seat left.
    NoCapacity,
    /// Slots with a seat whose supervisor is below quota.
    WithinQuota(Vec<usize>),
    /// Every open slot's supervisor is at quota; all slots with a seat are offered instead.
    QuotaRelaxed(Vec<usize>),
}

impl Eligibility {
    pub fn indices(&self) -> &[usize] {
        match self {
            Eligibility::NoCapacity => &[],
            Eligibility::WithinQuota(indices) | Eligibility::QuotaRelaxed(indices) => indices,
        }
    }
}

/// Capacity first, then supervisor quota. The quota stage never empties a non-empty set.
pub fn eligible(slots: &[SlotState], supervisors: &SupervisorCounter, quota: u32) -> Eligibility {
    let with_capacity: Vec<usize> = slots
        .iter()
        .enumerate()
        .filter(|(_, state)| state.has_capacity())
        .map(|(index, _)| index)
        .collect();

    if with_capacity.is_empty() {
        return Eligibility::NoCapacity;
    }

    let within_quota: Vec<usize> = with_capacity
        .iter()
        .copied()
        .filter(|&index| supervisors.count(&slots[index].slot.supervisor) < quota)
        .collect();

    if within_quota.is_empty() {
        Eligibility::QuotaRelaxed(with_capacity)
    } else {
        Eligibility::WithinQuota(within_quota)
    }
}
