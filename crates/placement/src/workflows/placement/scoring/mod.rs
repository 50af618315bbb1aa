mod config;
mod rules;

pub use config::{
    default_proximity_keywords, MatchingConfig, MatchingConfigError, ScoringVariant,
    DEFAULT_CAPACITY, DEFAULT_SUPERVISOR_QUOTA,
};
pub use rules::CriterionRule;

use super::domain::{Candidate, Criterion, CriterionScore, ScoreBreakdown, Slot};
use serde::{Deserialize, Serialize};

/// A criterion, its weight, and the rule that rates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedCriterion {
    pub criterion: Criterion,
    pub weight: f64,
    pub rule: CriterionRule,
}

/// Stateless weighted scorer shared by both scoring variants.
///
/// Each criterion contributes `round(weight * raw)` (half away from zero); the score is the
/// sum of contributions clipped to `0..=100`. With weights summing to at most one the clip
/// never bites and the breakdown adds up to the score exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreModel {
    criteria: Vec<WeightedCriterion>,
}

impl ScoreModel {
    pub fn new(criteria: Vec<WeightedCriterion>) -> Self {
        Self { criteria }
    }

    pub fn criteria(&self) -> impl Iterator<Item = Criterion> + '_ {
        self.criteria.iter().map(|entry| entry.criterion)
    }

    pub fn score(&self, candidate: &Candidate, slot: &Slot) -> MatchScore {
        let entries = self
            .criteria
            .iter()
            .map(|entry| {
                let raw = entry.rule.rate(candidate, slot);
                CriterionScore {
                    criterion: entry.criterion,
                    raw,
                    weight: entry.weight,
                    contribution: (entry.weight * f64::from(raw)).round() as i32,
                }
            })
            .collect();

        let breakdown = ScoreBreakdown::new(entries);
        let score = breakdown.total().clamp(0, 100) as u8;

        MatchScore { score, breakdown }
    }

    /// Breakdown used for unassigned records.
    pub fn empty_breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown::zeroed(self.criteria())
    }
}

/// Score and explanation for one (candidate, slot) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub score: u8,
    pub breakdown: ScoreBreakdown,
}
