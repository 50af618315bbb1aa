use serde::{Deserialize, Serialize};

use super::rules::CriterionRule;
use super::{ScoreModel, WeightedCriterion};
use crate::workflows::placement::domain::Criterion;

pub const DEFAULT_SUPERVISOR_QUOTA: u32 = 2;
pub const DEFAULT_CAPACITY: u32 = 1;

/// Selects which criterion table the score model is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringVariant {
    /// Variant A: field and proximity requests dominate; missing data scores neutral,
    /// mismatches score zero.
    #[default]
    #[serde(alias = "a", alias = "A")]
    Asymmetric,
    /// Variant B: four criteria with partial credit for other cities and constant placeholders.
    #[serde(alias = "b", alias = "B")]
    Uniform,
}

impl ScoringVariant {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "a" | "asymmetric" => Some(Self::Asymmetric),
            "b" | "uniform" => Some(Self::Uniform),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Asymmetric => "A (asymmetric neutral/penalty)",
            Self::Uniform => "B (uniform four-criterion)",
        }
    }
}

/// Weights, quota and ingestion defaults for one allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default)]
    pub scoring_variant: ScoringVariant,
    #[serde(default)]
    pub field_weight: Option<f64>,
    #[serde(default)]
    pub geography_weight: Option<f64>,
    #[serde(default)]
    pub special_weight: Option<f64>,
    /// Only honored by [`ScoringVariant::Uniform`].
    #[serde(default)]
    pub preference_weight: Option<f64>,
    #[serde(default = "default_supervisor_quota")]
    pub supervisor_quota: u32,
    #[serde(default = "default_capacity")]
    pub capacity_default: u32,
    #[serde(default = "default_proximity_keywords")]
    pub proximity_keywords: Vec<String>,
}

fn default_supervisor_quota() -> u32 {
    DEFAULT_SUPERVISOR_QUOTA
}

fn default_capacity() -> u32 {
    DEFAULT_CAPACITY
}

pub fn default_proximity_keywords() -> Vec<String> {
    ["close", "nearby", "קרוב"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            scoring_variant: ScoringVariant::default(),
            field_weight: None,
            geography_weight: None,
            special_weight: None,
            preference_weight: None,
            supervisor_quota: DEFAULT_SUPERVISOR_QUOTA,
            capacity_default: DEFAULT_CAPACITY,
            proximity_keywords: default_proximity_keywords(),
        }
    }
}

impl MatchingConfig {
    pub fn for_variant(scoring_variant: ScoringVariant) -> Self {
        Self {
            scoring_variant,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), MatchingConfigError> {
        let overrides = [
            ("field_weight", self.field_weight),
            ("geography_weight", self.geography_weight),
            ("special_weight", self.special_weight),
            ("preference_weight", self.preference_weight),
        ];
        for (name, weight) in overrides {
            if let Some(value) = weight {
                if !value.is_finite() || value < 0.0 {
                    return Err(MatchingConfigError::InvalidWeight { name, value });
                }
            }
        }

        if self.supervisor_quota == 0 {
            return Err(MatchingConfigError::ZeroQuota);
        }

        Ok(())
    }

    /// Builds the score model for the configured variant with any weight overrides applied.
    pub fn score_model(&self) -> ScoreModel {
        let keywords = self.proximity_keywords.clone();
        let criteria = match self.scoring_variant {
            ScoringVariant::Asymmetric => vec![
                WeightedCriterion {
                    criterion: Criterion::FieldMatch,
                    weight: self.field_weight.unwrap_or(0.50),
                    rule: CriterionRule::FieldMatch {
                        matched: 100,
                        mismatched: 0,
                        no_preference: 70,
                        no_slot_field: 0,
                    },
                },
                WeightedCriterion {
                    criterion: Criterion::Geography,
                    weight: self.geography_weight.unwrap_or(0.05),
                    rule: CriterionRule::CityMatch {
                        same_city: 100,
                        different_city: 0,
                        missing_city: 50,
                    },
                },
                WeightedCriterion {
                    criterion: Criterion::SpecialRequests,
                    weight: self.special_weight.unwrap_or(0.45),
                    rule: CriterionRule::ProximityRequest {
                        keywords,
                        near: 100,
                        far: 0,
                        no_request: 50,
                    },
                },
                WeightedCriterion {
                    criterion: Criterion::CandidatePreference,
                    weight: 0.0,
                    rule: CriterionRule::Constant { value: 0 },
                },
            ],
            ScoringVariant::Uniform => vec![
                WeightedCriterion {
                    criterion: Criterion::FieldMatch,
                    weight: self.field_weight.unwrap_or(0.50),
                    rule: CriterionRule::FieldMatch {
                        matched: 100,
                        mismatched: 0,
                        no_preference: 50,
                        no_slot_field: 50,
                    },
                },
                WeightedCriterion {
                    criterion: Criterion::Geography,
                    weight: self.geography_weight.unwrap_or(0.25),
                    rule: CriterionRule::CityMatch {
                        same_city: 100,
                        different_city: 40,
                        missing_city: 60,
                    },
                },
                // Placeholder: special requests are not evaluated under this variant.
                WeightedCriterion {
                    criterion: Criterion::SpecialRequests,
                    weight: self.special_weight.unwrap_or(0.15),
                    rule: CriterionRule::Constant { value: 100 },
                },
                // Placeholder: candidate priorities are not collected yet.
                WeightedCriterion {
                    criterion: Criterion::CandidatePreference,
                    weight: self.preference_weight.unwrap_or(0.10),
                    rule: CriterionRule::Constant { value: 80 },
                },
            ],
        };

        ScoreModel::new(criteria)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchingConfigError {
    #[error("{name} must be a finite, non-negative number (got {value})")]
    InvalidWeight { name: &'static str, value: f64 },
    #[error("supervisor quota must be at least 1")]
    ZeroQuota,
}
