use serde::{Deserialize, Serialize};

use crate::workflows::placement::domain::{Candidate, Slot};

/// How one criterion rates a (candidate, slot) pair on a 0-100 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriterionRule {
    /// Case-insensitive substring match of the preferred field inside the slot's field.
    FieldMatch {
        matched: u8,
        mismatched: u8,
        no_preference: u8,
        no_slot_field: u8,
    },
    /// Case-insensitive equality of candidate and slot city.
    CityMatch {
        same_city: u8,
        different_city: u8,
        missing_city: u8,
    },
    /// Rewards same-city slots for candidates whose free-text request names a proximity keyword.
    ProximityRequest {
        keywords: Vec<String>,
        near: u8,
        far: u8,
        no_request: u8,
    },
    /// Fixed rating regardless of the pair.
    Constant { value: u8 },
}

impl CriterionRule {
    pub(crate) fn rate(&self, candidate: &Candidate, slot: &Slot) -> u8 {
        match self {
            CriterionRule::FieldMatch {
                matched,
                mismatched,
                no_preference,
                no_slot_field,
            } => {
                let preference = normalize(&candidate.preferred_field);
                let field = normalize(&slot.field);
                if preference.is_empty() {
                    *no_preference
                } else if field.is_empty() {
                    *no_slot_field
                } else if field.contains(&preference) {
                    *matched
                } else {
                    *mismatched
                }
            }
            CriterionRule::CityMatch {
                same_city,
                different_city,
                missing_city,
            } => match same_city_of(candidate, slot) {
                Some(true) => *same_city,
                Some(false) => *different_city,
                None => *missing_city,
            },
            CriterionRule::ProximityRequest {
                keywords,
                near,
                far,
                no_request,
            } => {
                if !requests_proximity(&candidate.special_request, keywords) {
                    *no_request
                } else if same_city_of(candidate, slot) == Some(true) {
                    *near
                } else {
                    *far
                }
            }
            CriterionRule::Constant { value } => *value,
        }
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// `None` when either side has no city on record.
fn same_city_of(candidate: &Candidate, slot: &Slot) -> Option<bool> {
    let candidate_city = normalize(&candidate.city);
    let slot_city = normalize(&slot.city);
    if candidate_city.is_empty() || slot_city.is_empty() {
        None
    } else {
        Some(candidate_city == slot_city)
    }
}

fn requests_proximity(request: &str, keywords: &[String]) -> bool {
    let request = normalize(request);
    if request.is_empty() {
        return false;
    }

    keywords
        .iter()
        .map(|keyword| normalize(keyword))
        .filter(|keyword| !keyword.is_empty())
        .any(|keyword| request.contains(&keyword))
}
