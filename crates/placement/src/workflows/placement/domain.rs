use serde::{Deserialize, Serialize};

/// Student waiting for an internship site. Fields are already normalized by the roster import.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub preferred_field: String,
    #[serde(default)]
    pub special_request: String,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Internship site with a fixed number of seats and one supervising mentor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub city: String,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default)]
    pub supervisor: String,
    #[serde(default)]
    pub special_requirement: String,
}

fn default_capacity() -> u32 {
    1
}

/// Criteria evaluated for every (candidate, slot) pair, in breakdown order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    FieldMatch,
    Geography,
    SpecialRequests,
    CandidatePreference,
}

impl Criterion {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::FieldMatch,
            Self::Geography,
            Self::SpecialRequests,
            Self::CandidatePreference,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FieldMatch => "Field match",
            Self::Geography => "Distance/Geography",
            Self::SpecialRequests => "Special requests",
            Self::CandidatePreference => "Candidate priorities",
        }
    }
}

/// One criterion's share of a score: the raw 0-100 rating and its weighted contribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub raw: u8,
    pub weight: f64,
    pub contribution: i32,
}

/// Ordered per-criterion contributions backing a single score.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    entries: Vec<CriterionScore>,
}

impl ScoreBreakdown {
    pub(crate) fn new(entries: Vec<CriterionScore>) -> Self {
        Self { entries }
    }

    /// Breakdown recorded for candidates that could not be placed: every criterion at zero.
    pub fn zeroed(criteria: impl IntoIterator<Item = Criterion>) -> Self {
        let entries = criteria
            .into_iter()
            .map(|criterion| CriterionScore {
                criterion,
                raw: 0,
                weight: 0.0,
                contribution: 0,
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[CriterionScore] {
        &self.entries
    }

    pub fn contribution(&self, criterion: Criterion) -> Option<i32> {
        self.entries
            .iter()
            .find(|entry| entry.criterion == criterion)
            .map(|entry| entry.contribution)
    }

    pub fn raw(&self, criterion: Criterion) -> Option<u8> {
        self.entries
            .iter()
            .find(|entry| entry.criterion == criterion)
            .map(|entry| entry.raw)
    }

    /// Sum of contributions before clipping.
    pub fn total(&self) -> i32 {
        self.entries.iter().map(|entry| entry.contribution).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned,
    /// Placed after the supervisor quota was relaxed because every open slot was at quota.
    AssignedOverQuota,
    Unassigned,
}

impl AssignmentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Assigned => "Assigned",
            Self::AssignedOverQuota => "Assigned (supervisor quota relaxed)",
            Self::Unassigned => "Unassigned",
        }
    }

    pub const fn is_assigned(self) -> bool {
        !matches!(self, Self::Unassigned)
    }
}

pub const UNASSIGNED_LABEL: &str = "Unassigned";

/// Outcome for one candidate in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub candidate_id: String,
    pub first_name: String,
    pub last_name: String,
    pub status: AssignmentStatus,
    /// Empty when unassigned.
    pub slot_name: String,
    pub slot_city: String,
    pub slot_field: String,
    pub supervisor: String,
    pub score: u8,
    pub breakdown: ScoreBreakdown,
}

impl AssignmentRecord {
    pub(crate) fn unassigned(candidate: &Candidate, breakdown: ScoreBreakdown) -> Self {
        Self {
            candidate_id: candidate.id.clone(),
            first_name: candidate.first_name.clone(),
            last_name: candidate.last_name.clone(),
            status: AssignmentStatus::Unassigned,
            slot_name: String::new(),
            slot_city: String::new(),
            slot_field: String::new(),
            supervisor: String::new(),
            score: 0,
            breakdown,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.status.is_assigned()
    }

    pub fn candidate_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Slot name as shown to end users, with the sentinel for unplaced candidates.
    pub fn placement_label(&self) -> &str {
        if self.is_assigned() {
            &self.slot_name
        } else {
            UNASSIGNED_LABEL
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlacementError {
    #[error("candidate with id {0} not found in run")]
    CandidateNotFound(String),
    /// The id belongs to several records; address one by its position instead.
    #[error("candidate id {id} matches {occurrences} records in run; select one by position")]
    AmbiguousCandidateId { id: String, occurrences: usize },
    #[error("no record at position {index}; run has {len} records")]
    PositionOutOfRange { index: usize, len: usize },
}
