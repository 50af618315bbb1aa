use super::normalizer::normalize_header;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical candidate fields recognized in a student roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum CandidateColumn {
    Id,
    FirstName,
    LastName,
    City,
    PreferredField,
    SpecialRequest,
}

/// Canonical slot fields recognized in a site roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SlotColumn {
    Name,
    Field,
    City,
    Capacity,
    Supervisor,
    SupervisorFirstName,
    SupervisorLastName,
    SpecialRequirement,
}

impl CandidateColumn {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Id => "candidate id",
            Self::FirstName => "first name",
            Self::LastName => "last name",
            Self::City => "city",
            Self::PreferredField => "preferred field",
            Self::SpecialRequest => "special request",
        }
    }
}

impl SlotColumn {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            Self::Name => "site name",
            Self::Field => "field",
            Self::City => "city",
            Self::Capacity => "capacity",
            Self::Supervisor => "supervisor",
            Self::SupervisorFirstName => "supervisor first name",
            Self::SupervisorLastName => "supervisor last name",
            Self::SpecialRequirement => "special requirement",
        }
    }
}

static CANDIDATE_ALIASES: OnceLock<Vec<(CandidateColumn, Vec<String>)>> = OnceLock::new();
static SLOT_ALIASES: OnceLock<Vec<(SlotColumn, Vec<String>)>> = OnceLock::new();

fn candidate_aliases() -> &'static [(CandidateColumn, Vec<String>)] {
    CANDIDATE_ALIASES.get_or_init(|| {
        const TABLE: &[(CandidateColumn, &[&str])] = &[
            (
                CandidateColumn::Id,
                &[
                    "מספר תעודת זהות",
                    "תעודת זהות",
                    "ת\"ז",
                    "ת״ז",
                    "תז",
                    "תעודת זהות הסטודנט",
                    "id",
                    "student id",
                    "candidate id",
                ],
            ),
            (
                CandidateColumn::FirstName,
                &["שם פרטי", "first name", "first"],
            ),
            (
                CandidateColumn::LastName,
                &["שם משפחה", "last name", "last", "surname"],
            ),
            (
                CandidateColumn::City,
                &["עיר מגורים", "עיר", "city", "home city"],
            ),
            (
                CandidateColumn::PreferredField,
                &[
                    "תחום מועדף",
                    "תחומים מועדפים",
                    "preferred field",
                    "preferred fields",
                    "field",
                ],
            ),
            (
                CandidateColumn::SpecialRequest,
                &["בקשה מיוחדת", "special request", "special requests", "request"],
            ),
        ];
        normalize_table(TABLE)
    })
}

fn slot_aliases() -> &'static [(SlotColumn, Vec<String>)] {
    SLOT_ALIASES.get_or_init(|| {
        const TABLE: &[(SlotColumn, &[&str])] = &[
            (
                SlotColumn::Name,
                &[
                    "מוסד / שירות הכשרה",
                    "מוסד",
                    "שם מוסד ההתמחות",
                    "שם המוסד",
                    "מוסד ההכשרה",
                    "site",
                    "site name",
                    "institution",
                    "name",
                ],
            ),
            (
                SlotColumn::Field,
                &["תחום ההתמחות", "תחום התמחות", "field", "specialty", "speciality"],
            ),
            (SlotColumn::City, &["עיר", "city"]),
            (
                SlotColumn::Capacity,
                &[
                    "מספר סטודנטים שניתן לקלוט השנה",
                    "מספר סטודנטים שניתן לקלוט",
                    "קיבולת",
                    "capacity",
                    "seats",
                ],
            ),
            (
                SlotColumn::Supervisor,
                &["שם המדריך", "שם המדריך/ה", "supervisor", "supervisor name"],
            ),
            (
                SlotColumn::SupervisorFirstName,
                &["שם פרטי", "supervisor first name"],
            ),
            (
                SlotColumn::SupervisorLastName,
                &["שם משפחה", "supervisor last name"],
            ),
            (
                SlotColumn::SpecialRequirement,
                &["דרישה מיוחדת", "דרישות מיוחדות", "special requirement", "requirements"],
            ),
        ];
        normalize_table(TABLE)
    })
}

fn normalize_table<C: Copy>(table: &[(C, &[&str])]) -> Vec<(C, Vec<String>)> {
    table
        .iter()
        .map(|(column, aliases)| {
            let aliases = aliases.iter().map(|alias| normalize_header(alias)).collect();
            (*column, aliases)
        })
        .collect()
}

/// Header positions for the columns present in a file. The first alias found wins.
#[derive(Debug)]
pub(crate) struct ColumnMap<C> {
    positions: HashMap<C, usize>,
}

impl<C: Copy + Eq + std::hash::Hash> ColumnMap<C> {
    pub(crate) fn get(&self, column: C) -> Option<usize> {
        self.positions.get(&column).copied()
    }
}

pub(crate) fn resolve_candidate_columns(headers: &[String]) -> ColumnMap<CandidateColumn> {
    resolve(headers, candidate_aliases())
}

pub(crate) fn resolve_slot_columns(headers: &[String]) -> ColumnMap<SlotColumn> {
    resolve(headers, slot_aliases())
}

fn resolve<C: Copy + Eq + std::hash::Hash>(
    headers: &[String],
    table: &[(C, Vec<String>)],
) -> ColumnMap<C> {
    let mut positions = HashMap::with_capacity(table.len());
    for (column, aliases) in table {
        let found = aliases
            .iter()
            .find_map(|alias| headers.iter().position(|header| header == alias));
        if let Some(index) = found {
            positions.insert(*column, index);
        }
    }
    ColumnMap { positions }
}
