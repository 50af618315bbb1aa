//! Student and site roster ingestion.
//!
//! Spreadsheet exports arrive with free-form headers (Hebrew or English). Headers are
//! resolved against alias tables into the canonical candidate and slot fields; optional
//! columns that cannot be resolved fall back to empty values, while a missing identifier or
//! site name column fails the whole import.

mod mapping;
mod normalizer;
mod parser;

use crate::workflows::placement::domain::{Candidate, Slot};
use crate::workflows::placement::scoring::{MatchingConfig, DEFAULT_CAPACITY};
use mapping::{CandidateColumn, SlotColumn};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterKind {
    Students,
    Sites,
}

impl RosterKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Sites => "sites",
        }
    }
}

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingColumn {
        roster: RosterKind,
        column: &'static str,
    },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster file: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::MissingColumn { roster, column } => write!(
                f,
                "could not resolve the {} column in the {} roster",
                column,
                roster.label()
            ),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::MissingColumn { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Non-fatal findings reported alongside an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImportDiagnostic {
    MissingCandidateId { line: u64 },
    DuplicateCandidateId { id: String, lines: Vec<u64> },
    MissingSiteName { line: u64 },
    CapacityDefaulted {
        site: String,
        line: u64,
        raw: String,
        capacity: u32,
    },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CandidateRoster {
    pub candidates: Vec<Candidate>,
    pub diagnostics: Vec<ImportDiagnostic>,
}

impl CandidateRoster {
    pub fn duplicate_ids(&self) -> Vec<&str> {
        self.diagnostics
            .iter()
            .filter_map(|diagnostic| match diagnostic {
                ImportDiagnostic::DuplicateCandidateId { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SlotRoster {
    pub slots: Vec<Slot>,
    pub diagnostics: Vec<ImportDiagnostic>,
}

/// Reads student and site rosters into canonical candidates and slots.
#[derive(Debug, Clone, Copy)]
pub struct RosterImporter {
    capacity_default: u32,
}

impl Default for RosterImporter {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl RosterImporter {
    pub fn new(capacity_default: u32) -> Self {
        Self { capacity_default }
    }

    pub fn from_config(config: &MatchingConfig) -> Self {
        Self::new(config.capacity_default)
    }

    pub fn candidates_from_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<CandidateRoster, RosterImportError> {
        let file = std::fs::File::open(path)?;
        self.candidates_from_reader(file)
    }

    pub fn candidates_from_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<CandidateRoster, RosterImportError> {
        let table = parser::parse_table(reader)?;
        let columns = mapping::resolve_candidate_columns(&table.headers);
        let id_column = columns
            .get(CandidateColumn::Id)
            .ok_or(RosterImportError::MissingColumn {
                roster: RosterKind::Students,
                column: CandidateColumn::Id.label(),
            })?;

        let mut roster = CandidateRoster::default();
        let mut seen: HashMap<String, Vec<u64>> = HashMap::new();
        let mut first_seen_order: Vec<String> = Vec::new();

        for row in &table.rows {
            let id = row.cell(Some(id_column)).to_string();
            if id.is_empty() {
                warn!(line = row.line, "student row without an identifier skipped");
                roster
                    .diagnostics
                    .push(ImportDiagnostic::MissingCandidateId { line: row.line });
                continue;
            }

            let lines = seen.entry(id.clone()).or_default();
            if lines.is_empty() {
                first_seen_order.push(id.clone());
            }
            lines.push(row.line);

            roster.candidates.push(Candidate {
                id,
                first_name: row.cell(columns.get(CandidateColumn::FirstName)).to_string(),
                last_name: row.cell(columns.get(CandidateColumn::LastName)).to_string(),
                city: row.cell(columns.get(CandidateColumn::City)).to_string(),
                preferred_field: row
                    .cell(columns.get(CandidateColumn::PreferredField))
                    .to_string(),
                special_request: row
                    .cell(columns.get(CandidateColumn::SpecialRequest))
                    .to_string(),
            });
        }

        for id in first_seen_order {
            if let Some(lines) = seen.remove(&id) {
                if lines.len() > 1 {
                    warn!(%id, occurrences = lines.len(), "duplicate student identifier");
                    roster
                        .diagnostics
                        .push(ImportDiagnostic::DuplicateCandidateId { id, lines });
                }
            }
        }

        Ok(roster)
    }

    pub fn slots_from_path<P: AsRef<Path>>(&self, path: P) -> Result<SlotRoster, RosterImportError> {
        let file = std::fs::File::open(path)?;
        self.slots_from_reader(file)
    }

    pub fn slots_from_reader<R: Read>(&self, reader: R) -> Result<SlotRoster, RosterImportError> {
        let table = parser::parse_table(reader)?;
        let columns = mapping::resolve_slot_columns(&table.headers);
        let name_column = columns
            .get(SlotColumn::Name)
            .ok_or(RosterImportError::MissingColumn {
                roster: RosterKind::Sites,
                column: SlotColumn::Name.label(),
            })?;

        let mut roster = SlotRoster::default();
        for row in &table.rows {
            let name = row.cell(Some(name_column)).to_string();
            if name.is_empty() {
                warn!(line = row.line, "site row without a name skipped");
                roster
                    .diagnostics
                    .push(ImportDiagnostic::MissingSiteName { line: row.line });
                continue;
            }

            let raw_capacity = row.cell(columns.get(SlotColumn::Capacity));
            let capacity = match parser::parse_capacity(raw_capacity) {
                Some(capacity) => capacity,
                None => {
                    warn!(
                        site = %name,
                        raw = raw_capacity,
                        capacity = self.capacity_default,
                        "unparseable capacity replaced with default"
                    );
                    roster.diagnostics.push(ImportDiagnostic::CapacityDefaulted {
                        site: name.clone(),
                        line: row.line,
                        raw: raw_capacity.to_string(),
                        capacity: self.capacity_default,
                    });
                    self.capacity_default
                }
            };

            roster.slots.push(Slot {
                supervisor: supervisor_name(row, &columns),
                field: row.cell(columns.get(SlotColumn::Field)).to_string(),
                city: row.cell(columns.get(SlotColumn::City)).to_string(),
                special_requirement: row
                    .cell(columns.get(SlotColumn::SpecialRequirement))
                    .to_string(),
                capacity,
                name,
            });
        }

        Ok(roster)
    }
}

/// A dedicated supervisor column wins; otherwise first and last name are joined.
fn supervisor_name(row: &parser::RosterRow, columns: &mapping::ColumnMap<SlotColumn>) -> String {
    let full = row.cell(columns.get(SlotColumn::Supervisor));
    if !full.is_empty() {
        return full.to_string();
    }

    let first = row.cell(columns.get(SlotColumn::SupervisorFirstName));
    let last = row.cell(columns.get(SlotColumn::SupervisorLastName));
    format!("{first} {last}").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn imports_hebrew_student_roster() {
        let csv = "\u{feff}מספר תעודת זהות,שם פרטי,שם משפחה,עיר מגורים,תחום מועדף,בקשה מיוחדת\n\
123,Noa,Levi,Haifa,biology,קרוב לבית\n\
456,Dan,Cohen,,,\n";
        let roster = RosterImporter::default()
            .candidates_from_reader(Cursor::new(csv))
            .expect("import succeeds");

        assert_eq!(roster.candidates.len(), 2);
        let noa = &roster.candidates[0];
        assert_eq!(noa.id, "123");
        assert_eq!(noa.full_name(), "Noa Levi");
        assert_eq!(noa.city, "Haifa");
        assert_eq!(noa.special_request, "קרוב לבית");
        assert!(roster.candidates[1].preferred_field.is_empty());
        assert!(roster.diagnostics.is_empty());
    }

    #[test]
    fn missing_optional_student_columns_default_to_empty() {
        let roster = RosterImporter::default()
            .candidates_from_reader(Cursor::new("ID,First Name\n7,Ava\n"))
            .expect("import succeeds");
        let ava = &roster.candidates[0];
        assert_eq!(ava.first_name, "Ava");
        assert!(ava.city.is_empty());
        assert!(ava.special_request.is_empty());
    }

    #[test]
    fn missing_identifier_column_fails_resolution() {
        let error = RosterImporter::default()
            .candidates_from_reader(Cursor::new("First Name,City\nAva,Haifa\n"))
            .expect_err("id column required");
        match error {
            RosterImportError::MissingColumn { roster, column } => {
                assert_eq!(roster, RosterKind::Students);
                assert_eq!(column, "candidate id");
            }
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_ids_are_reported_not_merged() {
        let csv = "ID,First Name\n1,Ava\n2,Ben\n1,Ava B\n,Nobody\n";
        let roster = RosterImporter::default()
            .candidates_from_reader(Cursor::new(csv))
            .expect("import succeeds");

        assert_eq!(roster.candidates.len(), 3);
        assert_eq!(roster.duplicate_ids(), vec!["1"]);
        assert!(roster.diagnostics.contains(&ImportDiagnostic::DuplicateCandidateId {
            id: "1".to_string(),
            lines: vec![2, 4],
        }));
        assert!(roster
            .diagnostics
            .contains(&ImportDiagnostic::MissingCandidateId { line: 5 }));
    }

    #[test]
    fn imports_sites_with_supervisor_name_parts() {
        let csv = "מוסד,תחום ההתמחות,עיר,קיבולת,שם פרטי,שם משפחה\n\
Rambam,clinical biology lab,Haifa,2,Sara,Katz\n\
Soroka,physics,Beer Sheva,many,,\n";
        let roster = RosterImporter::new(1)
            .slots_from_reader(Cursor::new(csv))
            .expect("import succeeds");

        assert_eq!(roster.slots.len(), 2);
        assert_eq!(roster.slots[0].supervisor, "Sara Katz");
        assert_eq!(roster.slots[0].capacity, 2);
        assert_eq!(roster.slots[1].supervisor, "");
        assert_eq!(roster.slots[1].capacity, 1);
        assert_eq!(
            roster.diagnostics,
            vec![ImportDiagnostic::CapacityDefaulted {
                site: "Soroka".to_string(),
                line: 3,
                raw: "many".to_string(),
                capacity: 1,
            }]
        );
    }

    #[test]
    fn capacity_default_is_configurable() {
        let roster = RosterImporter::new(3)
            .slots_from_reader(Cursor::new("Site,Capacity,Supervisor\nLab,,Dr. S\n"))
            .expect("import succeeds");
        assert_eq!(roster.slots[0].capacity, 3);
        assert_eq!(roster.slots[0].supervisor, "Dr. S");
    }

    #[test]
    fn missing_site_name_column_fails_resolution() {
        let error = RosterImporter::default()
            .slots_from_reader(Cursor::new("Field,City\nbio,Haifa\n"))
            .expect_err("name column required");
        assert!(error.to_string().contains("site name"));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let error = RosterImporter::default()
            .slots_from_path("./does-not-exist.csv")
            .expect_err("expected io error");
        match error {
            RosterImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
