use super::normalizer::{clean_cell, normalize_header};
use std::io::Read;

/// Raw sheet: normalized headers and cleaned, non-blank rows.
#[derive(Debug)]
pub(crate) struct RosterTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<RosterRow>,
}

#[derive(Debug)]
pub(crate) struct RosterRow {
    /// 1-based line in the source file.
    pub(crate) line: u64,
    cells: Vec<String>,
}

impl RosterRow {
    /// Cell text for a resolved column; empty when the column or cell is missing.
    pub(crate) fn cell(&self, position: Option<usize>) -> &str {
        position
            .and_then(|index| self.cells.get(index))
            .map(String::as_str)
            .unwrap_or("")
    }
}

pub(crate) fn parse_table<R: Read>(reader: R) -> Result<RosterTable, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(clean_cell).collect();
        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let line = record
            .position()
            .map(|position| position.line())
            .unwrap_or(index as u64 + 2);
        rows.push(RosterRow { line, cells });
    }

    Ok(RosterTable { headers, rows })
}

/// Whole-number capacity; spreadsheet decimals such as `3.0` are accepted.
pub(crate) fn parse_capacity(raw: &str) -> Option<u32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(value) = trimmed.parse::<u32>() {
        return Some(value);
    }

    match trimmed.parse::<f64>() {
        Ok(value)
            if value.is_finite()
                && value >= 0.0
                && value.fract() == 0.0
                && value <= f64::from(u32::MAX) =>
        {
            Some(value as u32)
        }
        _ => None,
    }
}
