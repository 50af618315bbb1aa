use super::views::{CapacityEntry, ResultRow, SlotSummaryEntry};

/// Failure while rendering a CSV download.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV buffer: {0}")]
    Io(#[from] std::io::Error),
}

/// Ranked results with the match percentage as the last column.
pub fn results_csv(rows: &[ResultRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Candidate",
        "Candidate ID",
        "Field",
        "Site city",
        "Site",
        "Supervisor",
        "Status",
        "Match %",
    ])?;
    for row in rows {
        writer.write_record([
            row.candidate_name.as_str(),
            row.candidate_id.as_str(),
            row.slot_field.as_str(),
            row.slot_city.as_str(),
            row.slot_name.as_str(),
            row.supervisor.as_str(),
            row.status_label,
            row.score.to_string().as_str(),
        ])?;
    }
    finish(writer)
}

pub fn summary_csv(entries: &[SlotSummaryEntry]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Site", "Field", "Supervisor", "Candidates", "Recommendation"])?;
    for entry in entries {
        writer.write_record([
            entry.slot_name.as_str(),
            entry.slot_field.as_str(),
            entry.supervisor.as_str(),
            entry.candidate_count.to_string().as_str(),
            entry.recommendation.as_str(),
        ])?;
    }
    finish(writer)
}

pub fn capacities_csv(entries: &[CapacityEntry]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Site", "Capacity", "Placed", "Balance"])?;
    for entry in entries {
        writer.write_record([
            entry.slot_name.clone(),
            entry.capacity.to_string(),
            entry.used.to_string(),
            entry.balance.to_string(),
        ])?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))
}
