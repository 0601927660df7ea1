//! Macro event CSV ingest.
//!
//! Required columns: `event_id`, `event_type`, `event_date` (`YYYY-MM-DD`).
//! Extra columns are ignored. Header names are matched case-insensitively.
//!
//! Unlike a best-effort ingest, any malformed row fails the load with its line
//! number: a silently dropped event would bias the study.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use tracing::info;

use crate::domain::{Event, EventSet};
use crate::error::AppError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Load an event set from a CSV file.
pub fn load_events(path: &Path) -> Result<EventSet, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open events CSV '{}': {e}", path.display())))?;
    let events = read_events(file)?;
    info!(path = %path.display(), n_events = events.len(), "loaded events");
    Ok(events)
}

/// Parse events from any CSV reader.
pub fn read_events<R: Read>(reader: R) -> Result<EventSet, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read events CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let id_col = require_column(&header_map, "event_id")?;
    let type_col = require_column(&header_map, "event_type")?;
    let date_col = require_column(&header_map, "event_date")?;

    let mut events = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Line 1 is the header.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(2, format!("Events CSV line {line}: parse error: {e}")))?;

        let event_id = required_field(&record, id_col, "event_id", line)?;
        let event_type = required_field(&record, type_col, "event_type", line)?;
        let raw_date = required_field(&record, date_col, "event_date", line)?;
        let event_date = parse_date(raw_date)
            .map_err(|e| AppError::new(2, format!("Events CSV line {line}: invalid event_date '{raw_date}': {e}")))?;

        events.push(Event::new(event_id, event_type, event_date));
    }

    Ok(EventSet::new(events)?)
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part (`2024-01-10 00:00:00`).
pub fn parse_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let date_part = raw.split(|c: char| c == ' ' || c == 'T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
}

pub(crate) fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often carry a UTF-8 BOM on the first header.
    name.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

pub(crate) fn require_column(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(name)
        .copied()
        .ok_or_else(|| AppError::new(2, format!("CSV is missing required column '{name}'.")))
}

fn required_field<'a>(record: &'a StringRecord, col: usize, name: &str, line: usize) -> Result<&'a str, AppError> {
    match record.get(col) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::new(2, format!("Events CSV line {line}: missing {name}."))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_events_with_extra_columns_and_bom() {
        let csv = "\u{feff}Event_ID,event_type,event_date,notes\n\
                   1,CPI,2024-01-11,hot print\n\
                   2,FOMC,2024-01-31 00:00:00,\n";
        let events = read_events(csv.as_bytes()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events.events()[0].event_type, "CPI");
        assert_eq!(
            events.events()[1].event_date,
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
    }

    #[test]
    fn missing_column_is_rejected() {
        let csv = "event_id,event_date\n1,2024-01-11\n";
        let err = read_events(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("event_type"));
    }

    #[test]
    fn bad_date_reports_line() {
        let csv = "event_id,event_type,event_date\n1,CPI,2024-01-11\n2,NFP,01/02/2024\n";
        let err = read_events(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 3"), "{err}");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let csv = "event_id,event_type,event_date\n1,CPI,2024-01-11\n1,NFP,2024-02-02\n";
        let err = read_events(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Duplicate event_id"));
    }
}
