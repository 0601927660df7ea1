//! Reaction record CSV export and reload.
//!
//! Columns: `event_id,event_type,event_date,<value_column>`. An absent
//! reaction is written as an empty cell and read back as `None`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::domain::ReactionRecord;
use crate::error::AppError;
use crate::io::events::{build_header_map, parse_date, require_column};

pub const DEFAULT_VALUE_COLUMN: &str = "reaction_bps";

/// Write reaction records to a CSV file.
pub fn write_reactions_csv(path: &Path, records: &[ReactionRecord], value_column: &str) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_reactions(file, records, value_column)?;
    info!(path = %path.display(), n_records = records.len(), "saved reactions");
    Ok(())
}

pub fn write_reactions<W: Write>(out: W, records: &[ReactionRecord], value_column: &str) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(["event_id", "event_type", "event_date", value_column])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for r in records {
        let date = r.event_date.to_string();
        let value = r.reaction.map(|v| v.to_string()).unwrap_or_default();
        writer
            .write_record([r.event_id.as_str(), r.event_type.as_str(), date.as_str(), value.as_str()])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row for event {}: {e}", r.event_id)))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))
}

/// Reload a previously exported reactions CSV.
pub fn read_reactions_csv(path: &Path, value_column: &str) -> Result<Vec<ReactionRecord>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open reactions CSV '{}': {e}", path.display())))?;
    read_reactions(file, value_column)
}

pub fn read_reactions<R: Read>(input: R, value_column: &str) -> Result<Vec<ReactionRecord>, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read reactions CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let id_col = require_column(&header_map, "event_id")?;
    let type_col = require_column(&header_map, "event_type")?;
    let date_col = require_column(&header_map, "event_date")?;
    let value_col = require_column(&header_map, &value_column.to_ascii_lowercase())?;

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 2;
        let record =
            result.map_err(|e| AppError::new(2, format!("Reactions CSV line {line}: parse error: {e}")))?;
        let field = |col: usize| record.get(col).unwrap_or("");

        let raw_date = field(date_col);
        let event_date = parse_date(raw_date)
            .map_err(|e| AppError::new(2, format!("Reactions CSV line {line}: invalid event_date '{raw_date}': {e}")))?;

        let raw_value = field(value_col);
        let reaction = if raw_value.is_empty() {
            None
        } else {
            Some(raw_value.parse::<f64>().map_err(|e| {
                AppError::new(2, format!("Reactions CSV line {line}: invalid {value_column} '{raw_value}': {e}"))
            })?)
        };

        out.push(ReactionRecord {
            event_id: field(id_col).to_string(),
            event_type: field(type_col).to_string(),
            event_date,
            reaction,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn absent_reaction_is_an_empty_cell() {
        let records = vec![
            ReactionRecord {
                event_id: "1".to_string(),
                event_type: "CPI".to_string(),
                event_date: NaiveDate::from_ymd_opt(2024, 1, 11).unwrap(),
                reaction: Some(10.0),
            },
            ReactionRecord {
                event_id: "2".to_string(),
                event_type: "NFP".to_string(),
                event_date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                reaction: None,
            },
        ];

        let mut buf = Vec::new();
        write_reactions(&mut buf, &records, DEFAULT_VALUE_COLUMN).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.starts_with("event_id,event_type,event_date,reaction_bps\n"));
        assert!(text.contains("1,CPI,2024-01-11,10\n"));
        assert!(text.contains("2,NFP,2024-02-02,\n"));

        let back = read_reactions(buf.as_slice(), DEFAULT_VALUE_COLUMN).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn reads_legacy_column_name() {
        let csv = "event_id,event_type,event_date,ust_2y_bps_1d\n7,CPI,2023-06-13,-3.5\n";
        let back = read_reactions(csv.as_bytes(), "ust_2y_bps_1d").unwrap();
        assert_eq!(back[0].reaction, Some(-3.5));

        let err = read_reactions(csv.as_bytes(), DEFAULT_VALUE_COLUMN).unwrap_err();
        assert!(err.to_string().contains("reaction_bps"));
    }

    #[test]
    fn quoted_fields_survive_export_and_reload() {
        let events = crate::io::read_events("event_id,event_type,event_date\n\"CPI, Jan\",CPI,2024-01-11\n".as_bytes())
            .unwrap();
        let event = &events.events()[0];
        assert_eq!(event.event_id, "CPI, Jan");

        let records = vec![ReactionRecord {
            event_id: event.event_id.clone(),
            event_type: event.event_type.clone(),
            event_date: event.event_date,
            reaction: Some(0.1 + 0.2),
        }];

        let mut buf = Vec::new();
        write_reactions(&mut buf, &records, DEFAULT_VALUE_COLUMN).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.contains("\"CPI, Jan\",CPI,2024-01-11,"));

        let back = read_reactions(buf.as_slice(), DEFAULT_VALUE_COLUMN).unwrap();
        assert_eq!(back, records);
    }
}
