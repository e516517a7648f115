//! CSV table loading
//!
//! Thin ingestion layer for the two wearable exports. Required columns are
//! validated up front so a missing column fails with a message naming it
//! instead of a row-level deserialization error; extra columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::AnalysisError;
use crate::types::{ActivityRecord, SleepEpisodeRecord};

/// Columns the sleep table must carry
pub const SLEEP_COLUMNS: [&str; 2] = ["start_time_iso", "actual_minutes"];

/// Columns the activity table must carry
pub const ACTIVITY_COLUMNS: [&str; 4] = ["Start", "Duration", "Distance", "Activity"];

/// Load sleep episodes from a CSV file
pub fn load_sleep_csv(path: impl AsRef<Path>) -> Result<Vec<SleepEpisodeRecord>, AnalysisError> {
    read_sleep_table(File::open(path)?)
}

/// Load activities from a CSV file
pub fn load_activity_csv(path: impl AsRef<Path>) -> Result<Vec<ActivityRecord>, AnalysisError> {
    read_activity_table(File::open(path)?)
}

/// Read sleep episodes from any CSV source
pub fn read_sleep_table<R: Read>(reader: R) -> Result<Vec<SleepEpisodeRecord>, AnalysisError> {
    read_table(reader, &SLEEP_COLUMNS)
}

/// Read activities from any CSV source
pub fn read_activity_table<R: Read>(reader: R) -> Result<Vec<ActivityRecord>, AnalysisError> {
    read_table(reader, &ACTIVITY_COLUMNS)
}

fn read_table<R: Read, T: DeserializeOwned>(
    reader: R,
    required_columns: &[&str],
) -> Result<Vec<T>, AnalysisError> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for column in required_columns {
        if !headers.iter().any(|h| h == *column) {
            return Err(AnalysisError::MissingColumn((*column).to_string()));
        }
    }

    let mut rows = Vec::new();
    for row in csv_reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_sleep_table() {
        let csv = "start_time_iso,actual_minutes\n\
                   2014-03-23T23:15:00Z,420\n\
                   2014-03-24T22:30:00Z,390.5\n";
        let rows = read_sleep_table(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].start_time_iso, "2014-03-23T23:15:00Z");
        assert_eq!(rows[1].actual_minutes, 390.5);
    }

    #[test]
    fn test_read_sleep_table_ignores_extra_columns() {
        // Basis Watch exports carry local times and timestamps we don't use
        let csv = "local_start_time,start_time_iso,start_timestamp,actual_minutes\n\
                   2014-03-23 16:15,2014-03-23T23:15:00Z,1395616500,420\n";
        let rows = read_sleep_table(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].actual_minutes, 420.0);
    }

    #[test]
    fn test_missing_sleep_column_is_named() {
        let csv = "start_time_iso,minutes\n2014-03-23T23:15:00Z,420\n";
        let err = read_sleep_table(csv.as_bytes()).unwrap_err();
        match err {
            AnalysisError::MissingColumn(column) => assert_eq!(column, "actual_minutes"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_read_activity_table() {
        let csv = "Start,Duration,Distance,Activity\n\
                   2014-03-23 10:00:00,7200,300,transport\n\
                   2014-03-25 08:30:00,10800,0,airplane\n";
        let rows = read_activity_table(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].duration_seconds, 7200.0);
        assert_eq!(rows[0].distance_miles, 300.0);
        assert_eq!(rows[1].activity_label, "airplane");
    }

    #[test]
    fn test_missing_activity_column_is_named() {
        let csv = "Start,Duration,Activity\n2014-03-23 10:00:00,7200,transport\n";
        let err = read_activity_table(csv.as_bytes()).unwrap_err();
        match err {
            AnalysisError::MissingColumn(column) => assert_eq!(column, "Distance"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }
}
