//! Output formatting and persistence for records and result bundles.
//!
//! Supports pretty-printing, JSON serialization, and CSV append/reload.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::analytics::AnalyticsBundle;
use crate::record::RegistrationRecord;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Logs a result bundle using Rust's debug pretty-print format.
pub fn print_pretty(bundle: &AnalyticsBundle) {
    debug!("{:#?}", bundle);
}

/// Logs a result bundle as pretty-printed JSON.
pub fn print_json(bundle: &AnalyticsBundle) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(bundle)?);
    Ok(())
}

/// Writes a result bundle as pretty JSON to `path`.
pub fn write_json(path: &str, bundle: &AnalyticsBundle) -> Result<()> {
    let body = serde_json::to_vec_pretty(bundle)?;
    std::fs::write(path, body).with_context(|| format!("Failed to write bundle to '{path}'"))?;
    info!(path, "Result bundle written");
    Ok(())
}

/// Appends [`RegistrationRecord`] rows to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_records(path: &str, records: &[RegistrationRecord]) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, count = records.len(), "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}

/// Reloads records previously written by [`append_records`].
pub fn read_records(path: &str) -> Result<Vec<RegistrationRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open records file '{path}'"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: RegistrationRecord = row?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Category;
    use chrono::NaiveDate;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_record() -> RegistrationRecord {
        RegistrationRecord {
            date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap(),
            category: Category::TwoWheeler,
            manufacturer: "Hero MotoCorp".to_string(),
            registrations: 10,
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&AnalyticsBundle::empty());
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&AnalyticsBundle::empty()).unwrap();
    }

    #[test]
    fn test_append_records_creates_file() {
        let path = temp_path("vahan_reg_tracker_test_create.csv");
        let _ = fs::remove_file(&path); // clean up any prior run

        append_records(&path, &[sample_record()]).unwrap();

        assert!(Path::new(&path).exists());
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_append_records_writes_header_once() {
        let path = temp_path("vahan_reg_tracker_test_header.csv");
        let _ = fs::remove_file(&path);

        append_records(&path, &[sample_record()]).unwrap();
        append_records(&path, &[sample_record()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // Header line should appear exactly once
        let header_count = content.lines().filter(|l| l.contains("manufacturer")).count();
        assert_eq!(header_count, 1);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_records_round_trip() {
        let path = temp_path("vahan_reg_tracker_test_round_trip.csv");
        let _ = fs::remove_file(&path);

        let records = vec![
            sample_record(),
            RegistrationRecord {
                date: NaiveDate::from_ymd_opt(2023, 3, 2).unwrap(),
                category: Category::Other("E-RICKSHAW".to_string()),
                manufacturer: "Atul Auto".to_string(),
                registrations: 3,
            },
        ];
        append_records(&path, &records).unwrap();

        let reloaded = read_records(&path).unwrap();
        assert_eq!(reloaded, records);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_bundle() {
        let path = temp_path("vahan_reg_tracker_test_bundle.json");
        let _ = fs::remove_file(&path);

        write_json(&path, &AnalyticsBundle::empty()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("total_registrations"));

        fs::remove_file(&path).unwrap();
    }
}
