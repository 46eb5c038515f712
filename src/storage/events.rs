//! Append-only event logs.
//!
//! Each kind of event accumulates in its own file under the events
//! directory. The header row is written only when a file is first
//! created, so the log format is fixed for the file's lifetime. Logs
//! are immutable once written — merge-and-retrain consumes a log by
//! renaming it, never by rewriting it.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use csv::{Reader, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::config::DataPaths;

use super::StorageError;

/// A single observed demand quantity, pending merge into history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandEvent {
    pub timestamp: String,
    pub month: String,
    pub medicine: String,
    pub quantity: i64,
    #[serde(rename = "invoiceId")]
    pub invoice_id: String,
}

impl DemandEvent {
    /// Stamp an incoming observation with the current UTC time.
    pub fn stamped(month: String, medicine: String, quantity: i64, invoice_id: String) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            month,
            medicine,
            quantity,
            invoice_id,
        }
    }
}

/// A patient admission record. Accepted and persisted, but not yet an
/// input to any training pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdmissionEvent {
    pub timestamp: String,
    #[serde(rename = "admittedAt")]
    pub admitted_at: String,
    #[serde(rename = "patientName")]
    pub patient_name: String,
    pub age: String,
    pub gender: String,
    #[serde(rename = "roomType")]
    pub room_type: String,
    pub doctor: String,
    #[serde(rename = "admissionId")]
    pub admission_id: String,
}

/// Append one demand event to the active log.
pub fn append_demand_event(paths: &DataPaths, event: &DemandEvent) -> Result<(), StorageError> {
    append_csv_record(&paths.demand_events_csv(), event)
}

/// Append one admission event to the admissions log.
pub fn append_admission_event(
    paths: &DataPaths,
    event: &AdmissionEvent,
) -> Result<(), StorageError> {
    append_csv_record(&paths.admissions_events_csv(), event)
}

/// Append an unrecognized payload to the raw text log, one timestamped
/// line per payload.
pub fn append_raw(paths: &DataPaths, payload: &serde_json::Value) -> Result<(), StorageError> {
    let path = paths.raw_events_log();
    ensure_parent(&path)?;
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    writeln!(file, "{} {payload}", Utc::now().to_rfc3339())?;
    Ok(())
}

/// Read the full active demand event log.
pub fn read_demand_events(path: &Path) -> Result<Vec<DemandEvent>, StorageError> {
    let mut reader = Reader::from_path(path)?;
    let mut events = Vec::new();
    for record in reader.deserialize() {
        events.push(record?);
    }
    Ok(events)
}

fn append_csv_record<T: Serialize>(path: &Path, record: &T) -> Result<(), StorageError> {
    ensure_parent(path)?;
    let write_header = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = WriterBuilder::new().has_headers(write_header).from_writer(file);
    writer.serialize(record)?;
    writer.flush()?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> (tempfile::TempDir, DataPaths) {
        let tmp = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(tmp.path());
        (tmp, paths)
    }

    #[test]
    fn demand_log_header_written_exactly_once() {
        let (_tmp, paths) = paths();

        let ev = DemandEvent::stamped("2025-01".into(), "X".into(), 5, "INV-1".into());
        append_demand_event(&paths, &ev).unwrap();
        append_demand_event(&paths, &ev).unwrap();

        let content = std::fs::read_to_string(paths.demand_events_csv()).unwrap();
        assert_eq!(
            content
                .matches("timestamp,month,medicine,quantity,invoiceId")
                .count(),
            1
        );

        let events = read_demand_events(&paths.demand_events_csv()).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].quantity, 5);
        assert_eq!(events[0].invoice_id, "INV-1");
    }

    #[test]
    fn admission_log_uses_fixed_header() {
        let (_tmp, paths) = paths();
        let ev = AdmissionEvent {
            timestamp: Utc::now().to_rfc3339(),
            admitted_at: "2025-01-05T10:00:00Z".into(),
            patient_name: "A. Patient".into(),
            age: "64".into(),
            gender: "Female".into(),
            room_type: "ICU".into(),
            doctor: "Dr. Rao".into(),
            admission_id: "ADM-9".into(),
        };
        append_admission_event(&paths, &ev).unwrap();

        let content = std::fs::read_to_string(paths.admissions_events_csv()).unwrap();
        assert!(content.starts_with(
            "timestamp,admittedAt,patientName,age,gender,roomType,doctor,admissionId"
        ));
        assert!(content.contains("A. Patient"));
    }

    #[test]
    fn raw_payloads_append_timestamped_lines() {
        let (_tmp, paths) = paths();
        let payload = serde_json::json!({"type": "mystery", "value": 3});
        append_raw(&paths, &payload).unwrap();
        append_raw(&paths, &payload).unwrap();

        let content = std::fs::read_to_string(paths.raw_events_log()).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains(r#""type":"mystery""#));
    }

    #[test]
    fn events_stamped_in_utc() {
        let ev = DemandEvent::stamped("2025-01".into(), "X".into(), 1, String::new());
        assert!(ev.timestamp.contains('T'));
    }
}
