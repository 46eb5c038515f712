//! Historical CSV datasets — the canonical training data.
//!
//! These files are the source of truth; events are transient deltas
//! that land here through merge-and-retrain. Reads deserialize by
//! header name, so column order and extra columns are irrelevant.

use std::fs::OpenOptions;
use std::path::Path;

use csv::{Reader, WriterBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::StorageError;

/// One row of the medicine demand dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct DemandRow {
    pub month: String,
    pub medicine: String,
    pub demand: f64,
}

/// One row of the disease trends dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct DiseaseRow {
    pub month: String,
    pub disease: String,
    pub cases: f64,
}

/// One row of the patient risk dataset. The file carries more columns
/// (`gender`, `risk_score`) than training consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskRow {
    pub age: Option<f64>,
    pub condition: Option<String>,
    #[serde(rename = "isSmoker")]
    pub is_smoker: Option<String>,
    pub hr: Option<f64>,
    pub bp: Option<String>,
    pub readmitted: i32,
}

/// Aggregate row appended to the demand dataset by merge-and-retrain.
#[derive(Debug, Clone, Serialize)]
pub struct DemandAppendRow {
    pub month: String,
    pub medicine: String,
    pub demand: i64,
}

pub fn read_demand(path: &Path) -> Result<Vec<DemandRow>, StorageError> {
    read_rows(path)
}

pub fn read_disease(path: &Path) -> Result<Vec<DiseaseRow>, StorageError> {
    read_rows(path)
}

pub fn read_risk(path: &Path) -> Result<Vec<RiskRow>, StorageError> {
    read_rows(path)
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StorageError> {
    let mut reader = Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Append aggregate rows to the demand dataset, creating the file with
/// a header when it does not exist yet.
pub fn append_demand_rows(path: &Path, rows: &[DemandAppendRow]) -> Result<(), StorageError> {
    let write_header = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = WriterBuilder::new().has_headers(write_header).from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_demand_rows_by_header_name() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("demand.csv");
        std::fs::write(
            &path,
            "month,medicine,demand\n2025-01,Paracetamol 500mg Tablets,120\n2025-02,Paracetamol 500mg Tablets,130\n",
        )
        .unwrap();

        let rows = read_demand(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].month, "2025-01");
        assert_eq!(rows[1].demand, 130.0);
    }

    #[test]
    fn risk_rows_tolerate_missing_fields_and_extra_columns() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("risk.csv");
        std::fs::write(
            &path,
            "age,gender,condition,isSmoker,hr,bp,risk_score,readmitted\n\
             70,Male,Diabetes,True,90,150/95,3.1,1\n\
             ,Female,,False,,120/80,1.0,0\n",
        )
        .unwrap();

        let rows = read_risk(&path).unwrap();
        assert_eq!(rows[0].age, Some(70.0));
        assert_eq!(rows[0].readmitted, 1);
        assert_eq!(rows[1].age, None);
        assert_eq!(rows[1].condition, None);
        assert_eq!(rows[1].readmitted, 0);
    }

    #[test]
    fn append_creates_file_with_header_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("demand.csv");

        let first = vec![DemandAppendRow {
            month: "2025-01".into(),
            medicine: "X".into(),
            demand: 12,
        }];
        append_demand_rows(&path, &first).unwrap();

        let second = vec![DemandAppendRow {
            month: "2025-02".into(),
            medicine: "X".into(),
            demand: 7,
        }];
        append_demand_rows(&path, &second).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("month,medicine,demand").count(), 1);
        let rows = read_demand(&path).unwrap();
        assert_eq!(rows.len(), 2);
    }
}
