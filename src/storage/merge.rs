//! Merge pending demand events into the historical dataset.
//!
//! Events are consumed exactly once: the active log is read, its rows
//! aggregated by (month, medicine), the aggregates appended to the
//! demand dataset, and the log renamed to a timestamped archive so a
//! fresh empty log begins accumulating. Admission events are not
//! merged into any training input — a known gap in the pipeline, kept
//! deliberate rather than silently filled.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use chrono::Utc;

use crate::config::DataPaths;

use super::history::{self, DemandAppendRow};
use super::{events, StorageError};

/// What a merge pass did.
#[derive(Debug)]
pub struct MergeOutcome {
    /// Number of distinct (month, medicine) groups folded into history.
    pub merged_groups: usize,
    /// Archive path of the consumed event log, when one existed.
    pub archived_to: Option<PathBuf>,
}

/// Fold the active demand event log into the historical demand CSV.
///
/// A missing log is not an error: there is simply nothing to merge.
/// The historical dataset is created from the aggregates alone when it
/// does not exist yet.
pub fn merge_demand_events(paths: &DataPaths) -> Result<MergeOutcome, StorageError> {
    let events_path = paths.demand_events_csv();
    if !events_path.exists() {
        return Ok(MergeOutcome {
            merged_groups: 0,
            archived_to: None,
        });
    }

    let events = events::read_demand_events(&events_path)?;
    let mut groups: BTreeMap<(String, String), i64> = BTreeMap::new();
    for event in events {
        *groups.entry((event.month, event.medicine)).or_insert(0) += event.quantity;
    }

    let rows: Vec<DemandAppendRow> = groups
        .into_iter()
        .map(|((month, medicine), demand)| DemandAppendRow {
            month,
            medicine,
            demand,
        })
        .collect();
    history::append_demand_rows(&paths.demand_csv(), &rows)?;

    let archived = archive_path(&events_path);
    fs::rename(&events_path, &archived)?;
    tracing::info!(
        groups = rows.len(),
        archive = %archived.display(),
        "merged demand events into history"
    );

    Ok(MergeOutcome {
        merged_groups: rows.len(),
        archived_to: Some(archived),
    })
}

/// `<original>.processed.<UTC yyyymmddHHMMSS>`
fn archive_path(events_path: &std::path::Path) -> PathBuf {
    let stamp = Utc::now().format("%Y%m%d%H%M%S");
    let mut archived = events_path.as_os_str().to_os_string();
    archived.push(format!(".processed.{stamp}"));
    PathBuf::from(archived)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::events::{append_demand_event, DemandEvent};

    fn paths() -> (tempfile::TempDir, DataPaths) {
        let tmp = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(tmp.path());
        (tmp, paths)
    }

    fn event(month: &str, medicine: &str, quantity: i64) -> DemandEvent {
        DemandEvent::stamped(month.into(), medicine.into(), quantity, String::new())
    }

    #[test]
    fn sums_quantities_per_group_and_archives_the_log() {
        let (_tmp, paths) = paths();
        append_demand_event(&paths, &event("2025-01", "X", 5)).unwrap();
        append_demand_event(&paths, &event("2025-01", "X", 7)).unwrap();

        let outcome = merge_demand_events(&paths).unwrap();
        assert_eq!(outcome.merged_groups, 1);

        // Event log gone from its original path, present at the archive.
        assert!(!paths.demand_events_csv().exists());
        let archive = outcome.archived_to.unwrap();
        assert!(archive.exists());
        assert!(archive
            .file_name()
            .unwrap()
            .to_string_lossy()
            .contains(".processed."));

        let rows = history::read_demand(&paths.demand_csv()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month, "2025-01");
        assert_eq!(rows[0].medicine, "X");
        assert_eq!(rows[0].demand, 12.0);
    }

    #[test]
    fn appends_to_an_existing_dataset() {
        let (_tmp, paths) = paths();
        std::fs::write(
            paths.demand_csv(),
            "month,medicine,demand\n2024-12,X,100\n",
        )
        .unwrap();
        append_demand_event(&paths, &event("2025-01", "X", 5)).unwrap();
        append_demand_event(&paths, &event("2025-01", "Y", 3)).unwrap();

        let outcome = merge_demand_events(&paths).unwrap();
        assert_eq!(outcome.merged_groups, 2);

        let rows = history::read_demand(&paths.demand_csv()).unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn missing_log_merges_nothing() {
        let (_tmp, paths) = paths();
        let outcome = merge_demand_events(&paths).unwrap();
        assert_eq!(outcome.merged_groups, 0);
        assert!(outcome.archived_to.is_none());
        assert!(!paths.demand_csv().exists());
    }

    #[test]
    fn second_merge_after_archive_is_a_no_op() {
        let (_tmp, paths) = paths();
        append_demand_event(&paths, &event("2025-01", "X", 5)).unwrap();
        merge_demand_events(&paths).unwrap();

        let outcome = merge_demand_events(&paths).unwrap();
        assert_eq!(outcome.merged_groups, 0);

        // History still holds exactly the one merged row.
        let rows = history::read_demand(&paths.demand_csv()).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
