//! Transport-agnostic application state.
//!
//! `AppState` is the single shared state behind the HTTP layer: the
//! published model snapshot, the data paths, and the merge lock.
//! Wrapped in `Arc` at startup. Snapshot reads are lock-free beyond a
//! brief `RwLock` clone; merge-and-retrain is serialized so only one
//! pass can consume an event log at a time.

use std::sync::Arc;

use thiserror::Error;

use crate::analytics::snapshot::ModelSnapshot;
use crate::analytics::{training, AnalyticsError, SnapshotStore};
use crate::config::DataPaths;
use crate::storage::{merge, StorageError};

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What one merge-and-retrain pass produced.
pub struct MergeReport {
    pub merged_demand_groups: usize,
    pub snapshot: Arc<ModelSnapshot>,
}

pub struct AppState {
    pub paths: DataPaths,
    snapshots: SnapshotStore,
    /// Single-writer lock: held across the full merge + retrain
    /// sequence so concurrent calls cannot double-consume a log or
    /// interleave appends with the archive rename.
    merge_lock: tokio::sync::Mutex<()>,
}

impl AppState {
    /// Run the initial training pass and publish the first snapshot.
    pub fn bootstrap(paths: DataPaths) -> Result<Self, StateError> {
        let snapshot = training::train(&paths)?;
        Ok(Self {
            paths,
            snapshots: SnapshotStore::new(snapshot),
            merge_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<ModelSnapshot> {
        self.snapshots.get()
    }

    /// Re-run the training pipeline over the current datasets and
    /// publish the result as a unit.
    pub fn retrain(&self) -> Result<Arc<ModelSnapshot>, StateError> {
        let snapshot = training::train(&self.paths)?;
        Ok(self.snapshots.publish(snapshot))
    }

    /// Fold pending demand events into the historical dataset, archive
    /// the consumed log, then retrain unconditionally.
    pub async fn merge_and_retrain(&self) -> Result<MergeReport, StateError> {
        let _guard = self.merge_lock.lock().await;
        let outcome = merge::merge_demand_events(&self.paths)?;
        let snapshot = self.retrain()?;
        Ok(MergeReport {
            merged_demand_groups: outcome.merged_groups,
            snapshot,
        })
    }
}
