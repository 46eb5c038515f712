//! Model training and inference: the month index, per-entity demand
//! and disease regressors, and the readmission risk classifier.

pub mod features;
pub mod month;
pub mod regression;
pub mod risk;
pub mod snapshot;
pub mod training;

pub use month::{MonthIndex, MonthInput};
pub use snapshot::{ModelSnapshot, SnapshotStore};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Storage(#[from] crate::storage::StorageError),

    #[error("model fit failed: {0}")]
    Fit(String),
}
