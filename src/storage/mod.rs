//! On-disk datasets: historical CSVs, append-only event logs, and the
//! merge step that folds pending events back into history.

pub mod events;
pub mod history;
pub mod merge;

pub use merge::MergeOutcome;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
