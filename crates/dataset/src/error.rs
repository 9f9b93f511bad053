use std::path::PathBuf;

use thiserror::Error;

/// Why a validated sequence ended up empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyCause {
    /// No line yielded a record with a `messages` key.
    NothingLoaded,
    /// Records were loaded but every one failed structural validation.
    AllRejected,
    /// The caller handed an empty slice straight to split/statistics.
    EmptyInput,
    /// Validation left records but `max_samples` truncated them all away.
    Truncated,
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Dataset not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Dataset is not a file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No valid samples found in dataset ({operation}: {cause:?})")]
    NoValidSamples {
        operation: &'static str,
        cause: EmptyCause,
    },

    #[error("Train fraction must be in (0, 1], got {0}")]
    InvalidTrainFraction(f64),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
