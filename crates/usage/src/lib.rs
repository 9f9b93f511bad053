//! Token and cost accounting for a metered teacher API, plus the simulated
//! training loop that drives it.

pub mod pricing;
pub mod accountant;
pub mod estimate;
pub mod simulator;

pub use pricing::*;
pub use accountant::*;
pub use estimate::*;
pub use simulator::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsageError {
    #[error("Invalid rate for {model}: {rate} (must be a non-negative number)")]
    InvalidRate { model: String, rate: f64 },

    #[error("Unknown teacher source: {0} (expected cloud or local)")]
    UnknownTeacherSource(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Ser(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UsageError>;
