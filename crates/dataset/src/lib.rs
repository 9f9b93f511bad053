//! Chat-format dataset preparation for on-policy distillation.
//!
//! Loads JSONL prompt files, drops structurally invalid records, splits the
//! survivors positionally into train/test and summarizes them.

pub mod schema;
pub mod diagnostics;
pub mod error;
pub mod loader;
pub mod split;
pub mod stats;
pub mod sink;

pub use schema::*;
pub use diagnostics::*;
pub use error::*;
pub use loader::*;
pub use split::*;
pub use stats::*;
pub use sink::*;
