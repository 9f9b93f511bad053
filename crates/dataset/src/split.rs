use crate::{ChatRecord, DatasetError, EmptyCause, Result};

/// Positional train/test split.
///
/// - truncate to the first `max_samples` records when given
/// - `split_idx = floor(len * train_fraction)`
/// - train = `[0, split_idx)`, test = `[split_idx, len)`
///
/// No shuffling: identical input always yields identical output.
pub fn split_records(
    mut records: Vec<ChatRecord>,
    train_fraction: f64,
    max_samples: Option<usize>,
) -> Result<(Vec<ChatRecord>, Vec<ChatRecord>)> {
    if !train_fraction.is_finite() || train_fraction <= 0.0 || train_fraction > 1.0 {
        return Err(DatasetError::InvalidTrainFraction(train_fraction));
    }
    if records.is_empty() {
        return Err(DatasetError::NoValidSamples { operation: "split", cause: EmptyCause::EmptyInput });
    }

    if let Some(max) = max_samples {
        records.truncate(max);
    }
    if records.is_empty() {
        return Err(DatasetError::NoValidSamples { operation: "split", cause: EmptyCause::Truncated });
    }

    let split_idx = split_index(records.len(), train_fraction);
    let test = records.split_off(split_idx);
    Ok((records, test))
}

pub fn split_index(len: usize, train_fraction: f64) -> usize {
    ((len as f64) * train_fraction).floor() as usize
}
