use std::{fs::File, io::{BufRead, BufReader, ErrorKind}, path::{Path, PathBuf}};

use serde::Serialize;
use serde_json::Value;

use crate::{
    split_records, statistics, ChatRecord, DatasetError, DatasetStatistics, Diagnostic,
    EmptyCause, Hash32, Position, RawRecord, RecordSink, Result, SkipReason,
};

#[derive(Clone, Debug)]
pub struct LoadOutcome {
    pub records: Vec<RawRecord>,
    pub diagnostics: Vec<Diagnostic>,
    pub dataset_hash: Hash32,   // BLAKE3 over every read line + "\n"
    pub lines_read: usize,
    pub non_blank_lines: usize,
}

#[derive(Clone, Debug)]
pub struct ValidateOutcome {
    pub records: Vec<ChatRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Clone, Debug)]
pub struct DatasetSplit<S> {
    pub train: S,
    pub test: Option<S>,
    pub total_samples: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub dataset_hash: Hash32,
}

#[derive(Clone, Debug, Serialize)]
pub struct DatasetReport {
    #[serde(flatten)]
    pub stats: DatasetStatistics,
    pub dataset_path: String,
    pub dataset_hash_hex: String,
}

/// Parse JSONL from any buffered reader.
///
/// Blank lines are skipped. Unparseable lines are reported at error level and
/// lines without a `messages` key at warning level; both are dropped.
/// A line that is not valid UTF-8 is dropped at error level. Any other read
/// error ends the load and is returned.
pub fn load_from_reader<R: BufRead>(reader: R) -> Result<LoadOutcome> {
    let mut records = Vec::new();
    let mut diagnostics = Vec::new();
    let mut hasher = blake3::Hasher::new();
    let mut lines_read = 0;
    let mut non_blank_lines = 0;

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        lines_read = line_no;
        let mut skip = |reason: SkipReason| {
            let d = Diagnostic { position: Position::Line(line_no), reason };
            d.log();
            diagnostics.push(d);
        };

        let line = match line {
            Ok(v) => v,
            // the bad bytes were consumed, the next read starts on the next line
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                skip(SkipReason::Read(e.to_string()));
                continue;
            }
            Err(e) => return Err(DatasetError::Io(e)),
        };

        hasher.update(line.as_bytes());
        hasher.update(b"\n");

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        non_blank_lines += 1;

        let value: Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(e) => {
                skip(SkipReason::InvalidJson(e.to_string()));
                continue;
            }
        };

        // non-object JSON (numbers, arrays, ...) has no `messages` either
        if value.get("messages").is_none() {
            skip(SkipReason::MissingMessages);
            continue;
        }

        records.push(RawRecord { line: line_no, value });
    }

    Ok(LoadOutcome {
        records,
        diagnostics,
        dataset_hash: hasher.finalize().into(),
        lines_read,
        non_blank_lines,
    })
}

/// Keep records whose message list is non-empty and whose every message has a
/// string `role` and `content`. Order is preserved.
pub fn validate_messages(records: &[RawRecord]) -> ValidateOutcome {
    let mut valid = Vec::with_capacity(records.len());
    let mut diagnostics = Vec::new();

    for (index, raw) in records.iter().enumerate() {
        match raw.project() {
            Ok(rec) => valid.push(rec),
            Err(reason) => {
                let d = Diagnostic {
                    position: Position::Sample { index, line: raw.line },
                    reason,
                };
                d.log();
                diagnostics.push(d);
            }
        }
    }

    ValidateOutcome { records: valid, diagnostics }
}

/// Loads and prepares a JSONL chat dataset for on-policy distillation.
#[derive(Clone, Debug)]
pub struct OpdDataLoader {
    dataset_path: PathBuf,
}

impl OpdDataLoader {
    /// Fails immediately if `path` does not exist or is not a regular file.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let dataset_path = path.as_ref().to_path_buf();
        if !dataset_path.exists() {
            return Err(DatasetError::NotFound(dataset_path));
        }
        if !dataset_path.is_file() {
            return Err(DatasetError::NotAFile(dataset_path));
        }
        Ok(Self { dataset_path })
    }

    pub fn path(&self) -> &Path {
        &self.dataset_path
    }

    pub fn load_jsonl(&self) -> Result<LoadOutcome> {
        let f = File::open(&self.dataset_path)?;
        load_from_reader(BufReader::new(f))
    }

    fn load_valid(&self) -> Result<(LoadOutcome, ValidateOutcome)> {
        let loaded = self.load_jsonl()?;
        let validated = validate_messages(&loaded.records);
        Ok((loaded, validated))
    }

    /// Load, validate, truncate to `max_samples` and split positionally.
    pub fn create_dataset<S: RecordSink>(
        &self,
        train_fraction: f64,
        max_samples: Option<usize>,
    ) -> Result<DatasetSplit<S>> {
        let (loaded, validated) = self.load_valid()?;
        ensure_samples("split", loaded.records.len(), validated.records.len())?;

        let (train, test) = split_records(validated.records, train_fraction, max_samples)?;
        let total_samples = train.len() + test.len();

        tracing::info!("Loaded {total_samples} total samples");
        tracing::info!("Train: {}, Test: {}", train.len(), test.len());

        let mut diagnostics = loaded.diagnostics;
        diagnostics.extend(validated.diagnostics);

        Ok(DatasetSplit {
            train: S::from_records(train),
            test: if test.is_empty() { None } else { Some(S::from_records(test)) },
            total_samples,
            diagnostics,
            dataset_hash: loaded.dataset_hash,
        })
    }

    pub fn get_statistics(&self) -> Result<DatasetReport> {
        let (loaded, validated) = self.load_valid()?;
        ensure_samples("statistics", loaded.records.len(), validated.records.len())?;

        Ok(DatasetReport {
            stats: statistics(&validated.records)?,
            dataset_path: self.dataset_path.display().to_string(),
            dataset_hash_hex: hex::encode(loaded.dataset_hash),
        })
    }
}

fn ensure_samples(operation: &'static str, loaded: usize, valid: usize) -> Result<()> {
    if valid > 0 {
        return Ok(());
    }
    let cause = if loaded == 0 { EmptyCause::NothingLoaded } else { EmptyCause::AllRejected };
    Err(DatasetError::NoValidSamples { operation, cause })
}
