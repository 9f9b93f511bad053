use std::{fs::File, io::BufWriter, path::Path};

use anyhow::{Context, Result};
use dataset::{write_jsonl, ChatRecord, DatasetSplit, Hash32};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SplitManifest {
    pub id: Uuid,
    pub dataset_path: String,
    #[serde(with = "hex", rename = "dataset_hash_hex")]
    pub dataset_hash: Hash32,   // BLAKE3 over source lines
    pub total_samples: usize,
    pub train_samples: usize,
    pub test_samples: usize,
    pub train_fraction: f64,
    pub max_samples: Option<usize>,
    pub skipped: usize,
    pub created_at: u64,
}

impl SplitManifest {
    pub fn new(
        dataset_path: &Path,
        split: &DatasetSplit<Vec<ChatRecord>>,
        train_fraction: f64,
        max_samples: Option<usize>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            dataset_path: dataset_path.display().to_string(),
            dataset_hash: split.dataset_hash,
            total_samples: split.total_samples,
            train_samples: split.train.len(),
            test_samples: split.test.as_ref().map_or(0, Vec::len),
            train_fraction,
            max_samples,
            skipped: split.diagnostics.len(),
            created_at: now(),
        }
    }
}

/// Writes `train.jsonl`, `test.jsonl` (only when non-empty) and `manifest.json`.
pub fn write_split(dir: &Path, split: &DatasetSplit<Vec<ChatRecord>>, manifest: &SplitManifest) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Cannot create '{}'", dir.display()))?;

    write_records(&dir.join("train.jsonl"), &split.train)?;
    if let Some(test) = &split.test {
        write_records(&dir.join("test.jsonl"), test)?;
    }

    let manifest_path = dir.join("manifest.json");
    let bytes = serde_json::to_vec_pretty(manifest)?;
    std::fs::write(&manifest_path, bytes)
        .with_context(|| format!("Cannot write '{}'", manifest_path.display()))?;
    Ok(())
}

fn write_records(path: &Path, records: &[ChatRecord]) -> Result<()> {
    let f = File::create(path).with_context(|| format!("Cannot create '{}'", path.display()))?;
    write_jsonl(records, BufWriter::new(f)).with_context(|| format!("Cannot write '{}'", path.display()))?;
    tracing::info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

fn now() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs())
}
