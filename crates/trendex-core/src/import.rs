use std::fs;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::{Result, TrendexError};
use crate::models::{Paper, TaggedPaper, Topic};
use crate::store::SqliteCorpusStore;

/// Outcome of one dataset file import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Import taxonomy topics from a line-delimited JSON file.
pub fn import_topics(store: &SqliteCorpusStore, path: &Path) -> Result<ImportReport> {
    let (topics, skipped) = read_jsonl::<Topic>(path, "topic")?;
    let imported = store.upsert_topics(&topics)?;
    Ok(ImportReport { imported, skipped })
}

/// Import corpus papers from a line-delimited JSON file.
pub fn import_papers(store: &SqliteCorpusStore, path: &Path) -> Result<ImportReport> {
    let (papers, skipped) = read_jsonl::<Paper>(path, "paper")?;
    let imported = store.insert_papers(&papers)?;
    Ok(ImportReport { imported, skipped })
}

/// Import tagged papers from a line-delimited JSON file.
pub fn import_tagged_papers(store: &SqliteCorpusStore, path: &Path) -> Result<ImportReport> {
    let (tagged, skipped) = read_jsonl::<TaggedPaper>(path, "tagged paper")?;
    let imported = store.insert_tagged_papers(&tagged)?;
    Ok(ImportReport { imported, skipped })
}

/// Tolerant JSONL parse: invalid lines are skipped with a warning and
/// counted; only a file in which nothing parses at all is rejected. Each
/// successful import lands in the store in one transaction.
fn read_jsonl<T>(path: &Path, label: &str) -> Result<(Vec<T>, usize)>
where
    T: DeserializeOwned,
{
    let raw = fs::read_to_string(path)?;
    let mut items = Vec::new();
    let mut skipped = 0usize;

    for (line_no, line) in raw.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(value) => items.push(value),
            Err(err) => {
                skipped += 1;
                warn!(
                    "skipping invalid {label} record at {}:{}: {err}",
                    path.display(),
                    line_no + 1
                );
            }
        }
    }

    if items.is_empty() && skipped > 0 {
        return Err(TrendexError::Validation(format!(
            "{label} import failed from {}: all {skipped} lines invalid",
            path.display()
        )));
    }
    Ok((items, skipped))
}
