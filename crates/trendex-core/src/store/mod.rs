use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::error::{Result, TrendexError};
use crate::models::DatasetStats;

mod closure_index;
mod hierarchy;
mod migration;
mod tagged;

#[cfg(test)]
mod tests;

/// SQLite-backed corpus store: the topic taxonomy, the paper corpus, the
/// tagged-paper table, and the materialized `topic_descendants` closure
/// index.
///
/// The hierarchy and tagged-paper surfaces are read sources for the engine;
/// the closure index is derived data replaced atomically by the maintenance
/// path. Reads never mutate anything.
#[derive(Clone)]
pub struct SqliteCorpusStore {
    conn: Arc<Mutex<Connection>>,
}

impl fmt::Debug for SqliteCorpusStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteCorpusStore").finish_non_exhaustive()
    }
}

impl SqliteCorpusStore {
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| TrendexError::mutex_poisoned("sqlite"))?;
        f(&conn)
    }

    fn with_tx<T>(&self, f: impl FnOnce(&rusqlite::Transaction<'_>) -> Result<T>) -> Result<T> {
        let mut conn = self
            .conn
            .lock()
            .map_err(|_| TrendexError::mutex_poisoned("sqlite"))?;
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Open (or create) the corpus database at `path` and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.migrate()?;
        Ok(store)
    }

    /// Row counts across the corpus tables.
    pub fn dataset_stats(&self) -> Result<DatasetStats> {
        self.with_conn(|conn| {
            let count = |sql: &str| -> Result<u64> {
                let n: i64 = conn.query_row(sql, [], |row| row.get(0))?;
                Ok(n.max(0) as u64)
            };
            Ok(DatasetStats {
                topics: count("SELECT COUNT(*) FROM topics")?,
                papers: count("SELECT COUNT(*) FROM papers")?,
                tagged_papers: count("SELECT COUNT(*) FROM tagged_papers")?,
                closure_edges: count("SELECT COUNT(*) FROM topic_descendants")?,
            })
        })
    }
}
