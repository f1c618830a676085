use rusqlite::params;

use crate::error::Result;
use crate::models::Topic;

use super::SqliteCorpusStore;

impl SqliteCorpusStore {
    /// Ordered enumeration of the taxonomy, parents included by reference.
    pub fn list_topics(&self) -> Result<Vec<Topic>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r"
                SELECT s, prefLabel, altLabel, description, broader, level
                FROM topics
                ORDER BY id ASC
                ",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(Topic {
                    uri: row.get(0)?,
                    label: row.get(1)?,
                    alt_label: row.get(2)?,
                    description: row.get(3)?,
                    broader: row.get(4)?,
                    level: row.get(5)?,
                })
            })?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }

    /// Insert or update topics by stable uri, all inside one transaction.
    pub fn upsert_topics(&self, topics: &[Topic]) -> Result<usize> {
        self.with_tx(|tx| {
            let mut stmt = tx.prepare(
                r"
                INSERT INTO topics(s, prefLabel, altLabel, description, broader, level)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ON CONFLICT(s) DO UPDATE SET
                  prefLabel=excluded.prefLabel,
                  altLabel=excluded.altLabel,
                  description=excluded.description,
                  broader=excluded.broader,
                  level=excluded.level
                ",
            )?;
            for topic in topics {
                stmt.execute(params![
                    topic.uri,
                    topic.label,
                    topic.alt_label,
                    topic.description,
                    topic.broader,
                    topic.level,
                ])?;
            }
            Ok(topics.len())
        })
    }
}
