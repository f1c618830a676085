use std::collections::BTreeSet;

use rusqlite::{ToSql, params};

use crate::error::Result;
use crate::models::ClosureEdge;

use super::SqliteCorpusStore;

impl SqliteCorpusStore {
    /// Replace the closure index with `edges` in one transaction.
    ///
    /// The delete and every insert commit together or not at all, so a
    /// failed rebuild leaves the previous index intact rather than a
    /// partially populated one.
    pub fn replace_closure(&self, edges: &BTreeSet<ClosureEdge>) -> Result<usize> {
        self.with_tx(|tx| {
            tx.execute("DELETE FROM topic_descendants", [])?;
            let mut stmt = tx.prepare(
                "INSERT INTO topic_descendants(topic, descendant) VALUES (?1, ?2)",
            )?;
            for edge in edges {
                stmt.execute(params![edge.ancestor, edge.descendant])?;
            }
            Ok(edges.len())
        })
    }

    /// The full closure index, ordered by (topic, descendant).
    pub fn list_closure_edges(&self) -> Result<BTreeSet<ClosureEdge>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT topic, descendant FROM topic_descendants ORDER BY topic, descendant",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(ClosureEdge {
                    ancestor: row.get(0)?,
                    descendant: row.get(1)?,
                })
            })?;

            let mut out = BTreeSet::new();
            for row in rows {
                out.insert(row?);
            }
            Ok(out)
        })
    }

    pub fn closure_edge_count(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM topic_descendants", [], |row| {
                    row.get(0)
                })?;
            Ok(count.max(0) as u64)
        })
    }

    /// Expand query labels to themselves plus every closure descendant.
    ///
    /// Labels absent from the index pass through unchanged; they simply
    /// match nothing downstream and never suppress the rest of the set.
    pub fn expand_topics(&self, labels: &[String]) -> Result<BTreeSet<String>> {
        let mut expanded: BTreeSet<String> = labels.iter().cloned().collect();
        if labels.is_empty() {
            return Ok(expanded);
        }
        let placeholders = (0..labels.len())
            .map(|i| format!("?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT descendant FROM topic_descendants WHERE topic IN ({placeholders})"
        );
        let bindings: Vec<&dyn ToSql> = labels.iter().map(|label| label as &dyn ToSql).collect();

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(bindings.as_slice(), |row| row.get::<_, String>(0))?;
            for row in rows {
                expanded.insert(row?);
            }
            Ok(expanded)
        })
    }
}
