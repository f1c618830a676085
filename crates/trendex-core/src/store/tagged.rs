use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{ToSql, params};

use crate::error::Result;
use crate::models::{Paper, TaggedPaper, TopicCount};

use super::SqliteCorpusStore;

impl SqliteCorpusStore {
    /// Insert or update papers by url, all inside one transaction.
    pub fn insert_papers(&self, papers: &[Paper]) -> Result<usize> {
        self.with_tx(|tx| {
            let mut stmt = tx.prepare(
                r"
                INSERT INTO papers(url, title, categories, abstract, submission_date)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(url) DO UPDATE SET
                  title=excluded.title,
                  categories=excluded.categories,
                  abstract=excluded.abstract,
                  submission_date=excluded.submission_date
                ",
            )?;
            for paper in papers {
                stmt.execute(params![
                    paper.url,
                    paper.title,
                    paper.categories,
                    paper.abstract_text,
                    paper.submission_date.to_string(),
                ])?;
            }
            Ok(papers.len())
        })
    }

    /// Append tagged papers, all inside one transaction.
    ///
    /// Empty or whitespace-only slot values are stored as NULL so that slot
    /// occupancy in queries means a real label.
    pub fn insert_tagged_papers(&self, tagged: &[TaggedPaper]) -> Result<usize> {
        self.with_tx(|tx| {
            let mut stmt = tx.prepare(
                r"
                INSERT INTO tagged_papers(url, date, title, abstract,
                                          topic1, topic2, topic3, topic4, topic5)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                ",
            )?;
            for paper in tagged {
                stmt.execute(params![
                    paper.url,
                    paper.date.to_string(),
                    paper.title,
                    paper.abstract_text,
                    occupied(&paper.topics[0]),
                    occupied(&paper.topics[1]),
                    occupied(&paper.topics[2]),
                    occupied(&paper.topics[3]),
                    occupied(&paper.topics[4]),
                ])?;
            }
            Ok(tagged.len())
        })
    }

    /// Tagged papers whose date falls in `[start, end]` and which carry at
    /// least one of `labels` in some topic slot. Each matching paper comes
    /// back exactly once regardless of how many slots match.
    pub fn query_tagged(
        &self,
        labels: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TaggedPaper>> {
        if labels.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = (0..labels.len())
            .map(|i| format!("?{}", i + 3))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            r"
            SELECT url, date, title, abstract, topic1, topic2, topic3, topic4, topic5
            FROM tagged_papers
            WHERE date BETWEEN ?1 AND ?2
              AND (topic1 IN ({placeholders})
                OR topic2 IN ({placeholders})
                OR topic3 IN ({placeholders})
                OR topic4 IN ({placeholders})
                OR topic5 IN ({placeholders}))
            ORDER BY date ASC
            "
        );

        let start = start.to_string();
        let end = end.to_string();
        let mut bindings: Vec<&dyn ToSql> = Vec::with_capacity(labels.len() + 2);
        bindings.push(&start);
        bindings.push(&end);
        for label in labels {
            bindings.push(label);
        }

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(bindings.as_slice(), |row| {
                let raw_date = row.get::<_, String>(1)?;
                Ok(TaggedPaper {
                    url: row.get(0)?,
                    date: parse_date_column(1, &raw_date)?,
                    title: row.get(2)?,
                    abstract_text: row.get(3)?,
                    topics: [
                        row.get(4)?,
                        row.get(5)?,
                        row.get(6)?,
                        row.get(7)?,
                        row.get(8)?,
                    ],
                })
            })?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }

    /// Raw tag counts in `[start, end]`, one count per occupied slot,
    /// grouped by label. No descendant roll-up and no ordering guarantee;
    /// ranking is the aggregator's concern.
    pub fn count_tags(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<TopicCount>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r"
                SELECT topic, COUNT(*) AS topic_count
                FROM (
                    SELECT topic1 AS topic FROM tagged_papers
                        WHERE topic1 IS NOT NULL AND date BETWEEN ?1 AND ?2
                    UNION ALL
                    SELECT topic2 AS topic FROM tagged_papers
                        WHERE topic2 IS NOT NULL AND date BETWEEN ?1 AND ?2
                    UNION ALL
                    SELECT topic3 AS topic FROM tagged_papers
                        WHERE topic3 IS NOT NULL AND date BETWEEN ?1 AND ?2
                    UNION ALL
                    SELECT topic4 AS topic FROM tagged_papers
                        WHERE topic4 IS NOT NULL AND date BETWEEN ?1 AND ?2
                    UNION ALL
                    SELECT topic5 AS topic FROM tagged_papers
                        WHERE topic5 IS NOT NULL AND date BETWEEN ?1 AND ?2
                )
                GROUP BY topic
                ",
            )?;
            let rows = stmt.query_map(params![start.to_string(), end.to_string()], |row| {
                Ok(TopicCount {
                    label: row.get(0)?,
                    count: row.get::<_, i64>(1)?.max(0) as u64,
                })
            })?;

            let mut out = Vec::new();
            for row in rows {
                out.push(row?);
            }
            Ok(out)
        })
    }

    /// Earliest and latest tagged dates, or `None` for an empty table.
    pub fn date_bounds(&self) -> Result<Option<(NaiveDate, NaiveDate)>> {
        self.with_conn(|conn| {
            let (min, max) = conn.query_row(
                "SELECT min(date), max(date) FROM tagged_papers",
                [],
                |row| {
                    Ok((
                        row.get::<_, Option<String>>(0)?,
                        row.get::<_, Option<String>>(1)?,
                    ))
                },
            )?;
            match (min, max) {
                (Some(min), Some(max)) => {
                    let start = parse_date_column(0, &min)?;
                    let end = parse_date_column(1, &max)?;
                    Ok(Some((start, end)))
                }
                _ => Ok(None),
            }
        })
    }
}

fn occupied(slot: &Option<String>) -> Option<&str> {
    slot.as_deref().map(str::trim).filter(|label| !label.is_empty())
}

fn parse_date_column(index: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    raw.parse().map_err(|err: chrono::ParseError| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err))
    })
}
