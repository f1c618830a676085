use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{Result, TrendexError};
use crate::models::{Month, TopicCount, TrendPoint};
use crate::store::SqliteCorpusStore;

/// Read-only query layer over the closure index and the tagged-paper
/// corpus.
///
/// Every call is a single synchronous computation against the store;
/// nothing here mutates state, so any number of callers may query
/// concurrently. Validation happens before storage is touched, and storage
/// failures propagate unchanged rather than degrading to empty results.
#[derive(Debug, Clone)]
pub struct TrendAggregator {
    store: SqliteCorpusStore,
}

impl TrendAggregator {
    #[must_use]
    pub fn new(store: SqliteCorpusStore) -> Self {
        Self { store }
    }

    /// Monthly counts of papers tagged with any of `query_topics` or their
    /// closure descendants, calendar-complete over `[start, end]`.
    ///
    /// A paper counts once when at least one occupied slot falls in the
    /// expanded set, no matter how many slots match. Every month in the
    /// range appears in the output, zero-count months included. Labels
    /// unknown to the taxonomy contribute nothing but never suppress the
    /// rest of the query set.
    pub fn topic_series(
        &self,
        query_topics: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TrendPoint>> {
        validate_range(start, end)?;

        let expanded: Vec<String> = self.store.expand_topics(query_topics)?.into_iter().collect();
        let papers = self.store.query_tagged(&expanded, start, end)?;

        let mut buckets: BTreeMap<Month, u64> = BTreeMap::new();
        let mut month = Month::from_date(start);
        let last = Month::from_date(end);
        while month <= last {
            buckets.insert(month, 0);
            month = month.succ();
        }
        for paper in &papers {
            if let Some(count) = buckets.get_mut(&Month::from_date(paper.date)) {
                *count += 1;
            }
        }

        Ok(buckets
            .into_iter()
            .map(|(month, count)| TrendPoint { month, count })
            .collect())
    }

    /// Topics ranked by raw tag frequency in `[start, end]`, at most
    /// `limit` entries.
    ///
    /// Each occupied slot counts once, grouped by the directly assigned
    /// label with no descendant roll-up. Ordering is count descending,
    /// then label ascending, so ties resolve deterministically. A `limit`
    /// of zero yields an empty list; a limit beyond the number of distinct
    /// labels yields all of them.
    pub fn top_trends(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        limit: usize,
    ) -> Result<Vec<TopicCount>> {
        validate_range(start, end)?;
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut ranked = self.store.count_tags(start, end)?;
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        ranked.truncate(limit);
        Ok(ranked)
    }
}

fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(TrendexError::Validation(format!(
            "start date {start} is after end date {end}"
        )));
    }
    Ok(())
}
