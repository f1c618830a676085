use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of topic slots on a tagged paper.
pub const TOPIC_SLOTS: usize = 5;

/// A node in the research-topic taxonomy.
///
/// `uri` is the stable identifier; `broader` is the uri of the parent topic,
/// if any. Well-formed input is a forest, but nothing here enforces that —
/// the closure builder guards against malformed chains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub uri: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broader: Option<String>,
    #[serde(default)]
    pub level: i64,
}

/// One (ancestor, descendant) pair of the materialized hierarchy closure.
///
/// Edges are keyed by label because queries are issued against labels.
/// Ancestor and descendant are always distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClosureEdge {
    pub ancestor: String,
    pub descendant: String,
}

impl ClosureEdge {
    #[must_use]
    pub fn new(ancestor: impl Into<String>, descendant: impl Into<String>) -> Self {
        Self {
            ancestor: ancestor.into(),
            descendant: descendant.into(),
        }
    }
}

/// A paper from the raw corpus dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    pub submission_date: NaiveDate,
}

/// A paper annotated with up to five topic labels and a submission date.
///
/// Slot position carries no meaning; queries care about membership only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedPaper {
    pub url: String,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub topics: [Option<String>; TOPIC_SLOTS],
}

impl TaggedPaper {
    /// Occupied topic slots, in slot order.
    pub fn slot_labels(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().flatten().map(String::as_str)
    }
}

/// A calendar month, ordered chronologically and rendered as `YYYY-MM`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "String", try_from = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month immediately after this one.
    #[must_use]
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (year, month) = raw
            .split_once('-')
            .ok_or_else(|| format!("expected YYYY-MM, got {raw:?}"))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| format!("invalid year in {raw:?}"))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| format!("invalid month in {raw:?}"))?;
        if !(1..=12).contains(&month) {
            return Err(format!("month out of range in {raw:?}"));
        }
        Ok(Self { year, month })
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

impl TryFrom<String> for Month {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// One entry of a calendar-complete monthly series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub month: Month,
    pub count: u64,
}

/// One entry of a ranked top-trends list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCount {
    pub label: String,
    pub count: u64,
}

/// Row counts across the corpus tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetStats {
    pub topics: u64,
    pub papers: u64,
    pub tagged_papers: u64,
    pub closure_edges: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_renders_zero_padded() {
        let month = Month::from_date(NaiveDate::from_ymd_opt(2023, 3, 17).expect("date"));
        assert_eq!(month.to_string(), "2023-03");
    }

    #[test]
    fn month_succ_rolls_over_december() {
        let december = "2022-12".parse::<Month>().expect("parse");
        assert_eq!(december.succ(), "2023-01".parse::<Month>().expect("parse"));
    }

    #[test]
    fn month_ordering_is_chronological() {
        let earlier = "2022-12".parse::<Month>().expect("parse");
        let later = "2023-01".parse::<Month>().expect("parse");
        assert!(earlier < later);
    }

    #[test]
    fn month_rejects_out_of_range() {
        assert!("2023-13".parse::<Month>().is_err());
        assert!("2023".parse::<Month>().is_err());
    }

    #[test]
    fn slot_labels_skips_empty_slots() {
        let paper = TaggedPaper {
            url: "https://arxiv.org/abs/0000.0001".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 1, 2).expect("date"),
            title: "t".to_string(),
            abstract_text: None,
            topics: [
                Some("deep learning".to_string()),
                None,
                Some("speech recognition".to_string()),
                None,
                None,
            ],
        };
        let labels: Vec<_> = paper.slot_labels().collect();
        assert_eq!(labels, ["deep learning", "speech recognition"]);
    }
}
