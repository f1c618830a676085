use std::collections::BTreeSet;

use chrono::NaiveDate;
use tempfile::tempdir;

use crate::models::{ClosureEdge, Paper, TaggedPaper, Topic};

use super::*;

fn topic(uri: &str, label: &str, broader: Option<&str>) -> Topic {
    Topic {
        uri: uri.to_string(),
        label: label.to_string(),
        alt_label: None,
        description: None,
        broader: broader.map(ToString::to_string),
        level: i64::from(broader.is_some()),
    }
}

fn tagged(url: &str, date: &str, labels: &[&str]) -> TaggedPaper {
    let mut topics: [Option<String>; 5] = Default::default();
    for (slot, label) in labels.iter().enumerate() {
        topics[slot] = Some((*label).to_string());
    }
    TaggedPaper {
        url: url.to_string(),
        date: date.parse().expect("date"),
        title: format!("paper {url}"),
        abstract_text: None,
        topics,
    }
}

fn date(raw: &str) -> NaiveDate {
    raw.parse().expect("date")
}

fn open_store(temp: &tempfile::TempDir) -> SqliteCorpusStore {
    SqliteCorpusStore::open(temp.path().join("corpus.db")).expect("open failed")
}

#[test]
fn migrate_and_topic_round_trip() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);

    let topics = vec![
        topic("urn:ml", "machine learning", None),
        topic("urn:dl", "deep learning", Some("urn:ml")),
    ];
    assert_eq!(store.upsert_topics(&topics).expect("upsert"), 2);

    let listed = store.list_topics().expect("list");
    assert_eq!(listed, topics);
}

#[test]
fn upsert_topics_is_keyed_by_uri() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);

    store
        .upsert_topics(&[topic("urn:ml", "machine learning", None)])
        .expect("first upsert");
    store
        .upsert_topics(&[topic("urn:ml", "ML (renamed)", None)])
        .expect("second upsert");

    let listed = store.list_topics().expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].label, "ML (renamed)");
}

#[test]
fn reopening_preserves_data() {
    let temp = tempdir().expect("tempdir");
    let db_path = temp.path().join("corpus.db");
    {
        let store = SqliteCorpusStore::open(&db_path).expect("open");
        store
            .upsert_topics(&[topic("urn:ml", "machine learning", None)])
            .expect("upsert");
    }
    let store = SqliteCorpusStore::open(&db_path).expect("reopen");
    assert_eq!(store.list_topics().expect("list").len(), 1);
}

#[test]
fn replace_closure_swaps_the_whole_index() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);

    let first: BTreeSet<_> = [
        ClosureEdge::new("a", "b"),
        ClosureEdge::new("a", "c"),
        ClosureEdge::new("b", "c"),
    ]
    .into_iter()
    .collect();
    assert_eq!(store.replace_closure(&first).expect("replace"), 3);
    assert_eq!(store.list_closure_edges().expect("list"), first);

    let second: BTreeSet<_> = [ClosureEdge::new("x", "y")].into_iter().collect();
    assert_eq!(store.replace_closure(&second).expect("replace"), 1);
    assert_eq!(store.list_closure_edges().expect("list"), second);
    assert_eq!(store.closure_edge_count().expect("count"), 1);
}

#[test]
fn replace_closure_twice_leaves_no_duplicates() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);

    let edges: BTreeSet<_> = [ClosureEdge::new("a", "b"), ClosureEdge::new("a", "c")]
        .into_iter()
        .collect();
    store.replace_closure(&edges).expect("first");
    store.replace_closure(&edges).expect("second");
    assert_eq!(store.closure_edge_count().expect("count"), 2);
}

#[test]
fn expand_topics_includes_self_and_descendants() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);

    let edges: BTreeSet<_> = [
        ClosureEdge::new("root", "mid"),
        ClosureEdge::new("root", "leaf"),
        ClosureEdge::new("mid", "leaf"),
    ]
    .into_iter()
    .collect();
    store.replace_closure(&edges).expect("replace");

    let expanded = store
        .expand_topics(&["root".to_string()])
        .expect("expand");
    let expected: BTreeSet<String> = ["root", "mid", "leaf"]
        .into_iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(expanded, expected);

    let unknown = store
        .expand_topics(&["nowhere".to_string()])
        .expect("expand unknown");
    assert_eq!(unknown.len(), 1);
}

#[test]
fn query_tagged_filters_by_membership_and_range() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);

    store
        .insert_tagged_papers(&[
            tagged("p1", "2023-02-10", &["a"]),
            tagged("p2", "2023-02-11", &["b"]),
            tagged("p3", "2023-03-01", &["a"]),
        ])
        .expect("insert");

    let rows = store
        .query_tagged(&["a".to_string()], date("2023-02-01"), date("2023-02-28"))
        .expect("query");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].url, "p1");
}

#[test]
fn query_tagged_matches_any_slot_and_returns_each_paper_once() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);

    store
        .insert_tagged_papers(&[tagged("p1", "2023-02-10", &["x", "a", "y", "a"])])
        .expect("insert");

    let rows = store
        .query_tagged(
            &["a".to_string(), "y".to_string()],
            date("2023-02-01"),
            date("2023-02-28"),
        )
        .expect("query");
    assert_eq!(rows.len(), 1);
}

#[test]
fn query_tagged_with_no_labels_is_empty() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);

    store
        .insert_tagged_papers(&[tagged("p1", "2023-02-10", &["a"])])
        .expect("insert");
    let rows = store
        .query_tagged(&[], date("2023-01-01"), date("2023-12-31"))
        .expect("query");
    assert!(rows.is_empty());
}

#[test]
fn count_tags_counts_per_occupied_slot() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);

    store
        .insert_tagged_papers(&[
            tagged("p1", "2023-02-10", &["a", "b"]),
            tagged("p2", "2023-02-11", &["a"]),
        ])
        .expect("insert");

    let mut counts = store
        .count_tags(date("2023-02-01"), date("2023-02-28"))
        .expect("count");
    counts.sort_by(|lhs, rhs| lhs.label.cmp(&rhs.label));
    assert_eq!(counts.len(), 2);
    assert_eq!((counts[0].label.as_str(), counts[0].count), ("a", 2));
    assert_eq!((counts[1].label.as_str(), counts[1].count), ("b", 1));
}

#[test]
fn blank_slot_values_are_stored_as_null() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);

    let mut paper = tagged("p1", "2023-02-10", &["a"]);
    paper.topics[1] = Some("   ".to_string());
    store.insert_tagged_papers(&[paper]).expect("insert");

    let counts = store
        .count_tags(date("2023-02-01"), date("2023-02-28"))
        .expect("count");
    assert_eq!(counts.len(), 1);
    assert_eq!(counts[0].label, "a");
}

#[test]
fn date_bounds_empty_table_is_none() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);
    assert!(store.date_bounds().expect("bounds").is_none());
}

#[test]
fn date_bounds_span_the_tagged_corpus() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);

    store
        .insert_tagged_papers(&[
            tagged("p1", "2022-11-02", &["a"]),
            tagged("p2", "2023-04-20", &["b"]),
        ])
        .expect("insert");

    let (start, end) = store.date_bounds().expect("bounds").expect("some");
    assert_eq!(start, date("2022-11-02"));
    assert_eq!(end, date("2023-04-20"));
}

#[test]
fn dataset_stats_reports_row_counts() {
    let temp = tempdir().expect("tempdir");
    let store = open_store(&temp);

    store
        .upsert_topics(&[topic("urn:ml", "machine learning", None)])
        .expect("topics");
    store
        .insert_papers(&[Paper {
            url: "p1".to_string(),
            title: "t".to_string(),
            categories: Some("cs.LG".to_string()),
            abstract_text: None,
            submission_date: date("2023-02-10"),
        }])
        .expect("papers");
    store
        .insert_tagged_papers(&[tagged("p1", "2023-02-10", &["machine learning"])])
        .expect("tagged");
    store
        .replace_closure(&[ClosureEdge::new("a", "b")].into_iter().collect())
        .expect("closure");

    let stats = store.dataset_stats().expect("stats");
    assert_eq!(stats.topics, 1);
    assert_eq!(stats.papers, 1);
    assert_eq!(stats.tagged_papers, 1);
    assert_eq!(stats.closure_edges, 1);
}
