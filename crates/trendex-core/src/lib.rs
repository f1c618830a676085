// Public fallible APIs in this crate share one concrete error contract (`TrendexError`).
// Repeating per-function `# Errors` boilerplate obscures behavior more than it clarifies.
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod closure;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod store;
pub mod trends;

pub use closure::build_closure;
pub use error::{Result, TrendexError};
pub use models::{
    ClosureEdge, DatasetStats, Month, Paper, TaggedPaper, Topic, TopicCount, TrendPoint,
};
pub use store::SqliteCorpusStore;
pub use trends::TrendAggregator;
