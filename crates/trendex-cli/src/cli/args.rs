use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSONL file of taxonomy topics.
    #[arg(long)]
    pub topics: Option<PathBuf>,
    /// JSONL file of corpus papers.
    #[arg(long)]
    pub papers: Option<PathBuf>,
    /// JSONL file of tagged papers.
    #[arg(long)]
    pub tagged: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SeriesArgs {
    /// Topic labels to query; each rolls up its closure descendants.
    #[arg(required = true)]
    pub topics: Vec<String>,
    /// Start date (YYYY-MM-DD); defaults to the earliest tagged date.
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// End date (YYYY-MM-DD); defaults to the latest tagged date.
    #[arg(long)]
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Args)]
pub struct TopArgs {
    /// Maximum number of topics to rank.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
    /// Start date (YYYY-MM-DD); defaults to the earliest tagged date.
    #[arg(long)]
    pub start: Option<NaiveDate>,
    /// End date (YYYY-MM-DD); defaults to the latest tagged date.
    #[arg(long)]
    pub end: Option<NaiveDate>,
}
