use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod args;


pub use args::{ImportArgs, SeriesArgs, TopArgs};

#[derive(Debug, Parser)]
#[command(name = "trendex")]
#[command(about = "AI research topic taxonomy and trend engine", version)]
pub struct Cli {
    /// Directory holding the corpus database.
    #[arg(long, default_value = ".trendex")]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create (or migrate) the corpus database.
    Init,
    /// Import JSONL datasets into the corpus.
    Import(ImportArgs),
    /// Rebuild the topic closure index from the current taxonomy.
    BuildClosure,
    /// Monthly trend series for one or more topics and their descendants.
    Series(SeriesArgs),
    /// Top topics by raw tag frequency in a date range.
    Top(TopArgs),
    /// Row counts across the corpus tables.
    Stats,
}
