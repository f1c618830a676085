use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Serialize;
use trendex_core::config::resolve_db_path;
use trendex_core::import::{ImportReport, import_papers, import_tagged_papers, import_topics};
use trendex_core::{SqliteCorpusStore, TrendAggregator, build_closure};

use crate::cli::{Commands, ImportArgs};

#[derive(Debug, Serialize)]
struct ImportSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    topics: Option<ImportReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    papers: Option<ImportReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tagged: Option<ImportReport>,
}

#[derive(Debug, Serialize)]
struct ClosureBuildSummary {
    topics: usize,
    edges: usize,
}

pub(crate) fn run_from_root(root: &Path, command: Commands) -> Result<()> {
    init_tracing()?;

    let db_path = resolve_db_path(root);
    let store = SqliteCorpusStore::open(&db_path)
        .with_context(|| format!("failed to open corpus database at {}", db_path.display()))?;

    match command {
        Commands::Init => {
            println!("initialized at {}", db_path.display());
        }
        Commands::Import(args) => {
            run_import(&store, &args)?;
        }
        Commands::BuildClosure => {
            let topics = store.list_topics()?;
            let edges = build_closure(&topics)?;
            store.replace_closure(&edges)?;
            print_json(&ClosureBuildSummary {
                topics: topics.len(),
                edges: edges.len(),
            })?;
        }
        Commands::Series(args) => {
            let (start, end) = resolve_range(&store, args.start, args.end)?;
            let aggregator = TrendAggregator::new(store);
            let series = aggregator.topic_series(&args.topics, start, end)?;
            print_json(&series)?;
        }
        Commands::Top(args) => {
            let (start, end) = resolve_range(&store, args.start, args.end)?;
            let aggregator = TrendAggregator::new(store);
            let ranked = aggregator.top_trends(start, end, args.limit)?;
            print_json(&ranked)?;
        }
        Commands::Stats => {
            print_json(&store.dataset_stats()?)?;
        }
    }
    Ok(())
}

fn run_import(store: &SqliteCorpusStore, args: &ImportArgs) -> Result<()> {
    if args.topics.is_none() && args.papers.is_none() && args.tagged.is_none() {
        bail!("nothing to import: pass at least one of --topics, --papers, --tagged");
    }

    let mut summary = ImportSummary {
        topics: None,
        papers: None,
        tagged: None,
    };
    if let Some(path) = &args.topics {
        summary.topics = Some(import_topics(store, path)?);
    }
    if let Some(path) = &args.papers {
        summary.papers = Some(import_papers(store, path)?);
    }
    if let Some(path) = &args.tagged {
        summary.tagged = Some(import_tagged_papers(store, path)?);
    }
    print_json(&summary)
}

/// Fill missing query bounds from the earliest/latest tagged dates.
fn resolve_range(
    store: &SqliteCorpusStore,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(NaiveDate, NaiveDate)> {
    if let (Some(start), Some(end)) = (start, end) {
        return Ok((start, end));
    }
    let (min, max) = store
        .date_bounds()?
        .context("no tagged papers in the corpus; pass --start and --end explicitly")?;
    Ok((start.unwrap_or(min), end.unwrap_or(max)))
}

fn init_tracing() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
