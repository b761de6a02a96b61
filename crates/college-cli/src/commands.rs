use std::fs::File;
use std::io::{self, BufWriter, IsTerminal};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, info_span, trace, warn};

use college_cli::batch::{read_batch, write_batch};
use college_cli::logging::redact_value;
use college_match::{MatcherConfig, MatchingEngine};
use college_model::MatchResult;
use college_registry::{LoadOutcome, read_aliases, read_registry};
use college_report::{MatchSummary, UnmatchedEntry, UnmatchedTally};

use crate::cli::{BatchArgs, RegistryArgs, ResolveArgs, SourceArgs};

/// Rows resolved between progress updates.
const PROGRESS_CHUNK: usize = 512;

/// Result of a `batch` run, printed by `main`.
#[derive(Debug)]
pub struct BatchResult {
    pub output: PathBuf,
    pub summary_json: Option<PathBuf>,
    pub summary: MatchSummary,
    pub top_unmatched: Vec<UnmatchedEntry>,
}

/// JSON document written by `--summary-json`.
#[derive(Debug, Serialize)]
struct BatchReport<'a> {
    generated_at: DateTime<Utc>,
    input: &'a Path,
    output: &'a Path,
    registry: &'a Path,
    registry_records: usize,
    summary: &'a MatchSummary,
    top_unmatched: &'a [UnmatchedEntry],
}

pub fn run_batch(args: &BatchArgs, config: MatcherConfig) -> Result<BatchResult> {
    let span = info_span!("batch", input = %args.input.display());
    let _guard = span.enter();
    let started = Instant::now();

    let engine = build_engine(&args.source, config)?;
    let input = read_batch(&args.input, &args.name_column, &args.state_column)
        .with_context(|| format!("read counselling file {}", args.input.display()))?;
    info!(rows = input.len(), "loaded counselling rows");

    let queries = input.queries();
    let progress = progress_bar(queries.len() as u64)?;
    let mut results: Vec<MatchResult> = Vec::with_capacity(queries.len());
    for chunk in queries.chunks(PROGRESS_CHUNK) {
        results.extend(engine.resolve_all(chunk));
        progress.inc(chunk.len() as u64);
    }
    progress.finish_and_clear();

    let mut tally = UnmatchedTally::new();
    for (query, result) in queries.iter().zip(&results) {
        if !result.is_matched() {
            trace!(
                college_name = redact_value(&query.name),
                state = redact_value(&query.state),
                "unmatched row"
            );
        }
        tally.observe(result, &query.state);
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("matched.csv"));
    write_batch(&output, &input, &results)
        .with_context(|| format!("write matched file {}", output.display()))?;

    let summary = MatchSummary::from_stats(&engine.stats());
    let top_unmatched = tally.top_n(args.top_unmatched);
    if let Some(path) = &args.summary_json {
        let report = BatchReport {
            generated_at: Utc::now(),
            input: &args.input,
            output: &output,
            registry: &args.source.registry,
            registry_records: engine.index().len(),
            summary: &summary,
            top_unmatched: &top_unmatched,
        };
        write_json(path, &report)?;
    }

    info!(
        rows = input.len(),
        matched = summary.matched,
        unmatched = summary.unmatched,
        distinct_unmatched = tally.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "batch complete"
    );
    Ok(BatchResult {
        output,
        summary_json: args.summary_json.clone(),
        summary,
        top_unmatched,
    })
}

pub fn run_resolve(args: &ResolveArgs, config: MatcherConfig) -> Result<MatchResult> {
    let engine = build_engine(&args.source, config)?;
    Ok(engine.resolve(&args.name, &args.state))
}

pub fn run_registry(args: &RegistryArgs) -> Result<LoadOutcome> {
    read_registry(&args.path).with_context(|| format!("load registry {}", args.path.display()))
}

fn build_engine(source: &SourceArgs, config: MatcherConfig) -> Result<MatchingEngine> {
    let outcome = read_registry(&source.registry)
        .with_context(|| format!("load registry {}", source.registry.display()))?;
    if !outcome.skipped.is_empty() {
        warn!(
            skipped = outcome.skipped.len(),
            "some registry rows were skipped; run `registry --show-skipped` for details"
        );
    }
    let mut engine = MatchingEngine::new(outcome.records, config).context("build matcher")?;
    if let Some(path) = &source.aliases {
        let aliases =
            read_aliases(path).with_context(|| format!("load aliases {}", path.display()))?;
        info!(aliases = aliases.len(), "loaded alias table");
        engine = engine.with_aliases(aliases);
    }
    Ok(engine)
}

fn progress_bar(len: u64) -> Result<ProgressBar> {
    if !io::stderr().is_terminal() {
        return Ok(ProgressBar::hidden());
    }
    let progress = ProgressBar::new(len);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
        )
        .context("progress bar template")?
        .progress_chars("#>-"),
    );
    progress.set_message("matching");
    Ok(progress)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
