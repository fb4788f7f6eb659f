//! Log Processing Pipeline
//!
//! One invocation processes one log, in a single pass:
//!
//! locate_newest / LogFileRef::from_path
//! LineStream
//! parse_line
//! StatsAggregator
//! build_report
//! ReportWriter
//!
//! Lines are pulled from the stream in batches. With `parse_workers > 1` each
//! batch is parsed on a dedicated rayon pool, every chunk folding into its own
//! aggregator, and the partial aggregators are merged into the run totals.
//! Aggregation is commutative, so chunk order does not matter.
//!
//! A report that already exists for the log's date short-circuits the run
//! before the log is even opened.

mod error;

#[cfg(test)]
mod tests;

pub use error::{EXIT_CONFIG, EXIT_SUCCESS, PipelineError};

use crate::config::AnalyzerConfig;
use crate::locate::{LogFileRef, locate_newest};
use crate::parse::{ParseFailure, ParsedRecord, parse_line};
use crate::report::{ReportWriter, WriteOutcome, build_report};
use crate::stats::{GlobalTotals, StatsAggregator};
use crate::stream::{LineStream, RawLine, StreamError};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::path::{Path, PathBuf};

const BATCH_LINES: usize = 64 * 1024;
const CHUNK_LINES: usize = 4 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Written(RunSummary),
    /// The report for this log's date exists; the log was not read.
    AlreadyPresent { log: LogFileRef, report: PathBuf },
}

impl RunOutcome {
    pub fn report_path(&self) -> &Path {
        match self {
            RunOutcome::Written(summary) => &summary.report,
            RunOutcome::AlreadyPresent { report, .. } => report,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub log: LogFileRef,
    pub report: PathBuf,
    pub totals: GlobalTotals,
    pub rows: usize,
    /// The archive ended in corrupt data; totals cover the lines before it.
    pub truncated: bool,
}

/// Runs the whole pipeline for one log.
///
/// `log_path` bypasses the directory scan.
pub fn run(cfg: &AnalyzerConfig, log_path: Option<&Path>) -> Result<RunOutcome, PipelineError> {
    cfg.validate()?;

    let log = match log_path {
        Some(path) => LogFileRef::from_path(path)?,
        None => locate_newest(&cfg.log_dir, &cfg.log_prefix)?,
    };

    tracing::info!(
        path = %log.path.display(),
        date = %log.date,
        compressed = log.compressed,
        "log selected"
    );

    let writer = ReportWriter::from_config(cfg);
    if writer.exists(log.date) {
        let target = writer.report_path(log.date);
        tracing::info!(report = %target.display(), "report already present, nothing to do");
        return Ok(RunOutcome::AlreadyPresent {
            log,
            report: target,
        });
    }

    let stream = LineStream::open(&log)?;
    let (aggregator, truncated) = aggregate(stream, cfg.parse_workers)?;
    let totals = *aggregator.totals();

    tracing::info!(
        total_lines = totals.total_lines,
        parse_errors = totals.parse_errors,
        urls = aggregator.url_count(),
        truncated,
        "log aggregated"
    );

    let aggregate = aggregator.finish(cfg.error_threshold).inspect_err(|e| {
        tracing::error!(error = %e, "refusing to report on unreliable data");
    })?;

    let report = build_report(aggregate, cfg.report_size)?;
    let rows = report.len();

    match writer.write(&report, log.date)? {
        WriteOutcome::Written(path) => {
            tracing::info!(report = %path.display(), rows, "report written");
            Ok(RunOutcome::Written(RunSummary {
                log,
                report: path,
                totals,
                rows,
                truncated,
            }))
        }
        WriteOutcome::AlreadyPresent(path) => {
            tracing::info!(report = %path.display(), "report appeared concurrently, keeping it");
            Ok(RunOutcome::AlreadyPresent { log, report: path })
        }
    }
}

/// Drains the stream into an aggregator. Returns whether input was cut short
/// by a corrupt archive.
pub fn aggregate(
    mut stream: LineStream,
    workers: usize,
) -> Result<(StatsAggregator, bool), PipelineError> {
    let pool = build_pool(workers)?;
    let mut aggregator = StatsAggregator::new();
    let mut truncated = false;

    loop {
        let batch = read_batch(&mut stream, &mut truncated)?;
        if batch.is_empty() {
            break;
        }

        match &pool {
            Some(pool) => aggregator.merge(pool.install(|| fold_parallel(&batch))),
            None => fold_into(&mut aggregator, &batch),
        }
    }

    Ok((aggregator, truncated))
}

fn build_pool(workers: usize) -> Result<Option<ThreadPool>, PipelineError> {
    if workers <= 1 {
        return Ok(None);
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("urlstat-parse-{i}"))
        .build()?;
    Ok(Some(pool))
}

fn read_batch(stream: &mut LineStream, truncated: &mut bool) -> Result<Vec<RawLine>, StreamError> {
    let mut batch = Vec::new();

    for item in stream.by_ref().take(BATCH_LINES) {
        match item {
            Ok(line) => batch.push(line),
            Err(e @ StreamError::CorruptArchive { .. }) => {
                tracing::warn!(error = %e, "archive is corrupt, continuing with the lines read so far");
                *truncated = true;
                break;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(batch)
}

fn fold_parallel(lines: &[RawLine]) -> StatsAggregator {
    lines
        .par_chunks(CHUNK_LINES)
        .map(|chunk| {
            let mut partial = StatsAggregator::new();
            fold_into(&mut partial, chunk);
            partial
        })
        .reduce(StatsAggregator::new, |mut acc, partial| {
            acc.merge(partial);
            acc
        })
}

fn fold_into(aggregator: &mut StatsAggregator, lines: &[RawLine]) {
    for line in lines {
        aggregator.push(parse_logged(line));
    }
}

fn parse_logged(line: &RawLine) -> Result<ParsedRecord, ParseFailure> {
    parse_line(line).inspect_err(|reason| {
        tracing::debug!(line = line.number, %reason, "skipping unparsable line");
    })
}
