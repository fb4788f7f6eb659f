use crate::report::ReportError;
use crate::report::percentile::nearest_rank;
use crate::stats::{Aggregate, GlobalTotals, UrlStat};
use serde::Serialize;
use std::cmp::Ordering;

const MICROS_PER_SEC: f64 = 1_000_000.0;

/// One URL's line in the report. Float fields are rounded to 3 decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub url: String,
    pub count: u64,
    pub count_perc: f64,
    pub latency_sum: f64,
    pub latency_perc: f64,
    pub latency_avg: f64,
    pub latency_max: f64,
    pub latency_p50: f64,
    pub latency_p95: f64,
    pub latency_p99: f64,
}

/// Rows ordered by descending `latency_sum`, URL ascending on ties.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Report {
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Ranks URLs by total latency and keeps the `max_rows` slowest.
pub fn build_report(aggregate: Aggregate, max_rows: usize) -> Result<Report, ReportError> {
    let Aggregate { mut urls, totals } = aggregate;

    if totals.total_count == 0 {
        return Err(ReportError::EmptyDataset);
    }

    urls.sort_by(by_latency_sum_desc);
    urls.truncate(max_rows);

    let rows = urls
        .into_iter()
        .map(|stat| report_row(stat, &totals))
        .collect();

    Ok(Report { rows })
}

fn by_latency_sum_desc(a: &UrlStat, b: &UrlStat) -> Ordering {
    b.latency_sum_us
        .cmp(&a.latency_sum_us)
        .then_with(|| a.url.cmp(&b.url))
}

fn report_row(mut stat: UrlStat, totals: &GlobalTotals) -> ReportRow {
    stat.latencies_us.sort_unstable();
    let samples = stat.latencies_us.as_slice();

    let pct = |p: f64| nearest_rank(samples, p).map_or(0.0, seconds);
    let sum = stat.latency_sum_us as f64;

    ReportRow {
        count: stat.count,
        count_perc: round3(percent(stat.count as f64, totals.total_count as f64)),
        latency_sum: round3(seconds(stat.latency_sum_us)),
        latency_perc: round3(percent(sum, totals.total_latency_us as f64)),
        latency_avg: round3(sum / stat.count as f64 / MICROS_PER_SEC),
        latency_max: round3(samples.last().copied().map_or(0.0, seconds)),
        latency_p50: round3(pct(50.0)),
        latency_p95: round3(pct(95.0)),
        latency_p99: round3(pct(99.0)),
        url: stat.url,
    }
}

fn seconds(us: u64) -> f64 {
    us as f64 / MICROS_PER_SEC
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 { 100.0 * part / whole } else { 0.0 }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
