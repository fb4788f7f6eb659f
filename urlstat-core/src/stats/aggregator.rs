use crate::parse::{ParseFailure, ParsedRecord};
use crate::stats::{GlobalTotals, StatsError, UrlStat};
use ahash::RandomState;
use std::collections::HashMap;

/// Folds parse results into per-URL statistics and global totals.
///
/// Accumulation is commutative: aggregators built over disjoint slices of a
/// log can be [`merge`](StatsAggregator::merge)d in any order.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    urls: HashMap<String, UrlStat, RandomState>,
    totals: GlobalTotals,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: Result<ParsedRecord, ParseFailure>) {
        self.totals.total_lines += 1;

        let record = match item {
            Ok(record) => record,
            Err(_) => {
                self.totals.parse_errors += 1;
                return;
            }
        };

        self.totals.total_count += 1;

        let stat = self
            .urls
            .entry(record.url)
            .or_insert_with_key(|url| UrlStat::new(url.as_str()));
        stat.count += 1;

        if let Some(us) = record.latency.micros() {
            stat.latency_sum_us += us;
            stat.latencies_us.push(us);
            self.totals.total_latency_us += us;
        }
    }

    pub fn merge(&mut self, other: StatsAggregator) {
        self.totals.absorb(other.totals);

        for (url, stat) in other.urls {
            match self.urls.get_mut(&url) {
                Some(existing) => existing.absorb(stat),
                None => {
                    self.urls.insert(url, stat);
                }
            }
        }
    }

    pub fn totals(&self) -> &GlobalTotals {
        &self.totals
    }

    pub fn url(&self, url: &str) -> Option<&UrlStat> {
        self.urls.get(url)
    }

    pub fn url_count(&self) -> usize {
        self.urls.len()
    }

    /// Closes the run, refusing data whose parse error rate exceeds `threshold`.
    pub fn finish(self, threshold: f64) -> Result<Aggregate, StatsError> {
        if self.totals.error_rate() > threshold {
            return Err(StatsError::UnacceptableParseErrorRate {
                totals: self.totals,
                threshold,
            });
        }

        Ok(Aggregate {
            urls: self.urls.into_values().collect(),
            totals: self.totals,
        })
    }
}

/// Completed statistics of one run, in no particular URL order.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub urls: Vec<UrlStat>,
    pub totals: GlobalTotals,
}
