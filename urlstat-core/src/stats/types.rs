use serde::Serialize;

/// Running statistics for one URL.
///
/// Latencies are kept in whole microseconds so that sums are exact and do not
/// depend on the order lines were folded in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlStat {
    pub url: String,
    pub count: u64,
    pub latency_sum_us: u64,
    /// Known latencies in arrival order. Sorted only when a report is built.
    pub latencies_us: Vec<u64>,
}

impl UrlStat {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            count: 0,
            latency_sum_us: 0,
            latencies_us: Vec::new(),
        }
    }

    pub(crate) fn absorb(&mut self, other: UrlStat) {
        self.count += other.count;
        self.latency_sum_us += other.latency_sum_us;
        self.latencies_us.extend(other.latencies_us);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GlobalTotals {
    /// Successfully parsed lines.
    pub total_count: u64,
    pub total_latency_us: u64,
    pub parse_errors: u64,
    /// Every line seen, parsed or not.
    pub total_lines: u64,
}

impl GlobalTotals {
    /// Fraction of lines that failed to parse, 0.0 for an empty input.
    pub fn error_rate(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            self.parse_errors as f64 / self.total_lines as f64
        }
    }

    pub(crate) fn absorb(&mut self, other: GlobalTotals) {
        self.total_count += other.total_count;
        self.total_latency_us += other.total_latency_us;
        self.parse_errors += other.parse_errors;
        self.total_lines += other.total_lines;
    }
}
