use thiserror::Error;

/// Request latency as logged in `$request_time`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Latency {
    Seconds(f64),
    /// Logged as `-`. Counted, but kept out of latency aggregates.
    Unknown,
}

impl Latency {
    pub fn seconds(self) -> Option<f64> {
        match self {
            Latency::Seconds(s) => Some(s),
            Latency::Unknown => None,
        }
    }

    /// Whole microseconds, the unit latencies are aggregated in.
    pub fn micros(self) -> Option<u64> {
        self.seconds().map(|s| (s * 1_000_000.0).round() as u64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub url: String,
    pub latency: Latency,
}

/// Why a line was not turned into a [`ParsedRecord`].
///
/// Failures are counted by the aggregator; they never stop the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("line is not valid UTF-8")]
    Encoding,

    #[error("line does not match the access log format")]
    Malformed,

    #[error("request time is neither a non-negative number nor '-'")]
    InvalidLatency,
}
