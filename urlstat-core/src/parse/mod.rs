//! Access log line parsing.
//!
//! Lines follow the `ui_short` nginx format:
//!
//! ```text
//! $remote_addr $remote_user $http_x_real_ip [$time_local] "$request"
//! $status $body_bytes_sent "$http_referer" "$http_user_agent"
//! "$http_x_forwarded_for" "$http_X_REQUEST_ID" "$http_X_RB_USER"
//! $request_time
//! ```
//!
//! Only the URL of the request clause and the trailing request time are kept.

mod record;

#[cfg(test)]
mod tests;

pub use record::{Latency, ParseFailure, ParsedRecord};

use crate::stream::RawLine;
use once_cell::sync::Lazy;
use regex::Regex;

/// Placeholder nginx writes for missing values.
const UNKNOWN_VALUE: &str = "-";

static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let quoted = r#""(?:[^"\\]|\\.)*""#;
    let pattern = format!(
        concat!(
            r"^\S+\s+\S+\s+\S+\s+\[[^\]]*\]\s+",
            r#""\S+ (?P<url>\S+) \S+"\s+"#,
            r"\d{{3}}\s+\S+",
            r"\s+{q}\s+{q}\s+{q}\s+{q}\s+{q}",
            r"\s+(?P<request_time>\S+)\s*$",
        ),
        q = quoted
    );
    Regex::new(&pattern).expect("access log pattern is valid")
});

pub fn parse_line(line: &RawLine) -> Result<ParsedRecord, ParseFailure> {
    let text = std::str::from_utf8(&line.bytes).map_err(|_| ParseFailure::Encoding)?;
    parse_str(text)
}

pub fn parse_str(line: &str) -> Result<ParsedRecord, ParseFailure> {
    let caps = LINE_PATTERN.captures(line).ok_or(ParseFailure::Malformed)?;

    let url = caps["url"].to_string();
    let latency = parse_latency(&caps["request_time"])?;

    Ok(ParsedRecord { url, latency })
}

fn parse_latency(raw: &str) -> Result<Latency, ParseFailure> {
    if raw == UNKNOWN_VALUE {
        return Ok(Latency::Unknown);
    }

    match raw.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(Latency::Seconds(secs)),
        _ => Err(ParseFailure::InvalidLatency),
    }
}
