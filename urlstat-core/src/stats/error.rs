use crate::stats::GlobalTotals;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error(
        "{} of {} lines failed to parse ({:.1}%), above the {:.1}% threshold",
        totals.parse_errors,
        totals.total_lines,
        totals.error_rate() * 100.0,
        threshold * 100.0
    )]
    UnacceptableParseErrorRate { totals: GlobalTotals, threshold: f64 },
}
