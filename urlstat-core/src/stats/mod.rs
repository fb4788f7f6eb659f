mod aggregator;
mod error;
mod types;


pub use aggregator::{Aggregate, StatsAggregator};
pub use error::StatsError;
pub use types::{GlobalTotals, UrlStat};
