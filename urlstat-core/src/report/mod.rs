//! Report construction and persistence.

mod builder;
mod error;
mod percentile;
mod template;
mod writer;


pub use builder::{Report, ReportRow, build_report};
pub use error::{ReportError, WriteError};
pub use percentile::nearest_rank;
pub use template::{TABLE_PLACEHOLDER, load_template, render};
pub use writer::{ReportWriter, WriteOutcome};
