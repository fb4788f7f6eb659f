use crate::config::ConfigError;
use crate::locate::LocateError;
use crate::report::{ReportError, WriteError};
use crate::stats::StatsError;
use crate::stream::StreamError;
use thiserror::Error;

/// Exit code of a successful run, including "report already present".
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_CONFIG: i32 = 8;

/// Every way a run can fail. Per-line parse failures and corrupt archive
/// tails are recovered inside the pipeline and never show up here.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Locate(#[from] LocateError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("failed to start parse workers: {0}")]
    Workers(#[from] rayon::ThreadPoolBuildError),
}

impl PipelineError {
    /// Distinct, stable process exit code per failure class.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::Locate(LocateError::NotFound { .. })
            | PipelineError::Locate(LocateError::MissingLog { .. }) => 2,
            PipelineError::Locate(LocateError::InaccessibleDirectory { .. }) => 3,
            PipelineError::Stats(StatsError::UnacceptableParseErrorRate { .. }) => 4,
            PipelineError::Report(ReportError::EmptyDataset) => 5,
            PipelineError::Write(WriteError::OutputDirectoryUnwritable { .. }) => 6,
            PipelineError::Write(_) => 7,
            PipelineError::Config(_) | PipelineError::Workers(_) => EXIT_CONFIG,
            PipelineError::Locate(LocateError::InvalidLogName { .. })
            | PipelineError::Stream(_) => 9,
        }
    }
}
