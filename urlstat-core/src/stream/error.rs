use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("failed to open log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Decompression failed part way. Lines yielded before it remain valid.
    #[error("archive {path} is corrupt after {lines_read} lines: {source}")]
    CorruptArchive {
        path: PathBuf,
        lines_read: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read log {path} after {lines_read} lines: {source}")]
    Read {
        path: PathBuf,
        lines_read: u64,
        #[source]
        source: std::io::Error,
    },
}
