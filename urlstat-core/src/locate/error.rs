use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("no log named '{prefix}-YYYYMMDD[.gz]' found in {dir}")]
    NotFound { dir: PathBuf, prefix: String },

    #[error("log file {path} does not exist")]
    MissingLog { path: PathBuf },

    #[error("cannot read log directory {dir}: {source}")]
    InaccessibleDirectory {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("log file name {path} does not end with a valid -YYYYMMDD[.gz] date")]
    InvalidLogName { path: PathBuf },
}
