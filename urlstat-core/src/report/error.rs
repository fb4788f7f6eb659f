use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("no request could be parsed, nothing to report")]
    EmptyDataset,
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot write report into {dir}: {source}")]
    OutputDirectoryUnwritable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("failed to read report template {path}: {source}")]
    TemplateUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("embedded report template '{name}' is missing or not UTF-8")]
    TemplateUnavailable { name: &'static str },

    #[error("report template {origin} has no {placeholder} placeholder")]
    TemplatePlaceholderMissing {
        origin: String,
        placeholder: &'static str,
    },
}
