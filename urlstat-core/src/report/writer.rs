use crate::config::{AnalyzerConfig, ReportFormat};
use crate::report::template::{load_template, render};
use crate::report::{Report, WriteError};
use chrono::NaiveDate;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// A report for the date was already there; nothing was touched.
    AlreadyPresent(PathBuf),
}

impl WriteOutcome {
    pub fn path(&self) -> &Path {
        match self {
            WriteOutcome::Written(path) | WriteOutcome::AlreadyPresent(path) => path,
        }
    }
}

/// Writes one report per log date into the report directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    report_dir: PathBuf,
    format: ReportFormat,
    template: Option<PathBuf>,
}

impl ReportWriter {
    pub fn new(report_dir: impl Into<PathBuf>, format: ReportFormat) -> Self {
        Self {
            report_dir: report_dir.into(),
            format,
            template: None,
        }
    }

    pub fn from_config(cfg: &AnalyzerConfig) -> Self {
        Self::new(&cfg.report_dir, cfg.report_format).with_template(cfg.report_template.clone())
    }

    pub fn with_template(mut self, template: Option<PathBuf>) -> Self {
        self.template = template;
        self
    }

    /// `report-YYYY.MM.DD.<ext>` inside the report directory.
    pub fn report_path(&self, date: NaiveDate) -> PathBuf {
        self.report_dir.join(format!(
            "report-{}.{}",
            date.format("%Y.%m.%d"),
            self.format.extension()
        ))
    }

    pub fn exists(&self, date: NaiveDate) -> bool {
        self.report_path(date).exists()
    }

    /// Serializes the report into the payload stored on disk.
    pub fn render(&self, report: &Report) -> Result<Vec<u8>, WriteError> {
        match self.format {
            ReportFormat::Json => {
                let mut payload = serde_json::to_vec_pretty(report)?;
                payload.push(b'\n');
                Ok(payload)
            }
            ReportFormat::Html => {
                let template = load_template(self.template.as_deref())?;
                let table = serde_json::to_string(report)?;
                Ok(render(&template, &table).into_bytes())
            }
        }
    }

    /// Writes `report` for `date` unless one already exists.
    ///
    /// The payload goes to a temporary file in the report directory first and
    /// is then linked into place without clobbering, so the canonical path
    /// either holds a complete report or nothing.
    pub fn write(&self, report: &Report, date: NaiveDate) -> Result<WriteOutcome, WriteError> {
        let target = self.report_path(date);
        if target.exists() {
            return Ok(WriteOutcome::AlreadyPresent(target));
        }

        let payload = self.render(report)?;

        fs::create_dir_all(&self.report_dir).map_err(|e| self.unwritable(e))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".report-")
            .suffix(".tmp")
            .tempfile_in(&self.report_dir)
            .map_err(|e| self.unwritable(e))?;

        tmp.write_all(&payload).map_err(|e| self.unwritable(e))?;
        tmp.as_file().sync_all().map_err(|e| self.unwritable(e))?;

        match tmp.persist_noclobber(&target) {
            Ok(_) => Ok(WriteOutcome::Written(target)),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                Ok(WriteOutcome::AlreadyPresent(target))
            }
            Err(e) => Err(self.unwritable(e.error)),
        }
    }

    fn unwritable(&self, source: io::Error) -> WriteError {
        WriteError::OutputDirectoryUnwritable {
            dir: self.report_dir.clone(),
            source,
        }
    }
}
