mod error;


pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file picked up by `urlstat run` when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "urlstat.toml";

/// Everything one pipeline run needs, resolved once at process start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Directory scanned for rotated access logs.
    pub log_dir: PathBuf,

    /// Directory receiving one report per processed date.
    pub report_dir: PathBuf,

    /// Maximum number of rows kept in a report.
    pub report_size: usize,

    /// File name prefix of rotated logs, e.g. "nginx-access-ui.log".
    pub log_prefix: String,

    /// Maximum tolerated fraction (0.0..=1.0) of unparsable lines.
    pub error_threshold: f64,

    pub report_format: ReportFormat,

    /// Custom template for rendered reports. The embedded one is used when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_template: Option<PathBuf>,

    /// Number of threads parsing line batches. 1 keeps the run sequential.
    pub parse_workers: usize,

    pub logging: LoggingConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./log"),
            report_dir: PathBuf::from("./reports"),
            report_size: 1000,
            log_prefix: "nginx-access-ui.log".to_string(),
            error_threshold: 0.25,
            report_format: ReportFormat::Html,
            report_template: None,
            parse_workers: 1,
            logging: LoggingConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Template with the report table embedded as JSON
    Html,
    /// Bare JSON array of report rows
    Json,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: LogFormat,

    /// Default filter directive, used when RUST_LOG is not set.
    pub level: String,

    /// Write logs to this file instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Command-line values layered on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub log_dir: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
    pub report_size: Option<usize>,
    pub error_threshold: Option<f64>,
    pub report_format: Option<ReportFormat>,
}

impl AnalyzerConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        toml::from_str(&raw).map_err(|e| ConfigError::parse(path, e))
    }

    /// Loads `path` when given, otherwise [`DEFAULT_CONFIG_FILE`] if it exists,
    /// otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(dir) = overrides.log_dir {
            self.log_dir = dir;
        }
        if let Some(dir) = overrides.report_dir {
            self.report_dir = dir;
        }
        if let Some(size) = overrides.report_size {
            self.report_size = size;
        }
        if let Some(threshold) = overrides.error_threshold {
            self.error_threshold = threshold;
        }
        if let Some(format) = overrides.report_format {
            self.report_format = format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report_size == 0 {
            return Err(ConfigError::invalid("report_size", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.error_threshold) {
            return Err(ConfigError::invalid(
                "error_threshold",
                format!("{} is outside 0.0..=1.0", self.error_threshold),
            ));
        }
        if self.parse_workers == 0 {
            return Err(ConfigError::invalid("parse_workers", "must be at least 1"));
        }
        if self.log_prefix.trim().is_empty() {
            return Err(ConfigError::invalid("log_prefix", "must not be empty"));
        }
        crate::logging::level_filter(&self.logging.level)?;
        Ok(())
    }
}
