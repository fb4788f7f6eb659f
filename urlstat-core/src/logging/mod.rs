
use crate::config::{ConfigError, LogFormat, LoggingConfig};
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging system according to the `[logging]` config section
///
/// - `RUST_LOG` wins over the configured level when it is set
/// - JSON output flattens event fields, pretty output is meant for terminals
/// - with `file` set, events are written through a non-blocking appender and
///   the returned guard must be kept alive until the process exits
pub fn init_logging(cfg: &LoggingConfig) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => level_filter(&cfg.level)?,
    };

    let Some(path) = cfg.file.as_deref() else {
        install(filter, cfg.format, io::stderr, true);
        return Ok(None);
    };

    let appender = file_appender(path)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    install(filter, cfg.format, writer, false);
    Ok(Some(guard))
}

/// Parses a filter directive such as `info` or `urlstat_core=debug`.
pub fn level_filter(level: &str) -> Result<EnvFilter, ConfigError> {
    EnvFilter::try_new(level).map_err(|e| ConfigError::invalid("logging.level", e.to_string()))
}

/// Opens `path` for appending, creating its directory when missing.
pub fn file_appender(path: &Path) -> Result<RollingFileAppender, ConfigError> {
    let (dir, name) = split_log_path(path).ok_or_else(|| {
        ConfigError::invalid("logging.file", format!("{} has no file name", path.display()))
    })?;

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(name.to_string_lossy())
        .build(dir)
        .map_err(|e| ConfigError::log_file(path, e))
}

fn install<W>(filter: EnvFilter, format: LogFormat, writer: W, ansi: bool)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi);

    match format {
        LogFormat::Json => builder.json().flatten_event(true).init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn split_log_path(path: &Path) -> Option<(&Path, &std::ffi::OsStr)> {
    let name = path.file_name()?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    Some((dir, name))
}
