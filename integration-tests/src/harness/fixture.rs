use flate2::Compression;
use flate2::write::GzEncoder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use urlstat_core::config::{AnalyzerConfig, ReportFormat};

pub const PREFIX: &str = "nginx-access-ui.log";

/// A `ui_short` access log line for `url` with the given `$request_time`.
pub fn access_line(url: &str, request_time: &str) -> String {
    format!(
        r#"1.169.137.128 -  - [29/Jun/2017:03:50:23 +0300] "GET {url} HTTP/1.1" 200 1002 "-" "Configovod" "-" "1498697423-2118016444-4708-9752777" "712e90144abee9" {request_time}"#
    )
}

/// Temporary `log/` + `reports/` layout with a config pointing at it.
pub struct LogFixture {
    dir: TempDir,
}

impl LogFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        fs::create_dir_all(dir.path().join("log")).expect("failed to create log dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root().join("log")
    }

    pub fn report_dir(&self) -> PathBuf {
        self.root().join("reports")
    }

    pub fn config(&self, format: ReportFormat) -> AnalyzerConfig {
        AnalyzerConfig {
            log_dir: self.log_dir(),
            report_dir: self.report_dir(),
            report_format: format,
            ..AnalyzerConfig::default()
        }
    }

    /// Writes `lines` as `<prefix>-<date>`, gzip-compressed when `gzip` is set.
    pub fn write_log(&self, date: &str, lines: &[String], gzip: bool) -> PathBuf {
        let mut text = lines.join("\n");
        text.push('\n');

        if gzip {
            let path = self.log_dir().join(format!("{PREFIX}-{date}.gz"));
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(text.as_bytes()).expect("gzip write");
            fs::write(&path, encoder.finish().expect("gzip finish")).expect("write log");
            path
        } else {
            let path = self.log_dir().join(format!("{PREFIX}-{date}"));
            fs::write(&path, text).expect("write log");
            path
        }
    }

    pub fn report_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.report_dir()) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = entries.filter_map(Result::ok).map(|e| e.path()).collect();
        files.sort();
        files
    }
}

impl Default for LogFixture {
    fn default() -> Self {
        Self::new()
    }
}
