use crate::config::{AnalyzerConfig, ReportFormat};
use crate::locate::LogFileRef;
use crate::pipeline::{PipelineError, RunOutcome, aggregate, run};
use crate::report::ReportError;
use crate::stats::StatsError;
use crate::stream::LineStream;

use flate2::Compression;
use flate2::write::GzEncoder;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::{TempDir, tempdir};

const PREFIX: &str = "nginx-access-ui.log";

fn access_line(url: &str, request_time: &str) -> String {
    format!(
        r#"1.196.116.32 -  - [29/Jun/2017:03:50:22 +0300] "GET {url} HTTP/1.1" 200 927 "-" "Lynx/2.8.8dev.9" "-" "1498697422-2190034393-4708-9752759" "dc7161be3" {request_time}"#
    )
}

fn config(root: &Path) -> AnalyzerConfig {
    AnalyzerConfig {
        log_dir: root.join("log"),
        report_dir: root.join("reports"),
        report_format: ReportFormat::Json,
        ..AnalyzerConfig::default()
    }
}

fn write_log(root: &Path, name: &str, lines: &[String]) {
    let dir = root.join("log");
    fs::create_dir_all(&dir).unwrap();
    let mut text = lines.join("\n");
    text.push('\n');

    if name.ends_with(".gz") {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(text.as_bytes()).unwrap();
        fs::write(dir.join(name), encoder.finish().unwrap()).unwrap();
    } else {
        fs::write(dir.join(name), text).unwrap();
    }
}

fn report_rows(outcome: &RunOutcome) -> Vec<Value> {
    let bytes = fs::read(outcome.report_path()).unwrap();
    serde_json::from_slice::<Value>(&bytes)
        .unwrap()
        .as_array()
        .unwrap()
        .clone()
}

fn setup() -> TempDir {
    tempdir().unwrap()
}

#[test]
fn two_line_log_produces_one_row() {
    // Arrange
    let dir = setup();
    write_log(
        dir.path(),
        "nginx-access-ui.log-20170630",
        &[access_line("/a", "0.5"), access_line("/a", "0.3")],
    );

    // Act
    let outcome = run(&config(dir.path()), None).unwrap();

    // Assert
    let RunOutcome::Written(summary) = &outcome else {
        panic!("expected a written report, got {outcome:?}");
    };
    assert_eq!(
        summary.report,
        dir.path().join("reports/report-2017.06.30.json")
    );
    assert_eq!(summary.rows, 1);
    assert!(!summary.truncated);

    let rows = report_rows(&outcome);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["url"], "/a");
    assert_eq!(rows[0]["count"], 2);
    assert_eq!(rows[0]["latency_sum"], 0.8);
    assert_eq!(rows[0]["latency_avg"], 0.4);
    assert_eq!(rows[0]["latency_max"], 0.5);
}

#[test]
fn newest_compressed_log_is_processed() {
    // Arrange
    let dir = setup();
    write_log(
        dir.path(),
        "nginx-access-ui.log-20170629",
        &[access_line("/old", "1.0")],
    );
    write_log(
        dir.path(),
        "nginx-access-ui.log-20170630.gz",
        &[access_line("/new", "0.1"), access_line("/new", "-")],
    );

    // Act
    let outcome = run(&config(dir.path()), None).unwrap();

    // Assert
    let rows = report_rows(&outcome);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["url"], "/new");
    assert_eq!(rows[0]["count"], 2);
    assert_eq!(rows[0]["latency_sum"], 0.1);
}

#[test]
fn rerun_does_not_reprocess() {
    // Arrange
    let dir = setup();
    let cfg = config(dir.path());
    write_log(dir.path(), "nginx-access-ui.log-20170630", &[access_line("/a", "0.5")]);
    let first = run(&cfg, None).unwrap();
    let before = fs::read(first.report_path()).unwrap();

    // The log changes, but the date's report is already there.
    write_log(dir.path(), "nginx-access-ui.log-20170630", &[access_line("/b", "9.0")]);

    // Act
    let second = run(&cfg, None).unwrap();

    // Assert
    assert!(matches!(second, RunOutcome::AlreadyPresent { .. }));
    assert_eq!(second.report_path(), first.report_path());
    assert_eq!(fs::read(second.report_path()).unwrap(), before);
}

#[test]
fn explicit_log_path_bypasses_the_scan() {
    // Arrange
    let dir = setup();
    write_log(dir.path(), "nginx-access-ui.log-20170630", &[access_line("/dir", "0.5")]);
    let custom = dir.path().join("elsewhere-20160101");
    fs::write(&custom, format!("{}\n", access_line("/custom", "0.2"))).unwrap();

    // Act
    let outcome = run(&config(dir.path()), Some(&custom)).unwrap();

    // Assert
    assert_eq!(
        outcome.report_path(),
        dir.path().join("reports/report-2016.01.01.json")
    );
    assert_eq!(report_rows(&outcome)[0]["url"], "/custom");
}

#[test]
fn report_is_limited_to_report_size() {
    // Arrange
    let dir = setup();
    let lines: Vec<String> = (1..=5)
        .map(|i| access_line(&format!("/u{i}"), &format!("{i}.0")))
        .collect();
    write_log(dir.path(), "nginx-access-ui.log-20170630", &lines);
    let cfg = AnalyzerConfig {
        report_size: 2,
        ..config(dir.path())
    };

    // Act
    let outcome = run(&cfg, None).unwrap();

    // Assert
    let urls: Vec<String> = report_rows(&outcome)
        .iter()
        .map(|r| r["url"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(urls, vec!["/u5", "/u4"]);
}

#[test]
fn thirty_percent_garbage_fails_the_run() {
    // Arrange
    let dir = setup();
    let mut lines: Vec<String> = (0..7).map(|_| access_line("/a", "0.1")).collect();
    lines.extend((0..3).map(|i| format!("garbage {i}")));
    write_log(dir.path(), "nginx-access-ui.log-20170630", &lines);

    // Act
    let err = run(&config(dir.path()), None).unwrap_err();

    // Assert
    match err {
        PipelineError::Stats(StatsError::UnacceptableParseErrorRate { totals, .. }) => {
            assert_eq!(totals.parse_errors, 3);
            assert_eq!(totals.total_lines, 10);
        }
        other => panic!("expected parse error rate failure, got {other:?}"),
    }
    assert!(!dir.path().join("reports/report-2017.06.30.json").exists());
}

#[test]
fn twenty_percent_garbage_is_tolerated() {
    // Arrange
    let dir = setup();
    let mut lines: Vec<String> = (0..8).map(|_| access_line("/a", "0.1")).collect();
    lines.extend((0..2).map(|i| format!("garbage {i}")));
    write_log(dir.path(), "nginx-access-ui.log-20170630", &lines);

    // Act
    let outcome = run(&config(dir.path()), None).unwrap();

    // Assert
    let RunOutcome::Written(summary) = &outcome else {
        panic!("expected a written report, got {outcome:?}");
    };
    assert_eq!(summary.totals.parse_errors, 2);
    assert_eq!(summary.totals.total_lines, 10);
    assert_eq!(report_rows(&outcome)[0]["count"], 8);
}

#[test]
fn only_garbage_is_an_empty_dataset() {
    // Arrange
    let dir = setup();
    write_log(dir.path(), "nginx-access-ui.log-20170630", &["garbage".to_string()]);
    let cfg = AnalyzerConfig {
        error_threshold: 1.0,
        ..config(dir.path())
    };

    // Act
    let err = run(&cfg, None).unwrap_err();

    // Assert
    assert!(matches!(err, PipelineError::Report(ReportError::EmptyDataset)));
}

#[test]
fn corrupt_archive_tail_still_reports_what_was_read() {
    // Arrange
    let dir = setup();
    let log_dir = dir.path().join("log");
    fs::create_dir_all(&log_dir).unwrap();
    let text: String = (0..20_000)
        .map(|i| format!("{}\n", access_line(&format!("/item/{}", i % 50), "0.010")))
        .collect();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    let compressed = encoder.finish().unwrap();
    fs::write(
        log_dir.join("nginx-access-ui.log-20170630.gz"),
        &compressed[..compressed.len() * 3 / 4],
    )
    .unwrap();

    // Act
    let outcome = run(&config(dir.path()), None).unwrap();

    // Assert
    let RunOutcome::Written(summary) = outcome else {
        panic!("expected a written report");
    };
    assert!(summary.truncated);
    assert!(summary.totals.total_lines > 0);
    assert!(summary.totals.total_lines < 20_000);
    assert_eq!(summary.totals.parse_errors, 0);
}

#[test]
fn parallel_workers_match_sequential_totals() {
    // Arrange
    let dir = setup();
    let lines: Vec<String> = (0..10_000)
        .map(|i| match i % 10 {
            0 => "broken line".to_string(),
            1 => access_line("/unknown", "-"),
            n => access_line(&format!("/p{n}"), "0.250"),
        })
        .collect();
    write_log(dir.path(), "nginx-access-ui.log-20170630", &lines);
    let log = LogFileRef::from_path(dir.path().join("log/nginx-access-ui.log-20170630")).unwrap();

    // Act
    let (sequential, _) = aggregate(LineStream::open(&log).unwrap(), 1).unwrap();
    let (parallel, _) = aggregate(LineStream::open(&log).unwrap(), 4).unwrap();

    // Assert
    assert_eq!(parallel.totals().total_lines, sequential.totals().total_lines);
    assert_eq!(parallel.totals().parse_errors, 1_000);
    assert_eq!(parallel.totals().total_count, sequential.totals().total_count);
    assert_eq!(parallel.url_count(), sequential.url_count());
    for n in 2..10 {
        let url = format!("/p{n}");
        assert_eq!(parallel.url(&url).unwrap().count, 1_000);
        assert_eq!(
            parallel.url(&url).unwrap().latencies_us.len(),
            sequential.url(&url).unwrap().latencies_us.len()
        );
    }
    assert_eq!(parallel.url("/unknown").unwrap().latency_sum_us, 0);
    assert_eq!(parallel.totals(), sequential.totals());
}

#[test]
fn missing_log_directory_is_inaccessible() {
    let dir = setup();

    let err = run(&config(dir.path()), None).unwrap_err();

    assert_eq!(err.exit_code(), 3);
}

#[test]
fn invalid_config_is_rejected_before_any_io() {
    let dir = setup();
    let cfg = AnalyzerConfig {
        report_size: 0,
        ..config(dir.path())
    };

    let err = run(&cfg, None).unwrap_err();

    assert!(matches!(err, PipelineError::Config(_)));
}
