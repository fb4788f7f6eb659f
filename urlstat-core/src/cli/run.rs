use crate::config::{AnalyzerConfig, ConfigOverrides, ReportFormat};
use crate::logging::init_logging;
use crate::pipeline::{self, EXIT_CONFIG, EXIT_SUCCESS, PipelineError, RunOutcome};
use clap::Args;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Path to the urlstat config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Process this log instead of the newest one in the log directory
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// Directory scanned for rotated logs
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Directory receiving reports
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Maximum number of URLs in the report
    #[arg(long)]
    pub report_size: Option<usize>,

    /// Maximum tolerated fraction of unparsable lines (0.0 - 1.0)
    #[arg(long)]
    pub error_threshold: Option<f64>,

    /// Report output format
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,
}

impl RunArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            log_dir: self.log_dir.clone(),
            report_dir: self.report_dir.clone(),
            report_size: self.report_size,
            error_threshold: self.error_threshold,
            report_format: self.format,
        }
    }
}

/// Runs the pipeline and returns the process exit code.
pub fn run(args: RunArgs) -> i32 {
    let cfg = match resolve_config(&args) {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("{} {err}", "✘".red());
            return err.exit_code();
        }
    };

    let _guard = match init_logging(&cfg.logging) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("{} {err}", "✘".red());
            return EXIT_CONFIG;
        }
    };

    match pipeline::run(&cfg, args.log_path.as_deref()) {
        Ok(outcome) => {
            print_outcome(&outcome);
            EXIT_SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, exit_code = err.exit_code(), "run failed");
            eprintln!("{} {err}", "✘".red());
            err.exit_code()
        }
    }
}

pub fn resolve_config(args: &RunArgs) -> Result<AnalyzerConfig, PipelineError> {
    let mut cfg = AnalyzerConfig::load(args.config.as_deref())?;
    cfg.apply(args.overrides());
    cfg.validate()?;
    Ok(cfg)
}

fn print_outcome(outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Written(summary) => {
            println!(
                "{} Report written to {}",
                "✔".green(),
                summary.report.display()
            );
            println!(
                "✔ {} lines from {}, {} unparsable, {} rows",
                summary.totals.total_lines,
                display_name(&summary.log.path),
                summary.totals.parse_errors,
                summary.rows
            );
            if summary.truncated {
                println!(
                    "{} archive was corrupt, report covers the readable part only",
                    "!".yellow()
                );
            }
        }
        RunOutcome::AlreadyPresent { log, report } => {
            println!(
                "{} Report for {} already exists at {}",
                "✔".green(),
                display_name(&log.path),
                report.display()
            );
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
