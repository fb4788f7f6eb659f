use crate::config::AnalyzerConfig;
use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Path to config file
        #[arg(default_value = "urlstat.toml")]
        path: PathBuf,
    },

    /// Print resolved configuration
    Dump {
        /// Path to config file
        #[arg(default_value = "urlstat.toml")]
        path: PathBuf,

        /// Output as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },
}

pub fn run_config(cmd: ConfigCmd) -> Result<()> {
    match cmd {
        ConfigCmd::Check { path } => check(path),
        ConfigCmd::Dump { path, json } => dump(path, json),
    }
}

pub fn check(path: PathBuf) -> Result<()> {
    let cfg = load(&path)?;

    println!("✔ Config loaded successfully");
    println!("✔ logs: {}/{}-YYYYMMDD[.gz]", cfg.log_dir.display(), cfg.log_prefix);
    println!(
        "✔ reports: {} ({} rows max, {:?})",
        cfg.report_dir.display(),
        cfg.report_size,
        cfg.report_format
    );
    println!(
        "✔ parse error threshold: {:.1}%",
        cfg.error_threshold * 100.0
    );

    Ok(())
}

pub fn dump(path: PathBuf, json: bool) -> Result<()> {
    let cfg = load(&path)?;

    let text = if json {
        serde_json::to_string_pretty(&cfg)?
    } else {
        toml::to_string_pretty(&cfg)?
    };
    println!("{text}");

    Ok(())
}

fn load(path: &Path) -> Result<AnalyzerConfig> {
    let cfg = AnalyzerConfig::from_file(path)?;
    cfg.validate()
        .with_context(|| format!("{} failed validation", path.display()))?;
    Ok(cfg)
}
