use clap::{Parser, Subcommand};
use urlstat_core::cli::{self, ConfigCmd, RunArgs};
use urlstat_core::pipeline::EXIT_CONFIG;

#[derive(Parser, Debug)]
#[command(
    name = "urlstat",
    version,
    about = "urlstat: slowest URLs report from rotated nginx access logs"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze the newest log and write its report (default)
    Run(RunArgs),

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Run(args)) => std::process::exit(cli::run(args)),

        Some(Command::Config { cmd }) => {
            if let Err(e) = cli::run_config(cmd) {
                eprintln!("config error: {e:#}");
                std::process::exit(EXIT_CONFIG);
            }
        }

        None => std::process::exit(cli::run(RunArgs::default())),
    }
}
