mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::fees::FeesArgs;
use commands::grace::GraceArgs;
use commands::schedule::ScheduleArgs;

/// Loan repayment schedule projections
#[derive(Parser)]
#[command(
    name = "loansched",
    version,
    about = "Loan repayment schedule projections",
    long_about = "Projects repayment schedules for small-business loans with decimal \
                  precision. Supports amortizing, bullet and revenue-sharing facilities, \
                  grace periods, custom facility fees and active-version overrides."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Project the full repayment schedule and summary
    Schedule(ScheduleArgs),
    /// Price the facility fee from custom fees
    Fees(FeesArgs),
    /// Show how a grace period value is interpreted
    Grace(GraceArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Fees(args) => commands::fees::run_fees(args),
        Commands::Grace(args) => commands::grace::run_grace(args),
        Commands::Version => {
            println!("loansched {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
