mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::scenarios::ScenarioArgs;

/// Debt-repayment scenario calculations
#[derive(Parser)]
#[command(
    name = "dsc",
    version,
    about = "Debt-repayment scenario calculations with decimal precision",
    long_about = "Compares debt-repayment strategies for a customer snapshot: the \
                  minimum-payment baseline, an avalanche-optimized plan, and a \
                  consolidation fit against eligible bank offers. Input is a JSON \
                  snapshot of debts, cashflow and offers, from a file or stdin."
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
    /// Compare all three scenarios (minimum, optimized, consolidation)
    Compare(ScenarioArgs),
    /// Minimum-payment baseline only
    Minimum(ScenarioArgs),
    /// Avalanche-optimized scenario only
    Optimized(ScenarioArgs),
    /// Consolidation scenario only
    Consolidation(ScenarioArgs),
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
        Commands::Compare(args) => commands::scenarios::run_compare(args),
        Commands::Minimum(args) => commands::scenarios::run_single(args, "minimum"),
        Commands::Optimized(args) => commands::scenarios::run_single(args, "optimized"),
        Commands::Consolidation(args) => commands::scenarios::run_single(args, "consolidation"),
        Commands::Version => {
            println!("dsc {}", env!("CARGO_PKG_VERSION"));
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
