mod commands;
mod output;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use commands::{EpsilonArgs, ReferenceArgs, RunArgs};

/// Multiobjective ESG portfolio optimizer
#[derive(Parser)]
#[command(
    name = "mo-portfolio",
    version,
    about = "Multiobjective ESG portfolio optimizer",
    long_about = "Builds long-only portfolios over five objectives (expected return, \
                  sustainability, dividend yield, clean energy, P/E) with the \
                  epsilon-constraint or the reference point method."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "text", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize one objective with bounds on the other four
    Epsilon(EpsilonArgs),
    /// Find the portfolio closest to a reference point
    Reference(ReferenceArgs),
    /// Run a solve described by a JSON configuration file
    Run(RunArgs),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Table,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Epsilon(args) => commands::run_epsilon(args),
        Commands::Reference(args) => commands::run_reference(args),
        Commands::Run(args) => commands::run_config(args),
    };

    match result {
        Ok(report) => {
            output::format_output(cli.output, &report);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}
