//! QFSM Command-Line Interface
//!
//! Builds, runs and verifies reversible circuits that decide whether two bit
//! strings share a common substring of a given length.
//!
//! ```text
//! qfsm build  1100 1110 -d 2 --output circuit.json
//! qfsm run    1100 1110 -d 2 --mode fixed --shots 64
//! qfsm verify 10110100 10010110 -d 2 --sweep
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod report;

use commands::common::ProblemArgs;
use commands::{backends, build, run, verify, version};
use config::Config;

/// QFSM - reversible circuits for fixed-length substring matching
#[derive(Parser, Debug)]
#[command(name = "qfsm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to ~/.qfsm/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the matching circuit and print its statistics
    Build {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Write the circuit as JSON
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Build the circuit, run it on a backend and decode the outcome
    Run {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Number of shots
        #[arg(long)]
        shots: Option<u32>,

        /// Backend to use
        #[arg(short, long)]
        backend: Option<String>,
    },

    /// Compare circuit outcomes with a classical scan
    Verify {
        #[command(flatten)]
        problem: ProblemArgs,

        /// Check every length, mode and starting position for these strings
        #[arg(long)]
        sweep: bool,

        /// Backend to use
        #[arg(short, long)]
        backend: Option<String>,
    },

    /// List available backends
    Backends,

    /// Show version information
    Version,
}

fn log_filter(verbose: u8, config: &Config) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.log))
            .unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {:#}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, &config))
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Build { problem, output } => build::execute(&problem, output.as_deref()),

        Commands::Run {
            problem,
            shots,
            backend,
        } => run::execute(&problem, shots, backend.as_deref(), &config).await,

        Commands::Verify {
            problem,
            sweep,
            backend,
        } => verify::execute(&problem, sweep, backend.as_deref(), &config).await,

        Commands::Backends => backends::execute(&config).await,

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
