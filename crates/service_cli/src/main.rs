//! Monte Carlo CLI - demo estimators on top of `montecarlo_core`
//!
//! # Commands
//!
//! - `montecarlo pi` - Estimate π from the quarter circle
//! - `montecarlo option` - Price a European option under GBM
//! - `montecarlo integrate` - Integrate a function over an interval
//! - `montecarlo dice` - Expected dice totals and target probabilities
//! - `montecarlo sweep` - Convergence of one model over growing sample sizes
//!
//! Global flags select the seed, iteration count and execution policy, and
//! override the config file and `MONTECARLO_*` environment variables.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod models;
mod output;

pub use error::{CliError, Result};

use commands::dice::DiceArgs;
use commands::integrate::IntegrateArgs;
use commands::option::OptionArgs;
use commands::sweep::SweepArgs;
use config::{build_config, CliArgs};

/// Monte Carlo estimation engine CLI
#[derive(Parser)]
#[command(name = "montecarlo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Number of trials
    #[arg(short = 'n', long, global = true)]
    iterations: Option<u64>,

    /// Base seed
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Worker threads for parallel execution (0 = all cores)
    #[arg(short, long, global = true)]
    workers: Option<usize>,

    /// Run trials in parallel
    #[arg(short, long, global = true)]
    parallel: bool,

    /// Output format (table, json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate π
    Pi,

    /// Price a European option
    Option(OptionArgs),

    /// Integrate a function
    Integrate(IntegrateArgs),

    /// Roll dice
    Dice(DiceArgs),

    /// Run one model at increasing sample sizes
    Sweep(SweepArgs),
}

impl From<&Cli> for CliArgs {
    fn from(cli: &Cli) -> Self {
        Self {
            config_file: cli.config.clone(),
            iterations: cli.iterations,
            seed: cli.seed,
            workers: cli.workers,
            parallel: cli.parallel,
            format: cli.format.clone(),
            log_level: cli.log_level.clone(),
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = build_config(&CliArgs::from(&cli))?;

    let level = if cli.verbose {
        "debug"
    } else {
        config.log_level.as_filter_str()
    };
    init_tracing(level);

    info!(
        iterations = config.iterations,
        seed = config.engine.seed(),
        mode = %config.engine.mode(),
        workers = config.engine.workers(),
        "Monte Carlo CLI v{}",
        env!("CARGO_PKG_VERSION")
    );

    match &cli.command {
        Commands::Pi => commands::pi::run(&config),
        Commands::Option(args) => commands::option::run(&config, args),
        Commands::Integrate(args) => commands::integrate::run(&config, args),
        Commands::Dice(args) => commands::dice::run(&config, args),
        Commands::Sweep(args) => commands::sweep::run(&config, args),
    }
}
