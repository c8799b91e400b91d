//! CLI command implementations
//!
//! Each submodule implements one demo. All of them build their engine from
//! the resolved [`CliConfig`], so seed, execution mode, worker count and
//! transform apply uniformly.

pub mod dice;
pub mod integrate;
pub mod option;
pub mod pi;
pub mod sweep;

use montecarlo_core::{ExecutionPolicy, Model, SimulationEngine, SimulationResult, StreamRng};
use tracing::info;

use crate::config::CliConfig;
use crate::output::Report;
use crate::Result;

/// Runs `model` once under the configured engine
pub(crate) fn run_model<M>(
    model: M,
    config: &CliConfig,
    iterations: u64,
) -> Result<(&'static str, SimulationResult)>
where
    M: Model<StreamRng> + Sync,
{
    let engine = SimulationEngine::from_config(model, &config.engine);
    let policy = engine.policy().name();

    info!(
        policy,
        iterations,
        seed = engine.seed(),
        transform = ?config.engine.transform(),
        "Starting simulation"
    );
    let result = engine.run(iterations)?;
    info!(
        estimate = result.estimate,
        standard_error = result.standard_error,
        elapsed_ms = result.elapsed_ms,
        "Simulation complete"
    );

    Ok((policy, result))
}

/// Runs `model` once and prints a single-row report
pub(crate) fn run_and_report<M>(
    title: &str,
    model: M,
    exact: Option<f64>,
    config: &CliConfig,
) -> Result<()>
where
    M: Model<StreamRng> + Sync,
{
    let (policy, result) = run_model(model, config, config.iterations)?;
    let mut report = Report::new(title, exact);
    report.push(policy, result);
    print_report(&report, config)
}

/// Writes a report to stdout in the configured format
pub(crate) fn print_report(report: &Report, config: &CliConfig) -> Result<()> {
    println!("{}", report.render(config.format)?);
    Ok(())
}
