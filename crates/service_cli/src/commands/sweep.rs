//! Sweep command implementation
//!
//! Runs one model at increasing sample sizes, 10³ up to 10^max-power, to
//! show the estimate converging at the usual 1/√n rate.

use clap::{Args, ValueEnum};
use montecarlo_core::{ExecutionPolicy, Model, SimulationEngine, StreamRng};
use tracing::{debug, info};

use crate::commands::print_report;
use crate::config::CliConfig;
use crate::models::{Dice, EuropeanOption, Integrand, Integration, OptionKind, QuarterCircle};
use crate::output::Report;
use crate::{CliError, Result};

const MIN_POWER: u32 = 3;
const MAX_POWER: u32 = 9;

/// Model to sweep, with its default parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SweepModel {
    /// Quarter-circle estimate of π
    Pi,
    /// At-the-money European call
    Option,
    /// Expected total of one six-sided die
    Dice,
    /// Integral of x² over [0, 1]
    Integrate,
}

/// Sweep parameters
#[derive(Debug, Clone, Args)]
pub struct SweepArgs {
    /// Model to run
    #[arg(long, value_enum, default_value_t = SweepModel::Pi)]
    pub model: SweepModel,

    /// Largest sample size as a power of ten
    #[arg(long, default_value_t = 6)]
    pub max_power: u32,
}

/// Sample sizes 10^MIN_POWER ..= 10^max_power
pub fn sample_sizes(max_power: u32) -> Result<Vec<u64>> {
    if !(MIN_POWER..=MAX_POWER).contains(&max_power) {
        return Err(CliError::InvalidArgument(format!(
            "max power must be between {} and {}, got {}",
            MIN_POWER, MAX_POWER, max_power
        )));
    }
    Ok((MIN_POWER..=max_power).map(|p| 10u64.pow(p)).collect())
}

/// Run the sweep command
pub fn run(config: &CliConfig, args: &SweepArgs) -> Result<()> {
    let sizes = sample_sizes(args.max_power)?;
    info!(model = ?args.model, ?sizes, "Starting sweep");

    let report = match args.model {
        SweepModel::Pi => {
            let model = QuarterCircle;
            sweep("Pi Estimation", model, model.exact(), config, &sizes)?
        }
        SweepModel::Option => {
            let model = EuropeanOption::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionKind::Call)?;
            sweep("European Call Option", model, model.exact(), config, &sizes)?
        }
        SweepModel::Dice => {
            let model = Dice::new(1, 6, None)?;
            sweep("Expected total of 1d6", model, model.exact(), config, &sizes)?
        }
        SweepModel::Integrate => {
            let model = Integration::new(Integrand::Square, 0.0, 1.0)?;
            sweep("Integral of square over [0, 1]", model, model.exact(), config, &sizes)?
        }
    };

    print_report(&report, config)
}

/// Runs the same engine at every size in `sizes`
fn sweep<M>(title: &str, model: M, exact: f64, config: &CliConfig, sizes: &[u64]) -> Result<Report>
where
    M: Model<StreamRng> + Sync,
{
    let engine = SimulationEngine::from_config(model, &config.engine);
    let policy = engine.policy().name();
    let mut report = Report::new(title, Some(exact));

    for &iterations in sizes {
        let result = engine.run(iterations)?;
        debug!(
            iterations,
            estimate = result.estimate,
            error = (result.estimate - exact).abs(),
            "Sweep step"
        );
        report.push(policy, result);
    }

    Ok(report)
}
