//! Option command implementation
//!
//! Prices a European option under geometric Brownian motion and compares
//! the estimate with the Black-Scholes price.

use clap::Args;
use tracing::info;

use crate::commands::run_and_report;
use crate::config::CliConfig;
use crate::models::{EuropeanOption, OptionKind};
use crate::Result;

/// Market and contract parameters
#[derive(Debug, Clone, Args)]
pub struct OptionArgs {
    /// Current price of the underlying
    #[arg(long, default_value_t = 100.0)]
    pub spot: f64,

    /// Strike price
    #[arg(long, default_value_t = 100.0)]
    pub strike: f64,

    /// Continuously compounded risk-free rate
    #[arg(long, default_value_t = 0.05)]
    pub rate: f64,

    /// Annualised volatility
    #[arg(long, default_value_t = 0.2)]
    pub volatility: f64,

    /// Time to maturity in years
    #[arg(long, default_value_t = 1.0)]
    pub maturity: f64,

    /// Price a put instead of a call
    #[arg(long)]
    pub put: bool,
}

/// Run the option command
pub fn run(config: &CliConfig, args: &OptionArgs) -> Result<()> {
    let kind = if args.put {
        OptionKind::Put
    } else {
        OptionKind::Call
    };
    let model = EuropeanOption::new(
        args.spot,
        args.strike,
        args.rate,
        args.volatility,
        args.maturity,
        kind,
    )?;

    let analytical = model.exact();
    info!(analytical, ?kind, "Black-Scholes reference price");

    let title = match kind {
        OptionKind::Call => "European Call Option",
        OptionKind::Put => "European Put Option",
    };
    run_and_report(title, model, Some(analytical), config)
}
