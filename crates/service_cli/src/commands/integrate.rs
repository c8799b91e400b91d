//! Integrate command implementation

use clap::Args;

use crate::commands::run_and_report;
use crate::config::CliConfig;
use crate::models::{Integrand, Integration};
use crate::Result;

/// Integrand and interval
#[derive(Debug, Clone, Args)]
pub struct IntegrateArgs {
    /// Integrand (square, sin, exp, sphere3d)
    #[arg(long, default_value = "square")]
    pub function: String,

    /// Lower bound
    #[arg(long, default_value_t = 0.0)]
    pub lower: f64,

    /// Upper bound
    #[arg(long, default_value_t = 1.0)]
    pub upper: f64,
}

/// Run the integrate command
pub fn run(config: &CliConfig, args: &IntegrateArgs) -> Result<()> {
    let integrand: Integrand = args.function.parse()?;
    let model = Integration::new(integrand, args.lower, args.upper)?;

    let title = match integrand {
        Integrand::Sphere3d => "Integral of x² + y² + z² over [0,1]³".to_string(),
        _ => format!(
            "Integral of {} over [{}, {}]",
            args.function.to_lowercase(),
            args.lower,
            args.upper
        ),
    };
    run_and_report(&title, model, Some(model.exact()), config)
}
