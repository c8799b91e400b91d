//! Pi command implementation
//!
//! Estimates π from the fraction of uniform points inside the quarter circle.

use crate::commands::run_and_report;
use crate::config::CliConfig;
use crate::models::QuarterCircle;
use crate::Result;

/// Run the pi command
pub fn run(config: &CliConfig) -> Result<()> {
    let model = QuarterCircle;
    run_and_report("Pi Estimation", model, Some(model.exact()), config)
}
