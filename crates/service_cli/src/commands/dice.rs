//! Dice command implementation
//!
//! Without a target, estimates the expected total of the dice. With a
//! target, estimates the probability that the total reaches it.

use clap::Args;

use crate::commands::run_and_report;
use crate::config::CliConfig;
use crate::models::Dice;
use crate::Result;

/// Dice to roll
#[derive(Debug, Clone, Args)]
pub struct DiceArgs {
    /// Number of dice
    #[arg(long, default_value_t = 1)]
    pub dice: u32,

    /// Faces per die
    #[arg(long, default_value_t = 6)]
    pub sides: u32,

    /// Estimate P(total >= target) instead of the expected total
    #[arg(long)]
    pub target: Option<u32>,
}

/// Run the dice command
pub fn run(config: &CliConfig, args: &DiceArgs) -> Result<()> {
    let model = Dice::new(args.dice, args.sides, args.target)?;

    let title = match args.target {
        Some(target) => format!("P({}d{} >= {})", args.dice, args.sides, target),
        None => format!("Expected total of {}d{}", args.dice, args.sides),
    };
    run_and_report(&title, model, Some(model.exact()), config)
}
