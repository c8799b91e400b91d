//! CLI error types

use montecarlo_core::EngineError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the `montecarlo` binary
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The engine rejected the run
    #[error("Simulation failed: {0}")]
    Engine(#[from] EngineError),

    /// A command argument is out of range
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// JSON output could not be produced
    #[error("Failed to serialise output: {0}")]
    Output(#[from] serde_json::Error),
}

/// CLI result alias
pub type Result<T> = std::result::Result<T, CliError>;
