//! Error types for the simulation engine.
//!
//! Runs fail only when worker threads cannot be started. Configuration
//! values are checked when an [`EngineConfig`](crate::config::EngineConfig)
//! is built.

use thiserror::Error;

/// Errors raised by execution policies, the engine and its configuration.
///
/// # Variants
///
/// - `WorkerPool`: the parallel policy could not start its worker threads
/// - `InvalidConfig`: a configuration parameter is out of range
///
/// # Examples
///
/// ```
/// use montecarlo_core::EngineError;
///
/// let err = EngineError::InvalidConfig {
///     name: "workers",
///     value: "must not exceed 4096".to_string(),
/// };
/// assert!(err.to_string().contains("workers"));
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Worker threads for a parallel run could not be created.
    #[error("Failed to start {workers} worker threads: {reason}")]
    WorkerPool {
        /// Number of workers requested
        workers: usize,
        /// Message from the thread pool builder
        reason: String,
    },

    /// Invalid configuration parameter.
    #[error("Invalid parameter '{name}': {value}")]
    InvalidConfig {
        /// Parameter name
        name: &'static str,
        /// Description of the invalid value
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_pool_display() {
        let err = EngineError::WorkerPool {
            workers: 8,
            reason: "resource temporarily unavailable".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("8 worker threads"));
        assert!(msg.contains("resource temporarily unavailable"));
    }

    #[test]
    fn test_invalid_config_display() {
        let err = EngineError::InvalidConfig {
            name: "workers",
            value: "must not exceed 4096".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'workers': must not exceed 4096"
        );
    }
}
