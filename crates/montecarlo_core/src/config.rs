//! Engine configuration.
//!
//! [`EngineConfig`] collects everything needed to pick an execution policy
//! and transform at runtime, for example from a configuration file. With
//! the `serde` feature it deserialises from any serde format; missing
//! fields take their defaults. Call [`EngineConfig::validate`] on
//! deserialised values, the builder does so automatically.

use std::fmt;
use std::str::FromStr;

use crate::engine::DEFAULT_SEED;
use crate::error::EngineError;
use crate::execution::{Execution, Parallel, Sequential, StreamDerivation};
use crate::transform::TransformSpec;

/// Upper bound on explicitly requested workers.
pub const MAX_WORKERS: usize = 4096;

/// Execution mode selected by configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExecutionMode {
    /// All trials on the calling thread.
    #[default]
    Sequential,
    /// Trials split over worker threads.
    Parallel,
}

impl ExecutionMode {
    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Parallel => "parallel",
        }
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sequential" | "seq" => Ok(ExecutionMode::Sequential),
            "parallel" | "par" => Ok(ExecutionMode::Parallel),
            other => Err(EngineError::InvalidConfig {
                name: "mode",
                value: format!("unknown execution mode '{}'", other),
            }),
        }
    }
}

/// Runtime engine configuration.
///
/// # Examples
///
/// ```rust
/// use montecarlo_core::config::{EngineConfig, ExecutionMode};
/// use montecarlo_core::execution::ExecutionPolicy;
///
/// let config = EngineConfig::builder()
///     .seed(42)
///     .mode(ExecutionMode::Parallel)
///     .workers(4)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.seed(), 42);
/// assert_eq!(config.execution().name(), "parallel");
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// Base seed.
    seed: u64,
    /// Sequential or parallel.
    mode: ExecutionMode,
    /// Worker threads for parallel mode; 0 means one per logical CPU.
    workers: usize,
    /// Worker stream derivation for parallel mode.
    streams: StreamDerivation,
    /// Per-trial transform.
    transform: TransformSpec,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            mode: ExecutionMode::default(),
            workers: 0,
            streams: StreamDerivation::default(),
            transform: TransformSpec::default(),
        }
    }
}

impl EngineConfig {
    /// Creates a new configuration builder.
    #[inline]
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// Returns a builder pre-filled with this configuration.
    ///
    /// ```rust
    /// use montecarlo_core::config::EngineConfig;
    ///
    /// let base = EngineConfig::builder().seed(1).workers(2).build().unwrap();
    /// let reseeded = base.to_builder().seed(9).build().unwrap();
    /// assert_eq!(reseeded.seed(), 9);
    /// assert_eq!(reseeded.workers(), 2);
    /// ```
    pub fn to_builder(&self) -> EngineConfigBuilder {
        EngineConfigBuilder {
            seed: Some(self.seed),
            mode: self.mode,
            workers: self.workers,
            streams: self.streams,
            transform: self.transform.clone(),
        }
    }

    /// Base seed.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Execution mode.
    #[inline]
    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Requested workers; 0 means one per logical CPU.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Worker stream derivation.
    #[inline]
    pub fn streams(&self) -> StreamDerivation {
        self.streams
    }

    /// Per-trial transform.
    #[inline]
    pub fn transform(&self) -> &TransformSpec {
        &self.transform
    }

    /// Builds the configured execution policy.
    pub fn execution(&self) -> Execution {
        match self.mode {
            ExecutionMode::Sequential => Execution::Sequential(Sequential),
            ExecutionMode::Parallel => {
                Execution::Parallel(Parallel::new(self.workers).with_streams(self.streams))
            }
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if:
    /// - `workers` exceeds [`MAX_WORKERS`]
    /// - a transform parameter is NaN or infinite
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.workers > MAX_WORKERS {
            return Err(EngineError::InvalidConfig {
                name: "workers",
                value: format!("{} exceeds the maximum of {}", self.workers, MAX_WORKERS),
            });
        }
        check_transform(&self.transform)
    }
}

fn check_transform(spec: &TransformSpec) -> Result<(), EngineError> {
    let params: Vec<f64> = match spec {
        TransformSpec::Log { offset } => vec![*offset],
        TransformSpec::Indicator { threshold, .. } => vec![*threshold],
        TransformSpec::Clamp { min, max } => vec![*min, *max],
        TransformSpec::LinearScale { a, b } => vec![*a, *b],
        TransformSpec::Power { exponent } => vec![*exponent],
        TransformSpec::Chain { steps } => {
            return steps.iter().try_for_each(check_transform);
        }
        TransformSpec::Identity
        | TransformSpec::Square
        | TransformSpec::Abs
        | TransformSpec::Exp
        | TransformSpec::Sigmoid => Vec::new(),
    };

    if params.iter().all(|p| p.is_finite()) {
        Ok(())
    } else {
        Err(EngineError::InvalidConfig {
            name: "transform",
            value: format!("{:?} has a non-finite parameter", spec),
        })
    }
}

/// Builder for [`EngineConfig`].
#[derive(Clone, Debug, Default)]
pub struct EngineConfigBuilder {
    seed: Option<u64>,
    mode: ExecutionMode,
    workers: usize,
    streams: StreamDerivation,
    transform: TransformSpec,
}

impl EngineConfigBuilder {
    /// Sets the base seed; defaults to [`DEFAULT_SEED`].
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the execution mode.
    #[inline]
    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the worker count for parallel mode.
    #[inline]
    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the worker stream derivation.
    #[inline]
    pub fn streams(mut self, streams: StreamDerivation) -> Self {
        self.streams = streams;
        self
    }

    /// Sets the per-trial transform.
    #[inline]
    pub fn transform(mut self, transform: TransformSpec) -> Self {
        self.transform = transform;
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// See [`EngineConfig::validate`].
    pub fn build(self) -> Result<EngineConfig, EngineError> {
        let config = EngineConfig {
            seed: self.seed.unwrap_or(DEFAULT_SEED),
            mode: self.mode,
            workers: self.workers,
            streams: self.streams,
            transform: self.transform,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::ExecutionPolicy;

    #[test]
    fn test_builder_defaults() {
        let config = EngineConfig::builder().build().unwrap();

        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.seed(), DEFAULT_SEED);
        assert_eq!(config.mode(), ExecutionMode::Sequential);
        assert_eq!(config.workers(), 0);
        assert_eq!(config.streams(), StreamDerivation::Offset);
        assert_eq!(config.transform(), &TransformSpec::Identity);
    }

    #[test]
    fn test_execution_sequential() {
        let config = EngineConfig::builder().workers(8).build().unwrap();
        assert_eq!(config.execution(), Execution::Sequential(Sequential));
    }

    #[test]
    fn test_execution_parallel() {
        let config = EngineConfig::builder()
            .mode(ExecutionMode::Parallel)
            .workers(3)
            .streams(StreamDerivation::Mixed)
            .build()
            .unwrap();

        match config.execution() {
            Execution::Parallel(p) => {
                assert_eq!(p.worker_count(), 3);
                assert_eq!(p.streams(), StreamDerivation::Mixed);
            }
            other => panic!("expected parallel, got {:?}", other),
        }
        assert_eq!(config.execution().name(), "parallel");
    }

    #[test]
    fn test_too_many_workers() {
        let result = EngineConfig::builder().workers(MAX_WORKERS + 1).build();

        assert!(matches!(
            result,
            Err(EngineError::InvalidConfig {
                name: "workers",
                ..
            })
        ));
    }

    #[test]
    fn test_non_finite_transform_parameter() {
        let result = EngineConfig::builder()
            .transform(TransformSpec::Chain {
                steps: vec![
                    TransformSpec::Square,
                    TransformSpec::Power {
                        exponent: f64::NAN,
                    },
                ],
            })
            .build();

        assert!(matches!(
            result,
            Err(EngineError::InvalidConfig {
                name: "transform",
                ..
            })
        ));
    }

    #[test]
    fn test_execution_mode_from_str() {
        assert_eq!(
            "parallel".parse::<ExecutionMode>().unwrap(),
            ExecutionMode::Parallel
        );
        assert_eq!(
            "SEQ".parse::<ExecutionMode>().unwrap(),
            ExecutionMode::Sequential
        );
        assert!("gpu".parse::<ExecutionMode>().is_err());
        assert_eq!(ExecutionMode::Parallel.to_string(), "parallel");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_from_toml() {
        let text = r#"
            seed = 7
            mode = "parallel"
            workers = 2
            streams = "mixed"

            [transform]
            kind = "linear_scale"
            a = 4.0
        "#;
        let config: EngineConfig = toml::from_str(text).unwrap();
        config.validate().unwrap();

        assert_eq!(config.seed(), 7);
        assert_eq!(config.mode(), ExecutionMode::Parallel);
        assert_eq!(config.workers(), 2);
        assert_eq!(config.streams(), StreamDerivation::Mixed);
        assert_eq!(
            config.transform(),
            &TransformSpec::LinearScale { a: 4.0, b: 0.0 }
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_partial_uses_defaults() {
        let config: EngineConfig = toml::from_str("workers = 6").unwrap();

        assert_eq!(config.seed(), DEFAULT_SEED);
        assert_eq!(config.mode(), ExecutionMode::Sequential);
        assert_eq!(config.workers(), 6);
    }
}
