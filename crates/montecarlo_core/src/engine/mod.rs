//! Simulation engine tying model, policy, transform, aggregator and
//! generator factory together.
//!
//! # Example
//!
//! ```rust
//! use montecarlo_core::engine::{make_parallel_engine, make_sequential_engine};
//! use montecarlo_core::rng::StreamRng;
//! use montecarlo_core::transform::Identity;
//! use rand::Rng;
//!
//! let pi = |rng: &mut StreamRng| {
//!     let (x, y): (f64, f64) = (rng.gen(), rng.gen());
//!     if x * x + y * y <= 1.0 { 4.0 } else { 0.0 }
//! };
//!
//! let engine = make_sequential_engine(pi, 42, Identity);
//! let result = engine.run(100_000).unwrap();
//! assert!((result.estimate - std::f64::consts::PI).abs() < 0.05);
//!
//! let engine = make_parallel_engine(pi, 4, 42, Identity);
//! assert_eq!(engine.run(100_000).unwrap().iterations, 100_000);
//! ```

mod builder;

pub use builder::SimulationEngineBuilder;

use std::time::Instant;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::execution::{Execution, ExecutionPolicy, Parallel, Sequential};
use crate::model::Model;
use crate::result::SimulationResult;
use crate::rng::{DefaultRngFactory, RngFactory};
use crate::stats::{Aggregator, RunningStatistic};
use crate::transform::{Identity, Transform, TransformSpec};

/// Base seed used when none is given.
pub const DEFAULT_SEED: u64 = 123_456_789;

/// Runs a model under an execution policy and summarises the outcome.
///
/// The engine owns an aggregator *prototype*: each run starts from an
/// empty copy of it, so runs never leak state into each other and the
/// prototype's configuration (histogram layout, for example) is kept.
///
/// # Type Parameters
///
/// * `M` - Trial model, see [`Model`]
/// * `P` - Execution policy (default [`Sequential`])
/// * `T` - Per-trial transform (default [`Identity`])
/// * `A` - Aggregator (default [`RunningStatistic`])
/// * `F` - Generator factory (default [`DefaultRngFactory`])
#[derive(Clone, Debug)]
pub struct SimulationEngine<
    M,
    P = Sequential,
    T = Identity,
    A = RunningStatistic,
    F = DefaultRngFactory,
> {
    model: M,
    policy: P,
    transform: T,
    aggregator: A,
    factory: F,
    base_seed: u64,
}

impl<M> SimulationEngine<M> {
    /// Creates a sequential engine with default components and
    /// [`DEFAULT_SEED`].
    pub fn new(model: M) -> Self {
        Self::builder(model).build()
    }

    /// Starts a builder from the default components.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use montecarlo_core::engine::SimulationEngine;
    /// use montecarlo_core::execution::Parallel;
    /// use montecarlo_core::rng::StreamRng;
    /// use montecarlo_core::stats::HistogramAggregator;
    /// use montecarlo_core::transform::Square;
    /// use rand::Rng;
    ///
    /// let engine = SimulationEngine::builder(|rng: &mut StreamRng| rng.gen::<f64>())
    ///     .policy(Parallel::new(2))
    ///     .transform(Square)
    ///     .aggregator(HistogramAggregator::new(10, 0.0, 1.0))
    ///     .seed(7)
    ///     .build();
    ///
    /// let result = engine.run(20_000).unwrap();
    /// assert!((result.estimate - 1.0 / 3.0).abs() < 0.02);
    /// ```
    pub fn builder(model: M) -> SimulationEngineBuilder<M> {
        SimulationEngineBuilder::new(model)
    }
}

impl<M> SimulationEngine<M, Execution, TransformSpec> {
    /// Creates an engine whose policy and transform come from `config`.
    pub fn from_config(model: M, config: &EngineConfig) -> Self {
        SimulationEngine::builder(model)
            .policy(config.execution())
            .transform(config.transform().clone())
            .seed(config.seed())
            .build()
    }
}

impl<M, P, T, A, F> SimulationEngine<M, P, T, A, F> {
    pub(crate) fn from_parts(
        model: M,
        policy: P,
        transform: T,
        aggregator: A,
        factory: F,
        base_seed: u64,
    ) -> Self {
        Self {
            model,
            policy,
            transform,
            aggregator,
            factory,
            base_seed,
        }
    }

    /// Base seed used by [`run`](Self::run).
    #[inline]
    pub fn seed(&self) -> u64 {
        self.base_seed
    }

    /// Replaces the base seed for subsequent runs.
    #[inline]
    pub fn set_seed(&mut self, seed: u64) {
        self.base_seed = seed;
    }

    /// The trial model.
    #[inline]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The execution policy.
    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// The per-trial transform.
    #[inline]
    pub fn transform(&self) -> &T {
        &self.transform
    }
}

impl<M, P, T, A, F> SimulationEngine<M, P, T, A, F>
where
    P: ExecutionPolicy,
    T: Transform,
    A: Aggregator,
    F: RngFactory,
    M: Model<F::Rng> + Sync,
{
    /// Runs `iterations` trials from the base seed.
    ///
    /// Repeated calls with the same base seed return the same estimate.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WorkerPool`] if the policy cannot start its
    /// workers.
    pub fn run(&self, iterations: u64) -> Result<SimulationResult, EngineError> {
        self.execute(iterations, self.base_seed)
            .map(|(result, _)| result)
    }

    /// Runs `iterations` trials from `seed` without touching the base seed.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn simulate(&self, iterations: u64, seed: u64) -> Result<SimulationResult, EngineError> {
        self.execute(iterations, seed).map(|(result, _)| result)
    }

    /// Like [`run`](Self::run), also returning the final aggregator.
    ///
    /// Useful when the aggregator carries more than the summary, such as
    /// histogram bins.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn run_with_aggregator(
        &self,
        iterations: u64,
    ) -> Result<(SimulationResult, A), EngineError> {
        self.execute(iterations, self.base_seed)
    }

    fn execute(&self, iterations: u64, seed: u64) -> Result<(SimulationResult, A), EngineError> {
        let span = tracing::debug_span!(
            "simulation",
            policy = self.policy.name(),
            iterations,
            seed
        );
        let _guard = span.enter();

        let start = Instant::now();
        let mut aggregator = self.aggregator.empty_like();
        self.policy.run(
            &self.model,
            &self.transform,
            &mut aggregator,
            iterations,
            seed,
            &self.factory,
        )?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1_000.0;

        let result = SimulationResult {
            estimate: aggregator.result(),
            variance: aggregator.variance(),
            standard_error: aggregator.std_error(),
            iterations,
            elapsed_ms,
        };

        tracing::debug!(
            estimate = result.estimate,
            standard_error = result.standard_error,
            elapsed_ms,
            "simulation finished"
        );
        Ok((result, aggregator))
    }
}

/// Engine with an explicit policy, seed and transform.
pub fn make_engine<M, P, T>(model: M, policy: P, seed: u64, transform: T) -> SimulationEngine<M, P, T> {
    SimulationEngine::builder(model)
        .policy(policy)
        .transform(transform)
        .seed(seed)
        .build()
}

/// Single-threaded engine.
pub fn make_sequential_engine<M, T>(model: M, seed: u64, transform: T) -> SimulationEngine<M, Sequential, T> {
    make_engine(model, Sequential, seed, transform)
}

/// Multi-threaded engine; `workers == 0` uses every logical CPU.
pub fn make_parallel_engine<M, T>(
    model: M,
    workers: usize,
    seed: u64,
    transform: T,
) -> SimulationEngine<M, Parallel, T> {
    make_engine(model, Parallel::new(workers), seed, transform)
}
