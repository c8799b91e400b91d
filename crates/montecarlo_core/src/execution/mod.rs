//! Execution policies: how trials are scheduled onto threads.
//!
//! A policy receives the model, transform, aggregator and generator factory
//! from the engine and is responsible for:
//!
//! - creating every generator the run draws from,
//! - invoking the model exactly `iterations` times,
//! - leaving all observations folded into the caller's aggregator.
//!
//! [`Sequential`] runs every trial on the calling thread. [`Parallel`]
//! splits the trials over a fixed number of workers, each with its own
//! generator and aggregator, and merges the partial aggregators once all
//! workers have joined. [`Execution`] selects between the two at runtime.

mod parallel;
mod sequential;

pub use parallel::{partition_iterations, Parallel, StreamDerivation};
pub use sequential::Sequential;

use crate::error::EngineError;
use crate::model::Model;
use crate::rng::RngFactory;
use crate::stats::Aggregator;
use crate::transform::Transform;

/// Strategy for running a batch of trials.
///
/// Implementations must be deterministic in `(seed, iterations)` for a
/// given factory, model and configuration.
pub trait ExecutionPolicy: Send + Sync {
    /// Runs `iterations` trials and folds every transformed output into
    /// `aggregator`.
    ///
    /// Observations are added on top of whatever `aggregator` already holds.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::WorkerPool`] if worker threads cannot be
    /// started. Panics raised by the model propagate to the caller.
    fn run<M, T, A, F>(
        &self,
        model: &M,
        transform: &T,
        aggregator: &mut A,
        iterations: u64,
        seed: u64,
        factory: &F,
    ) -> Result<(), EngineError>
    where
        F: RngFactory,
        M: Model<F::Rng> + Sync + ?Sized,
        T: Transform + ?Sized,
        A: Aggregator;

    /// Short policy name for logs and reports.
    fn name(&self) -> &'static str;
}

/// Runs `trials` trials on one generator into one aggregator.
#[inline]
pub(crate) fn run_trials<R, M, T, A>(
    model: &M,
    transform: &T,
    aggregator: &mut A,
    rng: &mut R,
    trials: u64,
) where
    M: Model<R> + ?Sized,
    T: Transform + ?Sized,
    A: Aggregator,
{
    for _ in 0..trials {
        aggregator.add(transform.apply(model.trial(rng)));
    }
}

/// Runtime choice between the built-in policies.
///
/// # Examples
///
/// ```rust
/// use montecarlo_core::execution::{Execution, ExecutionPolicy, Parallel};
///
/// let exec = Execution::from(Parallel::new(4));
/// assert_eq!(exec.name(), "parallel");
/// assert_eq!(Execution::default().name(), "sequential");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Execution {
    /// Single-threaded execution.
    Sequential(Sequential),
    /// Multi-threaded execution.
    Parallel(Parallel),
}

impl Default for Execution {
    fn default() -> Self {
        Execution::Sequential(Sequential)
    }
}

impl From<Sequential> for Execution {
    fn from(policy: Sequential) -> Self {
        Execution::Sequential(policy)
    }
}

impl From<Parallel> for Execution {
    fn from(policy: Parallel) -> Self {
        Execution::Parallel(policy)
    }
}

impl ExecutionPolicy for Execution {
    fn run<M, T, A, F>(
        &self,
        model: &M,
        transform: &T,
        aggregator: &mut A,
        iterations: u64,
        seed: u64,
        factory: &F,
    ) -> Result<(), EngineError>
    where
        F: RngFactory,
        M: Model<F::Rng> + Sync + ?Sized,
        T: Transform + ?Sized,
        A: Aggregator,
    {
        match self {
            Execution::Sequential(p) => {
                p.run(model, transform, aggregator, iterations, seed, factory)
            }
            Execution::Parallel(p) => {
                p.run(model, transform, aggregator, iterations, seed, factory)
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Execution::Sequential(p) => p.name(),
            Execution::Parallel(p) => p.name(),
        }
    }
}
