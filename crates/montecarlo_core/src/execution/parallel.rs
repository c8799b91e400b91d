//! Multi-threaded execution over a fixed set of workers.
//!
//! A run is split into one contiguous block of trials per worker (see
//! [`partition_iterations`]). Every worker owns its generator and its
//! aggregator for the whole run, so the trial loop shares no mutable
//! state. Partial aggregators are merged into the caller's aggregator in
//! worker order after the pool has finished, which makes the outcome
//! independent of thread scheduling.

use rayon::prelude::*;

use super::{run_trials, ExecutionPolicy};
use crate::config::MAX_WORKERS;
use crate::error::EngineError;
use crate::model::Model;
use crate::rng::RngFactory;
use crate::stats::Aggregator;
use crate::transform::Transform;

/// How worker `t` derives its generator from the run seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StreamDerivation {
    /// `factory.create(seed + t)` with wrapping addition.
    ///
    /// Adjacent run seeds share all but one worker stream.
    #[default]
    Offset,

    /// `factory.create_stream(seed, t)`.
    ///
    /// With [`DefaultRngFactory`](crate::rng::DefaultRngFactory) the seed and
    /// worker index are mixed together, so streams of different run seeds
    /// never coincide.
    Mixed,
}

/// Splits `iterations` over `workers` as evenly as possible.
///
/// The first `iterations % workers` workers take one extra trial. A worker
/// count of zero is treated as one.
///
/// # Examples
///
/// ```rust
/// use montecarlo_core::execution::partition_iterations;
///
/// assert_eq!(partition_iterations(10, 4), vec![3, 3, 2, 2]);
/// assert_eq!(partition_iterations(2, 4), vec![1, 1, 0, 0]);
/// ```
pub fn partition_iterations(iterations: u64, workers: usize) -> Vec<u64> {
    let workers = workers.max(1);
    let base = iterations / workers as u64;
    let remainder = (iterations % workers as u64) as usize;
    (0..workers)
        .map(|t| if t < remainder { base + 1 } else { base })
        .collect()
}

/// Fans trials out over `worker_count` threads.
///
/// Each run builds a dedicated rayon pool with exactly `worker_count`
/// threads and tears it down afterwards. Runs with more than
/// [`MAX_WORKERS`](crate::config::MAX_WORKERS) workers fail with
/// [`EngineError::WorkerPool`] before any thread is started.
///
/// # Examples
///
/// ```rust
/// use montecarlo_core::execution::{ExecutionPolicy, Parallel};
/// use montecarlo_core::rng::{DefaultRngFactory, StreamRng};
/// use montecarlo_core::stats::{Aggregator, RunningStatistic};
/// use montecarlo_core::transform::Identity;
/// use rand::Rng;
///
/// let model = |rng: &mut StreamRng| rng.gen::<f64>();
/// let mut agg = RunningStatistic::new();
///
/// Parallel::new(4)
///     .run(&model, &Identity, &mut agg, 10_000, 42, &DefaultRngFactory)
///     .unwrap();
///
/// assert_eq!(agg.count(), 10_000);
/// assert!((agg.result() - 0.5).abs() < 0.02);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Parallel {
    workers: usize,
    streams: StreamDerivation,
}

impl Parallel {
    /// Creates a policy with `workers` threads.
    ///
    /// Zero selects the number of logical CPUs; the result is never below
    /// one.
    pub fn new(workers: usize) -> Self {
        let workers = if workers == 0 {
            num_cpus::get()
        } else {
            workers
        };
        Self {
            workers: workers.max(1),
            streams: StreamDerivation::default(),
        }
    }

    /// Sets how worker generators are derived from the run seed.
    #[inline]
    pub fn with_streams(mut self, streams: StreamDerivation) -> Self {
        self.streams = streams;
        self
    }

    /// Number of worker threads.
    #[inline]
    pub fn worker_count(&self) -> usize {
        self.workers
    }

    /// Stream derivation in use.
    #[inline]
    pub fn streams(&self) -> StreamDerivation {
        self.streams
    }

    fn worker_rng<F: RngFactory>(&self, factory: &F, seed: u64, worker: usize) -> F::Rng {
        match self.streams {
            StreamDerivation::Offset => factory.create(seed.wrapping_add(worker as u64)),
            StreamDerivation::Mixed => factory.create_stream(seed, worker as u64),
        }
    }
}

impl Default for Parallel {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ExecutionPolicy for Parallel {
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
        let workers = self.workers;
        if workers > MAX_WORKERS {
            return Err(EngineError::WorkerPool {
                workers,
                reason: format!("at most {} workers are supported", MAX_WORKERS),
            });
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("mc-worker-{i}"))
            .build()
            .map_err(|e| EngineError::WorkerPool {
                workers,
                reason: e.to_string(),
            })?;

        if !aggregator.supports_exact_merge() {
            tracing::warn!(
                workers,
                "aggregator has no exact merge; worker results are replayed and variance is understated"
            );
        }

        let counts = partition_iterations(iterations, workers);
        let locals: Vec<A> = (0..workers).map(|_| aggregator.empty_like()).collect();

        let partials: Vec<A> = pool.install(|| {
            locals
                .into_par_iter()
                .zip(counts.into_par_iter())
                .enumerate()
                .map(|(worker, (mut local, trials))| {
                    let mut rng = self.worker_rng(factory, seed, worker);
                    run_trials(model, transform, &mut local, &mut rng, trials);
                    tracing::trace!(worker, trials, estimate = local.result(), "worker finished");
                    local
                })
                .collect()
        });

        for partial in &partials {
            aggregator.merge(partial);
        }

        tracing::debug!(workers, iterations, "parallel run merged");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "parallel"
    }
}
