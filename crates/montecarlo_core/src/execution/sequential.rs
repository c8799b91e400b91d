//! Single-threaded execution.

use super::{run_trials, ExecutionPolicy};
use crate::error::EngineError;
use crate::model::Model;
use crate::rng::RngFactory;
use crate::stats::Aggregator;
use crate::transform::Transform;

/// Runs every trial on the calling thread from one generator.
///
/// The generator is `factory.create(seed)`, so a sequential run is fully
/// determined by the seed. Never fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Sequential;

impl ExecutionPolicy for Sequential {
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
        let mut rng = factory.create(seed);
        run_trials(model, transform, aggregator, &mut rng, iterations);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "sequential"
    }
}
