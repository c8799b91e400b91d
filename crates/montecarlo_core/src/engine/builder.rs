//! Builder for [`SimulationEngine`].

use super::{SimulationEngine, DEFAULT_SEED};
use crate::execution::Sequential;
use crate::rng::DefaultRngFactory;
use crate::stats::RunningStatistic;
use crate::transform::Identity;

/// Fluent construction of a [`SimulationEngine`].
///
/// Every setter except [`seed`](Self::seed) swaps one component and with it
/// the matching type parameter, so unset components keep their defaults
/// without boxing.
#[derive(Clone, Debug)]
pub struct SimulationEngineBuilder<
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
    seed: u64,
}

impl<M> SimulationEngineBuilder<M> {
    pub(crate) fn new(model: M) -> Self {
        Self {
            model,
            policy: Sequential,
            transform: Identity,
            aggregator: RunningStatistic::new(),
            factory: DefaultRngFactory,
            seed: DEFAULT_SEED,
        }
    }
}

impl<M, P, T, A, F> SimulationEngineBuilder<M, P, T, A, F> {
    /// Sets the execution policy.
    pub fn policy<P2>(self, policy: P2) -> SimulationEngineBuilder<M, P2, T, A, F> {
        SimulationEngineBuilder {
            model: self.model,
            policy,
            transform: self.transform,
            aggregator: self.aggregator,
            factory: self.factory,
            seed: self.seed,
        }
    }

    /// Sets the per-trial transform.
    pub fn transform<T2>(self, transform: T2) -> SimulationEngineBuilder<M, P, T2, A, F> {
        SimulationEngineBuilder {
            model: self.model,
            policy: self.policy,
            transform,
            aggregator: self.aggregator,
            factory: self.factory,
            seed: self.seed,
        }
    }

    /// Sets the aggregator prototype.
    pub fn aggregator<A2>(self, aggregator: A2) -> SimulationEngineBuilder<M, P, T, A2, F> {
        SimulationEngineBuilder {
            model: self.model,
            policy: self.policy,
            transform: self.transform,
            aggregator,
            factory: self.factory,
            seed: self.seed,
        }
    }

    /// Sets the generator factory.
    pub fn rng_factory<F2>(self, factory: F2) -> SimulationEngineBuilder<M, P, T, A, F2> {
        SimulationEngineBuilder {
            model: self.model,
            policy: self.policy,
            transform: self.transform,
            aggregator: self.aggregator,
            factory,
            seed: self.seed,
        }
    }

    /// Sets the base seed.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builds the engine.
    pub fn build(self) -> SimulationEngine<M, P, T, A, F> {
        SimulationEngine::from_parts(
            self.model,
            self.policy,
            self.transform,
            self.aggregator,
            self.factory,
            self.seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::Parallel;
    use crate::rng::StreamRng;
    use crate::transform::Abs;

    #[test]
    fn test_defaults() {
        let engine = SimulationEngineBuilder::new(|_: &mut StreamRng| 0.0).build();
        assert_eq!(engine.seed(), DEFAULT_SEED);
        assert_eq!(engine.policy(), &Sequential);
        assert_eq!(engine.transform(), &Identity);
    }

    #[test]
    fn test_seed_survives_component_swaps() {
        let engine = SimulationEngineBuilder::new(|_: &mut StreamRng| 0.0)
            .seed(17)
            .policy(Parallel::new(2))
            .transform(Abs)
            .build();

        assert_eq!(engine.seed(), 17);
        assert_eq!(engine.policy().worker_count(), 2);
    }
}
