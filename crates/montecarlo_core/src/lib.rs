//! # montecarlo_core: Generic Monte Carlo Estimation Engine
//!
//! Runs a stochastic trial many times, folds the outputs into a numerically
//! stable running statistic and reports an estimate with its variance and
//! standard error.
//!
//! ## Building Blocks
//!
//! - Trial models: [`Model`] (`model`)
//! - Deterministic random streams: [`make_rng`], [`RngFactory`] (`rng`)
//! - Aggregators: [`RunningStatistic`], [`HistogramAggregator`] (`stats`)
//! - Per-trial transforms: [`Transform`], [`TransformSpec`] (`transform`)
//! - Execution policies: [`Sequential`], [`Parallel`], [`Execution`] (`execution`)
//! - The engine: [`SimulationEngine`] and its helpers (`engine`)
//! - Runtime configuration: [`EngineConfig`] (`config`)
//!
//! ## Reproducibility
//!
//! A run is a pure function of the model, the generator factory, the
//! policy configuration, the seed and the iteration count. Parallel runs
//! give every worker its own generator and aggregator and merge the
//! partial aggregators in worker order, so thread scheduling never changes
//! the result.
//!
//! ## Usage Example
//!
//! ```rust
//! use montecarlo_core::{make_parallel_engine, Identity, StreamRng};
//! use rand::Rng;
//!
//! let engine = make_parallel_engine(|rng: &mut StreamRng| rng.gen::<f64>(), 4, 42, Identity);
//!
//! let result = engine.run(100_000).unwrap();
//! assert!((result.estimate - 0.5).abs() < 0.01);
//! assert!(result.ci_95().contains(result.estimate));
//!
//! // Same seed, same answer
//! assert_eq!(engine.run(100_000).unwrap().estimate, result.estimate);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: serialisation for results, statistics, transform specs and
//!   [`EngineConfig`]

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod config;
pub mod engine;
pub mod error;
pub mod execution;
pub mod model;
pub mod result;
pub mod rng;
pub mod stats;
pub mod transform;

pub use config::{EngineConfig, ExecutionMode};
pub use engine::{
    make_engine, make_parallel_engine, make_sequential_engine, SimulationEngine, DEFAULT_SEED,
};
pub use error::EngineError;
pub use execution::{Execution, ExecutionPolicy, Parallel, Sequential, StreamDerivation};
pub use model::Model;
pub use result::{ConfidenceInterval, SimulationResult};
pub use rng::{make_rng, make_rng_default, DefaultRngFactory, RngFactory, StreamRng};
pub use stats::{Aggregator, HistogramAggregator, RunningStatistic};
pub use transform::{Identity, Transform, TransformSpec};
