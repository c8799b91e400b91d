//! # Random Stream Infrastructure
//!
//! Deterministic random-stream derivation for Monte Carlo execution.
//!
//! ## Design Rationale
//!
//! - **Reproducibility**: the same `(seed, stream_id)` pair always yields the
//!   same bit sequence, across runs and across processes.
//! - **Decorrelation**: both halves of the seed and of the stream id are
//!   mixed through a seed sequence before the generator is initialised, so
//!   neighbouring integers do not produce correlated early output.
//! - **Pluggability**: execution policies and the engine never name a
//!   generator type; they receive an [`RngFactory`].
//!
//! ## Module Structure
//!
//! - `stream`: [`StreamRng`], [`make_rng`] and the seed mixing
//! - `factory`: the [`RngFactory`] trait and [`DefaultRngFactory`]
//!
//! ## Usage Example
//!
//! ```rust
//! use montecarlo_core::rng::{make_rng, RngFactory, DefaultRngFactory};
//! use rand::RngCore;
//!
//! let mut a = make_rng(42, 0);
//! let mut b = DefaultRngFactory.create(42);
//! assert_eq!(a.next_u64(), b.next_u64());
//!
//! // Stub generators plug in through closures
//! let stub = |seed: u64| rand::rngs::mock::StepRng::new(seed, 1);
//! let mut rng = stub.create(10);
//! assert_eq!(rng.next_u64(), 10);
//! assert_eq!(rng.next_u64(), 11);
//! ```

mod factory;
mod stream;

pub use factory::{DefaultRngFactory, RngFactory};
pub use stream::{make_rng, make_rng_default, mix_seed, StreamRng};

#[cfg(test)]
mod tests;
