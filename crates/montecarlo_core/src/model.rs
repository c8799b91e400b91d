//! Trial model contract.
//!
//! A [`Model`] produces one scalar observation per trial from a private
//! generator. Closures of the shape `Fn(&mut R) -> f64` are models already;
//! structs implement the trait directly, usually generically over the
//! generator so they run under any [`RngFactory`](crate::rng::RngFactory).
//!
//! # Examples
//!
//! ```rust
//! use montecarlo_core::model::Model;
//! use montecarlo_core::rng::make_rng;
//! use rand::{Rng, RngCore};
//!
//! /// 1.0 inside the unit quarter circle, 0.0 outside.
//! struct QuarterCircle;
//!
//! impl<R: RngCore> Model<R> for QuarterCircle {
//!     fn trial(&self, rng: &mut R) -> f64 {
//!         let (x, y): (f64, f64) = (rng.gen(), rng.gen());
//!         if x * x + y * y <= 1.0 { 1.0 } else { 0.0 }
//!     }
//! }
//!
//! let mut rng = make_rng(7, 0);
//! let hit = QuarterCircle.trial(&mut rng);
//! assert!(hit == 0.0 || hit == 1.0);
//!
//! let coin = |rng: &mut rand::rngs::StdRng| if rng.gen_bool(0.5) { 1.0 } else { 0.0 };
//! # let _ = coin;
//! ```

/// One stochastic trial.
///
/// Every [`ExecutionPolicy`](crate::execution::ExecutionPolicy) takes the
/// model as `Sync`, including [`Sequential`](crate::execution::Sequential),
/// so policies stay interchangeable at runtime through
/// [`Execution`](crate::execution::Execution). A stateful model keeps its
/// state in atomics or a `Mutex` rather than a `Cell`; the generator passed
/// in is the only per-worker state.
pub trait Model<R: ?Sized> {
    /// Runs one trial and returns its observation.
    fn trial(&self, rng: &mut R) -> f64;
}

impl<R, F> Model<R> for F
where
    R: ?Sized,
    F: Fn(&mut R) -> f64,
{
    #[inline]
    fn trial(&self, rng: &mut R) -> f64 {
        self(rng)
    }
}
