//! Pluggable generator factories.
//!
//! Execution policies receive an [`RngFactory`] rather than a concrete
//! generator, so tests can substitute fixed-output stubs and clients can
//! bring their own algorithms.

use rand::RngCore;

use super::stream::{make_rng, StreamRng};

/// Factory trait for per-stream generators.
///
/// Implement this trait to change which generator trials draw from. Any
/// `Fn(u64) -> R` closure is already a factory.
///
/// # Examples
///
/// ```rust
/// use montecarlo_core::rng::RngFactory;
/// use rand::rngs::mock::StepRng;
/// use rand::RngCore;
///
/// // Always returns 42
/// let constant = |_seed: u64| StepRng::new(42, 0);
/// let mut rng = constant.create(7);
/// assert_eq!(rng.next_u64(), 42);
/// assert_eq!(rng.next_u64(), 42);
/// ```
pub trait RngFactory: Sync {
    /// Generator produced by this factory.
    type Rng: RngCore + Send;

    /// Creates the generator for `seed`.
    fn create(&self, seed: u64) -> Self::Rng;

    /// Creates the generator for stream `stream_id` under `seed`.
    ///
    /// The default derives the stream by offsetting the seed. Factories with
    /// a native notion of streams override this to mix both values.
    fn create_stream(&self, seed: u64, stream_id: u64) -> Self::Rng {
        self.create(seed.wrapping_add(stream_id))
    }
}

impl<F, R> RngFactory for F
where
    F: Fn(u64) -> R + Sync,
    R: RngCore + Send,
{
    type Rng = R;

    #[inline]
    fn create(&self, seed: u64) -> R {
        self(seed)
    }
}

/// Default factory producing [`StreamRng`] via [`make_rng`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DefaultRngFactory;

impl RngFactory for DefaultRngFactory {
    type Rng = StreamRng;

    #[inline]
    fn create(&self, seed: u64) -> StreamRng {
        make_rng(seed, 0)
    }

    #[inline]
    fn create_stream(&self, seed: u64, stream_id: u64) -> StreamRng {
        make_rng(seed, stream_id)
    }
}
