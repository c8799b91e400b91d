//! Seeded stream generator and seed mixing.
//!
//! This module provides [`StreamRng`], the default generator handed to
//! models, and [`make_rng`], which derives one from a base seed and a
//! stream identifier.

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

/// Golden-ratio increment of the SplitMix64 sequence.
const SPLITMIX_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

/// One SplitMix64 output step applied to `z`.
#[inline]
fn splitmix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Expands `(seed, stream_id)` into a 32-byte generator seed.
///
/// The low and high 32-bit words of both inputs are absorbed one at a time
/// into a SplitMix64 state, so every input bit influences every output
/// byte. Changing either input by one yields an unrelated seed.
///
/// # Examples
///
/// ```rust
/// use montecarlo_core::rng::mix_seed;
///
/// assert_eq!(mix_seed(7, 1), mix_seed(7, 1));
/// assert_ne!(mix_seed(7, 1), mix_seed(7, 2));
/// assert_ne!(mix_seed(7, 1), mix_seed(8, 0));
/// ```
pub fn mix_seed(seed: u64, stream_id: u64) -> [u8; 32] {
    let words = [
        seed as u32,
        (seed >> 32) as u32,
        stream_id as u32,
        (stream_id >> 32) as u32,
    ];

    let mut state = 0u64;
    for (i, word) in words.iter().enumerate() {
        state = state.wrapping_add(SPLITMIX_GAMMA);
        state = splitmix64(state ^ (u64::from(*word) << ((i % 2) * 32)));
    }

    let mut bytes = [0u8; 32];
    for chunk in bytes.chunks_exact_mut(8) {
        state = state.wrapping_add(SPLITMIX_GAMMA);
        chunk.copy_from_slice(&splitmix64(state).to_le_bytes());
    }
    bytes
}

/// Seeded 64-bit generator for one Monte Carlo stream.
///
/// Wraps `rand::rngs::StdRng` and implements [`RngCore`], so models can use
/// any `rand` distribution with it. Output is the full `u64` range,
/// `[StreamRng::MIN, StreamRng::MAX]`.
///
/// `StdRng` output is stable for a given `rand` release; the workspace pins
/// the `rand` minor version for that reason.
#[derive(Clone, Debug)]
pub struct StreamRng {
    inner: StdRng,
    seed: u64,
    stream_id: u64,
}

impl StreamRng {
    /// Smallest value returned by [`RngCore::next_u64`].
    pub const MIN: u64 = u64::MIN;
    /// Largest value returned by [`RngCore::next_u64`].
    pub const MAX: u64 = u64::MAX;

    /// Creates the generator for `(seed, stream_id)`.
    #[inline]
    pub fn new(seed: u64, stream_id: u64) -> Self {
        Self {
            inner: StdRng::from_seed(mix_seed(seed, stream_id)),
            seed,
            stream_id,
        }
    }

    /// Returns the base seed this stream was derived from.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the stream identifier.
    #[inline]
    pub fn stream_id(&self) -> u64 {
        self.stream_id
    }
}

impl RngCore for StreamRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    #[inline]
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

/// Derives a reproducible generator from a base seed and a stream id.
///
/// # Examples
///
/// ```rust
/// use montecarlo_core::rng::make_rng;
/// use rand::RngCore;
///
/// let mut rng1 = make_rng(12345, 3);
/// let mut rng2 = make_rng(12345, 3);
/// assert_eq!(rng1.next_u64(), rng2.next_u64());
/// ```
#[inline]
pub fn make_rng(seed: u64, stream_id: u64) -> StreamRng {
    StreamRng::new(seed, stream_id)
}

/// Shorthand for `make_rng(seed, 0)`.
#[inline]
pub fn make_rng_default(seed: u64) -> StreamRng {
    StreamRng::new(seed, 0)
}
