//! Aggregator contract shared by execution policies and the engine.

/// Online accumulator of trial observations.
///
/// Execution policies feed every transformed trial output into an
/// aggregator via [`add`](Aggregator::add). Parallel execution builds one
/// private aggregator per worker (a cleared clone of the caller's, see
/// [`empty_like`](Aggregator::empty_like)) and folds them back with
/// [`merge`](Aggregator::merge).
///
/// # Merging
///
/// The provided `merge` replays `other.result()` into `self`
/// `other.count()` times. That keeps the observation count and the mean
/// but discards the spread inside `other`, so any variance reported
/// afterwards is understated. Aggregators that can combine their state
/// exactly override `merge` and return `true` from
/// [`supports_exact_merge`](Aggregator::supports_exact_merge).
///
/// # Examples
///
/// ```rust
/// use montecarlo_core::stats::Aggregator;
///
/// /// Keeps only the running mean.
/// #[derive(Clone, Default)]
/// struct MeanOnly {
///     n: u64,
///     sum: f64,
/// }
///
/// impl Aggregator for MeanOnly {
///     fn add(&mut self, value: f64) {
///         self.n += 1;
///         self.sum += value;
///     }
///     fn result(&self) -> f64 {
///         if self.n == 0 { 0.0 } else { self.sum / self.n as f64 }
///     }
///     fn reset(&mut self) {
///         *self = Self::default();
///     }
///     fn count(&self) -> u64 {
///         self.n
///     }
/// }
///
/// let mut a = MeanOnly::default();
/// a.add(1.0);
/// let mut b = MeanOnly::default();
/// b.add(3.0);
/// b.add(3.0);
/// a.merge(&b);
/// assert_eq!(a.count(), 3);
/// assert!((a.result() - 7.0 / 3.0).abs() < 1e-12);
/// ```
pub trait Aggregator: Clone + Send {
    /// Consumes one observation.
    fn add(&mut self, value: f64);

    /// Current point estimate; 0.0 when empty.
    fn result(&self) -> f64;

    /// Clears all accumulated state in place.
    fn reset(&mut self);

    /// Number of observations seen.
    fn count(&self) -> u64;

    /// Sample variance of the observations; 0.0 when not tracked.
    fn variance(&self) -> f64 {
        0.0
    }

    /// Standard error of [`result`](Aggregator::result); 0.0 when not tracked.
    fn std_error(&self) -> f64 {
        0.0
    }

    /// Folds `other` into `self` as though `self` had observed its inputs.
    fn merge(&mut self, other: &Self) {
        let value = other.result();
        for _ in 0..other.count() {
            self.add(value);
        }
    }

    /// Whether [`merge`](Aggregator::merge) is exact rather than a replay.
    fn supports_exact_merge(&self) -> bool {
        false
    }

    /// Returns an empty aggregator with the same configuration as `self`.
    fn empty_like(&self) -> Self {
        let mut fresh = self.clone();
        fresh.reset();
        fresh
    }
}
