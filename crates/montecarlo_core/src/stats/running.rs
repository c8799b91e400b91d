//! Welford running statistic with exact parallel merge.
//!
//! [`RunningStatistic`] keeps count, mean and the sum of squared deviations
//! (M2) in a single pass. Two statistics built from disjoint inputs combine
//! through the Chan–Golub–LeVeque pairwise update, which reproduces the
//! single-pass state on the concatenated input up to rounding.
//!
//! # References
//!
//! - Welford, B. P. (1962). "Note on a method for calculating corrected sums
//!   of squares and products". Technometrics 4(3).
//! - Chan, T. F., Golub, G. H. & LeVeque, R. J. (1979). "Updating formulae and
//!   a pairwise algorithm for computing sample variances".

use super::aggregator::Aggregator;

/// Online mean / variance accumulator.
///
/// # Examples
///
/// ```rust
/// use montecarlo_core::stats::RunningStatistic;
///
/// let mut stat = RunningStatistic::new();
/// for x in [1.0, 2.0, 3.0, 4.0] {
///     stat.add(x);
/// }
///
/// assert_eq!(stat.count(), 4);
/// assert_eq!(stat.result(), 2.5);
/// assert!((stat.variance() - 5.0 / 3.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunningStatistic {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningStatistic {
    /// Creates an empty statistic.
    #[inline]
    pub const fn new() -> Self {
        Self {
            count: 0,
            mean: 0.0,
            m2: 0.0,
        }
    }

    /// Builds a statistic from a slice in one pass.
    pub fn from_values(values: &[f64]) -> Self {
        let mut stat = Self::new();
        for &value in values {
            stat.add(value);
        }
        stat
    }

    /// Welford update with one observation.
    #[inline]
    pub fn add(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Current mean; 0.0 when empty.
    #[inline]
    pub fn result(&self) -> f64 {
        self.mean
    }

    /// Alias for [`result`](Self::result).
    #[inline]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Unbiased sample variance `M2 / (n - 1)`; 0.0 for fewer than two samples.
    #[inline]
    pub fn variance(&self) -> f64 {
        if self.count > 1 {
            self.m2 / (self.count - 1) as f64
        } else {
            0.0
        }
    }

    /// Sample standard deviation.
    #[inline]
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Standard error of the mean `sqrt(variance / n)`; 0.0 when empty.
    #[inline]
    pub fn std_error(&self) -> f64 {
        if self.count > 0 {
            (self.variance() / self.count as f64).sqrt()
        } else {
            0.0
        }
    }

    /// Number of observations.
    #[inline]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sum of squared deviations from the mean.
    #[inline]
    pub fn sum_sq_dev(&self) -> f64 {
        self.m2
    }

    /// Returns true if no observation has been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Clears the statistic for reuse.
    #[inline]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Combines `other` into `self` exactly.
    ///
    /// If either side is empty the result equals the other side.
    pub fn merge(&mut self, other: &RunningStatistic) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }

        let n_a = self.count as f64;
        let n_b = other.count as f64;
        let total = n_a + n_b;
        let delta = other.mean - self.mean;

        self.mean += delta * (n_b / total);
        self.m2 += other.m2 + delta * delta * (n_a * n_b / total);
        self.count += other.count;
    }

    /// Returns the merge of `self` and `other` without mutating either.
    pub fn merged(mut self, other: &RunningStatistic) -> Self {
        self.merge(other);
        self
    }
}

impl Extend<f64> for RunningStatistic {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl FromIterator<f64> for RunningStatistic {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut stat = Self::new();
        stat.extend(iter);
        stat
    }
}

impl Aggregator for RunningStatistic {
    #[inline]
    fn add(&mut self, value: f64) {
        RunningStatistic::add(self, value);
    }

    #[inline]
    fn result(&self) -> f64 {
        RunningStatistic::result(self)
    }

    #[inline]
    fn reset(&mut self) {
        RunningStatistic::reset(self);
    }

    #[inline]
    fn count(&self) -> u64 {
        RunningStatistic::count(self)
    }

    #[inline]
    fn variance(&self) -> f64 {
        RunningStatistic::variance(self)
    }

    #[inline]
    fn std_error(&self) -> f64 {
        RunningStatistic::std_error(self)
    }

    #[inline]
    fn merge(&mut self, other: &Self) {
        RunningStatistic::merge(self, other);
    }

    fn supports_exact_merge(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_pass(values: &[f64]) -> (f64, f64) {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let ss: f64 = values.iter().map(|x| (x - mean) * (x - mean)).sum();
        (mean, ss / (n - 1.0))
    }

    #[test]
    fn test_empty_statistic() {
        let stat = RunningStatistic::new();
        assert_eq!(stat.count(), 0);
        assert_eq!(stat.result(), 0.0);
        assert_eq!(stat.variance(), 0.0);
        assert_eq!(stat.std_error(), 0.0);
        assert!(stat.is_empty());
    }

    #[test]
    fn test_single_observation() {
        let mut stat = RunningStatistic::new();
        stat.add(7.5);
        assert_eq!(stat.count(), 1);
        assert_eq!(stat.result(), 7.5);
        assert_eq!(stat.variance(), 0.0);
        assert_eq!(stat.std_error(), 0.0);
    }

    #[test]
    fn test_basic_stats_one_to_four() {
        let stat = RunningStatistic::from_values(&[1.0, 2.0, 3.0, 4.0]);

        assert_eq!(stat.count(), 4);
        assert_relative_eq!(stat.result(), 2.5, epsilon = 1e-12);
        assert_relative_eq!(stat.variance(), 1.666_666_666_7, epsilon = 1e-9);
        assert_relative_eq!(
            stat.std_error(),
            (stat.variance() / 4.0).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_matches_two_pass_formula() {
        let values: Vec<f64> = (0..1000).map(|i| ((i * 37) % 101) as f64 * 0.25).collect();
        let stat = RunningStatistic::from_values(&values);
        let (mean, variance) = two_pass(&values);

        assert_relative_eq!(stat.result(), mean, max_relative = 1e-9);
        assert_relative_eq!(stat.variance(), variance, max_relative = 1e-9);
    }

    #[test]
    fn test_large_offset_stability() {
        // Sum-of-squares formulas lose every digit here
        let values: Vec<f64> = (0..100).map(|i| 1.0e9 + (i % 4) as f64).collect();
        let stat = RunningStatistic::from_values(&values);
        let (_, variance) = two_pass(&values);

        assert_relative_eq!(stat.variance(), variance, max_relative = 1e-9);
    }

    #[test]
    fn test_reset() {
        let mut stat = RunningStatistic::from_values(&[1.0, 2.0]);
        stat.reset();

        assert_eq!(stat, RunningStatistic::new());
        stat.add(3.0);
        assert_eq!(stat.count(), 1);
        assert_eq!(stat.result(), 3.0);
    }

    #[test]
    fn test_merge_matches_single_pass() {
        let values: Vec<f64> = (0..200).map(|i| (i as f64).sin() * 10.0).collect();
        let full = RunningStatistic::from_values(&values);

        let mut left = RunningStatistic::from_values(&values[..73]);
        let right = RunningStatistic::from_values(&values[73..]);
        left.merge(&right);

        assert_eq!(left.count(), full.count());
        assert_relative_eq!(left.result(), full.result(), epsilon = 1e-12);
        assert_relative_eq!(left.variance(), full.variance(), max_relative = 1e-9);
    }

    #[test]
    fn test_merge_with_empty_sides() {
        let stat = RunningStatistic::from_values(&[1.0, 5.0, 9.0]);

        let mut left = RunningStatistic::new();
        left.merge(&stat);
        assert_eq!(left, stat);

        let mut right = stat;
        right.merge(&RunningStatistic::new());
        assert_eq!(right, stat);
    }

    #[test]
    fn test_merge_is_commutative() {
        let a = RunningStatistic::from_values(&[1.0, 2.0, 10.0]);
        let b = RunningStatistic::from_values(&[-4.0, 0.5]);

        let ab = a.merged(&b);
        let ba = b.merged(&a);

        assert_eq!(ab.count(), ba.count());
        assert_relative_eq!(ab.result(), ba.result(), epsilon = 1e-12);
        assert_relative_eq!(ab.variance(), ba.variance(), epsilon = 1e-12);
    }

    #[test]
    fn test_collect_and_extend() {
        let collected: RunningStatistic = [1.0, 2.0, 3.0].into_iter().collect();
        let mut extended = RunningStatistic::new();
        extended.extend([1.0, 2.0, 3.0]);

        assert_eq!(collected, extended);
        assert_relative_eq!(collected.result(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_aggregator_trait_reports_exact_merge() {
        let stat = RunningStatistic::new();
        assert!(Aggregator::supports_exact_merge(&stat));
    }
}
