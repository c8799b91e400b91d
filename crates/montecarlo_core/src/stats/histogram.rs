//! Fixed-bin histogram aggregator.

use super::aggregator::Aggregator;

/// Counts observations into equal-width bins over `[min, max)`.
///
/// Values below `min` or at/above `max` (and NaN) are tallied separately as
/// underflow and overflow. A running mean is kept alongside the bins so
/// that [`Aggregator::result`] is the sample mean. Histograms merge
/// bin-wise, which is exact.
///
/// # Examples
///
/// ```rust
/// use montecarlo_core::stats::{Aggregator, HistogramAggregator};
///
/// let mut hist = HistogramAggregator::new(4, 0.0, 1.0);
/// for x in [0.1, 0.2, 0.6, 1.5] {
///     hist.add(x);
/// }
///
/// assert_eq!(hist.bins(), &[2, 0, 1, 0]);
/// assert_eq!(hist.overflow(), 1);
/// assert_eq!(hist.count(), 4);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistogramAggregator {
    bins: Vec<u64>,
    min: f64,
    max: f64,
    bin_width: f64,
    underflow: u64,
    overflow: u64,
    count: u64,
    mean: f64,
}

impl HistogramAggregator {
    /// Creates a histogram with `bins` bins over `[min, max)`.
    ///
    /// `bins` is clamped to at least one. If `max <= min` every finite value
    /// lands in underflow or overflow.
    pub fn new(bins: usize, min: f64, max: f64) -> Self {
        let n_bins = bins.max(1);
        Self {
            bins: vec![0; n_bins],
            min,
            max,
            bin_width: (max - min) / n_bins as f64,
            underflow: 0,
            overflow: 0,
            count: 0,
            mean: 0.0,
        }
    }

    /// Bin counts, lowest bin first.
    #[inline]
    pub fn bins(&self) -> &[u64] {
        &self.bins
    }

    /// Lower edge of bin `index`.
    #[inline]
    pub fn bin_lower(&self, index: usize) -> f64 {
        self.min + index as f64 * self.bin_width
    }

    /// Bin width.
    #[inline]
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Observations below `min`, plus NaN.
    #[inline]
    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    /// Observations at or above `max`.
    #[inline]
    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// Fraction of observations that fell in bin `index`.
    pub fn density(&self, index: usize) -> f64 {
        match self.bins.get(index) {
            Some(&hits) if self.count > 0 => hits as f64 / self.count as f64,
            _ => 0.0,
        }
    }

    fn same_layout(&self, other: &Self) -> bool {
        self.bins.len() == other.bins.len() && self.min == other.min && self.max == other.max
    }
}

impl Default for HistogramAggregator {
    fn default() -> Self {
        Self::new(100, 0.0, 1.0)
    }
}

impl Aggregator for HistogramAggregator {
    fn add(&mut self, value: f64) {
        self.count += 1;
        self.mean += (value - self.mean) / self.count as f64;

        if value >= self.min && value < self.max {
            let idx = ((value - self.min) / self.bin_width) as usize;
            // rounding can push values just below max into the next slot
            let idx = idx.min(self.bins.len() - 1);
            self.bins[idx] += 1;
        } else if value >= self.max {
            self.overflow += 1;
        } else {
            self.underflow += 1;
        }
    }

    fn result(&self) -> f64 {
        self.mean
    }

    fn reset(&mut self) {
        self.bins.iter_mut().for_each(|b| *b = 0);
        self.underflow = 0;
        self.overflow = 0;
        self.count = 0;
        self.mean = 0.0;
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn merge(&mut self, other: &Self) {
        if other.count == 0 {
            return;
        }
        if !self.same_layout(other) {
            // layouts differ: fall back to replaying the mean
            let value = other.result();
            for _ in 0..other.count {
                self.add(value);
            }
            return;
        }

        let total = (self.count + other.count) as f64;
        self.mean += (other.mean - self.mean) * (other.count as f64 / total);
        for (mine, theirs) in self.bins.iter_mut().zip(&other.bins) {
            *mine += theirs;
        }
        self.underflow += other.underflow;
        self.overflow += other.overflow;
        self.count += other.count;
    }

    fn supports_exact_merge(&self) -> bool {
        true
    }
}
