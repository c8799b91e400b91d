//! Online aggregation of trial observations.
//!
//! - [`Aggregator`]: the contract policies feed observations into
//! - [`RunningStatistic`]: Welford mean/variance with exact merge
//! - [`HistogramAggregator`]: fixed-bin distribution counts
//!
//! # Choosing an aggregator for parallel runs
//!
//! Parallel execution folds per-worker aggregators together with
//! [`Aggregator::merge`]. Aggregators that keep the provided `merge` are
//! combined by replaying each worker's mean, which preserves the count and
//! the overall mean but loses the within-worker spread. Prefer
//! [`RunningStatistic`] whenever variance or standard error matter.

mod aggregator;
mod histogram;
mod running;

pub use aggregator::Aggregator;
pub use histogram::HistogramAggregator;
pub use running::RunningStatistic;
