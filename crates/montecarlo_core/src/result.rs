//! Outcome of a simulation run.

/// Summary of one engine run.
///
/// Produced once per [`run`](crate::engine::SimulationEngine::run) or
/// [`simulate`](crate::engine::SimulationEngine::simulate) and never
/// modified afterwards.
///
/// # Examples
///
/// ```rust
/// use montecarlo_core::SimulationResult;
///
/// let result = SimulationResult {
///     estimate: 10.5,
///     variance: 0.25,
///     standard_error: 0.05,
///     iterations: 100,
///     elapsed_ms: 1.0,
/// };
///
/// let ci = result.ci_95();
/// assert!((ci.lower - (10.5 - 1.96 * 0.05)).abs() < 1e-12);
/// assert!(ci.contains(10.5));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimulationResult {
    /// Aggregated point estimate (the mean for built-in aggregators).
    pub estimate: f64,
    /// Sample variance of the transformed trial outputs.
    pub variance: f64,
    /// Standard error of the estimate.
    pub standard_error: f64,
    /// Number of trials requested.
    pub iterations: u64,
    /// Wall-clock duration of the run in milliseconds.
    pub elapsed_ms: f64,
}

/// Symmetric interval `estimate ± z * standard_error`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfidenceInterval {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
    /// Nominal confidence level the interval was built for.
    pub level: f64,
}

impl ConfidenceInterval {
    /// Returns true if `value` lies within the closed interval.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Half the interval width.
    #[inline]
    pub fn half_width(&self) -> f64 {
        0.5 * (self.upper - self.lower)
    }
}

/// Two-sided normal critical value for a confidence level.
///
/// Levels are bucketed: 0.99 and above use 2.576, 0.95 and above 1.96,
/// 0.90 and above 1.645. Anything lower falls back to 1.96.
pub fn z_score(level: f64) -> f64 {
    if level >= 0.99 {
        2.576
    } else if level >= 0.95 {
        1.96
    } else if level >= 0.90 {
        1.645
    } else {
        1.96
    }
}

impl SimulationResult {
    /// Interval at the given confidence level using [`z_score`].
    pub fn confidence_interval(&self, level: f64) -> ConfidenceInterval {
        let half = z_score(level) * self.standard_error;
        ConfidenceInterval {
            lower: self.estimate - half,
            upper: self.estimate + half,
            level,
        }
    }

    /// 95% confidence interval.
    #[inline]
    pub fn ci_95(&self) -> ConfidenceInterval {
        self.confidence_interval(0.95)
    }

    /// 99% confidence interval.
    #[inline]
    pub fn ci_99(&self) -> ConfidenceInterval {
        self.confidence_interval(0.99)
    }

    /// Trials per second, or 0.0 for an instantaneous run.
    pub fn throughput(&self) -> f64 {
        if self.elapsed_ms > 0.0 {
            self.iterations as f64 / (self.elapsed_ms / 1000.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> SimulationResult {
        SimulationResult {
            estimate: 2.0,
            variance: 4.0,
            standard_error: 0.1,
            iterations: 400,
            elapsed_ms: 20.0,
        }
    }

    #[test]
    fn test_z_score_buckets() {
        assert_eq!(z_score(0.999), 2.576);
        assert_eq!(z_score(0.99), 2.576);
        assert_eq!(z_score(0.975), 1.96);
        assert_eq!(z_score(0.95), 1.96);
        assert_eq!(z_score(0.90), 1.645);
        assert_eq!(z_score(0.85), 1.96);
        assert_eq!(z_score(0.80), 1.96);
        assert_eq!(z_score(0.5), 1.96);
    }

    #[test]
    fn test_ci_95() {
        let ci = sample().ci_95();
        assert_relative_eq!(ci.lower, 2.0 - 0.196, epsilon = 1e-12);
        assert_relative_eq!(ci.upper, 2.0 + 0.196, epsilon = 1e-12);
        assert_relative_eq!(ci.half_width(), 0.196, epsilon = 1e-12);
        assert_eq!(ci.level, 0.95);
    }

    #[test]
    fn test_ci_99_is_wider() {
        let result = sample();
        assert!(result.ci_99().half_width() > result.ci_95().half_width());
        assert!(result.ci_99().contains(2.25));
        assert!(!result.ci_95().contains(2.25));
    }

    #[test]
    fn test_zero_standard_error_collapses_interval() {
        let result = SimulationResult {
            estimate: 1.0,
            ..SimulationResult::default()
        };
        let ci = result.ci_95();
        assert_eq!(ci.lower, 1.0);
        assert_eq!(ci.upper, 1.0);
    }

    #[test]
    fn test_throughput() {
        assert_relative_eq!(sample().throughput(), 20_000.0, epsilon = 1e-9);
        assert_eq!(SimulationResult::default().throughput(), 0.0);
    }
}
