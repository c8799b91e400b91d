//! Scalar post-processing applied to each trial output before aggregation.
//!
//! A [`Transform`] is a pure `f64 -> f64` map invoked exactly once per
//! trial, after the model and before the aggregator. Any
//! `Fn(f64) -> f64 + Send + Sync` closure is a transform; the structs here
//! cover the common cases and [`TransformSpec`] names them for
//! configuration files.
//!
//! ```rust
//! use montecarlo_core::transform::{compose, LinearScale, Square, Transform};
//!
//! let t = compose(LinearScale::new(2.0, 1.0), Square);
//! assert_eq!(t.apply(3.0), 19.0);
//!
//! let closure = |x: f64| x * 4.0;
//! assert_eq!(closure.apply(0.5), 2.0);
//! ```

/// Pure per-trial post-processing.
pub trait Transform: Send + Sync {
    /// Maps a raw trial output to the value that is aggregated.
    fn apply(&self, value: f64) -> f64;
}

impl<F> Transform for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    #[inline]
    fn apply(&self, value: f64) -> f64 {
        self(value)
    }
}

/// Leaves values unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Identity;

impl Transform for Identity {
    #[inline]
    fn apply(&self, value: f64) -> f64 {
        value
    }
}

/// `x²`; aggregating squares estimates the second moment.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Square;

impl Transform for Square {
    #[inline]
    fn apply(&self, value: f64) -> f64 {
        value * value
    }
}

/// `|x|`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Abs;

impl Transform for Abs {
    #[inline]
    fn apply(&self, value: f64) -> f64 {
        value.abs()
    }
}

/// `ln(x + offset)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Log {
    offset: f64,
}

impl Log {
    /// Creates the transform with the given offset.
    pub fn new(offset: f64) -> Self {
        Self { offset }
    }
}

impl Default for Log {
    fn default() -> Self {
        Self { offset: 1.0 }
    }
}

impl Transform for Log {
    #[inline]
    fn apply(&self, value: f64) -> f64 {
        (value + self.offset).ln()
    }
}

/// `eˣ`
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Exp;

impl Transform for Exp {
    #[inline]
    fn apply(&self, value: f64) -> f64 {
        value.exp()
    }
}

/// 1.0 when `x` is strictly beyond a threshold, 0.0 otherwise.
///
/// Aggregating an indicator estimates a probability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Indicator {
    threshold: f64,
    greater_than: bool,
}

impl Indicator {
    /// Indicator of `x > threshold` (or `x < threshold` if `greater_than` is false).
    pub fn new(threshold: f64, greater_than: bool) -> Self {
        Self {
            threshold,
            greater_than,
        }
    }

    /// Indicator of `x > threshold`.
    pub fn above(threshold: f64) -> Self {
        Self::new(threshold, true)
    }

    /// Indicator of `x < threshold`.
    pub fn below(threshold: f64) -> Self {
        Self::new(threshold, false)
    }
}

impl Transform for Indicator {
    #[inline]
    fn apply(&self, value: f64) -> f64 {
        let hit = if self.greater_than {
            value > self.threshold
        } else {
            value < self.threshold
        };
        if hit {
            1.0
        } else {
            0.0
        }
    }
}

/// Clamps into `[min, max]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Clamp {
    min: f64,
    max: f64,
}

impl Clamp {
    /// Creates the transform. Bounds given in the wrong order are swapped.
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }
}

impl Transform for Clamp {
    #[inline]
    fn apply(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

/// `a·x + b`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearScale {
    a: f64,
    b: f64,
}

impl LinearScale {
    /// Creates `a·x + b`.
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    /// Pure scaling `a·x`.
    pub fn scale(a: f64) -> Self {
        Self { a, b: 0.0 }
    }
}

impl Default for LinearScale {
    fn default() -> Self {
        Self { a: 1.0, b: 0.0 }
    }
}

impl Transform for LinearScale {
    #[inline]
    fn apply(&self, value: f64) -> f64 {
        self.a * value + self.b
    }
}

/// `xᵖ`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Power {
    exponent: f64,
}

impl Power {
    /// Creates `x^exponent`.
    pub fn new(exponent: f64) -> Self {
        Self { exponent }
    }
}

impl Transform for Power {
    #[inline]
    fn apply(&self, value: f64) -> f64 {
        value.powf(self.exponent)
    }
}

/// Logistic function `1 / (1 + e⁻ˣ)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Sigmoid;

impl Transform for Sigmoid {
    #[inline]
    fn apply(&self, value: f64) -> f64 {
        1.0 / (1.0 + (-value).exp())
    }
}

/// `outer(inner(x))`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Compose<F, G> {
    outer: F,
    inner: G,
}

impl<F, G> Compose<F, G> {
    /// Composes `outer ∘ inner`.
    pub fn new(outer: F, inner: G) -> Self {
        Self { outer, inner }
    }
}

impl<F: Transform, G: Transform> Transform for Compose<F, G> {
    #[inline]
    fn apply(&self, value: f64) -> f64 {
        self.outer.apply(self.inner.apply(value))
    }
}

/// Builds `f(g(x))`.
pub fn compose<F: Transform, G: Transform>(f: F, g: G) -> Compose<F, G> {
    Compose::new(f, g)
}

/// Named transform, selectable at runtime (e.g. from a TOML config).
///
/// ```rust
/// use montecarlo_core::transform::{Transform, TransformSpec};
///
/// let spec = TransformSpec::Chain {
///     steps: vec![
///         TransformSpec::Square,
///         TransformSpec::LinearScale { a: 0.5, b: 0.0 },
///     ],
/// };
/// assert_eq!(spec.apply(4.0), 8.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TransformSpec {
    /// [`Identity`]
    #[default]
    Identity,
    /// [`Square`]
    Square,
    /// [`Abs`]
    Abs,
    /// [`Log`]
    Log {
        /// Added before taking the logarithm.
        #[cfg_attr(feature = "serde", serde(default = "default_log_offset"))]
        offset: f64,
    },
    /// [`Exp`]
    Exp,
    /// [`Indicator`]
    Indicator {
        /// Comparison threshold.
        threshold: f64,
        /// `x > threshold` when true, `x < threshold` otherwise.
        #[cfg_attr(feature = "serde", serde(default = "default_greater_than"))]
        greater_than: bool,
    },
    /// [`Clamp`]
    Clamp {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// [`LinearScale`]
    LinearScale {
        /// Slope.
        a: f64,
        /// Intercept.
        #[cfg_attr(feature = "serde", serde(default))]
        b: f64,
    },
    /// [`Power`]
    Power {
        /// Exponent.
        exponent: f64,
    },
    /// [`Sigmoid`]
    Sigmoid,
    /// Applies each step in order (the first entry runs first).
    Chain {
        /// Steps, first applied first.
        steps: Vec<TransformSpec>,
    },
}

#[cfg(feature = "serde")]
fn default_log_offset() -> f64 {
    1.0
}

#[cfg(feature = "serde")]
fn default_greater_than() -> bool {
    true
}

impl Transform for TransformSpec {
    fn apply(&self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            Self::Square => Square.apply(value),
            Self::Abs => Abs.apply(value),
            Self::Log { offset } => Log::new(*offset).apply(value),
            Self::Exp => Exp.apply(value),
            Self::Indicator {
                threshold,
                greater_than,
            } => Indicator::new(*threshold, *greater_than).apply(value),
            Self::Clamp { min, max } => Clamp::new(*min, *max).apply(value),
            Self::LinearScale { a, b } => LinearScale::new(*a, *b).apply(value),
            Self::Power { exponent } => Power::new(*exponent).apply(value),
            Self::Sigmoid => Sigmoid.apply(value),
            Self::Chain { steps } => steps.iter().fold(value, |acc, step| step.apply(acc)),
        }
    }
}
