//! Demo trial models with known answers
//!
//! Each model carries its exact expectation so that command output can show
//! the Monte Carlo error next to the estimate.

use montecarlo_core::Model;
use rand::Rng;
use rand_distr::StandardNormal;
use std::str::FromStr;

use crate::{CliError, Result};

/// Standard normal CDF via the Abramowitz-Stegun 7.1.26 erfc approximation
/// (absolute error below 1.5e-7).
pub fn norm_cdf(x: f64) -> f64 {
    let z = -x / std::f64::consts::SQRT_2;
    let abs_z = z.abs();
    let t = 1.0 / (1.0 + 0.327_591_1 * abs_z);
    let poly = 0.254_829_592
        + t * (-0.284_496_736 + t * (1.421_413_741 + t * (-1.453_152_027 + t * 1.061_405_429)));
    let erfc_abs = t * poly * (-abs_z * abs_z).exp();
    let erfc = if z < 0.0 { 2.0 - erfc_abs } else { erfc_abs };
    0.5 * erfc
}

// ============================================================================
// Pi
// ============================================================================

/// 4 if a uniform point of the unit square falls inside the quarter circle,
/// 0 otherwise; the mean is π.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuarterCircle;

impl QuarterCircle {
    /// Exact expectation
    pub fn exact(&self) -> f64 {
        std::f64::consts::PI
    }
}

impl<R: Rng> Model<R> for QuarterCircle {
    fn trial(&self, rng: &mut R) -> f64 {
        let x: f64 = rng.gen();
        let y: f64 = rng.gen();
        if x * x + y * y <= 1.0 {
            4.0
        } else {
            0.0
        }
    }
}

// ============================================================================
// European option under geometric Brownian motion
// ============================================================================

/// Call or put
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Call,
    Put,
}

/// Discounted payoff of a European option with a GBM terminal price
#[derive(Debug, Clone, Copy)]
pub struct EuropeanOption {
    spot: f64,
    strike: f64,
    rate: f64,
    volatility: f64,
    maturity: f64,
    kind: OptionKind,
}

impl EuropeanOption {
    /// Validates the market inputs
    pub fn new(
        spot: f64,
        strike: f64,
        rate: f64,
        volatility: f64,
        maturity: f64,
        kind: OptionKind,
    ) -> Result<Self> {
        for (name, value) in [
            ("spot", spot),
            ("strike", strike),
            ("volatility", volatility),
            ("maturity", maturity),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(CliError::InvalidArgument(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        if !rate.is_finite() {
            return Err(CliError::InvalidArgument(format!("rate must be finite, got {}", rate)));
        }
        Ok(Self {
            spot,
            strike,
            rate,
            volatility,
            maturity,
            kind,
        })
    }

    fn discount(&self) -> f64 {
        (-self.rate * self.maturity).exp()
    }

    /// Black-Scholes price
    pub fn exact(&self) -> f64 {
        let sqrt_t = self.maturity.sqrt();
        let d1 = ((self.spot / self.strike).ln()
            + (self.rate + 0.5 * self.volatility * self.volatility) * self.maturity)
            / (self.volatility * sqrt_t);
        let d2 = d1 - self.volatility * sqrt_t;
        let df = self.discount();

        match self.kind {
            OptionKind::Call => self.spot * norm_cdf(d1) - self.strike * df * norm_cdf(d2),
            OptionKind::Put => self.strike * df * norm_cdf(-d2) - self.spot * norm_cdf(-d1),
        }
    }
}

impl<R: Rng> Model<R> for EuropeanOption {
    fn trial(&self, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        let drift = (self.rate - 0.5 * self.volatility * self.volatility) * self.maturity;
        let terminal = self.spot * (drift + self.volatility * self.maturity.sqrt() * z).exp();
        let payoff = match self.kind {
            OptionKind::Call => (terminal - self.strike).max(0.0),
            OptionKind::Put => (self.strike - terminal).max(0.0),
        };
        self.discount() * payoff
    }
}

// ============================================================================
// Integration
// ============================================================================

/// Integrands with closed-form integrals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Integrand {
    /// x²
    Square,
    /// sin(x)
    Sin,
    /// eˣ
    Exp,
    /// x² + y² + z² over the unit cube; the bounds are ignored
    Sphere3d,
}

impl FromStr for Integrand {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "square" => Ok(Integrand::Square),
            "sin" => Ok(Integrand::Sin),
            "exp" => Ok(Integrand::Exp),
            "sphere3d" => Ok(Integrand::Sphere3d),
            other => Err(CliError::InvalidArgument(format!(
                "unknown integrand '{}'. Supported: square, sin, exp, sphere3d",
                other
            ))),
        }
    }
}

/// `(b - a) * f(a + (b - a) U)` for uniform `U`
#[derive(Debug, Clone, Copy)]
pub struct Integration {
    integrand: Integrand,
    lower: f64,
    upper: f64,
}

impl Integration {
    /// Validates the interval
    pub fn new(integrand: Integrand, lower: f64, upper: f64) -> Result<Self> {
        if !(lower.is_finite() && upper.is_finite() && lower < upper) {
            return Err(CliError::InvalidArgument(format!(
                "integration bounds must satisfy lower < upper, got [{}, {}]",
                lower, upper
            )));
        }
        Ok(Self {
            integrand,
            lower,
            upper,
        })
    }

    /// Closed-form integral
    pub fn exact(&self) -> f64 {
        let (a, b) = (self.lower, self.upper);
        match self.integrand {
            Integrand::Square => (b * b * b - a * a * a) / 3.0,
            Integrand::Sin => a.cos() - b.cos(),
            Integrand::Exp => b.exp() - a.exp(),
            Integrand::Sphere3d => 1.0,
        }
    }
}

impl<R: Rng> Model<R> for Integration {
    fn trial(&self, rng: &mut R) -> f64 {
        let width = self.upper - self.lower;
        let x = self.lower + width * rng.gen::<f64>();
        match self.integrand {
            Integrand::Square => width * x * x,
            Integrand::Sin => width * x.sin(),
            Integrand::Exp => width * x.exp(),
            Integrand::Sphere3d => {
                let u: f64 = rng.gen();
                let v: f64 = rng.gen();
                let w: f64 = rng.gen();
                u * u + v * v + w * w
            }
        }
    }
}

// ============================================================================
// Dice
// ============================================================================

/// Sum of `dice` fair dice, or the indicator that the sum reaches `target`
#[derive(Debug, Clone, Copy)]
pub struct Dice {
    dice: u32,
    sides: u32,
    target: Option<u32>,
}

impl Dice {
    /// Validates the dice
    pub fn new(dice: u32, sides: u32, target: Option<u32>) -> Result<Self> {
        if dice == 0 || sides < 2 {
            return Err(CliError::InvalidArgument(format!(
                "need at least one die with two or more sides, got {}d{}",
                dice, sides
            )));
        }
        Ok(Self {
            dice,
            sides,
            target,
        })
    }

    /// Expected sum, or the exact probability of reaching the target
    pub fn exact(&self) -> f64 {
        match self.target {
            None => self.dice as f64 * (self.sides as f64 + 1.0) / 2.0,
            Some(target) => self.sum_distribution()
                .iter()
                .enumerate()
                .filter(|(sum, _)| *sum as u64 >= target as u64)
                .map(|(_, p)| p)
                .sum(),
        }
    }

    /// Probability of each total, indexed by the total
    fn sum_distribution(&self) -> Vec<f64> {
        let sides = self.sides as usize;
        let max_total = self.dice as usize * sides;
        let mut dist = vec![0.0; max_total + 1];
        dist[0] = 1.0;
        let face = 1.0 / sides as f64;

        for _ in 0..self.dice {
            let mut next = vec![0.0; max_total + 1];
            for (total, &p) in dist.iter().enumerate().filter(|(_, p)| **p > 0.0) {
                for pips in 1..=sides {
                    next[total + pips] += p * face;
                }
            }
            dist = next;
        }
        dist
    }
}

impl<R: Rng> Model<R> for Dice {
    fn trial(&self, rng: &mut R) -> f64 {
        let total: u32 = (0..self.dice).map(|_| rng.gen_range(1..=self.sides)).sum();
        match self.target {
            None => total as f64,
            Some(target) if total >= target => 1.0,
            Some(_) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use montecarlo_core::make_rng;

    #[test]
    fn test_norm_cdf() {
        assert_relative_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-7);
        assert_relative_eq!(norm_cdf(1.96), 0.975, epsilon = 1e-4);
        assert_relative_eq!(norm_cdf(-1.0) + norm_cdf(1.0), 1.0, epsilon = 1e-7);
    }

    #[test]
    fn test_quarter_circle_outputs() {
        let mut rng = make_rng(1, 0);
        for _ in 0..100 {
            let v = QuarterCircle.trial(&mut rng);
            assert!(v == 0.0 || v == 4.0);
        }
    }

    #[test]
    fn test_black_scholes_reference() {
        let call = EuropeanOption::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionKind::Call).unwrap();
        let put = EuropeanOption::new(100.0, 100.0, 0.05, 0.2, 1.0, OptionKind::Put).unwrap();

        assert_relative_eq!(call.exact(), 10.4506, epsilon = 1e-3);
        // put-call parity
        assert_relative_eq!(
            call.exact() - put.exact(),
            100.0 - 100.0 * (-0.05_f64).exp(),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_option_rejects_bad_inputs() {
        assert!(EuropeanOption::new(-1.0, 100.0, 0.05, 0.2, 1.0, OptionKind::Call).is_err());
        assert!(EuropeanOption::new(100.0, 100.0, 0.05, 0.0, 1.0, OptionKind::Call).is_err());
        assert!(EuropeanOption::new(100.0, 100.0, f64::NAN, 0.2, 1.0, OptionKind::Call).is_err());
    }

    #[test]
    fn test_option_payoffs_non_negative() {
        let put = EuropeanOption::new(100.0, 90.0, 0.01, 0.3, 0.5, OptionKind::Put).unwrap();
        let mut rng = make_rng(3, 0);
        for _ in 0..1000 {
            assert!(put.trial(&mut rng) >= 0.0);
        }
    }

    #[test]
    fn test_integration_exact() {
        let square = Integration::new(Integrand::Square, 0.0, 1.0).unwrap();
        assert_relative_eq!(square.exact(), 1.0 / 3.0, epsilon = 1e-12);

        let sin = Integration::new(Integrand::Sin, 0.0, std::f64::consts::PI).unwrap();
        assert_relative_eq!(sin.exact(), 2.0, epsilon = 1e-12);

        let exp = Integration::new(Integrand::Exp, 0.0, 1.0).unwrap();
        assert_relative_eq!(exp.exact(), std::f64::consts::E - 1.0, epsilon = 1e-12);

        assert!(Integration::new(Integrand::Square, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_integrand_parsing() {
        assert_eq!("SIN".parse::<Integrand>().unwrap(), Integrand::Sin);
        assert_eq!("sphere3d".parse::<Integrand>().unwrap(), Integrand::Sphere3d);
        assert!("tan".parse::<Integrand>().is_err());
    }

    #[test]
    fn test_dice_exact() {
        let one = Dice::new(1, 6, None).unwrap();
        assert_relative_eq!(one.exact(), 3.5, epsilon = 1e-12);

        // 2d6 >= 7: 21 of 36 outcomes
        let two = Dice::new(2, 6, Some(7)).unwrap();
        assert_relative_eq!(two.exact(), 21.0 / 36.0, epsilon = 1e-12);

        let impossible = Dice::new(2, 6, Some(13)).unwrap();
        assert_eq!(impossible.exact(), 0.0);

        assert!(Dice::new(0, 6, None).is_err());
        assert!(Dice::new(1, 1, None).is_err());
    }

    #[test]
    fn test_dice_trial_range() {
        let dice = Dice::new(3, 4, None).unwrap();
        let mut rng = make_rng(9, 0);
        for _ in 0..500 {
            let total = dice.trial(&mut rng);
            assert!((3.0..=12.0).contains(&total));
        }
    }
}
