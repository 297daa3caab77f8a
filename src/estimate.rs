//! Combining the count, the reduction bounds, and the counter's guarantee into
//! a probability interval.

use std::fmt;

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::bounds::Bounds;
use crate::count::CountResult;
use crate::error::{Error, Result};

/// A probability interval `[lower, upper]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    pub fn contains(&self, p: f64) -> bool {
        self.lower <= p && p <= self.upper
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}

/// Widest operand that still converts to a finite `f64`.
const MAX_F64_BITS: u64 = 1023;

/// Normalizes a solution count into a probability.
///
/// Both operands may be far beyond `f64::MAX`. They are shifted right by the
/// same amount until they fit, which keeps the ratio. A zero denominator or a
/// ratio that is still not finite is rejected rather than producing `inf` or
/// `NaN`.
pub fn probability(solutions: &BigUint, denom: &BigUint) -> Result<f64> {
    if denom.is_zero() {
        return Err(Error::ZeroDenominator);
    }

    let shift = solutions.bits().max(denom.bits()).saturating_sub(MAX_F64_BITS);
    let num = (solutions >> shift).to_f64().unwrap_or(f64::INFINITY);
    let den = (denom >> shift).to_f64().unwrap_or(f64::INFINITY);

    let p = num / den;
    if !p.is_finite() {
        return Err(Error::Unrepresentable {
            solutions: solutions.to_string(),
            denom: denom.to_string(),
        });
    }
    Ok(p)
}

/// Computes the final interval around `probability`.
///
/// An exact count only carries the reduction bounds. Otherwise the counter's
/// `(1 + epsilon)` tolerance widens both sides multiplicatively.
pub fn interval(probability: f64, bounds: &Bounds, exact: bool, epsilon: f64) -> Interval {
    if exact {
        Interval {
            lower: bounds.lower * probability,
            upper: bounds.upper * probability,
        }
    } else {
        Interval {
            lower: bounds.lower * probability / (1.0 + epsilon),
            upper: bounds.upper * probability * (1.0 + epsilon),
        }
    }
}

/// A finished estimate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Estimate {
    pub probability: f64,
    pub interval: Interval,
}

impl Estimate {
    pub fn new(count: &CountResult, denom: &BigUint, bounds: &Bounds, epsilon: f64) -> Result<Estimate> {
        let probability = probability(&count.solutions.value(), denom)?;
        Ok(Estimate {
            probability,
            interval: interval(probability, bounds, count.exact, epsilon),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::count::Solutions;

    fn big(n: u32) -> BigUint {
        BigUint::from(n)
    }

    fn pow2(k: u32) -> BigUint {
        BigUint::from(1u32) << k
    }

    #[test]
    fn test_probability() {
        assert_eq!(probability(&big(12), &big(100)).unwrap(), 0.12);
        assert_eq!(probability(&big(0), &big(8)).unwrap(), 0.0);
        assert!(matches!(probability(&big(12), &big(0)), Err(Error::ZeroDenominator)));
    }

    #[test]
    fn test_probability_beyond_f64_range() {
        assert_eq!(probability(&pow2(1099), &pow2(1100)).unwrap(), 0.5);
        assert_eq!(probability(&(big(3) << 2000u32), &(big(4) << 2000u32)).unwrap(), 0.75);
        // Only the denominator overflows.
        assert_eq!(probability(&pow2(1000), &pow2(1100)).unwrap(), 2f64.powi(-100));
    }

    #[test]
    fn test_probability_unrepresentable() {
        assert!(matches!(
            probability(&pow2(1100), &big(1)),
            Err(Error::Unrepresentable { .. })
        ));
    }

    #[test]
    fn test_interval_exact() {
        let bounds = Bounds { lower: 0.8, upper: 1.25 };
        let i = interval(0.12, &bounds, true, 0.8);
        assert_eq!(i.lower, 0.8 * 0.12);
        assert_eq!(i.upper, 1.25 * 0.12);
    }

    #[test]
    fn test_interval_exact_ignores_epsilon() {
        let bounds = Bounds { lower: 0.9, upper: 1.1 };
        assert_eq!(interval(0.3, &bounds, true, 0.1), interval(0.3, &bounds, true, 5.0));
    }

    #[test]
    fn test_interval_approximate() {
        let bounds = Bounds { lower: 0.8, upper: 1.25 };
        let i = interval(0.12, &bounds, false, 0.8);
        assert_eq!(i.lower, 0.8 * 0.12 / 1.8);
        assert_eq!(i.upper, 1.25 * 0.12 * 1.8);
        assert!(i.contains(0.12));
    }

    #[test]
    fn test_interval_widens_with_epsilon() {
        let bounds = Bounds { lower: 0.95, upper: 1.07 };
        let mut prev = interval(0.4, &bounds, false, 0.0);
        for k in 1..=40 {
            let epsilon = k as f64 * 0.05;
            let next = interval(0.4, &bounds, false, epsilon);
            assert!(next.lower <= prev.lower, "lower grew at epsilon={}", epsilon);
            assert!(next.upper >= prev.upper, "upper shrank at epsilon={}", epsilon);
            prev = next;
        }
    }

    #[test]
    fn test_estimate() {
        let count = CountResult {
            solutions: Solutions::parse("3*2**2").unwrap(),
            exact: true,
        };
        let bounds = Bounds::new();
        let estimate = Estimate::new(&count, &big(100), &bounds, 0.8).unwrap();
        assert_eq!(estimate.probability, 0.12);
        assert_eq!(estimate.interval, Interval { lower: 0.12, upper: 0.12 });
        assert_eq!(estimate.interval.to_string(), "[0.12, 0.12]");
    }

    #[test]
    fn test_estimate_zero_denom() {
        let count = CountResult {
            solutions: Solutions::parse("1*2**0").unwrap(),
            exact: false,
        };
        assert!(matches!(
            Estimate::new(&count, &big(0), &Bounds::new(), 0.8),
            Err(Error::ZeroDenominator)
        ));
    }

    #[test]
    fn test_estimate_huge_counts() {
        let count = CountResult {
            solutions: Solutions::parse("1*2**1099").unwrap(),
            exact: true,
        };
        let estimate = Estimate::new(&count, &pow2(1100), &Bounds::new(), 0.8).unwrap();
        assert_eq!(estimate.probability, 0.5);
        assert_eq!(estimate.interval, Interval { lower: 0.5, upper: 0.5 });
    }
}
