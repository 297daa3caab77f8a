use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A non-negative rational weight `num/denom`.
///
/// # Invariants
///
/// - `denom != 0`
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Rational {
    num: u64,
    denom: u64,
}

impl Rational {
    /// Creates a new rational.
    ///
    /// # Panics
    ///
    /// Panics if `denom == 0`.
    pub fn new(num: u64, denom: u64) -> Self {
        assert_ne!(denom, 0, "Denominator must be non-zero");
        Rational { num, denom }
    }

    /// Parses a rational from its `"p/q"` textual form.
    pub fn parse(s: &str) -> Result<Self> {
        let (num, denom) = s.split_once('/').ok_or_else(|| Error::Rational(s.to_string()))?;
        let num: u64 = num.parse().map_err(|_| Error::Rational(s.to_string()))?;
        let denom: u64 = denom.parse().map_err(|_| Error::Rational(s.to_string()))?;
        if denom == 0 {
            return Err(Error::Rational(s.to_string()));
        }
        Ok(Rational { num, denom })
    }

    pub fn num(self) -> u64 {
        self.num
    }

    pub fn denom(self) -> u64 {
        self.denom
    }

    /// Returns the value `num / denom` as a floating-point number.
    pub fn value(self) -> f64 {
        self.num as f64 / self.denom as f64
    }
}

impl FromStr for Rational {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rational::parse(s)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.denom)
    }
}

impl From<Rational> for f64 {
    fn from(r: Rational) -> Self {
        r.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let r = Rational::parse("3/8").unwrap();
        assert_eq!(r.num(), 3);
        assert_eq!(r.denom(), 8);
        assert_eq!(r.value(), 0.375);
        assert_eq!(r.to_string(), "3/8");
    }

    #[test]
    fn test_parse_from_str() {
        let r: Rational = "1/2".parse().unwrap();
        assert_eq!(r, Rational::new(1, 2));
        assert_eq!(f64::from(r), 0.5);
    }

    #[test]
    fn test_parse_zero_numerator() {
        let r = Rational::parse("0/5").unwrap();
        assert_eq!(r.value(), 0.0);
    }

    #[test]
    fn test_parse_zero_denominator() {
        assert!(matches!(Rational::parse("1/0"), Err(Error::Rational(_))));
    }

    #[test]
    fn test_parse_malformed() {
        for s in ["", "1", "1/", "/2", "a/2", "1/b", "1/2/3", "-1/2", "0.5"] {
            assert!(Rational::parse(s).is_err(), "{:?} should not parse", s);
        }
    }

    #[test]
    #[should_panic(expected = "Denominator must be non-zero")]
    fn test_new_zero_denominator_panics() {
        Rational::new(1, 0);
    }
}
