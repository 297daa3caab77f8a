//! Multiplicative bounds on the error introduced by the weight reduction.
//!
//! Each weighted variable whose weight was rounded by the reduction contributes
//! one [`Adjustment`]. Since the weight of a solution is a product of literal
//! weights, per-literal correction ratios compose multiplicatively, and
//! [`Bounds`] keeps the running products for the lower and upper side.

use std::fmt;

use crate::rational::Rational;
use crate::types::Var;

/// The true weight of a positive literal and the weight the reduction used
/// in its place.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Adjustment {
    pub var: Option<Var>,
    pub real: Rational,
    pub approx: Rational,
}

impl Adjustment {
    pub fn new(real: Rational, approx: Rational) -> Self {
        Self { var: None, real, approx }
    }

    pub fn with_var(self, var: Var) -> Self {
        Self { var: Some(var), ..self }
    }
}

/// Running multiplicative correction factors `(lower, upper)`.
///
/// Both start at `1.0` and are only ever divided by per-literal ratios.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self { lower: 1.0, upper: 1.0 }
    }
}

impl Bounds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one literal adjustment into the bounds.
    ///
    /// When `approx == real` the second branch is taken; both ratios are 1.
    pub fn absorb(&mut self, adjustment: &Adjustment) {
        let real = adjustment.real.value();
        let approx = adjustment.approx.value();

        if approx < real {
            // Positive literal was under-approximated.
            self.upper /= approx / real;
            self.lower /= (1.0 - approx) / (1.0 - real);
        } else {
            // Negative literal was under-approximated.
            self.lower /= approx / real;
            self.upper /= (1.0 - approx) / (1.0 - real);
        }
    }
}

impl<'a> Extend<&'a Adjustment> for Bounds {
    fn extend<I: IntoIterator<Item = &'a Adjustment>>(&mut self, iter: I) {
        for adjustment in iter {
            self.absorb(adjustment);
        }
    }
}

impl<'a> FromIterator<&'a Adjustment> for Bounds {
    fn from_iter<I: IntoIterator<Item = &'a Adjustment>>(iter: I) -> Self {
        let mut bounds = Bounds::new();
        bounds.extend(iter);
        bounds
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.lower, self.upper)
    }
}
