//! # deweight-rs: Weighted Model Counting via Unweighted Approximate Counting
//!
//! **`deweight-rs`** estimates the probability mass of the satisfying assignments of a
//! weighted CNF formula, and brackets it with a rigorous interval.
//!
//! ## How it works
//!
//! The weighted problem is handed to an external **reduction** tool (`deweight`), which
//! rewrites it into an *unweighted* CNF formula whose solution count, divided by a
//! normalization denominator, equals the weighted probability. When weights cannot be
//! encoded exactly (e.g. the dyadic reduction rounds each weight to `k / 2^bits`), the
//! tool reports every rounded literal, and we accumulate how far the rounding can move
//! the result.
//!
//! The unweighted formula is then counted by an external **approximate model counter**
//! (ApproxMC), whose answer is within a factor `1 + epsilon` of the true count with
//! probability at least `1 - delta`, unless it certifies the count as exact.
//!
//! Both error sources compose multiplicatively into the final interval:
//!
//! ```text
//! lower = lower_approx * p / (1 + epsilon)
//! upper = upper_approx * p * (1 + epsilon)
//! ```
//!
//! ## Basic Usage
//!
//! ```rust
//! use deweight_rs::bounds::{Adjustment, Bounds};
//! use deweight_rs::estimate::interval;
//! use deweight_rs::rational::Rational;
//!
//! let mut bounds = Bounds::new();
//! bounds.absorb(&Adjustment::new(Rational::new(1, 2), Rational::new(2, 5)));
//!
//! // 12 solutions out of a denominator of 100, certified exact:
//! let p = 12.0 / 100.0;
//! let i = interval(p, &bounds, true, 0.8);
//! assert!(i.lower <= p && p <= i.upper);
//! ```
//!
//! ## Core Components
//!
//! - **[`pipeline`]**: Runs both collaborators and reports results.
//! - **[`annotation`]**: Parses the reduction tool's annotation comments.
//! - **[`bounds`]**: Accumulates the per-literal rounding error.
//! - **[`count`]**: Drives the approximate counter and parses its output.
//! - **[`estimate`]**: Computes the probability and its interval.

pub mod annotation;
pub mod bounds;
pub mod count;
pub mod error;
pub mod estimate;
pub mod pipeline;
pub mod rational;
pub mod reduce;
pub mod report;
pub mod types;

pub use error::{Error, Result};
