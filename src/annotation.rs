//! Annotation lines emitted by the reduction collaborator.
//!
//! The reduced formula is plain DIMACS CNF. Among its comment lines, three
//! shapes carry information for the estimator:
//!
//! ```text
//! c denom <value>                      # normalization denominator
//! c deweight time <seconds>            # reduction time
//! c adjust w <var> <real> to <approx>  # rounded literal weight
//! ```
//!
//! Any other line is ignored.

use std::io::BufRead;

use log::info;
use num_bigint::BigUint;

use crate::bounds::{Adjustment, Bounds};
use crate::error::{Error, Result};
use crate::rational::Rational;
use crate::types::Var;

const DENOM_PREFIX: &str = "c denom";
const TIME_PREFIX: &str = "c deweight time";
const ADJUST_PREFIX: &str = "c adjust w";

/// The normalization denominator, kept both as emitted and as an exact
/// integer. Dyadic reductions routinely push it past `f64::MAX`.
#[derive(Debug, Clone, PartialEq)]
pub struct Denominator {
    pub text: String,
    pub value: BigUint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Denom(Denominator),
    DeweightTime(String),
    Adjust(Adjustment),
}

impl Annotation {
    /// Parses a single line of reduction output.
    ///
    /// Returns `Ok(None)` for lines that are not annotations, and an error for
    /// lines with a known prefix but an unexpected shape.
    pub fn parse(line: &str) -> Result<Option<Annotation>> {
        if line.starts_with(DENOM_PREFIX) {
            let text = value_after(line, DENOM_PREFIX)?;
            let value = text
                .parse::<BigUint>()
                .map_err(|e| Error::annotation(line, format!("bad denominator: {}", e)))?;
            Ok(Some(Annotation::Denom(Denominator {
                text: text.to_string(),
                value,
            })))
        } else if line.starts_with(TIME_PREFIX) {
            let text = value_after(line, TIME_PREFIX)?;
            Ok(Some(Annotation::DeweightTime(text.to_string())))
        } else if line.starts_with(ADJUST_PREFIX) {
            parse_adjustment(line).map(|a| Some(Annotation::Adjust(a)))
        } else {
            Ok(None)
        }
    }
}

/// Last token after `prefix`, which `line` is known to start with.
fn value_after<'a>(line: &'a str, prefix: &str) -> Result<&'a str> {
    line[prefix.len()..]
        .split_whitespace()
        .last()
        .ok_or_else(|| Error::annotation(line, "missing value"))
}

fn parse_adjustment(line: &str) -> Result<Adjustment> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    // c adjust w [<var>] <real> to <approx>
    if tokens.len() < 6 {
        return Err(Error::annotation(line, "expected `<real> to <approx>`"));
    }
    let n = tokens.len();
    let real = Rational::parse(tokens[n - 3])?;
    let approx = Rational::parse(tokens[n - 1])?;
    let adjustment = Adjustment::new(real, approx);

    if n >= 7 {
        let var: Var = tokens[3].parse().map_err(|e: String| Error::annotation(line, e))?;
        Ok(adjustment.with_var(var))
    } else {
        Ok(adjustment)
    }
}

/// Summary of the reduction collaborator's annotations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reduction {
    pub denom: Option<Denominator>,
    pub deweight_time: Option<String>,
    pub adjustments: Vec<Adjustment>,
}

impl Reduction {
    /// Scans reduction output line by line, folding every adjustment into
    /// `bounds`.
    ///
    /// Recognized lines are mirrored to the log. When several `c denom` lines
    /// are present, the last one wins.
    pub fn scan<R: BufRead>(reader: R, bounds: &mut Bounds) -> Result<Reduction> {
        let mut reduction = Reduction::default();

        for line in reader.lines() {
            let line = line?;
            let Some(annotation) = Annotation::parse(&line)? else {
                continue;
            };
            info!("{}", line);
            match annotation {
                Annotation::Denom(denom) => reduction.denom = Some(denom),
                Annotation::DeweightTime(time) => reduction.deweight_time = Some(time),
                Annotation::Adjust(adjustment) => {
                    bounds.absorb(&adjustment);
                    reduction.adjustments.push(adjustment);
                }
            }
        }

        Ok(reduction)
    }

    /// Returns the normalization denominator, which every successful
    /// reduction must report.
    pub fn require_denom(&self) -> Result<&Denominator> {
        self.denom.as_ref().ok_or(Error::MissingDenominator)
    }
}
