//! Invocation of the approximate model counter (ApproxMC) and parsing of its
//! output stream.
//!
//! Recognized output lines:
//!
//! ```text
//! [appmc] FINISHED AppMC T: <time> s
//! ... i.e. we got exact count ...
//! [appmc] Number of solutions is: <A>*2**<B>
//! ```

use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};

use log::info;
use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::reduce::render;

pub const DEFAULT_APPROXMC: &str = "./approxmc";
pub const DEFAULT_EPSILON: f64 = 0.8;
pub const DEFAULT_DELTA: f64 = 0.2;

const FINISHED_PREFIX: &str = "[appmc] FINISHED AppMC T:";
const EXACT_MARKER: &str = "i.e. we got exact count";
const SOLUTIONS_PREFIX: &str = "[appmc] Number of solutions is:";

/// The approximate counting collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ApproxMc {
    pub program: PathBuf,
    /// Tolerance: the count is within a factor `1 + epsilon` of the truth.
    pub epsilon: f64,
    /// Confidence: the tolerance holds with probability at least `1 - delta`.
    pub delta: f64,
}

impl Default for ApproxMc {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_APPROXMC),
            epsilon: DEFAULT_EPSILON,
            delta: DEFAULT_DELTA,
        }
    }
}

impl ApproxMc {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            ..Self::default()
        }
    }

    /// Command-line flags; epsilon and delta are only passed when they differ
    /// from the counter's own defaults.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["--sparse".to_string(), "1".to_string()];
        if self.epsilon != DEFAULT_EPSILON {
            args.push("--epsilon".to_string());
            args.push(self.epsilon.to_string());
        }
        if self.delta != DEFAULT_DELTA {
            args.push("--delta".to_string());
            args.push(self.delta.to_string());
        }
        args
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.to_args());
        cmd
    }

    /// Spawns the counter with `formula` as its standard input.
    pub fn spawn(&self, formula: File) -> Result<Child> {
        spawn(self.command(), formula)
    }
}

/// Spawns `cmd` reading from `formula` with a piped standard output.
pub fn spawn(mut cmd: Command, formula: File) -> Result<Child> {
    info!("[DeWeight] {}", render(&cmd));
    let program = PathBuf::from(cmd.get_program());
    cmd.stdin(formula)
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|source| Error::Launch { program, source })
}

/// A solution count reported as `mantissa * 2^exponent`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Solutions {
    pub mantissa: BigUint,
    pub exponent: u32,
}

impl Solutions {
    /// Parses the `A*2**B` form.
    pub fn parse(s: &str) -> Option<Solutions> {
        let (mantissa, power) = s.split_once('*')?;
        let exponent = power.strip_prefix("2**")?;
        Some(Solutions {
            mantissa: mantissa.parse().ok()?,
            exponent: exponent.parse().ok()?,
        })
    }

    /// Returns `mantissa * 2^exponent`.
    pub fn value(&self) -> BigUint {
        &self.mantissa << self.exponent
    }
}

impl fmt::Display for Solutions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// A recognized line of counter output.
#[derive(Debug, Clone, PartialEq)]
pub enum CounterEvent {
    /// Elapsed time, as reported.
    Finished(String),
    Exact,
    Solutions(Solutions),
}

impl CounterEvent {
    /// Parses a single line of counter output.
    ///
    /// Returns `Ok(None)` for unrecognized lines, and an error for lines with a
    /// known prefix but an unexpected shape.
    pub fn parse(line: &str) -> Result<Option<CounterEvent>> {
        if line.starts_with(FINISHED_PREFIX) {
            let tokens: Vec<&str> = line.split_whitespace().collect();
            // "[appmc] FINISHED AppMC T:" followed by "<time> <units>"
            if tokens.len() < 6 {
                return Err(Error::counter_output(line, "expected `<time> <units>`"));
            }
            Ok(Some(CounterEvent::Finished(tokens[tokens.len() - 2].to_string())))
        } else if line.contains(EXACT_MARKER) {
            Ok(Some(CounterEvent::Exact))
        } else if line.starts_with(SOLUTIONS_PREFIX) {
            let last = line
                .split_whitespace()
                .last()
                .ok_or_else(|| Error::counter_output(line, "missing count"))?;
            let solutions = Solutions::parse(last).ok_or_else(|| Error::counter_output(line, "expected `A*2**B`"))?;
            Ok(Some(CounterEvent::Solutions(solutions)))
        } else {
            Ok(None)
        }
    }
}

/// The final count, together with whether the counter certified it exact.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CountResult {
    pub solutions: Solutions,
    pub exact: bool,
}

#[cfg(test)]
mod tests {
    use num_bigint::ToBigUint;

    use super::*;

    #[test]
    fn test_args_default() {
        let approxmc = ApproxMc::default();
        assert_eq!(approxmc.to_args(), vec!["--sparse", "1"]);
    }

    #[test]
    fn test_args_custom() {
        let approxmc = ApproxMc {
            epsilon: 0.5,
            delta: 0.05,
            ..ApproxMc::new("/opt/approxmc")
        };
        assert_eq!(
            approxmc.to_args(),
            vec!["--sparse", "1", "--epsilon", "0.5", "--delta", "0.05"]
        );
        assert_eq!(
            render(&approxmc.command()),
            "/opt/approxmc --sparse 1 --epsilon 0.5 --delta 0.05"
        );
    }

    #[test]
    fn test_args_only_delta() {
        let approxmc = ApproxMc {
            delta: 0.1,
            ..ApproxMc::default()
        };
        assert_eq!(approxmc.to_args(), vec!["--sparse", "1", "--delta", "0.1"]);
    }

    #[test]
    fn test_default_program_resolves_from_working_directory() {
        let cmd = ApproxMc::default().command();
        assert_eq!(cmd.get_program(), DEFAULT_APPROXMC);
        assert_eq!(cmd.get_current_dir(), None);
    }

    #[test]
    fn test_solutions_parse() {
        let s = Solutions::parse("3*2**2").unwrap();
        assert_eq!(s.mantissa, 3.to_biguint().unwrap());
        assert_eq!(s.exponent, 2);
        assert_eq!(s.value(), 12.to_biguint().unwrap());
        assert_eq!(s.to_string(), "12");
    }

    #[test]
    fn test_solutions_zero_exponent() {
        let s = Solutions::parse("417*2**0").unwrap();
        assert_eq!(s.value(), 417.to_biguint().unwrap());
    }

    #[test]
    fn test_solutions_large() {
        let s = Solutions::parse("5*2**100").unwrap();
        let expected = 5.to_biguint().unwrap() * 2.to_biguint().unwrap().pow(100);
        assert_eq!(s.value(), expected);
        assert_eq!(Solutions::parse("1*2**1099").unwrap().value().bits(), 1100);
    }

    #[test]
    fn test_solutions_malformed() {
        for s in ["", "12", "3*2", "3*3**2", "x*2**2", "3*2**y", "3*2**-1", "-3*2**1"] {
            assert_eq!(Solutions::parse(s), None, "{:?}", s);
        }
    }

    #[test]
    fn test_event_finished() {
        let e = CounterEvent::parse("[appmc] FINISHED AppMC T: 0.04 s").unwrap();
        assert_eq!(e, Some(CounterEvent::Finished("0.04".to_string())));
        assert!(CounterEvent::parse("[appmc] FINISHED AppMC T:").is_err());
    }

    #[test]
    fn test_event_exact() {
        let line = "[appmc] Found exact count, i.e. we got exact count, no need to continue";
        assert_eq!(CounterEvent::parse(line).unwrap(), Some(CounterEvent::Exact));
    }

    #[test]
    fn test_event_solutions() {
        let e = CounterEvent::parse("[appmc] Number of solutions is: 3*2**2").unwrap();
        assert_eq!(e, Some(CounterEvent::Solutions(Solutions::parse("3*2**2").unwrap())));
        assert!(matches!(
            CounterEvent::parse("[appmc] Number of solutions is: twelve"),
            Err(Error::CounterOutput { .. })
        ));
    }

    #[test]
    fn test_event_ignored() {
        for line in ["", "c o ApproxMC version 4", "[appmc] Using start iteration 0", "s mc 12"] {
            assert_eq!(CounterEvent::parse(line).unwrap(), None, "{:?}", line);
        }
    }
}
