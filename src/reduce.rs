//! Invocation of the weight-reduction collaborator (`deweight`).
//!
//! The collaborator reads a weighted CNF formula on its standard input and
//! writes an unweighted CNF formula, interleaved with annotation comments
//! (see [`crate::annotation`]), on its standard output. The whole output is
//! spooled into an anonymous temporary file, which later becomes the input of
//! the counter.

use std::fmt;
use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::str::FromStr;

use log::{debug, info};

use crate::error::{Error, Result};

pub const DEFAULT_DEWEIGHT: &str = "deweight/build/deweight";

/// Rounding applied to the weight of the positive literal by the dyadic
/// reduction.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Rounding {
    Down,
    Up,
    Near,
}

impl Rounding {
    pub fn as_str(self) -> &'static str {
        match self {
            Rounding::Down => "down",
            Rounding::Up => "up",
            Rounding::Near => "near",
        }
    }
}

impl FromStr for Rounding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "down" => Ok(Rounding::Down),
            "up" => Ok(Rounding::Up),
            "near" => Ok(Rounding::Near),
            _ => Err(Error::InvalidOption(format!("unknown rounding {:?}", s))),
        }
    }
}

impl fmt::Display for Rounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format of the weight lines in the input CNF.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum WeightFormat {
    Detect,
    Cachet,
    Minic2d,
    Mc20,
}

impl WeightFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            WeightFormat::Detect => "detect",
            WeightFormat::Cachet => "cachet",
            WeightFormat::Minic2d => "minic2d",
            WeightFormat::Mc20 => "mc20",
        }
    }
}

impl FromStr for WeightFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "detect" => Ok(WeightFormat::Detect),
            "cachet" => Ok(WeightFormat::Cachet),
            "minic2d" => Ok(WeightFormat::Minic2d),
            "mc20" => Ok(WeightFormat::Mc20),
            _ => Err(Error::InvalidOption(format!("unknown weight format {:?}", s))),
        }
    }
}

impl fmt::Display for WeightFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options forwarded to the reduction collaborator.
///
/// Unset values (`0` for `dyadic`, `None` otherwise) are omitted from the
/// invocation, so the collaborator falls back to its own defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReductionOptions {
    /// Bits per weight for the dyadic reduction.
    pub dyadic: u32,
    pub rounding: Option<Rounding>,
    pub weights: Option<WeightFormat>,
}

impl ReductionOptions {
    /// Renders the options as `--<name>=<value>` flags.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.dyadic != 0 {
            args.push(format!("--dyadic={}", self.dyadic));
        }
        if let Some(rounding) = self.rounding {
            args.push(format!("--rounding={}", rounding));
        }
        if let Some(weights) = self.weights {
            args.push(format!("--weights={}", weights));
        }
        args
    }
}

/// The reduction collaborator.
#[derive(Debug, Clone)]
pub struct Deweight {
    pub program: PathBuf,
    pub options: ReductionOptions,
    /// Weighted CNF to feed on stdin; the parent's stdin is inherited if unset.
    pub input: Option<PathBuf>,
}

impl Default for Deweight {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_DEWEIGHT),
            options: ReductionOptions::default(),
            input: None,
        }
    }
}

impl Deweight {
    pub fn new(program: impl Into<PathBuf>, options: ReductionOptions) -> Self {
        Self {
            program: program.into(),
            options,
            input: None,
        }
    }

    pub fn with_input(self, input: impl Into<PathBuf>) -> Self {
        Self {
            input: Some(input.into()),
            ..self
        }
    }

    /// Builds the command line for the collaborator.
    ///
    /// The working directory is inherited, so a relative `program` resolves
    /// against the caller's working directory.
    pub fn command(&self) -> Result<Command> {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.options.to_args());
        match &self.input {
            Some(path) => {
                cmd.stdin(File::open(path)?);
            }
            None => {
                cmd.stdin(Stdio::inherit());
            }
        }
        Ok(cmd)
    }

    /// Runs the collaborator to completion and returns its standard output,
    /// rewound to the start.
    pub fn run(&self) -> Result<File> {
        let cmd = self.command()?;
        capture(cmd)
    }
}

/// Runs `cmd` to completion, spooling its standard output into an anonymous
/// temporary file.
///
/// The returned file is positioned at its start. A non-zero exit status is
/// reported as [`Error::CollaboratorFailed`].
pub fn capture(mut cmd: Command) -> Result<File> {
    info!("[DeWeight] {}", render(&cmd));

    let mut formula = tempfile::tempfile()?;
    cmd.stdout(formula.try_clone()?);

    let program = PathBuf::from(cmd.get_program());
    let status = cmd
        .status()
        .map_err(|source| Error::Launch { program: program.clone(), source })?;
    debug!("{} finished with {}", program.display(), status);
    if !status.success() {
        return Err(Error::CollaboratorFailed { program, status });
    }

    formula.seek(SeekFrom::Start(0))?;
    Ok(formula)
}

/// Renders a command line for logging.
pub(crate) fn render(cmd: &Command) -> String {
    let mut parts = vec![Path::new(cmd.get_program()).display().to_string()];
    parts.extend(cmd.get_args().map(|arg| arg.to_string_lossy().into_owned()));
    parts.join(" ")
}
