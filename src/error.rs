use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors raised while running the deweight pipeline.
///
/// Missing counter output is not an error: the pipeline reports whatever it
/// managed to collect and leaves the rest as `None`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A collaborator binary could not be spawned.
    #[error("failed to launch {}: {source}", program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The reduction collaborator exited unsuccessfully.
    #[error("{} exited with {status}", program.display())]
    CollaboratorFailed { program: PathBuf, status: ExitStatus },

    #[error("invalid rational {0:?}")]
    Rational(String),

    /// A reduction annotation with a known prefix but an unexpected shape.
    #[error("malformed annotation {line:?}: {reason}")]
    Annotation { line: String, reason: String },

    /// A counter line with a known prefix but an unexpected shape.
    #[error("malformed counter output {line:?}: {reason}")]
    CounterOutput { line: String, reason: String },

    #[error("reduction output has no `c denom` line")]
    MissingDenominator,

    #[error("normalization denominator is zero")]
    ZeroDenominator,

    /// `solutions / denom` does not fit in an `f64`.
    #[error("probability {solutions}/{denom} is not a finite float")]
    Unrepresentable { solutions: String, denom: String },

    #[error("invalid option: {0}")]
    InvalidOption(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn annotation(line: &str, reason: impl Into<String>) -> Self {
        Error::Annotation {
            line: line.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn counter_output(line: &str, reason: impl Into<String>) -> Self {
        Error::CounterOutput {
            line: line.to_string(),
            reason: reason.into(),
        }
    }
}
