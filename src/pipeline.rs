//! The end-to-end run: reduction, bound accumulation, counting, estimation.
//!
//! The two collaborators run strictly one after the other. The reduction
//! output is captured in full before the counter starts; the counter output is
//! consumed one line at a time as it is produced.

use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::process::Command;

use log::{info, warn};
use num_bigint::BigUint;
use num_traits::Zero;

use crate::annotation::Reduction;
use crate::bounds::Bounds;
use crate::count::{self, ApproxMc, CountResult, CounterEvent};
use crate::error::{Error, Result};
use crate::estimate::Estimate;
use crate::reduce::{self, Deweight};
use crate::report::Report;

/// Everything one run produced.
///
/// The counting fields are `None` when the counter stopped before reporting
/// them (for example on a timeout).
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub reduction: Reduction,
    pub bounds: Bounds,
    pub counting: Counting,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Counting {
    pub time: Option<String>,
    pub count: Option<CountResult>,
    pub estimate: Option<Estimate>,
}

/// The two collaborators of a run.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub deweight: Deweight,
    pub approxmc: ApproxMc,
}

impl Pipeline {
    pub fn new(deweight: Deweight, approxmc: ApproxMc) -> Self {
        Self { deweight, approxmc }
    }

    pub fn run<W: Write>(&self, report: &mut Report<W>) -> Result<Outcome> {
        run_with(
            self.deweight.command()?,
            self.approxmc.command(),
            self.approxmc.epsilon,
            report,
        )
    }
}

/// Runs the pipeline with explicit collaborator commands.
///
/// `epsilon` must be the tolerance the counter actually runs with.
pub fn run_with<W: Write>(reducer: Command, counter: Command, epsilon: f64, report: &mut Report<W>) -> Result<Outcome> {
    let mut formula = reduce::capture(reducer)?;

    let mut bounds = Bounds::new();
    let reduction = Reduction::scan(BufReader::new(&mut formula), &mut bounds)?;

    if let Some(denom) = &reduction.denom {
        report.pair("Normalization", &denom.text)?;
    }
    if let Some(time) = &reduction.deweight_time {
        report.pair("Deweight Time", time)?;
    }
    report.pair("Weight adjustment", bounds)?;

    let denom = reduction.require_denom()?.value.clone();
    if denom.is_zero() {
        return Err(Error::ZeroDenominator);
    }

    formula.seek(SeekFrom::Start(0))?;
    let mut child = count::spawn(counter, formula)?;
    let Some(stdout) = child.stdout.take() else {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "counter stdout is not piped",
        )));
    };

    let counting = match stream(BufReader::new(stdout), &denom, &bounds, epsilon, report) {
        Ok(counting) => counting,
        Err(e) => {
            // Do not leave the counter running behind a fatal parse error.
            let _ = child.kill();
            let _ = child.wait();
            return Err(e);
        }
    };

    let status = child.wait()?;
    if !status.success() {
        warn!("counter exited with {}", status);
    }
    if counting.count.is_none() {
        warn!("counter did not report a solution count");
    }

    Ok(Outcome {
        reduction,
        bounds,
        counting,
    })
}

/// Consumes counter output line by line, reporting results as they arrive.
///
/// Every line is mirrored to the log. The stream is drained to the end even
/// after the solution count has been seen; once the estimate is out, malformed
/// lines only produce a warning.
pub fn stream<R: BufRead, W: Write>(
    reader: R,
    denom: &BigUint,
    bounds: &Bounds,
    epsilon: f64,
    report: &mut Report<W>,
) -> Result<Counting> {
    let mut counting = Counting::default();
    let mut exact = false;

    for line in reader.lines() {
        let line = line?;
        info!("{}", line);

        let event = match CounterEvent::parse(&line) {
            Ok(event) => event,
            Err(e) if counting.estimate.is_some() => {
                warn!("ignoring counter output after the estimate: {}", e);
                continue;
            }
            Err(e) => return Err(e),
        };

        match event {
            Some(CounterEvent::Finished(time)) => {
                report.pair("ApproxMC Time", &time)?;
                counting.time = Some(time);
            }
            Some(CounterEvent::Exact) => exact = true,
            Some(CounterEvent::Solutions(solutions)) => {
                report.pair("Solutions", &solutions)?;
                let count = CountResult { solutions, exact };
                let estimate = Estimate::new(&count, denom, bounds, epsilon)?;
                report.pair("Probability", estimate.probability)?;
                report.pair("Probability Interval", estimate.interval)?;
                counting.count = Some(count);
                counting.estimate = Some(estimate);
            }
            None => {}
        }
    }

    Ok(counting)
}
