use std::io;
use std::path::PathBuf;

use clap::Parser;

use deweight_rs::count::{ApproxMc, DEFAULT_APPROXMC, DEFAULT_DELTA, DEFAULT_EPSILON};
use deweight_rs::pipeline::Pipeline;
use deweight_rs::reduce::{Deweight, ReductionOptions, Rounding, WeightFormat, DEFAULT_DEWEIGHT};
use deweight_rs::report::Report;

/// A tool to reduce discrete integration to unweighted model counting.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Use dyadic reduction with [arg] bits per weight.
    #[arg(long, value_name = "INT", default_value = "0")]
    dyadic: u32,

    /// Rounding used to adjust weight of positive literal (down, up, near).
    #[arg(long, value_name = "MODE")]
    rounding: Option<Rounding>,

    /// Format of weights to parse from CNF (detect, cachet, minic2d, mc20).
    #[arg(long, value_name = "FORMAT")]
    weights: Option<WeightFormat>,

    /// Path to the deweight binary.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DEWEIGHT)]
    deweight: PathBuf,

    /// Path to the ApproxMC binary.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_APPROXMC)]
    approxmc: PathBuf,

    /// Epsilon for ApproxMC.
    #[arg(long, value_name = "FLOAT", default_value_t = DEFAULT_EPSILON)]
    epsilon: f64,

    /// Delta for ApproxMC.
    #[arg(long, value_name = "FLOAT", default_value_t = DEFAULT_DELTA)]
    delta: f64,

    /// Weighted CNF file (read from stdin if omitted).
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Verbosity of the diagnostic output on stderr.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: simplelog::LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    log::debug!("args = {:?}", args);

    let options = ReductionOptions {
        dyadic: args.dyadic,
        rounding: args.rounding,
        weights: args.weights,
    };
    let mut deweight = Deweight::new(args.deweight, options);
    if let Some(input) = args.input {
        deweight = deweight.with_input(input);
    }
    let approxmc = ApproxMc {
        program: args.approxmc,
        epsilon: args.epsilon,
        delta: args.delta,
    };

    let pipeline = Pipeline::new(deweight, approxmc);
    let mut report = Report::new(io::stdout().lock());
    pipeline.run(&mut report)?;

    Ok(())
}
