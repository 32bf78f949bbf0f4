//! boxcat - Concatenate the bounding boxes aligned to each time point
//!
//! Reads an MMIF document, merges every group of boxes aligned to the same
//! time point into one enclosing box, and writes the document back with the
//! merged boxes in a new view.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use boxcat_core::api::{ConcatOptions, concatenate};
use boxcat_core::metadata::app_metadata;
use boxcat_core::model::Document;
use boxcat_core::params::{BOX_TYPE_PARAM, DEFAULT_BOX_TYPE, TIME_UNIT_PARAM, TimeUnit};
use clap::{ArgAction, Parser, ValueEnum};
use indexmap::IndexMap;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Unit stamped on emitted time points.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum TimeUnitArg {
    /// Frame numbers (default)
    #[default]
    Frames,
    /// Seconds
    Seconds,
    /// Milliseconds
    Milliseconds,
}

impl From<TimeUnitArg> for TimeUnit {
    fn from(arg: TimeUnitArg) -> Self {
        match arg {
            TimeUnitArg::Frames => Self::Frames,
            TimeUnitArg::Seconds => Self::Seconds,
            TimeUnitArg::Milliseconds => Self::Milliseconds,
        }
    }
}

/// Merge the bounding boxes aligned to each time point of an MMIF document
/// into one enclosing box per time point.
#[derive(Parser, Debug)]
#[command(name = "boxcat")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input MMIF file, or "-" for stdin
    #[arg(default_value = "-")]
    input: String,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Unit stamped on emitted time points
    #[arg(short = 'u', long = "time-unit", value_enum, default_value = "frames")]
    time_unit: TimeUnitArg,

    /// Only boxes of this category are merged; emitted boxes carry it too
    #[arg(short = 'b', long = "box-type", default_value = DEFAULT_BOX_TYPE)]
    box_type: String,

    /// Pretty-print the output document
    #[arg(short = 'p', long, action = ArgAction::SetTrue)]
    pretty: bool,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Print the app metadata and exit
    #[arg(long, action = ArgAction::SetTrue)]
    metadata: bool,
}

/// Installs the stderr log subscriber. `RUST_LOG` wins unless `--debug` is
/// given.
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn read_input(path: &str) -> Result<String> {
    let mut buf = String::new();
    if path == "-" {
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
    } else {
        File::open(path)
            .and_then(|mut f| f.read_to_string(&mut buf))
            .with_context(|| format!("failed to read {}", path))?;
    }
    Ok(buf)
}

fn open_output(path: &str) -> Result<Box<dyn Write>> {
    if path == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    let file =
        File::create(path).with_context(|| format!("failed to create output file {}", path))?;
    Ok(Box::new(BufWriter::new(file)))
}

fn write_json(output: &mut dyn Write, json: &str) -> Result<()> {
    output.write_all(json.as_bytes())?;
    output.write_all(b"\n")?;
    output.flush()?;
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    if args.metadata {
        let mut output = open_output(&args.outfile)?;
        return write_json(&mut *output, &app_metadata().to_json(true)?);
    }

    let time_unit: TimeUnit = args.time_unit.into();
    let parameters = IndexMap::from([
        (TIME_UNIT_PARAM.to_string(), vec![time_unit.to_string()]),
        (BOX_TYPE_PARAM.to_string(), vec![args.box_type.clone()]),
    ]);
    let options = ConcatOptions {
        pretty: args.pretty,
        ..ConcatOptions::from_parameters(parameters)?
    };

    let json = read_input(&args.input)?;
    let mut doc = Document::from_json(&json)
        .with_context(|| format!("{} is not a valid MMIF document", args.input))?;
    let summary = concatenate(&mut doc, Some(options))
        .with_context(|| format!("failed to process {}", args.input))?;
    info!(
        view = %summary.view_id,
        groups = summary.groups,
        boxes = summary.boxes,
        "concatenated boxes"
    );

    // Only open the output once processing succeeded, so a failed run
    // leaves no file behind.
    let mut output = open_output(&args.outfile)?;
    write_json(&mut *output, &doc.to_json(args.pretty)?)
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.debug);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
