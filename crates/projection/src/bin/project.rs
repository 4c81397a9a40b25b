//! Command-line front end for projection pipelines.
//!
//! Reads coordinate pairs from the arguments or, when none are given, one
//! pair per line from stdin, and prints the projected pairs to stdout.
//! Points a projection cannot represent print as `NaN NaN`.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use projection::{FieldSource, GeographicProjection, ProjectionConfig};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "airocean-project")]
#[command(about = "Project coordinates through an Airocean projection pipeline")]
struct Args {
    /// Projection config file (.json, .yaml or .yml)
    #[arg(short, long, env = "AIROCEAN_CONFIG")]
    config: Option<String>,

    /// Conformal field table for the standard world map, used when no
    /// config is given
    #[arg(short, long, env = "AIROCEAN_FIELD")]
    field: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Geodetic (lon lat) to projected (x y)
    Forward {
        /// Flat list of lon lat pairs
        #[arg(allow_negative_numbers = true)]
        coords: Vec<f64>,
    },
    /// Projected (x y) to geodetic (lon lat)
    Inverse {
        /// Flat list of x y pairs
        #[arg(allow_negative_numbers = true)]
        coords: Vec<f64>,
    },
    /// Print the projected bounds and meters per unit
    Info,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Results go to stdout, so logs go to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = match (&args.config, &args.field) {
        (Some(path), _) => ProjectionConfig::from_file(path)
            .with_context(|| format!("loading projection config {}", path))?,
        (None, Some(field)) => ProjectionConfig::bte_world(FieldSource::path(field)),
        (None, None) => bail!("either --config or --field is required"),
    };

    let projection = config.build().context("building projection")?;
    info!(meters_per_unit = projection.meters_per_unit(), "Projection ready");

    match args.command {
        Command::Forward { coords } => run(&coords, |a, b| projection.from_geodetic(a, b)),
        Command::Inverse { coords } => run(&coords, |a, b| projection.to_geodetic(a, b)),
        Command::Info => {
            let b = projection.bounds();
            println!("bounds: x [{}, {}], y [{}, {}]", b.min_x, b.max_x, b.min_z, b.max_z);
            println!("meters_per_unit: {}", projection.meters_per_unit());
            Ok(())
        }
    }
}

fn run<F>(coords: &[f64], f: F) -> Result<()>
where
    F: Fn(f64, f64) -> geo_common::GeoResult<(f64, f64)>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let emit = |a: f64, b: f64, out: &mut dyn Write| -> Result<()> {
        match f(a, b) {
            Ok((x, y)) => writeln!(out, "{} {}", x, y)?,
            Err(e) if e.is_recoverable() => {
                warn!(a, b, error = %e, "Point skipped");
                writeln!(out, "NaN NaN")?;
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    };

    if !coords.is_empty() {
        if coords.len() % 2 != 0 {
            bail!("expected an even number of coordinates, got {}", coords.len());
        }
        for pair in coords.chunks_exact(2) {
            emit(pair[0], pair[1], &mut out)?;
        }
        return Ok(());
    }

    for (n, line) in io::stdin().lock().lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let values = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .map(str::parse::<f64>)
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("line {}: {:?}", n + 1, line))?;
        match values.as_slice() {
            [a, b] => emit(*a, *b, &mut out)?,
            _ => bail!("line {}: expected two numbers, got {:?}", n + 1, line),
        }
    }
    Ok(())
}
