use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use sensor_geom_core::{synthetic::plane::random_unit_cube, Pt3, SphericalMeasurement};
use sensor_geom_linear::{LeastSquaresMethod, PlaneFit, PlaneFitOptions, PlaneFitSolver};
use serde::{Deserialize, Serialize};

/// Least-squares plane fitting for sensor-frame point sets.
#[derive(Debug, Parser)]
#[command(author, version, about = "Fit z = a + b*x + c*y to points or spherical measurements")]
struct Args {
    /// Path to JSON file containing a PlaneFitInput.
    #[arg(long, required_unless_present = "random", conflicts_with = "random")]
    input: Option<String>,

    /// Optional path to JSON PlaneFitOptions. Defaults are used if omitted.
    #[arg(long)]
    config: Option<String>,

    /// Fit this many points drawn uniformly from the unit cube instead of reading a file.
    #[arg(long)]
    random: Option<usize>,

    /// Seed for --random.
    #[arg(long, default_value_t = 1_234_567)]
    seed: u64,
}

/// Points to fit, either Cartesian or as raw spherical measurements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum PlaneFitInput {
    Points { points: Vec<Pt3> },
    Measurements { measurements: Vec<SphericalMeasurement> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlaneFitReport {
    method: LeastSquaresMethod,
    #[serde(flatten)]
    fit: PlaneFit,
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(value)
}

fn load_config(config_path: Option<&str>) -> Result<PlaneFitOptions> {
    match config_path {
        Some(path) => load_json_file(Path::new(path)),
        None => Ok(PlaneFitOptions::default()),
    }
}

fn fit_input(input: &PlaneFitInput, opts: &PlaneFitOptions) -> Result<PlaneFitReport> {
    let fit = match input {
        PlaneFitInput::Points { points } => {
            info!("fitting plane to {} points", points.len());
            PlaneFitSolver::fit(points, opts)?
        }
        PlaneFitInput::Measurements { measurements } => {
            info!("fitting plane to {} spherical measurements", measurements.len());
            PlaneFitSolver::from_measurements(measurements, opts)?
        }
    };
    Ok(PlaneFitReport {
        method: opts.method,
        fit,
    })
}

fn run_plane_fit_from_files(input_path: &str, config_path: Option<&str>) -> Result<String> {
    let input: PlaneFitInput = load_json_file(Path::new(input_path))?;
    let opts = load_config(config_path)?;
    let report = fit_input(&input, &opts).context("plane fit failed")?;
    Ok(serde_json::to_string_pretty(&report)?)
}

fn run_plane_fit_random(n: usize, seed: u64, config_path: Option<&str>) -> Result<String> {
    let opts = load_config(config_path)?;
    let input = PlaneFitInput::Points {
        points: random_unit_cube(n, seed),
    };
    let report = fit_input(&input, &opts).context("plane fit failed")?;
    Ok(serde_json::to_string_pretty(&report)?)
}

fn main() {
    env_logger::init();
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    let args = Args::parse();
    let json = match (args.input.as_deref(), args.random) {
        (Some(input), _) => run_plane_fit_from_files(input, args.config.as_deref())?,
        (None, Some(n)) => run_plane_fit_random(n, args.seed, args.config.as_deref())?,
        (None, None) => anyhow::bail!("either --input or --random is required"),
    };
    println!("{}", json);
    Ok(())
}
