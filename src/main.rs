//! Vayura command-line calculator
//!
//! Reads a district's environmental profile as JSON and prints the oxygen
//! demand breakdown and tree requirement as JSON.
//!
//! # Usage
//!
//! ```bash
//! echo '{"district_name":"Delhi","population":12765000,"aqi":156.5,"soil_quality":65.0,"disaster_frequency":3.2}' \
//!   | vayura calculate --request - --pretty
//! vayura calculate --request district.json --parameters calculator.toml
//! vayura parameters > calculator.toml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vayura_core::{CalculationRequest, CalculatorParameters, OxygenDemandCalculator};

const SERVICE_NAME: &str = "oxygen-calculator";

/// District oxygen demand and tree requirement calculator
#[derive(Parser, Debug)]
#[command(name = "vayura", version)]
#[command(about = "Calculate district-level oxygen demand and tree requirements")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the calculation for one district
    Calculate {
        /// JSON request file, or `-` for stdin
        #[arg(short, long)]
        request: PathBuf,

        /// TOML file overriding the default parameters
        #[arg(short, long)]
        parameters: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print the effective parameters as TOML
    Parameters {
        /// TOML file overriding the default parameters
        #[arg(short, long)]
        parameters: Option<PathBuf>,
    },
    /// Print a liveness payload
    Health,
}

#[derive(Serialize, Debug)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Calculate {
            request,
            parameters,
            pretty,
        } => {
            let calculator = load_calculator(parameters.as_deref())?;
            let request = read_request(&request)?;
            let advisory_max = calculator.parameters().advisory_max_disaster_frequency;
            if request.disaster_frequency > advisory_max {
                warn!(
                    disaster_frequency = request.disaster_frequency,
                    advisory_max,
                    "Disaster frequency is above the observed range; the factor is capped"
                );
            }
            let result = calculator
                .calculate(&request)
                .with_context(|| format!("Calculation failed for {}", request.district_name))?;
            info!(trees_required = result.trees_required, "Calculation complete");
            println!("{}", to_json(&result, pretty)?);
        }
        Command::Parameters { parameters } => {
            let calculator = load_calculator(parameters.as_deref())?;
            print!("{}", calculator.parameters().to_toml_string()?);
        }
        Command::Health => {
            let health = HealthResponse {
                status: "healthy",
                service: SERVICE_NAME,
                version: env!("CARGO_PKG_VERSION"),
            };
            println!("{}", to_json(&health, false)?);
        }
    }
    Ok(())
}

fn load_calculator(path: Option<&Path>) -> Result<OxygenDemandCalculator> {
    let parameters = match path {
        Some(path) => {
            info!(path = %path.display(), "Using parameters file");
            CalculatorParameters::from_file(path)?
        }
        None => CalculatorParameters::default(),
    };
    Ok(OxygenDemandCalculator::from_parameters(parameters)?)
}

fn read_request(path: &Path) -> Result<CalculationRequest> {
    let document = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read request from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request {}", path.display()))?
    };
    parse_request(&document)
}

fn parse_request(document: &str) -> Result<CalculationRequest> {
    serde_json::from_str(document).context("Request is not a valid CalculationRequest")
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
