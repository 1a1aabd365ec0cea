use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, ValueEnum};
use solar_cli::{EARTH_LIKE, init_logging, resolve_orbit};
use solar_kepler::export::ephemeris::{
    EphemerisDocument, sample_orbit, write_csv, write_json, writer_for_path,
};
use solar_kepler::time::days_to_seconds;

/// Tabulate position and velocity of a body over a time span.
#[derive(Parser, Debug)]
#[command(author, version, about = "Ephemeris table generator (two-body, universal variables)")]
struct Cli {
    /// Body name from the catalogue (case-insensitive), or `earth-like`
    #[arg(long, default_value = EARTH_LIKE)]
    body: String,

    /// Body catalogue: YAML list, TOML file, or directory of TOML files
    #[arg(long, default_value = "configs/bodies")]
    bodies: PathBuf,

    /// First sample, in days after the body's epoch
    #[arg(long, default_value_t = 0.0)]
    start_days: f64,

    /// Length of the table in days
    #[arg(long, default_value_t = 365.0)]
    days: f64,

    /// Spacing between samples in days
    #[arg(long, default_value_t = 1.0)]
    step_days: f64,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,

    /// Output path (`-` for stdout)
    #[arg(long, default_value = "-")]
    output: PathBuf,
}

#[derive(Copy, Clone, ValueEnum, Debug)]
enum Format {
    Csv,
    Json,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    if cli.days < 0.0 {
        return Err(anyhow!("--days must not be negative"));
    }

    let orbit = resolve_orbit(&cli.body, &cli.bodies)?;
    let start_s = days_to_seconds(cli.start_days);
    let end_s = days_to_seconds(cli.start_days + cli.days);
    let samples = sample_orbit(&orbit, start_s, end_s, days_to_seconds(cli.step_days))?;

    let unconverged = samples.iter().filter(|s| !s.converged).count();
    if unconverged > 0 {
        tracing::warn!(unconverged, "some samples hit the iteration cap");
    }

    let mut writer = writer_for_path(&cli.output)?;
    match cli.format {
        Format::Csv => write_csv(writer.as_mut(), &samples)?,
        Format::Json => {
            let document = EphemerisDocument {
                body: &cli.body,
                central_mass_kg: orbit.central_mass_kg(),
                alpha_per_m: orbit.alpha(),
                period_s: orbit.period_seconds(),
                samples: &samples,
            };
            write_json(writer.as_mut(), &document)?;
        }
    }

    Ok(())
}
