use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use solar_cli::{EARTH_LIKE, init_logging, resolve_orbit};
use solar_kepler::config::{SimulationConfig, load_simulation};
use solar_kepler::orbits::{Maneuver, Orbit, OrbitTracker};
use solar_kepler::time::{SimulationClock, days_to_seconds};
use solar_kepler::units::m_to_au;

/// Apply a held burn to a body and report the re-derived orbit.
#[derive(Parser, Debug)]
#[command(author, version, about = "Impulsive burn planner (two-body, universal variables)")]
struct Cli {
    /// Body name from the catalogue (case-insensitive), or `earth-like`
    #[arg(long, default_value = EARTH_LIKE)]
    body: String,

    /// Body catalogue: YAML list, TOML file, or directory of TOML files
    #[arg(long, default_value = "configs/bodies")]
    bodies: PathBuf,

    /// Simulation settings (time multiplier, thrust acceleration)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulation time of the burn start, in days
    #[arg(long, default_value_t = 0.0)]
    at_days: f64,

    /// Burn direction: prograde, retrograde, normal or anti-normal
    #[arg(long, default_value = "prograde", value_parser = str::parse::<Maneuver>)]
    kind: Maneuver,

    /// Real time the burn control is held, in seconds
    #[arg(long, default_value_t = 0.1)]
    duration_s: f64,

    /// Real time per frame; the burn is applied as one pulse per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_s: f64,

    /// Thrust acceleration in m/s² (defaults to the settings file)
    #[arg(long)]
    acceleration: Option<f64>,

    /// Report the state this many days after the burn ends
    #[arg(long, default_value_t = 30.0)]
    after_days: f64,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    if cli.duration_s <= 0.0 || cli.frame_s <= 0.0 {
        return Err(anyhow!("--duration-s and --frame-s must be positive"));
    }

    let settings = match &cli.config {
        Some(path) => load_simulation(path)?,
        None => SimulationConfig::default(),
    };
    let acceleration = cli
        .acceleration
        .unwrap_or(settings.thrust_acceleration_m_s2);
    let bodies = settings.bodies_path.clone().unwrap_or(cli.bodies.clone());
    let orbit = resolve_orbit(&cli.body, &bodies)?;
    let maneuver = cli.kind;

    let mut clock = SimulationClock::new(settings.time_multiplier_s_per_s);
    clock.elapsed_s = days_to_seconds(cli.at_days);
    let mut tracker = OrbitTracker::new(orbit);

    let frames = (cli.duration_s / cli.frame_s).round().max(1.0) as usize;
    let pulse_s = cli.duration_s / frames as f64;
    for _ in 0..frames {
        tracker.burn(clock.elapsed_s, &maneuver, acceleration, pulse_s)?;
        clock.advance(pulse_s);
    }

    let report_s = clock.elapsed_s + days_to_seconds(cli.after_days);
    let summary = tracker.state_summary(report_s)?;

    println!("=== Burn ===");
    println!("Body        : {}", cli.body);
    println!(
        "Maneuver    : {} x{} pulses, dv = {:.3} m/s",
        maneuver,
        frames,
        acceleration * cli.duration_s
    );
    println!("Before      : {}", describe(&orbit));
    println!("After       : {}", describe(tracker.orbit()));
    println!("State +{:.1} d: {}", cli.after_days, summary);

    Ok(())
}

fn describe(orbit: &Orbit) -> String {
    let axis = orbit
        .semi_major_axis()
        .map(|a| format!("{:.6} AU", m_to_au(a)))
        .unwrap_or_else(|| "unbounded".to_string());
    let period = orbit
        .period_days()
        .map(|d| format!("{d:.2} days"))
        .unwrap_or_else(|| "none".to_string());
    format!(
        "alpha = {:.6e} 1/m, a = {}, period = {}, kind = {:?}",
        orbit.alpha(),
        axis,
        period,
        orbit.kind()
    )
}
