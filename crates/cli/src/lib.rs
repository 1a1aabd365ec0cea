//! Shared plumbing for the Solar Kepler binaries.

use std::path::Path;

use solar_kepler::config::{load_bodies, orbit_for};
use solar_kepler::orbits::Orbit;
use tracing_subscriber::EnvFilter;

/// Body name that selects the built-in Earth-like orbit without a catalogue.
pub const EARTH_LIKE: &str = "earth-like";

/// Install a stderr subscriber honouring `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Resolve `body` to an orbit, reading the catalogue only when needed.
pub fn resolve_orbit(body: &str, bodies_path: &Path) -> anyhow::Result<Orbit> {
    if body.eq_ignore_ascii_case(EARTH_LIKE) {
        return Ok(Orbit::earth_like());
    }
    let bodies = load_bodies(bodies_path)?;
    Ok(orbit_for(&bodies, body)?)
}
