//! Two-body orbit propagation with universal variables.
//!
//! The library crate re-exports the workspace members so front-ends (the
//! bundled CLI, tests, or a renderer) can depend on a single path.

pub use solar_core::{DomainError, Vector3D, constants, time, units, vector};
pub use solar_config as config;
pub use solar_export as export;
pub use solar_orbits as orbits;

pub use solar_orbits::{KeplerSolution, Maneuver, Orbit, OrbitKind, OrbitTracker, StateVector};

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
