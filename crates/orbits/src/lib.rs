//! Two-body orbit propagation in universal variables.
//!
//! [`Orbit`] solves the universal Kepler time equation with Newton-Raphson
//! iteration over the Stumpff functions, which keeps a single code path valid
//! for elliptic, parabolic, and hyperbolic trajectories. Burns never mutate an
//! orbit; they produce a new one from the post-burn state.

pub mod maneuver;
pub mod orbit;
pub mod stumpff;
pub mod tracker;

pub use maneuver::{Maneuver, UnknownManeuver};
pub use orbit::{KeplerSolution, MAX_ITERATIONS, Orbit, OrbitKind, StateVector};
pub use stumpff::{STUMPFF_SERIES_THRESHOLD, stumpff_c, stumpff_s};
pub use tracker::{OrbitTracker, StateSummary};
