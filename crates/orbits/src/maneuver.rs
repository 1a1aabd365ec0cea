//! Impulsive maneuvers expressed relative to the current state vector.

use std::fmt;
use std::str::FromStr;

use solar_core::{DomainError, Vector3D};

use crate::orbit::{Orbit, StateVector};

/// Direction of an impulsive burn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Maneuver {
    /// Along the current velocity.
    Prograde,
    /// Against the current velocity.
    Retrograde,
    /// Along the orbit normal `r × v`.
    Normal,
    /// Against the orbit normal.
    AntiNormal,
    /// Along an arbitrary (non-zero) direction.
    Custom(Vector3D),
}

impl Maneuver {
    /// Unit burn direction for the given state.
    pub fn direction(&self, state: &StateVector) -> Result<Vector3D, DomainError> {
        match self {
            Maneuver::Prograde => state.velocity.normalized(),
            Maneuver::Retrograde => state.velocity.normalized().map(|v| -v),
            Maneuver::Normal => state.position.cross(&state.velocity).normalized(),
            Maneuver::AntiNormal => state
                .position
                .cross(&state.velocity)
                .normalized()
                .map(|n| -n),
            Maneuver::Custom(direction) => direction.normalized(),
        }
    }

    /// Velocity change for a burn of `acceleration_m_s2` held for `duration_s`.
    pub fn delta_v(
        &self,
        state: &StateVector,
        acceleration_m_s2: f64,
        duration_s: f64,
    ) -> Result<Vector3D, DomainError> {
        Ok(self.direction(state)? * (acceleration_m_s2 * duration_s))
    }
}

impl fmt::Display for Maneuver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Maneuver::Prograde => write!(f, "prograde"),
            Maneuver::Retrograde => write!(f, "retrograde"),
            Maneuver::Normal => write!(f, "normal"),
            Maneuver::AntiNormal => write!(f, "anti-normal"),
            Maneuver::Custom(d) => write!(f, "custom [{}, {}, {}]", d.x, d.y, d.z),
        }
    }
}

/// Error returned when parsing a maneuver name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown maneuver `{0}` (expected prograde, retrograde, normal or anti-normal)")]
pub struct UnknownManeuver(pub String);

impl FromStr for Maneuver {
    type Err = UnknownManeuver;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prograde" => Ok(Maneuver::Prograde),
            "retrograde" => Ok(Maneuver::Retrograde),
            "normal" => Ok(Maneuver::Normal),
            "anti-normal" | "antinormal" | "anti_normal" => Ok(Maneuver::AntiNormal),
            other => Err(UnknownManeuver(other.to_string())),
        }
    }
}

impl Orbit {
    /// Apply a named burn at elapsed time `t`, returning the post-burn orbit.
    pub fn apply_maneuver(
        &self,
        t: f64,
        maneuver: &Maneuver,
        acceleration_m_s2: f64,
        duration_s: f64,
    ) -> Result<Orbit, DomainError> {
        let state = self.state_vector(t)?;
        let delta_v = maneuver.delta_v(&state, acceleration_m_s2, duration_s)?;
        self.with_impulse(&state, delta_v)
    }
}
