//! Orbit holder for a body that can be perturbed by impulsive burns.
//!
//! Simulation time keeps running from the start of the session; each burn
//! re-derives the orbit from the state at the burn instant and moves the
//! tracker's epoch there.

use std::fmt;

use solar_core::time::seconds_to_days;
use solar_core::{DomainError, Vector3D};

use crate::maneuver::Maneuver;
use crate::orbit::{Orbit, StateVector};

/// Current orbit of one body plus the simulation time at which it was derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitTracker {
    orbit: Orbit,
    time_offset_s: f64,
}

impl OrbitTracker {
    /// Tracker whose orbit starts at simulation time zero.
    pub fn new(orbit: Orbit) -> Self {
        Self::with_time_offset(orbit, 0.0)
    }

    /// Tracker whose orbit's initial state holds at simulation time `time_offset_s`.
    pub fn with_time_offset(orbit: Orbit, time_offset_s: f64) -> Self {
        Self { orbit, time_offset_s }
    }

    /// Orbit in effect since [`OrbitTracker::time_offset_s`].
    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    /// Simulation time of the last (re)derivation, in seconds.
    pub fn time_offset_s(&self) -> f64 {
        self.time_offset_s
    }

    /// Time elapsed on the current orbit at simulation time `now_s`.
    pub fn effective_time(&self, now_s: f64) -> f64 {
        now_s - self.time_offset_s
    }

    /// Position at simulation time `now_s`.
    pub fn position_at(&self, now_s: f64) -> Result<Vector3D, DomainError> {
        self.orbit.position(self.effective_time(now_s))
    }

    pub fn state_at(&self, now_s: f64) -> Result<StateVector, DomainError> {
        self.orbit.state_vector(self.effective_time(now_s))
    }

    /// Burn along `maneuver` for `duration_s` at `acceleration_m_s2`.
    ///
    /// The orbit and epoch are replaced together; on error neither changes.
    pub fn burn(
        &mut self,
        now_s: f64,
        maneuver: &Maneuver,
        acceleration_m_s2: f64,
        duration_s: f64,
    ) -> Result<&Orbit, DomainError> {
        let next = self.orbit.apply_maneuver(
            self.effective_time(now_s),
            maneuver,
            acceleration_m_s2,
            duration_s,
        )?;
        tracing::info!(
            %maneuver,
            now_s,
            delta_v = acceleration_m_s2 * duration_s,
            alpha_before = self.orbit.alpha(),
            alpha_after = next.alpha(),
            "orbit re-derived after burn"
        );
        Ok(self.replace(next, now_s))
    }

    /// Apply an arbitrary velocity change at simulation time `now_s`.
    pub fn impulse(&mut self, now_s: f64, delta_v: Vector3D) -> Result<&Orbit, DomainError> {
        let next = self
            .orbit
            .apply_impulse(self.effective_time(now_s), delta_v)?;
        tracing::info!(now_s, dv = delta_v.length(), "orbit re-derived after impulse");
        Ok(self.replace(next, now_s))
    }

    fn replace(&mut self, orbit: Orbit, time_offset_s: f64) -> &Orbit {
        *self = Self { orbit, time_offset_s };
        &self.orbit
    }

    /// Snapshot suitable for a one-line status readout.
    pub fn state_summary(&self, now_s: f64) -> Result<StateSummary, DomainError> {
        let state = self.state_at(now_s)?;
        Ok(StateSummary {
            time_days: seconds_to_days(now_s),
            position: state.position,
            velocity: state.velocity,
            speed: state.velocity.length(),
        })
    }
}

/// State readout at a simulation instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateSummary {
    pub time_days: f64,
    pub position: Vector3D,
    pub velocity: Vector3D,
    pub speed: f64,
}

/// Scientific notation with a leading space for non-negative values so
/// columns line up.
struct Sci(f64);

impl fmt::Display for Sci {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_sign_negative() {
            write!(f, "{:.3e}", self.0)
        } else {
            write!(f, " {:.3e}", self.0)
        }
    }
}

impl fmt::Display for StateSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T:{} Days X:{} Y:{} Z:{} vX:{} vY:{} vZ:{} v:{}",
            Sci(self.time_days),
            Sci(self.position.x),
            Sci(self.position.y),
            Sci(self.position.z),
            Sci(self.velocity.x),
            Sci(self.velocity.y),
            Sci(self.velocity.z),
            Sci(self.speed),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solar_core::constants::SECONDS_PER_DAY;

    #[test]
    fn effective_time_is_measured_from_epoch() {
        let tracker =
            OrbitTracker::with_time_offset(Orbit::earth_like(), 5.0 * SECONDS_PER_DAY);
        assert_eq!(tracker.effective_time(7.0 * SECONDS_PER_DAY), 2.0 * SECONDS_PER_DAY);
        let at_epoch = tracker.position_at(5.0 * SECONDS_PER_DAY).unwrap();
        assert_eq!(at_epoch, Orbit::earth_like().position0());
    }

    #[test]
    fn burn_resets_epoch_and_continues_from_burn_state() {
        let mut tracker = OrbitTracker::new(Orbit::earth_like());
        let now = 100.0 * SECONDS_PER_DAY;
        let before = tracker.state_at(now).unwrap();
        let alpha_before = tracker.orbit().alpha();

        tracker.burn(now, &Maneuver::Prograde, 1_000.0, 0.1).unwrap();

        assert_eq!(tracker.time_offset_s(), now);
        assert!(tracker.orbit().alpha() < alpha_before);
        let after = tracker.state_at(now).unwrap();
        assert!((after.position - before.position).length() < 1.0);
        let dv = after.velocity - before.velocity;
        assert!((dv.length() - 100.0).abs() < 1e-6);
        assert!(dv.dot(&before.velocity) > 0.0);
    }

    #[test]
    fn failed_burn_leaves_tracker_untouched() {
        let mut tracker = OrbitTracker::new(Orbit::earth_like());
        let snapshot = tracker;
        let err = tracker
            .burn(1.0e6, &Maneuver::Custom(Vector3D::ZERO), 1_000.0, 1.0)
            .unwrap_err();
        assert_eq!(err, DomainError::ZeroLengthVector);
        assert_eq!(tracker, snapshot);
    }

    #[test]
    fn impulse_matches_equivalent_burn() {
        let now = 20.0 * SECONDS_PER_DAY;
        let mut burned = OrbitTracker::new(Orbit::earth_like());
        burned.burn(now, &Maneuver::Normal, 500.0, 0.2).unwrap();

        let mut kicked = OrbitTracker::new(Orbit::earth_like());
        let normal = Maneuver::Normal
            .direction(&kicked.state_at(now).unwrap())
            .unwrap();
        kicked.impulse(now, normal * 100.0).unwrap();

        assert_eq!(burned, kicked);
    }

    #[test]
    fn summary_formats_columns() {
        let tracker = OrbitTracker::new(Orbit::earth_like());
        let summary = tracker.state_summary(0.0).unwrap();
        let line = summary.to_string();
        assert!(line.starts_with("T: 0.000e0 Days X:-1.496e11 Y: 0.000e0"), "{line}");
        assert!(line.ends_with("v: 2.978e4"), "{line}");
    }
}
