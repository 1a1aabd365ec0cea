//! Core units, constants, and shared primitives for the Solar Kepler workspace.

pub mod vector;

pub use vector::Vector3D;

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Newtonian gravitational constant (m³ kg⁻¹ s⁻²).
    pub const G: f64 = 6.674e-11;
    /// Metres per astronomical unit.
    pub const AU_M: f64 = 1.496e11;
    /// Mass of the Sun (kg).
    pub const SOLAR_MASS_KG: f64 = 1.989e30;
    /// Seconds per day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Days per (calendar, non-leap) year.
    pub const DAYS_PER_YEAR: f64 = 365.0;
}

/// Basic unit conversion helpers.
pub mod units {
    use super::constants::AU_M;

    /// Convert metres to astronomical units.
    #[inline]
    pub fn m_to_au(v: f64) -> f64 {
        v / AU_M
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::{DAYS_PER_YEAR, SECONDS_PER_DAY};

    /// Convert days to seconds.
    #[inline]
    pub fn days_to_seconds(days: f64) -> f64 {
        days * SECONDS_PER_DAY
    }

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }

    /// Convert seconds to 365-day years.
    #[inline]
    pub fn seconds_to_years(seconds: f64) -> f64 {
        seconds / (DAYS_PER_YEAR * SECONDS_PER_DAY)
    }

    /// Default simulated seconds per real second (ten days).
    pub const DEFAULT_TIME_MULTIPLIER: f64 = 10.0 * SECONDS_PER_DAY;

    /// Accelerated simulation clock driven by real elapsed time.
    ///
    /// Holds only the simulated time since start; the caller decides how often
    /// to advance it.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct SimulationClock {
        pub elapsed_s: f64,
        pub multiplier: f64,
    }

    impl Default for SimulationClock {
        fn default() -> Self {
            Self::new(DEFAULT_TIME_MULTIPLIER)
        }
    }

    impl SimulationClock {
        pub fn new(multiplier: f64) -> Self {
            Self {
                elapsed_s: 0.0,
                multiplier,
            }
        }

        /// Advance by `real_dt_s` seconds of wall time; returns the new simulated time.
        pub fn advance(&mut self, real_dt_s: f64) -> f64 {
            self.elapsed_s += self.multiplier * real_dt_s;
            self.elapsed_s
        }

        pub fn elapsed_days(&self) -> f64 {
            seconds_to_days(self.elapsed_s)
        }
    }
}

/// Domain failures raised by the vector and orbit primitives.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("central mass must be positive (got {0} kg)")]
    NonPositiveMass(f64),
    #[error("initial position must have non-zero length")]
    ZeroInitialRadius,
    #[error("cannot normalize a zero-length vector")]
    ZeroLengthVector,
    #[error("{quantity} is not finite")]
    NonFinite { quantity: &'static str },
    #[error("sampling step must be positive (got {0} s)")]
    InvalidStep(f64),
}

#[cfg(test)]
mod tests {
    use super::time::{SimulationClock, days_to_seconds, seconds_to_days, seconds_to_years};

    #[test]
    fn day_conversions_are_inverse() {
        assert_eq!(days_to_seconds(1.0), 86_400.0);
        assert!((seconds_to_days(days_to_seconds(42.5)) - 42.5).abs() < 1e-12);
        assert!((seconds_to_years(days_to_seconds(365.0)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clock_scales_real_time() {
        let mut clock = SimulationClock::default();
        clock.advance(0.5);
        clock.advance(0.5);
        assert!((clock.elapsed_days() - 10.0).abs() < 1e-9);

        let mut fast = SimulationClock::new(2.0);
        assert_eq!(fast.advance(3.0), 6.0);
    }
}
