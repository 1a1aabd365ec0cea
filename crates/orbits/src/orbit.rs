//! Two-body orbit propagated with the universal-variable Kepler formulation.
//!
//! An [`Orbit`] is fixed by an initial state vector and a central mass. Every
//! derived parameter is computed once at construction; queries are pure
//! functions of elapsed time and never mutate the orbit.

use std::f64::consts::PI;

use solar_core::constants::{AU_M, G, SOLAR_MASS_KG};
use solar_core::time::{days_to_seconds, seconds_to_days, seconds_to_years};
use solar_core::{DomainError, Vector3D};

use crate::stumpff::{stumpff_c, stumpff_s};

/// Newton-Raphson iteration cap for the universal anomaly solve.
pub const MAX_ITERATIONS: usize = 100;
/// Absolute step size (in universal anomaly units) that ends the iteration.
pub const STEP_TOLERANCE: f64 = 1e-10;
/// Steps below this many ULPs of `x` cannot change the iterate any further.
const PRECISION_FLOOR_ULPS: f64 = 8.0;
/// `|alpha·r0|` below which the trajectory is classified as parabolic.
pub const PARABOLIC_ALPHA_TOLERANCE: f64 = 1e-12;

/// Conic section classification derived from the sign of `alpha`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrbitKind {
    Elliptic,
    Parabolic,
    Hyperbolic,
}

/// Outcome of solving the universal Kepler equation for one time value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    /// Solved universal anomaly (m^½).
    pub x: f64,
    /// Time the anomaly was solved for, after any period reduction.
    pub time_s: f64,
    pub iterations: usize,
    /// `false` when the iteration cap was hit; `x` is then the last iterate.
    pub converged: bool,
    /// `t − T(x)` at the returned anomaly.
    pub residual_s: f64,
}

/// Position and velocity at a single instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position: Vector3D,
    pub velocity: Vector3D,
}

/// Keplerian orbit around a point mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    position0: Vector3D,
    velocity0: Vector3D,
    central_mass_kg: f64,
    mu: f64,
    sqrt_mu: f64,
    r0: f64,
    v0: f64,
    radial_product: f64,
    alpha: f64,
    period_s: Option<f64>,
}

impl Orbit {
    /// Build an orbit from an initial state (m, m/s) and a central mass (kg).
    pub fn new(
        position0: Vector3D,
        velocity0: Vector3D,
        central_mass_kg: f64,
    ) -> Result<Self, DomainError> {
        if !central_mass_kg.is_finite() || central_mass_kg <= 0.0 {
            return Err(DomainError::NonPositiveMass(central_mass_kg));
        }
        if !position0.is_finite() {
            return Err(DomainError::NonFinite {
                quantity: "initial position",
            });
        }
        if !velocity0.is_finite() {
            return Err(DomainError::NonFinite {
                quantity: "initial velocity",
            });
        }

        let mu = G * central_mass_kg;
        if mu <= 0.0 || !mu.is_finite() {
            return Err(DomainError::NonPositiveMass(central_mass_kg));
        }
        if position0.length() == 0.0 {
            return Err(DomainError::ZeroInitialRadius);
        }

        let orbit = Self::derive(position0, velocity0, central_mass_kg);
        if !orbit.alpha.is_finite() {
            return Err(DomainError::NonFinite { quantity: "alpha" });
        }
        tracing::debug!(
            r0 = orbit.r0,
            v0 = orbit.v0,
            alpha = orbit.alpha,
            period_s = ?orbit.period_s,
            "derived orbit parameters"
        );
        Ok(orbit)
    }

    /// Orbit around one solar mass.
    pub fn around_sun(position0: Vector3D, velocity0: Vector3D) -> Result<Self, DomainError> {
        Self::new(position0, velocity0, SOLAR_MASS_KG)
    }

    /// Near-circular approximation of Earth's heliocentric orbit.
    pub fn earth_like() -> Self {
        Self::derive(
            Vector3D::new(-AU_M, 0.0, 0.0),
            Vector3D::new(0.0, -29_784.8, 0.0),
            SOLAR_MASS_KG,
        )
    }

    /// Derived parameters for inputs already known to be valid.
    fn derive(position0: Vector3D, velocity0: Vector3D, central_mass_kg: f64) -> Self {
        let mu = G * central_mass_kg;
        let r0 = position0.length();
        let v0 = velocity0.length();
        let alpha = (2.0 * mu / r0 - v0 * v0) / mu;
        // Periodicity exists only for orbits classified as elliptic.
        let period_s = (classify(alpha, r0) == OrbitKind::Elliptic)
            .then(|| 2.0 * PI * ((1.0 / alpha).powi(3) / mu).sqrt());
        Self {
            position0,
            velocity0,
            central_mass_kg,
            mu,
            sqrt_mu: mu.sqrt(),
            r0,
            v0,
            radial_product: position0.dot(&velocity0),
            alpha,
            period_s,
        }
    }

    /// Position at `t = 0` (m).
    pub fn position0(&self) -> Vector3D {
        self.position0
    }

    /// Velocity at `t = 0` (m/s).
    pub fn velocity0(&self) -> Vector3D {
        self.velocity0
    }

    pub fn central_mass_kg(&self) -> f64 {
        self.central_mass_kg
    }

    /// Gravitational parameter `G·M` (m³/s²).
    pub fn mu(&self) -> f64 {
        self.mu
    }

    /// Initial radius |position0| (m).
    pub fn r0(&self) -> f64 {
        self.r0
    }

    /// Initial speed |velocity0| (m/s).
    pub fn v0(&self) -> f64 {
        self.v0
    }

    /// Reciprocal semi-major axis (1/m); positive for bound orbits.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// `1/alpha` (m), negative for hyperbolas; `None` when `alpha` is exactly zero.
    pub fn semi_major_axis(&self) -> Option<f64> {
        (self.alpha != 0.0).then(|| 1.0 / self.alpha)
    }

    /// Orbital period, present only for elliptic orbits.
    pub fn period_seconds(&self) -> Option<f64> {
        self.period_s
    }

    /// [`Orbit::period_seconds`] in days.
    pub fn period_days(&self) -> Option<f64> {
        self.period_s.map(seconds_to_days)
    }

    pub fn period_years(&self) -> Option<f64> {
        self.period_s.map(seconds_to_years)
    }

    /// Conic classification; an orbit has a period exactly when this is
    /// [`OrbitKind::Elliptic`].
    pub fn kind(&self) -> OrbitKind {
        classify(self.alpha, self.r0)
    }

    /// Specific orbital energy `v²/2 − mu/r` (J/kg).
    pub fn specific_energy(&self) -> f64 {
        -0.5 * self.mu * self.alpha
    }

    /// Specific angular momentum `r × v` (m²/s).
    pub fn angular_momentum(&self) -> Vector3D {
        self.position0.cross(&self.velocity0)
    }

    /// Solve the universal Kepler equation for elapsed time `t` (seconds).
    ///
    /// Elliptic orbits reduce `t` modulo the period first.
    pub fn solve(&self, t: f64) -> Result<KeplerSolution, DomainError> {
        self.solve_for_x(self.reduce_time(t)?, MAX_ITERATIONS)
    }

    /// Position `t` seconds after the initial state.
    pub fn position(&self, t: f64) -> Result<Vector3D, DomainError> {
        let solution = self.solve(t)?;
        self.position_from(&solution)
    }

    /// Velocity `t` seconds after the initial state.
    pub fn velocity(&self, t: f64) -> Result<Vector3D, DomainError> {
        self.state_vector(t).map(|state| state.velocity)
    }

    /// Position and velocity from a single universal anomaly solve.
    pub fn state_vector(&self, t: f64) -> Result<StateVector, DomainError> {
        self.propagate(t).map(|(state, _)| state)
    }

    /// State vector together with the solver diagnostic it came from.
    pub fn propagate(&self, t: f64) -> Result<(StateVector, KeplerSolution), DomainError> {
        let solution = self.solve(t)?;
        let position = self.position_from(&solution)?;
        let velocity = self.velocity_from(&solution, position)?;
        Ok((StateVector { position, velocity }, solution))
    }

    pub fn position_days(&self, days: f64) -> Result<Vector3D, DomainError> {
        self.position(days_to_seconds(days))
    }

    pub fn velocity_days(&self, days: f64) -> Result<Vector3D, DomainError> {
        self.velocity(days_to_seconds(days))
    }

    pub fn state_vector_days(&self, days: f64) -> Result<StateVector, DomainError> {
        self.state_vector(days_to_seconds(days))
    }

    /// New orbit after an instantaneous velocity change at elapsed time `t`.
    ///
    /// The returned orbit's epoch is the burn instant; `self` is left untouched.
    pub fn apply_impulse(&self, t: f64, delta_v: Vector3D) -> Result<Orbit, DomainError> {
        let state = self.state_vector(t)?;
        self.with_impulse(&state, delta_v)
    }

    /// Orbit through `state` with `delta_v` added to its velocity.
    pub(crate) fn with_impulse(
        &self,
        state: &StateVector,
        delta_v: Vector3D,
    ) -> Result<Orbit, DomainError> {
        if !delta_v.is_finite() {
            return Err(DomainError::NonFinite {
                quantity: "impulse delta-v",
            });
        }
        Orbit::new(state.position, state.velocity + delta_v, self.central_mass_kg)
    }

    fn reduce_time(&self, t: f64) -> Result<f64, DomainError> {
        if !t.is_finite() {
            return Err(DomainError::NonFinite {
                quantity: "elapsed time",
            });
        }
        Ok(match self.period_s {
            Some(period) => t % period,
            None => t,
        })
    }

    /// Time of flight `T(x)` for a trial universal anomaly.
    fn time_of_flight(&self, x: f64) -> f64 {
        let z = self.alpha * x * x;
        let c = stumpff_c(z);
        let s = stumpff_s(z);
        let mu_time = x.powi(3) * s
            + self.radial_product / self.sqrt_mu * x * x * c
            + self.r0 * x * (1.0 - z * s);
        mu_time / self.sqrt_mu
    }

    /// Derivative `dT/dx`; equals `r(x)/√mu`.
    fn d_time_of_flight(&self, x: f64) -> f64 {
        let z = self.alpha * x * x;
        let c = stumpff_c(z);
        let s = stumpff_s(z);
        let mu_dt = x * x * c
            + self.radial_product / self.sqrt_mu * x * (1.0 - z * s)
            + self.r0 * (1.0 - z * c);
        mu_dt / self.sqrt_mu
    }

    fn initial_guess(&self, t: f64) -> f64 {
        if t == 0.0 {
            return 0.0;
        }
        let parabolic = self.sqrt_mu * t / self.r0;
        match self.kind() {
            OrbitKind::Elliptic => self.alpha * self.sqrt_mu * t,
            OrbitKind::Parabolic => parabolic,
            OrbitKind::Hyperbolic => {
                let a = 1.0 / self.alpha;
                let sign = t.signum();
                // The whole bracket is the denominator. Dividing only the
                // first term by r0·v0 breaks at periapsis, where r0·v0 = 0.
                let denominator = self.radial_product
                    + sign * (-self.mu * a).sqrt() * (1.0 - self.alpha * self.r0);
                let guess =
                    sign * (-a).sqrt() * (-2.0 * self.mu * self.alpha * t / denominator).ln();

                // The logarithmic guess is an asymptote for long flights; near
                // the epoch it can land on the wrong side of zero.
                if guess.is_finite() && guess.signum() == sign {
                    guess
                } else {
                    parabolic
                }
            }
        }
    }

    fn solve_for_x(&self, t: f64, max_iterations: usize) -> Result<KeplerSolution, DomainError> {
        let mut x = self.initial_guess(t);
        if !x.is_finite() {
            return Err(DomainError::NonFinite {
                quantity: "initial universal anomaly",
            });
        }

        let mut iterations = 0;
        let mut converged = false;
        while iterations < max_iterations {
            iterations += 1;
            let step = (t - self.time_of_flight(x)) / self.d_time_of_flight(x);
            if !step.is_finite() {
                return Err(DomainError::NonFinite {
                    quantity: "Newton-Raphson step",
                });
            }
            x += step;
            let floor = PRECISION_FLOOR_ULPS * f64::EPSILON * x.abs();
            if step.abs() < STEP_TOLERANCE || step.abs() <= floor {
                converged = true;
                break;
            }
        }

        let residual_s = t - self.time_of_flight(x);
        if !converged {
            tracing::warn!(
                t,
                x,
                residual_s,
                "universal anomaly did not converge within {max_iterations} iterations"
            );
        }

        Ok(KeplerSolution {
            x,
            time_s: t,
            iterations,
            converged,
            residual_s,
        })
    }

    fn position_from(&self, solution: &KeplerSolution) -> Result<Vector3D, DomainError> {
        let x = solution.x;
        let z = self.alpha * x * x;
        let f = 1.0 - stumpff_c(z) * x * x / self.r0;
        let g = solution.time_s - x.powi(3) * stumpff_s(z) / self.sqrt_mu;
        let position = f * self.position0 + g * self.velocity0;
        if !position.is_finite() {
            return Err(DomainError::NonFinite {
                quantity: "propagated position",
            });
        }
        Ok(position)
    }

    fn velocity_from(
        &self,
        solution: &KeplerSolution,
        position: Vector3D,
    ) -> Result<Vector3D, DomainError> {
        let r = position.length();
        if r == 0.0 {
            return Err(DomainError::NonFinite {
                quantity: "propagated radius",
            });
        }
        let x = solution.x;
        let z = self.alpha * x * x;
        let df = self.sqrt_mu * x * (z * stumpff_s(z) - 1.0) / (self.r0 * r);
        let dg = 1.0 - x * x * stumpff_c(z) / r;
        let velocity = df * self.position0 + dg * self.velocity0;
        if !velocity.is_finite() {
            return Err(DomainError::NonFinite {
                quantity: "propagated velocity",
            });
        }
        Ok(velocity)
    }
}

fn classify(alpha: f64, r0: f64) -> OrbitKind {
    if (alpha * r0).abs() < PARABOLIC_ALPHA_TOLERANCE {
        OrbitKind::Parabolic
    } else if alpha > 0.0 {
        OrbitKind::Elliptic
    } else {
        OrbitKind::Hyperbolic
    }
}

impl Default for Orbit {
    fn default() -> Self {
        Self::earth_like()
    }
}
