//! Configuration models and loaders for the Solar Kepler workspace.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use solar_core::constants::SOLAR_MASS_KG;
use solar_core::time::DEFAULT_TIME_MULTIPLIER;
use solar_core::{DomainError, Vector3D};
use solar_orbits::Orbit;
use thiserror::Error;

/// Acceleration applied while a burn control is held (m/s²).
pub const DEFAULT_THRUST_ACCELERATION: f64 = 1_000.0;

/// Initial conditions of one orbiting body.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BodyConfig {
    pub name: String,
    /// Initial position relative to the central mass, `[x, y, z]` in metres.
    pub position_m: Vector3D,
    /// Initial velocity, `[vx, vy, vz]` in metres per second.
    pub velocity_m_s: Vector3D,
    /// Central mass in kilograms; one solar mass when omitted.
    #[serde(default)]
    pub central_mass_kg: Option<f64>,
}

impl BodyConfig {
    pub fn central_mass_kg(&self) -> f64 {
        self.central_mass_kg.unwrap_or(SOLAR_MASS_KG)
    }

    pub fn to_orbit(&self) -> Result<Orbit, DomainError> {
        Orbit::new(self.position_m, self.velocity_m_s, self.central_mass_kg())
    }
}

/// Session-wide simulation settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Simulated seconds per real second.
    #[serde(default = "default_time_multiplier")]
    pub time_multiplier_s_per_s: f64,
    #[serde(default = "default_thrust_acceleration")]
    pub thrust_acceleration_m_s2: f64,
    /// Body catalogue to load alongside the settings.
    #[serde(default)]
    pub bodies_path: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_multiplier_s_per_s: default_time_multiplier(),
            thrust_acceleration_m_s2: default_thrust_acceleration(),
            bodies_path: None,
        }
    }
}

fn default_time_multiplier() -> f64 {
    DEFAULT_TIME_MULTIPLIER
}

fn default_thrust_acceleration() -> f64 {
    DEFAULT_THRUST_ACCELERATION
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("no body named `{0}` in catalogue")]
    UnknownBody(String),
    #[error("invalid initial conditions for `{name}`: {source}")]
    Domain {
        name: String,
        #[source]
        source: DomainError,
    },
}

/// Load body configurations from a YAML list, a TOML file, or a directory of TOML files.
pub fn load_bodies<P: AsRef<Path>>(path: P) -> Result<Vec<BodyConfig>, ConfigError> {
    let bodies: Vec<BodyConfig> = load_records(path.as_ref())?;
    tracing::info!(count = bodies.len(), path = %path.as_ref().display(), "loaded body catalogue");
    Ok(bodies)
}

/// Load simulation settings from a YAML or TOML file.
pub fn load_simulation<P: AsRef<Path>>(path: P) -> Result<SimulationConfig, ConfigError> {
    let path = path.as_ref();
    if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

/// Case-insensitive lookup by body name.
pub fn find_body<'a>(bodies: &'a [BodyConfig], name: &str) -> Result<&'a BodyConfig, ConfigError> {
    bodies
        .iter()
        .find(|b| b.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| ConfigError::UnknownBody(name.to_string()))
}

/// Build the orbit of the named body from a catalogue.
pub fn orbit_for(bodies: &[BodyConfig], name: &str) -> Result<Orbit, ConfigError> {
    let body = find_body(bodies, name)?;
    body.to_orbit().map_err(|source| ConfigError::Domain {
        name: body.name.clone(),
        source,
    })
}

fn load_records<T>(path: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}
