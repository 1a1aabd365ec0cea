//! Export helpers for CSV and JSON ephemeris tables.

pub mod ephemeris {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use solar_core::time::seconds_to_days;
    use solar_core::{DomainError, Vector3D};
    use solar_orbits::Orbit;
    use thiserror::Error;

    const HEADER: &str = "time_s,time_days,x_m,y_m,z_m,vx_m_s,vy_m_s,vz_m_s,speed_m_s,converged";

    #[derive(Debug, Error)]
    pub enum ExportError {
        #[error("failed to write output: {0}")]
        Io(#[from] io::Error),
        #[error("failed to encode JSON: {0}")]
        Json(#[from] serde_json::Error),
        #[error("propagation failed: {0}")]
        Domain(#[from] DomainError),
    }

    /// One propagated state in an ephemeris table.
    #[derive(Debug, Clone, Copy, PartialEq, Serialize)]
    pub struct EphemerisSample {
        pub time_s: f64,
        pub time_days: f64,
        pub position_m: Vector3D,
        pub velocity_m_s: Vector3D,
        pub speed_m_s: f64,
        /// Whether the universal anomaly solve met its step tolerance.
        pub converged: bool,
    }

    impl EphemerisSample {
        /// Serialize the sample as a CSV row matching the standard header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{:.3},{:.6},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e},{:.6e},{}",
                self.time_s,
                self.time_days,
                self.position_m.x,
                self.position_m.y,
                self.position_m.z,
                self.velocity_m_s.x,
                self.velocity_m_s.y,
                self.velocity_m_s.z,
                self.speed_m_s,
                if self.converged { "true" } else { "false" },
            )
        }
    }

    /// Orbit summary written ahead of the samples in JSON output.
    #[derive(Debug, Serialize)]
    pub struct EphemerisDocument<'a> {
        pub body: &'a str,
        pub central_mass_kg: f64,
        pub alpha_per_m: f64,
        pub period_s: Option<f64>,
        pub samples: &'a [EphemerisSample],
    }

    /// Propagate `orbit` from `start_s` to `end_s` (inclusive) every `step_s` seconds.
    pub fn sample_orbit(
        orbit: &Orbit,
        start_s: f64,
        end_s: f64,
        step_s: f64,
    ) -> Result<Vec<EphemerisSample>, DomainError> {
        if step_s <= 0.0 || !step_s.is_finite() {
            return Err(DomainError::InvalidStep(step_s));
        }
        let mut samples = Vec::new();
        let mut index = 0u64;
        loop {
            // Multiply instead of accumulating so long tables don't drift.
            let time_s = start_s + index as f64 * step_s;
            if time_s > end_s + 1e-9 * step_s {
                break;
            }
            let (state, solution) = orbit.propagate(time_s)?;
            samples.push(EphemerisSample {
                time_s,
                time_days: seconds_to_days(time_s),
                position_m: state.position,
                velocity_m_s: state.velocity,
                speed_m_s: state.velocity.length(),
                converged: solution.converged,
            });
            index += 1;
        }
        Ok(samples)
    }

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    /// Write the header followed by one row per sample.
    pub fn write_csv(writer: &mut dyn Write, samples: &[EphemerisSample]) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)?;
        for sample in samples {
            sample.write_to(writer)?;
        }
        writer.flush()
    }

    /// Write a pretty-printed JSON document.
    pub fn write_json(
        writer: &mut dyn Write,
        document: &EphemerisDocument<'_>,
    ) -> Result<(), ExportError> {
        to_writer_pretty(&mut *writer, document)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use solar_core::constants::SECONDS_PER_DAY;

        #[test]
        fn samples_cover_inclusive_range() {
            let orbit = Orbit::earth_like();
            let samples = sample_orbit(&orbit, 0.0, 10.0 * SECONDS_PER_DAY, SECONDS_PER_DAY).unwrap();
            assert_eq!(samples.len(), 11);
            assert_eq!(samples[0].position_m, orbit.position0());
            assert!((samples[10].time_days - 10.0).abs() < 1e-12);
            assert!(samples.iter().all(|s| s.converged));
        }

        #[test]
        fn rejects_non_positive_step() {
            let orbit = Orbit::earth_like();
            assert_eq!(
                sample_orbit(&orbit, 0.0, 1.0, 0.0),
                Err(DomainError::InvalidStep(0.0))
            );
        }

        #[test]
        fn csv_has_header_and_rows() {
            let orbit = Orbit::earth_like();
            let samples = sample_orbit(&orbit, 0.0, 2.0 * SECONDS_PER_DAY, SECONDS_PER_DAY).unwrap();
            let mut buf = Vec::new();
            write_csv(&mut buf, &samples).unwrap();
            let text = String::from_utf8(buf).unwrap();
            let lines: Vec<_> = text.lines().collect();
            assert_eq!(lines.len(), 4);
            assert_eq!(lines[0], HEADER);
            assert!(lines[1].starts_with("0.000,0.000000,-1.496000e11,"), "{}", lines[1]);
            assert!(lines[3].ends_with(",true"));
            assert_eq!(lines[2].split(',').count(), HEADER.split(',').count());
        }

        #[test]
        fn json_document_round_trips_through_serde() {
            let orbit = Orbit::earth_like();
            let samples = sample_orbit(&orbit, 0.0, SECONDS_PER_DAY, SECONDS_PER_DAY).unwrap();
            let document = EphemerisDocument {
                body: "EARTH",
                central_mass_kg: orbit.central_mass_kg(),
                alpha_per_m: orbit.alpha(),
                period_s: orbit.period_seconds(),
                samples: &samples,
            };
            let mut buf = Vec::new();
            write_json(&mut buf, &document).unwrap();
            let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
            assert_eq!(value["body"], "EARTH");
            assert_eq!(value["samples"].as_array().unwrap().len(), 2);
            assert_eq!(value["samples"][0]["position_m"][0], -1.496e11);
        }

        #[test]
        fn writer_creates_parent_directories() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested/out.csv");
            {
                let mut writer = writer_for_path(&path).unwrap();
                write_csv(writer.as_mut(), &[]).unwrap();
            }
            let text = fs::read_to_string(&path).unwrap();
            assert_eq!(text.trim_end(), HEADER);
        }
    }
}
