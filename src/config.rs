//! Scenario files.
//!
//! A scenario is the starting table of bodies plus the driver settings. Bodies
//! are given in AU and AU/day and converted to SI exactly once, when the
//! `System` is built.
//!
//! ```yaml
//! start_time: 2022-01-01T00:00:00Z
//! timestep_secs: 1.0
//! snapshot_cadence_secs: 604800.0   # one simulated week
//! update_order: sequential          # or frozen
//! bodies:
//!   - label: Sun
//!     mass: 1.989e30                # kg
//!     position_au: [0.0, 0.0, 0.0]
//!     velocity_au_per_day: [0.0, 0.0, 0.0]
//! ```

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Duration, TimeZone, Utc};
use log::debug;
use serde::Deserialize;

use crate::driver::DriverConfig;
use crate::prelude::*;
use crate::{gravity, units};

#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
	pub label: String,
	pub mass: Scalar,                  // kg
	pub position_au: [Scalar; 3],
	pub velocity_au_per_day: [Scalar; 3],
}

#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
	pub start_time: DateTime<Utc>,
	#[serde(default = "default_timestep")]
	pub timestep_secs: Scalar,
	#[serde(default = "default_cadence")]
	pub snapshot_cadence_secs: Scalar,
	#[serde(default = "default_g")]
	pub gravitational_constant: Scalar,
	#[serde(default)]
	pub update_order: UpdateOrder,
	#[serde(default)]
	pub max_ticks: Option<u64>,
	pub bodies: Vec<BodyConfig>,
}

fn default_timestep() -> Scalar {
	1.0
}

fn default_cadence() -> Scalar {
	7.0 * units::SECONDS_PER_DAY
}

fn default_g() -> Scalar {
	gravity::G
}

impl ScenarioConfig {
	pub fn from_yaml_str(yaml: &str) -> Result<Self> {
		let cfg: ScenarioConfig = serde_yaml::from_str(yaml)?;
		cfg.validate()?;
		Ok(cfg)
	}

	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		debug!("loading scenario from {}", path.display());
		let reader = BufReader::new(File::open(path)?);
		let cfg: ScenarioConfig = serde_yaml::from_reader(reader)?;
		cfg.validate()?;
		Ok(cfg)
	}

	/// Sun, Earth and Mars as of 2022-01-01.
	pub fn default_inner_system() -> Self {
		ScenarioConfig {
			start_time: Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap(),
			timestep_secs: default_timestep(),
			snapshot_cadence_secs: default_cadence(),
			gravitational_constant: gravity::G,
			update_order: UpdateOrder::Sequential,
			max_ticks: None,
			bodies: vec![
				BodyConfig {
					label: "Sun".into(),
					mass: 1.989e30,
					position_au: [0.0, 0.0, 0.0],
					velocity_au_per_day: [0.0, 0.0, 0.0],
				},
				BodyConfig {
					label: "Earth".into(),
					mass: 5.972e24,
					position_au: [-1.01673977e-01, 7.00034986e-01, -1.85435480e-06],
					velocity_au_per_day: [-1.42987359e-02, -1.00797828e-02, 2.24008069e-07],
				},
				BodyConfig {
					label: "Mars".into(),
					mass: 6.39e23,
					position_au: [1.38708645, -9.63136861e-01, 3.79103570e-02],
					// y is half the ephemeris value
					velocity_au_per_day: [7.20279246e-03, 1.67110509e-02 / 2.0, -1.70863874e-03],
				},
			],
		}
	}

	pub fn validate(&self) -> Result<()> {
		if self.bodies.is_empty() {
			return Err(Error::config("scenario has no bodies"));
		}
		check_positive("timestep_secs", self.timestep_secs)?;
		check_positive("snapshot_cadence_secs", self.snapshot_cadence_secs)?;
		check_positive("gravitational_constant", self.gravitational_constant)?;
		if self.timestep_secs < 1e-9 {
			return Err(Error::config("timestep_secs is below nanosecond resolution"));
		}
		check_duration("timestep_secs", self.timestep_secs)?;
		check_duration("snapshot_cadence_secs", self.snapshot_cadence_secs)?;

		let mut labels = HashSet::new();
		for b in &self.bodies {
			if b.label.trim().is_empty() {
				return Err(Error::config("body with empty label"));
			}
			if !labels.insert(b.label.as_str()) {
				return Err(Error::config(format!("duplicate body label {:?}", b.label)));
			}
			if !(b.mass.is_finite() && b.mass > 0.0) {
				return Err(Error::config(format!("body {:?} has non-positive mass {}", b.label, b.mass)));
			}
			if !b.position_au.iter().chain(b.velocity_au_per_day.iter()).all(|c| c.is_finite()) {
				return Err(Error::config(format!("body {:?} has a non-finite coordinate", b.label)));
			}
		}

		for (i, a) in self.bodies.iter().enumerate() {
			for b in &self.bodies[i + 1..] {
				if a.position_au == b.position_au {
					return Err(Error::config(format!("bodies {:?} and {:?} start at the same position", a.label, b.label)));
				}
			}
		}

		Ok(())
	}

	pub fn build_system(&self) -> Result<System> {
		let bodies = self
			.bodies
			.iter()
			.map(|b| {
				Body::new(
					b.label.clone(),
					b.mass,
					units::au_vector_to_meters(Vec3::from(b.position_au)),
					units::au_per_day_vector_to_meters_per_second(Vec3::from(b.velocity_au_per_day)),
				)
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(System::new(bodies, self.start_time)
			.with_gravitational_constant(self.gravitational_constant)
			.with_order(self.update_order))
	}

	pub fn driver_config(&self) -> DriverConfig {
		DriverConfig {
			timestep: secs_to_duration(self.timestep_secs),
			snapshot_cadence: secs_to_duration(self.snapshot_cadence_secs),
			max_ticks: self.max_ticks,
		}
	}
}

fn check_positive(name: &str, value: Scalar) -> Result<()> {
	if value.is_finite() && value > 0.0 {
		Ok(())
	} else {
		Err(Error::config(format!("{} must be positive, got {}", name, value)))
	}
}

/// Longest step or cadence a `Duration` holds at nanosecond resolution,
/// about 292 years.
pub const MAX_DURATION_SECS: Scalar = i64::MAX as Scalar / 1e9;

fn check_duration(name: &str, secs: Scalar) -> Result<()> {
	if secs < MAX_DURATION_SECS {
		Ok(())
	} else {
		Err(Error::config(format!("{} of {} s is longer than {:.0} s", name, secs, MAX_DURATION_SECS)))
	}
}

fn secs_to_duration(secs: Scalar) -> Duration {
	Duration::nanoseconds((secs * 1e9).round() as i64)
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	const TWO_BODY: &str = r#"
start_time: 2022-01-01T00:00:00Z
timestep_secs: 60.0
update_order: frozen
max_ticks: 10
bodies:
  - label: Sun
    mass: 1.989e30
    position_au: [0.0, 0.0, 0.0]
    velocity_au_per_day: [0.0, 0.0, 0.0]
  - label: Earth
    mass: 5.972e24
    position_au: [1.0, 0.0, 0.0]
    velocity_au_per_day: [0.0, 0.0172, 0.0]
"#;

	fn with_bodies(bodies: &str) -> String {
		format!("start_time: 2022-01-01T00:00:00Z\nbodies:\n{}", bodies)
	}

	#[test]
	fn parses_and_fills_defaults() {
		let cfg = ScenarioConfig::from_yaml_str(TWO_BODY).unwrap();
		assert_eq!(cfg.bodies.len(), 2);
		assert_eq!(cfg.update_order, UpdateOrder::Frozen);
		assert_eq!(cfg.max_ticks, Some(10));
		assert_eq!(cfg.snapshot_cadence_secs, 604_800.0);
		assert_eq!(cfg.gravitational_constant, gravity::G);

		let driver = cfg.driver_config();
		assert_eq!(driver.timestep, Duration::seconds(60));
		assert_eq!(driver.snapshot_cadence, Duration::days(7));
	}

	#[test]
	fn build_converts_to_si_once() {
		let sys = ScenarioConfig::from_yaml_str(TWO_BODY).unwrap().build_system().unwrap();
		let earth = &sys.bodies()[1];
		assert_relative_eq!(earth.pos.x, units::AU_IN_METERS);
		assert_relative_eq!(earth.vel.y, 0.0172 * units::AU_IN_METERS / units::SECONDS_PER_DAY);
		assert_eq!(earth.mass(), 5.972e24);
		assert_eq!(sys.order(), UpdateOrder::Frozen);
		assert_eq!(sys.time(), Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap());
	}

	#[test]
	fn default_table_is_valid() {
		let cfg = ScenarioConfig::default_inner_system();
		cfg.validate().unwrap();
		let sys = cfg.build_system().unwrap();
		let labels: Vec<_> = sys.bodies().iter().map(|b| b.label.as_str()).collect();
		assert_eq!(labels, vec!["Sun", "Earth", "Mars"]);
	}

	#[test]
	fn rejects_non_positive_mass() {
		let yaml = with_bodies("  - {label: A, mass: 0.0, position_au: [0,0,0], velocity_au_per_day: [0,0,0]}\n");
		assert!(matches!(ScenarioConfig::from_yaml_str(&yaml), Err(Error::Configuration(_))));
	}

	#[test]
	fn rejects_duplicate_labels() {
		let yaml = with_bodies(concat!(
			"  - {label: A, mass: 1.0, position_au: [0,0,0], velocity_au_per_day: [0,0,0]}\n",
			"  - {label: A, mass: 1.0, position_au: [1,0,0], velocity_au_per_day: [0,0,0]}\n",
		));
		assert!(matches!(ScenarioConfig::from_yaml_str(&yaml), Err(Error::Configuration(_))));
	}

	#[test]
	fn rejects_coincident_bodies() {
		let yaml = with_bodies(concat!(
			"  - {label: A, mass: 1.0, position_au: [1,2,3], velocity_au_per_day: [0,0,0]}\n",
			"  - {label: B, mass: 1.0, position_au: [1,2,3], velocity_au_per_day: [0,0,0]}\n",
		));
		assert!(matches!(ScenarioConfig::from_yaml_str(&yaml), Err(Error::Configuration(_))));
	}

	#[test]
	fn rejects_empty_scenario_and_bad_timestep() {
		assert!(matches!(ScenarioConfig::from_yaml_str(&with_bodies("  []\n")), Err(Error::Configuration(_))));

		let mut cfg = ScenarioConfig::default_inner_system();
		cfg.timestep_secs = 0.0;
		assert!(cfg.validate().is_err());
		cfg.timestep_secs = Scalar::NAN;
		assert!(cfg.validate().is_err());
	}

	#[test]
	fn rejects_durations_too_long_to_represent() {
		let mut cfg = ScenarioConfig::default_inner_system();
		cfg.snapshot_cadence_secs = 1e12;
		assert!(matches!(cfg.validate(), Err(Error::Configuration(_))));

		cfg.snapshot_cadence_secs = default_cadence();
		cfg.timestep_secs = 1e10;
		assert!(matches!(cfg.validate(), Err(Error::Configuration(_))));

		// long but representable
		cfg.timestep_secs = 1e9;
		cfg.validate().unwrap();
		assert_eq!(cfg.driver_config().timestep, Duration::seconds(1_000_000_000));
	}

	#[test]
	fn malformed_yaml_is_a_yaml_error() {
		assert!(matches!(ScenarioConfig::from_yaml_str("bodies: [1, 2"), Err(Error::Yaml(_))));
	}
}
