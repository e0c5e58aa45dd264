use chrono::{DateTime, Utc};

use crate::prelude::*;
use crate::units;

/// Copy of one body at snapshot time.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyState {
	pub label: String,
	pub position: Vec3,
	pub velocity: Vec3,
}

impl From<&Body> for BodyState {
	fn from(body: &Body) -> Self {
		BodyState {
			label: body.label.clone(),
			position: body.pos,
			velocity: body.vel,
		}
	}
}

/// Every body as of one completed tick, plus throughput since the last one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
	pub bodies: Vec<BodyState>,
	pub simulated_time: DateTime<Utc>,
	pub tick: u64,
	pub iterations_per_second: Scalar,
}

impl Snapshot {
	pub fn capture(system: &System, iterations_per_second: Scalar) -> Self {
		Snapshot {
			bodies: system.bodies.iter().map(BodyState::from).collect(),
			simulated_time: system.time(),
			tick: system.ticks(),
			iterations_per_second,
		}
	}

	pub fn len(&self) -> usize {
		self.bodies.len()
	}

	pub fn is_empty(&self) -> bool {
		self.bodies.is_empty()
	}

	pub fn position_au(&self, idx: usize) -> Vec3 {
		units::meters_vector_to_au(self.bodies[idx].position)
	}

	pub fn separation_au(&self, a: usize, b: usize) -> Scalar {
		units::meters_to_au((self.bodies[a].position - self.bodies[b].position).norm())
	}
}
