use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::prelude::*;

pub mod body;
pub mod config;
pub mod driver;
pub mod error;
pub mod gravity;
pub mod handoff;
pub mod prelude;
pub mod snapshot;
pub mod units;

/// How a tick orders force evaluation against position updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOrder {
	/// Bodies advance one at a time in list order; a body later in the list
	/// sees the already-advanced state of the ones before it.
	Sequential,
	/// Every acceleration comes from the state at the start of the tick.
	Frozen,
}

impl Default for UpdateOrder {
	fn default() -> Self {
		UpdateOrder::Sequential
	}
}

pub struct System {
	pub(crate) bodies: Vec<Body>,
	next: Vec<Body>,
	time: DateTime<Utc>,
	ticks: u64,
	g: Scalar,
	order: UpdateOrder,
}

impl System {
	pub fn new(bodies: Vec<Body>, start: DateTime<Utc>) -> Self {
		System {
			bodies,
			next: Vec::new(),
			time: start,
			ticks: 0,
			g: gravity::G,
			order: UpdateOrder::default(),
		}
	}

	pub fn with_gravitational_constant(mut self, g: Scalar) -> Self {
		self.g = g;
		self
	}

	pub fn with_order(mut self, order: UpdateOrder) -> Self {
		self.order = order;
		self
	}

	pub fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	pub fn time(&self) -> DateTime<Utc> {
		self.time
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	pub fn order(&self) -> UpdateOrder {
		self.order
	}

	/// Advances every body by `dt` seconds without touching the clock.
	pub fn step(&mut self, dt: Scalar) -> Result<()> {
		match self.order {
			UpdateOrder::Sequential => self.step_sequential(dt),
			UpdateOrder::Frozen => self.step_frozen(dt),
		}
	}

	/// Rolls forward in `next`, so a fault part way through leaves `bodies`
	/// as they were at the start of the tick.
	fn step_sequential(&mut self, dt: Scalar) -> Result<()> {
		self.next.clear();
		self.next.extend(self.bodies.iter().cloned());

		for i in 0..self.next.len() {
			let accel = gravity::acceleration_on(i, &self.next, self.g)?;
			self.next[i].advance(accel, dt);
		}

		std::mem::swap(&mut self.bodies, &mut self.next);
		self.next.clear();
		Ok(())
	}

	fn step_frozen(&mut self, dt: Scalar) -> Result<()> {
		self.next.clear();
		self.next.extend(self.bodies.iter().cloned());

		for i in 0..self.bodies.len() {
			let accel = gravity::acceleration_on(i, &self.bodies, self.g)?;
			self.next[i].advance(accel, dt);
		}

		std::mem::swap(&mut self.bodies, &mut self.next);
		self.next.clear();
		Ok(())
	}

	pub fn advance_clock(&mut self, dt: Duration) -> Result<()> {
		self.time = self.clock_after(dt)?;
		self.ticks += 1;
		Ok(())
	}

	fn clock_after(&self, dt: Duration) -> Result<DateTime<Utc>> {
		self.time
			.checked_add_signed(dt)
			.ok_or(Error::ClockOverflow { at: self.time, step: dt })
	}

	/// One step followed by the clock. On any error neither the bodies nor
	/// the clock move.
	pub fn tick(&mut self, dt: Duration) -> Result<()> {
		if dt <= Duration::zero() {
			return Err(Error::Configuration(format!("timestep must be positive, got {}", dt)));
		}
		let next_time = self.clock_after(dt)?;
		self.step(seconds(dt))?;
		self.time = next_time;
		self.ticks += 1;
		Ok(())
	}
}

pub(crate) fn seconds(d: Duration) -> Scalar {
	match d.num_nanoseconds() {
		Some(ns) => ns as Scalar / 1e9,
		None => d.num_milliseconds() as Scalar / 1e3,
	}
}
