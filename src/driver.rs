//! The simulation loop.
//!
//! The driver owns the `System` outright. It ticks at a fixed step and, each
//! time simulated time passes the snapshot cadence, copies the bodies into a
//! `Snapshot` and hands it over through the rendezvous. No tick runs until
//! the consumer has acknowledged.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info};

use crate::handoff::Producer;
use crate::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
	pub timestep: Duration,
	pub snapshot_cadence: Duration,
	/// Stop after this many completed ticks. `None` runs until stopped.
	pub max_ticks: Option<u64>,
}

impl Default for DriverConfig {
	fn default() -> Self {
		DriverConfig {
			timestep: Duration::seconds(1),
			snapshot_cadence: Duration::days(7),
			max_ticks: None,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
	StopRequested,
	ConsumerGone,
	TickLimit,
	Faulted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
	Idle,
	Running,
	Stopped(StopReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
	pub ticks: u64,
	pub snapshots: u64,
	pub simulated_time: DateTime<Utc>,
	pub reason: StopReason,
}

/// Asks a running driver to stop before its next tick.
///
/// A driver blocked in a handoff sees the request once the consumer
/// acknowledges, and stops without ticking again.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
	pub fn stop(&self) {
		self.0.store(true, Ordering::SeqCst);
	}

	pub fn is_stopped(&self) -> bool {
		self.0.load(Ordering::SeqCst)
	}
}

pub struct Driver {
	system: System,
	config: DriverConfig,
	stop: StopHandle,
	state: RunState,
}

impl Driver {
	pub fn new(system: System, config: DriverConfig) -> Self {
		Driver {
			system,
			config,
			stop: StopHandle::default(),
			state: RunState::Idle,
		}
	}

	pub fn system(&self) -> &System {
		&self.system
	}

	pub fn config(&self) -> &DriverConfig {
		&self.config
	}

	pub fn state(&self) -> RunState {
		self.state
	}

	pub fn stop_handle(&self) -> StopHandle {
		self.stop.clone()
	}

	pub fn run(&mut self, producer: &Producer) -> Result<RunSummary> {
		let dt = self.config.timestep;
		let cadence = self.config.snapshot_cadence;
		if dt <= Duration::zero() || cadence <= Duration::zero() {
			return Err(Error::Configuration(format!(
				"timestep ({}) and snapshot cadence ({}) must be positive",
				dt, cadence
			)));
		}

		info!(
			"driver starting at {} with {} bodies, dt {}, snapshot every {}",
			self.system.time(),
			self.system.bodies().len(),
			dt,
			cadence
		);
		self.state = RunState::Running;

		let mut last_snapshot: Option<DateTime<Utc>> = None;
		let mut last_delivery: Option<Instant> = None;
		let mut iterations: u64 = 0;
		let mut snapshots: u64 = 0;

		let reason = loop {
			if self.stop.is_stopped() {
				break StopReason::StopRequested;
			}
			if let Some(max) = self.config.max_ticks {
				if self.system.ticks() >= max {
					break StopReason::TickLimit;
				}
			}

			let due = match last_snapshot {
				None => true,
				// a cadence past the end of the calendar is never due
				Some(at) => at.checked_add_signed(cadence).map_or(false, |t| self.system.time() > t),
			};
			if due {
				let ips = iterations_per_second(iterations, last_delivery.map(|t| t.elapsed()));
				let snapshot = Snapshot::capture(&self.system, ips);
				debug!(
					"snapshot {} at {} (tick {}, {:.0} i/s)",
					snapshots, snapshot.simulated_time, snapshot.tick, ips
				);
				match producer.deliver(snapshot) {
					Ok(()) => {}
					Err(Error::HandoffClosed) => break StopReason::ConsumerGone,
					Err(e) => return Err(self.fault(e)),
				}
				last_snapshot = Some(self.system.time());
				last_delivery = Some(Instant::now());
				iterations = 0;
				snapshots += 1;

				if self.stop.is_stopped() {
					break StopReason::StopRequested;
				}
			}

			if let Err(e) = self.system.tick(dt) {
				return Err(self.fault(e));
			}
			iterations += 1;
		};

		self.state = RunState::Stopped(reason);
		info!(
			"driver stopped ({:?}) after {} ticks, {} snapshots, at {}",
			reason,
			self.system.ticks(),
			snapshots,
			self.system.time()
		);

		Ok(RunSummary {
			ticks: self.system.ticks(),
			snapshots,
			simulated_time: self.system.time(),
			reason,
		})
	}

	fn fault(&mut self, e: Error) -> Error {
		error!("simulation halted at tick {}: {}", self.system.ticks(), e);
		self.state = RunState::Stopped(StopReason::Faulted);
		e
	}

	/// Runs on a dedicated thread; the driver comes back with the summary.
	pub fn spawn(mut self, producer: Producer) -> Result<thread::JoinHandle<(Driver, Result<RunSummary>)>> {
		let handle = thread::Builder::new().name("orrery-driver".into()).spawn(move || {
			let summary = self.run(&producer);
			(self, summary)
		})?;
		Ok(handle)
	}
}

/// Ticks per wall-clock second; 0 when there is no previous delivery to
/// measure from.
pub fn iterations_per_second(iterations: u64, elapsed: Option<std::time::Duration>) -> Scalar {
	match elapsed {
		Some(d) if d.as_secs_f64() > 0.0 => iterations as Scalar / d.as_secs_f64(),
		_ => 0.0,
	}
}
