use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info, warn};

use orrery::config::ScenarioConfig;
use orrery::driver::Driver;
use orrery::handoff;
use orrery::snapshot::Snapshot;

/// Runs a scenario and logs every snapshot the simulation hands over.
#[derive(Parser, Debug)]
struct Args {
	/// Scenario YAML; the built-in Sun/Earth/Mars table when omitted.
	#[arg(short, long)]
	scenario: Option<PathBuf>,

	/// Stop after this many snapshots. 0 runs until killed.
	#[arg(short = 'n', long, default_value_t = 0)]
	snapshots: u64,

	#[arg(short, long)]
	verbose: bool,
}

fn setup_logging(verbose: bool) -> Result<()> {
	let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Info };
	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!(
				"{}[{}][{}] {}",
				chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
				record.target(),
				record.level(),
				message
			))
		})
		.level(level)
		.chain(std::io::stdout())
		.apply()?;
	Ok(())
}

fn report(snapshot: &Snapshot) {
	info!(
		"{} objects: {} {:.0}(i/s)",
		snapshot.len(),
		snapshot.simulated_time,
		snapshot.iterations_per_second
	);
	for (i, body) in snapshot.bodies.iter().enumerate() {
		let au = snapshot.position_au(i);
		debug!(
			"  {:<8} ({:+.5}, {:+.5}, {:+.5}) AU, {:.5} AU from {}",
			body.label,
			au.x,
			au.y,
			au.z,
			snapshot.separation_au(0, i),
			snapshot.bodies[0].label
		);
	}
}

fn main() -> Result<()> {
	let args = Args::parse();
	setup_logging(args.verbose)?;

	let scenario = match &args.scenario {
		Some(path) => ScenarioConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
		None => ScenarioConfig::default_inner_system(),
	};
	scenario.validate().context("scenario rejected")?;

	let driver = Driver::new(scenario.build_system()?, scenario.driver_config());
	let stop = driver.stop_handle();
	let (producer, consumer) = handoff::channel();
	let sim = driver.spawn(producer)?;

	let mut seen = 0u64;
	while let Ok(delivery) = consumer.recv() {
		let snapshot = delivery.acknowledge();
		report(&snapshot);
		seen += 1;
		if args.snapshots != 0 && seen >= args.snapshots {
			stop.stop();
			break;
		}
	}
	drop(consumer);

	let (_, summary) = sim.join().map_err(|_| anyhow::anyhow!("simulation thread panicked"))?;
	match summary {
		Ok(summary) => {
			info!(
				"done: {} ticks, {} snapshots, simulated time {} ({:?})",
				summary.ticks, summary.snapshots, summary.simulated_time, summary.reason
			);
			Ok(())
		}
		Err(e) => {
			warn!("simulation ended with an error");
			Err(e.into())
		}
	}
}
