//! Rendezvous between the simulation thread and a single consumer.
//!
//! Both directions are zero-capacity channels. `Producer::deliver` returns
//! only once the consumer has taken the snapshot *and* acknowledged it, so at
//! most one snapshot is ever in flight and the producer cannot tick while the
//! consumer is reading.

use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use log::trace;

use crate::prelude::*;

pub fn channel() -> (Producer, Consumer) {
	let (deliver_tx, deliver_rx) = bounded(0);
	let (ack_tx, ack_rx) = bounded(0);
	(
		Producer { deliver: deliver_tx, ack: ack_rx },
		Consumer { deliver: deliver_rx, ack: ack_tx },
	)
}

pub struct Producer {
	deliver: Sender<Snapshot>,
	ack: Receiver<()>,
}

impl Producer {
	/// Blocks until the consumer has received and acknowledged `snapshot`.
	pub fn deliver(&self, snapshot: Snapshot) -> Result<()> {
		let tick = snapshot.tick;
		self.deliver.send(snapshot).map_err(|_| Error::HandoffClosed)?;
		trace!("snapshot for tick {} taken, waiting for ack", tick);
		self.ack.recv().map_err(|_| Error::HandoffClosed)
	}
}

pub struct Consumer {
	deliver: Receiver<Snapshot>,
	ack: Sender<()>,
}

impl Consumer {
	pub fn recv(&self) -> Result<Delivery> {
		let snapshot = self.deliver.recv().map_err(|_| Error::HandoffClosed)?;
		Ok(self.wrap(snapshot))
	}

	/// `Ok(None)` when nothing arrived in time.
	pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<Delivery>> {
		match self.deliver.recv_timeout(timeout) {
			Ok(snapshot) => Ok(Some(self.wrap(snapshot))),
			Err(RecvTimeoutError::Timeout) => Ok(None),
			Err(RecvTimeoutError::Disconnected) => Err(Error::HandoffClosed),
		}
	}

	pub fn try_recv(&self) -> Result<Option<Delivery>> {
		match self.deliver.try_recv() {
			Ok(snapshot) => Ok(Some(self.wrap(snapshot))),
			Err(TryRecvError::Empty) => Ok(None),
			Err(TryRecvError::Disconnected) => Err(Error::HandoffClosed),
		}
	}

	fn wrap(&self, snapshot: Snapshot) -> Delivery {
		Delivery {
			snapshot,
			ack: self.ack.clone(),
		}
	}
}

/// A received snapshot that the producer is still waiting on.
///
/// The producer stays paused until this is acknowledged or dropped.
pub struct Delivery {
	snapshot: Snapshot,
	ack: Sender<()>,
}

impl Delivery {
	pub fn snapshot(&self) -> &Snapshot {
		&self.snapshot
	}

	/// Takes the snapshot, then releases the producer.
	pub fn acknowledge(mut self) -> Snapshot {
		std::mem::take(&mut self.snapshot)
	}
}

impl Drop for Delivery {
	fn drop(&mut self) {
		// producer may have gone away; nothing left to release then
		let _ = self.ack.send(());
	}
}
