use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// Two bodies share a position, so the inverse-square term has no value.
	#[error("bodies {body} and {other} are coincident; acceleration is undefined")]
	DegenerateDistance { body: String, other: String },

	/// The simulated clock would leave chrono's representable range.
	#[error("simulated clock overflows stepping {step} past {at}")]
	ClockOverflow { at: DateTime<Utc>, step: Duration },

	#[error("invalid scenario: {0}")]
	Configuration(String),

	#[error("handoff peer disconnected")]
	HandoffClosed,

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Yaml(#[from] serde_yaml::Error),
}

impl Error {
	pub(crate) fn config(msg: impl Into<String>) -> Self {
		Error::Configuration(msg.into())
	}
}
