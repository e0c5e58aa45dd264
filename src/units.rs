//! Conversions between astronomical units and SI.
//!
//! Everything inside the simulation is in meters, meters per second and
//! seconds. These helpers are only used at the configuration boundary and by
//! consumers that want to display AU.

use crate::prelude::*;

/// Mean Earth-Sun distance, 149.6 million km.
pub const AU_IN_METERS: Scalar = 149.6e6 * 1000.0;

pub const SECONDS_PER_DAY: Scalar = 86_400.0;

pub fn au_to_meters(au: Scalar) -> Scalar {
	au * AU_IN_METERS
}

pub fn meters_to_au(meters: Scalar) -> Scalar {
	meters / AU_IN_METERS
}

pub fn au_per_day_to_meters_per_second(au_per_day: Scalar) -> Scalar {
	au_per_day * AU_IN_METERS / SECONDS_PER_DAY
}

pub fn meters_per_second_to_au_per_day(meters_per_second: Scalar) -> Scalar {
	meters_per_second * SECONDS_PER_DAY / AU_IN_METERS
}

pub fn au_vector_to_meters(au: Vec3) -> Vec3 {
	au.map(au_to_meters)
}

pub fn meters_vector_to_au(meters: Vec3) -> Vec3 {
	meters.map(meters_to_au)
}

pub fn au_per_day_vector_to_meters_per_second(au_per_day: Vec3) -> Vec3 {
	au_per_day.map(au_per_day_to_meters_per_second)
}
