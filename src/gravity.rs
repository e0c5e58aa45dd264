//! Direct pairwise gravity.
//!
//! The acceleration on a body is summed over every other body in the list.
//! The attracted body's own mass never enters the sum: `G * m_other / d^2`
//! is already an acceleration.

use crate::prelude::*;

/// Gravitational constant in m^3 kg^-1 s^-2.
pub const G: Scalar = 6.67430e-11;

/// Acceleration on `bodies[idx]` from all other bodies as they are right now.
///
/// Coincident bodies yield `Error::DegenerateDistance`.
pub fn acceleration_on(idx: usize, bodies: &[Body], g: Scalar) -> Result<Vec3> {
	let body = &bodies[idx];
	let mut accel = Vec3::zeros();

	for (j, other) in bodies.iter().enumerate() {
		if j == idx {
			continue;
		}

		let dr = other.pos - body.pos;
		let d = dr.norm();
		let f = g * other.mass() / (d * d);
		let contribution = dr * (f / d);

		if !(d > 0.0) || !contribution.iter().all(|c| c.is_finite()) {
			return Err(Error::DegenerateDistance {
				body: body.label.clone(),
				other: other.label.clone(),
			});
		}

		accel += contribution;
	}

	Ok(accel)
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	fn body(label: &str, mass: Scalar, x: Scalar) -> Body {
		Body::new(label, mass, Vec3::new(x, 0.0, 0.0), Vec3::zeros()).unwrap()
	}

	#[test]
	fn lone_body_feels_nothing() {
		let bodies = vec![body("a", 1.0e30, 0.0)];
		assert_eq!(acceleration_on(0, &bodies, G).unwrap(), Vec3::zeros());
	}

	#[test]
	fn points_toward_the_other_body() {
		let bodies = vec![body("a", 1.0, 0.0), body("b", 1.0e20, 10.0)];
		let a = acceleration_on(0, &bodies, G).unwrap();
		assert!(a.x > 0.0);
		assert_eq!(a.y, 0.0);
		let b = acceleration_on(1, &bodies, G).unwrap();
		assert!(b.x < 0.0);
	}

	#[test]
	fn ignores_own_mass() {
		let light = vec![body("a", 1.0, 0.0), body("b", 5.0e24, 1.0e7)];
		let heavy = vec![body("a", 1.0e28, 0.0), body("b", 5.0e24, 1.0e7)];
		let a_light = acceleration_on(0, &light, G).unwrap();
		let a_heavy = acceleration_on(0, &heavy, G).unwrap();
		assert_relative_eq!(a_light, a_heavy);
		assert_relative_eq!(a_light.x, G * 5.0e24 / 1.0e14, max_relative = 1e-12);
	}

	#[test]
	fn follows_inverse_square() {
		let near = vec![body("a", 1.0, 0.0), body("b", 1.0e20, 1.0e6)];
		let far = vec![body("a", 1.0, 0.0), body("b", 1.0e20, 2.0e6)];
		let ratio = acceleration_on(0, &near, G).unwrap().norm() / acceleration_on(0, &far, G).unwrap().norm();
		assert_relative_eq!(ratio, 4.0, max_relative = 1e-12);
	}

	#[test]
	fn coincident_bodies_are_an_error() {
		let bodies = vec![body("a", 1.0, 3.0), body("b", 1.0, 0.0), body("c", 1.0, 3.0)];
		match acceleration_on(0, &bodies, G) {
			Err(Error::DegenerateDistance { body, other }) => {
				assert_eq!(body, "a");
				assert_eq!(other, "c");
			}
			other => panic!("expected DegenerateDistance, got {:?}", other),
		}
		// b is clear of both
		assert!(acceleration_on(1, &bodies, G).is_ok());
	}
}
