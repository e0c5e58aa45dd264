use crate::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub label: String,
    mass: Scalar,
    pub pos: Vec3,
    pub vel: Vec3,
}

impl Body {
    /// `mass` in kg, `pos` in m, `vel` in m/s.
    pub fn new(label: impl Into<String>, mass: Scalar, pos: Vec3, vel: Vec3) -> Result<Self> {
        let label = label.into();
        if !(mass.is_finite() && mass > 0.0) {
            return Err(Error::Configuration(format!("body {:?} has non-positive mass {}", label, mass)));
        }
        if !pos.iter().chain(vel.iter()).all(|c| c.is_finite()) {
            return Err(Error::Configuration(format!("body {:?} has a non-finite coordinate", label)));
        }
        Ok(Body { label, mass, pos, vel })
    }

    pub fn mass(&self) -> Scalar {
        self.mass
    }

    pub fn dist(&self, other: &Self) -> Scalar {
        na::distance(&Point3::from(self.pos), &Point3::from(other.pos))
    }

    pub fn dist2(&self, other: &Self) -> Scalar {
        na::distance_squared(&Point3::from(self.pos), &Point3::from(other.pos))
    }

    /// Euler-Cromer: the position update uses the velocity just written.
    pub fn advance(&mut self, accel: Vec3, dt: Scalar) {
        self.vel += accel * dt;
        self.pos += self.vel * dt;
    }
}
