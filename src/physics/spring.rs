//! Hookean springs between pairs of particles

use crate::physics::math::{Scalar, Vector};

/// A spring joining particles `endpoints[0]` and `endpoints[1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    pub endpoints: [usize; 2],
    /// Stiffness in N/m
    pub stiffness: Scalar,
    pub rest_length: Scalar,
}

impl Spring {
    pub fn new(a: usize, b: usize, stiffness: Scalar, rest_length: Scalar) -> Self {
        Self {
            endpoints: [a, b],
            stiffness,
            rest_length,
        }
    }

    /// Force this spring exerts on its first endpoint. The second endpoint
    /// receives the negation.
    ///
    /// Coincident endpoints have no defined direction, so the force is zero.
    /// This is an approximation, not a physical resolution of the overlap.
    pub fn force(&self, position_a: Vector, position_b: Vector) -> Vector {
        let d = position_a - position_b;
        let length = d.length();
        if length == 0.0 {
            return Vector::ZERO;
        }
        -self.stiffness * (length - self.rest_length) * (d / length)
    }

    /// Elastic potential energy stored at the given endpoint positions
    pub fn potential_energy(&self, position_a: Vector, position_b: Vector) -> Scalar {
        let stretch = position_a.distance(position_b) - self.rest_length;
        0.5 * self.stiffness * stretch * stretch
    }
}
