//! Particle state and the vector-space arithmetic integrators rely on

use std::ops::{Add, Mul};

use crate::error::{Result, SimulationError};
use crate::physics::math::{Scalar, Vector, all_finite};

/// Capabilities a state needs for the integrator formulas to type-check:
/// `state + state` and `state * scalar`, both by value.
pub trait StateSpace: Clone + Add<Output = Self> + Mul<Scalar, Output = Self> {}

impl<T> StateSpace for T where T: Clone + Add<Output = T> + Mul<Scalar, Output = T> {}

/// Per-particle positions and velocities, indexed by particle id.
///
/// Both sequences always have the same length. Arithmetic is elementwise
/// over positions and velocities independently, which is what lets the same
/// struct hold both a state and its time derivative.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleState {
    pub positions: Vec<Vector>,
    pub velocities: Vec<Vector>,
}

impl ParticleState {
    /// A state of `count` particles at the origin, at rest
    pub fn zeros(count: usize) -> Self {
        Self {
            positions: vec![Vector::ZERO; count],
            velocities: vec![Vector::ZERO; count],
        }
    }

    /// Particles at `positions`, all at rest
    pub fn from_positions(positions: Vec<Vector>) -> Self {
        let velocities = vec![Vector::ZERO; positions.len()];
        Self {
            positions,
            velocities,
        }
    }

    /// Build from explicit sequences, rejecting mismatched lengths
    pub fn new(positions: Vec<Vector>, velocities: Vec<Vector>) -> Result<Self> {
        if positions.len() != velocities.len() {
            return Err(SimulationError::LengthMismatch {
                what: "initial velocities",
                expected: positions.len(),
                actual: velocities.len(),
            });
        }
        Ok(Self {
            positions,
            velocities,
        })
    }

    /// Replace the velocities, keeping the length invariant
    pub fn with_velocities(self, velocities: Vec<Vector>) -> Result<Self> {
        Self::new(self.positions, velocities)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn is_finite(&self) -> bool {
        all_finite(&self.positions) && all_finite(&self.velocities)
    }

    /// Elementwise sum that reports a length mismatch instead of panicking
    pub fn try_add(&self, other: &Self) -> Result<Self> {
        if self.len() != other.len() {
            return Err(SimulationError::LengthMismatch {
                what: "state addition",
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(Self {
            positions: zip_with(&self.positions, &other.positions, |a, b| a + b),
            velocities: zip_with(&self.velocities, &other.velocities, |a, b| a + b),
        })
    }

    /// Multiply every position and velocity by `factor`
    pub fn scaled(&self, factor: Scalar) -> Self {
        Self {
            positions: self.positions.iter().map(|p| *p * factor).collect(),
            velocities: self.velocities.iter().map(|v| *v * factor).collect(),
        }
    }
}

fn zip_with(a: &[Vector], b: &[Vector], op: impl Fn(Vector, Vector) -> Vector) -> Vec<Vector> {
    a.iter().zip(b).map(|(x, y)| op(*x, *y)).collect()
}

impl Add for ParticleState {
    type Output = ParticleState;

    /// # Panics
    ///
    /// Panics if the two states describe different particle counts.
    fn add(mut self, rhs: ParticleState) -> ParticleState {
        assert_eq!(
            self.len(),
            rhs.len(),
            "cannot add particle states of different lengths"
        );
        for (p, q) in self.positions.iter_mut().zip(&rhs.positions) {
            *p += *q;
        }
        for (v, w) in self.velocities.iter_mut().zip(&rhs.velocities) {
            *v += *w;
        }
        self
    }
}

impl Mul<Scalar> for ParticleState {
    type Output = ParticleState;

    fn mul(mut self, rhs: Scalar) -> ParticleState {
        self.positions.iter_mut().for_each(|p| *p *= rhs);
        self.velocities.iter_mut().for_each(|v| *v *= rhs);
        self
    }
}

impl Mul<ParticleState> for Scalar {
    type Output = ParticleState;

    fn mul(self, rhs: ParticleState) -> ParticleState {
        rhs * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(offset: Scalar) -> ParticleState {
        ParticleState {
            positions: vec![
                Vector::new(1.0 + offset, 2.0, 3.0),
                Vector::new(-1.0, offset, 0.5),
            ],
            velocities: vec![
                Vector::new(0.0, -offset, 1.0),
                Vector::new(4.0, 5.0, 6.0 * offset),
            ],
        }
    }

    #[test]
    fn test_add_is_elementwise() {
        let a = sample(1.0);
        let b = sample(2.0);
        let sum = a.clone() + b.clone();

        for i in 0..a.len() {
            assert_eq!(sum.positions[i], a.positions[i] + b.positions[i]);
            assert_eq!(sum.velocities[i], a.velocities[i] + b.velocities[i]);
        }
    }

    #[test]
    fn test_scalar_multiplication_both_sides() {
        let a = sample(0.5);
        let left = 2.5 * a.clone();
        let right = a.clone() * 2.5;

        assert_eq!(left, right);
        for i in 0..a.len() {
            assert_eq!(left.positions[i], a.positions[i] * 2.5);
            assert_eq!(left.velocities[i], a.velocities[i] * 2.5);
        }
        assert_eq!(a.scaled(2.5), left);
    }

    #[test]
    fn test_try_add_rejects_length_mismatch() {
        let a = ParticleState::zeros(2);
        let b = ParticleState::zeros(3);
        assert_eq!(
            a.try_add(&b),
            Err(SimulationError::LengthMismatch {
                what: "state addition",
                expected: 2,
                actual: 3,
            })
        );
        assert_eq!(a.try_add(&a).unwrap(), a);
    }

    #[test]
    #[should_panic(expected = "different lengths")]
    fn test_add_operator_panics_on_mismatch() {
        let _ = ParticleState::zeros(1) + ParticleState::zeros(2);
    }

    #[test]
    fn test_from_positions_starts_at_rest() {
        let state = ParticleState::from_positions(vec![Vector::X, Vector::Y]);
        assert_eq!(state.velocities, vec![Vector::ZERO; 2]);
        assert!(
            state
                .clone()
                .with_velocities(vec![Vector::ZERO])
                .is_err()
        );
    }

    #[test]
    fn test_is_finite() {
        let mut state = sample(1.0);
        assert!(state.is_finite());
        state.velocities[1].y = Scalar::NAN;
        assert!(!state.is_finite());
    }
}
