//! Mass-spring force model shared by the pendulum chain and the cloth grid

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::physics::math::{Scalar, Vector, weight};
use crate::physics::spring::Spring;
use crate::physics::state::ParticleState;
use crate::physics::system::OdeSystem;

/// What "fixed" means for an anchored particle.
///
/// `ZeroForce` only discards the accumulated force, so an anchor that starts
/// with a velocity keeps drifting at that velocity. `Pinned` additionally
/// zeroes the anchor's starting velocity and its position derivative, so the
/// anchor never moves and reports no velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorMode {
    #[default]
    Pinned,
    ZeroForce,
}

/// Particles with gravity, linear drag, Hookean springs and fixed anchors.
///
/// Masses, springs and anchors are append-only: they are populated once by a
/// topology builder and never removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendulumSystem {
    masses: Vec<Scalar>,
    springs: Vec<Spring>,
    fixed: Vec<usize>,
    drag: Scalar,
    anchor_mode: AnchorMode,
}

impl PendulumSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_anchor_mode(mut self, mode: AnchorMode) -> Self {
        self.anchor_mode = mode;
        self
    }

    /// Append a particle and return its index
    pub fn add_mass(&mut self, mass: Scalar) -> Result<usize> {
        let index = self.masses.len();
        if !(mass.is_finite() && mass > 0.0) {
            return Err(SimulationError::InvalidMass { index, mass });
        }
        self.masses.push(mass);
        Ok(index)
    }

    pub fn add_spring(
        &mut self,
        a: usize,
        b: usize,
        stiffness: Scalar,
        rest_length: Scalar,
    ) -> Result<()> {
        self.check_index(a)?;
        self.check_index(b)?;
        if a == b {
            return Err(SimulationError::DegenerateSpring { index: a });
        }
        if !(stiffness.is_finite() && stiffness >= 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "spring stiffness",
                value: stiffness,
            });
        }
        if !(rest_length.is_finite() && rest_length >= 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "spring rest length",
                value: rest_length,
            });
        }
        self.springs.push(Spring::new(a, b, stiffness, rest_length));
        Ok(())
    }

    /// Anchor a particle. Fixing the same particle twice is a no-op.
    pub fn fix(&mut self, index: usize) -> Result<()> {
        self.check_index(index)?;
        if !self.fixed.contains(&index) {
            self.fixed.push(index);
        }
        Ok(())
    }

    pub fn set_drag(&mut self, drag: Scalar) -> Result<()> {
        if !(drag.is_finite() && drag >= 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "drag coefficient",
                value: drag,
            });
        }
        self.drag = drag;
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.masses.len() {
            return Err(SimulationError::ParticleOutOfBounds {
                index,
                count: self.masses.len(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn particle_count(&self) -> usize {
        self.masses.len()
    }

    pub fn masses(&self) -> &[Scalar] {
        &self.masses
    }

    pub fn springs(&self) -> &[Spring] {
        &self.springs
    }

    pub fn fixed(&self) -> &[usize] {
        &self.fixed
    }

    pub fn is_fixed(&self, index: usize) -> bool {
        self.fixed.contains(&index)
    }

    pub fn drag(&self) -> Scalar {
        self.drag
    }

    pub fn anchor_mode(&self) -> AnchorMode {
        self.anchor_mode
    }

    /// Net force on every particle, with anchors zeroed last so they win over
    /// gravity, drag and springs.
    ///
    /// # Panics
    ///
    /// Panics if `state` does not have one entry per particle.
    pub fn forces(&self, state: &ParticleState) -> Vec<Vector> {
        assert_eq!(
            state.len(),
            self.masses.len(),
            "state does not match the particle count"
        );

        let mut forces: Vec<Vector> = self
            .masses
            .iter()
            .zip(&state.velocities)
            .map(|(&mass, &velocity)| weight(mass) - self.drag * velocity)
            .collect();

        for spring in &self.springs {
            let [a, b] = spring.endpoints;
            let force = spring.force(state.positions[a], state.positions[b]);
            forces[a] += force;
            forces[b] -= force;
        }

        for &index in &self.fixed {
            forces[index] = Vector::ZERO;
        }

        forces
    }

    /// Kinetic, gravitational and elastic energy of a state
    pub fn total_energy(&self, state: &ParticleState) -> Scalar {
        let kinetic: Scalar = self
            .masses
            .iter()
            .zip(&state.velocities)
            .map(|(m, v)| 0.5 * m * v.length_squared())
            .sum();
        let gravitational: Scalar = self
            .masses
            .iter()
            .zip(&state.positions)
            .map(|(m, p)| -weight(*m).y * p.y)
            .sum();
        let elastic: Scalar = self
            .springs
            .iter()
            .map(|s| s.potential_energy(state.positions[s.endpoints[0]], state.positions[s.endpoints[1]]))
            .sum();
        kinetic + gravitational + elastic
    }
}

impl OdeSystem for PendulumSystem {
    type State = ParticleState;

    /// Forces do not depend on time, so `_time` is unused.
    fn time_derivative(&self, state: &ParticleState, _time: Scalar) -> ParticleState {
        let accelerations = self
            .forces(state)
            .into_iter()
            .zip(&self.masses)
            .map(|(force, mass)| force / *mass)
            .collect();

        let mut velocities = state.velocities.clone();
        if self.anchor_mode == AnchorMode::Pinned {
            for &index in &self.fixed {
                velocities[index] = Vector::ZERO;
            }
        }

        ParticleState {
            positions: velocities,
            velocities: accelerations,
        }
    }

    fn check_state(&self, state: &ParticleState) -> Result<()> {
        if state.len() != self.masses.len() {
            return Err(SimulationError::LengthMismatch {
                what: "initial positions",
                expected: self.masses.len(),
                actual: state.len(),
            });
        }
        Ok(())
    }

    fn constrain(&self, state: &mut ParticleState) {
        if self.anchor_mode == AnchorMode::Pinned {
            for &index in &self.fixed {
                if let Some(velocity) = state.velocities.get_mut(index) {
                    *velocity = Vector::ZERO;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_particle_chain() -> PendulumSystem {
        let mut system = PendulumSystem::new();
        system.add_mass(5.0).unwrap();
        system.add_mass(5.0).unwrap();
        system.add_spring(0, 1, 200.0, 0.25).unwrap();
        system.fix(0).unwrap();
        system.set_drag(1.5).unwrap();
        system
    }

    #[test]
    fn test_rest_length_chain_only_feels_gravity() {
        let system = two_particle_chain();
        let state = ParticleState::from_positions(vec![
            Vector::ZERO,
            Vector::new(0.0, -0.25, 0.0),
        ]);

        let derivative = system.time_derivative(&state, 0.0);

        assert_eq!(derivative.velocities[0], Vector::ZERO);
        let a1 = derivative.velocities[1];
        assert!((a1 - Vector::new(0.0, -9.81, 0.0)).length() < 1e-9);
        assert_eq!(derivative.positions, state.velocities);
    }

    #[test]
    fn test_drag_opposes_velocity() {
        let mut system = PendulumSystem::new();
        system.add_mass(2.0).unwrap();
        system.set_drag(0.5).unwrap();
        let state = ParticleState::new(vec![Vector::ZERO], vec![Vector::new(4.0, 0.0, 0.0)]).unwrap();

        let forces = system.forces(&state);
        assert_eq!(forces[0], Vector::new(-2.0, -2.0 * 9.81, 0.0));
    }

    #[test]
    fn test_spring_forces_are_equal_and_opposite() {
        let mut system = PendulumSystem::new();
        system.add_mass(1.0).unwrap();
        system.add_mass(3.0).unwrap();
        system.add_spring(0, 1, 50.0, 1.0).unwrap();
        let state = ParticleState::from_positions(vec![Vector::ZERO, Vector::new(2.0, 1.0, -1.0)]);

        let forces = system.forces(&state);
        let spring_a = forces[0] - weight(1.0);
        let spring_b = forces[1] - weight(3.0);
        assert!((spring_a + spring_b).length() < 1e-12);
        assert!(spring_a.dot(Vector::new(2.0, 1.0, -1.0)) > 0.0);
    }

    #[test]
    fn test_zero_length_spring_is_finite() {
        let mut system = PendulumSystem::new();
        system.add_mass(1.0).unwrap();
        system.add_mass(1.0).unwrap();
        system.add_spring(0, 1, 1e6, 0.5).unwrap();
        let p = Vector::new(0.3, 0.3, 0.3);
        let state = ParticleState::from_positions(vec![p, p]);

        let derivative = system.time_derivative(&state, 0.0);
        assert!(derivative.is_finite());
        for acceleration in &derivative.velocities {
            assert!((*acceleration - Vector::new(0.0, -9.81, 0.0)).length() < 1e-12);
        }
    }

    #[test]
    fn test_fixed_particle_has_zero_acceleration() {
        let mut system = two_particle_chain();
        system.add_mass(5.0).unwrap();
        system.add_spring(1, 2, 500.0, 0.1).unwrap();
        system.fix(2).unwrap();
        let state = ParticleState::new(
            vec![Vector::ZERO, Vector::new(1.0, -3.0, 0.0), Vector::new(0.0, 4.0, 2.0)],
            vec![Vector::new(1.0, 1.0, 1.0), Vector::ZERO, Vector::new(0.0, -7.0, 0.0)],
        )
        .unwrap();

        let derivative = system.time_derivative(&state, 0.0);
        assert_eq!(derivative.velocities[0], Vector::ZERO);
        assert_eq!(derivative.velocities[2], Vector::ZERO);
        assert_ne!(derivative.velocities[1], Vector::ZERO);
    }

    #[test]
    fn test_anchor_modes_differ_in_position_derivative() {
        let moving_anchor = ParticleState::new(
            vec![Vector::ZERO, Vector::new(0.0, -0.25, 0.0)],
            vec![Vector::new(1.0, 0.0, 0.0), Vector::ZERO],
        )
        .unwrap();

        let pinned = two_particle_chain();
        let derivative = pinned.time_derivative(&moving_anchor, 0.0);
        assert_eq!(derivative.positions[0], Vector::ZERO);

        let zero_force = two_particle_chain().with_anchor_mode(AnchorMode::ZeroForce);
        let derivative = zero_force.time_derivative(&moving_anchor, 0.0);
        assert_eq!(derivative.positions[0], Vector::new(1.0, 0.0, 0.0));
        assert_eq!(derivative.velocities[0], Vector::ZERO);
    }

    #[test]
    fn test_pinned_anchor_starts_at_rest() {
        let mut state = ParticleState::new(
            vec![Vector::ZERO, Vector::new(0.0, -0.25, 0.0)],
            vec![Vector::new(1.0, 0.0, 0.0), Vector::new(0.0, 0.0, 2.0)],
        )
        .unwrap();

        let mut coasting = state.clone();
        two_particle_chain()
            .with_anchor_mode(AnchorMode::ZeroForce)
            .constrain(&mut coasting);
        assert_eq!(coasting, state);

        two_particle_chain().constrain(&mut state);
        assert_eq!(state.velocities[0], Vector::ZERO);
        assert_eq!(state.velocities[1], Vector::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        let mut system = PendulumSystem::new();
        assert_eq!(
            system.add_mass(0.0),
            Err(SimulationError::InvalidMass { index: 0, mass: 0.0 })
        );
        system.add_mass(1.0).unwrap();
        assert_eq!(
            system.add_spring(0, 1, 1.0, 1.0),
            Err(SimulationError::ParticleOutOfBounds { index: 1, count: 1 })
        );
        assert_eq!(
            system.add_spring(0, 0, 1.0, 1.0),
            Err(SimulationError::DegenerateSpring { index: 0 })
        );
        assert!(system.fix(3).is_err());
        assert!(system.set_drag(-1.0).is_err());
        assert!(system.springs().is_empty());
    }

    #[test]
    fn test_fix_is_idempotent() {
        let mut system = two_particle_chain();
        system.fix(0).unwrap();
        assert_eq!(system.fixed(), &[0]);
        assert!(system.is_fixed(0));
        assert!(!system.is_fixed(1));
    }

    #[test]
    fn test_energy_decreases_with_drag() {
        let system = two_particle_chain();
        let state = ParticleState::new(
            vec![Vector::ZERO, Vector::new(0.25, 0.0, 0.0)],
            vec![Vector::ZERO, Vector::new(0.0, 0.0, 1.0)],
        )
        .unwrap();
        let energy_before = system.total_energy(&state);
        let derivative = system.time_derivative(&state, 0.0);
        let next = state.clone() + derivative * 1e-3;
        assert!(system.total_energy(&next) < energy_before);
    }
}
