//! Publishing simulated particles to a renderer
//!
//! The simulation never owns scene objects. A [`ParticleVisuals`]
//! implementation hands out opaque handles, and a [`VisualBinding`] keeps
//! those handles next to the spring geometry derived from each state.

use bevy::log::trace;

use crate::error::{Result, SimulationError};
use crate::physics::math::Vector;
use crate::physics::spring::Spring;
use crate::physics::state::ParticleState;

/// The renderer side of a simulation
pub trait ParticleVisuals {
    type Handle;

    /// Create one visual per particle at its starting position
    fn create_primitive(&mut self, position: Vector) -> Self::Handle;

    fn set_primitive_position(&mut self, handle: &Self::Handle, position: Vector);

    /// Replace all line geometry: each pair indexes two entries of `positions`
    fn build_line_geometry(&mut self, positions: &[Vector], pairs: &[[usize; 2]]);
}

/// Line segments along every spring, rebuilt from the current positions.
///
/// Vertex `2k` and `2k + 1` are the endpoints of spring `k`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpringSegments {
    endpoints: Vec<[usize; 2]>,
    vertices: Vec<Vector>,
    pairs: Vec<[usize; 2]>,
}

impl SpringSegments {
    pub fn from_springs(springs: &[Spring]) -> Self {
        let endpoints: Vec<[usize; 2]> = springs.iter().map(|s| s.endpoints).collect();
        let pairs = (0..endpoints.len()).map(|k| [2 * k, 2 * k + 1]).collect();
        Self {
            vertices: Vec::with_capacity(endpoints.len() * 2),
            endpoints,
            pairs,
        }
    }

    /// Recompute the vertices from particle positions
    pub fn update(&mut self, positions: &[Vector]) {
        self.vertices.clear();
        for [a, b] in &self.endpoints {
            self.vertices.push(positions[*a]);
            self.vertices.push(positions[*b]);
        }
    }

    pub fn vertices(&self) -> &[Vector] {
        &self.vertices
    }

    pub fn pairs(&self) -> &[[usize; 2]] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Vector, Vector)> + '_ {
        self.pairs
            .iter()
            .map(|[a, b]| (self.vertices[*a], self.vertices[*b]))
    }
}

/// Handles for one simulation's particles plus its spring geometry
#[derive(Debug, Clone)]
pub struct VisualBinding<H> {
    handles: Vec<H>,
    segments: SpringSegments,
}

impl<H> VisualBinding<H> {
    /// Create a primitive per particle and draw the initial springs
    pub fn create<V>(visuals: &mut V, state: &ParticleState, mut segments: SpringSegments) -> Self
    where
        V: ParticleVisuals<Handle = H>,
    {
        let handles = state
            .positions
            .iter()
            .map(|p| visuals.create_primitive(*p))
            .collect();
        segments.update(&state.positions);
        visuals.build_line_geometry(segments.vertices(), segments.pairs());
        Self { handles, segments }
    }

    /// Move every primitive to `state` and rebuild the spring lines
    pub fn publish<V>(&mut self, visuals: &mut V, state: &ParticleState) -> Result<()>
    where
        V: ParticleVisuals<Handle = H>,
    {
        if state.len() != self.handles.len() {
            return Err(SimulationError::LengthMismatch {
                what: "published positions",
                expected: self.handles.len(),
                actual: state.len(),
            });
        }
        for (handle, position) in self.handles.iter().zip(&state.positions) {
            visuals.set_primitive_position(handle, *position);
        }
        self.segments.update(&state.positions);
        visuals.build_line_geometry(self.segments.vertices(), self.segments.pairs());
        trace!(
            "Published {} particles, {} spring segments",
            self.handles.len(),
            self.segments.len()
        );
        Ok(())
    }

    pub fn handles(&self) -> &[H] {
        &self.handles
    }

    pub fn segments(&self) -> &SpringSegments {
        &self.segments
    }
}

/// A renderer that only remembers what it was last told.
///
/// Used for headless runs and for checking what a simulation publishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordedVisuals {
    pub positions: Vec<Vector>,
    pub lines: Vec<(Vector, Vector)>,
    pub updates: usize,
}

impl ParticleVisuals for RecordedVisuals {
    type Handle = usize;

    fn create_primitive(&mut self, position: Vector) -> usize {
        self.positions.push(position);
        self.positions.len() - 1
    }

    fn set_primitive_position(&mut self, handle: &usize, position: Vector) {
        self.positions[*handle] = position;
        self.updates += 1;
    }

    fn build_line_geometry(&mut self, positions: &[Vector], pairs: &[[usize; 2]]) {
        self.lines = pairs
            .iter()
            .map(|[a, b]| (positions[*a], positions[*b]))
            .collect();
    }
}
