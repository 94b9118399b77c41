//! Spring network builders: a hanging chain and a cloth grid
//!
//! Builders populate a [`PendulumSystem`] once at setup and also provide the
//! resting layout used when no explicit initial positions are configured.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};
use crate::physics::math::{Scalar, Vector};
use crate::physics::pendulum::PendulumSystem;

/// A built network and the layout it was designed around
#[derive(Debug, Clone)]
pub struct Network {
    pub system: PendulumSystem,
    pub positions: Vec<Vector>,
}

/// A line of particles joined end to end, hanging from particle 0
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ChainConfig {
    pub length: usize,
    pub spring_constant: Scalar,
    pub rest_length: Scalar,
    pub mass: Scalar,
    pub drag: Scalar,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            length: 4,
            spring_constant: 200.0,
            rest_length: 0.25,
            mass: 5.0,
            drag: 1.5,
        }
    }
}

impl ChainConfig {
    /// Springs `(i, i + 1)` for every neighbouring pair, particle 0 fixed
    pub fn build(&self) -> Result<Network> {
        if self.length < 2 {
            return Err(SimulationError::InvalidChainLength(self.length));
        }

        let mut system = PendulumSystem::new();
        for _ in 0..self.length {
            system.add_mass(self.mass)?;
        }
        system.set_drag(self.drag)?;
        for i in 0..self.length - 1 {
            system.add_spring(i, i + 1, self.spring_constant, self.rest_length)?;
        }
        system.fix(0)?;

        Ok(Network {
            system,
            positions: self.initial_positions(),
        })
    }

    /// Particles laid out along +X from the origin, one rest length apart
    pub fn initial_positions(&self) -> Vec<Vector> {
        (0..self.length)
            .map(|i| Vector::new(i as Scalar * self.rest_length, 0.0, 0.0))
            .collect()
    }
}

/// A `cols` x `rows` cloth with structural, shear and flex springs
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
    pub structural_constant: Scalar,
    pub shear_constant: Scalar,
    pub flex_constant: Scalar,
    /// Distance between neighbouring particles at rest
    pub spacing: Scalar,
    pub mass: Scalar,
    pub drag: Scalar,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            cols: 8,
            structural_constant: 10000.0,
            shear_constant: 100.0,
            flex_constant: 200.0,
            spacing: 1.0,
            mass: 5.0,
            drag: 70.0,
        }
    }
}

impl GridConfig {
    /// Particle index of column `i`, row `j`
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        j * self.cols + i
    }

    pub fn particle_count(&self) -> usize {
        self.rows * self.cols
    }

    /// The two anchored corners: `(0, 0)` and `(cols - 1, 0)`
    pub fn anchors(&self) -> [usize; 2] {
        [self.index(0, 0), self.index(self.cols - 1, 0)]
    }

    /// Build the grid.
    ///
    /// For each particle `(i, j)`:
    /// - Structural: `(i+1, j)` and `(i, j+1)` (rest = spacing)
    /// - Shear: `(i+1, j+1)` and `(i-1, j+1)` (rest = spacing * sqrt(2))
    /// - Flex: `(i+2, j)` and `(i, j+2)` (rest = spacing * 2)
    ///
    /// each only when the neighbour exists.
    pub fn build(&self) -> Result<Network> {
        if self.rows < 2 || self.cols < 2 {
            return Err(SimulationError::InvalidGridDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(SimulationError::InvalidParameter {
                name: "grid spacing",
                value: self.spacing,
            });
        }

        let mut system = PendulumSystem::new();
        for _ in 0..self.particle_count() {
            system.add_mass(self.mass)?;
        }
        system.set_drag(self.drag)?;

        let structural = self.spacing;
        let shear = self.spacing * std::f64::consts::SQRT_2;
        let flex = self.spacing * 2.0;

        for j in 0..self.rows {
            for i in 0..self.cols {
                let here = self.index(i, j);
                let right = i + 1 < self.cols;
                let down = j + 1 < self.rows;

                if right {
                    system.add_spring(here, self.index(i + 1, j), self.structural_constant, structural)?;
                }
                if down {
                    system.add_spring(here, self.index(i, j + 1), self.structural_constant, structural)?;
                }
                if right && down {
                    system.add_spring(here, self.index(i + 1, j + 1), self.shear_constant, shear)?;
                }
                if i > 0 && down {
                    system.add_spring(here, self.index(i - 1, j + 1), self.shear_constant, shear)?;
                }
                if i + 2 < self.cols {
                    system.add_spring(here, self.index(i + 2, j), self.flex_constant, flex)?;
                }
                if j + 2 < self.rows {
                    system.add_spring(here, self.index(i, j + 2), self.flex_constant, flex)?;
                }
            }
        }

        for anchor in self.anchors() {
            system.fix(anchor)?;
        }

        Ok(Network {
            system,
            positions: self.initial_positions(),
        })
    }

    /// A flat sheet in the X/Z plane at height zero, columns along +X and
    /// rows along +Z
    pub fn initial_positions(&self) -> Vec<Vector> {
        let mut positions = Vec::with_capacity(self.particle_count());
        for j in 0..self.rows {
            for i in 0..self.cols {
                positions.push(Vector::new(
                    i as Scalar * self.spacing,
                    0.0,
                    j as Scalar * self.spacing,
                ));
            }
        }
        positions
    }
}
