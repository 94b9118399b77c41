//! Scalar and vector aliases shared by every physics module

/// Scalar type for physics calculations (f64 for precision)
pub type Scalar = f64;

/// 3D vector type for positions, velocities, and forces
pub type Vector = bevy::math::DVec3;

/// Gravitational acceleration magnitude near the Earth's surface
pub const STANDARD_GRAVITY: Scalar = 9.81;

/// Weight of a particle of mass `mass`, pointing down the Y axis
#[inline]
pub fn weight(mass: Scalar) -> Vector {
    Vector::new(0.0, -mass * STANDARD_GRAVITY, 0.0)
}

/// True when every component of every vector is finite
pub fn all_finite(vectors: &[Vector]) -> bool {
    vectors.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_points_down() {
        let w = weight(5.0);
        assert_eq!(w.x, 0.0);
        assert_eq!(w.z, 0.0);
        assert!((w.y + 49.05).abs() < 1e-12);
    }

    #[test]
    fn test_all_finite_rejects_nan() {
        assert!(all_finite(&[Vector::ONE, Vector::ZERO]));
        assert!(!all_finite(&[Vector::ONE, Vector::new(0.0, Scalar::NAN, 0.0)]));
        assert!(!all_finite(&[Vector::new(Scalar::INFINITY, 0.0, 0.0)]));
    }
}
