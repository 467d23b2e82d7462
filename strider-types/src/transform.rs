//! Rigid transform value type.
//!
//! A [`Transform`] combines a position and an orientation and composes the
//! way kinematic chains do: `world = parent_world * child_local`. The
//! orientation is a unit quaternion, so composition keeps the equivalent
//! rotation matrix orthonormal by construction.

use nalgebra::{Isometry3, Matrix3, Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position and orientation of a frame relative to its parent.
///
/// # Example
///
/// ```
/// use strider_types::Transform;
/// use nalgebra::{Point3, Vector3};
///
/// let parent = Transform::from_position(Point3::new(1.0, 0.0, 0.0));
/// let child = Transform::from_position(Point3::new(0.0, 2.0, 0.0));
///
/// let world = parent.compose(&child);
/// assert_eq!(world.position, Point3::new(1.0, 2.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform {
    /// Position of the frame origin.
    pub position: Point3<f64>,
    /// Orientation as a unit quaternion.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform {
    /// The identity transform (origin, no rotation).
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a transform from a position (identity rotation).
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Create a transform from position and rotation.
    #[must_use]
    pub const fn from_position_rotation(
        position: Point3<f64>,
        rotation: UnitQuaternion<f64>,
    ) -> Self {
        Self { position, rotation }
    }

    /// Create a transform from a position and intrinsic roll/pitch/yaw
    /// Euler angles (radians).
    #[must_use]
    pub fn from_euler(position: Point3<f64>, roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::from_euler_angles(roll, pitch, yaw),
        }
    }

    /// Create a transform from an isometry.
    #[must_use]
    pub fn from_isometry(iso: Isometry3<f64>) -> Self {
        Self {
            position: Point3::from(iso.translation.vector),
            rotation: iso.rotation,
        }
    }

    /// Convert to an isometry.
    #[must_use]
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(self.position.coords.into(), self.rotation)
    }

    /// Compose with a child-local transform: `self ∘ local`.
    ///
    /// If `self` maps child frame to world and `local` maps grandchild to
    /// child, the result maps grandchild to world.
    #[must_use]
    pub fn compose(&self, local: &Self) -> Self {
        Self {
            position: self.position + self.rotation * local.position.coords,
            rotation: self.rotation * local.rotation,
        }
    }

    /// The inverse transform.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let inv_rotation = self.rotation.inverse();
        Self {
            position: Point3::from(-(inv_rotation * self.position.coords)),
            rotation: inv_rotation,
        }
    }

    /// Transform a point from the local frame to the parent frame.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * point.coords
    }

    /// Rotate a vector from the local frame to the parent frame.
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }

    /// The orientation as a 3x3 rotation matrix.
    #[must_use]
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.rotation.to_rotation_matrix().into_inner()
    }

    /// Check that position and rotation contain no `NaN` or `Inf`.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.position.coords.iter().all(|v| v.is_finite())
            && self.rotation.coords.iter().all(|v| v.is_finite())
    }
}

impl std::ops::Mul for Transform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity() {
        let t = Transform::identity();
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(t.transform_point(&p), p);
    }

    #[test]
    fn test_compose_translations() {
        let a = Transform::from_position(Point3::new(1.0, 0.0, 0.0));
        let b = Transform::from_position(Point3::new(0.0, 2.0, 0.0));
        let c = a.compose(&b);
        assert_relative_eq!(c.position, Point3::new(1.0, 2.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_compose_with_rotation() {
        // Parent rotated 90 degrees about Z: child's +X becomes world +Y.
        let parent = Transform::from_euler(Point3::origin(), 0.0, 0.0, FRAC_PI_2);
        let child = Transform::from_position(Point3::new(1.0, 0.0, 0.0));
        let world = parent.compose(&child);
        assert_relative_eq!(world.position, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_compose_associative() {
        let a = Transform::from_euler(Point3::new(0.5, 0.0, 1.0), 0.1, 0.2, 0.3);
        let b = Transform::from_euler(Point3::new(-1.0, 2.0, 0.0), 0.0, -0.4, 0.9);
        let c = Transform::from_euler(Point3::new(0.0, 0.3, -0.7), 1.1, 0.0, -0.2);

        let left = a.compose(&b).compose(&c);
        let right = a.compose(&b.compose(&c));
        assert_relative_eq!(left.position, right.position, epsilon = 1e-10);
        assert_relative_eq!(
            left.rotation.to_rotation_matrix().into_inner(),
            right.rotation.to_rotation_matrix().into_inner(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_inverse_roundtrip() {
        let t = Transform::from_euler(Point3::new(1.0, -2.0, 3.0), 0.3, -0.1, 0.7);
        let round = t.compose(&t.inverse());
        assert_relative_eq!(round.position, Point3::origin(), epsilon = 1e-10);
        assert_relative_eq!(
            round.rotation_matrix(),
            Matrix3::identity(),
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_rotation_stays_orthonormal() {
        let mut t = Transform::identity();
        let step = Transform::from_euler(Point3::new(0.01, 0.0, 0.0), 0.01, 0.02, 0.03);
        for _ in 0..1000 {
            t = t.compose(&step);
        }
        let r = t.rotation_matrix();
        assert_relative_eq!(r * r.transpose(), Matrix3::identity(), epsilon = 1e-9);
    }

    #[test]
    fn test_mul_operator() {
        let a = Transform::from_position(Point3::new(1.0, 0.0, 0.0));
        let b = Transform::from_position(Point3::new(0.0, 1.0, 0.0));
        assert_eq!(a * b, a.compose(&b));
    }
}
