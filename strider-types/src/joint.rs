//! Joint descriptions for articulated bodies.
//!
//! A joint constrains a body's motion relative to its parent in a kinematic
//! tree. These are authoring-time descriptions; backends translate them
//! into native constraints.

use nalgebra::Vector3;

use crate::transform::Transform;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of joint constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointKind {
    /// No relative motion allowed.
    Fixed,
    /// Rotation around a single axis.
    Revolute,
    /// Translation along a single axis.
    Prismatic,
    /// Unconstrained 6-DOF motion (floating base).
    Free,
}

impl JointKind {
    /// Number of degrees of freedom for this joint kind.
    #[must_use]
    pub const fn dof(self) -> usize {
        match self {
            Self::Fixed => 0,
            Self::Revolute | Self::Prismatic => 1,
            Self::Free => 6,
        }
    }

    /// Whether this joint kind is driven by actions (has an actuator slot).
    #[must_use]
    pub const fn is_actuated(self) -> bool {
        matches!(self, Self::Revolute | Self::Prismatic)
    }
}

impl std::fmt::Display for JointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Revolute => write!(f, "revolute"),
            Self::Prismatic => write!(f, "prismatic"),
            Self::Free => write!(f, "free"),
        }
    }
}

/// Position limits for a single-DOF joint.
///
/// Angle in radians for revolute joints, distance in meters for prismatic.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointLimits {
    /// Minimum position.
    pub lower: f64,
    /// Maximum position.
    pub upper: f64,
}

impl Default for JointLimits {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl JointLimits {
    /// Create limits with the given bounds.
    #[must_use]
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// Unlimited joint range.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }

    /// Symmetric limits around zero.
    #[must_use]
    pub fn symmetric(range: f64) -> Self {
        Self {
            lower: -range,
            upper: range,
        }
    }

    /// Check if a position lies within the limits.
    #[must_use]
    pub fn in_range(&self, position: f64) -> bool {
        position >= self.lower && position <= self.upper
    }

    /// Clamp a position into the limits.
    #[must_use]
    pub fn clamp(&self, position: f64) -> f64 {
        position.clamp(self.lower, self.upper)
    }

    /// Whether both bounds are finite.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.lower.is_finite() && self.upper.is_finite()
    }
}

/// Description of the joint linking a body to its parent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JointSpec {
    /// Kind of constraint.
    pub kind: JointKind,
    /// Motion axis in the owning body's local frame (normalized).
    pub axis: Vector3<f64>,
    /// Position limits.
    pub limits: JointLimits,
    /// Anchor frame of the joint relative to the owning body.
    pub local_transform: Transform,
}

impl JointSpec {
    /// Create a joint of the given kind with a Z axis, unlimited range and
    /// an identity anchor.
    #[must_use]
    pub fn new(kind: JointKind) -> Self {
        Self {
            kind,
            axis: Vector3::z(),
            limits: JointLimits::unlimited(),
            local_transform: Transform::identity(),
        }
    }

    /// Create a fixed joint.
    #[must_use]
    pub fn fixed() -> Self {
        Self::new(JointKind::Fixed)
    }

    /// Create a free (floating) joint.
    #[must_use]
    pub fn free() -> Self {
        Self::new(JointKind::Free)
    }

    /// Create a revolute joint around the given axis.
    #[must_use]
    pub fn revolute(axis: Vector3<f64>) -> Self {
        Self {
            kind: JointKind::Revolute,
            axis: normalize_or_z(axis),
            limits: JointLimits::unlimited(),
            local_transform: Transform::identity(),
        }
    }

    /// Create a prismatic joint along the given axis.
    #[must_use]
    pub fn prismatic(axis: Vector3<f64>) -> Self {
        Self {
            kind: JointKind::Prismatic,
            axis: normalize_or_z(axis),
            limits: JointLimits::unlimited(),
            local_transform: Transform::identity(),
        }
    }

    /// Set the position limits.
    #[must_use]
    pub fn with_limits(mut self, limits: JointLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the anchor frame relative to the owning body.
    #[must_use]
    pub fn with_local_transform(mut self, local_transform: Transform) -> Self {
        self.local_transform = local_transform;
        self
    }
}

fn normalize_or_z(axis: Vector3<f64>) -> Vector3<f64> {
    let norm = axis.norm();
    if norm < 1e-10 {
        Vector3::z()
    } else {
        axis / norm
    }
}
