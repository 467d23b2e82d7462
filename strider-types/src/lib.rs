//! Core types for backend-agnostic scene composition.
//!
//! This crate provides the foundational types for describing rigid-body
//! scenes before any physics or rendering backend is involved:
//!
//! - [`Transform`] - Position + orientation with kinematic-chain composition
//! - [`ShapeDescriptor`] - Collision/visual geometry descriptions
//! - [`BodyData`] / [`BodyNode`] - Rigid body and kinematic-tree records
//! - [`JointSpec`] - Joint descriptions (fixed/revolute/prismatic/free)
//! - [`SimulationSettings`] - Timestep, gravity, sub-stepping
//! - [`SceneError`] - The error taxonomy shared by every layer above
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They carry no physics and no rendering;
//! they are the common language between scene authoring (`strider-scene`),
//! runtime orchestration (`strider-runtime`) and whatever backends those
//! delegate to.
//!
//! # Coordinate System
//!
//! - X: right
//! - Y: forward
//! - Z: up
//! - Right-handed
//!
//! # Example
//!
//! ```
//! use strider_types::{BodyData, ShapeDescriptor, Transform};
//! use nalgebra::{Point3, Vector3};
//!
//! let data = BodyData::dynamic()
//!     .with_shape(ShapeDescriptor::box_shape(Vector3::new(0.2, 0.2, 0.2)));
//! assert!(data.validate().is_ok());
//!
//! let t = Transform::from_position(Point3::new(0.0, 0.0, 3.0));
//! assert_eq!(t.position.z, 3.0);
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,  // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,      // mul_add style changes aren't always clearer
    clippy::cast_precision_loss,   // usize to f64 is fine for counts
    clippy::missing_errors_doc,    // Error docs added where non-obvious
)]

mod body;
mod config;
mod error;
mod joint;
mod shape;
mod transform;

pub use body::{BodyData, BodyNode, BodyNodeId, DynamicsType};
pub use config::{Gravity, SimulationSettings};
pub use error::SceneError;
pub use joint::{JointKind, JointLimits, JointSpec};
pub use shape::{HeightfieldData, Material, ShapeDescriptor, ShapeKind, VisualShape};
pub use transform::Transform;

// Re-export math types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
