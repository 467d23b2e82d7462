//! Rigid body descriptions and kinematic-tree node records.
//!
//! [`BodyData`] captures everything a backend needs to instantiate one
//! rigid body: dynamics classification, collision shapes, visual shapes and
//! optional mass. [`BodyNode`] is the arena record used by compound
//! kinematic trees: an integer id plus a parent back-reference, so the tree
//! is a flat vector instead of an ownership cycle.

use crate::joint::JointSpec;
use crate::shape::{ShapeDescriptor, VisualShape};
use crate::transform::Transform;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dynamics classification of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DynamicsType {
    /// Immovable; never integrated.
    Static,
    /// Driven by the physics backend.
    Dynamic,
    /// Externally positioned; not integrated by the backend.
    Kinematic,
}

impl std::fmt::Display for DynamicsType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Static => write!(f, "static"),
            Self::Dynamic => write!(f, "dynamic"),
            Self::Kinematic => write!(f, "kinematic"),
        }
    }
}

/// Declarative description of a single rigid body.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyData {
    /// Dynamics classification.
    pub dynamics: DynamicsType,
    /// Collision shapes (may be empty for visual-only bodies).
    pub collisions: Vec<ShapeDescriptor>,
    /// Visual shapes (may be empty for invisible colliders).
    pub visuals: Vec<VisualShape>,
    /// Explicit mass in kg; `None` lets the backend derive it from shape.
    pub mass: Option<f64>,
}

impl BodyData {
    /// Create body data with the given dynamics and no shapes.
    #[must_use]
    pub fn new(dynamics: DynamicsType) -> Self {
        Self {
            dynamics,
            collisions: Vec::new(),
            visuals: Vec::new(),
            mass: None,
        }
    }

    /// Create dynamic body data.
    #[must_use]
    pub fn dynamic() -> Self {
        Self::new(DynamicsType::Dynamic)
    }

    /// Create static body data.
    #[must_use]
    pub fn fixed() -> Self {
        Self::new(DynamicsType::Static)
    }

    /// Create kinematic body data.
    #[must_use]
    pub fn kinematic() -> Self {
        Self::new(DynamicsType::Kinematic)
    }

    /// Append a collision shape.
    #[must_use]
    pub fn with_collision(mut self, shape: ShapeDescriptor) -> Self {
        self.collisions.push(shape);
        self
    }

    /// Append a visual shape.
    #[must_use]
    pub fn with_visual(mut self, visual: VisualShape) -> Self {
        self.visuals.push(visual);
        self
    }

    /// Append a shape as both collision and (plain-material) visual.
    #[must_use]
    pub fn with_shape(mut self, shape: ShapeDescriptor) -> Self {
        self.visuals.push(VisualShape::plain(shape.clone()));
        self.collisions.push(shape);
        self
    }

    /// Set an explicit mass.
    #[must_use]
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = Some(mass);
        self
    }

    /// Validate every collision and visual shape.
    ///
    /// # Errors
    ///
    /// Propagates the first [`SceneError::InvalidShape`] found.
    ///
    /// [`SceneError::InvalidShape`]: crate::SceneError::InvalidShape
    pub fn validate(&self) -> crate::Result<()> {
        for shape in &self.collisions {
            shape.validate()?;
        }
        for visual in &self.visuals {
            visual.descriptor.validate()?;
        }
        Ok(())
    }
}

/// Identifier of a body node within its owning compound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyNodeId(pub usize);

impl BodyNodeId {
    /// Create a node id.
    #[must_use]
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    /// Raw index value.
    #[must_use]
    pub const fn raw(self) -> usize {
        self.0
    }
}

impl From<usize> for BodyNodeId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BodyNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// One rigid body inside a compound's kinematic tree.
///
/// Nodes are append-only arena records: `parent` always references an
/// earlier node, so the structure is a tree by construction. A node with a
/// parent must carry a joint; the root has neither.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyNode {
    /// Node id (index into the owning compound's arena).
    pub id: BodyNodeId,
    /// Name, unique within the owning compound.
    pub name: String,
    /// Body description.
    pub data: BodyData,
    /// Transform relative to the parent node (or the compound frame for
    /// the root).
    pub local_transform: Transform,
    /// Parent node, `None` for the root.
    pub parent: Option<BodyNodeId>,
    /// Joint to the parent; required whenever `parent` is set.
    pub joint: Option<JointSpec>,
}

impl BodyNode {
    /// Whether this node is the root of its tree.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
