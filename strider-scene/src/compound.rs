//! Articulated compound bodies (kinematic trees).
//!
//! A [`Compound`] owns a root body and an append-only sequence of child
//! bodies, each jointed to an already-added parent. Parents are referenced
//! by arena id, so every node's id is strictly greater than its parent's
//! and the structure is a tree by construction; there is no cycle to detect
//! at query time.
//!
//! World transforms compose multiplicatively along the ancestor chain:
//! `T_member_world = T_compound_world ∘ T_root_local ∘ ... ∘ T_member_local`.

use strider_types::{
    BodyData, BodyNode, BodyNodeId, DynamicsType, JointKind, JointSpec, SceneError, Transform,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An articulated rigid-body assembly forming one kinematic tree.
///
/// # Example
///
/// ```
/// use strider_scene::Compound;
/// use strider_types::{BodyData, DynamicsType, JointSpec, ShapeDescriptor, Transform};
/// use nalgebra::{Point3, Vector3};
///
/// let mut door = Compound::new(
///     "door_0",
///     Transform::from_position(Point3::new(0.0, 0.0, 1.0)),
///     DynamicsType::Dynamic,
/// );
///
/// let frame = door
///     .create_root_body(
///         "frame",
///         BodyData::fixed().with_shape(ShapeDescriptor::box_shape(Vector3::new(0.2, 0.2, 2.0))),
///         Transform::identity(),
///     )
///     .unwrap();
///
/// door.add_compound_body(
///     "panel",
///     BodyData::dynamic().with_shape(ShapeDescriptor::box_shape(Vector3::new(1.2, 0.1, 2.0))),
///     JointSpec::revolute(Vector3::z()),
///     frame,
///     Transform::from_position(Point3::new(0.7, 0.0, 0.0)),
/// )
/// .unwrap();
///
/// assert_eq!(door.len(), 2);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Compound {
    name: String,
    world_transform: Transform,
    dynamics: DynamicsType,
    nodes: Vec<BodyNode>,
}

impl Compound {
    /// Create an empty compound with a world placement and dynamics type.
    #[must_use]
    pub fn new(name: impl Into<String>, world_transform: Transform, dynamics: DynamicsType) -> Self {
        Self {
            name: name.into(),
            world_transform,
            dynamics,
            nodes: Vec::new(),
        }
    }

    /// Compound name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World placement of the compound frame.
    #[must_use]
    pub fn world_transform(&self) -> &Transform {
        &self.world_transform
    }

    /// Dynamics classification of the compound as a unit.
    #[must_use]
    pub fn dynamics(&self) -> DynamicsType {
        self.dynamics
    }

    /// Joint implicitly attaching the root to the world: free for dynamic
    /// compounds, fixed for static and kinematic ones.
    #[must_use]
    pub fn root_joint(&self) -> JointSpec {
        match self.dynamics {
            DynamicsType::Dynamic => JointSpec::free(),
            DynamicsType::Static | DynamicsType::Kinematic => JointSpec::fixed(),
        }
    }

    /// Create the root body of the tree.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidTopology`] if a root already exists,
    /// or [`SceneError::InvalidShape`] if the body's shapes fail
    /// validation.
    pub fn create_root_body(
        &mut self,
        name: impl Into<String>,
        data: BodyData,
        local_transform: Transform,
    ) -> strider_types::Result<BodyNodeId> {
        if !self.nodes.is_empty() {
            return Err(SceneError::invalid_topology(format!(
                "compound {} already has a root body",
                self.name
            )));
        }
        data.validate()?;

        let id = BodyNodeId::new(0);
        self.nodes.push(BodyNode {
            id,
            name: name.into(),
            data,
            local_transform,
            parent: None,
            joint: None,
        });
        Ok(id)
    }

    /// Append a body jointed to an already-added parent.
    ///
    /// Validation happens before any mutation, so a failed call leaves the
    /// member list untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidTopology`] if there is no root yet or
    /// the parent id is not present, [`SceneError::DuplicateName`] if the
    /// name collides with an existing member, or
    /// [`SceneError::InvalidShape`] from body validation.
    pub fn add_compound_body(
        &mut self,
        name: impl Into<String>,
        data: BodyData,
        joint: JointSpec,
        parent: BodyNodeId,
        local_transform: Transform,
    ) -> strider_types::Result<BodyNodeId> {
        let name = name.into();
        if self.nodes.is_empty() {
            return Err(SceneError::invalid_topology(format!(
                "compound {} has no root body to attach {name} to",
                self.name
            )));
        }
        if parent.raw() >= self.nodes.len() {
            return Err(SceneError::invalid_topology(format!(
                "parent {parent} of {name} is not a member of compound {}",
                self.name
            )));
        }
        if self.nodes.iter().any(|n| n.name == name) {
            return Err(SceneError::duplicate_name(name));
        }
        data.validate()?;

        let id = BodyNodeId::new(self.nodes.len());
        self.nodes.push(BodyNode {
            id,
            name,
            data,
            local_transform,
            parent: Some(parent),
            joint: Some(joint),
        });
        Ok(id)
    }

    /// Convenience: append a body of the compound's dynamics type, jointed
    /// to the most recently added member with an identity local transform
    /// and an identity joint anchor.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Compound::add_compound_body`].
    pub fn add_body(
        &mut self,
        name: impl Into<String>,
        joint_kind: JointKind,
    ) -> strider_types::Result<BodyNodeId> {
        let parent = BodyNodeId::new(self.nodes.len().saturating_sub(1));
        if self.nodes.is_empty() {
            return Err(SceneError::invalid_topology(format!(
                "compound {} has no root body",
                self.name
            )));
        }
        self.add_compound_body(
            name,
            BodyData::new(self.dynamics),
            JointSpec::new(joint_kind),
            parent,
            Transform::identity(),
        )
    }

    /// The root node, if one has been created.
    #[must_use]
    pub fn root(&self) -> Option<&BodyNode> {
        self.nodes.first()
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: BodyNodeId) -> Option<&BodyNode> {
        self.nodes.get(id.raw())
    }

    /// Look up a node by name.
    #[must_use]
    pub fn node_by_name(&self, name: &str) -> Option<&BodyNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Iterate members in insertion order (root first).
    pub fn nodes(&self) -> impl Iterator<Item = &BodyNode> {
        self.nodes.iter()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the compound has no members yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Local transforms along the path root → `id`, root's first.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidTopology`] for an unknown id.
    pub fn local_chain_of(&self, id: BodyNodeId) -> strider_types::Result<Vec<Transform>> {
        let mut node = self.node(id).ok_or_else(|| {
            SceneError::invalid_topology(format!("{id} is not a member of compound {}", self.name))
        })?;

        let mut chain = vec![node.local_transform];
        while let Some(parent) = node.parent {
            // Parent ids are always smaller, so this walk terminates.
            node = &self.nodes[parent.raw()];
            chain.push(node.local_transform);
        }
        chain.reverse();
        Ok(chain)
    }

    /// World transform of a member: the product of local transforms along
    /// its ancestor chain, composed onto the compound's world placement.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidTopology`] for an unknown id.
    pub fn world_transform_of(&self, id: BodyNodeId) -> strider_types::Result<Transform> {
        let chain = self.local_chain_of(id)?;
        Ok(chain
            .iter()
            .fold(self.world_transform, |acc, local| acc.compose(local)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};
    use std::f64::consts::FRAC_PI_2;
    use strider_types::ShapeDescriptor;

    fn box_data(dynamics: DynamicsType) -> BodyData {
        BodyData::new(dynamics).with_shape(ShapeDescriptor::box_shape(Vector3::new(0.2, 0.2, 0.2)))
    }

    fn three_link_chain() -> (Compound, BodyNodeId, BodyNodeId, BodyNodeId) {
        let mut c = Compound::new(
            "chain",
            Transform::from_position(Point3::new(0.0, 0.0, 1.0)),
            DynamicsType::Dynamic,
        );
        let root = c
            .create_root_body("link_0", box_data(DynamicsType::Dynamic), Transform::identity())
            .unwrap();
        let a = c
            .add_compound_body(
                "link_1",
                box_data(DynamicsType::Dynamic),
                JointSpec::revolute(Vector3::z()),
                root,
                Transform::from_position(Point3::new(1.0, 0.0, 0.0)),
            )
            .unwrap();
        let b = c
            .add_compound_body(
                "link_2",
                box_data(DynamicsType::Dynamic),
                JointSpec::revolute(Vector3::z()),
                a,
                Transform::from_position(Point3::new(1.0, 0.0, 0.0)),
            )
            .unwrap();
        (c, root, a, b)
    }

    #[test]
    fn test_single_root() {
        let mut c = Compound::new("c", Transform::identity(), DynamicsType::Dynamic);
        c.create_root_body("root", box_data(DynamicsType::Dynamic), Transform::identity())
            .unwrap();
        let err = c
            .create_root_body("other", box_data(DynamicsType::Dynamic), Transform::identity())
            .unwrap_err();
        assert!(err.is_invalid_topology());
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn test_unknown_parent_rejected_without_mutation() {
        let (mut c, ..) = three_link_chain();
        let before = c.len();
        let err = c
            .add_compound_body(
                "orphan",
                box_data(DynamicsType::Dynamic),
                JointSpec::fixed(),
                BodyNodeId::new(99),
                Transform::identity(),
            )
            .unwrap_err();
        assert!(err.is_invalid_topology());
        assert_eq!(c.len(), before);
        assert!(c.node_by_name("orphan").is_none());
    }

    #[test]
    fn test_add_without_root_rejected() {
        let mut c = Compound::new("c", Transform::identity(), DynamicsType::Dynamic);
        let err = c
            .add_compound_body(
                "child",
                box_data(DynamicsType::Dynamic),
                JointSpec::fixed(),
                BodyNodeId::new(0),
                Transform::identity(),
            )
            .unwrap_err();
        assert!(err.is_invalid_topology());
        assert!(c.add_body("child", JointKind::Fixed).is_err());
    }

    #[test]
    fn test_duplicate_member_name() {
        let (mut c, root, ..) = three_link_chain();
        let err = c
            .add_compound_body(
                "link_1",
                box_data(DynamicsType::Dynamic),
                JointSpec::fixed(),
                root,
                Transform::identity(),
            )
            .unwrap_err();
        assert!(err.is_duplicate_name());
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_world_transform_chain() {
        let (c, _, _, tip) = three_link_chain();
        let world = c.world_transform_of(tip).unwrap();
        // Two unit offsets along X, compound base at z = 1.
        assert_relative_eq!(world.position, Point3::new(2.0, 0.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_world_transform_matches_direct_recomputation() {
        let mut c = Compound::new(
            "arm",
            Transform::from_euler(Point3::new(0.3, -0.2, 0.9), 0.1, 0.0, 0.4),
            DynamicsType::Dynamic,
        );
        let root = c
            .create_root_body(
                "base",
                box_data(DynamicsType::Dynamic),
                Transform::from_euler(Point3::new(0.0, 0.0, 0.5), 0.0, 0.0, FRAC_PI_2),
            )
            .unwrap();
        let elbow = c
            .add_compound_body(
                "elbow",
                box_data(DynamicsType::Dynamic),
                JointSpec::revolute(Vector3::y()),
                root,
                Transform::from_euler(Point3::new(0.4, 0.0, 0.0), 0.2, 0.0, 0.0),
            )
            .unwrap();
        let wrist = c
            .add_compound_body(
                "wrist",
                box_data(DynamicsType::Dynamic),
                JointSpec::revolute(Vector3::x()),
                elbow,
                Transform::from_euler(Point3::new(0.3, 0.1, 0.0), 0.0, -0.3, 0.0),
            )
            .unwrap();

        // Direct recomputation from scratch, composing explicitly.
        let chain = c.local_chain_of(wrist).unwrap();
        let mut expected = *c.world_transform();
        for local in &chain {
            expected = expected.compose(local);
        }

        let got = c.world_transform_of(wrist).unwrap();
        assert_relative_eq!(got.position, expected.position, epsilon = 1e-12);
        assert_relative_eq!(
            got.rotation_matrix(),
            expected.rotation_matrix(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_add_body_convenience_defaults() {
        let (mut c, ..) = three_link_chain();
        let id = c.add_body("tail", JointKind::Revolute).unwrap();
        let node = c.node(id).unwrap();
        assert_eq!(node.parent, Some(BodyNodeId::new(2)));
        let joint = node.joint.as_ref().unwrap();
        assert_eq!(joint.kind, JointKind::Revolute);
        assert_eq!(joint.local_transform, Transform::identity());
        assert_eq!(node.local_transform, Transform::identity());
    }

    #[test]
    fn test_root_joint_by_dynamics() {
        let c = Compound::new("d", Transform::identity(), DynamicsType::Dynamic);
        assert_eq!(c.root_joint().kind, JointKind::Free);
        let c = Compound::new("s", Transform::identity(), DynamicsType::Static);
        assert_eq!(c.root_joint().kind, JointKind::Fixed);
    }
}
