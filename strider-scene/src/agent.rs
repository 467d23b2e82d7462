//! Controllable agents.
//!
//! An [`Agent`] wraps an articulated [`Compound`] as a scenario-level
//! entity with an action interface. The action dimension — one slot per
//! actuated (revolute or prismatic) joint — is fixed at construction and
//! never changes afterwards, so downstream consumers (policies, sensors)
//! can rely on stable shapes.

use nalgebra::Point3;
use strider_types::BodyNodeId;

use crate::compound::Compound;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A controllable articulated entity.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Agent {
    name: String,
    root_position: Point3<f64>,
    compound: Compound,
    actuated: Vec<BodyNodeId>,
}

impl Agent {
    /// Create an agent from an articulated compound.
    ///
    /// The actuated-joint list (and with it the action dimension) is
    /// derived here, once.
    #[must_use]
    pub fn new(name: impl Into<String>, root_position: Point3<f64>, compound: Compound) -> Self {
        let actuated = compound
            .nodes()
            .filter(|n| n.joint.as_ref().is_some_and(|j| j.kind.is_actuated()))
            .map(|n| n.id)
            .collect();
        Self {
            name: name.into(),
            root_position,
            compound,
            actuated,
        }
    }

    /// Agent name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Authoring-time root position.
    #[must_use]
    pub fn root_position(&self) -> Point3<f64> {
        self.root_position
    }

    /// The agent's kinematic tree.
    #[must_use]
    pub fn compound(&self) -> &Compound {
        &self.compound
    }

    /// Ids of actuated-joint members, in tree insertion order.
    #[must_use]
    pub fn actuated_joints(&self) -> &[BodyNodeId] {
        &self.actuated
    }

    /// Number of action slots, fixed at construction.
    #[must_use]
    pub fn action_dim(&self) -> usize {
        self.actuated.len()
    }

    /// Number of bodies in the agent's tree.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.compound.len()
    }
}
