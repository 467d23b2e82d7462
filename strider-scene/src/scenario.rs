//! The backend-agnostic scene container.
//!
//! A [`Scenario`] holds keyed registries of everything a backend ingests:
//! single bodies, compounds, agents, terrain generators and sensors. Names
//! are unique per registry, enforced at insertion; iteration follows
//! insertion order so backends see a deterministic entity sequence.
//!
//! Once a scenario is handed to a runtime (behind an `Arc`), its topology
//! is frozen: there is no mutation through a shared reference.

use strider_types::SceneError;

use crate::agent::Agent;
use crate::compound::Compound;
use crate::registry::NamedRegistry;
use crate::sensor::SensorSpec;
use crate::single_body::SingleBody;
use crate::terrain::TerrainGenerator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Backend-agnostic container of scene entities.
///
/// # Example
///
/// ```
/// use strider_scene::{Scenario, SingleBody};
/// use strider_types::{BodyData, ShapeDescriptor, Transform};
/// use nalgebra::{Point3, Vector3};
///
/// let mut scenario = Scenario::new();
/// scenario
///     .add_single_body(SingleBody::new(
///         "box_0",
///         BodyData::dynamic()
///             .with_shape(ShapeDescriptor::box_shape(Vector3::new(0.2, 0.2, 0.2))),
///         Transform::from_position(Point3::new(0.0, 0.0, 3.0)),
///     ))
///     .unwrap();
///
/// assert!(scenario.single_body("box_0").is_some());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scenario {
    single_bodies: NamedRegistry<SingleBody>,
    compounds: NamedRegistry<Compound>,
    agents: NamedRegistry<Agent>,
    terrain_generators: NamedRegistry<TerrainGenerator>,
    sensors: NamedRegistry<SensorSpec>,
}

impl Scenario {
    /// Create an empty scenario.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a single body.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidShape`] if the body's shapes fail
    /// validation, or [`SceneError::DuplicateName`] on a name collision
    /// (leaving the existing entry intact).
    pub fn add_single_body(&mut self, body: SingleBody) -> strider_types::Result<()> {
        body.validate()?;
        let name = body.name().to_owned();
        self.single_bodies.insert(name, body)
    }

    /// Register a compound.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidTopology`] for a compound without a
    /// root body, or [`SceneError::DuplicateName`] on a name collision.
    pub fn add_compound(&mut self, compound: Compound) -> strider_types::Result<()> {
        if compound.is_empty() {
            return Err(SceneError::invalid_topology(format!(
                "compound {} has no root body",
                compound.name()
            )));
        }
        let name = compound.name().to_owned();
        self.compounds.insert(name, compound)
    }

    /// Register an agent.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::InvalidTopology`] for an agent whose compound
    /// has no root body, or [`SceneError::DuplicateName`] on a name
    /// collision.
    pub fn add_agent(&mut self, agent: Agent) -> strider_types::Result<()> {
        if agent.compound().is_empty() {
            return Err(SceneError::invalid_topology(format!(
                "agent {} has an empty kinematic tree",
                agent.name()
            )));
        }
        let name = agent.name().to_owned();
        self.agents.insert(name, agent)
    }

    /// Register a terrain generator.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateName`] on a name collision.
    pub fn add_terrain_generator(&mut self, generator: TerrainGenerator) -> strider_types::Result<()> {
        let name = generator.name().to_owned();
        self.terrain_generators.insert(name, generator)
    }

    /// Register a sensor.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::AgentNotFound`] if the sensor's agent is not
    /// registered, or [`SceneError::DuplicateName`] on a name collision.
    pub fn add_sensor(&mut self, sensor: SensorSpec) -> strider_types::Result<()> {
        if !self.agents.contains(sensor.agent()) {
            return Err(SceneError::AgentNotFound {
                name: sensor.agent().to_owned(),
            });
        }
        let name = sensor.name().to_owned();
        self.sensors.insert(name, sensor)
    }

    /// Look up a single body by name.
    #[must_use]
    pub fn single_body(&self, name: &str) -> Option<&SingleBody> {
        self.single_bodies.get(name)
    }

    /// Look up a compound by name.
    #[must_use]
    pub fn compound(&self, name: &str) -> Option<&Compound> {
        self.compounds.get(name)
    }

    /// Look up an agent by name.
    #[must_use]
    pub fn agent(&self, name: &str) -> Option<&Agent> {
        self.agents.get(name)
    }

    /// Look up a terrain generator by name.
    #[must_use]
    pub fn terrain_generator(&self, name: &str) -> Option<&TerrainGenerator> {
        self.terrain_generators.get(name)
    }

    /// Look up a sensor by name.
    #[must_use]
    pub fn sensor(&self, name: &str) -> Option<&SensorSpec> {
        self.sensors.get(name)
    }

    /// Iterate single bodies in insertion order.
    pub fn single_bodies(&self) -> impl Iterator<Item = &SingleBody> {
        self.single_bodies.iter()
    }

    /// Iterate compounds in insertion order.
    pub fn compounds(&self) -> impl Iterator<Item = &Compound> {
        self.compounds.iter()
    }

    /// Iterate agents in insertion order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.iter()
    }

    /// Iterate terrain generators in insertion order.
    pub fn terrain_generators(&self) -> impl Iterator<Item = &TerrainGenerator> {
        self.terrain_generators.iter()
    }

    /// Iterate sensors in insertion order.
    pub fn sensors(&self) -> impl Iterator<Item = &SensorSpec> {
        self.sensors.iter()
    }

    /// Total number of registered entities across all registries.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.single_bodies.len()
            + self.compounds.len()
            + self.agents.len()
            + self.terrain_generators.len()
            + self.sensors.len()
    }

    /// Whether no entities are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }
}
