//! Scenario flattening.
//!
//! Backends ingest a flat, deterministic list of body records rather than
//! the authoring-time object graph. Flattening resolves every compound and
//! agent member to a world transform by composing local transforms along
//! its ancestor chain, and namespaces member names as `"<owner>/<member>"`
//! so names stay unique across registries.
//!
//! Flattening order is fixed: terrain primitives, single bodies, compound
//! members, agent members — each registry in insertion order. Both the
//! physics and rendering adapters flatten the same scenario, so the same
//! names resolve to the same logical entity on both sides.

use nalgebra::Vector3;
use strider_scene::{Agent, Compound, Scenario};
use strider_types::{DynamicsType, JointKind, JointLimits, ShapeDescriptor, Transform};

/// Default mass for dynamic bodies that do not declare one (kg).
const DEFAULT_MASS: f64 = 1.0;

/// One backend-ready rigid body.
#[derive(Debug, Clone)]
pub struct FlatBody {
    /// Unique flattened name.
    pub name: String,
    /// Dynamics classification.
    pub dynamics: DynamicsType,
    /// Authoring-time world transform (the reset target).
    pub initial_transform: Transform,
    /// Collision shapes.
    pub collisions: Vec<ShapeDescriptor>,
    /// Resolved mass (explicit, or 1 kg for dynamic bodies that declare
    /// none).
    pub mass: f64,
}

/// One actuated joint of a flattened agent.
#[derive(Debug, Clone)]
pub struct FlatJoint {
    /// Flattened name of the owning body node.
    pub body: String,
    /// Joint kind (always actuated here).
    pub kind: JointKind,
    /// Motion axis in the body's local frame.
    pub axis: Vector3<f64>,
    /// Position limits.
    pub limits: JointLimits,
}

/// One flattened agent: its bodies plus its actuated joints, in tree order.
#[derive(Debug, Clone)]
pub struct FlatAgent {
    /// Agent name.
    pub name: String,
    /// Flattened name of the root body.
    pub root_body: String,
    /// Flattened names of all member bodies, root first.
    pub body_names: Vec<String>,
    /// Actuated joints in tree insertion order.
    pub joints: Vec<FlatJoint>,
}

/// A scenario resolved into backend-ready records.
#[derive(Debug, Clone, Default)]
pub struct FlatScene {
    /// All bodies, in flattening order.
    pub bodies: Vec<FlatBody>,
    /// All agents, in registry order.
    pub agents: Vec<FlatAgent>,
}

/// Flattened name of a compound/agent member body.
#[must_use]
pub fn flat_body_name(owner: &str, member: &str) -> String {
    format!("{owner}/{member}")
}

/// Resolve a scenario into flat records.
///
/// # Errors
///
/// Returns [`strider_types::SceneError::DuplicateName`] if two entities
/// from different registries flatten to the same body name, and
/// propagates [`strider_types::SceneError::InvalidTopology`] from world
/// transform resolution (unreachable for scenarios built through the
/// authoring API, which validates topology at insertion).
pub fn flatten(scenario: &Scenario) -> strider_types::Result<FlatScene> {
    let mut scene = FlatScene::default();

    for generator in scenario.terrain_generators() {
        for primitive in generator.primitives() {
            scene.bodies.push(FlatBody {
                name: primitive.name.clone(),
                dynamics: DynamicsType::Static,
                initial_transform: primitive.transform,
                collisions: vec![primitive.descriptor.clone()],
                mass: 0.0,
            });
        }
    }

    for body in scenario.single_bodies() {
        scene.bodies.push(FlatBody {
            name: body.name().to_owned(),
            dynamics: body.data().dynamics,
            initial_transform: *body.transform(),
            collisions: body.data().collisions.clone(),
            mass: resolve_mass(body.data().mass, body.data().dynamics),
        });
    }

    for compound in scenario.compounds() {
        flatten_compound(compound, compound.name(), *compound.world_transform(), &mut scene)?;
    }

    for agent in scenario.agents() {
        let placement = Transform::from_position(agent.root_position())
            .compose(agent.compound().world_transform());
        flatten_compound(agent.compound(), agent.name(), placement, &mut scene)?;
        scene.agents.push(flatten_agent(agent)?);
    }

    {
        let mut seen = hashbrown::HashSet::with_capacity(scene.bodies.len());
        for body in &scene.bodies {
            if !seen.insert(body.name.as_str()) {
                return Err(strider_types::SceneError::duplicate_name(body.name.clone()));
            }
        }
    }

    Ok(scene)
}

fn flatten_compound(
    compound: &Compound,
    owner: &str,
    placement: Transform,
    scene: &mut FlatScene,
) -> strider_types::Result<()> {
    for node in compound.nodes() {
        let chain = compound.local_chain_of(node.id)?;
        let world = chain.iter().fold(placement, |acc, local| acc.compose(local));
        scene.bodies.push(FlatBody {
            name: flat_body_name(owner, &node.name),
            dynamics: node.data.dynamics,
            initial_transform: world,
            collisions: node.data.collisions.clone(),
            mass: resolve_mass(node.data.mass, node.data.dynamics),
        });
    }
    Ok(())
}

fn flatten_agent(agent: &Agent) -> strider_types::Result<FlatAgent> {
    let compound = agent.compound();
    let root = compound.root().ok_or_else(|| {
        strider_types::SceneError::invalid_topology(format!(
            "agent {} has an empty kinematic tree",
            agent.name()
        ))
    })?;

    let joints = agent
        .actuated_joints()
        .iter()
        .filter_map(|id| compound.node(*id))
        .filter_map(|node| {
            node.joint.as_ref().map(|joint| FlatJoint {
                body: flat_body_name(agent.name(), &node.name),
                kind: joint.kind,
                axis: joint.axis,
                limits: joint.limits,
            })
        })
        .collect();

    Ok(FlatAgent {
        name: agent.name().to_owned(),
        root_body: flat_body_name(agent.name(), &root.name),
        body_names: compound
            .nodes()
            .map(|n| flat_body_name(agent.name(), &n.name))
            .collect(),
        joints,
    })
}

fn resolve_mass(mass: Option<f64>, dynamics: DynamicsType) -> f64 {
    match dynamics {
        DynamicsType::Dynamic => mass.unwrap_or(DEFAULT_MASS),
        DynamicsType::Static | DynamicsType::Kinematic => mass.unwrap_or(0.0),
    }
}
