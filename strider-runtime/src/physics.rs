//! Built-in physics adapters.
//!
//! [`InternalPhysics`] is the reference adapter: free-body integration of
//! dynamic bodies under gravity with semi-implicit Euler, plus a
//! velocity-command actuator model for agent joints. It exists so the
//! orchestration layer has a complete, deterministic backend to drive;
//! contact resolution and constraint solving belong to external engines.
//!
//! [`NullPhysics`] accepts any scenario and only advances time — useful
//! for wiring tests and visualizer-only sessions.

use hashbrown::HashMap;
use nalgebra::{DVector, Vector3};
use strider_scene::Scenario;
use strider_types::{
    DynamicsType, JointLimits, SceneError, ShapeKind, SimulationSettings, Transform,
};

use crate::backend::PhysicsBackend;
use crate::flatten::{flatten, FlatScene};

#[derive(Debug, Clone)]
struct BodyRecord {
    name: String,
    dynamics: DynamicsType,
    pose: Transform,
    velocity: Vector3<f64>,
    force_accum: Vector3<f64>,
    mass: f64,
    initial_pose: Transform,
}

#[derive(Debug, Clone)]
struct JointRecord {
    limits: JointLimits,
    position: f64,
    velocity: f64,
    target: f64,
}

#[derive(Debug, Clone)]
struct AgentRecord {
    name: String,
    joints: Vec<JointRecord>,
}

/// Reference physics adapter.
#[derive(Debug)]
pub struct InternalPhysics {
    settings: SimulationSettings,
    bodies: Vec<BodyRecord>,
    index: HashMap<String, usize>,
    agents: Vec<AgentRecord>,
    agent_index: HashMap<String, usize>,
    time: f64,
    loaded: bool,
}

impl InternalPhysics {
    /// Create an adapter with the given settings.
    #[must_use]
    pub fn new(settings: SimulationSettings) -> Self {
        Self {
            settings,
            bodies: Vec::new(),
            index: HashMap::new(),
            agents: Vec::new(),
            agent_index: HashMap::new(),
            time: 0.0,
            loaded: false,
        }
    }

    fn ingest(&mut self, scene: FlatScene) -> strider_types::Result<()> {
        for body in &scene.bodies {
            for shape in &body.collisions {
                if shape.kind == ShapeKind::Mesh {
                    return Err(SceneError::backend_rejected(format!(
                        "internal backend cannot host mesh collider on body {}",
                        body.name
                    )));
                }
            }
            if body.dynamics == DynamicsType::Dynamic
                && (!body.mass.is_finite() || body.mass <= 0.0)
            {
                return Err(SceneError::backend_rejected(format!(
                    "dynamic body {} has non-positive mass {}",
                    body.name, body.mass
                )));
            }
        }

        self.bodies = scene
            .bodies
            .iter()
            .map(|b| BodyRecord {
                name: b.name.clone(),
                dynamics: b.dynamics,
                pose: b.initial_transform,
                velocity: Vector3::zeros(),
                force_accum: Vector3::zeros(),
                mass: b.mass,
                initial_pose: b.initial_transform,
            })
            .collect();
        self.index = self
            .bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.clone(), i))
            .collect();

        self.agents = scene
            .agents
            .iter()
            .map(|a| AgentRecord {
                name: a.name.clone(),
                joints: a
                    .joints
                    .iter()
                    .map(|j| JointRecord {
                        limits: j.limits,
                        position: 0.0,
                        velocity: 0.0,
                        target: 0.0,
                    })
                    .collect(),
            })
            .collect();
        self.agent_index = self
            .agents
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.clone(), i))
            .collect();

        self.time = 0.0;
        self.loaded = true;
        Ok(())
    }
}

impl PhysicsBackend for InternalPhysics {
    fn backend_id(&self) -> &'static str {
        "internal"
    }

    fn load_scenario(&mut self, scenario: &Scenario) -> strider_types::Result<()> {
        let scene = flatten(scenario)?;
        self.ingest(scene)
    }

    fn step(&mut self, dt: f64) -> strider_types::Result<()> {
        if !self.loaded {
            return Err(SceneError::not_ready("step"));
        }

        let substeps = self.settings.substeps.max(1);
        let h = dt / f64::from(substeps);
        let gravity = self.settings.gravity.acceleration;

        for _ in 0..substeps {
            for body in &mut self.bodies {
                if body.dynamics != DynamicsType::Dynamic {
                    continue;
                }
                // Semi-implicit Euler: velocity first, then position.
                let acceleration = gravity + body.force_accum / body.mass;
                body.velocity += acceleration * h;
                body.pose.position += body.velocity * h;
            }
            for agent in &mut self.agents {
                for joint in &mut agent.joints {
                    joint.velocity = joint.target;
                    joint.position = joint.limits.clamp(joint.position + joint.velocity * h);
                }
            }
        }

        for body in &mut self.bodies {
            body.force_accum = Vector3::zeros();
        }
        self.time += dt;
        Ok(())
    }

    fn reset(&mut self) {
        for body in &mut self.bodies {
            body.pose = body.initial_pose;
            body.velocity = Vector3::zeros();
            body.force_accum = Vector3::zeros();
        }
        for agent in &mut self.agents {
            for joint in &mut agent.joints {
                joint.position = 0.0;
                joint.velocity = 0.0;
                joint.target = 0.0;
            }
        }
        self.time = 0.0;
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn body_pose(&self, name: &str) -> Option<Transform> {
        self.index.get(name).map(|&i| self.bodies[i].pose)
    }

    fn body_velocity(&self, name: &str) -> Option<Vector3<f64>> {
        self.index.get(name).map(|&i| self.bodies[i].velocity)
    }

    fn body_acceleration(&self, name: &str) -> Option<Vector3<f64>> {
        self.index.get(name).map(|&i| {
            let body = &self.bodies[i];
            match body.dynamics {
                DynamicsType::Dynamic => {
                    self.settings.gravity.acceleration + body.force_accum / body.mass
                }
                DynamicsType::Static | DynamicsType::Kinematic => Vector3::zeros(),
            }
        })
    }

    fn set_body_pose(&mut self, name: &str, pose: Transform) -> strider_types::Result<()> {
        let &i = self
            .index
            .get(name)
            .ok_or_else(|| SceneError::BodyNotFound { name: name.into() })?;
        let body = &mut self.bodies[i];
        if body.dynamics != DynamicsType::Kinematic {
            return Err(SceneError::backend_rejected(format!(
                "body {name} is {}, only kinematic bodies can be repositioned",
                body.dynamics
            )));
        }
        body.pose = pose;
        Ok(())
    }

    fn apply_force(&mut self, name: &str, force: Vector3<f64>) -> strider_types::Result<()> {
        let &i = self
            .index
            .get(name)
            .ok_or_else(|| SceneError::BodyNotFound { name: name.into() })?;
        self.bodies[i].force_accum += force;
        Ok(())
    }

    fn set_joint_targets(&mut self, agent: &str, targets: &[f64]) -> strider_types::Result<()> {
        let &i = self
            .agent_index
            .get(agent)
            .ok_or_else(|| SceneError::AgentNotFound { name: agent.into() })?;
        for (joint, target) in self.agents[i].joints.iter_mut().zip(targets) {
            joint.target = *target;
        }
        Ok(())
    }

    fn joint_states(&self, agent: &str) -> Option<Vec<(f64, f64)>> {
        self.agent_index.get(agent).map(|&i| {
            self.agents[i]
                .joints
                .iter()
                .map(|j| (j.position, j.velocity))
                .collect()
        })
    }

    fn vectorized_data(&self) -> HashMap<String, DVector<f64>> {
        let mut qpos = Vec::new();
        let mut qvel = Vec::new();
        let mut forces = Vec::new();

        for body in &self.bodies {
            if body.dynamics == DynamicsType::Static {
                continue;
            }
            let q = body.pose.rotation.quaternion();
            qpos.extend([
                body.pose.position.x,
                body.pose.position.y,
                body.pose.position.z,
                q.w,
                q.i,
                q.j,
                q.k,
            ]);
            qvel.extend([body.velocity.x, body.velocity.y, body.velocity.z]);
            forces.extend([body.force_accum.x, body.force_accum.y, body.force_accum.z]);
        }
        for agent in &self.agents {
            for joint in &agent.joints {
                qpos.push(joint.position);
                qvel.push(joint.velocity);
            }
        }

        let mut map = HashMap::new();
        map.insert("qpos".to_owned(), DVector::from_vec(qpos));
        map.insert("qvel".to_owned(), DVector::from_vec(qvel));
        map.insert("forces_ext".to_owned(), DVector::from_vec(forces));
        map
    }
}

/// No-op physics adapter: poses stay at authoring values, time advances.
#[derive(Debug, Default)]
pub struct NullPhysics {
    bodies: Vec<BodyRecord>,
    index: HashMap<String, usize>,
    agents: Vec<AgentRecord>,
    agent_index: HashMap<String, usize>,
    time: f64,
    loaded: bool,
}

impl NullPhysics {
    /// Create a null adapter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PhysicsBackend for NullPhysics {
    fn backend_id(&self) -> &'static str {
        "null"
    }

    fn load_scenario(&mut self, scenario: &Scenario) -> strider_types::Result<()> {
        let scene = flatten(scenario)?;
        self.bodies = scene
            .bodies
            .iter()
            .map(|b| BodyRecord {
                name: b.name.clone(),
                dynamics: b.dynamics,
                pose: b.initial_transform,
                velocity: Vector3::zeros(),
                force_accum: Vector3::zeros(),
                mass: b.mass,
                initial_pose: b.initial_transform,
            })
            .collect();
        self.index = self
            .bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.clone(), i))
            .collect();
        self.agents = scene
            .agents
            .iter()
            .map(|a| AgentRecord {
                name: a.name.clone(),
                joints: a
                    .joints
                    .iter()
                    .map(|j| JointRecord {
                        limits: j.limits,
                        position: 0.0,
                        velocity: 0.0,
                        target: 0.0,
                    })
                    .collect(),
            })
            .collect();
        self.agent_index = self
            .agents
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.clone(), i))
            .collect();
        self.time = 0.0;
        self.loaded = true;
        Ok(())
    }

    fn step(&mut self, dt: f64) -> strider_types::Result<()> {
        if !self.loaded {
            return Err(SceneError::not_ready("step"));
        }
        self.time += dt;
        Ok(())
    }

    fn reset(&mut self) {
        for body in &mut self.bodies {
            body.pose = body.initial_pose;
            body.force_accum = Vector3::zeros();
        }
        self.time = 0.0;
    }

    fn time(&self) -> f64 {
        self.time
    }

    fn body_pose(&self, name: &str) -> Option<Transform> {
        self.index.get(name).map(|&i| self.bodies[i].pose)
    }

    fn body_velocity(&self, name: &str) -> Option<Vector3<f64>> {
        self.index.get(name).map(|_| Vector3::zeros())
    }

    fn body_acceleration(&self, name: &str) -> Option<Vector3<f64>> {
        self.index.get(name).map(|_| Vector3::zeros())
    }

    fn set_body_pose(&mut self, name: &str, pose: Transform) -> strider_types::Result<()> {
        let &i = self
            .index
            .get(name)
            .ok_or_else(|| SceneError::BodyNotFound { name: name.into() })?;
        self.bodies[i].pose = pose;
        Ok(())
    }

    fn apply_force(&mut self, name: &str, _force: Vector3<f64>) -> strider_types::Result<()> {
        if !self.index.contains_key(name) {
            return Err(SceneError::BodyNotFound { name: name.into() });
        }
        Ok(())
    }

    fn set_joint_targets(&mut self, agent: &str, _targets: &[f64]) -> strider_types::Result<()> {
        if !self.agent_index.contains_key(agent) {
            return Err(SceneError::AgentNotFound { name: agent.into() });
        }
        Ok(())
    }

    fn joint_states(&self, agent: &str) -> Option<Vec<(f64, f64)>> {
        self.agent_index
            .get(agent)
            .map(|&i| self.agents[i].joints.iter().map(|_| (0.0, 0.0)).collect())
    }

    fn vectorized_data(&self) -> HashMap<String, DVector<f64>> {
        let mut qpos = Vec::new();
        let mut qvel = Vec::new();
        let mut forces = Vec::new();
        for body in &self.bodies {
            if body.dynamics == DynamicsType::Static {
                continue;
            }
            let q = body.pose.rotation.quaternion();
            qpos.extend([
                body.pose.position.x,
                body.pose.position.y,
                body.pose.position.z,
                q.w,
                q.i,
                q.j,
                q.k,
            ]);
            qvel.extend([0.0, 0.0, 0.0]);
            forces.extend([0.0, 0.0, 0.0]);
        }
        for agent in &self.agents {
            for _ in &agent.joints {
                qpos.push(0.0);
                qvel.push(0.0);
            }
        }
        let mut map = HashMap::new();
        map.insert("qpos".to_owned(), DVector::from_vec(qpos));
        map.insert("qvel".to_owned(), DVector::from_vec(qvel));
        map.insert("forces_ext".to_owned(), DVector::from_vec(forces));
        map
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector3};
    use strider_scene::SingleBody;
    use strider_types::{BodyData, ShapeDescriptor};

    fn falling_box_scenario() -> Scenario {
        let mut scenario = Scenario::new();
        scenario
            .add_single_body(SingleBody::new(
                "box_0",
                BodyData::dynamic()
                    .with_shape(ShapeDescriptor::box_shape(Vector3::new(0.2, 0.2, 0.2)))
                    .with_mass(2.0),
                Transform::from_position(Point3::new(0.0, 0.0, 3.0)),
            ))
            .unwrap();
        scenario
    }

    #[test]
    fn test_free_fall() {
        let mut backend = InternalPhysics::new(SimulationSettings::default());
        backend.load_scenario(&falling_box_scenario()).unwrap();

        let dt = 1.0 / 60.0;
        backend.step(dt).unwrap();

        let pose = backend.body_pose("box_0").unwrap();
        assert!(pose.position.z < 3.0);
        let vel = backend.body_velocity("box_0").unwrap();
        assert!(vel.z < 0.0);
    }

    #[test]
    fn test_step_before_load_fails() {
        let mut backend = InternalPhysics::new(SimulationSettings::default());
        assert!(backend.step(0.01).unwrap_err().is_not_ready());
    }

    #[test]
    fn test_substeps_match_single_pass_position_update() {
        // With semi-implicit Euler under constant gravity the velocity
        // after one step is identical regardless of substep count.
        let settings = SimulationSettings::default().with_substeps(4);
        let mut backend = InternalPhysics::new(settings);
        backend.load_scenario(&falling_box_scenario()).unwrap();
        backend.step(1.0 / 60.0).unwrap();
        let vel = backend.body_velocity("box_0").unwrap();
        assert_relative_eq!(vel.z, -9.81 / 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_mesh_collider_rejected() {
        let mut scenario = Scenario::new();
        scenario
            .add_single_body(SingleBody::new(
                "rock",
                BodyData::dynamic().with_collision(ShapeDescriptor::mesh(
                    "meshes/rock.stl",
                    Vector3::new(1.0, 1.0, 1.0),
                )),
                Transform::identity(),
            ))
            .unwrap();

        let mut backend = InternalPhysics::new(SimulationSettings::default());
        let err = backend.load_scenario(&scenario).unwrap_err();
        assert!(matches!(err, SceneError::BackendRejected { .. }));
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut backend = InternalPhysics::new(SimulationSettings::default());
        backend.load_scenario(&falling_box_scenario()).unwrap();
        for _ in 0..30 {
            backend.step(1.0 / 60.0).unwrap();
        }
        backend.reset();

        let pose = backend.body_pose("box_0").unwrap();
        assert_relative_eq!(pose.position.z, 3.0, epsilon = 1e-12);
        assert_relative_eq!(
            backend.body_velocity("box_0").unwrap(),
            Vector3::zeros(),
            epsilon = 1e-12
        );
        assert_eq!(backend.time(), 0.0);
    }

    #[test]
    fn test_applied_force_counteracts_gravity() {
        let mut backend = InternalPhysics::new(SimulationSettings::default());
        backend.load_scenario(&falling_box_scenario()).unwrap();
        // Exactly cancel gravity on the 2 kg box for one step.
        backend
            .apply_force("box_0", Vector3::new(0.0, 0.0, 2.0 * 9.81))
            .unwrap();
        backend.step(1.0 / 60.0).unwrap();
        let vel = backend.body_velocity("box_0").unwrap();
        assert_relative_eq!(vel.z, 0.0, epsilon = 1e-12);

        // Force was one-shot; the next step falls.
        backend.step(1.0 / 60.0).unwrap();
        assert!(backend.body_velocity("box_0").unwrap().z < 0.0);
    }

    #[test]
    fn test_null_backend_holds_poses() {
        let mut backend = NullPhysics::new();
        backend.load_scenario(&falling_box_scenario()).unwrap();
        backend.step(1.0).unwrap();
        let pose = backend.body_pose("box_0").unwrap();
        assert_relative_eq!(pose.position.z, 3.0, epsilon = 1e-12);
        assert_relative_eq!(backend.time(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vectorized_data_shapes() {
        let mut backend = InternalPhysics::new(SimulationSettings::default());
        backend.load_scenario(&falling_box_scenario()).unwrap();
        let data = backend.vectorized_data();
        assert_eq!(data["qpos"].len(), 7);
        assert_eq!(data["qvel"].len(), 3);
        assert_eq!(data["forces_ext"].len(), 3);
    }
}
