//! Sensor measurement aggregation.
//!
//! An [`IntrinsicsSensor`] binds a sensor declaration to an agent inside
//! an initialized simulation, fixing the measurement shapes (joint count,
//! body count) once. Every [`IntrinsicsSensor::measure`] call recomputes
//! values from current simulation state; nothing is cached across steps.

use hashbrown::HashMap;
use nalgebra::DVector;
use strider_scene::SensorSpec;
use strider_types::SceneError;

use crate::flatten::flat_body_name;
use crate::simulation::{Simulation, SimulationState};

/// Keys of the measurement map, in emission order.
pub const MEASUREMENT_KEYS: [&str; 5] = [
    "jointspos",
    "jointsvel",
    "bodiesrelpos",
    "bodieslinvel",
    "bodieslinacc",
];

/// One proprioceptive measurement of an agent.
///
/// Vector lengths are fixed at sensor bind time: `dof` for the joint
/// entries and `3 * body_count` for the body entries.
#[derive(Debug, Clone)]
pub struct Measurement {
    /// Actuated joint positions.
    pub joints_pos: DVector<f64>,
    /// Actuated joint velocities.
    pub joints_vel: DVector<f64>,
    /// Body positions relative to the agent root, concatenated xyz.
    pub bodies_rel_pos: DVector<f64>,
    /// Body linear velocities, concatenated xyz.
    pub bodies_lin_vel: DVector<f64>,
    /// Body linear accelerations, concatenated xyz.
    pub bodies_lin_acc: DVector<f64>,
}

impl Measurement {
    /// Convert into a keyed map (`jointspos`, `jointsvel`, `bodiesrelpos`,
    /// `bodieslinvel`, `bodieslinacc`).
    #[must_use]
    pub fn into_map(self) -> HashMap<&'static str, DVector<f64>> {
        let mut map = HashMap::new();
        map.insert("jointspos", self.joints_pos);
        map.insert("jointsvel", self.joints_vel);
        map.insert("bodiesrelpos", self.bodies_rel_pos);
        map.insert("bodieslinvel", self.bodies_lin_vel);
        map.insert("bodieslinacc", self.bodies_lin_acc);
        map
    }
}

/// Proprioceptive sensor bound to one agent.
#[derive(Debug, Clone)]
pub struct IntrinsicsSensor {
    name: String,
    agent: String,
    dof: usize,
    root_body: String,
    body_names: Vec<String>,
}

impl IntrinsicsSensor {
    /// Bind a sensor declaration against an initialized simulation.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotReady`] if the simulation is not yet
    /// initialized, or [`SceneError::AgentNotFound`] if the declared
    /// agent is absent from the scenario.
    pub fn bind(spec: &SensorSpec, simulation: &Simulation) -> strider_types::Result<Self> {
        if simulation.state() == SimulationState::Uninitialized {
            return Err(SceneError::not_ready("sensor bind"));
        }
        let agent = simulation
            .scenario()
            .agent(spec.agent())
            .ok_or_else(|| SceneError::AgentNotFound {
                name: spec.agent().to_owned(),
            })?;

        let compound = agent.compound();
        let root = compound.root().ok_or_else(|| {
            SceneError::invalid_topology(format!(
                "agent {} has an empty kinematic tree",
                agent.name()
            ))
        })?;

        Ok(Self {
            name: spec.name().to_owned(),
            agent: agent.name().to_owned(),
            dof: agent.action_dim(),
            root_body: flat_body_name(agent.name(), &root.name),
            body_names: compound
                .nodes()
                .map(|n| flat_body_name(agent.name(), &n.name))
                .collect(),
        })
    }

    /// Sensor name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bound agent name.
    #[must_use]
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Degrees of freedom reported per joint-entry, fixed at bind time.
    #[must_use]
    pub fn dof(&self) -> usize {
        self.dof
    }

    /// Bodies reported per body-entry, fixed at bind time.
    #[must_use]
    pub fn body_count(&self) -> usize {
        self.body_names.len()
    }

    /// Compute a fresh measurement from current simulation state.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotReady`] if the simulation is not
    /// initialized, or [`SceneError::BodyNotFound`] /
    /// [`SceneError::AgentNotFound`] if the bound entities vanished from
    /// the backend (which cannot happen for scenarios built through the
    /// authoring API).
    pub fn measure(&self, simulation: &Simulation) -> strider_types::Result<Measurement> {
        let joints = simulation.joint_states(&self.agent)?;
        let mut joints_pos = Vec::with_capacity(self.dof);
        let mut joints_vel = Vec::with_capacity(self.dof);
        for (position, velocity) in joints {
            joints_pos.push(position);
            joints_vel.push(velocity);
        }

        let root = simulation.body_pose(&self.root_body)?;
        let mut rel_pos = Vec::with_capacity(3 * self.body_names.len());
        let mut lin_vel = Vec::with_capacity(3 * self.body_names.len());
        let mut lin_acc = Vec::with_capacity(3 * self.body_names.len());
        for body in &self.body_names {
            let pose = simulation.body_pose(body)?;
            let rel = pose.position - root.position;
            rel_pos.extend([rel.x, rel.y, rel.z]);

            let vel = simulation.body_velocity(body)?;
            lin_vel.extend([vel.x, vel.y, vel.z]);

            let acc = simulation.body_acceleration(body)?;
            lin_acc.extend([acc.x, acc.y, acc.z]);
        }

        Ok(Measurement {
            joints_pos: DVector::from_vec(joints_pos),
            joints_vel: DVector::from_vec(joints_vel),
            bodies_rel_pos: DVector::from_vec(rel_pos),
            bodies_lin_vel: DVector::from_vec(lin_vel),
            bodies_lin_acc: DVector::from_vec(lin_acc),
        })
    }
}
