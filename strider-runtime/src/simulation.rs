//! Simulation lifecycle.
//!
//! A [`Simulation`] owns one physics adapter and drives it through the
//! state machine `Uninitialized → Initialized → (Running ⇄ Paused)`, with
//! `reset()` returning to `Initialized` from anywhere past
//! `Uninitialized`.
//!
//! Actions and forces committed before a `step` are visible to that step's
//! dynamics; queries after a `step` reflect exactly that step's result.

use std::sync::Arc;

use hashbrown::HashMap;
use nalgebra::{DVector, Vector3};
use strider_scene::Scenario;
use strider_types::{SceneError, SimulationSettings, Transform};
use tracing::debug;

use crate::backend::{PhysicsAdapter, PhysicsBackend};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle state of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SimulationState {
    /// Created but not yet translated into the backend.
    Uninitialized,
    /// Backend holds the scenario; time has not advanced since the last
    /// initialize/reset.
    Initialized,
    /// Stepping normally.
    Running,
    /// Step calls are ignored; time does not advance.
    Paused,
}

/// Drives a physics backend over one scenario.
pub struct Simulation {
    scenario: Arc<Scenario>,
    adapter: PhysicsAdapter,
    settings: SimulationSettings,
    state: SimulationState,
    pending_actions: HashMap<String, Vec<f64>>,
    pending_forces: Vec<(String, Vector3<f64>)>,
}

impl Simulation {
    pub(crate) fn new(
        scenario: Arc<Scenario>,
        adapter: PhysicsAdapter,
        settings: SimulationSettings,
    ) -> Self {
        Self {
            scenario,
            adapter,
            settings,
            state: SimulationState::Uninitialized,
            pending_actions: HashMap::new(),
            pending_forces: Vec::new(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// The scenario this simulation is bound to.
    #[must_use]
    pub fn scenario(&self) -> &Arc<Scenario> {
        &self.scenario
    }

    /// Identifier of the physics backend.
    #[must_use]
    pub fn backend_id(&self) -> &'static str {
        self.adapter.backend_id()
    }

    /// Backend time in seconds.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.adapter.time()
    }

    /// Simulation settings in effect.
    #[must_use]
    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    /// Translate the scenario into backend-native bodies and joints.
    ///
    /// Valid only from `Uninitialized`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::AlreadyBound`] if already initialized, or
    /// [`SceneError::BackendRejected`] from the backend.
    pub fn initialize(&mut self) -> strider_types::Result<()> {
        if self.state != SimulationState::Uninitialized {
            return Err(SceneError::already_bound("simulation"));
        }
        self.adapter.load_scenario(&self.scenario)?;
        self.state = SimulationState::Initialized;
        debug!(backend = self.adapter.backend_id(), "simulation initialized");
        Ok(())
    }

    /// Advance backend time by `dt`.
    ///
    /// Commits buffered actions and forces first, so they are visible to
    /// this step's dynamics. A paused simulation ignores the call — time
    /// does not advance and `Ok(())` is returned.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotReady`] before `initialize`, or
    /// [`SceneError::InvalidConfig`] for a non-positive or non-finite
    /// `dt`.
    pub fn step(&mut self, dt: f64) -> strider_types::Result<()> {
        match self.state {
            SimulationState::Uninitialized => Err(SceneError::not_ready("step")),
            SimulationState::Paused => Ok(()),
            SimulationState::Initialized | SimulationState::Running => {
                if !dt.is_finite() || dt <= 0.0 {
                    return Err(SceneError::invalid_config(format!(
                        "step dt must be positive and finite, got {dt}"
                    )));
                }
                for (agent, targets) in self.pending_actions.drain() {
                    self.adapter.set_joint_targets(&agent, &targets)?;
                }
                for (body, force) in self.pending_forces.drain(..) {
                    self.adapter.apply_force(&body, force)?;
                }
                self.adapter.step(dt)?;
                self.state = SimulationState::Running;
                Ok(())
            }
        }
    }

    /// Restore every body to its authoring-time pose and velocity, clear
    /// action buffers and return to `Initialized`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotReady`] before `initialize`.
    pub fn reset(&mut self) -> strider_types::Result<()> {
        if self.state == SimulationState::Uninitialized {
            return Err(SceneError::not_ready("reset"));
        }
        self.adapter.reset();
        self.pending_actions.clear();
        self.pending_forces.clear();
        self.state = SimulationState::Initialized;
        debug!("simulation reset");
        Ok(())
    }

    /// Pause stepping. Backend state is untouched; a no-op unless the
    /// simulation is `Initialized` or `Running`.
    pub fn pause(&mut self) {
        if matches!(
            self.state,
            SimulationState::Initialized | SimulationState::Running
        ) {
            self.state = SimulationState::Paused;
        }
    }

    /// Resume stepping after a pause. A no-op in any other state.
    pub fn resume(&mut self) {
        if self.state == SimulationState::Paused {
            self.state = SimulationState::Running;
        }
    }

    /// Buffer an action vector for an agent, committed at the next `step`.
    ///
    /// A second call for the same agent before the step replaces the
    /// buffered vector.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotReady`] before `initialize`,
    /// [`SceneError::AgentNotFound`] for an unknown agent, or
    /// [`SceneError::ActionSizeMismatch`] if the vector length differs
    /// from the agent's fixed action dimension.
    pub fn set_actions(&mut self, agent: &str, actions: &[f64]) -> strider_types::Result<()> {
        self.require_ready("set_actions")?;
        let expected = self
            .scenario
            .agent(agent)
            .ok_or_else(|| SceneError::AgentNotFound { name: agent.into() })?
            .action_dim();
        if actions.len() != expected {
            return Err(SceneError::ActionSizeMismatch {
                agent: agent.into(),
                expected,
                actual: actions.len(),
            });
        }
        self.pending_actions.insert(agent.into(), actions.to_vec());
        Ok(())
    }

    /// Buffer a one-shot external force on a body, committed at the next
    /// `step`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotReady`] before `initialize`, or
    /// [`SceneError::BodyNotFound`] for an unknown body.
    pub fn apply_force(&mut self, body: &str, force: Vector3<f64>) -> strider_types::Result<()> {
        self.require_ready("apply_force")?;
        if self.adapter.body_pose(body).is_none() {
            return Err(SceneError::BodyNotFound { name: body.into() });
        }
        self.pending_forces.push((body.into(), force));
        Ok(())
    }

    /// World pose of a body.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotReady`] before `initialize`, or
    /// [`SceneError::BodyNotFound`] for an unknown body.
    pub fn body_pose(&self, body: &str) -> strider_types::Result<Transform> {
        self.require_ready("body_pose")?;
        self.adapter
            .body_pose(body)
            .ok_or_else(|| SceneError::BodyNotFound { name: body.into() })
    }

    /// Linear velocity of a body.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Simulation::body_pose`].
    pub fn body_velocity(&self, body: &str) -> strider_types::Result<Vector3<f64>> {
        self.require_ready("body_velocity")?;
        self.adapter
            .body_velocity(body)
            .ok_or_else(|| SceneError::BodyNotFound { name: body.into() })
    }

    /// Linear acceleration currently acting on a body.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Simulation::body_pose`].
    pub fn body_acceleration(&self, body: &str) -> strider_types::Result<Vector3<f64>> {
        self.require_ready("body_acceleration")?;
        self.adapter
            .body_acceleration(body)
            .ok_or_else(|| SceneError::BodyNotFound { name: body.into() })
    }

    /// Reposition a kinematic body.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotReady`] before `initialize`,
    /// [`SceneError::BodyNotFound`] for an unknown body, or
    /// [`SceneError::BackendRejected`] for a non-kinematic body.
    pub fn set_body_pose(&mut self, body: &str, pose: Transform) -> strider_types::Result<()> {
        self.require_ready("set_body_pose")?;
        self.adapter.set_body_pose(body, pose)
    }

    /// (position, velocity) of an agent's actuated joints, in tree order.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotReady`] before `initialize`, or
    /// [`SceneError::AgentNotFound`] for an unknown agent.
    pub fn joint_states(&self, agent: &str) -> strider_types::Result<Vec<(f64, f64)>> {
        self.require_ready("joint_states")?;
        self.adapter
            .joint_states(agent)
            .ok_or_else(|| SceneError::AgentNotFound { name: agent.into() })
    }

    /// Vectorized state export with keys `qpos`, `qvel` and `forces_ext`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotReady`] before `initialize`.
    pub fn vectorized_data(&self) -> strider_types::Result<HashMap<String, DVector<f64>>> {
        self.require_ready("vectorized_data")?;
        Ok(self.adapter.vectorized_data())
    }

    fn require_ready(&self, operation: &str) -> strider_types::Result<()> {
        if self.state == SimulationState::Uninitialized {
            return Err(SceneError::not_ready(operation));
        }
        Ok(())
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("backend", &self.adapter.backend_id())
            .field("state", &self.state)
            .field("time", &self.adapter.time())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::backend::PhysicsBackendKind;
    use approx::assert_relative_eq;
    use nalgebra::Point3;
    use strider_scene::SingleBody;
    use strider_types::{BodyData, ShapeDescriptor};

    fn simulation() -> Simulation {
        let mut scenario = Scenario::new();
        scenario
            .add_single_body(SingleBody::new(
                "box_0",
                BodyData::dynamic().with_shape(ShapeDescriptor::box_shape(Vector3::new(
                    0.2, 0.2, 0.2,
                ))),
                Transform::from_position(Point3::new(0.0, 0.0, 3.0)),
            ))
            .unwrap();

        let settings = SimulationSettings::default();
        Simulation::new(
            Arc::new(scenario),
            PhysicsBackendKind::Internal.create(settings.clone()),
            settings,
        )
    }

    #[test]
    fn test_lifecycle_happy_path() {
        let mut sim = simulation();
        assert_eq!(sim.state(), SimulationState::Uninitialized);
        sim.initialize().unwrap();
        assert_eq!(sim.state(), SimulationState::Initialized);
        sim.step(1.0 / 60.0).unwrap();
        assert_eq!(sim.state(), SimulationState::Running);
        sim.reset().unwrap();
        assert_eq!(sim.state(), SimulationState::Initialized);
    }

    #[test]
    fn test_queries_before_initialize_fail() {
        let sim = simulation();
        assert!(sim.body_pose("box_0").unwrap_err().is_not_ready());
        assert!(sim.vectorized_data().unwrap_err().is_not_ready());

        let mut sim = simulation();
        assert!(sim.step(0.01).unwrap_err().is_not_ready());
        assert!(sim.reset().unwrap_err().is_not_ready());
    }

    #[test]
    fn test_double_initialize_fails() {
        let mut sim = simulation();
        sim.initialize().unwrap();
        let err = sim.initialize().unwrap_err();
        assert!(err.is_already_bound());
        // State untouched by the failed call.
        assert_eq!(sim.state(), SimulationState::Initialized);
    }

    #[test]
    fn test_pause_gates_time() {
        let mut sim = simulation();
        sim.initialize().unwrap();
        sim.step(1.0 / 60.0).unwrap();
        let t = sim.time();
        sim.pause();
        assert_eq!(sim.state(), SimulationState::Paused);
        sim.step(1.0 / 60.0).unwrap();
        sim.step(1.0 / 60.0).unwrap();
        assert_relative_eq!(sim.time(), t, epsilon = 1e-15);
        sim.resume();
        sim.step(1.0 / 60.0).unwrap();
        assert!(sim.time() > t);
    }

    #[test]
    fn test_invalid_dt_rejected() {
        let mut sim = simulation();
        sim.initialize().unwrap();
        assert!(sim.step(0.0).is_err());
        assert!(sim.step(f64::NAN).is_err());
        assert!(sim.step(-0.1).is_err());
    }

    #[test]
    fn test_reset_roundtrip() {
        let mut sim = simulation();
        sim.initialize().unwrap();
        let initial = sim.body_pose("box_0").unwrap();
        for _ in 0..17 {
            sim.step(1.0 / 60.0).unwrap();
        }
        assert!(sim.body_pose("box_0").unwrap().position.z < initial.position.z);

        sim.reset().unwrap();
        let restored = sim.body_pose("box_0").unwrap();
        assert_relative_eq!(restored.position, initial.position, epsilon = 1e-12);
        assert_relative_eq!(
            sim.body_velocity("box_0").unwrap(),
            Vector3::zeros(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_force_committed_to_next_step() {
        let mut sim = simulation();
        sim.initialize().unwrap();
        // Cancel gravity on the default 1 kg box for one step.
        sim.apply_force("box_0", Vector3::new(0.0, 0.0, 9.81)).unwrap();
        sim.step(1.0 / 60.0).unwrap();
        assert_relative_eq!(sim.body_velocity("box_0").unwrap().z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_unknown_body_queries() {
        let mut sim = simulation();
        sim.initialize().unwrap();
        assert!(matches!(
            sim.body_pose("ghost").unwrap_err(),
            SceneError::BodyNotFound { .. }
        ));
        assert!(matches!(
            sim.apply_force("ghost", Vector3::zeros()).unwrap_err(),
            SceneError::BodyNotFound { .. }
        ));
    }

    #[test]
    fn test_set_actions_validation() {
        let mut sim = simulation();
        sim.initialize().unwrap();
        assert!(matches!(
            sim.set_actions("nobody", &[0.0]).unwrap_err(),
            SceneError::AgentNotFound { .. }
        ));
    }
}
