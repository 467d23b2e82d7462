//! Backend adapter seams.
//!
//! The runtime drives physics and rendering through the two traits below;
//! everything a backend implementation knows about solvers or graphics
//! stays behind them. The supported implementations form a closed set:
//! each trait has a kind enum resolved from a backend name, and an adapter
//! enum dispatching to the matching implementation. There is no runtime
//! plugin loading.

use hashbrown::HashMap;
use nalgebra::{DVector, Vector3};
use strider_scene::Scenario;
use strider_types::{SceneError, SimulationSettings, Transform};

use crate::physics::{InternalPhysics, NullPhysics};
use crate::render::{HeadlessRender, KeyState, NullRender};

/// Boundary interface to a physics implementation.
///
/// One `step` call performs exactly one sub-stepping pass for the given
/// `dt` (subdivided internally per the adapter's settings); queries after
/// it return that step's result, never a partially-applied one.
pub trait PhysicsBackend {
    /// Identifier reported by the backend.
    fn backend_id(&self) -> &'static str;

    /// Ingest the scenario into backend-native bodies and joints.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::BackendRejected`] if the backend cannot
    /// represent a requested shape/joint combination.
    fn load_scenario(&mut self, scenario: &Scenario) -> strider_types::Result<()>;

    /// Advance backend time by `dt`.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotReady`] if no scenario is loaded.
    fn step(&mut self, dt: f64) -> strider_types::Result<()>;

    /// Restore every body to its authoring-time state and rewind time.
    fn reset(&mut self);

    /// Current backend time (seconds).
    fn time(&self) -> f64;

    /// World pose of a body.
    fn body_pose(&self, name: &str) -> Option<Transform>;

    /// Linear velocity of a body.
    fn body_velocity(&self, name: &str) -> Option<Vector3<f64>>;

    /// Linear acceleration currently acting on a body.
    fn body_acceleration(&self, name: &str) -> Option<Vector3<f64>>;

    /// Reposition a body (kinematic bodies only).
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::BodyNotFound`] for an unknown name, or
    /// [`SceneError::BackendRejected`] for a non-kinematic body.
    fn set_body_pose(&mut self, name: &str, pose: Transform) -> strider_types::Result<()>;

    /// Accumulate an external force on a body for the next step.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::BodyNotFound`] for an unknown name.
    fn apply_force(&mut self, name: &str, force: Vector3<f64>) -> strider_types::Result<()>;

    /// Set actuator targets for an agent's actuated joints, in tree order.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::AgentNotFound`] for an unknown agent.
    fn set_joint_targets(&mut self, agent: &str, targets: &[f64]) -> strider_types::Result<()>;

    /// (position, velocity) of an agent's actuated joints, in tree order.
    fn joint_states(&self, agent: &str) -> Option<Vec<(f64, f64)>>;

    /// Vectorized state export: `qpos`, `qvel`, `forces_ext`.
    fn vectorized_data(&self) -> HashMap<String, DVector<f64>>;
}

/// Boundary interface to a rendering implementation.
pub trait RenderBackend {
    /// Identifier reported by the backend.
    fn backend_id(&self) -> &'static str;

    /// Ingest the scenario, mirroring the simulation's entity set.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::BackendRejected`] if the backend cannot
    /// represent a requested visual.
    fn load_scenario(&mut self, scenario: &Scenario) -> strider_types::Result<()>;

    /// Draw one frame.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::NotReady`] if no scenario is loaded.
    fn render_frame(&mut self) -> strider_types::Result<()>;

    /// Snapshot of the current hardware key state.
    fn poll_key_state(&self) -> KeyState;

    /// Number of frames rendered since scenario load.
    fn frame_count(&self) -> u64;
}

/// Supported physics backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicsBackendKind {
    /// Built-in reference integrator (gravity free-body dynamics).
    Internal,
    /// No-op backend: holds poses, advances time.
    Null,
}

impl PhysicsBackendKind {
    /// Resolve a backend kind from its name.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnsupportedBackend`] for an unknown name.
    pub fn from_name(name: &str) -> strider_types::Result<Self> {
        match name {
            "internal" => Ok(Self::Internal),
            "null" | "none" => Ok(Self::Null),
            _ => Err(SceneError::unsupported_backend(name)),
        }
    }

    /// Canonical name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Null => "null",
        }
    }

    /// Instantiate the adapter for this kind.
    #[must_use]
    pub fn create(self, settings: SimulationSettings) -> PhysicsAdapter {
        match self {
            Self::Internal => PhysicsAdapter::Internal(InternalPhysics::new(settings)),
            Self::Null => PhysicsAdapter::Null(NullPhysics::new()),
        }
    }
}

/// Supported rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderBackendKind {
    /// Windowless renderer that mirrors the scene and tracks input.
    Headless,
    /// No-op renderer.
    Null,
}

impl RenderBackendKind {
    /// Resolve a backend kind from its name.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnsupportedBackend`] for an unknown name.
    pub fn from_name(name: &str) -> strider_types::Result<Self> {
        match name {
            "headless" => Ok(Self::Headless),
            "null" | "none" => Ok(Self::Null),
            _ => Err(SceneError::unsupported_backend(name)),
        }
    }

    /// Canonical name of this kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Headless => "headless",
            Self::Null => "null",
        }
    }

    /// Instantiate the adapter for this kind.
    #[must_use]
    pub fn create(self) -> RenderAdapter {
        match self {
            Self::Headless => RenderAdapter::Headless(HeadlessRender::new()),
            Self::Null => RenderAdapter::Null(NullRender::new()),
        }
    }
}

/// Static dispatch over the supported physics adapters.
#[derive(Debug)]
pub enum PhysicsAdapter {
    /// Built-in reference integrator.
    Internal(InternalPhysics),
    /// No-op backend.
    Null(NullPhysics),
}

impl PhysicsBackend for PhysicsAdapter {
    fn backend_id(&self) -> &'static str {
        match self {
            Self::Internal(b) => b.backend_id(),
            Self::Null(b) => b.backend_id(),
        }
    }

    fn load_scenario(&mut self, scenario: &Scenario) -> strider_types::Result<()> {
        match self {
            Self::Internal(b) => b.load_scenario(scenario),
            Self::Null(b) => b.load_scenario(scenario),
        }
    }

    fn step(&mut self, dt: f64) -> strider_types::Result<()> {
        match self {
            Self::Internal(b) => b.step(dt),
            Self::Null(b) => b.step(dt),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Internal(b) => b.reset(),
            Self::Null(b) => b.reset(),
        }
    }

    fn time(&self) -> f64 {
        match self {
            Self::Internal(b) => b.time(),
            Self::Null(b) => b.time(),
        }
    }

    fn body_pose(&self, name: &str) -> Option<Transform> {
        match self {
            Self::Internal(b) => b.body_pose(name),
            Self::Null(b) => b.body_pose(name),
        }
    }

    fn body_velocity(&self, name: &str) -> Option<Vector3<f64>> {
        match self {
            Self::Internal(b) => b.body_velocity(name),
            Self::Null(b) => b.body_velocity(name),
        }
    }

    fn body_acceleration(&self, name: &str) -> Option<Vector3<f64>> {
        match self {
            Self::Internal(b) => b.body_acceleration(name),
            Self::Null(b) => b.body_acceleration(name),
        }
    }

    fn set_body_pose(&mut self, name: &str, pose: Transform) -> strider_types::Result<()> {
        match self {
            Self::Internal(b) => b.set_body_pose(name, pose),
            Self::Null(b) => b.set_body_pose(name, pose),
        }
    }

    fn apply_force(&mut self, name: &str, force: Vector3<f64>) -> strider_types::Result<()> {
        match self {
            Self::Internal(b) => b.apply_force(name, force),
            Self::Null(b) => b.apply_force(name, force),
        }
    }

    fn set_joint_targets(&mut self, agent: &str, targets: &[f64]) -> strider_types::Result<()> {
        match self {
            Self::Internal(b) => b.set_joint_targets(agent, targets),
            Self::Null(b) => b.set_joint_targets(agent, targets),
        }
    }

    fn joint_states(&self, agent: &str) -> Option<Vec<(f64, f64)>> {
        match self {
            Self::Internal(b) => b.joint_states(agent),
            Self::Null(b) => b.joint_states(agent),
        }
    }

    fn vectorized_data(&self) -> HashMap<String, DVector<f64>> {
        match self {
            Self::Internal(b) => b.vectorized_data(),
            Self::Null(b) => b.vectorized_data(),
        }
    }
}

/// Static dispatch over the supported rendering adapters.
#[derive(Debug)]
pub enum RenderAdapter {
    /// Windowless renderer.
    Headless(HeadlessRender),
    /// No-op renderer.
    Null(NullRender),
}

impl RenderAdapter {
    /// Access the headless renderer, if that is the selected kind.
    ///
    /// Used by driving code (and tests) to feed input events.
    #[must_use]
    pub fn as_headless_mut(&mut self) -> Option<&mut HeadlessRender> {
        match self {
            Self::Headless(b) => Some(b),
            Self::Null(_) => None,
        }
    }
}

impl RenderBackend for RenderAdapter {
    fn backend_id(&self) -> &'static str {
        match self {
            Self::Headless(b) => b.backend_id(),
            Self::Null(b) => b.backend_id(),
        }
    }

    fn load_scenario(&mut self, scenario: &Scenario) -> strider_types::Result<()> {
        match self {
            Self::Headless(b) => b.load_scenario(scenario),
            Self::Null(b) => b.load_scenario(scenario),
        }
    }

    fn render_frame(&mut self) -> strider_types::Result<()> {
        match self {
            Self::Headless(b) => b.render_frame(),
            Self::Null(b) => b.render_frame(),
        }
    }

    fn poll_key_state(&self) -> KeyState {
        match self {
            Self::Headless(b) => b.poll_key_state(),
            Self::Null(b) => b.poll_key_state(),
        }
    }

    fn frame_count(&self) -> u64 {
        match self {
            Self::Headless(b) => b.frame_count(),
            Self::Null(b) => b.frame_count(),
        }
    }
}
