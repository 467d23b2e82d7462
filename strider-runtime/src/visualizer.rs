//! Visualizer lifecycle.
//!
//! A [`Visualizer`] owns one rendering adapter and the render-side state:
//! camera and light registries plus the key snapshots used for
//! edge-triggered input. Key edges are computed once per `render` by
//! diffing the previous frame's snapshot against the current one, then
//! latched until queried — holding a key across many frames reports
//! exactly one press.

use std::sync::Arc;

use nalgebra::Point3;
use strider_scene::{NamedRegistry, Scenario};
use strider_types::SceneError;
use tracing::debug;

use crate::backend::{RenderAdapter, RenderBackend};
use crate::render::{KeyState, KEY_COUNT};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lifecycle state of a [`Visualizer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum VisualizerState {
    /// Created but not yet bound to the render backend.
    Uninitialized,
    /// Rendering frames and polling input.
    Active,
    /// Closed; render calls are no-ops again.
    Closed,
}

/// Kind of camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CameraKind {
    /// Orbits a target point.
    Orbit,
    /// Free-flying first-person camera.
    FirstPerson,
    /// Fixed pose.
    Fixed,
}

/// Kind of light source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LightKind {
    /// Parallel rays from a direction.
    Directional,
    /// Point source.
    Point,
    /// Cone-restricted point source.
    Spot,
}

/// A named camera.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Camera {
    /// Camera name, unique per visualizer.
    pub name: String,
    /// Camera kind.
    pub kind: CameraKind,
    /// Eye position.
    pub position: Point3<f64>,
    /// Look-at target.
    pub target: Point3<f64>,
}

/// A named light.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Light {
    /// Light name, unique per visualizer.
    pub name: String,
    /// Light kind.
    pub kind: LightKind,
    /// Ambient color (RGB, 0..1).
    pub ambient: [f64; 3],
    /// Diffuse color (RGB, 0..1).
    pub diffuse: [f64; 3],
    /// Specular color (RGB, 0..1).
    pub specular: [f64; 3],
}

/// Drives a rendering backend over one scenario.
pub struct Visualizer {
    scenario: Arc<Scenario>,
    adapter: RenderAdapter,
    state: VisualizerState,
    prev_keys: KeyState,
    curr_keys: KeyState,
    edges: Vec<bool>,
    cameras: NamedRegistry<Camera>,
    lights: NamedRegistry<Light>,
}

impl Visualizer {
    pub(crate) fn new(scenario: Arc<Scenario>, adapter: RenderAdapter) -> Self {
        Self {
            scenario,
            adapter,
            state: VisualizerState::Uninitialized,
            prev_keys: KeyState::new(),
            curr_keys: KeyState::new(),
            edges: vec![false; KEY_COUNT],
            cameras: NamedRegistry::new(),
            lights: NamedRegistry::new(),
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> VisualizerState {
        self.state
    }

    /// The scenario this visualizer is bound to.
    #[must_use]
    pub fn scenario(&self) -> &Arc<Scenario> {
        &self.scenario
    }

    /// Identifier of the rendering backend.
    #[must_use]
    pub fn backend_id(&self) -> &'static str {
        self.adapter.backend_id()
    }

    /// Whether the visualizer is active (initialized and not closed).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == VisualizerState::Active
    }

    /// Mutable access to the rendering adapter.
    ///
    /// Driving code uses this to feed input events into the headless
    /// backend.
    #[must_use]
    pub fn backend_mut(&mut self) -> &mut RenderAdapter {
        &mut self.adapter
    }

    /// Ingest the scenario into the render backend and become active.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::AlreadyBound`] unless `Uninitialized`, or
    /// [`SceneError::BackendRejected`] from the backend.
    pub fn initialize(&mut self) -> strider_types::Result<()> {
        if self.state != VisualizerState::Uninitialized {
            return Err(SceneError::already_bound("visualizer"));
        }
        self.adapter.load_scenario(&self.scenario)?;
        self.state = VisualizerState::Active;
        debug!(backend = self.adapter.backend_id(), "visualizer initialized");
        Ok(())
    }

    /// Render one frame and refresh the key snapshots.
    ///
    /// A silent no-op unless the visualizer is active. Each call replaces
    /// the per-frame key edges: a key that went down since the previous
    /// frame produces exactly one edge, regardless of how long it stays
    /// held.
    ///
    /// # Errors
    ///
    /// Propagates backend render failures.
    pub fn render(&mut self) -> strider_types::Result<()> {
        if self.state != VisualizerState::Active {
            return Ok(());
        }
        self.adapter.render_frame()?;

        let next = self.adapter.poll_key_state();
        self.prev_keys = std::mem::replace(&mut self.curr_keys, next);
        for code in 0..KEY_COUNT {
            self.edges[code] = self.curr_keys.is_down(code) && !self.prev_keys.is_down(code);
        }
        Ok(())
    }

    /// Close the visualizer; subsequent renders are no-ops.
    pub fn close(&mut self) {
        if self.state == VisualizerState::Active {
            self.state = VisualizerState::Closed;
            debug!("visualizer closed");
        }
    }

    /// Level-triggered key query: whether the key is down in the current
    /// frame snapshot.
    #[must_use]
    pub fn is_key_down(&self, code: usize) -> bool {
        self.curr_keys.is_down(code)
    }

    /// Edge-triggered key query: `true` exactly once per physical press.
    ///
    /// The edge is computed at `render` time and consumed by this call.
    #[must_use]
    pub fn check_single_key_press(&mut self, code: usize) -> bool {
        match self.edges.get_mut(code) {
            Some(edge) => std::mem::take(edge),
            None => false,
        }
    }

    /// Register a camera.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateName`] if the name is taken.
    pub fn create_camera(
        &mut self,
        name: impl Into<String>,
        kind: CameraKind,
        position: Point3<f64>,
        target: Point3<f64>,
    ) -> strider_types::Result<()> {
        let name = name.into();
        self.cameras.insert(
            name.clone(),
            Camera {
                name,
                kind,
                position,
                target,
            },
        )
    }

    /// Register a light.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::DuplicateName`] if the name is taken.
    pub fn create_light(
        &mut self,
        name: impl Into<String>,
        kind: LightKind,
        ambient: [f64; 3],
        diffuse: [f64; 3],
        specular: [f64; 3],
    ) -> strider_types::Result<()> {
        let name = name.into();
        self.lights.insert(
            name.clone(),
            Light {
                name,
                kind,
                ambient,
                diffuse,
                specular,
            },
        )
    }

    /// Look up a camera by name.
    #[must_use]
    pub fn camera_by_name(&self, name: &str) -> Option<&Camera> {
        self.cameras.get(name)
    }

    /// Look up a light by name.
    #[must_use]
    pub fn light_by_name(&self, name: &str) -> Option<&Light> {
        self.lights.get(name)
    }

    /// Whether a camera with the given name exists.
    #[must_use]
    pub fn has_camera_named(&self, name: &str) -> bool {
        self.cameras.contains(name)
    }

    /// Whether a light with the given name exists.
    #[must_use]
    pub fn has_light_named(&self, name: &str) -> bool {
        self.lights.contains(name)
    }

    /// Iterate cameras in registration order.
    pub fn cameras(&self) -> impl Iterator<Item = &Camera> {
        self.cameras.iter()
    }

    /// Iterate lights in registration order.
    pub fn lights(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter()
    }

    /// Frames rendered since initialization.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.adapter.frame_count()
    }
}

impl std::fmt::Debug for Visualizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Visualizer")
            .field("backend", &self.adapter.backend_id())
            .field("state", &self.state)
            .field("frames", &self.adapter.frame_count())
            .finish_non_exhaustive()
    }
}
