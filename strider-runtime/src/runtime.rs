//! Runtime factory.
//!
//! A [`Runtime`] resolves one physics and one rendering backend by name,
//! then manufactures [`Simulation`] and [`Visualizer`] instances bound to
//! a shared scenario. It owns at most one live instance of each at a time
//! and releases backend resources on destroy.

use std::path::PathBuf;
use std::sync::Arc;

use strider_scene::Scenario;
use strider_types::{SceneError, SimulationSettings};
use tracing::debug;

use crate::backend::{PhysicsBackendKind, RenderBackendKind};
use crate::simulation::Simulation;
use crate::visualizer::Visualizer;

/// Options applied to everything a runtime creates.
#[derive(Debug, Clone, Default)]
pub struct RuntimeOptions {
    /// Simulation settings handed to every created simulation.
    pub settings: SimulationSettings,
    /// Directory backends resolve relative resource paths against.
    pub working_dir: Option<PathBuf>,
}

impl RuntimeOptions {
    /// Options with the given settings.
    #[must_use]
    pub fn with_settings(settings: SimulationSettings) -> Self {
        Self {
            settings,
            working_dir: None,
        }
    }

    /// Set the working directory.
    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

/// Factory for simulations and visualizers over a selected backend pair.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use strider_runtime::{Runtime, RuntimeOptions};
/// use strider_scene::Scenario;
///
/// let mut runtime = Runtime::new("null", "null", RuntimeOptions::default()).unwrap();
/// let scenario = Arc::new(Scenario::new());
///
/// let sim = runtime.create_simulation(Arc::clone(&scenario)).unwrap();
/// sim.initialize().unwrap();
///
/// runtime.destroy_simulation();
/// ```
#[derive(Debug)]
pub struct Runtime {
    physics_kind: PhysicsBackendKind,
    render_kind: RenderBackendKind,
    options: RuntimeOptions,
    simulation: Option<Simulation>,
    visualizer: Option<Visualizer>,
}

impl Runtime {
    /// Create a runtime over the named backends.
    ///
    /// Both names are resolved before anything is constructed, so an
    /// unknown name cannot leave a partially-built runtime behind.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnsupportedBackend`] for an unknown backend
    /// name, or [`SceneError::InvalidConfig`] for invalid settings.
    pub fn new(
        physics: &str,
        rendering: &str,
        options: RuntimeOptions,
    ) -> strider_types::Result<Self> {
        let physics_kind = PhysicsBackendKind::from_name(physics)?;
        let render_kind = RenderBackendKind::from_name(rendering)?;
        options.settings.validate()?;
        debug!(
            physics = physics_kind.name(),
            rendering = render_kind.name(),
            "runtime created"
        );
        Ok(Self {
            physics_kind,
            render_kind,
            options,
            simulation: None,
            visualizer: None,
        })
    }

    /// Selected physics backend kind.
    #[must_use]
    pub fn physics_kind(&self) -> PhysicsBackendKind {
        self.physics_kind
    }

    /// Selected rendering backend kind.
    #[must_use]
    pub fn render_kind(&self) -> RenderBackendKind {
        self.render_kind
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &RuntimeOptions {
        &self.options
    }

    /// Create the simulation for a scenario.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::AlreadyBound`] if a live simulation exists;
    /// destroy it first.
    pub fn create_simulation(
        &mut self,
        scenario: Arc<Scenario>,
    ) -> strider_types::Result<&mut Simulation> {
        if self.simulation.is_some() {
            return Err(SceneError::already_bound("simulation"));
        }
        let adapter = self.physics_kind.create(self.options.settings.clone());
        let simulation = Simulation::new(scenario, adapter, self.options.settings.clone());
        Ok(self.simulation.insert(simulation))
    }

    /// Create the visualizer for a scenario.
    ///
    /// Bind the same `Arc<Scenario>` handed to `create_simulation` so both
    /// sides agree on entity identity.
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::AlreadyBound`] if a live visualizer exists;
    /// destroy it first.
    pub fn create_visualizer(
        &mut self,
        scenario: Arc<Scenario>,
    ) -> strider_types::Result<&mut Visualizer> {
        if self.visualizer.is_some() {
            return Err(SceneError::already_bound("visualizer"));
        }
        let adapter = self.render_kind.create();
        let visualizer = Visualizer::new(scenario, adapter);
        Ok(self.visualizer.insert(visualizer))
    }

    /// Destroy the live simulation, releasing backend resources.
    ///
    /// Safe to call when none exists.
    pub fn destroy_simulation(&mut self) {
        if self.simulation.take().is_some() {
            debug!("simulation destroyed");
        }
    }

    /// Destroy the live visualizer, releasing backend resources.
    ///
    /// Safe to call when none exists.
    pub fn destroy_visualizer(&mut self) {
        if self.visualizer.take().is_some() {
            debug!("visualizer destroyed");
        }
    }

    /// The live simulation, if any.
    #[must_use]
    pub fn simulation(&self) -> Option<&Simulation> {
        self.simulation.as_ref()
    }

    /// The live simulation, mutably.
    #[must_use]
    pub fn simulation_mut(&mut self) -> Option<&mut Simulation> {
        self.simulation.as_mut()
    }

    /// The live visualizer, if any.
    #[must_use]
    pub fn visualizer(&self) -> Option<&Visualizer> {
        self.visualizer.as_ref()
    }

    /// The live visualizer, mutably.
    #[must_use]
    pub fn visualizer_mut(&mut self) -> Option<&mut Visualizer> {
        self.visualizer.as_mut()
    }

    /// Borrow simulation and visualizer simultaneously for a step/render
    /// loop.
    #[must_use]
    pub fn split_mut(&mut self) -> (Option<&mut Simulation>, Option<&mut Visualizer>) {
        (self.simulation.as_mut(), self.visualizer.as_mut())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn empty_scenario() -> Arc<Scenario> {
        Arc::new(Scenario::new())
    }

    #[test]
    fn test_unknown_backend_fails_without_construction() {
        assert!(Runtime::new("warp-drive", "null", RuntimeOptions::default()).is_err());
        assert!(Runtime::new("internal", "warp-drive", RuntimeOptions::default()).is_err());
    }

    #[test]
    fn test_single_live_simulation() {
        let mut runtime = Runtime::new("internal", "null", RuntimeOptions::default()).unwrap();
        let scenario = empty_scenario();
        runtime.create_simulation(Arc::clone(&scenario)).unwrap();

        let err = runtime.create_simulation(Arc::clone(&scenario)).unwrap_err();
        assert!(err.is_already_bound());

        runtime.destroy_simulation();
        runtime.create_simulation(scenario).unwrap();
    }

    #[test]
    fn test_destroy_is_safe_when_never_created() {
        let mut runtime = Runtime::new("internal", "headless", RuntimeOptions::default()).unwrap();
        runtime.destroy_simulation();
        runtime.destroy_visualizer();
        assert!(runtime.simulation().is_none());
        assert!(runtime.visualizer().is_none());
    }

    #[test]
    fn test_same_scenario_shared() {
        let mut runtime = Runtime::new("internal", "headless", RuntimeOptions::default()).unwrap();
        let scenario = empty_scenario();
        runtime.create_simulation(Arc::clone(&scenario)).unwrap();
        runtime.create_visualizer(Arc::clone(&scenario)).unwrap();

        let (sim, viz) = runtime.split_mut();
        let sim = sim.unwrap();
        let viz = viz.unwrap();
        assert!(Arc::ptr_eq(sim.scenario(), viz.scenario()));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let options = RuntimeOptions::with_settings(
            strider_types::SimulationSettings::default().with_timestep(-1.0),
        );
        assert!(Runtime::new("internal", "null", options).is_err());
    }
}
