//! Runtime orchestration for backend-agnostic simulation.
//!
//! This crate turns an authored [`Scenario`](strider_scene::Scenario) into
//! a running simulation/visualization session against whichever backends
//! are selected at runtime.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Runtime                               │
//! │  Resolves: physics + rendering backend kinds by name        │
//! │  Owns: at most one Simulation and one Visualizer            │
//! └───────────────┬─────────────────────────────┬───────────────┘
//!                 │                             │
//!                 ▼                             ▼
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │        Simulation          │   │        Visualizer          │
//! │  initialize / step / reset │   │  initialize / render       │
//! │  pause / resume            │   │  key edges, cameras, lights│
//! └───────────────┬───────────┘   └───────────────┬───────────┘
//!                 │                               │
//!                 ▼                               ▼
//! ┌───────────────────────────┐   ┌───────────────────────────┐
//! │      PhysicsBackend        │   │      RenderBackend         │
//! │  internal | null           │   │  headless | null           │
//! └───────────────────────────┘   └───────────────────────────┘
//! ```
//!
//! Both sides bind the same `Arc<Scenario>`, so the same names resolve to
//! the same logical entity in physics and rendering.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use strider_runtime::{Runtime, RuntimeOptions};
//! use strider_scene::{Scenario, SingleBody};
//! use strider_types::{BodyData, ShapeDescriptor, Transform};
//! use nalgebra::{Point3, Vector3};
//!
//! // Author a scenario: one falling box.
//! let mut scenario = Scenario::new();
//! scenario
//!     .add_single_body(SingleBody::new(
//!         "box_0",
//!         BodyData::dynamic()
//!             .with_shape(ShapeDescriptor::box_shape(Vector3::new(0.2, 0.2, 0.2))),
//!         Transform::from_position(Point3::new(0.0, 0.0, 3.0)),
//!     ))
//!     .unwrap();
//! let scenario = Arc::new(scenario);
//!
//! // Select backends by name and drive the loop.
//! let mut runtime = Runtime::new("internal", "headless", RuntimeOptions::default()).unwrap();
//! runtime.create_simulation(Arc::clone(&scenario)).unwrap();
//! runtime.create_visualizer(Arc::clone(&scenario)).unwrap();
//!
//! let (sim, viz) = runtime.split_mut();
//! let sim = sim.unwrap();
//! let viz = viz.unwrap();
//! sim.initialize().unwrap();
//! viz.initialize().unwrap();
//!
//! for _ in 0..60 {
//!     sim.step(1.0 / 60.0).unwrap();
//!     viz.render().unwrap();
//! }
//!
//! assert!(sim.body_pose("box_0").unwrap().position.z < 3.0);
//! ```
//!
//! # Concurrency Model
//!
//! Single-threaded and cooperative: the caller drives an explicit
//! step/render loop, every call is synchronous, and nothing here spawns a
//! thread. `&mut self` receivers encode the one-logical-caller rule.

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::cast_precision_loss
)]

mod backend;
mod flatten;
mod physics;
mod render;
mod runtime;
mod sensor;
mod simulation;
mod visualizer;

pub use backend::{
    PhysicsAdapter, PhysicsBackend, PhysicsBackendKind, RenderAdapter, RenderBackend,
    RenderBackendKind,
};
pub use flatten::{flat_body_name, flatten, FlatAgent, FlatBody, FlatJoint, FlatScene};
pub use physics::{InternalPhysics, NullPhysics};
pub use render::{keys, HeadlessRender, KeyState, NullRender, KEY_COUNT};
pub use runtime::{Runtime, RuntimeOptions};
pub use sensor::{IntrinsicsSensor, Measurement, MEASUREMENT_KEYS};
pub use simulation::{Simulation, SimulationState};
pub use visualizer::{Camera, CameraKind, Light, LightKind, Visualizer, VisualizerState};
