//! Scene authoring for backend-agnostic simulation.
//!
//! This crate provides the authoring layer between user code and the
//! runtime orchestration in `strider-runtime`:
//!
//! - [`Compound`] - Articulated kinematic-tree builder
//! - [`SingleBody`] - Standalone rigid bodies
//! - [`Agent`] - Controllable articulated entities with a fixed action space
//! - [`TerrainGenerator`] - Static terrain primitives and height fields
//! - [`SensorSpec`] - Sensor declarations bound to agents
//! - [`Scenario`] - The registry container handed to a runtime
//!
//! # Design Philosophy
//!
//! Scenes are **built bottom-up and frozen on hand-off**. Leaf value types
//! (`strider-types`) compose into bodies and compounds, those into a
//! [`Scenario`], and the scenario is shared immutably with whichever
//! physics/rendering backends the runtime selects. Topology errors are
//! caught at insertion time, never later.
//!
//! # Example
//!
//! ```
//! use strider_scene::{Scenario, SingleBody, TerrainGenerator};
//! use strider_types::{BodyData, ShapeDescriptor, ShapeKind, Transform};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut terrain = TerrainGenerator::static_gen("ground");
//! terrain
//!     .create_primitive(
//!         ShapeKind::Box,
//!         Vector3::new(10.0, 10.0, 0.2),
//!         Point3::new(0.0, 0.0, -0.1),
//!         Vector3::zeros(),
//!         [0.2, 0.3, 0.4],
//!         Some("chessboard"),
//!     )
//!     .unwrap();
//!
//! let mut scenario = Scenario::new();
//! scenario.add_terrain_generator(terrain).unwrap();
//! scenario
//!     .add_single_body(SingleBody::new(
//!         "box_0",
//!         BodyData::dynamic()
//!             .with_shape(ShapeDescriptor::box_shape(Vector3::new(0.2, 0.2, 0.2))),
//!         Transform::from_position(Point3::new(0.0, 0.0, 3.0)),
//!     ))
//!     .unwrap();
//! ```

#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::cast_precision_loss
)]

mod agent;
mod compound;
mod registry;
mod scenario;
mod sensor;
mod single_body;
mod terrain;

pub use agent::Agent;
pub use compound::Compound;
pub use registry::NamedRegistry;
pub use scenario::Scenario;
pub use sensor::{SensorKind, SensorSpec};
pub use single_body::SingleBody;
pub use terrain::{TerrainGenerator, TerrainPrimitive};
