//! Drop a handful of primitive bodies onto a plane and watch the numbers.
//!
//! Run with: cargo run -p strider-runtime --example falling_primitives

use std::sync::Arc;

use nalgebra::{Point3, Vector3};
use strider_runtime::{keys, Runtime, RuntimeOptions};
use strider_scene::{Scenario, SingleBody, TerrainGenerator};
use strider_types::{BodyData, ShapeDescriptor, ShapeKind, SimulationSettings, Transform};

fn single_body(name: &str, shape: ShapeDescriptor, position: Point3<f64>) -> SingleBody {
    SingleBody::new(
        name,
        BodyData::dynamic().with_shape(shape),
        Transform::from_position(position),
    )
}

fn main() -> strider_types::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut terrain = TerrainGenerator::static_gen("terrain_0");
    terrain.create_primitive(
        ShapeKind::Box,
        Vector3::new(10.0, 10.0, 0.2),
        Point3::new(0.0, 0.0, -0.1),
        Vector3::zeros(),
        [0.2, 0.3, 0.4],
        Some("chessboard"),
    )?;

    let mut scenario = Scenario::new();
    scenario.add_terrain_generator(terrain)?;
    for i in 0..5 {
        let x = -2.0 + f64::from(i);
        scenario.add_single_body(single_body(
            &format!("box_{i}"),
            ShapeDescriptor::box_shape(Vector3::new(0.2, 0.2, 0.2)),
            Point3::new(x, 0.0, 3.0),
        ))?;
        scenario.add_single_body(single_body(
            &format!("sphere_{i}"),
            ShapeDescriptor::sphere(0.1),
            Point3::new(x, 1.0, 3.0),
        ))?;
        scenario.add_single_body(single_body(
            &format!("capsule_{i}"),
            ShapeDescriptor::capsule(0.1, 0.2),
            Point3::new(x, 2.0, 3.0),
        ))?;
    }
    let scenario = Arc::new(scenario);

    let mut runtime = Runtime::new(
        "internal",
        "headless",
        RuntimeOptions::with_settings(SimulationSettings::realtime()),
    )?;
    runtime.create_simulation(Arc::clone(&scenario))?;
    runtime.create_visualizer(Arc::clone(&scenario))?;

    let (sim, viz) = runtime.split_mut();
    let (sim, viz) = (sim.ok_or_else(no_sim)?, viz.ok_or_else(no_sim)?);
    sim.initialize()?;
    viz.initialize()?;

    let dt = 1.0 / 60.0;
    let mut running = true;
    for frame in 0..600u32 {
        if viz.check_single_key_press(keys::KEY_P) {
            running = !running;
        }
        if viz.check_single_key_press(keys::KEY_R) {
            sim.reset()?;
        }

        if running {
            sim.step(dt)?;
        }
        viz.render()?;

        if frame % 60 == 0 {
            let pose = sim.body_pose("box_0")?;
            println!("t = {:5.2}s  box_0.z = {:6.3}", sim.time(), pose.position.z);
        }
    }

    Ok(())
}

fn no_sim() -> strider_types::SceneError {
    strider_types::SceneError::not_ready("example loop")
}
