//! Assemble a door as an articulated compound: a fixed frame with a panel
//! swinging on a revolute hinge.
//!
//! Run with: cargo run -p strider-runtime --example compound_door

use std::sync::Arc;

use nalgebra::{Point3, Vector3};
use strider_runtime::{Runtime, RuntimeOptions};
use strider_scene::{Compound, Scenario, TerrainGenerator};
use strider_types::{
    BodyData, DynamicsType, JointLimits, JointSpec, Material, ShapeDescriptor, ShapeKind,
    Transform, VisualShape,
};

fn frame_part(extents: Vector3<f64>) -> BodyData {
    let shape = ShapeDescriptor::box_shape(extents);
    BodyData::fixed()
        .with_collision(shape.clone())
        .with_visual(VisualShape::new(shape, Material::from_color([0.4, 0.3, 0.2])))
}

fn create_door(name: &str, position: Point3<f64>) -> strider_types::Result<Compound> {
    let mut door = Compound::new(
        name,
        Transform::from_position(position),
        DynamicsType::Dynamic,
    );

    let post = door.create_root_body(
        "frame_post",
        frame_part(Vector3::new(0.2, 0.2, 2.0)),
        Transform::from_position(Point3::new(0.0, -0.5, 1.0)),
    )?;
    door.add_compound_body(
        "frame_top",
        frame_part(Vector3::new(0.2, 0.8, 0.2)),
        JointSpec::fixed(),
        post,
        Transform::from_position(Point3::new(0.0, 0.5, 0.9)),
    )?;

    let panel_shape = ShapeDescriptor::box_shape(Vector3::new(1.2, 0.1, 2.0));
    let panel = BodyData::dynamic()
        .with_collision(panel_shape.clone())
        .with_visual(VisualShape::new(
            panel_shape,
            Material::from_color([0.4, 0.3, 0.5]),
        ));
    door.add_compound_body(
        "panel",
        panel,
        JointSpec::revolute(Vector3::z())
            .with_limits(JointLimits::symmetric(0.5 * std::f64::consts::PI))
            .with_local_transform(Transform::from_position(Point3::new(-0.6, -0.05, 0.0))),
        post,
        Transform::from_position(Point3::new(0.7, -0.15, 0.0)),
    )?;

    Ok(door)
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

    let door = create_door("door_0", Point3::new(0.0, 0.0, 1.0))?;
    for node in door.nodes() {
        let world = door.world_transform_of(node.id)?;
        println!("{:12} at {:?}", node.name, world.position);
    }

    let mut scenario = Scenario::new();
    scenario.add_terrain_generator(terrain)?;
    scenario.add_compound(door)?;
    let scenario = Arc::new(scenario);

    let mut runtime = Runtime::new("internal", "headless", RuntimeOptions::default())?;
    let sim = runtime.create_simulation(Arc::clone(&scenario))?;
    sim.initialize()?;

    for _ in 0..240 {
        sim.step(1.0 / 240.0)?;
    }
    let panel = sim.body_pose("door_0/panel")?;
    println!("door_0/panel after 1s: {:?}", panel.position);

    Ok(())
}
