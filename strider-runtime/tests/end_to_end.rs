//! End-to-end tests of the scene → runtime pipeline.
//!
//! These drive the full stack the way an example script would: author a
//! scenario, resolve backends through a runtime, and run the step/render
//! loop.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

use std::sync::Arc;

use approx::assert_relative_eq;
use nalgebra::{Point3, Vector3};
use strider_runtime::{keys, IntrinsicsSensor, Runtime, RuntimeOptions, SimulationState};
use strider_scene::{Agent, Compound, Scenario, SensorSpec, SingleBody, TerrainGenerator};
use strider_types::{
    BodyData, DynamicsType, JointSpec, SceneError, ShapeDescriptor, ShapeKind,
    SimulationSettings, Transform,
};

const DT: f64 = 1.0 / 60.0;

fn dynamic_box(name: &str, position: Point3<f64>) -> SingleBody {
    SingleBody::new(
        name,
        BodyData::dynamic().with_shape(ShapeDescriptor::box_shape(Vector3::new(0.2, 0.2, 0.2))),
        Transform::from_position(position),
    )
}

/// Static plane terrain plus five dynamic boxes at distinct names.
fn boxes_on_plane() -> Arc<Scenario> {
    let mut terrain = TerrainGenerator::static_gen("ground");
    terrain
        .create_primitive(
            ShapeKind::Box,
            Vector3::new(10.0, 10.0, 0.2),
            Point3::new(0.0, 0.0, -0.1),
            Vector3::zeros(),
            [0.2, 0.3, 0.4],
            Some("chessboard"),
        )
        .unwrap();

    let mut scenario = Scenario::new();
    scenario.add_terrain_generator(terrain).unwrap();
    for i in 0..5 {
        let position = Point3::new(0.5 * f64::from(i), 0.0, 2.0 + 0.5 * f64::from(i));
        scenario
            .add_single_body(dynamic_box(&format!("box_{i}"), position))
            .unwrap();
    }
    Arc::new(scenario)
}

#[test]
fn boxes_fall_while_plane_stays_put() {
    let scenario = boxes_on_plane();
    let mut runtime = Runtime::new("internal", "null", RuntimeOptions::default()).unwrap();
    let sim = runtime.create_simulation(Arc::clone(&scenario)).unwrap();
    sim.initialize().unwrap();

    let initial: Vec<f64> = (0..5)
        .map(|i| sim.body_pose(&format!("box_{i}")).unwrap().position.z)
        .collect();
    let plane_before = sim.body_pose("ground/primitive_0").unwrap();

    sim.step(DT).unwrap();

    for (i, z0) in initial.iter().enumerate() {
        let z = sim.body_pose(&format!("box_{i}")).unwrap().position.z;
        assert!(z < *z0, "box_{i} did not fall: {z} >= {z0}");
    }
    let plane_after = sim.body_pose("ground/primitive_0").unwrap();
    assert_relative_eq!(
        plane_after.position,
        plane_before.position,
        epsilon = 1e-15
    );
    assert_relative_eq!(
        plane_after.rotation_matrix(),
        plane_before.rotation_matrix(),
        epsilon = 1e-15
    );
}

#[test]
fn reset_restores_initialize_time_state() {
    let scenario = boxes_on_plane();
    let mut runtime = Runtime::new("internal", "null", RuntimeOptions::default()).unwrap();
    let sim = runtime.create_simulation(scenario).unwrap();
    sim.initialize().unwrap();

    let poses_at_init: Vec<_> = (0..5)
        .map(|i| sim.body_pose(&format!("box_{i}")).unwrap())
        .collect();

    for _ in 0..113 {
        sim.step(DT).unwrap();
    }
    sim.reset().unwrap();
    assert_eq!(sim.state(), SimulationState::Initialized);
    assert_eq!(sim.time(), 0.0);

    for (i, expected) in poses_at_init.iter().enumerate() {
        let name = format!("box_{i}");
        let pose = sim.body_pose(&name).unwrap();
        assert_relative_eq!(pose.position, expected.position, epsilon = 1e-12);
        assert_relative_eq!(
            sim.body_velocity(&name).unwrap(),
            Vector3::zeros(),
            epsilon = 1e-12
        );
    }
}

#[test]
fn vectorized_data_reflects_latest_step_only() {
    let scenario = boxes_on_plane();
    let mut runtime = Runtime::new("internal", "null", RuntimeOptions::default()).unwrap();
    let sim = runtime.create_simulation(scenario).unwrap();
    sim.initialize().unwrap();

    let before = sim.vectorized_data().unwrap();
    sim.step(DT).unwrap();
    let after = sim.vectorized_data().unwrap();

    // Same shapes, different contents; five dynamic boxes, 7 qpos each.
    assert_eq!(before["qpos"].len(), 35);
    assert_eq!(after["qpos"].len(), 35);
    assert_ne!(before["qpos"], after["qpos"]);
    assert_eq!(after["qvel"].len(), 15);
    assert_eq!(after["forces_ext"].len(), 15);
}

#[test]
fn pause_resume_cycle_through_interactive_keys() {
    let scenario = boxes_on_plane();
    let mut runtime = Runtime::new("internal", "headless", RuntimeOptions::default()).unwrap();
    runtime.create_simulation(Arc::clone(&scenario)).unwrap();
    runtime.create_visualizer(Arc::clone(&scenario)).unwrap();

    let (sim, viz) = runtime.split_mut();
    let sim = sim.unwrap();
    let viz = viz.unwrap();
    sim.initialize().unwrap();
    viz.initialize().unwrap();

    sim.step(DT).unwrap();
    let t_running = sim.time();

    // Press P once, hold it for a few frames: exactly one toggle.
    viz.backend_mut().as_headless_mut().unwrap().press_key(keys::KEY_P);
    let mut toggles = 0;
    for _ in 0..4 {
        viz.render().unwrap();
        if viz.check_single_key_press(keys::KEY_P) {
            toggles += 1;
            sim.pause();
        }
        sim.step(DT).unwrap();
    }
    assert_eq!(toggles, 1);
    assert_eq!(sim.state(), SimulationState::Paused);
    assert_relative_eq!(sim.time(), t_running, epsilon = 1e-15);

    sim.resume();
    sim.step(DT).unwrap();
    assert!(sim.time() > t_running);
}

#[test]
fn simulation_and_visualizer_agree_on_entities() {
    let scenario = boxes_on_plane();
    let mut runtime = Runtime::new("internal", "headless", RuntimeOptions::default()).unwrap();
    runtime.create_simulation(Arc::clone(&scenario)).unwrap();
    runtime.create_visualizer(Arc::clone(&scenario)).unwrap();

    let (sim, viz) = runtime.split_mut();
    let sim = sim.unwrap();
    let viz = viz.unwrap();
    sim.initialize().unwrap();
    viz.initialize().unwrap();

    // Every entity the renderer mirrors resolves in the simulation.
    let mirrored: Vec<String> = match viz.backend_mut() {
        strider_runtime::RenderAdapter::Headless(h) => h.entities().to_vec(),
        strider_runtime::RenderAdapter::Null(_) => unreachable!(),
    };
    assert_eq!(mirrored.len(), 6);
    for name in mirrored {
        assert!(sim.body_pose(&name).is_ok(), "missing body {name}");
    }
}

#[test]
fn articulated_agent_with_sensor_full_loop() {
    // Two-link walker with an intrinsics sensor, driven by actions.
    let mut compound = Compound::new("rig", Transform::identity(), DynamicsType::Dynamic);
    let torso = compound
        .create_root_body(
            "torso",
            BodyData::dynamic().with_shape(ShapeDescriptor::capsule(0.05, 0.4)),
            Transform::identity(),
        )
        .unwrap();
    compound
        .add_compound_body(
            "leg",
            BodyData::dynamic().with_shape(ShapeDescriptor::capsule(0.04, 0.4)),
            JointSpec::revolute(Vector3::y()),
            torso,
            Transform::from_position(Point3::new(0.0, 0.0, -0.4)),
        )
        .unwrap();

    let mut scenario = Scenario::new();
    scenario
        .add_agent(Agent::new("walker_0", Point3::new(0.0, 0.0, 1.2), compound))
        .unwrap();
    scenario
        .add_sensor(SensorSpec::intrinsics("sensor_0", "walker_0"))
        .unwrap();
    let scenario = Arc::new(scenario);

    let mut runtime = Runtime::new(
        "internal",
        "null",
        RuntimeOptions::with_settings(SimulationSettings::realtime()),
    )
    .unwrap();
    let sim = runtime.create_simulation(Arc::clone(&scenario)).unwrap();
    sim.initialize().unwrap();

    let spec = scenario.sensor("sensor_0").unwrap().clone();
    let sensor = IntrinsicsSensor::bind(&spec, sim).unwrap();

    // Action length must match the fixed action dimension.
    let err = sim.set_actions("walker_0", &[0.5, 0.5]).unwrap_err();
    assert!(matches!(err, SceneError::ActionSizeMismatch { .. }));

    sim.set_actions("walker_0", &[0.5]).unwrap();
    sim.step(DT).unwrap();

    let m = sensor.measure(sim).unwrap();
    // The commanded joint moved at 0.5 rad/s for one step.
    assert_relative_eq!(m.joints_vel[0], 0.5, epsilon = 1e-12);
    assert_relative_eq!(m.joints_pos[0], 0.5 * DT, epsilon = 1e-12);
    // Both bodies report gravity as their current acceleration.
    assert_relative_eq!(m.bodies_lin_acc[2], -9.81, epsilon = 1e-12);
}

#[test]
fn null_backend_session_matches_original_null_semantics() {
    let scenario = boxes_on_plane();
    let mut runtime = Runtime::new("null", "null", RuntimeOptions::default()).unwrap();
    runtime.create_simulation(Arc::clone(&scenario)).unwrap();
    runtime.create_visualizer(Arc::clone(&scenario)).unwrap();

    let (sim, viz) = runtime.split_mut();
    let sim = sim.unwrap();
    let viz = viz.unwrap();
    assert_eq!(viz.backend_id(), "null");
    assert_eq!(sim.backend_id(), "null");

    sim.initialize().unwrap();
    sim.step(DT).unwrap();
    sim.reset().unwrap();
    sim.pause();
    sim.resume();

    viz.initialize().unwrap();
    viz.create_camera(
        "cam_orbit_0",
        strider_runtime::CameraKind::Orbit,
        Point3::new(3.0, 3.0, 3.0),
        Point3::origin(),
    )
    .unwrap();
    viz.create_light(
        "light_point_0",
        strider_runtime::LightKind::Point,
        [0.4, 0.4, 0.4],
        [0.8, 0.8, 0.8],
        [0.8, 0.8, 0.8],
    )
    .unwrap();
    viz.render().unwrap();

    assert!(viz.has_camera_named("cam_orbit_0"));
    assert!(viz.has_light_named("light_point_0"));
    assert_relative_eq!(
        viz.camera_by_name("cam_orbit_0").unwrap().position,
        Point3::new(3.0, 3.0, 3.0),
        epsilon = 1e-15
    );

    runtime.destroy_simulation();
    runtime.destroy_visualizer();
    // Destroy is idempotent.
    runtime.destroy_simulation();
    runtime.destroy_visualizer();
}

#[test]
fn duplicate_names_leave_first_entry_intact() {
    let mut scenario = Scenario::new();
    scenario
        .add_single_body(dynamic_box("box_0", Point3::new(0.0, 0.0, 3.0)))
        .unwrap();
    let err = scenario
        .add_single_body(dynamic_box("box_0", Point3::new(9.0, 9.0, 9.0)))
        .unwrap_err();
    assert!(err.is_duplicate_name());
    assert_relative_eq!(
        scenario.single_body("box_0").unwrap().transform().position.z,
        3.0,
        epsilon = 1e-15
    );
}

#[test]
fn unsupported_backend_reports_name() {
    let err = Runtime::new("mujoco", "null", RuntimeOptions::default()).unwrap_err();
    match err {
        SceneError::UnsupportedBackend { name } => assert_eq!(name, "mujoco"),
        other => panic!("unexpected error {other:?}"),
    }
}
