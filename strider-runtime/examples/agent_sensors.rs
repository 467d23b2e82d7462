//! Drive an articulated agent with a random-ish policy and print its
//! intrinsics sensor measurements.
//!
//! Run with: cargo run -p strider-runtime --example agent_sensors

use std::sync::Arc;

use nalgebra::{Point3, Vector3};
use strider_runtime::{IntrinsicsSensor, Runtime, RuntimeOptions};
use strider_scene::{Agent, Compound, Scenario, SensorSpec};
use strider_types::{
    BodyData, DynamicsType, JointLimits, JointSpec, ShapeDescriptor, SceneError,
    SimulationSettings, Transform,
};

fn limb(radius: f64, length: f64) -> BodyData {
    BodyData::dynamic().with_shape(ShapeDescriptor::capsule(radius, length))
}

fn build_hopper() -> strider_types::Result<Compound> {
    let mut hopper = Compound::new("hopper", Transform::identity(), DynamicsType::Dynamic);
    let torso = hopper.create_root_body("torso", limb(0.06, 0.4), Transform::identity())?;
    let thigh = hopper.add_compound_body(
        "thigh",
        limb(0.05, 0.45),
        JointSpec::revolute(Vector3::y()).with_limits(JointLimits::new(-0.5, 0.5)),
        torso,
        Transform::from_position(Point3::new(0.0, 0.0, -0.4)),
    )?;
    let shin = hopper.add_compound_body(
        "shin",
        limb(0.04, 0.5),
        JointSpec::revolute(Vector3::y()).with_limits(JointLimits::new(-1.2, 0.0)),
        thigh,
        Transform::from_position(Point3::new(0.0, 0.0, -0.45)),
    )?;
    hopper.add_compound_body(
        "foot",
        limb(0.04, 0.35),
        JointSpec::revolute(Vector3::y()).with_limits(JointLimits::symmetric(0.8)),
        shin,
        Transform::from_position(Point3::new(0.05, 0.0, -0.5)),
    )?;
    Ok(hopper)
}

fn main() -> strider_types::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let agent = Agent::new("hopper_0", Point3::new(0.0, 0.0, 1.5), build_hopper()?);
    let action_dim = agent.action_dim();
    println!("action dim: {action_dim}");

    let mut scenario = Scenario::new();
    scenario.add_agent(agent)?;
    scenario.add_sensor(SensorSpec::intrinsics("sensor_0", "hopper_0"))?;
    let scenario = Arc::new(scenario);

    let mut runtime = Runtime::new(
        "internal",
        "null",
        RuntimeOptions::with_settings(SimulationSettings::realtime()),
    )?;
    let sim = runtime
        .create_simulation(Arc::clone(&scenario))?;
    sim.initialize()?;

    let spec = scenario
        .sensor("sensor_0")
        .cloned()
        .ok_or_else(|| SceneError::not_ready("sensor lookup"))?;
    let sensor = IntrinsicsSensor::bind(&spec, sim)?;

    let dt = 1.0 / 60.0;
    for step in 0..300u32 {
        // Cheap deterministic excitation standing in for a policy.
        let phase = f64::from(step) * dt;
        let actions: Vec<f64> = (0..action_dim)
            .map(|i| (phase * 2.0 + f64::from(u32::try_from(i).unwrap_or(0))).sin())
            .collect();
        sim.set_actions("hopper_0", &actions)?;
        sim.step(dt)?;

        if step % 60 == 0 {
            let m = sensor.measure(sim)?;
            println!("t = {:5.2}s", sim.time());
            println!("  jointspos:    {:?}", m.joints_pos.as_slice());
            println!("  jointsvel:    {:?}", m.joints_vel.as_slice());
            println!("  bodiesrelpos: {:?}", m.bodies_rel_pos.as_slice());
        }
    }

    Ok(())
}
