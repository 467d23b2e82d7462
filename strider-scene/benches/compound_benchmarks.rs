//! Benchmarks for kinematic-tree transform resolution.
//!
//! Run with: cargo bench -p strider-scene

#![allow(missing_docs, clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nalgebra::{Point3, Vector3};
use strider_scene::Compound;
use strider_types::{BodyData, BodyNodeId, DynamicsType, JointSpec, ShapeDescriptor, Transform};

fn build_chain(depth: usize) -> Compound {
    let mut compound = Compound::new(
        "chain",
        Transform::from_position(Point3::new(0.0, 0.0, 1.0)),
        DynamicsType::Dynamic,
    );
    let data =
        BodyData::dynamic().with_shape(ShapeDescriptor::capsule(0.05, 0.3));

    let mut parent = compound
        .create_root_body("link_0", data.clone(), Transform::identity())
        .unwrap();
    for i in 1..depth {
        parent = compound
            .add_compound_body(
                format!("link_{i}"),
                data.clone(),
                JointSpec::revolute(Vector3::y()),
                parent,
                Transform::from_euler(Point3::new(0.3, 0.0, 0.0), 0.0, 0.05, 0.0),
            )
            .unwrap();
    }
    compound
}

fn bench_world_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_transform_of");
    for depth in [4usize, 16, 64] {
        let compound = build_chain(depth);
        let tip = BodyNodeId::new(depth - 1);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, _| {
            b.iter(|| black_box(compound.world_transform_of(black_box(tip)).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_world_transform);
criterion_main!(benches);
