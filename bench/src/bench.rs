use mesh2voxel::ilattice::glam::{Vec2, Vec3};
use mesh2voxel::{build_batch_mesh, probe_voxelize, voxelize, CubeTemplate, Triangle};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

const VOXEL_SIZE: f32 = 0.0625;

fn bench_sphere_voxelize(c: &mut Criterion) {
    let mut group = c.benchmark_group("bench_sphere_voxelize");
    let triangles = sphere_triangles(32, 16);

    // Do a single run first to report the output size in the benchmark id.
    let cells = voxelize(&triangles, VOXEL_SIZE, None).len();

    group.bench_with_input(
        BenchmarkId::from_parameter(format!("cells={cells}")),
        &(),
        |b, _| {
            b.iter(|| voxelize(&triangles, VOXEL_SIZE, None));
        },
    );
    group.finish();
}

fn bench_sphere_probe(c: &mut Criterion) {
    let mut group = c.benchmark_group("bench_sphere_probe");
    let triangles = sphere_triangles(32, 16);

    let cells = probe_voxelize(&triangles, VOXEL_SIZE, None).len();

    group.bench_with_input(
        BenchmarkId::from_parameter(format!("cells={cells}")),
        &(),
        |b, _| {
            b.iter(|| probe_voxelize(&triangles, VOXEL_SIZE, None));
        },
    );
    group.finish();
}

fn bench_sphere_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("bench_sphere_batch");
    let triangles = sphere_triangles(32, 16);
    let cubes = voxelize(&triangles, VOXEL_SIZE, None).cube_data(VOXEL_SIZE);
    let template = CubeTemplate::with_edge_length(VOXEL_SIZE);

    group.bench_with_input(
        BenchmarkId::from_parameter(format!("cubes={}", cubes.len())),
        &(),
        |b, _| {
            b.iter(|| build_batch_mesh(&cubes, &template));
        },
    );
    group.finish();
}

criterion_group!(
    benches,
    bench_sphere_voxelize,
    bench_sphere_probe,
    bench_sphere_batch
);
criterion_main!(benches);

/// UV-sphere of unit radius: `rings * segments * 2` triangles.
fn sphere_triangles(segments: u32, rings: u32) -> Vec<Triangle> {
    let point = |ring: u32, segment: u32| {
        let v = ring as f32 / rings as f32;
        let u = segment as f32 / segments as f32;
        let theta = v * std::f32::consts::PI;
        let phi = u * std::f32::consts::TAU;

        let p = Vec3::new(
            theta.sin() * phi.cos(),
            theta.cos(),
            theta.sin() * phi.sin(),
        );
        (p, Vec2::new(u, v))
    };

    let mut triangles = Vec::new();
    for ring in 0..rings {
        for segment in 0..segments {
            let (a, auv) = point(ring, segment);
            let (b, buv) = point(ring + 1, segment);
            let (c, cuv) = point(ring + 1, segment + 1);
            let (d, duv) = point(ring, segment + 1);

            triangles.push(Triangle::new([a, b, c], [auv, buv, cuv]));
            triangles.push(Triangle::new([a, c, d], [auv, cuv, duv]));
        }
    }
    triangles
}
