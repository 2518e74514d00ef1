//! Benchmarks for mesh-post pipelines.
//!
//! Run with: cargo bench -p mesh-post
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-post -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-post -- --baseline main

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use hashbrown::HashMap;
use mesh_post::{
    EdgeAdjacency, MeshBuffer, OutlineParams, ProximityVertexGrouper, SmoothingParams,
    extract_outlines, repair_normals, unweld_vertices,
};
use nalgebra::{Point3, Vector2, Vector3};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Create a unit cube mesh (12 triangles).
fn create_cube() -> MeshBuffer {
    let positions = [
        [-0.5, -0.5, -0.5],
        [0.5, -0.5, -0.5],
        [0.5, 0.5, -0.5],
        [-0.5, 0.5, -0.5],
        [-0.5, -0.5, 0.5],
        [0.5, -0.5, 0.5],
        [0.5, 0.5, 0.5],
        [-0.5, 0.5, 0.5],
    ]
    .iter()
    .map(|v| Point3::new(v[0], v[1], v[2]))
    .collect();

    let faces = [
        [0, 1, 2],
        [0, 2, 3], // front
        [4, 6, 5],
        [4, 7, 6], // back
        [0, 4, 5],
        [0, 5, 1], // bottom
        [2, 6, 7],
        [2, 7, 3], // top
        [0, 3, 7],
        [0, 7, 4], // left
        [1, 5, 6],
        [1, 6, 2], // right
    ];

    MeshBuffer::from_faces(positions, &faces)
}

/// Create an icosphere with the given subdivision level and spherical UVs.
fn create_sphere(subdivisions: u32) -> MeshBuffer {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0;
    let a = 1.0;
    let b = 1.0 / phi;

    let ico_verts = [
        [0.0, b, -a],
        [b, a, 0.0],
        [-b, a, 0.0],
        [0.0, b, a],
        [0.0, -b, a],
        [-a, 0.0, b],
        [0.0, -b, -a],
        [a, 0.0, -b],
        [a, 0.0, b],
        [-a, 0.0, -b],
        [b, -a, 0.0],
        [-b, -a, 0.0],
    ];

    let mut positions: Vec<Point3<f64>> = ico_verts
        .iter()
        .map(|v| Point3::from(Vector3::new(v[0], v[1], v[2]).normalize()))
        .collect();

    let mut faces: Vec<[u32; 3]> = vec![
        [0, 1, 2],
        [3, 2, 1],
        [3, 4, 5],
        [3, 8, 4],
        [0, 6, 7],
        [0, 9, 6],
        [4, 10, 11],
        [6, 11, 10],
        [2, 5, 9],
        [11, 9, 5],
        [1, 7, 8],
        [10, 8, 7],
        [3, 5, 2],
        [3, 1, 8],
        [0, 2, 9],
        [0, 7, 1],
        [6, 9, 11],
        [6, 10, 7],
        [4, 11, 5],
        [4, 8, 10],
    ];

    for _ in 0..subdivisions {
        faces = subdivide_sphere(&mut positions, &faces);
    }

    let uvs = positions
        .iter()
        .map(|p| {
            Vector2::new(
                0.5 + p.z.atan2(p.x) / std::f64::consts::TAU,
                0.5 + p.y.clamp(-1.0, 1.0).asin() / std::f64::consts::PI,
            )
        })
        .collect();

    MeshBuffer::from_faces(positions, &faces).with_uvs(uvs)
}

fn subdivide_sphere(positions: &mut Vec<Point3<f64>>, faces: &[[u32; 3]]) -> Vec<[u32; 3]> {
    let mut edge_midpoints: HashMap<(u32, u32), u32> = HashMap::new();

    let mut get_midpoint = |v1: u32, v2: u32, positions: &mut Vec<Point3<f64>>| -> u32 {
        let key = if v1 < v2 { (v1, v2) } else { (v2, v1) };

        if let Some(&idx) = edge_midpoints.get(&key) {
            return idx;
        }

        let mid = nalgebra::center(&positions[v1 as usize], &positions[v2 as usize]);
        let idx = positions.len() as u32;
        positions.push(Point3::from(mid.coords.normalize()));
        edge_midpoints.insert(key, idx);
        idx
    };

    let mut new_faces = Vec::with_capacity(faces.len() * 4);
    for &[a, b, c] in faces {
        let ab = get_midpoint(a, b, positions);
        let bc = get_midpoint(b, c, positions);
        let ca = get_midpoint(c, a, positions);

        new_faces.push([a, ab, ca]);
        new_faces.push([b, bc, ab]);
        new_faces.push([c, ca, bc]);
        new_faces.push([ab, bc, ca]);
    }
    new_faces
}

fn test_cases() -> Vec<(&'static str, MeshBuffer)> {
    vec![
        ("cube_12tri", create_cube()),
        ("sphere_80tri", create_sphere(1)),
        ("sphere_1280tri", create_sphere(3)),
        ("sphere_5120tri", create_sphere(4)),
    ]
}

// =============================================================================
// Outline Benchmarks
// =============================================================================

fn bench_adjacency(c: &mut Criterion) {
    let mut group = c.benchmark_group("Adjacency");

    for (name, mesh) in &test_cases() {
        let triangles = mesh.triangles();
        group.throughput(Throughput::Elements(mesh.face_count() as u64));

        group.bench_with_input(BenchmarkId::new("build", name), &triangles, |b, triangles| {
            b.iter(|| EdgeAdjacency::build(black_box(triangles)))
        });
    }

    group.finish();
}

fn bench_outline(c: &mut Criterion) {
    let mut group = c.benchmark_group("Outline");
    let params = OutlineParams::default().with_feature_angle(5.0);

    for (name, mesh) in &test_cases() {
        group.throughput(Throughput::Elements(mesh.face_count() as u64));

        group.bench_with_input(BenchmarkId::new("extract", name), mesh, |b, mesh| {
            b.iter(|| extract_outlines(std::slice::from_ref(black_box(mesh)), &params))
        });
    }

    group.finish();
}

// =============================================================================
// Normal Repair Benchmarks
// =============================================================================

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("Grouping");
    let grouper = ProximityVertexGrouper::default();

    for (name, mesh) in &test_cases() {
        let flat = unweld_vertices(mesh);
        group.throughput(Throughput::Elements(flat.vertex_count() as u64));

        group.bench_with_input(BenchmarkId::new("group", name), &flat, |b, flat| {
            b.iter(|| grouper.group(black_box(flat)))
        });
    }

    group.finish();
}

fn bench_repair(c: &mut Criterion) {
    let mut group = c.benchmark_group("NormalRepair");

    for (name, mesh) in &test_cases() {
        group.throughput(Throughput::Elements(mesh.face_count() as u64));

        group.bench_with_input(BenchmarkId::new("default", name), mesh, |b, mesh| {
            b.iter(|| repair_normals(black_box(mesh), &SmoothingParams::default()))
        });
        group.bench_with_input(BenchmarkId::new("soft", name), mesh, |b, mesh| {
            b.iter(|| repair_normals(black_box(mesh), &SmoothingParams::soft()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_adjacency, bench_outline, bench_grouping, bench_repair);
criterion_main!(benches);
