//! Per-triangle face normals.

use nalgebra::{Point3, Vector3};

use crate::MeshBuffer;

/// Unit normal of the triangle `(p0, p1, p2)` in winding order.
///
/// Computed as `normalize(cross(p1 - p0, p2 - p0))`. A zero-area triangle
/// yields the zero vector; callers treat that as "no contribution".
#[inline]
pub fn face_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
    (p1 - p0)
        .cross(&(p2 - p0))
        .try_normalize(0.0)
        .unwrap_or_else(Vector3::zeros)
}

/// Compute one normal per triangle of a flat index buffer.
///
/// The result has `triangles.len() / 3` entries.
///
/// # Panics
///
/// Panics if an index is out of range; validate the buffer first.
pub fn compute_face_normals(positions: &[Point3<f64>], triangles: &[u32]) -> Vec<Vector3<f64>> {
    triangles
        .chunks_exact(3)
        .map(|t| {
            face_normal(
                &positions[t[0] as usize],
                &positions[t[1] as usize],
                &positions[t[2] as usize],
            )
        })
        .collect()
}

/// Face normals of every sub-mesh, indexed `[sub_mesh][triangle]`.
pub fn compute_sub_mesh_face_normals(mesh: &MeshBuffer) -> Vec<Vec<Vector3<f64>>> {
    mesh.sub_meshes
        .iter()
        .map(|list| compute_face_normals(&mesh.positions, list))
        .collect()
}
