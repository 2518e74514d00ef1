//! Per-vertex tangent frames from UV derivatives.
//!
//! Each triangle contributes the directions in which its U and V texture
//! coordinates increase. The accumulated U direction is orthonormalized
//! against the vertex normal; the V direction only decides handedness.

use nalgebra::{Point3, Vector2, Vector3, Vector4};
use tracing::{debug, warn};

use crate::MeshBuffer;
use crate::error::GeometryIssue;
use crate::report::QualityReport;

/// Computes tangents for a mesh whose normals are already final.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TangentSpaceRecalculator;

impl TangentSpaceRecalculator {
    /// Create a recalculator.
    pub fn new() -> Self {
        Self
    }

    /// Compute one tangent per vertex.
    ///
    /// `xyz` is a unit vector perpendicular to the vertex normal and `w` is
    /// `1.0` or `-1.0` (bitangent handedness). A triangle whose UV
    /// determinant is zero contributes nothing and is recorded in `report`.
    /// Missing UVs or normals read as zero.
    pub fn recalculate(&self, mesh: &MeshBuffer, report: &mut QualityReport) -> Vec<Vector4<f64>> {
        let vertex_count = mesh.vertex_count();
        let mut s_dirs = vec![Vector3::<f64>::zeros(); vertex_count];
        let mut t_dirs = vec![Vector3::<f64>::zeros(); vertex_count];

        let uv = |i: usize| mesh.uvs.get(i).copied().unwrap_or_else(Vector2::zeros);
        let mut uv_degenerate = 0usize;

        for (face_index, [a, b, c]) in mesh.faces().enumerate() {
            let (a, b, c) = (a as usize, b as usize, c as usize);

            let Some((s_dir, t_dir)) = triangle_directions(
                [&mesh.positions[a], &mesh.positions[b], &mesh.positions[c]],
                [uv(a), uv(b), uv(c)],
            ) else {
                uv_degenerate += 1;
                report.record(GeometryIssue::UvDegenerateFace { face_index });
                continue;
            };

            for i in [a, b, c] {
                s_dirs[i] += s_dir;
                t_dirs[i] += t_dir;
            }
        }

        let tangents: Vec<Vector4<f64>> = (0..vertex_count)
            .map(|i| {
                let normal = mesh.normals.get(i).copied().unwrap_or_else(Vector3::zeros);
                let tangent = orthonormalize(&normal, &s_dirs[i]);
                let w = if normal.cross(&tangent).dot(&t_dirs[i]) < 0.0 {
                    -1.0
                } else {
                    1.0
                };
                Vector4::new(tangent.x, tangent.y, tangent.z, w)
            })
            .collect();

        if uv_degenerate > 0 {
            if mesh.uvs.is_empty() {
                debug!(faces = uv_degenerate, "No UVs, tangents fall back to defaults");
            } else {
                warn!(
                    faces = uv_degenerate,
                    "Triangles with degenerate UVs skipped in tangent accumulation"
                );
            }
        }
        debug!(vertices = vertex_count, "Recalculated tangents");

        tangents
    }
}

/// Object-space directions of increasing U and V across one triangle.
///
/// Returns `None` when the UV determinant is exactly zero or too small to
/// invert.
fn triangle_directions(
    [p0, p1, p2]: [&Point3<f64>; 3],
    [w0, w1, w2]: [Vector2<f64>; 3],
) -> Option<(Vector3<f64>, Vector3<f64>)> {
    let e1 = p1 - p0;
    let e2 = p2 - p0;

    let s1 = w1.x - w0.x;
    let s2 = w2.x - w0.x;
    let t1 = w1.y - w0.y;
    let t2 = w2.y - w0.y;

    let det = s1 * t2 - s2 * t1;
    if det == 0.0 {
        return None;
    }
    let r = 1.0 / det;

    let s_dir = (e1 * t2 - e2 * t1) * r;
    let t_dir = (e2 * s1 - e1 * s2) * r;

    // Subnormal determinants overflow `r`.
    if !s_dir.iter().chain(t_dir.iter()).all(|c| c.is_finite()) {
        return None;
    }
    Some((s_dir, t_dir))
}

/// Gram-Schmidt `tangent` against `normal`, always returning a unit vector.
///
/// With a zero normal the tangent is only normalized (or `+X` if it is zero
/// too). If the tangent is zero or parallel to the normal, an arbitrary unit
/// vector perpendicular to the normal is returned.
fn orthonormalize(normal: &Vector3<f64>, tangent: &Vector3<f64>) -> Vector3<f64> {
    let Some(n) = normal.try_normalize(0.0) else {
        return tangent.try_normalize(0.0).unwrap_or_else(Vector3::x);
    };

    (tangent - n * n.dot(tangent))
        .try_normalize(0.0)
        .unwrap_or_else(|| any_perpendicular(&n))
}

/// A unit vector perpendicular to the unit vector `n`.
fn any_perpendicular(n: &Vector3<f64>) -> Vector3<f64> {
    let candidate = if n.x.abs() > n.z.abs() {
        Vector3::new(-n.y, n.x, 0.0)
    } else {
        Vector3::new(0.0, -n.z, n.y)
    };
    candidate.try_normalize(0.0).unwrap_or_else(Vector3::x)
}
