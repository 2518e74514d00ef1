//! Normal and tangent repair.
//!
//! Rebuilds shading data for a mesh whose normals are missing or wrong:
//! unweld → face normals → proximity grouping → smooth normals → tangents.
//! The result has one vertex per triangle corner, so hard edges survive
//! without seams in the positions.

use tracing::{debug, info};

use crate::MeshBuffer;
use crate::error::{GeometryIssue, MeshError, MeshResult};
use crate::face_normals::compute_sub_mesh_face_normals;
use crate::grouping::ProximityVertexGrouper;
use crate::params::SmoothingParams;
use crate::report::QualityReport;
use crate::smooth::SmoothNormalRecalculator;
use crate::tangent::TangentSpaceRecalculator;
use crate::tracing_ext::{OperationTimer, log_mesh_stats, log_quality_report};
use crate::unweld::unweld_vertices;
use crate::validate::validate_buffer;

/// Result of [`repair_normals`].
#[derive(Debug, Clone)]
pub struct NormalRepairResult {
    /// The rebuilt mesh: unwelded, with normals and tangents.
    pub mesh: MeshBuffer,
    /// Number of distinct corner positions found.
    pub group_count: usize,
    /// Degeneracies worked around.
    pub report: QualityReport,
}

/// Rebuild normals and tangents of `mesh` into a new buffer.
///
/// The source is left untouched. The output keeps the source's name, UVs
/// (per corner) and sub-mesh partition; its vertex count equals the source's
/// index count.
///
/// # Errors
///
/// - [`MeshError::InvalidParameter`] if `params` fails validation.
/// - Any [`validate_buffer`] error for a malformed source.
/// - [`MeshError::EmptyMesh`] if the source has no vertices or no triangles.
///
/// # Example
///
/// ```
/// use mesh_post::{MeshBuffer, SmoothingParams, repair_normals};
/// use nalgebra::{Point3, Vector3};
///
/// let quad = MeshBuffer::from_faces(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(1.0, 1.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     &[[0, 1, 2], [0, 2, 3]],
/// );
///
/// let result = repair_normals(&quad, &SmoothingParams::default()).unwrap();
/// assert_eq!(result.mesh.vertex_count(), 6);
/// assert!(result.mesh.normals.iter().all(|n| (n - Vector3::z()).norm() < 1e-9));
/// assert_eq!(result.mesh.tangents.len(), 6);
/// ```
pub fn repair_normals(mesh: &MeshBuffer, params: &SmoothingParams) -> MeshResult<NormalRepairResult> {
    params.validate()?;
    validate_buffer(mesh)?;
    if mesh.is_empty() {
        return Err(MeshError::empty_mesh(
            "normal repair needs at least one vertex and one triangle",
        ));
    }

    let _timer = OperationTimer::with_context("repair_normals", mesh.face_count(), mesh.vertex_count());
    log_mesh_stats(mesh, "before normal repair");

    let mut report = QualityReport::new();

    let mut flat = unweld_vertices(mesh);
    let face_normals = compute_sub_mesh_face_normals(&flat);

    let mut face_offset = 0;
    for normals in &face_normals {
        for (local, n) in normals.iter().enumerate() {
            if n.norm_squared() == 0.0 {
                report.record(GeometryIssue::DegenerateFace {
                    face_index: face_offset + local,
                });
            }
        }
        face_offset += normals.len();
    }

    let groups = ProximityVertexGrouper::new(params.position_tolerance).group(&flat);
    flat.normals = SmoothNormalRecalculator::new(params.smoothing_angle_degrees).recalculate(
        &groups,
        &face_normals,
        flat.vertex_count(),
        &mut report,
    );
    flat.tangents = TangentSpaceRecalculator::new().recalculate(&flat, &mut report);

    log_mesh_stats(&flat, "after normal repair");
    log_quality_report(&report, "repair_normals");
    info!(
        vertices = flat.vertex_count(),
        groups = groups.group_count(),
        angle = params.smoothing_angle_degrees,
        issues = report.total(),
        "Normal repair complete"
    );

    Ok(NormalRepairResult {
        mesh: flat,
        group_count: groups.group_count(),
        report,
    })
}

/// Recompute tangents in place from the mesh's current normals and UVs.
///
/// Use after editing normals by hand. The buffer must be valid; missing
/// normals read as zero.
pub fn recalculate_tangents(mesh: &mut MeshBuffer) -> QualityReport {
    let mut report = QualityReport::new();
    mesh.tangents = TangentSpaceRecalculator::new().recalculate(mesh, &mut report);
    debug!(vertices = mesh.vertex_count(), issues = report.total(), "Recalculated tangents in place");
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, Vector2, Vector3};

    fn unit_cube() -> MeshBuffer {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(0.0, 1.0, 1.0),
        ];
        let faces = [
            [0, 2, 1],
            [0, 3, 2],
            [4, 5, 6],
            [4, 6, 7],
            [0, 1, 5],
            [0, 5, 4],
            [3, 7, 6],
            [3, 6, 2],
            [0, 4, 7],
            [0, 7, 3],
            [1, 2, 6],
            [1, 6, 5],
        ];
        MeshBuffer::from_faces(positions, &faces)
    }

    #[test]
    fn test_cube_keeps_face_normals_at_30_degrees() {
        let cube = unit_cube();
        let result = repair_normals(&cube, &SmoothingParams::default()).unwrap();
        let flat_normals = compute_sub_mesh_face_normals(&result.mesh);

        assert_eq!(result.mesh.vertex_count(), 36);
        assert_eq!(result.group_count, 8);
        for (corner, n) in result.mesh.normals.iter().enumerate() {
            assert_relative_eq!(*n, flat_normals[0][corner / 3], epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cube_soft_blends_corners() {
        let result = repair_normals(&unit_cube(), &SmoothingParams::soft()).unwrap();

        // At 89 degrees perpendicular faces still stay apart.
        for n in &result.mesh.normals {
            assert_relative_eq!(n.norm(), 1.0, epsilon = 1e-12);
            let axis_aligned = n.iter().filter(|c| c.abs() > 0.999).count();
            assert_eq!(axis_aligned, 1);
        }
    }

    #[test]
    fn test_tangents_are_perpendicular_and_finite() {
        let cube = unit_cube();
        let uvs = cube
            .positions
            .iter()
            .map(|p| Vector2::new(p.x + p.z, p.y))
            .collect();
        let result = repair_normals(&cube.with_uvs(uvs), &SmoothingParams::default()).unwrap();

        for (t, n) in result.mesh.tangents.iter().zip(&result.mesh.normals) {
            assert!(t.iter().all(|c| c.is_finite()));
            assert_relative_eq!(t.xyz().norm(), 1.0, epsilon = 1e-9);
            assert_relative_eq!(t.xyz().dot(n), 0.0, epsilon = 1e-9);
            assert!(t.w == 1.0 || t.w == -1.0);
        }
    }

    #[test]
    fn test_repair_is_idempotent() {
        let first = repair_normals(&unit_cube(), &SmoothingParams::default()).unwrap();
        let second = repair_normals(&first.mesh, &SmoothingParams::default()).unwrap();

        assert_eq!(first.mesh.vertex_count(), second.mesh.vertex_count());
        for (a, b) in first.mesh.normals.iter().zip(&second.mesh.normals) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
        for (a, b) in first.mesh.tangents.iter().zip(&second.mesh.tangents) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_empty_mesh_rejected() {
        let err = repair_normals(&MeshBuffer::new(), &SmoothingParams::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::EmptyMesh);
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = SmoothingParams::default().with_tolerance(0.0);
        let err = repair_normals(&unit_cube(), &params).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidParameter);
    }

    #[test]
    fn test_degenerate_face_reported() {
        let mesh = MeshBuffer::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
            ],
            vec![0, 1, 2, 0, 1, 3],
        );
        let result = repair_normals(&mesh, &SmoothingParams::default()).unwrap();

        assert_eq!(result.report.degenerate_faces, 1);
        // The degenerate triangle's unshared corner has nothing to borrow from.
        assert_eq!(result.mesh.normals[5], Vector3::zeros());
        assert!(result.mesh.tangents.iter().all(|t| t.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_recalculate_tangents_in_place() {
        let mut mesh = MeshBuffer::from_triangles(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2],
        )
        .with_uvs(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(0.0, 1.0),
        ]);
        mesh.normals = vec![Vector3::z(); 3];

        let report = recalculate_tangents(&mut mesh);
        assert!(report.is_clean());
        assert_eq!(mesh.tangents.len(), 3);
        assert_relative_eq!(mesh.tangents[0].xyz(), Vector3::x(), epsilon = 1e-12);
    }
}
