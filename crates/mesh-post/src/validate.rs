//! Input validation and topology reports.

use nalgebra::Point3;
use tracing::{debug, warn};

use crate::MeshBuffer;
use crate::adjacency::EdgeAdjacency;
use crate::error::{MeshError, MeshResult};
use crate::face_normals::face_normal;

/// Check that a buffer can be processed.
///
/// This function checks:
/// - Every sub-mesh list holds whole triangles
/// - Triangle indices are within vertex bounds
/// - Vertex coordinates are finite
/// - `normals` and `tangents` are empty or have one entry per vertex
/// - `uvs` has no more entries than there are vertices
///
/// A `uvs` array shorter than `positions` is accepted; missing coordinates
/// read as `(0, 0)` during unwelding.
///
/// Returns the first problem found as an error.
///
/// # Example
/// ```
/// use mesh_post::{MeshBuffer, validate_buffer};
/// use nalgebra::Point3;
///
/// let mesh = MeshBuffer::from_triangles(
///     vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
///     vec![0, 1, 3],
/// );
/// assert!(validate_buffer(&mesh).is_err());
/// ```
pub fn validate_buffer(mesh: &MeshBuffer) -> MeshResult<()> {
    let vertex_count = mesh.positions.len();

    for (vertex_index, p) in mesh.positions.iter().enumerate() {
        for (coordinate, value) in [("x", p.x), ("y", p.y), ("z", p.z)] {
            if !value.is_finite() {
                warn!(vertex_index, coordinate, value, "Non-finite vertex coordinate");
                return Err(MeshError::InvalidCoordinate {
                    vertex_index,
                    coordinate,
                    value,
                });
            }
        }
    }

    for (sub_mesh, list) in mesh.sub_meshes.iter().enumerate() {
        if list.len() % 3 != 0 {
            return Err(MeshError::MalformedIndexBuffer {
                sub_mesh,
                len: list.len(),
            });
        }

        if let Some(pos) = list.iter().position(|&i| i as usize >= vertex_count) {
            return Err(MeshError::invalid_vertex_index(
                sub_mesh,
                pos / 3,
                list[pos],
                vertex_count,
            ));
        }
    }

    if mesh.uvs.len() > vertex_count {
        return Err(MeshError::AttributeCountMismatch {
            attribute: "uvs",
            count: mesh.uvs.len(),
            vertex_count,
        });
    }

    for (attribute, count) in [
        ("normals", mesh.normals.len()),
        ("tangents", mesh.tangents.len()),
    ] {
        if count != 0 && count != vertex_count {
            return Err(MeshError::AttributeCountMismatch {
                attribute,
                count,
                vertex_count,
            });
        }
    }

    debug!(
        vertices = vertex_count,
        triangles = mesh.face_count(),
        sub_meshes = mesh.sub_mesh_count(),
        "Mesh buffer validation passed"
    );

    Ok(())
}

/// Summary of a mesh's topology.
#[derive(Debug, Clone)]
pub struct MeshReport {
    /// Total vertex count.
    pub vertex_count: usize,

    /// Total triangle count across sub-meshes.
    pub face_count: usize,

    /// Number of sub-meshes.
    pub sub_mesh_count: usize,

    /// Number of unique edges.
    pub edge_count: usize,

    /// Number of boundary edges (edges with 1 adjacent triangle).
    pub boundary_edge_count: usize,

    /// Number of non-manifold edges (edges with >2 adjacent triangles).
    pub non_manifold_edge_count: usize,

    /// Number of zero-area triangles.
    pub degenerate_face_count: usize,

    /// Whether the mesh has no boundary edges.
    pub is_watertight: bool,

    /// Whether all edges have at most 2 adjacent triangles.
    pub is_manifold: bool,

    /// Bounding box as (min_corner, max_corner).
    pub bounds: Option<(Point3<f64>, Point3<f64>)>,
}

/// Build a topology report for a validated buffer.
pub fn analyze_mesh(mesh: &MeshBuffer) -> MeshResult<MeshReport> {
    validate_buffer(mesh)?;

    let adjacency = EdgeAdjacency::from_mesh(mesh);
    let degenerate_face_count = mesh
        .faces()
        .filter(|&[a, b, c]| {
            face_normal(
                &mesh.positions[a as usize],
                &mesh.positions[b as usize],
                &mesh.positions[c as usize],
            ) == nalgebra::Vector3::zeros()
        })
        .count();

    Ok(MeshReport {
        vertex_count: mesh.vertex_count(),
        face_count: mesh.face_count(),
        sub_mesh_count: mesh.sub_mesh_count(),
        edge_count: adjacency.edge_count(),
        boundary_edge_count: adjacency.boundary_edge_count(),
        non_manifold_edge_count: adjacency.non_manifold_edge_count(),
        degenerate_face_count,
        is_watertight: adjacency.is_watertight(),
        is_manifold: adjacency.is_manifold(),
        bounds: mesh.bounds(),
    })
}

impl std::fmt::Display for MeshReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Mesh Report")?;
        writeln!(
            f,
            "  Vertices: {}, Triangles: {}, Sub-meshes: {}",
            self.vertex_count, self.face_count, self.sub_mesh_count
        )?;
        writeln!(
            f,
            "  Edges: {} ({} boundary, {} non-manifold)",
            self.edge_count, self.boundary_edge_count, self.non_manifold_edge_count
        )?;
        writeln!(f, "  Degenerate triangles: {}", self.degenerate_face_count)?;
        writeln!(
            f,
            "  Watertight: {}, Manifold: {}",
            if self.is_watertight { "yes" } else { "no" },
            if self.is_manifold { "yes" } else { "no" }
        )?;
        if let Some((min, max)) = &self.bounds {
            write!(
                f,
                "  Bounds: [{:.3}, {:.3}, {:.3}] to [{:.3}, {:.3}, {:.3}]",
                min.x, min.y, min.z, max.x, max.y, max.z
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;
    use nalgebra::{Vector2, Vector3};

    fn single_triangle() -> MeshBuffer {
        MeshBuffer::from_faces(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2]],
        )
    }

    #[test]
    fn test_valid_buffer() {
        assert!(validate_buffer(&single_triangle()).is_ok());
        assert!(validate_buffer(&MeshBuffer::new()).is_ok());
    }

    #[test]
    fn test_invalid_index() {
        let mut mesh = single_triangle();
        mesh.sub_meshes.push(vec![0, 1, 2, 2, 1, 7]);

        let err = validate_buffer(&mesh).unwrap_err();
        match err {
            MeshError::InvalidVertexIndex {
                sub_mesh,
                face_index,
                vertex_index,
                vertex_count,
            } => {
                assert_eq!(sub_mesh, 1);
                assert_eq!(face_index, 1);
                assert_eq!(vertex_index, 7);
                assert_eq!(vertex_count, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_partial_triangle() {
        let mut mesh = single_triangle();
        mesh.sub_meshes[0].push(1);

        let err = validate_buffer(&mesh).unwrap_err();
        assert_eq!(err.code(), ErrorCode::MalformedIndexBuffer);
    }

    #[test]
    fn test_nan_coordinate() {
        let mut mesh = single_triangle();
        mesh.positions[1].y = f64::NAN;

        let err = validate_buffer(&mesh).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidCoordinate);
    }

    #[test]
    fn test_attribute_counts() {
        let mut mesh = single_triangle();
        mesh.uvs = vec![Vector2::zeros(); 2];
        assert!(validate_buffer(&mesh).is_ok(), "short uv arrays are tolerated");

        mesh.uvs = vec![Vector2::zeros(); 4];
        assert_eq!(
            validate_buffer(&mesh).unwrap_err().code(),
            ErrorCode::AttributeCountMismatch
        );

        mesh.uvs.clear();
        mesh.normals = vec![Vector3::z(); 2];
        assert_eq!(
            validate_buffer(&mesh).unwrap_err().code(),
            ErrorCode::AttributeCountMismatch
        );
    }

    #[test]
    fn test_analyze_open_triangle() {
        let report = analyze_mesh(&single_triangle()).unwrap();
        assert_eq!(report.edge_count, 3);
        assert_eq!(report.boundary_edge_count, 3);
        assert!(!report.is_watertight);
        assert!(report.is_manifold);
        assert_eq!(report.degenerate_face_count, 0);
        assert!(report.to_string().contains("3 boundary"));
    }
}
