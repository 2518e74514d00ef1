//! Vertex unwelding.
//!
//! Gives every triangle corner its own vertex so corners that share a
//! position can still end up with different normals across a hard edge.

use nalgebra::Vector2;
use tracing::debug;

use crate::MeshBuffer;

/// Expand an indexed mesh into one vertex per triangle corner.
///
/// Positions and UVs are copied per corner. Each sub-mesh is re-indexed to
/// consecutive indices, continuing from where the previous sub-mesh ended,
/// so the output's concatenated triangle list is `0, 1, 2, ..., n - 1`.
///
/// A corner whose source index has no UV (the UV array is shorter than the
/// position array) gets `(0, 0)`. A source without UVs produces none. Normals
/// and tangents are dropped; they are recomputed afterwards.
///
/// The input must be valid (see [`validate_buffer`](crate::validate_buffer)).
///
/// # Example
///
/// ```
/// use mesh_post::{MeshBuffer, unweld_vertices};
/// use nalgebra::Point3;
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
/// let flat = unweld_vertices(&quad);
/// assert_eq!(flat.vertex_count(), 6);
/// assert_eq!(flat.triangles(), vec![0, 1, 2, 3, 4, 5]);
/// ```
pub fn unweld_vertices(mesh: &MeshBuffer) -> MeshBuffer {
    let corner_count = mesh.index_count();
    let has_uvs = !mesh.uvs.is_empty();

    let mut positions = Vec::with_capacity(corner_count);
    let mut uvs = Vec::with_capacity(if has_uvs { corner_count } else { 0 });
    let mut sub_meshes = Vec::with_capacity(mesh.sub_meshes.len());
    let mut next_vertex = 0u32;

    for list in &mesh.sub_meshes {
        let mut flat = Vec::with_capacity(list.len());

        for &index in list {
            let index = index as usize;
            positions.push(mesh.positions[index]);
            if has_uvs {
                uvs.push(mesh.uvs.get(index).copied().unwrap_or_else(Vector2::zeros));
            }

            flat.push(next_vertex);
            next_vertex += 1;
        }

        sub_meshes.push(flat);
    }

    debug!(
        vertices_in = mesh.vertex_count(),
        vertices_out = positions.len(),
        sub_meshes = sub_meshes.len(),
        "Unwelded vertices"
    );

    MeshBuffer {
        name: mesh.name.clone(),
        positions,
        uvs,
        normals: Vec::new(),
        tangents: Vec::new(),
        sub_meshes,
    }
}
