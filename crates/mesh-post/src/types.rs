//! Core mesh data types.

use nalgebra::{Point3, Vector2, Vector3, Vector4};

/// A raw triangle mesh as exchanged with the host engine.
///
/// Vertex attributes are stored as parallel arrays. Triangles are grouped per
/// sub-mesh; each sub-mesh list holds three indices per triangle and every
/// index refers to the shared `positions` array.
///
/// `uvs`, `normals` and `tangents` are either empty or hold one entry per
/// vertex. Tangents carry the bitangent handedness in `w` (`+1` or `-1`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    /// Optional mesh name, carried through processing.
    pub name: Option<String>,

    /// Vertex positions.
    pub positions: Vec<Point3<f64>>,

    /// Per-vertex texture coordinates.
    pub uvs: Vec<Vector2<f64>>,

    /// Per-vertex unit normals.
    pub normals: Vec<Vector3<f64>>,

    /// Per-vertex tangents with handedness in `w`.
    pub tangents: Vec<Vector4<f64>>,

    /// Triangle index lists, one per sub-mesh.
    pub sub_meshes: Vec<Vec<u32>>,
}

impl MeshBuffer {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a single sub-mesh buffer from positions and a triangle list.
    pub fn from_triangles(positions: Vec<Point3<f64>>, triangles: Vec<u32>) -> Self {
        Self {
            positions,
            sub_meshes: vec![triangles],
            ..Self::default()
        }
    }

    /// Create a single sub-mesh buffer from positions and per-face index triplets.
    pub fn from_faces(positions: Vec<Point3<f64>>, faces: &[[u32; 3]]) -> Self {
        Self::from_triangles(positions, faces.iter().flatten().copied().collect())
    }

    /// Set the mesh name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the texture coordinates.
    pub fn with_uvs(mut self, uvs: Vec<Vector2<f64>>) -> Self {
        self.uvs = uvs;
        self
    }

    /// Number of vertices in the mesh.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles across all sub-meshes.
    #[inline]
    pub fn face_count(&self) -> usize {
        self.index_count() / 3
    }

    /// Number of triangle indices across all sub-meshes.
    #[inline]
    pub fn index_count(&self) -> usize {
        self.sub_meshes.iter().map(Vec::len).sum()
    }

    /// Number of sub-meshes.
    #[inline]
    pub fn sub_mesh_count(&self) -> usize {
        self.sub_meshes.len()
    }

    /// Check if mesh is empty (no vertices or no triangles).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() || self.index_count() == 0
    }

    /// All triangle indices, sub-mesh lists concatenated in order.
    pub fn triangles(&self) -> Vec<u32> {
        self.sub_meshes.iter().flatten().copied().collect()
    }

    /// Iterate over all triangles as index triplets, in sub-mesh order.
    ///
    /// Trailing indices of a list that is not a multiple of three are skipped.
    pub fn faces(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.sub_meshes
            .iter()
            .flat_map(|list| list.chunks_exact(3).map(|t| [t[0], t[1], t[2]]))
    }

    /// Compute the axis-aligned bounding box.
    /// Returns (min_corner, max_corner) or None if mesh is empty.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = *self.positions.first()?;

        let (min, max) = self.positions[1..]
            .iter()
            .fold((first, first), |(min, max), p| (min.inf(p), max.sup(p)));

        Some((min, max))
    }

    /// Largest extent of the bounding box, or 0 for an empty mesh.
    pub fn max_dimension(&self) -> f64 {
        self.bounds().map_or(0.0, |(min, max)| {
            let dims = max - min;
            dims.x.max(dims.y).max(dims.z)
        })
    }

    /// Whether per-vertex normals are present.
    #[inline]
    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    /// Whether per-vertex tangents are present.
    #[inline]
    pub fn has_tangents(&self) -> bool {
        !self.tangents.is_empty()
    }
}

/// Union of the bounding boxes of several meshes.
///
/// Empty meshes contribute nothing; returns None when every mesh is empty.
pub fn union_bounds<'a>(
    meshes: impl IntoIterator<Item = &'a MeshBuffer>,
) -> Option<(Point3<f64>, Point3<f64>)> {
    meshes
        .into_iter()
        .filter_map(MeshBuffer::bounds)
        .reduce(|(min_a, max_a), (min_b, max_b)| (min_a.inf(&min_b), max_a.sup(&max_b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshBuffer {
        MeshBuffer::from_faces(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(2.0, 0.0, 0.0),
                Point3::new(2.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, -3.0),
            ],
            &[[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn test_counts() {
        let mut mesh = quad();
        mesh.sub_meshes.push(vec![0, 1, 3]);

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_count(), 3);
        assert_eq!(mesh.index_count(), 9);
        assert_eq!(mesh.sub_mesh_count(), 2);
        assert_eq!(mesh.triangles(), vec![0, 1, 2, 0, 2, 3, 0, 1, 3]);
        assert_eq!(mesh.faces().count(), 3);
    }

    #[test]
    fn test_bounds() {
        let mesh = quad();
        let (min, max) = mesh.bounds().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, -3.0));
        assert_eq!(max, Point3::new(2.0, 1.0, 0.0));
        assert_eq!(mesh.max_dimension(), 3.0);
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = MeshBuffer::new();
        assert!(mesh.is_empty());
        assert!(mesh.bounds().is_none());
        assert_eq!(mesh.max_dimension(), 0.0);
        assert_eq!(mesh.faces().count(), 0);
    }

    #[test]
    fn test_union_bounds() {
        let a = quad();
        let mut b = quad();
        for p in &mut b.positions {
            p.x += 10.0;
        }
        let empty = MeshBuffer::new();

        let (min, max) = union_bounds([&a, &empty, &b]).unwrap();
        assert_eq!(min.x, 0.0);
        assert_eq!(max.x, 12.0);
        assert!(union_bounds([&empty]).is_none());
    }
}
