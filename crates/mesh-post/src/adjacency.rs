//! Edge-to-triangle adjacency.
//!
//! Maps every undirected edge of a triangle list to the triangles that use it.
//! The triangle lists keep insertion order, which the feature-edge classifier
//! relies on when it has to pick two triangles of a non-manifold edge.

use hashbrown::HashMap;

use crate::MeshBuffer;

/// An undirected mesh edge.
///
/// The endpoints are stored in canonical order (`v1 <= v2`), so `Edge::new(a, b)`
/// and `Edge::new(b, a)` compare and hash identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    v1: u32,
    v2: u32,
}

impl Edge {
    /// Create an edge, normalizing endpoint order.
    #[inline]
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Self { v1: a, v2: b }
        } else {
            Self { v1: b, v2: a }
        }
    }

    /// Smaller endpoint index.
    #[inline]
    pub fn v1(&self) -> u32 {
        self.v1
    }

    /// Larger endpoint index.
    #[inline]
    pub fn v2(&self) -> u32 {
        self.v2
    }

    /// Endpoints as a `(min, max)` tuple.
    #[inline]
    pub fn vertices(&self) -> (u32, u32) {
        (self.v1, self.v2)
    }
}

/// Edge-to-triangle map for a triangle list.
///
/// Triangle ids are positions in the triangle list (index / 3). Edges with one
/// triangle are boundary edges, two is an interior edge, more is non-manifold
/// and is kept as-is.
#[derive(Debug, Clone, Default)]
pub struct EdgeAdjacency {
    edge_to_faces: HashMap<Edge, Vec<usize>>,
}

impl EdgeAdjacency {
    /// Build adjacency from a flat triangle index buffer.
    ///
    /// Trailing indices that do not form a whole triangle are ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_post::EdgeAdjacency;
    ///
    /// let adj = EdgeAdjacency::build(&[0, 1, 2, 1, 3, 2]);
    ///
    /// assert_eq!(adj.edge_count(), 5);
    /// assert_eq!(adj.boundary_edge_count(), 4);
    /// ```
    #[must_use]
    pub fn build(triangles: &[u32]) -> Self {
        Self::from_face_iter(
            triangles
                .chunks_exact(3)
                .map(|t| [t[0], t[1], t[2]]),
        )
    }

    /// Build adjacency from triangle index triplets.
    #[must_use]
    pub fn from_faces(faces: &[[u32; 3]]) -> Self {
        Self::from_face_iter(faces.iter().copied())
    }

    /// Build adjacency over all sub-meshes of a buffer.
    ///
    /// Triangle ids run across sub-meshes in order, matching
    /// [`MeshBuffer::faces`].
    #[must_use]
    pub fn from_mesh(mesh: &MeshBuffer) -> Self {
        Self::from_face_iter(mesh.faces())
    }

    fn from_face_iter(faces: impl Iterator<Item = [u32; 3]>) -> Self {
        let mut edge_to_faces: HashMap<Edge, Vec<usize>> = HashMap::new();

        for (face_idx, [i0, i1, i2]) in faces.enumerate() {
            for edge in [Edge::new(i0, i1), Edge::new(i1, i2), Edge::new(i2, i0)] {
                edge_to_faces.entry(edge).or_default().push(face_idx);
            }
        }

        Self { edge_to_faces }
    }

    /// Get triangles adjacent to an edge, in registration order.
    ///
    /// Returns `None` if the edge doesn't exist in the mesh.
    #[must_use]
    pub fn faces_for_edge(&self, v0: u32, v1: u32) -> Option<&[usize]> {
        self.edge_to_faces
            .get(&Edge::new(v0, v1))
            .map(Vec::as_slice)
    }

    /// Iterate over every edge with its adjacent triangles.
    pub fn iter(&self) -> impl Iterator<Item = (Edge, &[usize])> + '_ {
        self.edge_to_faces
            .iter()
            .map(|(&edge, faces)| (edge, faces.as_slice()))
    }

    /// Iterate over all boundary edges (edges with exactly one adjacent triangle).
    pub fn boundary_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() == 1)
            .map(|(&edge, _)| edge)
    }

    /// Count the number of boundary edges.
    #[must_use]
    pub fn boundary_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() == 1)
            .count()
    }

    /// Iterate over all non-manifold edges (edges with more than two adjacent triangles).
    pub fn non_manifold_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edge_to_faces
            .iter()
            .filter(|(_, faces)| faces.len() > 2)
            .map(|(&edge, _)| edge)
    }

    /// Count the number of non-manifold edges.
    #[must_use]
    pub fn non_manifold_edge_count(&self) -> usize {
        self.edge_to_faces
            .values()
            .filter(|faces| faces.len() > 2)
            .count()
    }

    /// Check if all edges have at most 2 adjacent triangles.
    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.edge_to_faces.values().all(|faces| faces.len() <= 2)
    }

    /// Check if the mesh has no boundary edges.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.edge_to_faces.values().all(|faces| faces.len() >= 2)
    }

    /// Get the total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_to_faces.len()
    }

    /// Whether no edges were registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edge_to_faces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles_sharing_edge() -> Vec<[u32; 3]> {
        vec![[0, 1, 2], [1, 3, 2]]
    }

    #[test]
    fn edge_canonical_order() {
        assert_eq!(Edge::new(4, 1), Edge::new(1, 4));
        assert_eq!(Edge::new(4, 1).vertices(), (1, 4));
        assert_eq!(Edge::new(3, 3).v1(), Edge::new(3, 3).v2());
    }

    #[test]
    fn build_single_triangle() {
        let adj = EdgeAdjacency::build(&[0, 1, 2]);

        assert_eq!(adj.edge_count(), 3);
        assert_eq!(adj.boundary_edge_count(), 3);
        assert!(!adj.is_watertight());
        assert!(adj.is_manifold());
    }

    #[test]
    fn empty_input() {
        let adj = EdgeAdjacency::build(&[]);
        assert!(adj.is_empty());
        assert_eq!(adj.edge_count(), 0);
    }

    #[test]
    fn faces_for_edge() {
        let adj = EdgeAdjacency::from_faces(&two_triangles_sharing_edge());

        // Shared edge (1, 2) in both directions
        assert_eq!(adj.faces_for_edge(1, 2), Some(&[0, 1][..]));
        assert_eq!(adj.faces_for_edge(2, 1), Some(&[0, 1][..]));

        assert_eq!(adj.faces_for_edge(0, 1), Some(&[0][..]));
        assert!(adj.faces_for_edge(0, 3).is_none());
    }

    #[test]
    fn flat_buffer_matches_faces() {
        let from_flat = EdgeAdjacency::build(&[0, 1, 2, 1, 3, 2]);
        let from_faces = EdgeAdjacency::from_faces(&two_triangles_sharing_edge());

        let mut a: Vec<_> = from_flat.iter().map(|(e, f)| (e, f.to_vec())).collect();
        let mut b: Vec<_> = from_faces.iter().map(|(e, f)| (e, f.to_vec())).collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn non_manifold_edge_is_kept() {
        // Three triangles sharing the same edge (0, 1)
        let adj = EdgeAdjacency::from_faces(&[[0, 1, 2], [0, 1, 3], [1, 0, 4]]);

        assert_eq!(adj.non_manifold_edge_count(), 1);
        assert_eq!(adj.non_manifold_edges().next(), Some(Edge::new(0, 1)));
        assert_eq!(adj.faces_for_edge(0, 1), Some(&[0, 1, 2][..]));
        assert!(!adj.is_manifold());
    }

    #[test]
    fn mesh_ids_span_sub_meshes() {
        let mut mesh = MeshBuffer::from_triangles(vec![nalgebra::Point3::origin(); 4], vec![0, 1, 2]);
        mesh.sub_meshes.push(vec![1, 3, 2]);

        let adj = EdgeAdjacency::from_mesh(&mesh);
        assert_eq!(adj.faces_for_edge(1, 2), Some(&[0, 1][..]));
        assert_eq!(adj.boundary_edges().count(), 4);
    }
}
