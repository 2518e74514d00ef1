//! Feature-edge classification.
//!
//! A feature edge is drawn as part of a mesh outline: every boundary edge,
//! plus every interior edge whose two faces meet at more than the threshold
//! dihedral angle.

use nalgebra::Vector3;
use tracing::{debug, trace, warn};

use crate::adjacency::{Edge, EdgeAdjacency};
use crate::error::GeometryIssue;
use crate::params::DEFAULT_FEATURE_ANGLE_DEGREES;
use crate::report::QualityReport;

/// Selected feature edges of one mesh.
#[derive(Debug, Clone, Default)]
pub struct FeatureEdgeSet {
    /// Selected edges, sorted by endpoint indices.
    pub edges: Vec<Edge>,
    /// How many selected edges are boundary edges.
    pub boundary_count: usize,
    /// How many selected edges are interior creases.
    pub crease_count: usize,
    /// How many non-manifold edges were seen (selected or not).
    pub non_manifold_count: usize,
}

impl FeatureEdgeSet {
    /// Number of selected edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether no edge was selected.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Selects boundary and crease edges from edge adjacency and face normals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureEdgeClassifier {
    angle_threshold_degrees: f64,
}

impl Default for FeatureEdgeClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_FEATURE_ANGLE_DEGREES)
    }
}

impl FeatureEdgeClassifier {
    /// Create a classifier with the given dihedral angle threshold in degrees.
    pub fn new(angle_threshold_degrees: f64) -> Self {
        Self {
            angle_threshold_degrees,
        }
    }

    /// The dihedral angle threshold in degrees.
    pub fn angle_threshold_degrees(&self) -> f64 {
        self.angle_threshold_degrees
    }

    /// Classify every edge of `adjacency`.
    ///
    /// `face_normals` is indexed by the triangle ids stored in the adjacency.
    /// Non-manifold edges are tested against their first two triangles and
    /// recorded in `report`.
    ///
    /// # Panics
    ///
    /// Panics if a triangle id is out of range for `face_normals`.
    pub fn classify(
        &self,
        adjacency: &EdgeAdjacency,
        face_normals: &[Vector3<f64>],
        report: &mut QualityReport,
    ) -> FeatureEdgeSet {
        let mut set = FeatureEdgeSet::default();

        for (edge, faces) in adjacency.iter() {
            match *faces {
                [] => {}
                [_] => {
                    set.edges.push(edge);
                    set.boundary_count += 1;
                }
                [first, second, ref rest @ ..] => {
                    if !rest.is_empty() {
                        set.non_manifold_count += 1;
                        let (vertex_a, vertex_b) = edge.vertices();
                        report.record(GeometryIssue::NonManifoldEdge {
                            vertex_a,
                            vertex_b,
                            face_count: faces.len(),
                        });
                    }

                    let angle = dihedral_angle_degrees(&face_normals[first], &face_normals[second]);
                    if angle > self.angle_threshold_degrees {
                        trace!(v1 = edge.v1(), v2 = edge.v2(), angle, "Crease edge");
                        set.edges.push(edge);
                        set.crease_count += 1;
                    }
                }
            }
        }

        set.edges.sort_unstable();

        if set.non_manifold_count > 0 {
            warn!(
                count = set.non_manifold_count,
                "Non-manifold edges classified using their first two triangles"
            );
        }
        debug!(
            edges = adjacency.edge_count(),
            selected = set.len(),
            boundary = set.boundary_count,
            crease = set.crease_count,
            threshold = self.angle_threshold_degrees,
            "Classified feature edges"
        );

        set
    }
}

/// Angle between two face normals in degrees.
///
/// A zero normal (degenerate triangle) contributes nothing, so the angle is 0.
#[inline]
pub fn dihedral_angle_degrees(n1: &Vector3<f64>, n2: &Vector3<f64>) -> f64 {
    if *n1 == Vector3::zeros() || *n2 == Vector3::zeros() {
        return 0.0;
    }
    n1.dot(n2).clamp(-1.0, 1.0).acos().to_degrees()
}
