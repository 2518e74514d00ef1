//! Outline mesh generation.
//!
//! Turns a set of feature edges into a separate mesh of thin quads, one quad
//! per edge, so the host can render the outline with its own material.
//!
//! # Quad layout
//!
//! For an edge `p0 → p1` with perpendicular offset `d`:
//!
//! ```text
//!   1 = p0 + d ─────── 3 = p1 + d
//!       │  ╲               │
//!       │     ╲            │
//!   0 = p0 − d ─────── 2 = p1 − d
//! ```
//!
//! Triangles are `(0, 2, 1)` and `(2, 3, 1)`; they share the diagonal `1–2`
//! and have the same orientation.

use nalgebra::{Point3, Vector3};
use tracing::{debug, info, trace};

use crate::MeshBuffer;
use crate::adjacency::{Edge, EdgeAdjacency};
use crate::error::{GeometryIssue, MeshResult};
use crate::face_normals::compute_face_normals;
use crate::feature::FeatureEdgeClassifier;
use crate::params::{LineThickness, OutlineParams};
use crate::report::QualityReport;
use crate::tracing_ext::OperationTimer;
use crate::types::union_bounds;
use crate::validate::validate_buffer;

/// Thickness at a largest bounding dimension of 1.
pub const AUTO_THICKNESS_MIN: f64 = 0.004;

/// Thickness at a largest bounding dimension of 100.
pub const AUTO_THICKNESS_MAX: f64 = 0.15;

/// Above this `|dot(direction, +Y)|` the up vector switches to +Z.
const PARALLEL_UP_LIMIT: f64 = 0.99;

/// Line thickness for a model whose largest bounding dimension is `max_dimension`.
///
/// Linear from 0.004 at size 1 to 0.15 at size 100. Sizes outside that range
/// extrapolate along the same line rather than clamping; since dimensions are
/// never negative the result stays positive.
///
/// ```
/// use mesh_post::auto_thickness;
///
/// assert!((auto_thickness(1.0) - 0.004).abs() < 1e-12);
/// assert!((auto_thickness(100.0) - 0.15).abs() < 1e-12);
/// ```
#[inline]
pub fn auto_thickness(max_dimension: f64) -> f64 {
    AUTO_THICKNESS_MIN + (AUTO_THICKNESS_MAX - AUTO_THICKNESS_MIN) * (max_dimension - 1.0) / 99.0
}

/// Builds billboard-style quads along edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutlineMeshGenerator {
    thickness: f64,
}

impl OutlineMeshGenerator {
    /// Create a generator offsetting each side of an edge by `thickness`.
    pub fn new(thickness: f64) -> Self {
        Self { thickness }
    }

    /// The per-side offset.
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Emit one quad per edge.
    ///
    /// The result has `4 * edges.len()` vertices and a single sub-mesh with
    /// `6 * edges.len()` indices.
    ///
    /// # Panics
    ///
    /// Panics if an edge endpoint is out of range for `positions`.
    pub fn generate(
        &self,
        edges: &[Edge],
        positions: &[Point3<f64>],
        report: &mut QualityReport,
    ) -> MeshBuffer {
        let mut vertices = Vec::with_capacity(edges.len() * 4);
        let mut indices = Vec::with_capacity(edges.len() * 6);

        for edge in edges {
            let p0 = positions[edge.v1() as usize];
            let p1 = positions[edge.v2() as usize];

            let perpendicular = self.perpendicular(edge, &(p1 - p0), report);

            let base = vertices.len() as u32;
            vertices.push(p0 - perpendicular);
            vertices.push(p0 + perpendicular);
            vertices.push(p1 - perpendicular);
            vertices.push(p1 + perpendicular);

            indices.extend_from_slice(&[base, base + 2, base + 1, base + 2, base + 3, base + 1]);
        }

        MeshBuffer::from_triangles(vertices, indices)
    }

    fn perpendicular(
        &self,
        edge: &Edge,
        delta: &Vector3<f64>,
        report: &mut QualityReport,
    ) -> Vector3<f64> {
        let (vertex_a, vertex_b) = edge.vertices();

        let Some(direction) = delta.try_normalize(0.0) else {
            report.record(GeometryIssue::ZeroLengthEdge { vertex_a, vertex_b });
            return Vector3::zeros();
        };

        let mut up = Vector3::y();
        if direction.dot(&up).abs() > PARALLEL_UP_LIMIT {
            trace!(vertex_a, vertex_b, "Edge parallel to +Y, using +Z as up");
            report.record(GeometryIssue::ParallelUpVector { vertex_a, vertex_b });
            up = Vector3::z();
        }

        direction
            .cross(&up)
            .try_normalize(0.0)
            .map_or_else(Vector3::zeros, |side| side * self.thickness)
    }
}

/// Outline meshes for a set of input parts.
#[derive(Debug, Clone)]
pub struct OutlineResult {
    /// One outline mesh per input part, in input order.
    pub meshes: Vec<MeshBuffer>,
    /// Per-side line offset that was used.
    pub thickness: f64,
    /// Total selected feature edges across all parts.
    pub feature_edge_count: usize,
    /// Degeneracies worked around.
    pub report: QualityReport,
}

/// Extract the outline of one part with a known line thickness.
///
/// Runs adjacency → face normals → classification → quad generation over
/// all sub-meshes of `mesh` together.
pub fn extract_outline(
    mesh: &MeshBuffer,
    feature_angle_degrees: f64,
    thickness: f64,
    report: &mut QualityReport,
) -> MeshResult<MeshBuffer> {
    validate_buffer(mesh)?;

    let triangles = mesh.triangles();
    let adjacency = EdgeAdjacency::build(&triangles);
    let face_normals = compute_face_normals(&mesh.positions, &triangles);

    for (face_index, n) in face_normals.iter().enumerate() {
        if *n == Vector3::zeros() {
            report.record(GeometryIssue::DegenerateFace { face_index });
        }
    }

    let features =
        FeatureEdgeClassifier::new(feature_angle_degrees).classify(&adjacency, &face_normals, report);

    let mut outline = OutlineMeshGenerator::new(thickness).generate(&features.edges, &mesh.positions, report);
    outline.name = mesh.name.as_ref().map(|name| format!("{}_outline", name));

    debug!(
        name = mesh.name.as_deref().unwrap_or("<unnamed>"),
        triangles = triangles.len() / 3,
        edges = adjacency.edge_count(),
        feature_edges = features.len(),
        "Extracted outline"
    );

    Ok(outline)
}

/// Extract outlines for several parts, one output mesh per part.
///
/// With [`LineThickness::Auto`] the thickness is derived once from the union
/// of all parts' bounds, so every part gets the same line width. All parts are
/// validated before any outline is built.
///
/// # Example
///
/// ```
/// use mesh_post::{MeshBuffer, OutlineParams, extract_outlines};
/// use nalgebra::Point3;
///
/// let triangle = MeshBuffer::from_triangles(
///     vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0)],
///     vec![0, 1, 2],
/// );
///
/// let result = extract_outlines(&[triangle], &OutlineParams::default()).unwrap();
/// assert_eq!(result.meshes.len(), 1);
/// assert_eq!(result.feature_edge_count, 3);
/// assert_eq!(result.meshes[0].vertex_count(), 12);
/// ```
pub fn extract_outlines(parts: &[MeshBuffer], params: &OutlineParams) -> MeshResult<OutlineResult> {
    params.validate()?;
    for part in parts {
        validate_buffer(part)?;
    }

    let face_count: usize = parts.iter().map(MeshBuffer::face_count).sum();
    let vertex_count: usize = parts.iter().map(MeshBuffer::vertex_count).sum();
    let _timer = OperationTimer::with_context("extract_outlines", face_count, vertex_count);

    let thickness = match params.thickness {
        LineThickness::Fixed(value) => value,
        LineThickness::Auto => {
            let max_dimension = union_bounds(parts).map_or(0.0, |(min, max)| {
                let dims = max - min;
                dims.x.max(dims.y).max(dims.z)
            });
            let value = auto_thickness(max_dimension);
            debug!(max_dimension, thickness = value, "Derived outline thickness from bounds");
            value
        }
    };

    let mut report = QualityReport::new();
    let meshes = parts
        .iter()
        .map(|part| extract_outline(part, params.feature_angle_degrees, thickness, &mut report))
        .collect::<MeshResult<Vec<_>>>()?;

    let feature_edge_count = meshes.iter().map(|m| m.vertex_count() / 4).sum();

    info!(
        parts = parts.len(),
        feature_edges = feature_edge_count,
        thickness,
        issues = report.total(),
        "Outline extraction complete"
    );

    Ok(OutlineResult {
        meshes,
        thickness,
        feature_edge_count,
        report,
    })
}
