//! Collected non-fatal geometry issues.

use crate::error::{GeometryIssue, IssueSeverity};

/// Maximum number of individual issues kept as samples.
pub const MAX_ISSUE_SAMPLES: usize = 32;

/// Counts of the degeneracies a pipeline worked around.
///
/// Every issue is counted; only the first [`MAX_ISSUE_SAMPLES`] are kept
/// verbatim so a pathological mesh cannot blow up the report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityReport {
    /// Zero-area triangles.
    pub degenerate_faces: usize,
    /// Triangles with a zero UV determinant.
    pub uv_degenerate_faces: usize,
    /// Edges shared by more than two triangles.
    pub non_manifold_edges: usize,
    /// Outline edges that needed the alternate up vector.
    pub parallel_up_vectors: usize,
    /// Outline edges with coincident endpoints.
    pub zero_length_edges: usize,
    /// Smoothed normals that summed to zero length.
    pub zero_normals: usize,
    /// First issues encountered, in order.
    pub samples: Vec<GeometryIssue>,
}

impl QualityReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one issue.
    pub fn record(&mut self, issue: GeometryIssue) {
        match issue {
            GeometryIssue::DegenerateFace { .. } => self.degenerate_faces += 1,
            GeometryIssue::UvDegenerateFace { .. } => self.uv_degenerate_faces += 1,
            GeometryIssue::NonManifoldEdge { .. } => self.non_manifold_edges += 1,
            GeometryIssue::ParallelUpVector { .. } => self.parallel_up_vectors += 1,
            GeometryIssue::ZeroLengthEdge { .. } => self.zero_length_edges += 1,
            GeometryIssue::ZeroNormal { .. } => self.zero_normals += 1,
        }
        if self.samples.len() < MAX_ISSUE_SAMPLES {
            self.samples.push(issue);
        }
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: QualityReport) {
        self.degenerate_faces += other.degenerate_faces;
        self.uv_degenerate_faces += other.uv_degenerate_faces;
        self.non_manifold_edges += other.non_manifold_edges;
        self.parallel_up_vectors += other.parallel_up_vectors;
        self.zero_length_edges += other.zero_length_edges;
        self.zero_normals += other.zero_normals;

        let room = MAX_ISSUE_SAMPLES.saturating_sub(self.samples.len());
        self.samples.extend(other.samples.into_iter().take(room));
    }

    /// Total number of issues recorded.
    pub fn total(&self) -> usize {
        self.degenerate_faces
            + self.uv_degenerate_faces
            + self.non_manifold_edges
            + self.parallel_up_vectors
            + self.zero_length_edges
            + self.zero_normals
    }

    /// Whether nothing was recorded.
    pub fn is_clean(&self) -> bool {
        self.total() == 0
    }

    /// Number of issues that may visibly affect the output.
    pub fn warning_count(&self) -> usize {
        self.degenerate_faces + self.non_manifold_edges + self.zero_length_edges + self.zero_normals
    }

    /// Sampled issues at or above a severity.
    pub fn samples_at_least(
        &self,
        severity: IssueSeverity,
    ) -> impl Iterator<Item = &GeometryIssue> + '_ {
        self.samples
            .iter()
            .filter(move |issue| issue.severity() >= severity)
    }
}

impl std::fmt::Display for QualityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_clean() {
            return write!(f, "no geometry issues");
        }

        let parts: Vec<String> = [
            (self.degenerate_faces, "degenerate triangles"),
            (self.uv_degenerate_faces, "UV-degenerate triangles"),
            (self.non_manifold_edges, "non-manifold edges"),
            (self.parallel_up_vectors, "up-vector substitutions"),
            (self.zero_length_edges, "zero-length edges"),
            (self.zero_normals, "zero normals"),
        ]
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, label)| format!("{} {}", count, label))
        .collect();

        write!(f, "{}", parts.join(", "))
    }
}
