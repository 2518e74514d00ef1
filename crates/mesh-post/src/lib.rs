//! Post-processing for triangle meshes: feature-edge outlines and
//! smooth normal/tangent repair.
//!
//! Two independent pipelines take a [`MeshBuffer`] in and produce a new
//! [`MeshBuffer`] out:
//!
//! - **Outline extraction**: builds edge adjacency, computes face normals,
//!   selects boundary edges and creases sharper than a threshold, and emits
//!   one camera-independent quad per selected edge.
//! - **Normal repair**: unwelds the mesh to one vertex per corner, groups
//!   coincident corners by quantized position, blends face normals within a
//!   smoothing angle and rebuilds tangents from the UVs.
//!
//! Neither pipeline reads files; loading and saving live in the CLI.
//!
//! # Conventions
//!
//! - Triangles are counter-clockwise when viewed from the side their face
//!   normal points to.
//! - Outline quads are offset perpendicular to both the edge and world up
//!   (`+Y`), switching to `+Z` for near-vertical edges.
//! - Units are whatever the input uses; the only absolute distances are the
//!   outline thickness and the grouping tolerance.
//!
//! # Quick Start
//!
//! ```
//! use mesh_post::{MeshBuffer, OutlineParams, SmoothingParams, extract_outlines, repair_normals};
//! use nalgebra::Point3;
//!
//! let tetra = MeshBuffer::from_faces(
//!     vec![
//!         Point3::new(0.0, 0.0, 0.0),
//!         Point3::new(1.0, 0.0, 0.0),
//!         Point3::new(0.0, 1.0, 0.0),
//!         Point3::new(0.0, 0.0, 1.0),
//!     ],
//!     &[[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
//! )
//! .with_name("tetra");
//!
//! // Every edge of a tetrahedron is a crease.
//! let outlines = extract_outlines(&[tetra.clone()], &OutlineParams::default()).unwrap();
//! assert_eq!(outlines.feature_edge_count, 6);
//! assert_eq!(outlines.meshes[0].name.as_deref(), Some("tetra_outline"));
//!
//! // Flat shading: 12 corners, each with its face normal. Without UVs every
//! // triangle is counted as UV-degenerate, which is informational only.
//! let repaired = repair_normals(&tetra, &SmoothingParams::default()).unwrap();
//! assert_eq!(repaired.mesh.vertex_count(), 12);
//! assert_eq!(repaired.report.uv_degenerate_faces, 4);
//! assert_eq!(repaired.report.warning_count(), 0);
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return [`MeshResult<T>`], which is
//! `Result<T, MeshError>`. Errors are reserved for input that cannot be
//! processed at all (out-of-range indices, non-finite coordinates, bad
//! parameters). Degenerate geometry is worked around and counted in a
//! [`QualityReport`] instead.
//!
//! ```
//! use mesh_post::{ErrorCode, MeshBuffer, SmoothingParams, repair_normals};
//! use nalgebra::Point3;
//!
//! let broken = MeshBuffer::from_triangles(vec![Point3::origin()], vec![0, 1, 2]);
//!
//! let err = repair_normals(&broken, &SmoothingParams::default()).unwrap_err();
//! assert_eq!(err.code(), ErrorCode::InvalidVertexIndex);
//! println!("{}: {}", err.code(), err);
//! ```
//!
//! # Logging
//!
//! Every stage emits `tracing` events; see [`tracing_ext`] for targets and
//! levels. No subscriber is installed by this crate.

mod error;
mod report;
mod types;
pub mod tracing_ext;

pub mod adjacency;
pub mod face_normals;
pub mod feature;
pub mod grouping;
pub mod outline;
pub mod params;
pub mod repair;
pub mod smooth;
pub mod tangent;
pub mod unweld;
pub mod validate;

#[cfg(feature = "pipeline-config")]
pub mod config;

// Core types
pub use error::{
    ErrorCode, GeometryIssue, IssueSeverity, MeshError, MeshLocation, MeshResult,
    RecoverySuggestion,
};
pub use report::{MAX_ISSUE_SAMPLES, QualityReport};
pub use types::{MeshBuffer, union_bounds};

// Topology and geometry
pub use adjacency::{Edge, EdgeAdjacency};
pub use face_normals::{compute_face_normals, compute_sub_mesh_face_normals, face_normal};
pub use validate::{MeshReport, analyze_mesh, validate_buffer};

// Outline pipeline
pub use feature::{FeatureEdgeClassifier, FeatureEdgeSet, dihedral_angle_degrees};
pub use outline::{
    AUTO_THICKNESS_MAX, AUTO_THICKNESS_MIN, OutlineMeshGenerator, OutlineResult, auto_thickness,
    extract_outline, extract_outlines,
};

// Normal repair pipeline
pub use grouping::{ProximityVertexGrouper, VertexEntry, VertexGroups, VertexKey};
pub use repair::{NormalRepairResult, recalculate_tangents, repair_normals};
pub use smooth::SmoothNormalRecalculator;
pub use tangent::TangentSpaceRecalculator;
pub use unweld::unweld_vertices;

// Parameters
pub use params::{
    DEFAULT_FEATURE_ANGLE_DEGREES, DEFAULT_LINE_THICKNESS, DEFAULT_POSITION_TOLERANCE,
    DEFAULT_SMOOTHING_ANGLE_DEGREES, LineThickness, OutlineParams, SmoothingParams,
};

#[cfg(feature = "pipeline-config")]
pub use config::{PipelineConfig, PipelineConfigError};

// Structured logging helpers
pub use tracing_ext::{OperationTimer, log_mesh_stats, log_quality_report};
