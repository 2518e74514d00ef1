//! Error types for mesh post-processing with rich diagnostics.
//!
//! Two kinds of problems exist in this crate:
//!
//! - [`MeshError`]: the input buffer or a parameter is unusable. The
//!   operation is aborted before any output is produced.
//! - [`GeometryIssue`]: an isolated geometric degeneracy (zero-area triangle,
//!   UV-degenerate triangle, non-manifold edge, ...). A fallback value is
//!   substituted and processing continues; issues are collected into a
//!   [`QualityReport`](crate::QualityReport).
//!
//! # Error Codes
//!
//! Each error has a unique code in the format `MESH-XXXX`:
//! - `MESH-2xxx`: Validation errors (indices, attributes, coordinates)
//! - `MESH-5xxx`: Parameter errors
//!
//! # Example
//!
//! ```
//! use mesh_post::{ErrorCode, MeshError};
//!
//! let err = MeshError::invalid_vertex_index(0, 5, 100, 50);
//! assert_eq!(err.code(), ErrorCode::InvalidVertexIndex);
//! assert_eq!(err.code().as_str(), "MESH-2001");
//! ```

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Machine-readable error codes for mesh operations.
///
/// Codes follow the pattern `MESH-XXXX` where:
/// - 2xxx = Validation errors
/// - 5xxx = Parameter errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors (2xxx)
    /// MESH-2001: Triangle references invalid vertex index
    InvalidVertexIndex = 2001,
    /// MESH-2002: Vertex has NaN or Infinity coordinate
    InvalidCoordinate = 2002,
    /// MESH-2003: Mesh has no vertex data
    EmptyMesh = 2003,
    /// MESH-2004: Index list length is not a multiple of three
    MalformedIndexBuffer = 2004,
    /// MESH-2013: Attribute array length disagrees with the vertex count
    AttributeCountMismatch = 2013,

    // Parameter errors (5xxx)
    /// MESH-5001: Parameter outside its valid range
    InvalidParameter = 5001,
}

impl ErrorCode {
    /// Returns the error code as a string in the format `MESH-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidVertexIndex => "MESH-2001",
            ErrorCode::InvalidCoordinate => "MESH-2002",
            ErrorCode::EmptyMesh => "MESH-2003",
            ErrorCode::MalformedIndexBuffer => "MESH-2004",
            ErrorCode::AttributeCountMismatch => "MESH-2013",
            ErrorCode::InvalidParameter => "MESH-5001",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions for mesh errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Re-export the mesh from the host with different settings.
    ReexportMesh { hint: String },
    /// Check the source buffers for issues.
    CheckSourceMesh { checks: Vec<String> },
    /// Adjust parameters for the operation.
    AdjustParameters { parameters: Vec<(String, String)> },
    /// No automatic recovery available.
    None,
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::ReexportMesh { hint } => {
                write!(f, "Try re-exporting the mesh from the host ({})", hint)
            }
            RecoverySuggestion::CheckSourceMesh { checks } => {
                write!(f, "Check the source mesh for: {}", checks.join(", "))
            }
            RecoverySuggestion::AdjustParameters { parameters } => {
                let params: Vec<String> = parameters
                    .iter()
                    .map(|(k, v)| format!("{} = {}", k, v))
                    .collect();
                write!(f, "Try adjusting: {}", params.join(", "))
            }
            RecoverySuggestion::None => {
                write!(f, "No automatic recovery available")
            }
        }
    }
}

/// Location information for mesh errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshLocation {
    /// Error at a specific vertex.
    Vertex { index: usize },
    /// Error at a specific triangle of a sub-mesh.
    Face { sub_mesh: usize, index: usize },
    /// Error in a whole sub-mesh index list.
    SubMesh { index: usize },
    /// Error in a per-vertex attribute array.
    Attribute { name: &'static str },
    /// Error in a parameter value.
    Parameter { name: &'static str },
}

impl std::fmt::Display for MeshLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshLocation::Vertex { index } => write!(f, "vertex {}", index),
            MeshLocation::Face { sub_mesh, index } => {
                write!(f, "triangle {} of sub-mesh {}", index, sub_mesh)
            }
            MeshLocation::SubMesh { index } => write!(f, "sub-mesh {}", index),
            MeshLocation::Attribute { name } => write!(f, "attribute '{}'", name),
            MeshLocation::Parameter { name } => write!(f, "parameter '{}'", name),
        }
    }
}

/// Errors that can occur during mesh post-processing.
///
/// Every variant aborts the operation before any output is built, so the
/// caller never observes a partially processed buffer.
#[derive(Debug, Error, Diagnostic)]
pub enum MeshError {
    /// Mesh has no vertex data.
    #[error("mesh is empty: {details}")]
    #[diagnostic(
        code(mesh::validation::empty),
        help("The source mesh must have at least one vertex and one triangle.")
    )]
    EmptyMesh { details: String },

    /// Sub-mesh index list is not made of whole triangles.
    #[error("sub-mesh {sub_mesh} has {len} indices, which is not a multiple of 3")]
    #[diagnostic(
        code(mesh::validation::index_buffer),
        help("Triangulate the mesh in the host before handing it to the processor.")
    )]
    MalformedIndexBuffer { sub_mesh: usize, len: usize },

    /// Invalid vertex index in triangle data.
    #[error(
        "invalid vertex index: triangle {face_index} of sub-mesh {sub_mesh} references vertex {vertex_index}, but mesh only has {vertex_count} vertices"
    )]
    #[diagnostic(
        code(mesh::validation::vertex_index),
        help("Check the host export; every index must be smaller than the vertex count.")
    )]
    InvalidVertexIndex {
        sub_mesh: usize,
        face_index: usize,
        vertex_index: u32,
        vertex_count: usize,
    },

    /// Per-vertex attribute array has the wrong length.
    #[error("attribute '{attribute}' has {count} entries, but mesh has {vertex_count} vertices")]
    #[diagnostic(
        code(mesh::validation::attribute_count),
        help("Per-vertex attributes must be empty or have one entry per vertex.")
    )]
    AttributeCountMismatch {
        attribute: &'static str,
        count: usize,
        vertex_count: usize,
    },

    /// Invalid coordinate value (NaN or Infinity).
    #[error("invalid coordinate at vertex {vertex_index}: {coordinate} is {value}")]
    #[diagnostic(
        code(mesh::validation::coordinate),
        help(
            "Check for numerical issues in the source data. This often happens with very small or very large values."
        )
    )]
    InvalidCoordinate {
        vertex_index: usize,
        coordinate: &'static str,
        value: f64,
    },

    /// Parameter outside its valid range.
    #[error("invalid parameter '{name}' = {value}: {reason}")]
    #[diagnostic(code(mesh::params::invalid))]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl MeshError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            MeshError::EmptyMesh { .. } => ErrorCode::EmptyMesh,
            MeshError::MalformedIndexBuffer { .. } => ErrorCode::MalformedIndexBuffer,
            MeshError::InvalidVertexIndex { .. } => ErrorCode::InvalidVertexIndex,
            MeshError::AttributeCountMismatch { .. } => ErrorCode::AttributeCountMismatch,
            MeshError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            MeshError::InvalidParameter { .. } => ErrorCode::InvalidParameter,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            MeshError::EmptyMesh { .. } => RecoverySuggestion::CheckSourceMesh {
                checks: vec!["vertex positions".to_string(), "triangle lists".to_string()],
            },
            MeshError::MalformedIndexBuffer { .. } => RecoverySuggestion::ReexportMesh {
                hint: "export triangles only, no quads or n-gons".to_string(),
            },
            MeshError::InvalidVertexIndex { .. } => RecoverySuggestion::CheckSourceMesh {
                checks: vec!["out-of-range triangle indices".to_string()],
            },
            MeshError::AttributeCountMismatch { attribute, .. } => {
                RecoverySuggestion::CheckSourceMesh {
                    checks: vec![format!("length of the '{}' array", attribute)],
                }
            }
            MeshError::InvalidCoordinate { .. } => RecoverySuggestion::ReexportMesh {
                hint: "the source contains NaN or infinite positions".to_string(),
            },
            MeshError::InvalidParameter { name, reason, .. } => {
                RecoverySuggestion::AdjustParameters {
                    parameters: vec![(name.to_string(), reason.to_string())],
                }
            }
        }
    }

    /// Returns location information if available.
    pub fn location(&self) -> Option<MeshLocation> {
        match self {
            MeshError::EmptyMesh { .. } => None,
            MeshError::MalformedIndexBuffer { sub_mesh, .. } => {
                Some(MeshLocation::SubMesh { index: *sub_mesh })
            }
            MeshError::InvalidVertexIndex {
                sub_mesh,
                face_index,
                ..
            } => Some(MeshLocation::Face {
                sub_mesh: *sub_mesh,
                index: *face_index,
            }),
            MeshError::AttributeCountMismatch { attribute, .. } => {
                Some(MeshLocation::Attribute { name: attribute })
            }
            MeshError::InvalidCoordinate { vertex_index, .. } => Some(MeshLocation::Vertex {
                index: *vertex_index,
            }),
            MeshError::InvalidParameter { name, .. } => Some(MeshLocation::Parameter { name }),
        }
    }

    /// Create an EmptyMesh error.
    pub fn empty_mesh(details: impl Into<String>) -> Self {
        MeshError::EmptyMesh {
            details: details.into(),
        }
    }

    /// Create an InvalidVertexIndex error.
    pub fn invalid_vertex_index(
        sub_mesh: usize,
        face_index: usize,
        vertex_index: u32,
        vertex_count: usize,
    ) -> Self {
        MeshError::InvalidVertexIndex {
            sub_mesh,
            face_index,
            vertex_index,
            vertex_count,
        }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(name: &'static str, value: f64, reason: &'static str) -> Self {
        MeshError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Non-fatal geometric problems found while processing a mesh.
///
/// Unlike `MeshError`, these never stop an operation. Each one is handled by
/// substituting a safe value (zero normal, `r = 0`, alternate up vector) and
/// is collected so callers can judge output quality.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryIssue {
    /// Triangle with zero area; its face normal is the zero vector.
    DegenerateFace { face_index: usize },
    /// Triangle whose UV determinant is exactly zero; contributes no tangent.
    UvDegenerateFace { face_index: usize },
    /// Edge shared by more than two triangles.
    NonManifoldEdge {
        vertex_a: u32,
        vertex_b: u32,
        face_count: usize,
    },
    /// Edge direction nearly parallel to +Y; +Z was used as the up vector.
    ParallelUpVector { vertex_a: u32, vertex_b: u32 },
    /// Edge whose endpoints coincide; its outline quad is collapsed.
    ZeroLengthEdge { vertex_a: u32, vertex_b: u32 },
    /// Smoothed normal summed to zero length.
    ZeroNormal { vertex_index: usize },
}

impl GeometryIssue {
    /// Returns a severity level for the issue.
    pub fn severity(&self) -> IssueSeverity {
        match self {
            GeometryIssue::DegenerateFace { .. } => IssueSeverity::Warning,
            GeometryIssue::UvDegenerateFace { .. } => IssueSeverity::Info,
            GeometryIssue::NonManifoldEdge { .. } => IssueSeverity::Warning,
            GeometryIssue::ParallelUpVector { .. } => IssueSeverity::Info,
            GeometryIssue::ZeroLengthEdge { .. } => IssueSeverity::Warning,
            GeometryIssue::ZeroNormal { .. } => IssueSeverity::Warning,
        }
    }

    /// Returns an error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            GeometryIssue::DegenerateFace { .. } => "MESH-2005",
            GeometryIssue::NonManifoldEdge { .. } => "MESH-2006",
            GeometryIssue::UvDegenerateFace { .. } => "MESH-2009",
            GeometryIssue::ZeroLengthEdge { .. } => "MESH-2010",
            GeometryIssue::ParallelUpVector { .. } => "MESH-2011",
            GeometryIssue::ZeroNormal { .. } => "MESH-2012",
        }
    }
}

/// Severity levels for geometry issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IssueSeverity {
    /// Informational, no action needed.
    Info,
    /// Warning, output may look wrong locally.
    Warning,
}

impl std::fmt::Display for GeometryIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryIssue::DegenerateFace { face_index } => {
                write!(f, "triangle {} has zero area", face_index)
            }
            GeometryIssue::UvDegenerateFace { face_index } => {
                write!(f, "triangle {} has a zero UV determinant", face_index)
            }
            GeometryIssue::NonManifoldEdge {
                vertex_a,
                vertex_b,
                face_count,
            } => {
                write!(
                    f,
                    "edge ({}, {}) is non-manifold (shared by {} triangles)",
                    vertex_a, vertex_b, face_count
                )
            }
            GeometryIssue::ParallelUpVector { vertex_a, vertex_b } => {
                write!(
                    f,
                    "edge ({}, {}) is parallel to +Y, used +Z as up vector",
                    vertex_a, vertex_b
                )
            }
            GeometryIssue::ZeroLengthEdge { vertex_a, vertex_b } => {
                write!(f, "edge ({}, {}) has zero length", vertex_a, vertex_b)
            }
            GeometryIssue::ZeroNormal { vertex_index } => {
                write!(f, "vertex {} has a zero-length normal", vertex_index)
            }
        }
    }
}
