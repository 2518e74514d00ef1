//! Tracing extensions for mesh operations.
//!
//! Structured logging helpers shared by both pipelines. Nothing here
//! installs a subscriber; applications do that themselves:
//!
//! ```rust,ignore
//! use tracing_subscriber::{fmt, prelude::*, EnvFilter};
//!
//! tracing_subscriber::registry()
//!     .with(fmt::layer())
//!     .with(EnvFilter::from_default_env())
//!     .init();
//!
//! // RUST_LOG=mesh_post=debug for per-stage output,
//! // RUST_LOG=mesh_post::timing=info for timings only.
//! ```
//!
//! # Log Levels
//!
//! - **WARN**: Geometry worked around (non-manifold edges, zero normals)
//! - **INFO**: Pipeline summaries, timing
//! - **DEBUG**: Per-stage counts
//! - **TRACE**: Per-edge decisions

use std::time::Instant;
use tracing::{Span, debug, info, warn};

use crate::MeshBuffer;
use crate::error::IssueSeverity;
use crate::report::QualityReport;

/// A performance timer that logs duration on drop.
///
/// # Example
///
/// ```rust
/// use mesh_post::tracing_ext::OperationTimer;
///
/// fn expensive_operation() {
///     let _timer = OperationTimer::new("expensive_operation");
///     // ... do work ...
/// } // Timer logs duration when dropped
/// # expensive_operation();
/// ```
pub struct OperationTimer {
    name: &'static str,
    start: Instant,
    span: Span,
}

impl OperationTimer {
    /// Create a new operation timer.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!("mesh_operation", operation = name);
        debug!(target: "mesh_post::timing", operation = name, "Starting operation");
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Create a timer with face and vertex counts attached.
    pub fn with_context(name: &'static str, face_count: usize, vertex_count: usize) -> Self {
        let span = tracing::info_span!(
            "mesh_operation",
            operation = name,
            faces = face_count,
            vertices = vertex_count
        );
        debug!(
            target: "mesh_post::timing",
            operation = name,
            faces = face_count,
            vertices = vertex_count,
            "Starting operation"
        );
        Self {
            name,
            start: Instant::now(),
            span,
        }
    }

    /// Elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// The span for this timer.
    pub fn span(&self) -> &Span {
        &self.span
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        info!(
            target: "mesh_post::timing",
            operation = self.name,
            elapsed_ms = format!("{:.2}", elapsed_ms),
            "Operation completed"
        );
    }
}

/// Log buffer statistics at debug level.
pub fn log_mesh_stats(mesh: &MeshBuffer, context: &str) {
    let (min_bounds, max_bounds) = mesh.bounds().unwrap_or_default();
    let dims = max_bounds - min_bounds;

    debug!(
        target: "mesh_post::mesh_state",
        context = context,
        name = mesh.name.as_deref().unwrap_or("<unnamed>"),
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        sub_meshes = mesh.sub_mesh_count(),
        has_uvs = !mesh.uvs.is_empty(),
        has_normals = mesh.has_normals(),
        has_tangents = mesh.has_tangents(),
        dimensions = format!("{:.2} x {:.2} x {:.2}", dims.x, dims.y, dims.z),
        "Mesh state"
    );
}

/// Log a quality report: a warning with samples when something visible was
/// worked around, debug otherwise.
pub fn log_quality_report(report: &QualityReport, context: &str) {
    if report.warning_count() > 0 {
        warn!(
            target: "mesh_post::quality",
            context = context,
            summary = %report,
            "Geometry issues worked around"
        );
        for issue in report.samples_at_least(IssueSeverity::Warning) {
            debug!(target: "mesh_post::quality", code = issue.code(), "{}", issue);
        }
    } else {
        debug!(
            target: "mesh_post::quality",
            context = context,
            summary = %report,
            "Quality report"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeometryIssue;

    #[test]
    fn test_operation_timer() {
        let timer = OperationTimer::new("test_operation");
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 10.0);
    }

    #[test]
    fn test_logging_helpers_accept_empty_input() {
        log_mesh_stats(&MeshBuffer::new(), "test");

        let mut report = QualityReport::new();
        log_quality_report(&report, "test");
        report.record(GeometryIssue::ZeroNormal { vertex_index: 0 });
        log_quality_report(&report, "test");
    }
}
