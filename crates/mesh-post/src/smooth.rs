//! Angle-limited smooth normals.
//!
//! Every corner takes its own face normal and adds the face normals of the
//! coincident corners whose faces lie within the smoothing angle. Faces
//! meeting at a sharper angle keep separate normals, which is what keeps
//! hard edges hard after unwelding.

use nalgebra::Vector3;
use tracing::{debug, warn};

use crate::error::GeometryIssue;
use crate::grouping::VertexGroups;
use crate::params::DEFAULT_SMOOTHING_ANGLE_DEGREES;
use crate::report::QualityReport;

/// Computes per-corner normals from proximity groups.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothNormalRecalculator {
    angle_degrees: f64,
    cos_threshold: f64,
}

impl Default for SmoothNormalRecalculator {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_ANGLE_DEGREES)
    }
}

impl SmoothNormalRecalculator {
    /// Create a recalculator with the given smoothing angle in degrees.
    pub fn new(angle_degrees: f64) -> Self {
        Self {
            angle_degrees,
            cos_threshold: angle_degrees.to_radians().cos(),
        }
    }

    /// The smoothing angle in degrees.
    pub fn angle_degrees(&self) -> f64 {
        self.angle_degrees
    }

    /// Compute one normal per vertex of a flattened mesh.
    ///
    /// `face_normals` is indexed `[sub_mesh][triangle]` matching the entries
    /// in `groups`. Vertices not referenced by any entry keep a zero normal.
    /// A corner whose weighted sum cancels out gets a zero normal and is
    /// recorded in `report`.
    ///
    /// This is quadratic in the size of each group; groups are small for
    /// ordinary meshes (one per corner sharing a position).
    ///
    /// # Panics
    ///
    /// Panics if an entry points outside `face_normals` or beyond
    /// `vertex_count`.
    pub fn recalculate(
        &self,
        groups: &VertexGroups,
        face_normals: &[Vec<Vector3<f64>>],
        vertex_count: usize,
        report: &mut QualityReport,
    ) -> Vec<Vector3<f64>> {
        let mut normals = vec![Vector3::zeros(); vertex_count];
        let mut zero_count = 0usize;

        let face_normal =
            |sub_mesh: u32, triangle: u32| face_normals[sub_mesh as usize][triangle as usize];

        for group in groups.iter() {
            for (i, left) in group.iter().enumerate() {
                let left_normal = face_normal(left.sub_mesh, left.triangle);
                let mut sum = left_normal;

                for (j, right) in group.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let right_normal = face_normal(right.sub_mesh, right.triangle);
                    if left_normal.dot(&right_normal) >= self.cos_threshold {
                        sum += right_normal;
                    }
                }

                normals[left.vertex as usize] = match sum.try_normalize(0.0) {
                    Some(n) => n,
                    None => {
                        zero_count += 1;
                        report.record(GeometryIssue::ZeroNormal {
                            vertex_index: left.vertex as usize,
                        });
                        Vector3::zeros()
                    }
                };
            }
        }

        if zero_count > 0 {
            warn!(count = zero_count, "Smoothed normals summed to zero length");
        }
        debug!(
            groups = groups.group_count(),
            angle = self.angle_degrees,
            zero_normals = zero_count,
            "Recalculated smooth normals"
        );

        normals
    }
}
