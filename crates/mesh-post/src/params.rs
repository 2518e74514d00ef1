//! Parameters for the outline and normal-repair pipelines.

use crate::error::{MeshError, MeshResult};

/// Default dihedral angle above which an interior edge is outlined.
pub const DEFAULT_FEATURE_ANGLE_DEGREES: f64 = 10.0;

/// Default angle below which neighbouring faces share a blended normal.
pub const DEFAULT_SMOOTHING_ANGLE_DEGREES: f64 = 30.0;

/// Default fixed outline half-width.
pub const DEFAULT_LINE_THICKNESS: f64 = 0.04;

/// Default position quantization step for vertex grouping (scale 100000).
pub const DEFAULT_POSITION_TOLERANCE: f64 = 1e-5;

/// How wide outline quads are.
///
/// The value is the offset applied on each side of the edge, so the visible
/// line is twice as wide.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "pipeline-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum LineThickness {
    /// Fixed offset in mesh units.
    Fixed(f64),
    /// Derived from the largest bounding-box dimension of all input parts.
    ///
    /// See [`auto_thickness`](crate::auto_thickness).
    Auto,
}

impl Default for LineThickness {
    fn default() -> Self {
        LineThickness::Fixed(DEFAULT_LINE_THICKNESS)
    }
}

/// Parameters for feature-edge outline extraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "pipeline-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct OutlineParams {
    /// Dihedral angle threshold in degrees.
    ///
    /// An interior edge is outlined when the angle between its two face
    /// normals is strictly greater than this. Boundary edges are always
    /// outlined.
    ///
    /// Default: `10.0`
    pub feature_angle_degrees: f64,

    /// Outline quad half-width.
    ///
    /// Default: `Fixed(0.04)`
    pub thickness: LineThickness,
}

impl Default for OutlineParams {
    fn default() -> Self {
        Self {
            feature_angle_degrees: DEFAULT_FEATURE_ANGLE_DEGREES,
            thickness: LineThickness::default(),
        }
    }
}

impl OutlineParams {
    /// Params that scale line width with the model size.
    pub fn auto_thickness() -> Self {
        Self {
            thickness: LineThickness::Auto,
            ..Default::default()
        }
    }

    /// Params for models a few units across, where the default width is too heavy.
    pub fn for_small_models() -> Self {
        Self {
            thickness: LineThickness::Fixed(0.004),
            ..Default::default()
        }
    }

    /// Set the feature angle threshold.
    pub fn with_feature_angle(mut self, degrees: f64) -> Self {
        self.feature_angle_degrees = degrees;
        self
    }

    /// Set the line thickness.
    pub fn with_thickness(mut self, thickness: LineThickness) -> Self {
        self.thickness = thickness;
        self
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> MeshResult<()> {
        validate_angle("feature_angle_degrees", self.feature_angle_degrees)?;
        if let LineThickness::Fixed(value) = self.thickness {
            if !value.is_finite() || value < 0.0 {
                return Err(MeshError::invalid_parameter(
                    "thickness",
                    value,
                    "must be a finite, non-negative distance",
                ));
            }
        }
        Ok(())
    }
}

/// Parameters for smooth normal and tangent recalculation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "pipeline-config",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SmoothingParams {
    /// Smoothing angle in degrees.
    ///
    /// Faces meeting at a vertex share a blended normal when the angle
    /// between their face normals is at most this value; otherwise the edge
    /// stays hard.
    ///
    /// Default: `30.0`
    pub smoothing_angle_degrees: f64,

    /// Position quantization step for grouping coincident corners.
    ///
    /// Corners whose coordinates round to the same multiple of this value
    /// are treated as the same point.
    ///
    /// Default: `1e-5`
    pub position_tolerance: f64,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            smoothing_angle_degrees: DEFAULT_SMOOTHING_ANGLE_DEGREES,
            position_tolerance: DEFAULT_POSITION_TOLERANCE,
        }
    }
}

impl SmoothingParams {
    /// Params that never blend across faces (flat shading).
    pub fn hard_edges() -> Self {
        Self {
            smoothing_angle_degrees: 0.0,
            ..Default::default()
        }
    }

    /// Params that blend everything except near-opposite faces.
    pub fn soft() -> Self {
        Self {
            smoothing_angle_degrees: 89.0,
            ..Default::default()
        }
    }

    /// Set the smoothing angle.
    pub fn with_angle(mut self, degrees: f64) -> Self {
        self.smoothing_angle_degrees = degrees;
        self
    }

    /// Set the position tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.position_tolerance = tolerance;
        self
    }

    /// Cosine of the smoothing angle, the dot-product threshold.
    #[inline]
    pub fn cosine_threshold(&self) -> f64 {
        self.smoothing_angle_degrees.to_radians().cos()
    }

    /// Check that every value is in range.
    pub fn validate(&self) -> MeshResult<()> {
        validate_angle("smoothing_angle_degrees", self.smoothing_angle_degrees)?;
        let tolerance = self.position_tolerance;
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(MeshError::invalid_parameter(
                "position_tolerance",
                tolerance,
                "must be a finite, positive distance",
            ));
        }
        Ok(())
    }
}

fn validate_angle(name: &'static str, degrees: f64) -> MeshResult<()> {
    if !degrees.is_finite() || !(0.0..=180.0).contains(&degrees) {
        return Err(MeshError::invalid_parameter(
            name,
            degrees,
            "must be between 0 and 180 degrees",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let outline = OutlineParams::default();
        assert_eq!(outline.feature_angle_degrees, 10.0);
        assert_eq!(outline.thickness, LineThickness::Fixed(0.04));

        let smoothing = SmoothingParams::default();
        assert_eq!(smoothing.smoothing_angle_degrees, 30.0);
        assert_eq!(smoothing.position_tolerance, 1e-5);
        assert!((smoothing.cosine_threshold() - 0.75_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_presets_are_valid() {
        assert!(OutlineParams::default().validate().is_ok());
        assert!(OutlineParams::auto_thickness().validate().is_ok());
        assert!(OutlineParams::for_small_models().validate().is_ok());
        assert!(SmoothingParams::hard_edges().validate().is_ok());
        assert!(SmoothingParams::soft().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_angles() {
        assert!(OutlineParams::default().with_feature_angle(-1.0).validate().is_err());
        assert!(OutlineParams::default().with_feature_angle(f64::NAN).validate().is_err());
        assert!(SmoothingParams::default().with_angle(181.0).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_distances() {
        let params = OutlineParams::default().with_thickness(LineThickness::Fixed(-0.1));
        assert!(params.validate().is_err());

        assert!(SmoothingParams::default().with_tolerance(0.0).validate().is_err());
        assert!(
            SmoothingParams::default()
                .with_tolerance(f64::INFINITY)
                .validate()
                .is_err()
        );
    }
}
