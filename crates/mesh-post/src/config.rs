//! Serializable pipeline configuration.

use std::path::Path;

use thiserror::Error;

use crate::error::MeshResult;
use crate::params::{LineThickness, OutlineParams, SmoothingParams};

/// Settings for both pipelines, loadable from TOML or JSON.
///
/// Missing sections and fields fall back to their defaults, so a file only
/// needs to name what it changes.
///
/// # Example TOML
///
/// ```toml
/// name = "props"
///
/// [outline]
/// feature_angle_degrees = 25.0
/// thickness = "auto"
///
/// [smoothing]
/// smoothing_angle_degrees = 45.0
/// ```
///
/// # Example
///
/// ```
/// use mesh_post::{LineThickness, PipelineConfig};
///
/// let config = PipelineConfig::from_toml(
///     r#"
///     [outline]
///     thickness = { fixed = 0.01 }
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.outline.thickness, LineThickness::Fixed(0.01));
/// assert_eq!(config.smoothing.smoothing_angle_degrees, 30.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Optional name for this configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Outline extraction settings.
    pub outline: OutlineParams,
    /// Normal repair settings.
    pub smoothing: SmoothingParams,
}

impl PipelineConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with a name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Replace the outline settings.
    pub fn outline(mut self, params: OutlineParams) -> Self {
        self.outline = params;
        self
    }

    /// Replace the smoothing settings.
    pub fn smoothing(mut self, params: SmoothingParams) -> Self {
        self.smoothing = params;
        self
    }

    /// Check both parameter sets.
    pub fn validate(&self) -> MeshResult<()> {
        self.outline.validate()?;
        self.smoothing.validate()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or doesn't match the schema.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or the TOML is invalid.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, PipelineConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Ok(toml::from_str(&contents)?)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml(&self, path: impl AsRef<Path>) -> Result<(), PipelineConfigError> {
        let toml_str = self.to_toml()?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Thin outlines for models a few units across, default smoothing.
    pub fn preset_small_models() -> Self {
        Self::with_name("small-models").outline(OutlineParams::for_small_models())
    }

    /// Bounds-scaled outlines with flat shading, for hard-surface props.
    pub fn preset_hard_surface() -> Self {
        Self::with_name("hard-surface")
            .outline(OutlineParams::default().with_thickness(LineThickness::Auto))
            .smoothing(SmoothingParams::hard_edges())
    }
}

/// Errors that can occur when loading or saving pipeline configurations.
#[derive(Debug, Error)]
pub enum PipelineConfigError {
    /// I/O error reading or writing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// TOML serialization error.
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_roundtrip() {
        let config = PipelineConfig::preset_hard_surface();
        let text = config.to_toml().unwrap();
        let parsed = PipelineConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = PipelineConfig::preset_small_models();
        let json = config.to_json().unwrap();
        assert!(json.contains("\"fixed\": 0.004"));
        assert_eq!(PipelineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PipelineConfig::from_toml(
            r#"
            [smoothing]
            smoothing_angle_degrees = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(config.name, None);
        assert_eq!(config.outline, OutlineParams::default());
        assert_eq!(config.smoothing.smoothing_angle_degrees, 60.0);
        assert_eq!(config.smoothing.position_tolerance, 1e-5);
    }

    #[test]
    fn test_auto_thickness_keyword() {
        let config = PipelineConfig::from_toml("[outline]\nthickness = \"auto\"\n").unwrap();
        assert_eq!(config.outline.thickness, LineThickness::Auto);
    }

    #[test]
    fn test_validate_catches_out_of_range_values() {
        let config = PipelineConfig::from_toml("[outline]\nfeature_angle_degrees = 270.0\n").unwrap();
        assert!(config.validate().is_err());
        assert!(PipelineConfig::new().validate().is_ok());
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.toml");
        let config = PipelineConfig::with_name("file-test");
        config.save_toml(&path).unwrap();

        let loaded = PipelineConfig::from_toml_file(&path).unwrap();
        assert_eq!(loaded, config);

        assert!(matches!(
            PipelineConfig::from_toml_file(path.with_extension("missing")),
            Err(PipelineConfigError::Io(_))
        ));
    }
}
