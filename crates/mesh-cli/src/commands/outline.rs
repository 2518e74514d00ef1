//! mesh-post outline command - extract feature-edge outlines.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use mesh_post::{LineThickness, OutlineParams, extract_outlines};
use serde::Serialize;

use crate::{Cli, OutputFormat, io, output};

/// Command-line values that override the loaded configuration.
pub struct Overrides {
    pub angle: Option<f64>,
    pub thickness: Option<f64>,
    pub auto_thickness: bool,
}

impl Overrides {
    fn apply(&self, mut params: OutlineParams) -> OutlineParams {
        if let Some(angle) = self.angle {
            params = params.with_feature_angle(angle);
        }
        if let Some(thickness) = self.thickness {
            params = params.with_thickness(LineThickness::Fixed(thickness));
        }
        if self.auto_thickness {
            params = params.with_thickness(LineThickness::Auto);
        }
        params
    }
}

#[derive(Serialize)]
struct OutlineSummary {
    input: String,
    output: String,
    parts: usize,
    input_faces: usize,
    feature_edges: usize,
    thickness: f64,
    output_vertices: usize,
    output_faces: usize,
    degenerate_faces: usize,
    non_manifold_edges: usize,
    parallel_up_vectors: usize,
}

pub fn run(
    input: &Path,
    output_path: &Path,
    params: OutlineParams,
    overrides: Overrides,
    cli: &Cli,
) -> Result<()> {
    let params = overrides.apply(params);
    params.validate()?;

    let parts =
        io::load_obj(input).with_context(|| format!("Failed to load mesh from {:?}", input))?;

    output::info(
        &format!(
            "Extracting outlines from {} part(s) at {}°",
            parts.len(),
            params.feature_angle_degrees
        ),
        cli.format,
        cli.quiet,
    );

    let result = extract_outlines(&parts, &params)?;

    io::save_obj(&result.meshes, output_path)
        .with_context(|| format!("Failed to save outline mesh to {:?}", output_path))?;

    let summary = OutlineSummary {
        input: input.display().to_string(),
        output: output_path.display().to_string(),
        parts: parts.len(),
        input_faces: parts.iter().map(|p| p.face_count()).sum(),
        feature_edges: result.feature_edge_count,
        thickness: result.thickness,
        output_vertices: result.meshes.iter().map(|m| m.vertex_count()).sum(),
        output_faces: result.meshes.iter().map(|m| m.face_count()).sum(),
        degenerate_faces: result.report.degenerate_faces,
        non_manifold_edges: result.report.non_manifold_edges,
        parallel_up_vectors: result.report.parallel_up_vectors,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&summary, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(
                    &format!("Outline mesh saved to {}", output_path.display()),
                    cli.format,
                    cli.quiet,
                );
                println!("  {}: {}", "Feature edges".cyan(), summary.feature_edges);
                println!("  {}: {:.6}", "Thickness".cyan(), summary.thickness);
                println!(
                    "  {}: {} → {} faces",
                    "Faces".cyan(),
                    summary.input_faces,
                    summary.output_faces
                );

                if summary.non_manifold_edges > 0 {
                    output::warning(
                        &format!(
                            "{} non-manifold edge(s) classified using their first two faces",
                            summary.non_manifold_edges
                        ),
                        cli.format,
                        cli.quiet,
                    );
                }
                if summary.degenerate_faces > 0 {
                    output::warning(
                        &format!("{} degenerate face(s) in input", summary.degenerate_faces),
                        cli.format,
                        cli.quiet,
                    );
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_on_top_of_config() {
        let base = OutlineParams::default();

        let none = Overrides {
            angle: None,
            thickness: None,
            auto_thickness: false,
        };
        assert_eq!(none.apply(base.clone()), base);

        let fixed = Overrides {
            angle: Some(45.0),
            thickness: Some(0.2),
            auto_thickness: false,
        }
        .apply(base.clone());
        assert_eq!(fixed.feature_angle_degrees, 45.0);
        assert_eq!(fixed.thickness, LineThickness::Fixed(0.2));

        let auto = Overrides {
            angle: None,
            thickness: None,
            auto_thickness: true,
        }
        .apply(base);
        assert_eq!(auto.thickness, LineThickness::Auto);
    }
}
