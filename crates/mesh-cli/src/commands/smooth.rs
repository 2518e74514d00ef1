//! mesh-post smooth command - rebuild normals and tangents.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use mesh_post::{SmoothingParams, repair_normals};
use serde::Serialize;
use tracing::debug;

use crate::{Cli, OutputFormat, io, output};

#[derive(Serialize)]
struct SmoothSummary {
    input: String,
    output: String,
    parts: usize,
    smoothing_angle: f64,
    position_tolerance: f64,
    input_vertices: usize,
    output_vertices: usize,
    position_groups: usize,
    degenerate_faces: usize,
    uv_degenerate_faces: usize,
    zero_normals: usize,
}

pub fn run(
    input: &Path,
    output_path: &Path,
    mut params: SmoothingParams,
    angle: Option<f64>,
    tolerance: Option<f64>,
    cli: &Cli,
) -> Result<()> {
    if let Some(angle) = angle {
        params = params.with_angle(angle);
    }
    if let Some(tolerance) = tolerance {
        params = params.with_tolerance(tolerance);
    }
    params.validate()?;

    let parts =
        io::load_obj(input).with_context(|| format!("Failed to load mesh from {:?}", input))?;

    output::info(
        &format!(
            "Rebuilding normals for {} part(s) at {}°",
            parts.len(),
            params.smoothing_angle_degrees
        ),
        cli.format,
        cli.quiet,
    );

    let input_parts = parts.len();
    let input_vertices: usize = parts.iter().map(|p| p.vertex_count()).sum();
    let has_uvs = parts.iter().any(|p| !p.uvs.is_empty());

    // Smoothing runs across every model so coincident corners of
    // neighbouring models share normals.
    let merged = io::merge_parts(parts);
    let result = repair_normals(&merged, &params)?;

    debug!("Tangents are not representable in OBJ and are dropped on save");
    io::save_obj(std::slice::from_ref(&result.mesh), output_path)
        .with_context(|| format!("Failed to save repaired mesh to {:?}", output_path))?;

    let summary = SmoothSummary {
        input: input.display().to_string(),
        output: output_path.display().to_string(),
        parts: input_parts,
        smoothing_angle: params.smoothing_angle_degrees,
        position_tolerance: params.position_tolerance,
        input_vertices,
        output_vertices: result.mesh.vertex_count(),
        position_groups: result.group_count,
        degenerate_faces: result.report.degenerate_faces,
        uv_degenerate_faces: result.report.uv_degenerate_faces,
        zero_normals: result.report.zero_normals,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&summary, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                output::success(
                    &format!("Smoothed mesh saved to {}", output_path.display()),
                    cli.format,
                    cli.quiet,
                );
                println!(
                    "  {}: {} → {} vertices",
                    "Vertices".cyan(),
                    summary.input_vertices,
                    summary.output_vertices
                );
                println!("  {}: {}", "Position groups".cyan(), summary.position_groups);

                if summary.zero_normals > 0 {
                    output::warning(
                        &format!("{} vertex normal(s) cancelled to zero", summary.zero_normals),
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
                if summary.uv_degenerate_faces > 0 && has_uvs {
                    output::warning(
                        &format!(
                            "{} face(s) with degenerate UVs skipped for tangents",
                            summary.uv_degenerate_faces
                        ),
                        cli.format,
                        cli.quiet,
                    );
                }
            }
        }
    }

    Ok(())
}
