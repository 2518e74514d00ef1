//! mesh-post info command - display per-part statistics.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;
use mesh_post::{
    EdgeAdjacency, FeatureEdgeClassifier, MeshBuffer, OutlineParams, QualityReport, analyze_mesh,
    compute_face_normals,
};
use serde::Serialize;

use crate::{Cli, OutputFormat, io, output};

#[derive(Serialize)]
struct FileInfo {
    path: String,
    feature_angle: f64,
    parts: Vec<PartInfo>,
}

#[derive(Serialize)]
struct PartInfo {
    name: Option<String>,
    vertices: usize,
    faces: usize,
    sub_meshes: usize,
    edges: usize,
    boundary_edges: usize,
    non_manifold_edges: usize,
    degenerate_faces: usize,
    feature_edges: usize,
    watertight: bool,
    manifold: bool,
    has_uvs: bool,
    has_normals: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounds: Option<BoundsInfo>,
}

#[derive(Serialize)]
struct BoundsInfo {
    min: [f64; 3],
    max: [f64; 3],
    dimensions: [f64; 3],
}

fn part_info(part: &MeshBuffer, classifier: &FeatureEdgeClassifier) -> Result<PartInfo> {
    let report = analyze_mesh(part)?;

    let triangles = part.triangles();
    let adjacency = EdgeAdjacency::build(&triangles);
    let face_normals = compute_face_normals(&part.positions, &triangles);
    let features = classifier.classify(&adjacency, &face_normals, &mut QualityReport::new());

    let bounds = report.bounds.map(|(min, max)| {
        let dims = max - min;
        BoundsInfo {
            min: [min.x, min.y, min.z],
            max: [max.x, max.y, max.z],
            dimensions: [dims.x, dims.y, dims.z],
        }
    });

    Ok(PartInfo {
        name: part.name.clone(),
        vertices: report.vertex_count,
        faces: report.face_count,
        sub_meshes: report.sub_mesh_count,
        edges: report.edge_count,
        boundary_edges: report.boundary_edge_count,
        non_manifold_edges: report.non_manifold_edge_count,
        degenerate_faces: report.degenerate_face_count,
        feature_edges: features.len(),
        watertight: report.is_watertight,
        manifold: report.is_manifold,
        has_uvs: !part.uvs.is_empty(),
        has_normals: part.has_normals(),
        bounds,
    })
}

pub fn run(input: &Path, params: &OutlineParams, cli: &Cli) -> Result<()> {
    params.validate()?;
    let parts =
        io::load_obj(input).with_context(|| format!("Failed to load mesh from {:?}", input))?;

    let classifier = FeatureEdgeClassifier::new(params.feature_angle_degrees);
    let info = FileInfo {
        path: input.display().to_string(),
        feature_angle: params.feature_angle_degrees,
        parts: parts
            .iter()
            .map(|part| part_info(part, &classifier))
            .collect::<Result<_>>()?,
    };

    match cli.format {
        OutputFormat::Json => {
            output::print(&info, cli.format, cli.quiet);
        }
        OutputFormat::Text => {
            if !cli.quiet {
                println!("{}", "Mesh Information".bold().underline());
                println!("  {}: {}", "File".cyan(), input.display());
                println!("  {}: {}", "Parts".cyan(), info.parts.len());

                for (index, part) in info.parts.iter().enumerate() {
                    println!();
                    println!(
                        "  {} {}",
                        format!("Part {}", index).bold(),
                        part.name.as_deref().unwrap_or("(unnamed)")
                    );
                    println!("    {}: {}", "Vertices".cyan(), part.vertices);
                    println!(
                        "    {}: {} in {} sub-mesh(es)",
                        "Faces".cyan(),
                        part.faces,
                        part.sub_meshes
                    );
                    println!(
                        "    {}: {} ({} boundary, {} non-manifold)",
                        "Edges".cyan(),
                        part.edges,
                        part.boundary_edges,
                        part.non_manifold_edges
                    );
                    println!(
                        "    {}: {} at {}°",
                        "Feature edges".cyan(),
                        part.feature_edges,
                        info.feature_angle
                    );
                    if part.degenerate_faces > 0 {
                        println!(
                            "    {}: {}",
                            "Degenerate faces".yellow(),
                            part.degenerate_faces
                        );
                    }
                    println!(
                        "    {}: {}",
                        "Watertight".cyan(),
                        if part.watertight { "yes" } else { "no" }
                    );
                    println!(
                        "    {}: {}",
                        "Manifold".cyan(),
                        if part.manifold { "yes" } else { "no" }
                    );

                    if let Some(ref b) = part.bounds {
                        println!(
                            "    {}: {:.3} x {:.3} x {:.3}",
                            "Dimensions".cyan(),
                            b.dimensions[0],
                            b.dimensions[1],
                            b.dimensions[2]
                        );
                    }

                    println!(
                        "    {}: {}",
                        "Has UVs".cyan(),
                        if part.has_uvs { "yes" } else { "no" }
                    );
                    println!(
                        "    {}: {}",
                        "Has normals".cyan(),
                        if part.has_normals { "yes" } else { "no" }
                    );
                }
            }
        }
    }

    Ok(())
}
