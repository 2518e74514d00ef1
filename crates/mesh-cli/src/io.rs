//! OBJ loading and saving for the CLI.
//!
//! Each OBJ object becomes one part. Consecutive objects with the same name
//! (as produced when an object switches material, or by [`save_obj`] for
//! multi-sub-mesh parts) are merged into one part with several sub-meshes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use mesh_post::MeshBuffer;
use nalgebra::{Point3, Vector2, Vector3};
use tracing::{debug, info};

/// Load every part of an OBJ file.
pub fn load_obj(path: &Path) -> Result<Vec<MeshBuffer>> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("Failed to parse OBJ file {:?}", path))?;

    if models.is_empty() {
        bail!("OBJ file {:?} contains no objects", path);
    }

    let mut parts: Vec<MeshBuffer> = Vec::new();

    for model in &models {
        let obj_mesh = &model.mesh;
        let vertex_count = obj_mesh.positions.len() / 3;
        debug!(name = %model.name, vertices = vertex_count, "OBJ model");

        let continues_part = parts
            .last()
            .is_some_and(|part| part.name.as_deref() == Some(model.name.as_str()));
        if !continues_part {
            parts.push(MeshBuffer::new().with_name(model.name.clone()));
        }
        let Some(part) = parts.last_mut() else {
            continue;
        };

        let offset = part.vertex_count() as u32;

        // Attributes are all-or-nothing per part; a model without them pads
        // with zeros only when earlier models of the same part had them.
        let has_uvs = obj_mesh.texcoords.len() / 2 == vertex_count && vertex_count > 0;
        let has_normals = obj_mesh.normals.len() / 3 == vertex_count && vertex_count > 0;

        part.positions.extend(
            obj_mesh
                .positions
                .chunks_exact(3)
                .map(|c| Point3::new(c[0] as f64, c[1] as f64, c[2] as f64)),
        );

        if has_uvs {
            part.uvs.resize(offset as usize, Vector2::zeros());
            part.uvs.extend(
                obj_mesh
                    .texcoords
                    .chunks_exact(2)
                    .map(|c| Vector2::new(c[0] as f64, c[1] as f64)),
            );
        } else if !part.uvs.is_empty() {
            part.uvs.resize(part.positions.len(), Vector2::zeros());
        }

        if has_normals {
            part.normals.resize(offset as usize, Vector3::zeros());
            part.normals.extend(
                obj_mesh
                    .normals
                    .chunks_exact(3)
                    .map(|c| Vector3::new(c[0] as f64, c[1] as f64, c[2] as f64)),
            );
        } else if !part.normals.is_empty() {
            part.normals.resize(part.positions.len(), Vector3::zeros());
        }

        part.sub_meshes
            .push(obj_mesh.indices.iter().map(|&i| i + offset).collect());
    }

    // A part whose later models brought normals but whose first did not
    // would otherwise have a short normal array.
    for part in &mut parts {
        if !part.normals.is_empty() {
            part.normals.resize(part.positions.len(), Vector3::zeros());
        }
    }

    info!(
        path = %path.display(),
        parts = parts.len(),
        vertices = parts.iter().map(MeshBuffer::vertex_count).sum::<usize>(),
        faces = parts.iter().map(MeshBuffer::face_count).sum::<usize>(),
        "Loaded OBJ"
    );

    Ok(parts)
}

/// Merge parts into one buffer, one sub-mesh per source sub-mesh.
///
/// UVs are kept when any part has them; parts without UVs are padded with
/// zeros. Normals and tangents are dropped. The first part's name is kept.
pub fn merge_parts(parts: Vec<MeshBuffer>) -> MeshBuffer {
    let any_uvs = parts.iter().any(|p| !p.uvs.is_empty());
    let mut merged = MeshBuffer::new();
    merged.name = parts.first().and_then(|p| p.name.clone());

    for part in parts {
        let offset = merged.vertex_count() as u32;
        merged.positions.extend(part.positions);
        if any_uvs {
            merged.uvs.extend(part.uvs);
            merged.uvs.resize(merged.positions.len(), Vector2::zeros());
        }
        merged.sub_meshes.extend(
            part.sub_meshes
                .into_iter()
                .map(|list| list.into_iter().map(|i| i + offset).collect()),
        );
    }

    merged
}

/// Save parts to an OBJ file.
///
/// Each sub-mesh is written as its own `o` block carrying the part name, so
/// [`load_obj`] reads it back with the same partition. Tangents have no OBJ
/// representation and are not written.
pub fn save_obj(parts: &[MeshBuffer], path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create output file {:?}", path))?;
    let mut writer = BufWriter::new(file);

    write_obj(parts, &mut writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write OBJ file {:?}", path))?;

    info!(path = %path.display(), parts = parts.len(), "Saved OBJ");
    Ok(())
}

fn write_obj(parts: &[MeshBuffer], writer: &mut impl Write) -> std::io::Result<()> {
    let vertices: usize = parts.iter().map(MeshBuffer::vertex_count).sum();
    let faces: usize = parts.iter().map(MeshBuffer::face_count).sum();

    writeln!(writer, "# OBJ file exported by mesh-post")?;
    writeln!(writer, "# Vertices: {}", vertices)?;
    writeln!(writer, "# Faces: {}", faces)?;

    // OBJ indices are 1-based and global across the file.
    let mut v_base = 1usize;
    let mut vt_base = 1usize;
    let mut vn_base = 1usize;

    for (part_index, part) in parts.iter().enumerate() {
        let default_name = format!("part_{}", part_index);
        let name = part.name.as_deref().unwrap_or(&default_name);

        writeln!(writer)?;
        for p in &part.positions {
            writeln!(writer, "v {:.6} {:.6} {:.6}", p.x, p.y, p.z)?;
        }

        let has_uvs = !part.uvs.is_empty();
        for uv in &part.uvs {
            writeln!(writer, "vt {:.6} {:.6}", uv.x, uv.y)?;
        }
        let has_normals = part.has_normals();
        if has_normals {
            for n in &part.normals {
                writeln!(writer, "vn {:.6} {:.6} {:.6}", n.x, n.y, n.z)?;
            }
        }

        for list in &part.sub_meshes {
            writeln!(writer, "o {}", name)?;
            for tri in list.chunks_exact(3) {
                write!(writer, "f")?;
                for &index in tri {
                    let i = index as usize;
                    let v = v_base + i;
                    // A short UV array leaves trailing vertices without UVs.
                    let vt = (has_uvs && i < part.uvs.len()).then_some(vt_base + i);
                    let vn = has_normals.then_some(vn_base + i);
                    match (vt, vn) {
                        (Some(vt), Some(vn)) => write!(writer, " {}/{}/{}", v, vt, vn)?,
                        (Some(vt), None) => write!(writer, " {}/{}", v, vt)?,
                        (None, Some(vn)) => write!(writer, " {}//{}", v, vn)?,
                        (None, None) => write!(writer, " {}", v)?,
                    }
                }
                writeln!(writer)?;
            }
        }

        v_base += part.vertex_count();
        vt_base += part.uvs.len();
        if has_normals {
            vn_base += part.normals.len();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn quad() -> MeshBuffer {
        MeshBuffer::from_faces(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            &[[0, 1, 2], [0, 2, 3]],
        )
        .with_name("quad")
    }

    #[test]
    fn test_roundtrip_positions_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.obj");

        save_obj(&[quad()], &path).unwrap();
        let parts = load_obj(&path).unwrap();

        assert_eq!(parts.len(), 1);
        let loaded = &parts[0];
        assert_eq!(loaded.name.as_deref(), Some("quad"));
        assert_eq!(loaded.face_count(), 2);
        assert!(loaded.uvs.is_empty());
        assert!(loaded.normals.is_empty());
        for (a, b) in loaded.positions.iter().zip(&quad().positions) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_roundtrip_sub_meshes_and_attributes() {
        let mut mesh = quad().with_uvs(vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ]);
        mesh.normals = vec![Vector3::z(); 4];
        let all = mesh.sub_meshes.remove(0);
        mesh.sub_meshes = vec![all[..3].to_vec(), all[3..].to_vec()];

        let other = quad().with_name("other");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parts.obj");
        save_obj(&[mesh, other], &path).unwrap();
        let parts = load_obj(&path).unwrap();

        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name.as_deref(), Some("quad"));
        assert_eq!(parts[0].sub_mesh_count(), 2);
        assert_eq!(parts[0].face_count(), 2);
        assert_eq!(parts[0].uvs.len(), parts[0].vertex_count());
        assert_eq!(parts[0].normals.len(), parts[0].vertex_count());
        for n in &parts[0].normals {
            assert_relative_eq!(*n, Vector3::z(), epsilon = 1e-6);
        }
        assert_eq!(parts[1].name.as_deref(), Some("other"));
        assert_eq!(parts[1].sub_mesh_count(), 1);
        assert!(mesh_post::validate_buffer(&parts[0]).is_ok());
    }

    #[test]
    fn test_unnamed_parts_get_placeholder_names() {
        let mut buffer = Vec::new();
        write_obj(&[quad().with_name(""), MeshBuffer::new()], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.contains("# Faces: 2"));
        assert!(text.contains("f 1 2 3"));

        let mut buffer = Vec::new();
        let mut unnamed = quad();
        unnamed.name = None;
        write_obj(&[unnamed], &mut buffer).unwrap();
        assert!(String::from_utf8(buffer).unwrap().contains("o part_0"));
    }

    #[test]
    fn test_merge_parts_offsets_indices() {
        let uv_quad = quad().with_uvs(vec![Vector2::new(0.5, 0.5); 4]);
        let mut plain = quad().with_name("plain");
        plain.normals = vec![Vector3::z(); 4];

        let merged = merge_parts(vec![uv_quad, plain]);

        assert_eq!(merged.name.as_deref(), Some("quad"));
        assert_eq!(merged.vertex_count(), 8);
        assert_eq!(merged.sub_mesh_count(), 2);
        assert_eq!(merged.sub_meshes[1], vec![4, 5, 6, 4, 6, 7]);
        assert_eq!(merged.uvs.len(), 8);
        assert_eq!(merged.uvs[7], Vector2::zeros());
        assert!(merged.normals.is_empty());
        assert!(mesh_post::validate_buffer(&merged).is_ok());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_obj(&dir.path().join("missing.obj")).is_err());
    }
}
