//! STL (stereolithography) format support.
//!
//! This module provides saving of meshes in the binary STL format, commonly
//! used for 3D printing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use crate::error::{HeightmeshError, Result};

use super::face_normal;

fn to_stl(points: &[Point3<f32>], triangles: &[[usize; 3]]) -> Vec<stl_io::Triangle> {
    triangles
        .iter()
        .map(|&[a, b, c]| {
            let (p0, p1, p2) = (&points[a], &points[b], &points[c]);
            let n = face_normal(p0, p1, p2);

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x, n.y, n.z]),
                vertices: [
                    stl_io::Vertex::new([p0.x, p0.y, p0.z]),
                    stl_io::Vertex::new([p1.x, p1.y, p1.z]),
                    stl_io::Vertex::new([p2.x, p2.y, p2.z]),
                ],
            }
        })
        .collect()
}

/// Write a mesh as binary STL.
pub fn write<W: Write>(writer: &mut W, points: &[Point3<f32>], triangles: &[[usize; 3]]) -> Result<()> {
    let faces = to_stl(points, triangles);
    stl_io::write_stl(writer, faces.iter())?;
    Ok(())
}

/// Save a mesh to a binary STL file.
///
/// # Example
///
/// ```no_run
/// use heightmesh::io::stl;
/// use nalgebra::Point3;
///
/// let points = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// stl::save("output.stl", &points, &[[0, 1, 2]]).unwrap();
/// ```
pub fn save<P: AsRef<Path>>(path: P, points: &[Point3<f32>], triangles: &[[usize; 3]]) -> Result<()> {
    let path = path.as_ref();
    let save_error = |message: String| HeightmeshError::SaveError {
        path: path.to_path_buf(),
        message,
    };

    let file = File::create(path).map_err(|e| save_error(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer, points, triangles).map_err(|e| save_error(e.to_string()))?;
    writer.flush().map_err(|e| save_error(e.to_string()))?;

    log::debug!("wrote {} triangles to {}", triangles.len(), path.display());
    Ok(())
}
