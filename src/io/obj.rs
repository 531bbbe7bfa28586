//! Wavefront OBJ format support.
//!
//! Heights are stored along +Z in the triangulator's output, while most OBJ
//! consumers expect +Y up. Vertices and normals are therefore rotated by
//! 270 degrees about the X axis on export, `(x, y, z) -> (x, z, -y)`.
//! Every face gets its own normal, referenced with `f v//n` records.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::{HeightmeshError, Result};

use super::face_normal;

/// Name of the single object written to the file.
const OBJECT_NAME: &str = "Heightmap";

#[inline]
fn rotate(v: Vector3<f32>) -> Vector3<f32> {
    Vector3::new(v.x, v.z, -v.y)
}

/// Write a mesh as Wavefront OBJ.
pub fn write<W: Write>(writer: &mut W, points: &[Point3<f32>], triangles: &[[usize; 3]]) -> Result<()> {
    writeln!(writer, "o {}", OBJECT_NAME)?;

    writeln!(writer, "# {} Vertices", points.len())?;
    for p in points {
        let v = rotate(p.coords);
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }

    writeln!(writer, "# {} Normals", triangles.len())?;
    for &[a, b, c] in triangles {
        let n = rotate(face_normal(&points[a], &points[b], &points[c]));
        writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    // OBJ indices are 1-based
    writeln!(writer, "# {} Faces", triangles.len())?;
    for (i, &[a, b, c]) in triangles.iter().enumerate() {
        let n = i + 1;
        writeln!(writer, "f {}//{} {}//{} {}//{}", a + 1, n, b + 1, n, c + 1, n)?;
    }

    Ok(())
}

/// Save a mesh to a Wavefront OBJ file.
///
/// # Example
///
/// ```no_run
/// use heightmesh::io::obj;
/// use nalgebra::Point3;
///
/// let points = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ];
/// obj::save("output.obj", &points, &[[0, 1, 2]]).unwrap();
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
