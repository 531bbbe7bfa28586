//! Tangent-free normal maps derived from the height field.

use std::path::Path;

use nalgebra::{Point3, Vector3};

use super::Heightmap;
use crate::error::{HeightmeshError, Result};

fn triangle_normal(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Vector3<f32> {
    (a - b).cross(&(a - c)).normalize()
}

impl Heightmap {
    /// Compute one unit normal per grid cell.
    ///
    /// Each cell is split into four triangles fanned around its center and
    /// the normal is the normalized sum of theirs. The result has
    /// `(width - 1) * (height - 1)` entries in row-major order. Heights are
    /// negated so that the map matches image-space (y down) orientation.
    pub fn normal_map(&self, z_scale: f32) -> Vec<Vector3<f32>> {
        let w = self.width.saturating_sub(1);
        let h = self.height.saturating_sub(1);
        let mut normals = Vec::with_capacity(w * h);

        for y0 in 0..h {
            let y1 = y0 + 1;
            for x0 in 0..w {
                let x1 = x0 + 1;
                let z00 = self.at(x0, y0) * -z_scale;
                let z01 = self.at(x0, y1) * -z_scale;
                let z10 = self.at(x1, y0) * -z_scale;
                let z11 = self.at(x1, y1) * -z_scale;
                let zc = (z00 + z01 + z10 + z11) / 4.0;

                let (fx0, fy0, fx1, fy1) = (x0 as f32, y0 as f32, x1 as f32, y1 as f32);
                let p00 = Point3::new(fx0, fy0, z00);
                let p01 = Point3::new(fx0, fy1, z01);
                let p10 = Point3::new(fx1, fy0, z10);
                let p11 = Point3::new(fx1, fy1, z11);
                let pc = Point3::new(fx0 + 0.5, fy0 + 0.5, zc);

                let n = triangle_normal(pc, p00, p10)
                    + triangle_normal(pc, p10, p11)
                    + triangle_normal(pc, p11, p01)
                    + triangle_normal(pc, p01, p00);
                normals.push(n.normalize());
            }
        }

        normals
    }

    /// Write the normal map as an 8-bit RGB image.
    ///
    /// Components are remapped from `[-1, 1]` to `[0, 255]`. The format is
    /// chosen from the file extension.
    pub fn save_normal_map<P: AsRef<Path>>(&self, path: P, z_scale: f32) -> Result<()> {
        let path = path.as_ref();
        if self.width < 2 || self.height < 2 {
            return Err(HeightmeshError::invalid_param(
                "heightmap",
                format!("{}x{}", self.width, self.height),
                "a normal map needs at least 2x2 samples",
            ));
        }

        let data: Vec<u8> = self
            .normal_map(z_scale)
            .iter()
            .flat_map(|n| {
                let n = n.map(|c| ((c + 1.0) / 2.0 * 255.0) as u8);
                [n.x, n.y, n.z]
            })
            .collect();

        let save_error = |message: String| HeightmeshError::SaveError {
            path: path.to_path_buf(),
            message,
        };

        let (w, h) = ((self.width - 1) as u32, (self.height - 1) as u32);
        let image = image::RgbImage::from_raw(w, h, data)
            .ok_or_else(|| save_error("normal map buffer size mismatch".to_string()))?;
        image.save(path).map_err(|e| save_error(e.to_string()))?;

        log::debug!("wrote {}x{} normal map to {}", w, h, path.display());
        Ok(())
    }
}
