//! Height fields.
//!
//! A [`Heightmap`] is a row-major grid of `f32` samples. Images are decoded
//! to 16-bit luma and scaled to `[0, 1]`. The filters in [`filter`] and
//! [`blur`] run on a mutable height field before it is handed to the
//! triangulator, which only ever reads it.
//!
//! The one performance-critical operation is [`Heightmap::find_candidate`],
//! which rasterizes a triangle and reports the sample where linear
//! interpolation of the corner heights is furthest from the data.
//!
//! # Example
//!
//! ```
//! use heightmesh::heightmap::Heightmap;
//! use heightmesh::geometry::GridPoint;
//!
//! let hm = Heightmap::from_fn(5, 5, |x, y| if (x, y) == (2, 1) { 1.0 } else { 0.0 }).unwrap();
//!
//! let c = hm.find_candidate(GridPoint::new(4, 4), GridPoint::new(0, 0), GridPoint::new(0, 4));
//! assert_eq!(c.error, 0.0); // (2, 1) lies outside this triangle
//!
//! let c = hm.find_candidate(GridPoint::new(0, 0), GridPoint::new(4, 4), GridPoint::new(4, 0));
//! assert_eq!(c.point, GridPoint::new(2, 1));
//! assert_eq!(c.error, 1.0);
//! ```

pub mod blur;
pub mod filter;
pub mod normal;

use std::path::Path;

use crate::error::{HeightmeshError, Result};
use crate::geometry::{orient, GridPoint};

/// The worst-approximated sample of a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Grid location of the largest discrepancy.
    pub point: GridPoint,
    /// Absolute difference between sample and interpolated height.
    pub error: f32,
}

/// A regular grid of elevation samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Heightmap {
    width: usize,
    height: usize,
    data: Vec<f32>,
}

impl Heightmap {
    /// Create a height field from row-major samples.
    ///
    /// Fails if the field has no samples or `data` does not hold exactly
    /// `width * height` values.
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(HeightmeshError::EmptyHeightmap { width, height });
        }
        let Some(len) = width.checked_mul(height) else {
            return Err(HeightmeshError::invalid_param(
                "width",
                width,
                "width * height overflows",
            ));
        };
        if data.len() != len {
            return Err(HeightmeshError::invalid_param(
                "data",
                data.len(),
                "sample count must equal width * height",
            ));
        }
        if width > i32::MAX as usize || height > i32::MAX as usize {
            return Err(HeightmeshError::invalid_param(
                "width",
                width.max(height),
                "dimensions must fit grid coordinates",
            ));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Create a height field by sampling `f(x, y)` at every grid point.
    pub fn from_fn<F>(width: usize, height: usize, f: F) -> Result<Self>
    where
        F: Fn(usize, usize) -> f32,
    {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        Self::new(width, height, data)
    }

    /// Load a height field from an image file.
    ///
    /// Any format the `image` crate decodes is accepted. Color images are
    /// converted to luma; samples are normalized to `[0, 1]`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use heightmesh::heightmap::Heightmap;
    ///
    /// let hm = Heightmap::load("terrain.png").unwrap();
    /// println!("{} x {}", hm.width(), hm.height());
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| match e {
            image::ImageError::Unsupported(_) => HeightmeshError::UnsupportedFormat {
                extension: path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or_default()
                    .to_string(),
            },
            e => HeightmeshError::LoadError {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        let luma = image.into_luma16();
        let (width, height) = luma.dimensions();
        let scale = 1.0 / u16::MAX as f32;
        let data = luma.into_raw().into_iter().map(|v| v as f32 * scale).collect();

        Self::new(width as usize, height as usize, data)
    }

    /// Width in samples.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in samples.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The raw row-major samples.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Sample at `(x, y)`.
    #[inline]
    pub fn at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    /// Sample at a grid point.
    #[inline]
    pub fn at_point(&self, p: GridPoint) -> f32 {
        self.at(p.x as usize, p.y as usize)
    }

    /// Find the sample inside triangle `(p0, p1, p2)` with the largest
    /// interpolation error.
    ///
    /// The triangle must follow the mesh winding (see
    /// [`geometry`](crate::geometry)). Samples on the triangle's edges count
    /// as inside. Pixels are visited row by row in ascending x, and the first
    /// maximum wins. If the result is one of the corners, or the triangle is
    /// degenerate, the error is reported as zero.
    pub fn find_candidate(&self, p0: GridPoint, p1: GridPoint, p2: GridPoint) -> Candidate {
        let area = orient(p0, p1, p2);
        if area == 0 {
            return Candidate {
                point: p0,
                error: 0.0,
            };
        }

        // triangle bounding box
        let min = GridPoint::new(p0.x.min(p1.x).min(p2.x), p0.y.min(p1.y).min(p2.y));
        let max = GridPoint::new(p0.x.max(p1.x).max(p2.x), p0.y.max(p1.y).max(p2.y));

        // edge functions at the box corner and their forward differences
        let mut w00 = orient(p1, p2, min);
        let mut w01 = orient(p2, p0, min);
        let mut w02 = orient(p0, p1, min);
        let a01 = (p1.y - p0.y) as i64;
        let b01 = (p0.x - p1.x) as i64;
        let a12 = (p2.y - p1.y) as i64;
        let b12 = (p1.x - p2.x) as i64;
        let a20 = (p0.y - p2.y) as i64;
        let b20 = (p2.x - p0.x) as i64;

        // heights relative to p0, so equal corners interpolate exactly
        let a = area as f32;
        let z0 = self.at_point(p0);
        let dz1 = self.at_point(p1) - z0;
        let dz2 = self.at_point(p2) - z0;

        let mut max_error = 0.0f32;
        let mut max_point = p0;

        for y in min.y..=max.y {
            // skip the part of the span left of the triangle
            let mut dx = 0i64;
            if w00 < 0 && a12 != 0 {
                dx = dx.max(-w00 / a12);
            }
            if w01 < 0 && a20 != 0 {
                dx = dx.max(-w01 / a20);
            }
            if w02 < 0 && a01 != 0 {
                dx = dx.max(-w02 / a01);
            }

            let mut w0 = w00 + a12 * dx;
            let mut w1 = w01 + a20 * dx;
            let mut w2 = w02 + a01 * dx;

            let row = y as usize * self.width;
            let mut was_inside = false;

            for x in (min.x as i64 + dx)..=(max.x as i64) {
                if w0 >= 0 && w1 >= 0 && w2 >= 0 {
                    was_inside = true;

                    let z = z0 + (dz1 * w1 as f32 + dz2 * w2 as f32) / a;
                    let dz = (z - self.data[row + x as usize]).abs();
                    if dz > max_error {
                        max_error = dz;
                        max_point = GridPoint::new(x as i32, y);
                    }
                } else if was_inside {
                    break;
                }

                w0 += a12;
                w1 += a20;
                w2 += a01;
            }

            w00 += b12;
            w01 += b20;
            w02 += b01;
        }

        if max_point == p0 || max_point == p1 || max_point == p2 {
            max_error = 0.0;
        }

        Candidate {
            point: max_point,
            error: max_error,
        }
    }
}
