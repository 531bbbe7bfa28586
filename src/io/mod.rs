//! Mesh file export.
//!
//! This module provides functions for saving triangulated height fields in
//! various formats. Meshes are passed as indexed triangle lists, exactly as
//! produced by [`Triangulator::points`](crate::algo::triangulate::Triangulator::points)
//! and [`Triangulator::triangles`](crate::algo::triangulate::Triangulator::triangles).
//!
//! # Supported Formats
//!
//! | Format | Extension | Notes |
//! |--------|-----------|-------|
//! | STL | `.stl` | Binary, per-face normals |
//! | Wavefront OBJ | `.obj` | Y-up, per-face normals |
//!
//! # Usage
//!
//! The easiest way to save meshes is using the automatic format detection:
//!
//! ```no_run
//! use heightmesh::algo::triangulate::{triangulate, TriangulateOptions};
//! use heightmesh::heightmap::Heightmap;
//! use heightmesh::io::save;
//!
//! let hm = Heightmap::load("terrain.png").unwrap();
//! let tri = triangulate(&hm, &TriangulateOptions::default());
//!
//! // Save with automatic format detection
//! save("terrain.stl", &tri.points(50.0), &tri.triangles()).unwrap();
//! ```
//!
//! You can also use format-specific functions:
//!
//! ```no_run
//! # use nalgebra::Point3;
//! use heightmesh::io::obj;
//!
//! # let points: Vec<Point3<f32>> = Vec::new();
//! # let triangles: Vec<[usize; 3]> = Vec::new();
//! obj::save("terrain.obj", &points, &triangles).unwrap();
//! ```

pub mod obj;
pub mod stl;

use std::path::Path;

use nalgebra::{Point3, Vector3};

use crate::error::Result;

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Binary STL (stereolithography) format.
    Stl,
    /// Wavefront OBJ format.
    Obj,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "stl" => Some(Format::Stl),
            "obj" => Some(Format::Obj),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

/// Save a mesh to a file with automatic format detection.
///
/// The format is determined by the file extension. Files with an unknown
/// extension are written as binary STL.
pub fn save<P: AsRef<Path>>(path: P, points: &[Point3<f32>], triangles: &[[usize; 3]]) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path).unwrap_or_else(|| {
        log::warn!("unknown mesh format for {}, writing STL", path.display());
        Format::Stl
    });

    match format {
        Format::Stl => stl::save(path, points, triangles),
        Format::Obj => obj::save(path, points, triangles),
    }
}

/// Unit normal of a triangle, zero for degenerate triangles.
pub(crate) fn face_normal(p0: &Point3<f32>, p1: &Point3<f32>, p2: &Point3<f32>) -> Vector3<f32> {
    (p1 - p0)
        .cross(&(p2 - p0))
        .try_normalize(f32::EPSILON)
        .unwrap_or_else(Vector3::zeros)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/terrain.stl"), Some(Format::Stl));
        assert_eq!(Format::from_path("terrain.OBJ"), Some(Format::Obj));
        assert_eq!(Format::from_path("terrain.ply"), None);
        assert_eq!(Format::from_path("terrain"), None);
    }

    #[test]
    fn test_face_normal() {
        let n = face_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(2.0, 0.0, 0.0),
            &Point3::new(0.0, 3.0, 0.0),
        );
        assert_eq!(n, Vector3::z());

        let degenerate = face_normal(
            &Point3::new(0.0, 0.0, 0.0),
            &Point3::new(1.0, 1.0, 1.0),
            &Point3::new(2.0, 2.0, 2.0),
        );
        assert_eq!(degenerate, Vector3::zeros());
    }
}
