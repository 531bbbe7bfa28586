//! # heightmesh
//!
//! Error-bounded triangulation of height fields.
//!
//! heightmesh turns a regular grid of elevation samples into a triangle mesh
//! that approximates the surface within a given vertical error, using far
//! fewer triangles than the naive two-per-cell grid.
//!
//! ## Features
//!
//! - **Greedy refinement**: always inserts the sample the mesh approximates worst
//! - **Delaunay triangulation**: maintained incrementally with exact integer predicates
//! - **Budgets**: stop at an error threshold, a triangle count or a point count
//! - **Parallel candidate search**: new triangles are rasterized on the rayon pool
//! - **Pre-filters**: auto-level, invert, gamma, border, Gaussian blur
//! - **Export**: binary STL, Wavefront OBJ, normal maps, optional solid base
//!
//! ## Quick Start
//!
//! ```no_run
//! use heightmesh::prelude::*;
//!
//! // Load a 16-bit (or 8-bit) grayscale image
//! let hm = Heightmap::load("terrain.png").unwrap();
//!
//! // Refine until the worst sample is within 0.5% of full scale
//! let options = TriangulateOptions::default().with_max_error(0.005);
//! let tri = triangulate(&hm, &options);
//! println!("{} points, {} triangles", tri.num_points(), tri.num_triangles());
//!
//! // Save the mesh, scaling heights to 100 units
//! heightmesh::io::save("terrain.stl", &tri.points(100.0), &tri.triangles()).unwrap();
//! ```
//!
//! ## Stepping Manually
//!
//! ```
//! use heightmesh::prelude::*;
//!
//! let hm = Heightmap::from_fn(9, 9, |x, y| if (x, y) == (3, 5) { 1.0 } else { 0.0 }).unwrap();
//! let mut tri = Triangulator::new(&hm);
//! assert_eq!(tri.error(), 1.0);
//!
//! let kind = tri.step();
//! assert_eq!(kind, Some(StepKind::Interior));
//! assert_eq!(tri.num_points(), 5);
//! assert_eq!(tri.num_triangles(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod geometry;
pub mod heightmap;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use heightmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::triangulate::{
        triangulate, triangulate_with_progress, StepKind, TriangulateOptions, Triangulator,
    };
    pub use crate::algo::Progress;
    pub use crate::error::{HeightmeshError, Result};
    pub use crate::geometry::GridPoint;
    pub use crate::heightmap::{Candidate, Heightmap};
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_pipeline() {
        let mut hm = Heightmap::from_fn(40, 30, |x, y| ((x as f32) * 0.2).sin() + (y as f32) * 0.05)
            .unwrap();
        hm.auto_level();
        hm.add_border(2, 0.0);
        assert_eq!((hm.width(), hm.height()), (44, 34));

        let tri = triangulate(&hm, &TriangulateOptions::default().with_max_error(0.02));
        assert!(tri.error() <= 0.02);
        assert!(tri.mesh().is_valid());
        assert!(tri.mesh().is_delaunay());

        let mut points = tri.points(5.0);
        let mut triangles = tri.triangles();
        crate::algo::base::add_base(&mut points, &mut triangles, hm.width(), hm.height(), -1.0);

        let mut buffer = Vec::new();
        crate::io::stl::write(&mut buffer, &points, &triangles).unwrap();
        assert_eq!(buffer.len(), 84 + 50 * triangles.len());
    }
}
