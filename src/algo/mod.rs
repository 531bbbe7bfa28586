//! Triangulation algorithms.
//!
//! This module contains the height-field triangulator and the algorithms
//! that post-process its output:
//!
//! - **Triangulation**: greedy Delaunay refinement under error and size budgets
//! - **Solid base**: walls and floor that close the surface into a printable solid
//! - **Progress**: callback-based progress reporting for long runs

pub mod base;
pub mod progress;
pub mod triangulate;

pub use progress::Progress;
