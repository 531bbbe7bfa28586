//! Progress reporting for long-running algorithms.
//!
//! This module provides a simple progress callback mechanism that algorithms
//! can use to report their progress to callers.
//!
//! # Example
//!
//! ```
//! use heightmesh::algo::progress::Progress;
//! use heightmesh::algo::triangulate::{triangulate_with_progress, TriangulateOptions};
//! use heightmesh::heightmap::Heightmap;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//!
//! let hm = Heightmap::from_fn(32, 32, |x, y| ((x * y) % 7) as f32 / 7.0).unwrap();
//! let options = TriangulateOptions::default().with_max_error(0.1);
//! let tri = triangulate_with_progress(&hm, &options, &progress);
//! assert!(tri.error() <= 0.1);
//! ```

/// A progress callback that receives updates during long-running operations.
///
/// The callback receives:
/// - `current`: Amount of work done
/// - `total`: Amount of work at completion
/// - `message`: Description of the current operation
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// Report a completed fraction as per-mille of work done.
    #[inline]
    pub fn report_fraction(&self, fraction: f32, message: &str) {
        let permille = (fraction.clamp(0.0, 1.0) * 1000.0) as usize;
        self.report(permille, 1000, message);
    }

    /// Create a no-op progress reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}
