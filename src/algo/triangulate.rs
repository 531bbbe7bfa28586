//! Greedy Delaunay refinement of a height field.
//!
//! The triangulator starts from the two triangles spanning the grid and
//! repeatedly inserts the sample with the largest vertical error, i.e. the
//! point where the piecewise-linear surface disagrees most with the data.
//! After each insertion the affected region is re-triangulated and edge
//! flips restore the Delaunay property, so the mesh is always a Delaunay
//! triangulation of the points inserted so far.
//!
//! # Algorithm
//!
//! 1. Pop the triangle with the largest error from the refinement queue
//! 2. Insert its candidate point:
//!    - strictly inside: split into three triangles
//!    - on a shared edge: split both neighbors into four triangles
//!    - on the grid boundary: split into two triangles
//! 3. Legalize the outer edges of the new triangles by flipping
//! 4. Rasterize every new triangle to find its own candidate
//!
//! Mutation is strictly sequential. Only step 4 fans out over the rayon
//! pool, and it is joined before the next step begins.
//!
//! # Example
//!
//! ```
//! use heightmesh::algo::triangulate::{triangulate, TriangulateOptions};
//! use heightmesh::heightmap::Heightmap;
//!
//! let hm = Heightmap::from_fn(65, 65, |x, y| {
//!     let (dx, dy) = (x as f32 - 32.0, y as f32 - 32.0);
//!     (-(dx * dx + dy * dy) / 200.0).exp()
//! })
//! .unwrap();
//!
//! let tri = triangulate(&hm, &TriangulateOptions::default().with_max_error(0.01));
//! assert!(tri.error() <= 0.01);
//!
//! let points = tri.points(10.0);
//! for [a, b, c] in tri.triangles() {
//!     assert!(a < points.len() && b < points.len() && c < points.len());
//! }
//! ```

use nalgebra::Point3;

use crate::geometry::{collinear, GridPoint};
use crate::heightmap::Heightmap;
use crate::mesh::{HalfEdgeId, Mesh, PointId, RefinementQueue, TriangleId};

use super::Progress;

/// Total bounding-box area (in samples) of a pending batch above which
/// candidate search runs on the thread pool.
const PARALLEL_FLUSH_AREA: i64 = 1 << 14;

/// Options for height-field triangulation.
///
/// Refinement stops as soon as any limit is reached. A budget of zero means
/// unlimited.
#[derive(Debug, Clone)]
pub struct TriangulateOptions {
    /// Stop once the worst vertical error is at most this value.
    pub max_error: f32,

    /// Stop once the mesh has at least this many triangles (0 = no limit).
    pub max_triangles: usize,

    /// Stop once the mesh has at least this many points (0 = no limit).
    pub max_points: usize,

    /// Whether to search new triangles' candidates in parallel (default: true).
    pub parallel: bool,
}

impl Default for TriangulateOptions {
    fn default() -> Self {
        Self {
            max_error: 0.001,
            max_triangles: 0,
            max_points: 0,
            parallel: true,
        }
    }
}

impl TriangulateOptions {
    /// Create options with the specified error threshold.
    pub fn with_max_error(mut self, max_error: f32) -> Self {
        self.max_error = max_error.max(0.0);
        self
    }

    /// Create options with the specified triangle budget.
    pub fn with_max_triangles(mut self, max_triangles: usize) -> Self {
        self.max_triangles = max_triangles;
        self
    }

    /// Create options with the specified point budget.
    pub fn with_max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

/// How a refinement step inserted its point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    /// Strictly inside a triangle: one triangle became three.
    Interior,
    /// On an edge shared by two triangles: two triangles became four.
    EdgeSplit,
    /// On a boundary edge: one triangle became two.
    BoundarySplit,
}

/// Incremental height-field triangulator.
#[derive(Debug)]
pub struct Triangulator<'a> {
    heightmap: &'a Heightmap,
    mesh: Mesh,
    queue: RefinementQueue,
    /// Edges waiting for a legality check.
    edge_stack: Vec<HalfEdgeId>,
    parallel: bool,
}

impl<'a> Triangulator<'a> {
    /// Start a triangulation of `heightmap` from its two corner triangles.
    pub fn new(heightmap: &'a Heightmap) -> Self {
        let mut tri = Self {
            heightmap,
            mesh: Mesh::new(),
            queue: RefinementQueue::new(),
            edge_stack: Vec::new(),
            parallel: true,
        };

        let x1 = heightmap.width() as i32 - 1;
        let y1 = heightmap.height() as i32 - 1;
        let p0 = tri.mesh.add_point(GridPoint::new(0, 0));
        let p1 = tri.mesh.add_point(GridPoint::new(x1, 0));
        let p2 = tri.mesh.add_point(GridPoint::new(0, y1));
        let p3 = tri.mesh.add_point(GridPoint::new(x1, y1));

        let none = HalfEdgeId::invalid();
        let t0 = tri.add_triangle(p3, p0, p2, none, none, none, None);
        tri.add_triangle(p0, p3, p1, t0.halfedge(0), none, none, None);
        tri.flush();
        tri
    }

    /// Enable or disable parallel candidate search.
    pub fn set_parallel(&mut self, parallel: bool) {
        self.parallel = parallel;
    }

    /// The height field being approximated.
    #[inline]
    pub fn heightmap(&self) -> &'a Heightmap {
        self.heightmap
    }

    /// The current triangulation.
    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Largest vertical error over all triangles, zero when nothing is left
    /// to refine.
    #[inline]
    pub fn error(&self) -> f32 {
        self.queue.max_error()
    }

    /// Number of inserted points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.mesh.num_points()
    }

    /// Number of triangles in the current triangulation.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.queue.len()
    }

    /// Refine until the error, triangle or point limit is reached.
    ///
    /// A budget of zero is unlimited. Also stops once the mesh reproduces
    /// the height field exactly.
    pub fn run(&mut self, max_error: f32, max_triangles: usize, max_points: usize) {
        while self.should_continue(max_error, max_triangles, max_points) {
            if self.step().is_none() {
                break;
            }
        }
        log::debug!(
            "refined to error {} with {} points, {} triangles",
            self.error(),
            self.num_points(),
            self.num_triangles()
        );
    }

    /// Refine according to `options`, reporting progress.
    ///
    /// Progress is the larger of the fraction of error removed and the
    /// fraction of any budget used, in per-mille.
    pub fn run_with_options(&mut self, options: &TriangulateOptions, progress: &Progress) {
        const MESSAGE: &str = "Refining";

        self.parallel = options.parallel;
        let initial_error = self.error();
        let mut last = None;

        while self.should_continue(options.max_error, options.max_triangles, options.max_points) {
            if self.step().is_none() {
                break;
            }
            let fraction = self.completion(options, initial_error);
            let permille = (fraction * 1000.0) as usize;
            if last != Some(permille) {
                progress.report_fraction(fraction, MESSAGE);
                last = Some(permille);
            }
        }
        progress.report_fraction(1.0, MESSAGE);

        log::debug!(
            "refined from error {} to {} with {} points, {} triangles",
            initial_error,
            self.error(),
            self.num_points(),
            self.num_triangles()
        );
    }

    /// Insert the worst candidate and restore the Delaunay property.
    ///
    /// Returns `None` without touching the mesh when the queue is empty or
    /// every triangle already reproduces its samples exactly.
    pub fn step(&mut self) -> Option<StepKind> {
        if self.queue.max_error() == 0.0 {
            return None;
        }
        let t = self.queue.pop()?;

        let [e0, e1, e2] = t.halfedges();
        let [a, b, c] = self.mesh.triangle_points(t);
        let p = self.queue.candidate(t);
        let pn = self.mesh.add_point(p);

        let kind = if collinear(a, b, p) {
            self.split_edge(pn, e0)
        } else if collinear(b, c, p) {
            self.split_edge(pn, e1)
        } else if collinear(c, a, p) {
            self.split_edge(pn, e2)
        } else {
            self.split_interior(pn, t);
            StepKind::Interior
        };

        self.flush();
        Some(kind)
    }

    /// All points in insertion order as `(x, height - 1 - y, z)`, with `z`
    /// the sample scaled by `z_scale`.
    pub fn points(&self, z_scale: f32) -> Vec<Point3<f32>> {
        let y1 = self.heightmap.height() as f32 - 1.0;
        self.mesh
            .points()
            .iter()
            .map(|&p| {
                let z = self.heightmap.at_point(p) * z_scale;
                Point3::new(p.x as f32, y1 - p.y as f32, z)
            })
            .collect()
    }

    /// Point indices of every triangle.
    pub fn triangles(&self) -> Vec<[usize; 3]> {
        self.queue
            .iter()
            .map(|t| self.mesh.triangle(t).map(PointId::index))
            .collect()
    }

    fn should_continue(&self, max_error: f32, max_triangles: usize, max_points: usize) -> bool {
        let error = self.error();
        error > max_error
            && error != 0.0
            && (max_triangles == 0 || self.num_triangles() < max_triangles)
            && (max_points == 0 || self.num_points() < max_points)
    }

    fn completion(&self, options: &TriangulateOptions, initial_error: f32) -> f32 {
        let mut fraction: f32 = 0.0;
        if initial_error > options.max_error {
            let removed = initial_error - self.error();
            fraction = removed / (initial_error - options.max_error);
        }
        if options.max_triangles > 0 {
            fraction = fraction.max(self.num_triangles() as f32 / options.max_triangles as f32);
        }
        if options.max_points > 0 {
            fraction = fraction.max(self.num_points() as f32 / options.max_points as f32);
        }
        fraction.clamp(0.0, 1.0)
    }

    // ==================== Retriangulation ====================

    /// Split popped triangle `t` around strictly interior point `pn`.
    fn split_interior(&mut self, pn: PointId, t: TriangleId) {
        let [e0, e1, e2] = t.halfedges();
        let [p0, p1, p2] = self.mesh.triangle(t);
        let h0 = self.mesh.opposite(e0);
        let h1 = self.mesh.opposite(e1);
        let h2 = self.mesh.opposite(e2);

        self.mesh.retire(t);

        let none = HalfEdgeId::invalid();
        let t0 = self.add_triangle(p0, p1, pn, h0, none, none, Some(t));
        let t1 = self.add_triangle(p1, p2, pn, h1, none, t0.halfedge(1), None);
        let t2 = self.add_triangle(p2, p0, pn, h2, t0.halfedge(2), t1.halfedge(1), None);

        self.legalize(&[t0.halfedge(0), t1.halfedge(0), t2.halfedge(0)]);
    }

    /// Split at point `pn` lying on edge `a` of the popped triangle.
    //
    //           pl                    pl
    //          /||\                  /|\
    //       al/ || \bl            al/ | \bl
    //        /  ||  \              /  |  \
    //       /  a||b  \   split    /___pn__\
    //     p0\   ||   /p1   =>   p0\   |   /p1
    //        \  ||  /              \  |  /
    //       ar\ || /br            ar\ | /br
    //          \||/                  \|/
    //           pr                    pr
    fn split_edge(&mut self, pn: PointId, a: HalfEdgeId) -> StepKind {
        let t = a.triangle();
        let al = a.next();
        let ar = a.prev();
        let p0 = self.mesh.corner(ar);
        let pr = self.mesh.corner(a);
        let pl = self.mesh.corner(al);
        let hal = self.mesh.opposite(al);
        let har = self.mesh.opposite(ar);
        let none = HalfEdgeId::invalid();

        let b = self.mesh.opposite(a);
        if !b.is_valid() {
            self.mesh.retire(t);

            let t0 = self.add_triangle(pn, p0, pr, none, har, none, Some(t));
            let t1 = self.add_triangle(p0, pn, pl, t0.halfedge(0), none, hal, None);

            self.legalize(&[t0.halfedge(1), t1.halfedge(2)]);
            return StepKind::BoundarySplit;
        }

        let s = b.triangle();
        let bl = b.prev();
        let br = b.next();
        let p1 = self.mesh.corner(bl);
        let hbl = self.mesh.opposite(bl);
        let hbr = self.mesh.opposite(br);

        self.queue.remove(s);
        self.mesh.retire(t);
        self.mesh.retire(s);

        let t0 = self.add_triangle(p0, pr, pn, har, none, none, Some(t));
        let t1 = self.add_triangle(pr, p1, pn, hbr, none, t0.halfedge(1), Some(s));
        let t2 = self.add_triangle(p1, pl, pn, hbl, none, t1.halfedge(1), None);
        let t3 = self.add_triangle(pl, p0, pn, hal, t0.halfedge(2), t2.halfedge(1), None);

        self.legalize(&[
            t0.halfedge(0),
            t1.halfedge(0),
            t2.halfedge(0),
            t3.halfedge(0),
        ]);
        StepKind::EdgeSplit
    }

    /// Flip illegal edges until every checked edge is locally Delaunay.
    ///
    /// Edges are processed depth-first: the two far edges produced by a
    /// flip are checked before the remaining edges of `edges`.
    fn legalize(&mut self, edges: &[HalfEdgeId]) {
        debug_assert!(self.edge_stack.is_empty());
        self.edge_stack.extend(edges.iter().rev());

        while let Some(a) = self.edge_stack.pop() {
            if self.mesh.is_legal(a) {
                continue;
            }
            let b = self.mesh.opposite(a);
            self.queue.remove(a.triangle());
            self.queue.remove(b.triangle());

            let [t0, t1] = self.mesh.flip(a);
            self.queue.mark_pending(t0);
            self.queue.mark_pending(t1);

            self.edge_stack.push(t1.halfedge(2));
            self.edge_stack.push(t0.halfedge(1));
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn add_triangle(
        &mut self,
        a: PointId,
        b: PointId,
        c: PointId,
        ab: HalfEdgeId,
        bc: HalfEdgeId,
        ca: HalfEdgeId,
        reuse: Option<TriangleId>,
    ) -> TriangleId {
        let t = self.mesh.add_triangle(a, b, c, ab, bc, ca, reuse);
        self.queue.mark_pending(t);
        t
    }

    /// Search candidates for all pending triangles and queue them.
    fn flush(&mut self) -> usize {
        let parallel = self.parallel && self.pending_area() >= PARALLEL_FLUSH_AREA;
        let mesh = &self.mesh;
        let heightmap = self.heightmap;
        let n = self.queue.flush(parallel, |t| {
            let [a, b, c] = mesh.triangle_points(t);
            heightmap.find_candidate(a, b, c)
        });
        log::trace!("flushed {} triangles (parallel: {})", n, parallel);
        n
    }

    /// Sum of the bounding-box areas of the pending triangles.
    fn pending_area(&self) -> i64 {
        self.queue
            .pending()
            .iter()
            .map(|&t| {
                let [a, b, c] = self.mesh.triangle_points(t);
                let w = a.x.max(b.x).max(c.x) - a.x.min(b.x).min(c.x) + 1;
                let h = a.y.max(b.y).max(c.y) - a.y.min(b.y).min(c.y) + 1;
                w as i64 * h as i64
            })
            .sum()
    }
}

/// Triangulate a height field according to `options`.
pub fn triangulate<'a>(heightmap: &'a Heightmap, options: &TriangulateOptions) -> Triangulator<'a> {
    triangulate_with_progress(heightmap, options, &Progress::none())
}

/// Triangulate a height field according to `options`, reporting progress.
pub fn triangulate_with_progress<'a>(
    heightmap: &'a Heightmap,
    options: &TriangulateOptions,
    progress: &Progress,
) -> Triangulator<'a> {
    let mut tri = Triangulator::new(heightmap);
    tri.run_with_options(options, progress);
    tri
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::orient;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn terrain(width: usize, height: usize) -> Heightmap {
        Heightmap::from_fn(width, height, |x, y| {
            let (x, y) = (x as f32, y as f32);
            0.5 + 0.25 * (x * 0.31).sin() * (y * 0.17).cos() + 0.2 * ((x + 2.0 * y) * 0.05).sin()
        })
        .unwrap()
    }

    /// Sparse unit spikes on a zero background.
    fn spikes(width: usize, height: usize) -> Heightmap {
        Heightmap::from_fn(width, height, |x, y| {
            if x % 5 == 2 && y % 7 == 3 {
                1.0
            } else {
                0.0
            }
        })
        .unwrap()
    }

    /// 3x3 field with a peak in the middle and `mid` on the edge midpoints.
    fn peak(mid: f32) -> Heightmap {
        #[rustfmt::skip]
        let data = vec![
            0.0, mid, 0.0,
            mid, 1.0, mid,
            0.0, mid, 0.0,
        ];
        Heightmap::new(3, 3, data).unwrap()
    }

    fn assert_consistent(tri: &Triangulator) {
        assert!(tri.mesh.is_valid(), "half-edge links are inconsistent");
        assert!(tri.mesh.is_delaunay(), "mesh is not locally Delaunay");
        assert!(tri.queue.is_heap(), "queue is not a heap");
        assert_eq!(tri.queue.num_pending(), 0);
        assert_eq!(tri.num_triangles(), tri.mesh.num_triangles());
    }

    #[test]
    fn test_initial_state() {
        let hm = terrain(17, 9);
        let tri = Triangulator::new(&hm);
        assert_eq!(tri.num_points(), 4);
        assert_eq!(tri.num_triangles(), 2);
        assert_consistent(&tri);

        let points = tri.points(2.0);
        assert_eq!(points[0], Point3::new(0.0, 8.0, hm.at(0, 0) * 2.0));
        assert_eq!(points[1], Point3::new(16.0, 8.0, hm.at(16, 0) * 2.0));
        assert_eq!(points[2], Point3::new(0.0, 0.0, hm.at(0, 8) * 2.0));
        assert_eq!(points[3], Point3::new(16.0, 0.0, hm.at(16, 8) * 2.0));
    }

    #[test]
    fn test_flat_field_terminates_immediately() {
        let hm = Heightmap::new(16, 16, vec![0.7; 256]).unwrap();
        let mut tri = Triangulator::new(&hm);
        assert_eq!(tri.error(), 0.0);
        assert_eq!(tri.step(), None);

        tri.run(0.0, 0, 0);
        assert_eq!(tri.num_points(), 4);
        assert_eq!(tri.num_triangles(), 2);
        assert_eq!(tri.triangles().len(), 2);
    }

    #[test]
    fn test_flat_fields_have_no_rounding_error() {
        for v in [0.25, 0.7, 1.0, 0.123_456_7] {
            let hm = Heightmap::new(16, 16, vec![v; 256]).unwrap();
            let mut tri = Triangulator::new(&hm);
            assert_eq!(tri.error(), 0.0, "level {}", v);
            tri.run(0.0, 0, 0);
            assert_eq!((tri.num_points(), tri.num_triangles()), (4, 2));
        }
    }

    #[test]
    fn test_planar_field_terminates_with_zero_threshold() {
        let hm = Heightmap::from_fn(17, 17, |x, y| (x + 2 * y) as f32 / 64.0).unwrap();
        let mut tri = Triangulator::new(&hm);
        assert_eq!(tri.error(), 0.0);

        tri.run(0.0, 0, 0);
        assert_eq!(tri.num_points(), 4);
        assert_eq!(tri.num_triangles(), 2);
    }

    #[test]
    fn test_peak_splits_shared_diagonal() {
        let hm = peak(0.0);
        let mut tri = Triangulator::new(&hm);
        assert_eq!(tri.error(), 1.0);

        assert_eq!(tri.step(), Some(StepKind::EdgeSplit));
        assert_eq!(tri.mesh.points()[4], GridPoint::new(1, 1));
        assert_eq!(tri.num_triangles(), 4);
        assert_eq!(tri.error(), 0.0);
        assert_consistent(&tri);

        tri.run(0.0, 0, 0);
        assert_eq!(tri.num_points(), 5);
        assert_eq!(tri.num_triangles(), 4);
    }

    #[test]
    fn test_peak_with_ridges_fills_grid() {
        let hm = peak(0.25);
        let mut tri = Triangulator::new(&hm);

        let mut kinds = Vec::new();
        while let Some(kind) = tri.step() {
            kinds.push(kind);
            assert_consistent(&tri);
        }

        assert_eq!(kinds[0], StepKind::EdgeSplit);
        assert_eq!(&kinds[1..], &[StepKind::BoundarySplit; 4]);
        assert_eq!(tri.num_points(), 9);
        assert_eq!(tri.num_triangles(), 8);
        assert_eq!(tri.error(), 0.0);
    }

    #[test]
    fn test_invariants_hold_after_every_step() {
        let hm = terrain(41, 33);
        let mut tri = Triangulator::new(&hm);
        tri.set_parallel(false);

        let (mut interior, mut edge, mut boundary) = (0, 0, 0);
        for k in 1..=200 {
            match tri.step() {
                Some(StepKind::Interior) => interior += 1,
                Some(StepKind::EdgeSplit) => edge += 1,
                Some(StepKind::BoundarySplit) => boundary += 1,
                None => break,
            }
            assert_consistent(&tri);
            assert_eq!(tri.num_points(), 4 + k);
            assert_eq!(tri.num_triangles(), 2 + 2 * (interior + edge) + boundary);
        }
        assert!(interior > 0);
    }

    #[test]
    fn test_error_bound_on_unit_spikes() {
        let hm = spikes(30, 30);
        let mut tri = Triangulator::new(&hm);
        let initial = tri.error();
        assert_eq!(initial, 1.0);

        while tri.step().is_some() {
            assert!(tri.error() <= initial + 1e-5);
            assert!(tri.mesh.is_delaunay());
        }
        assert_eq!(tri.error(), 0.0);
        assert_consistent(&tri);
    }

    #[test]
    fn test_triangles_are_valid_and_oriented() {
        let hm = terrain(50, 40);
        let mut tri = Triangulator::new(&hm);
        tri.run(0.01, 0, 0);

        let points = tri.mesh.points();
        let triangles = tri.triangles();
        assert_eq!(triangles.len(), tri.num_triangles());
        for [a, b, c] in triangles {
            assert!(a < points.len() && b < points.len() && c < points.len());
            assert!(orient(points[a], points[b], points[c]) > 0);
        }
    }

    #[test]
    fn test_run_respects_error_threshold() {
        let hm = terrain(64, 64);
        let mut tri = Triangulator::new(&hm);
        tri.run(0.02, 0, 0);
        assert!(tri.error() <= 0.02);
        assert_consistent(&tri);
    }

    #[test]
    fn test_run_respects_point_budget() {
        let hm = terrain(64, 64);
        let mut tri = Triangulator::new(&hm);
        tri.run(0.0, 0, 50);
        assert_eq!(tri.num_points(), 50);
        assert!(tri.error() > 0.0);
    }

    #[test]
    fn test_run_respects_triangle_budget() {
        let hm = terrain(64, 64);
        let mut tri = Triangulator::new(&hm);
        tri.run(0.0, 100, 0);
        // One step adds at most two triangles.
        assert!(tri.num_triangles() >= 100 && tri.num_triangles() <= 101);
    }

    #[test]
    fn test_flip_during_refinement() {
        // Spikes next to the long diagonal of a wide field; inserting them
        // leaves thin triangles whose edges have to be flipped.
        let hm = Heightmap::from_fn(33, 9, |x, y| {
            if (x, y) == (16, 3) || (x, y) == (4, 7) {
                1.0
            } else {
                0.0
            }
        })
        .unwrap();
        let mut tri = Triangulator::new(&hm);
        while tri.step().is_some() {
            assert_consistent(&tri);
            // Every retired slot is taken again within the same step.
            assert_eq!(tri.mesh.num_slots(), tri.num_triangles());
        }
        assert_eq!(tri.error(), 0.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let hm = terrain(160, 130);
        let options = TriangulateOptions::default().with_max_points(400);

        let par = triangulate(&hm, &options.clone().with_parallel(true));
        let seq = triangulate(&hm, &options.sequential());

        assert_eq!(par.triangles(), seq.triangles());
        assert_eq!(par.points(1.0), seq.points(1.0));
        assert_eq!(par.error(), seq.error());
    }

    #[test]
    fn test_progress_reaches_completion() {
        let hm = terrain(48, 48);
        let last = Arc::new(AtomicUsize::new(0));
        let calls = Arc::new(AtomicUsize::new(0));
        let (l, c) = (Arc::clone(&last), Arc::clone(&calls));
        let progress = Progress::new(move |current, total, _| {
            assert_eq!(total, 1000);
            l.store(current, Ordering::SeqCst);
            c.fetch_add(1, Ordering::SeqCst);
        });

        let options = TriangulateOptions::default().with_max_error(0.05);
        let tri = triangulate_with_progress(&hm, &options, &progress);
        assert!(tri.error() <= 0.05);
        assert_eq!(last.load(Ordering::SeqCst), 1000);
        assert!(calls.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn test_options_builder() {
        let options = TriangulateOptions::default();
        assert_eq!(options.max_error, 0.001);
        assert_eq!(options.max_triangles, 0);
        assert!(options.parallel);

        let options = options
            .with_max_error(-1.0)
            .with_max_triangles(10)
            .with_max_points(20)
            .sequential();
        assert_eq!(options.max_error, 0.0);
        assert_eq!(options.max_triangles, 10);
        assert_eq!(options.max_points, 20);
        assert!(!options.parallel);
    }

    #[test]
    fn test_single_row_is_degenerate() {
        let hm = Heightmap::from_fn(8, 1, |x, _| x as f32).unwrap();
        let mut tri = Triangulator::new(&hm);
        assert_eq!(tri.error(), 0.0);
        tri.run(0.0, 0, 0);
        assert_eq!(tri.num_points(), 4);
    }
}
