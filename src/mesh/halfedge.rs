//! Half-edge triangle mesh over integer grid points.
//!
//! Triangles live in flat arrays: half-edge `t * 3 + k` starts at corner `k`
//! of triangle `t` and runs to corner `k + 1`. For every half-edge the mesh
//! stores its origin point and its opposite half-edge in the neighboring
//! triangle (or the invalid sentinel on the boundary).
//!
//! # Slot lifecycle
//!
//! Triangles are never removed from the arrays. [`Mesh::retire`] unlinks a
//! triangle and marks its slot free; a following [`Mesh::add_triangle`] may
//! reuse the slot. Ids captured before the retirement stay meaningful until
//! the slot is deliberately overwritten, which is what lets the triangulator
//! record neighbor links first and rebuild afterwards.
//!
//! ```text
//!           pl                    pl
//!          /||\                  /  \
//!       al/ || \bl            al/    \a
//!        /  ||  \              /      \
//!       /  a||b  \    flip    /___ar___\
//!     p0\   ||   /p1   =>   p0\---bl---/p1
//!        \  ||  /              \      /
//!       ar\ || /br             b\    /br
//!          \||/                  \  /
//!           pr                    pr
//! ```

use crate::geometry::{in_circle, GridPoint};

use super::index::{HalfEdgeId, PointId, TriangleId};

/// A triangle mesh with opposite-edge links, built over an append-only
/// point arena.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Point arena; a point's index is its identity.
    points: Vec<GridPoint>,

    /// Origin point of every half-edge.
    corners: Vec<PointId>,

    /// Opposite half-edge of every half-edge, invalid on the boundary.
    opposites: Vec<HalfEdgeId>,

    /// Whether each triangle slot currently holds a live triangle.
    live: Vec<bool>,

    num_live: usize,
}

impl Mesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Accessors ====================

    /// Get the number of points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Get the number of live triangles.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.num_live
    }

    /// Get the number of triangle slots, live or retired.
    #[inline]
    pub fn num_slots(&self) -> usize {
        self.live.len()
    }

    /// All points in insertion order.
    #[inline]
    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    /// Get a point by ID.
    #[inline]
    pub fn point(&self, id: PointId) -> GridPoint {
        self.points[id.index()]
    }

    /// Origin point of a half-edge.
    #[inline]
    pub fn corner(&self, he: HalfEdgeId) -> PointId {
        self.corners[he.index()]
    }

    /// Opposite half-edge, invalid for boundary edges.
    #[inline]
    pub fn opposite(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.opposites[he.index()]
    }

    /// Whether the slot holds a live (non-retired) triangle.
    #[inline]
    pub fn is_live(&self, t: TriangleId) -> bool {
        self.live[t.index()]
    }

    /// The three corner points of a triangle.
    #[inline]
    pub fn triangle(&self, t: TriangleId) -> [PointId; 3] {
        let [e0, e1, e2] = t.halfedges();
        [self.corner(e0), self.corner(e1), self.corner(e2)]
    }

    /// The grid coordinates of a triangle's corners.
    #[inline]
    pub fn triangle_points(&self, t: TriangleId) -> [GridPoint; 3] {
        let [a, b, c] = self.triangle(t);
        [self.point(a), self.point(b), self.point(c)]
    }

    /// Iterate over all live triangle IDs.
    pub fn live_triangles(&self) -> impl Iterator<Item = TriangleId> + '_ {
        self.live
            .iter()
            .enumerate()
            .filter(|(_, live)| **live)
            .map(|(i, _)| TriangleId::new(i))
    }

    // ==================== Mutation ====================

    /// Append a point to the arena.
    pub fn add_point(&mut self, p: GridPoint) -> PointId {
        let id = PointId::new(self.points.len());
        self.points.push(p);
        id
    }

    /// Add triangle `(a, b, c)` and link its edges `ab`, `bc`, `ca` to the
    /// given opposite half-edges (invalid for boundary edges).
    ///
    /// With `reuse`, the triangle is written into that retired slot instead
    /// of a new one.
    ///
    /// # Panics
    ///
    /// Panics if `reuse` names a live slot.
    #[allow(clippy::too_many_arguments)]
    pub fn add_triangle(
        &mut self,
        a: PointId,
        b: PointId,
        c: PointId,
        ab: HalfEdgeId,
        bc: HalfEdgeId,
        ca: HalfEdgeId,
        reuse: Option<TriangleId>,
    ) -> TriangleId {
        let t = match reuse {
            Some(t) => {
                assert!(!self.is_live(t), "cannot reuse live triangle slot {:?}", t);
                t
            }
            None => {
                let t = TriangleId::new(self.live.len());
                self.corners.extend([PointId::invalid(); 3]);
                self.opposites.extend([HalfEdgeId::invalid(); 3]);
                self.live.push(false);
                t
            }
        };

        let [e0, e1, e2] = t.halfedges();
        self.corners[e0.index()] = a;
        self.corners[e1.index()] = b;
        self.corners[e2.index()] = c;

        self.live[t.index()] = true;
        self.num_live += 1;

        self.link(e0, ab);
        self.link(e1, bc);
        self.link(e2, ca);

        t
    }

    /// Unlink a triangle from all neighbors and free its slot.
    ///
    /// Neighbors keep their own half-edges; only their links into `t` are
    /// cleared, so they read as boundary edges until relinked.
    ///
    /// # Panics
    ///
    /// Panics if the triangle is already retired.
    pub fn retire(&mut self, t: TriangleId) {
        assert!(self.is_live(t), "triangle {:?} is already retired", t);
        for e in t.halfedges() {
            let f = self.opposites[e.index()];
            if f.is_valid() {
                debug_assert_eq!(self.opposites[f.index()], e);
                self.opposites[f.index()] = HalfEdgeId::invalid();
            }
            self.opposites[e.index()] = HalfEdgeId::invalid();
        }
        self.live[t.index()] = false;
        self.num_live -= 1;
    }

    /// Swap the diagonal of the quadrilateral formed by the two triangles
    /// sharing half-edge `a`.
    ///
    /// Both triangles are retired and recreated in their own slots; the
    /// first returned triangle takes `a`'s slot. Edge 1 of the first and
    /// edge 2 of the second are the far edges of the old neighbor, the ones
    /// legalization has to look at next.
    ///
    /// # Panics
    ///
    /// Panics if `a` is a boundary edge.
    pub fn flip(&mut self, a: HalfEdgeId) -> [TriangleId; 2] {
        let b = self.opposite(a);
        assert!(b.is_valid(), "cannot flip boundary edge {:?}", a);

        let al = a.next();
        let ar = a.prev();
        let bl = b.prev();
        let br = b.next();

        let p0 = self.corner(ar);
        let pr = self.corner(a);
        let pl = self.corner(al);
        let p1 = self.corner(bl);

        let hal = self.opposite(al);
        let har = self.opposite(ar);
        let hbl = self.opposite(bl);
        let hbr = self.opposite(br);

        let at = a.triangle();
        let bt = b.triangle();
        self.retire(at);
        self.retire(bt);

        let none = HalfEdgeId::invalid();
        let t0 = self.add_triangle(p0, p1, pl, none, hbl, hal, Some(at));
        let t1 = self.add_triangle(p1, p0, pr, t0.halfedge(0), har, hbr, Some(bt));
        [t0, t1]
    }

    fn link(&mut self, e: HalfEdgeId, f: HalfEdgeId) {
        self.opposites[e.index()] = f;
        if f.is_valid() {
            debug_assert!(self.is_live(f.triangle()), "linking into retired {:?}", f);
            debug_assert!(
                !self.opposites[f.index()].is_valid(),
                "{:?} is already linked to {:?}",
                f,
                self.opposites[f.index()]
            );
            self.opposites[f.index()] = e;
        }
    }

    // ==================== Validation ====================

    /// Whether the edge shared at `a` satisfies the Delaunay condition.
    ///
    /// Boundary edges are always legal.
    pub fn is_legal(&self, a: HalfEdgeId) -> bool {
        let b = self.opposite(a);
        if !b.is_valid() {
            return true;
        }
        let p0 = self.point(self.corner(a.prev()));
        let pr = self.point(self.corner(a));
        let pl = self.point(self.corner(a.next()));
        let p1 = self.point(self.corner(b.prev()));
        !in_circle(p0, pr, pl, p1)
    }

    /// Check that every live pair of neighbors is locally Delaunay.
    pub fn is_delaunay(&self) -> bool {
        self.live_triangles()
            .all(|t| t.halfedges().into_iter().all(|e| self.is_legal(e)))
    }

    /// Check the structural invariants of the mesh.
    ///
    /// Verifies that opposite links are symmetric and connect the same two
    /// points in reverse, that live triangles reference valid points, and
    /// that retired slots are isolated.
    pub fn is_valid(&self) -> bool {
        let mut live = 0;
        for (i, &is_live) in self.live.iter().enumerate() {
            let t = TriangleId::new(i);
            if !is_live {
                if t.halfedges().iter().any(|&e| self.opposite(e).is_valid()) {
                    return false;
                }
                continue;
            }
            live += 1;

            for e in t.halfedges() {
                let p = self.corner(e);
                if !p.is_valid() || p.index() >= self.points.len() {
                    return false;
                }

                let f = self.opposite(e);
                if !f.is_valid() {
                    continue;
                }
                if f.index() >= self.opposites.len() || !self.is_live(f.triangle()) {
                    return false;
                }
                if self.opposite(f) != e {
                    return false;
                }
                if self.corner(f) != self.corner(e.next()) || self.corner(f.next()) != p {
                    return false;
                }
            }
        }
        live == self.num_live
    }
}
