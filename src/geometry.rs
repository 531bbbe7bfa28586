//! Exact geometric predicates on integer grid points.
//!
//! All triangulation decisions go through these functions. They work on
//! integer coordinates with widened intermediates, so a decision is never
//! subject to rounding: a misclassified in-circle test would corrupt the
//! mesh topology permanently.
//!
//! # Winding
//!
//! Triangles produced by the triangulator have a consistent winding for
//! which [`orient`] is positive. In image coordinates (y pointing down) this
//! is counter-clockwise. [`in_circle`] assumes that winding.

use nalgebra::Point2;

/// An integer grid coordinate.
pub type GridPoint = Point2<i32>;

/// Edge function of `p` relative to the directed edge `a -> b`.
///
/// Equals twice the signed area of the triangle `(p, a, b)`; positive when
/// the three points follow the mesh winding.
#[inline]
pub fn orient(p: GridPoint, a: GridPoint, b: GridPoint) -> i64 {
    (a.x as i64 - b.x as i64) * (p.y as i64 - b.y as i64)
        - (a.y as i64 - b.y as i64) * (p.x as i64 - b.x as i64)
}

/// Returns true iff the three points lie exactly on one line.
#[inline]
pub fn collinear(p0: GridPoint, p1: GridPoint, p2: GridPoint) -> bool {
    let lhs = (p1.y as i64 - p0.y as i64) * (p2.x as i64 - p1.x as i64);
    let rhs = (p2.y as i64 - p1.y as i64) * (p1.x as i64 - p0.x as i64);
    lhs == rhs
}

/// Returns true iff `p` lies strictly inside the circumcircle of `(a, b, c)`.
///
/// `(a, b, c)` must follow the mesh winding (see the module docs). Points
/// exactly on the circle are reported as outside, so co-circular
/// configurations are left alone by legalization.
#[inline]
pub fn in_circle(a: GridPoint, b: GridPoint, c: GridPoint, p: GridPoint) -> bool {
    let dx = a.x as i64 - p.x as i64;
    let dy = a.y as i64 - p.y as i64;
    let ex = b.x as i64 - p.x as i64;
    let ey = b.y as i64 - p.y as i64;
    let fx = c.x as i64 - p.x as i64;
    let fy = c.y as i64 - p.y as i64;

    let (dx, dy, ex, ey, fx, fy) = (
        dx as i128, dy as i128, ex as i128, ey as i128, fx as i128, fy as i128,
    );

    let ap = dx * dx + dy * dy;
    let bp = ex * ex + ey * ey;
    let cp = fx * fx + fy * fy;

    let det = dx * (ey * cp - bp * fy) - dy * (ex * cp - bp * fx) + ap * (ex * fy - ey * fx);
    det < 0
}
