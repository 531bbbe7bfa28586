//! Solid base generation.
//!
//! Turns a height-field surface into a closed solid: every boundary segment
//! of the surface is extruded down to a flat floor by a two-triangle wall,
//! and the floor is closed with a fan around its center.
//!
//! # Example
//!
//! ```
//! use heightmesh::algo::base::add_base;
//! use heightmesh::algo::triangulate::{triangulate, TriangulateOptions};
//! use heightmesh::heightmap::Heightmap;
//!
//! let hm = Heightmap::from_fn(16, 16, |x, y| ((x + y) % 5) as f32 * 0.2).unwrap();
//! let tri = triangulate(&hm, &TriangulateOptions::default());
//!
//! let mut points = tri.points(1.0);
//! let mut triangles = tri.triangles();
//! let surface = triangles.len();
//! add_base(&mut points, &mut triangles, hm.width(), hm.height(), -1.0);
//! assert!(triangles.len() > surface);
//! ```

use std::collections::{BTreeMap, HashMap};

use nalgebra::Point3;

/// Exact lookup key of a point.
fn key(p: &Point3<f32>) -> [u32; 3] {
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}

/// Index of `p` in `points`, appending it if not present.
fn point_index(
    points: &mut Vec<Point3<f32>>,
    lookup: &mut HashMap<[u32; 3], usize>,
    p: Point3<f32>,
) -> usize {
    *lookup.entry(key(&p)).or_insert_with(|| {
        points.push(p);
        points.len() - 1
    })
}

/// Surface points along one side, as `(position along the side, height)`
/// ordered by position.
type Side = BTreeMap<i64, f32>;

/// Close a height-field surface into a solid whose floor lies at height `z`.
///
/// `points` and `triangles` are the surface as produced by
/// [`Triangulator::points`](crate::algo::triangulate::Triangulator::points)
/// and [`Triangulator::triangles`](crate::algo::triangulate::Triangulator::triangles)
/// for a `width` x `height` height field. Walls and floor are appended in
/// place; existing boundary points are reused. The floor must lie strictly
/// below the surface for the result to be a valid solid.
pub fn add_base(
    points: &mut Vec<Point3<f32>>,
    triangles: &mut Vec<[usize; 3]>,
    width: usize,
    height: usize,
    z: f32,
) {
    let w1 = width as f32 - 1.0;
    let h1 = height as f32 - 1.0;

    let mut x0s = Side::new();
    let mut x1s = Side::new();
    let mut y0s = Side::new();
    let mut y1s = Side::new();
    let mut lookup = HashMap::new();

    // find points along each side
    for (i, p) in points.iter().enumerate() {
        let mut boundary = false;
        if p.x == 0.0 {
            x0s.insert(p.y as i64, p.z);
            boundary = true;
        } else if p.x == w1 {
            x1s.insert(p.y as i64, p.z);
            boundary = true;
        }
        if p.y == 0.0 {
            y0s.insert(p.x as i64, p.z);
            boundary = true;
        } else if p.y == h1 {
            y1s.insert(p.x as i64, p.z);
            boundary = true;
        }
        if boundary {
            lookup.insert(key(p), i);
        }
    }

    let before = triangles.len();
    let center = point_index(
        points,
        &mut lookup,
        Point3::new(width as f32 * 0.5, height as f32 * 0.5, z),
    );

    let mut wall = |side: &Side, at: &dyn Fn(f32, f32) -> Point3<f32>, flipped: bool| {
        let segments: Vec<_> = side.iter().map(|(&u, &h)| (u as f32, h)).collect();
        for pair in segments.windows(2) {
            let ((u0, z0), (u1, z1)) = (pair[0], pair[1]);
            let p00 = point_index(points, &mut lookup, at(u0, z));
            let p01 = point_index(points, &mut lookup, at(u0, z0));
            let p10 = point_index(points, &mut lookup, at(u1, z));
            let p11 = point_index(points, &mut lookup, at(u1, z1));
            if flipped {
                triangles.push([p01, p10, p00]);
                triangles.push([p01, p11, p10]);
                triangles.push([center, p00, p10]);
            } else {
                triangles.push([p00, p10, p01]);
                triangles.push([p10, p11, p01]);
                triangles.push([center, p10, p00]);
            }
        }
    };

    wall(&x0s, &|y: f32, z: f32| Point3::new(0.0, y, z), true);
    wall(&x1s, &|y: f32, z: f32| Point3::new(w1, y, z), false);
    wall(&y0s, &|x: f32, z: f32| Point3::new(x, 0.0, z), false);
    wall(&y1s, &|x: f32, z: f32| Point3::new(x, h1, z), true);

    log::debug!(
        "added base at z = {}: {} triangles, {} boundary points",
        z,
        triangles.len() - before,
        x0s.len() + x1s.len() + y0s.len() + y1s.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::triangulate::Triangulator;
    use crate::heightmap::Heightmap;
    use std::collections::HashSet;

    fn solid(width: usize, height: usize, max_error: f32) -> (Vec<Point3<f32>>, Vec<[usize; 3]>) {
        let hm = Heightmap::from_fn(width, height, |x, y| {
            0.5 + 0.4 * ((x as f32) * 0.4).sin() * ((y as f32) * 0.3).cos()
        })
        .unwrap();
        let mut tri = Triangulator::new(&hm);
        tri.run(max_error, 0, 0);

        let mut points = tri.points(1.0);
        let mut triangles = tri.triangles();
        add_base(&mut points, &mut triangles, width, height, -1.0);
        (points, triangles)
    }

    #[test]
    fn test_base_is_watertight() {
        let (points, triangles) = solid(20, 15, 0.02);

        let mut directed = HashSet::new();
        for &[a, b, c] in &triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                assert!(directed.insert((u, v)), "edge {}->{} used twice", u, v);
            }
        }
        for &(u, v) in &directed {
            assert!(directed.contains(&(v, u)), "edge {}->{} has no twin", u, v);
        }

        // Closed genus-0 surface.
        let v = points.len() as i64;
        let e = (directed.len() / 2) as i64;
        let f = triangles.len() as i64;
        assert_eq!(v - e + f, 2);
    }

    #[test]
    fn test_two_triangle_surface() {
        let hm = Heightmap::new(3, 2, vec![0.5; 6]).unwrap();
        let tri = Triangulator::new(&hm);
        let mut points = tri.points(1.0);
        let mut triangles = tri.triangles();
        add_base(&mut points, &mut triangles, 3, 2, 0.0);

        // 4 surface corners, 4 floor corners and the floor center.
        assert_eq!(points.len(), 9);
        // 2 surface triangles, 2 wall and 1 floor triangle per side.
        assert_eq!(triangles.len(), 2 + 4 * 3);
        assert_eq!(points[4], Point3::new(1.5, 1.0, 0.0));
        for p in &points[5..] {
            assert_eq!(p.z, 0.0);
        }
    }
}
