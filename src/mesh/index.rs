//! Index types for mesh elements.
//!
//! Points, triangles and half-edges are all addressed by plain integers in
//! the mesh arrays. The wrappers here keep them apart at call sites: a
//! triangle id cannot be passed where a half-edge id is expected. Each
//! wrapper reserves `u32::MAX` as an invalid sentinel, which for half-edges
//! means "boundary, no neighbor".

use std::fmt::{self, Debug};

const INVALID: u32 = u32::MAX;

/// A type-safe point index into the mesh point arena.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct PointId(u32);

/// A type-safe triangle index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct TriangleId(u32);

/// A type-safe half-edge index, `triangle * 3 + corner`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < INVALID as usize, "index {} too large", index);
                Self(index as u32)
            }

            /// Create an invalid/null index.
            #[inline]
            pub const fn invalid() -> Self {
                Self(INVALID)
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Check if this is a valid (non-null) index.
            #[inline]
            pub fn is_valid(self) -> bool {
                self.0 != INVALID
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", $display, self.index())
                } else {
                    write!(f, "{}(INVALID)", $display)
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::invalid()
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(PointId, "P");
impl_index_type!(TriangleId, "T");
impl_index_type!(HalfEdgeId, "HE");

impl TriangleId {
    /// The half-edge leaving corner `corner` (0, 1 or 2).
    #[inline]
    pub fn halfedge(self, corner: usize) -> HalfEdgeId {
        debug_assert!(corner < 3);
        HalfEdgeId::new(self.index() * 3 + corner)
    }

    /// The three half-edges of this triangle in order.
    #[inline]
    pub fn halfedges(self) -> [HalfEdgeId; 3] {
        [self.halfedge(0), self.halfedge(1), self.halfedge(2)]
    }
}

impl HalfEdgeId {
    /// The triangle this half-edge belongs to.
    #[inline]
    pub fn triangle(self) -> TriangleId {
        TriangleId::new(self.index() / 3)
    }

    /// Corner position (0, 1 or 2) within the triangle.
    #[inline]
    pub fn corner(self) -> usize {
        self.index() % 3
    }

    /// The next half-edge around the same triangle.
    #[inline]
    pub fn next(self) -> HalfEdgeId {
        let i = self.index();
        HalfEdgeId::new(i - i % 3 + (i + 1) % 3)
    }

    /// The previous half-edge around the same triangle.
    #[inline]
    pub fn prev(self) -> HalfEdgeId {
        let i = self.index();
        HalfEdgeId::new(i - i % 3 + (i + 2) % 3)
    }
}
