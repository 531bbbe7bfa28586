//! Core mesh data structures.
//!
//! This module provides the half-edge triangle mesh that the triangulator
//! grows, and the priority queue that decides where it grows next.
//!
//! # Overview
//!
//! The primary type is [`Mesh`], a triangulation over an append-only arena
//! of integer grid points. Triangles are stored as three consecutive
//! half-edges, each recording its origin point and its opposite half-edge,
//! which gives O(1) neighbor queries and in-place edge flips.
//!
//! [`RefinementQueue`] orders triangles by the approximation error of their
//! worst sample so the triangulator can always refine the worst one first.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`PointId`] - Identifies a point
//! - [`TriangleId`] - Identifies a triangle slot
//! - [`HalfEdgeId`] - Identifies a half-edge, `triangle * 3 + corner`
//!
//! # Construction
//!
//! ```
//! use heightmesh::geometry::GridPoint;
//! use heightmesh::mesh::{HalfEdgeId, Mesh};
//!
//! let mut mesh = Mesh::new();
//! let a = mesh.add_point(GridPoint::new(0, 0));
//! let b = mesh.add_point(GridPoint::new(0, 4));
//! let c = mesh.add_point(GridPoint::new(4, 4));
//!
//! let none = HalfEdgeId::invalid();
//! let t = mesh.add_triangle(a, b, c, none, none, none, None);
//! assert_eq!(mesh.triangle(t), [a, b, c]);
//! assert!(mesh.is_valid());
//! ```

mod halfedge;
mod index;
mod queue;

pub use halfedge::Mesh;
pub use index::{HalfEdgeId, PointId, TriangleId};
pub use queue::{QueueState, RefinementQueue};
