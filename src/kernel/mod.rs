// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Exact-predicate kernel: points, segments, triangles and polyhedra

mod plane;
mod point;
mod polyhedron;
pub mod predicates;
mod segment;
mod triangle;

pub use plane::{dominant_axis, newell_normal, PlaneFrame};
pub use point::{KernelPoint, Point2, Point3};
pub use polyhedron::Polyhedron;
pub use predicates::{BoundedSide, Orientation};
pub use segment::{Contact, Endpoint, Segment, SegmentIntersection, SegmentSplit};
pub use triangle::Triangle3;

pub(crate) use polyhedron::drop_collinear;
pub(crate) use triangle::planar_triangle_side;

#[cfg(test)]
pub(crate) use polyhedron::tests::cuboid;
