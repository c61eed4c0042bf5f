// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry module - the geometry model exchanged with callers

mod bbox;
mod shapes;
mod wkt;

pub use bbox::BoundingBox;
pub use shapes::{
    Geometry, GeometryType, LineString, Point, PolyhedralSurface, Polygon, Solid, Triangle,
    TriangulatedSurface,
};
