// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polyset
//!
//! Set algebra over mixed-dimension geometry. Geometries are decomposed into
//! points, segments, surfaces and volumes, combined primitive by primitive with
//! exact predicates and a bounding-box sweep, then rebuilt into structured
//! geometries.

pub mod algorithm;
pub mod config;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod index;
pub mod kernel;
pub mod mesh;
pub mod set;

pub use config::{EngineConfig, NonCoplanarPolicy};
pub use engine::Engine;
pub use error::{Result, SetOpError};
pub use geometry::{
    BoundingBox, Geometry, GeometryType, LineString, Point, PolyhedralSurface, Polygon, Solid,
    Triangle, TriangulatedSurface,
};
pub use set::{Dim2, Dim3, Dimension, GeometrySet, PrimitiveType};

/// Planar difference `a - b` with the default configuration
pub fn difference(a: &Geometry, b: &Geometry) -> Result<Geometry> {
    Engine::default().difference(a, b)
}

/// Spatial difference `a - b` with the default configuration
pub fn difference_3d(a: &Geometry, b: &Geometry) -> Result<Geometry> {
    Engine::default().difference_3d(a, b)
}

pub fn intersection(a: &Geometry, b: &Geometry) -> Geometry {
    Engine::default().intersection(a, b)
}

pub fn intersection_3d(a: &Geometry, b: &Geometry) -> Geometry {
    Engine::default().intersection_3d(a, b)
}

pub fn intersects(a: &Geometry, b: &Geometry) -> bool {
    Engine::default().intersects(a, b)
}

pub fn intersects_3d(a: &Geometry, b: &Geometry) -> bool {
    Engine::default().intersects_3d(a, b)
}

pub fn intersection_dimension(a: &Geometry, b: &Geometry) -> i32 {
    Engine::default().intersection_dimension(a, b)
}

pub fn intersection_dimension_3d(a: &Geometry, b: &Geometry) -> i32 {
    Engine::default().intersection_dimension_3d(a, b)
}
