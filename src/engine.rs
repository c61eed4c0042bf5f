// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Engine API over structured geometries

use crate::algorithm;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::geometry::Geometry;
use crate::set::{Dim2, Dim3, Dimension, GeometrySet, RecomposeOptions};

/// Set operations on [`Geometry`] values with a fixed configuration
///
/// The plain methods work in the plane and ignore z coordinates; the `_3d`
/// variants work in space.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Create an engine with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn recompose_options(&self) -> RecomposeOptions {
        RecomposeOptions {
            merge_facets: self.config.merge_facets,
        }
    }

    fn difference_in<D: Dimension>(&self, a: &Geometry, b: &Geometry) -> Result<Geometry> {
        let (a, b) = (GeometrySet::<D>::from_geometry(a), GeometrySet::<D>::from_geometry(b));
        let result = algorithm::difference(&a, &b, &self.config)?;
        Ok(result.recompose_with(&self.recompose_options()))
    }

    fn intersection_in<D: Dimension>(&self, a: &Geometry, b: &Geometry) -> Geometry {
        let (a, b) = (GeometrySet::<D>::from_geometry(a), GeometrySet::<D>::from_geometry(b));
        algorithm::intersection(&a, &b, &self.config).recompose_with(&self.recompose_options())
    }

    fn intersects_in<D: Dimension>(&self, a: &Geometry, b: &Geometry) -> bool {
        let (a, b) = (GeometrySet::<D>::from_geometry(a), GeometrySet::<D>::from_geometry(b));
        algorithm::intersects(&a, &b, &self.config)
    }

    fn intersection_dimension_in<D: Dimension>(&self, a: &Geometry, b: &Geometry) -> i32 {
        let (a, b) = (GeometrySet::<D>::from_geometry(a), GeometrySet::<D>::from_geometry(b));
        algorithm::intersection_dimension(&a, &b, &self.config)
    }

    /// Planar difference `a - b`
    pub fn difference(&self, a: &Geometry, b: &Geometry) -> Result<Geometry> {
        self.difference_in::<Dim2>(a, b)
    }

    /// Spatial difference `a - b`
    ///
    /// Fails on intersecting triangles that do not share a plane unless the
    /// configuration keeps the minuend.
    pub fn difference_3d(&self, a: &Geometry, b: &Geometry) -> Result<Geometry> {
        self.difference_in::<Dim3>(a, b)
    }

    pub fn intersection(&self, a: &Geometry, b: &Geometry) -> Geometry {
        self.intersection_in::<Dim2>(a, b)
    }

    pub fn intersection_3d(&self, a: &Geometry, b: &Geometry) -> Geometry {
        self.intersection_in::<Dim3>(a, b)
    }

    pub fn intersects(&self, a: &Geometry, b: &Geometry) -> bool {
        self.intersects_in::<Dim2>(a, b)
    }

    pub fn intersects_3d(&self, a: &Geometry, b: &Geometry) -> bool {
        self.intersects_in::<Dim3>(a, b)
    }

    /// Highest dimension of `a ∩ b` in the plane, -1 when disjoint
    pub fn intersection_dimension(&self, a: &Geometry, b: &Geometry) -> i32 {
        self.intersection_dimension_in::<Dim2>(a, b)
    }

    pub fn intersection_dimension_3d(&self, a: &Geometry, b: &Geometry) -> i32 {
        self.intersection_dimension_in::<Dim3>(a, b)
    }
}
