// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounding box utilities

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box with closed extents
///
/// Planar primitives use `z = 0`, so 2D and 3D boxes share one type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point3<f64>,
    pub max: Point3<f64>,
}

impl BoundingBox {
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_point(point: &Point3<f64>) -> Self {
        Self {
            min: *point,
            max: *point,
        }
    }

    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3<f64>>) -> Self {
        let mut bbox = Self::empty();
        for point in points {
            bbox.expand_to_include(point);
        }
        bbox
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);

        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Lower bound along `axis` (0 = x, 1 = y, 2 = z)
    pub fn lo(&self, axis: usize) -> f64 {
        self.min[axis]
    }

    /// Upper bound along `axis`
    pub fn hi(&self, axis: usize) -> f64 {
        self.max[axis]
    }

    /// Closed-interval overlap on the first `dims` axes
    pub fn overlaps(&self, other: &BoundingBox, dims: usize) -> bool {
        (0..dims).all(|axis| self.lo(axis) <= other.hi(axis) && other.lo(axis) <= self.hi(axis))
    }

    /// Whether `other` lies within this box on the first `dims` axes
    pub fn contains(&self, other: &BoundingBox, dims: usize) -> bool {
        (0..dims).all(|axis| self.lo(axis) <= other.lo(axis) && other.hi(axis) <= self.hi(axis))
    }

    pub fn center(&self) -> Point3<f64> {
        Point3::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    pub fn size(&self) -> Vector3<f64> {
        Vector3::new(
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box() {
        let mut bbox = BoundingBox::empty();
        assert!(bbox.is_empty());
        bbox.expand_to_include(&Point3::new(1.0, 2.0, 3.0));
        bbox.expand_to_include(&Point3::new(-1.0, -2.0, -3.0));

        assert_eq!(bbox.min, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(bbox.max, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(bbox.center(), Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_closed_overlap() {
        let a = BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0));
        let touching = BoundingBox::new(Point3::new(1.0, 0.5, 0.0), Point3::new(2.0, 2.0, 0.0));
        let apart = BoundingBox::new(Point3::new(1.5, 0.0, 0.0), Point3::new(2.0, 1.0, 0.0));
        assert!(a.overlaps(&touching, 2));
        assert!(!a.overlaps(&apart, 2));
    }

    #[test]
    fn test_overlap_ignores_unused_axes() {
        let a = BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0));
        let b = BoundingBox::new(Point3::new(0.5, 0.5, 5.0), Point3::new(2.0, 2.0, 6.0));
        assert!(a.overlaps(&b, 2));
        assert!(!a.overlaps(&b, 3));
    }
}
