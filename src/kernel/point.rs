// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Kernel points with a total order

use super::predicates;
use super::segment::{self, Contact, Segment};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Point behavior shared by the planar and spatial kernels
pub trait KernelPoint: Copy + Ord + Hash + fmt::Debug + fmt::Display + 'static {
    /// Number of coordinates
    const DIM: usize;

    fn coord(&self, axis: usize) -> f64;

    /// Exact collinearity of three points
    fn collinear(a: &Self, b: &Self, c: &Self) -> bool;

    /// `a + t (b - a)`, rounded
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;

    /// Midpoint, rounded
    fn midpoint(a: &Self, b: &Self) -> Self {
        Self::lerp(a, b, 0.5)
    }

    /// Embedding into 3D, `z = 0` for planar points
    fn to_point3(&self) -> nalgebra::Point3<f64>;

    /// Contact of two non-degenerate segments
    fn segment_contact(a: &Segment<Self>, b: &Segment<Self>) -> Contact;
}

fn cmp_coords(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Planar point, lexicographically ordered by `(x, y)`
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Point2(nalgebra::Point2<f64>);

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        // -0.0 + 0.0 == +0.0 keeps the order and hash consistent
        Self(nalgebra::Point2::new(x + 0.0, y + 0.0))
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn inner(&self) -> &nalgebra::Point2<f64> {
        &self.0
    }
}

impl From<nalgebra::Point2<f64>> for Point2 {
    fn from(p: nalgebra::Point2<f64>) -> Self {
        Self::new(p.x, p.y)
    }
}

impl PartialEq for Point2 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Point2 {}

impl PartialOrd for Point2 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point2 {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_coords(&[self.x(), self.y()], &[other.x(), other.y()])
    }
}

impl Hash for Point2 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x().to_bits().hash(state);
        self.y().to_bits().hash(state);
    }
}

impl fmt::Debug for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point2({}, {})", self.x(), self.y())
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x(), self.y())
    }
}

impl KernelPoint for Point2 {
    const DIM: usize = 2;

    fn coord(&self, axis: usize) -> f64 {
        self.0[axis]
    }

    fn collinear(a: &Self, b: &Self, c: &Self) -> bool {
        predicates::collinear_2d(a, b, c)
    }

    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self::new(a.x() + t * (b.x() - a.x()), a.y() + t * (b.y() - a.y()))
    }

    fn to_point3(&self) -> nalgebra::Point3<f64> {
        nalgebra::Point3::new(self.x(), self.y(), 0.0)
    }

    fn segment_contact(a: &Segment<Self>, b: &Segment<Self>) -> Contact {
        segment::planar_contact(a, b)
    }
}

/// Spatial point, lexicographically ordered by `(x, y, z)`
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Point3(nalgebra::Point3<f64>);

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(nalgebra::Point3::new(x + 0.0, y + 0.0, z + 0.0))
    }

    pub fn x(&self) -> f64 {
        self.0.x
    }

    pub fn y(&self) -> f64 {
        self.0.y
    }

    pub fn z(&self) -> f64 {
        self.0.z
    }

    pub fn inner(&self) -> &nalgebra::Point3<f64> {
        &self.0
    }

    pub fn coords(&self) -> Vector3<f64> {
        self.0.coords
    }

    /// Project to the coordinate plane orthogonal to `axis`, keeping the
    /// remaining axes in cyclic order so orientation follows that axis
    pub fn drop_axis(&self, axis: usize) -> Point2 {
        let (i, j) = ((axis + 1) % 3, (axis + 2) % 3);
        Point2::new(self.0[i], self.0[j])
    }
}

impl From<nalgebra::Point3<f64>> for Point3 {
    fn from(p: nalgebra::Point3<f64>) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

impl std::ops::Sub for Point3 {
    type Output = Vector3<f64>;

    fn sub(self, rhs: Point3) -> Vector3<f64> {
        self.0 - rhs.0
    }
}

impl PartialEq for Point3 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Point3 {}

impl PartialOrd for Point3 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point3 {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_coords(
            &[self.x(), self.y(), self.z()],
            &[other.x(), other.y(), other.z()],
        )
    }
}

impl Hash for Point3 {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.x().to_bits().hash(state);
        self.y().to_bits().hash(state);
        self.z().to_bits().hash(state);
    }
}

impl fmt::Debug for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point3({}, {}, {})", self.x(), self.y(), self.z())
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.x(), self.y(), self.z())
    }
}

impl KernelPoint for Point3 {
    const DIM: usize = 3;

    fn coord(&self, axis: usize) -> f64 {
        self.0[axis]
    }

    fn collinear(a: &Self, b: &Self, c: &Self) -> bool {
        predicates::collinear_3d(a, b, c)
    }

    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self::from(a.0 + (b.0 - a.0) * t)
    }

    fn to_point3(&self) -> nalgebra::Point3<f64> {
        self.0
    }

    fn segment_contact(a: &Segment<Self>, b: &Segment<Self>) -> Contact {
        segment::spatial_contact(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_lexicographic_order() {
        let mut points = vec![
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(0.0, 1.0),
        ];
        points.sort();
        assert_eq!(
            points,
            vec![Point2::new(0.0, 1.0), Point2::new(0.0, 2.0), Point2::new(1.0, 0.0)]
        );
    }

    #[test]
    fn test_signed_zero_is_one_point() {
        let set: BTreeSet<Point3> = [Point3::new(0.0, -0.0, 1.0), Point3::new(-0.0, 0.0, 1.0)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_drop_axis_keeps_cyclic_order() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert_eq!(p.drop_axis(2), Point2::new(1.0, 2.0));
        assert_eq!(p.drop_axis(0), Point2::new(2.0, 3.0));
        assert_eq!(p.drop_axis(1), Point2::new(3.0, 1.0));
    }
}
