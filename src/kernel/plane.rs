// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Planar frames for working on coplanar 3D geometry in 2D

use super::point::{Point2, Point3};
use ahash::AHashMap;
use nalgebra::Vector3;

/// Newell normal of a (possibly non-convex) polygon ring
///
/// The ring may be closed or open. The length is twice the area for planar rings.
pub fn newell_normal(ring: &[Point3]) -> Vector3<f64> {
    let mut normal = Vector3::zeros();
    if ring.len() < 3 {
        return normal;
    }
    for (i, current) in ring.iter().enumerate() {
        let next = &ring[(i + 1) % ring.len()];
        normal.x += (current.y() - next.y()) * (current.z() + next.z());
        normal.y += (current.z() - next.z()) * (current.x() + next.x());
        normal.z += (current.x() - next.x()) * (current.y() + next.y());
    }
    normal
}

/// Axis of the largest normal component
pub fn dominant_axis(normal: &Vector3<f64>) -> usize {
    let abs = normal.abs();
    if abs.x >= abs.y && abs.x >= abs.z {
        0
    } else if abs.y >= abs.z {
        1
    } else {
        2
    }
}

/// A plane with a coordinate projection
///
/// Points are projected by dropping the dominant normal axis. Lifting maps a
/// projected point back onto the plane, returning the original coordinates
/// for every registered point so vertices survive a 2D round trip unchanged.
#[derive(Debug, Clone)]
pub struct PlaneFrame {
    origin: Point3,
    normal: Vector3<f64>,
    axis: usize,
    known: AHashMap<Point2, Point3>,
}

impl PlaneFrame {
    pub fn new(origin: Point3, normal: Vector3<f64>) -> Self {
        Self {
            origin,
            normal,
            axis: dominant_axis(&normal),
            known: AHashMap::new(),
        }
    }

    pub fn normal(&self) -> &Vector3<f64> {
        &self.normal
    }

    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Projected rings wind opposite to the 3D orientation
    pub fn flips_orientation(&self) -> bool {
        self.normal[self.axis] < 0.0
    }

    pub fn project(&self, p: &Point3) -> Point2 {
        p.drop_axis(self.axis)
    }

    /// Project and remember `p` for exact lifting
    pub fn register(&mut self, p: &Point3) -> Point2 {
        let projected = self.project(p);
        self.known.entry(projected).or_insert(*p);
        projected
    }

    pub fn lift(&self, p: &Point2) -> Point3 {
        if let Some(original) = self.known.get(p) {
            return *original;
        }
        let k = self.axis;
        let (i, j) = ((k + 1) % 3, (k + 2) % 3);
        let o = self.origin.coords();
        let n = &self.normal;
        let mut lifted = Vector3::zeros();
        lifted[i] = p.x();
        lifted[j] = p.y();
        lifted[k] = o[k] - (n[i] * (p.x() - o[i]) + n[j] * (p.y() - o[j])) / n[k];
        Point3::new(lifted.x, lifted.y, lifted.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_newell_normal_of_square() {
        let ring = [
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(2.0, 0.0, 1.0),
            Point3::new(2.0, 2.0, 1.0),
            Point3::new(0.0, 2.0, 1.0),
        ];
        let normal = newell_normal(&ring);
        assert_relative_eq!(normal, Vector3::new(0.0, 0.0, 8.0));
        assert_eq!(dominant_axis(&normal), 2);
    }

    #[test]
    fn test_lift_known_and_new_points() {
        let origin = Point3::new(0.0, 0.0, 0.0);
        let mut frame = PlaneFrame::new(origin, Vector3::new(0.0, -1.0, 1.0));
        let p = Point3::new(1.0, 2.0, 2.0);
        let projected = frame.register(&p);
        assert_eq!(frame.lift(&projected), p);

        let lifted = frame.lift(&Point2::new(5.0, 3.0));
        assert_relative_eq!(lifted.y(), lifted.z());
        assert_eq!(frame.axis(), 1);
        assert!(frame.flips_orientation());
    }
}
