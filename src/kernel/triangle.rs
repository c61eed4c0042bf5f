// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Spatial triangles and their exact incidence tests

use super::point::{KernelPoint, Point2, Point3};
use super::plane::dominant_axis;
use super::predicates::{orient2d, orient3d, BoundedSide, Orientation};
use super::segment::{Segment, SegmentIntersection, SegmentSplit};
use crate::geometry::BoundingBox;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triangle3 {
    vertices: [Point3; 3],
}

/// Closed containment of `p` in the planar triangle `a, b, c` of either winding
pub(crate) fn planar_triangle_side(a: &Point2, b: &Point2, c: &Point2, p: &Point2) -> BoundedSide {
    let o1 = orient2d(a, b, p);
    let o2 = orient2d(b, c, p);
    let o3 = orient2d(c, a, p);
    let has_pos = [o1, o2, o3].contains(&Orientation::Positive);
    let has_neg = [o1, o2, o3].contains(&Orientation::Negative);
    if has_pos && has_neg {
        BoundedSide::Outside
    } else if o1.is_zero() || o2.is_zero() || o3.is_zero() {
        BoundedSide::Boundary
    } else {
        BoundedSide::Inside
    }
}

impl Triangle3 {
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    pub fn vertices(&self) -> &[Point3; 3] {
        &self.vertices
    }

    pub fn vertex(&self, i: usize) -> &Point3 {
        &self.vertices[i % 3]
    }

    pub fn opposite(&self) -> Self {
        let [a, b, c] = self.vertices;
        Self::new(a, c, b)
    }

    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = &self.vertices;
        Point3::collinear(a, b, c)
    }

    /// `(b - a) x (c - a)`, rounded
    pub fn normal(&self) -> Vector3<f64> {
        let [a, b, c] = self.vertices;
        (b - a).cross(&(c - a))
    }

    pub fn edges(&self) -> [Segment<Point3>; 3] {
        let [a, b, c] = self.vertices;
        [Segment::new(a, b), Segment::new(b, c), Segment::new(c, a)]
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices.iter().map(|v| v.inner()))
    }

    pub fn area(&self) -> f64 {
        self.normal().norm() / 2.0
    }

    /// Axis dropped when the triangle is handled in 2D
    pub fn projection_axis(&self) -> usize {
        dominant_axis(&self.normal())
    }

    /// Side of the supporting plane, positive along the normal
    pub fn side_of(&self, p: &Point3) -> Orientation {
        let [a, b, c] = &self.vertices;
        orient3d(a, b, c, p)
    }

    pub fn is_coplanar_with(&self, other: &Triangle3) -> bool {
        other.vertices.iter().all(|v| self.side_of(v).is_zero())
    }

    /// Containment of a point known to lie in the supporting plane
    pub fn locate_in_plane(&self, p: &Point3) -> BoundedSide {
        self.locate_projected(&p.drop_axis(self.projection_axis()))
    }

    /// Containment in the projection that drops [`Triangle3::projection_axis`]
    pub fn locate_projected(&self, p: &Point2) -> BoundedSide {
        let axis = self.projection_axis();
        let [a, b, c] = self.vertices.map(|v| v.drop_axis(axis));
        planar_triangle_side(&a, &b, &c, p)
    }

    /// Exact closed containment
    pub fn has_on(&self, p: &Point3) -> bool {
        if self.is_degenerate() {
            return self.edges().iter().any(|e| e.has_on(p));
        }
        self.side_of(p).is_zero() && self.locate_in_plane(p).is_closed_inside()
    }

    pub fn intersects_segment(&self, s: &Segment<Point3>) -> bool {
        let (p, q) = (s.source(), s.target());
        let (sp, sq) = (self.side_of(p), self.side_of(q));
        if sp.is_zero() && sq.is_zero() {
            return self.has_on(p)
                || self.has_on(q)
                || self.edges().iter().any(|e| e.intersects(s));
        }
        if !sp.opposes(sq) {
            return (sp.is_zero() && self.has_on(p)) || (sq.is_zero() && self.has_on(q));
        }
        let [a, b, c] = &self.vertices;
        let signs = [orient3d(p, q, a, b), orient3d(p, q, b, c), orient3d(p, q, c, a)];
        !signs.iter().any(|x| signs.iter().any(|y| x.opposes(*y)))
    }

    /// Intersection with a segment, as one point or one segment
    pub fn intersect_segment(&self, s: &Segment<Point3>) -> Option<SegmentIntersection<Point3>> {
        if !self.intersects_segment(s) {
            return None;
        }
        let (p, q) = (s.source(), s.target());
        let (sp, sq) = (self.side_of(p), self.side_of(q));
        if sp.is_zero() && sq.is_zero() {
            let axis = self.projection_axis();
            let mut cuts = Vec::new();
            for edge in self.edges() {
                match s.intersection(&edge) {
                    Some(SegmentIntersection::Point(x)) => cuts.push(x),
                    Some(SegmentIntersection::Segment(o)) => {
                        cuts.push(*o.source());
                        cuts.push(*o.target());
                    }
                    None => {}
                }
            }
            // convex region: at most one piece
            let split = SegmentSplit::new(
                s,
                cuts,
                |a, b| {
                    let mid = Point3::midpoint(a, b).drop_axis(axis);
                    self.locate_projected(&mid).is_closed_inside()
                },
                |x| self.locate_in_plane(x).is_closed_inside(),
            );
            return split.inside_pieces().into_iter().next();
        }
        if sp.is_zero() {
            return Some(SegmentIntersection::Point(*p));
        }
        if sq.is_zero() {
            return Some(SegmentIntersection::Point(*q));
        }
        let normal = self.normal();
        let a = self.vertices[0];
        let dp = normal.dot(&(*p - a));
        let dq = normal.dot(&(*q - a));
        Some(SegmentIntersection::Point(s.point_at(dp / (dp - dq))))
    }

    pub fn intersects_triangle(&self, other: &Triangle3) -> bool {
        if self.is_coplanar_with(other) {
            let axis = self.projection_axis();
            return other.vertices.iter().any(|v| self.locate_in_plane(v).is_closed_inside())
                || self.vertices.iter().any(|v| {
                    let [a, b, c] = other.vertices.map(|w| w.drop_axis(axis));
                    planar_triangle_side(&a, &b, &c, &v.drop_axis(axis)).is_closed_inside()
                })
                || self
                    .edges()
                    .iter()
                    .any(|e| other.edges().iter().any(|f| e.intersects(f)));
        }
        self.edges().iter().any(|e| other.intersects_segment(e))
            || other.edges().iter().any(|e| self.intersects_segment(e))
    }

    /// Intersection of two triangles that do not share a plane
    ///
    /// The result lies on the line where the planes meet; its ends are edge
    /// contacts of one triangle with the other.
    pub fn crossing_section(&self, other: &Triangle3) -> Option<SegmentIntersection<Point3>> {
        let mut points: Vec<Point3> = Vec::new();
        let mut collect = |piece: Option<SegmentIntersection<Point3>>| match piece {
            Some(SegmentIntersection::Point(p)) => points.push(p),
            Some(SegmentIntersection::Segment(s)) => {
                points.push(*s.source());
                points.push(*s.target());
            }
            None => {}
        };
        for edge in self.edges() {
            collect(other.intersect_segment(&edge));
        }
        for edge in other.edges() {
            collect(self.intersect_segment(&edge));
        }
        let direction = self.normal().cross(&other.normal());
        let key = |p: &Point3| direction.dot(&p.coords());
        let first = points.iter().min_by(|a, b| key(a).total_cmp(&key(b)).then(a.cmp(b)))?;
        let last = points.iter().max_by(|a, b| key(a).total_cmp(&key(b)).then(a.cmp(b)))?;
        if first == last {
            Some(SegmentIntersection::Point(*first))
        } else {
            Some(SegmentIntersection::Segment(Segment::new(*first, *last)))
        }
    }
}

impl fmt::Debug for Triangle3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = &self.vertices;
        write!(f, "Triangle3({a:?}, {b:?}, {c:?})")
    }
}

impl fmt::Display for Triangle3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = &self.vertices;
        write!(f, "TRIANGLE(({a},{b},{c},{a}))")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(a: (f64, f64, f64), b: (f64, f64, f64), c: (f64, f64, f64)) -> Triangle3 {
        Triangle3::new(
            Point3::new(a.0, a.1, a.2),
            Point3::new(b.0, b.1, b.2),
            Point3::new(c.0, c.1, c.2),
        )
    }

    #[test]
    fn test_has_on() {
        let t = tri((0.0, 0.0, 1.0), (4.0, 0.0, 1.0), (0.0, 4.0, 1.0));
        assert!(t.has_on(&Point3::new(1.0, 1.0, 1.0)));
        assert!(t.has_on(&Point3::new(2.0, 2.0, 1.0)));
        assert!(!t.has_on(&Point3::new(1.0, 1.0, 1.5)));
        assert!(!t.has_on(&Point3::new(3.0, 3.0, 1.0)));
    }

    #[test]
    fn test_piercing_segment() {
        let t = tri((0.0, 0.0, 0.0), (4.0, 0.0, 0.0), (0.0, 4.0, 0.0));
        let s = Segment::new(Point3::new(1.0, 1.0, -1.0), Point3::new(1.0, 1.0, 3.0));
        assert_eq!(
            t.intersect_segment(&s),
            Some(SegmentIntersection::Point(Point3::new(1.0, 1.0, 0.0)))
        );
        let miss = Segment::new(Point3::new(5.0, 5.0, -1.0), Point3::new(5.0, 5.0, 1.0));
        assert!(!t.intersects_segment(&miss));
    }

    #[test]
    fn test_coplanar_segment_is_clipped() {
        let t = tri((0.0, 0.0, 2.0), (4.0, 0.0, 2.0), (0.0, 4.0, 2.0));
        let s = Segment::new(Point3::new(-1.0, 1.0, 2.0), Point3::new(7.0, 1.0, 2.0));
        let expected = Segment::new(Point3::new(0.0, 1.0, 2.0), Point3::new(3.0, 1.0, 2.0));
        assert_eq!(t.intersect_segment(&s), Some(SegmentIntersection::Segment(expected)));
    }

    #[test]
    fn test_crossing_triangles() {
        let flat = tri((0.0, 0.0, 0.0), (4.0, 0.0, 0.0), (0.0, 4.0, 0.0));
        let wall = tri((1.0, -1.0, -1.0), (1.0, -1.0, 1.0), (1.0, 5.0, 0.0));
        assert!(flat.intersects_triangle(&wall));
        match flat.crossing_section(&wall) {
            Some(SegmentIntersection::Segment(s)) => {
                assert_eq!(s.source().x(), 1.0);
                assert_eq!(s.target().z(), 0.0);
            }
            other => panic!("expected a segment, got {other:?}"),
        }
        let above = tri((0.0, 0.0, 1.0), (4.0, 0.0, 1.0), (0.0, 4.0, 2.0));
        assert!(!flat.intersects_triangle(&above));
    }
}
