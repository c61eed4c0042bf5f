// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polygon triangulation in the plane and on 3D supporting planes

use crate::geometry::Polygon;
use crate::kernel::predicates::orient2d;
use crate::kernel::{newell_normal, Orientation, PlaneFrame, Point2, Point3, Triangle3};
use geo::TriangulateEarcut;

/// Build a `geo` polygon from rings of kernel points
pub fn to_geo_polygon(exterior: &[Point2], holes: &[Vec<Point2>]) -> geo::Polygon<f64> {
    let ring = |points: &[Point2]| {
        geo::LineString::from(
            points
                .iter()
                .map(|p| geo::Coord { x: p.x(), y: p.y() })
                .collect::<Vec<_>>(),
        )
    };
    geo::Polygon::new(ring(exterior), holes.iter().map(|h| ring(h)).collect())
}

/// Counterclockwise triangles covering a planar polygon with holes
pub fn triangulate_polygon_2d(polygon: &geo::Polygon<f64>) -> Vec<[Point2; 3]> {
    polygon
        .earcut_triangles()
        .into_iter()
        .filter_map(|t| {
            let (a, b, c) = (
                Point2::new(t.0.x, t.0.y),
                Point2::new(t.1.x, t.1.y),
                Point2::new(t.2.x, t.2.y),
            );
            match orient2d(&a, &b, &c) {
                Orientation::Positive => Some([a, b, c]),
                Orientation::Negative => Some([a, c, b]),
                Orientation::Zero => None,
            }
        })
        .collect()
}

/// Triangulate a projected polygon and lift it back through `frame`
///
/// Triangles face along the frame normal.
pub fn triangulate_in_frame(polygon: &geo::Polygon<f64>, frame: &PlaneFrame) -> Vec<Triangle3> {
    triangulate_polygon_2d(polygon)
        .into_iter()
        .filter_map(|[a, b, c]| {
            let triangle = Triangle3::new(frame.lift(&a), frame.lift(&b), frame.lift(&c));
            if triangle.is_degenerate() {
                None
            } else if triangle.normal().dot(frame.normal()) < 0.0 {
                Some(triangle.opposite())
            } else {
                Some(triangle)
            }
        })
        .collect()
}

fn ring_points(ring: &crate::geometry::LineString) -> Vec<Point3> {
    let mut points: Vec<Point3> = ring
        .points
        .iter()
        .map(|p| Point3::new(p.x, p.y, p.z_or_zero()))
        .collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

/// Triangulate a 3D polygon with holes
///
/// The polygon is projected on the plane orthogonal to the dominant axis of
/// its Newell normal. Input vertices keep their exact coordinates and the
/// triangles are oriented like the exterior ring.
pub fn triangulate_polygon_3d(polygon: &Polygon) -> Vec<Triangle3> {
    let Some(exterior) = polygon.exterior() else {
        return Vec::new();
    };
    let outer = ring_points(exterior);
    if outer.len() < 3 {
        return Vec::new();
    }
    let normal = newell_normal(&outer);
    if normal.norm_squared() == 0.0 {
        return Vec::new();
    }

    let mut frame = PlaneFrame::new(outer[0], normal);
    let projected_outer: Vec<Point2> = outer.iter().map(|p| frame.register(p)).collect();
    let projected_holes: Vec<Vec<Point2>> = polygon
        .interiors()
        .iter()
        .map(|hole| ring_points(hole).iter().map(|p| frame.register(p)).collect())
        .collect();

    triangulate_in_frame(&to_geo_polygon(&projected_outer, &projected_holes), &frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LineString;
    use approx::assert_relative_eq;

    #[test]
    fn test_square_with_hole() {
        let outer = [(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)].map(|(x, y)| Point2::new(x, y));
        let hole = [(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0)].map(|(x, y)| Point2::new(x, y));
        let polygon = to_geo_polygon(&outer, &[hole.to_vec()]);
        let triangles = triangulate_polygon_2d(&polygon);
        let area: f64 = triangles
            .iter()
            .map(|[a, b, c]| ((b.x() - a.x()) * (c.y() - a.y()) - (b.y() - a.y()) * (c.x() - a.x())) / 2.0)
            .sum();
        assert_relative_eq!(area, 15.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vertical_polygon_keeps_vertices() {
        let polygon = Polygon::new(LineString::from_xyz(&[
            (0.0, 0.0, 0.0),
            (0.0, 3.0, 0.0),
            (0.0, 3.0, 2.0),
            (0.0, 0.0, 2.0),
            (0.0, 0.0, 0.0),
        ]));
        let triangles = triangulate_polygon_3d(&polygon);
        assert_eq!(triangles.len(), 2);
        for t in &triangles {
            assert!(t.vertices().iter().all(|v| v.x() == 0.0));
            assert!(t.normal().x > 0.0);
        }
        let area: f64 = triangles.iter().map(Triangle3::area).sum();
        assert_relative_eq!(area, 6.0, epsilon = 1e-12);
    }
}
