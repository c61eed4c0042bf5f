// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Pairwise rules for planar primitives
//!
//! Surfaces are `geo` polygons with holes. Point and segment classification
//! against rings is exact; polygon-polygon area operations go through
//! `geo::BooleanOps`.

use crate::geometry::BoundingBox;
use crate::index::overlapping_pairs;
use crate::kernel::predicates::orient2d;
use crate::kernel::{
    BoundedSide, KernelPoint, Orientation, Point2, Segment, SegmentIntersection, SegmentSplit,
};
use crate::mesh::{to_geo_polygon, triangulate_polygon_2d};
use crate::set::{Dim2, GeometrySet, PrimitiveRef, Remainder};
use geo::{Area, BooleanOps};
use std::ops::ControlFlow;

type Polygon = geo::Polygon<f64>;

fn point(c: &geo::Coord<f64>) -> Point2 {
    Point2::new(c.x, c.y)
}

/// Ring vertices without the closing repetition
pub(crate) fn ring_points(ring: &geo::LineString<f64>) -> Vec<Point2> {
    let mut points: Vec<Point2> = ring.0.iter().map(point).collect();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

fn ring_edges(ring: &geo::LineString<f64>) -> impl Iterator<Item = Segment<Point2>> + '_ {
    let points = ring_points(ring);
    let n = points.len();
    (0..n)
        .map(move |i| Segment::new(points[i], points[(i + 1) % n]))
        .filter(|s| !s.is_degenerate())
}

/// Every edge of the exterior and of the holes
pub(crate) fn polygon_edges(polygon: &Polygon) -> Vec<Segment<Point2>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .flat_map(ring_edges)
        .collect()
}

/// Exact position of `p` relative to a closed ring
pub(crate) fn ring_side(ring: &geo::LineString<f64>, p: &Point2) -> BoundedSide {
    let points = ring_points(ring);
    let n = points.len();
    if n == 0 {
        return BoundedSide::Outside;
    }
    let mut winding = 0i32;
    for i in 0..n {
        let (a, b) = (&points[i], &points[(i + 1) % n]);
        if Segment::new(*a, *b).has_on(p) {
            return BoundedSide::Boundary;
        }
        if a.y() <= p.y() {
            if b.y() > p.y() && orient2d(a, b, p) == Orientation::Positive {
                winding += 1;
            }
        } else if b.y() <= p.y() && orient2d(a, b, p) == Orientation::Negative {
            winding -= 1;
        }
    }
    if winding == 0 {
        BoundedSide::Outside
    } else {
        BoundedSide::Inside
    }
}

/// Exact position of `p` relative to a polygon with holes
///
/// A point inside a hole is outside the polygon.
pub fn polygon_side(polygon: &Polygon, p: &Point2) -> BoundedSide {
    match ring_side(polygon.exterior(), p) {
        BoundedSide::Inside => {}
        side => return side,
    }
    for hole in polygon.interiors() {
        match ring_side(hole, p) {
            BoundedSide::Inside => return BoundedSide::Outside,
            BoundedSide::Boundary => return BoundedSide::Boundary,
            BoundedSide::Outside => {}
        }
    }
    BoundedSide::Inside
}

fn segment_box(s: &Segment<Point2>) -> BoundingBox {
    BoundingBox::from_points(&[s.source().to_point3(), s.target().to_point3()])
}

/// Split `segment` where it meets the polygon boundary
///
/// Pieces running along an edge count as inside.
pub fn clip_segment(polygon: &Polygon, segment: &Segment<Point2>) -> SegmentSplit<Point2> {
    let edges = polygon_edges(polygon);
    let mut cuts = Vec::new();
    for edge in &edges {
        match segment.intersection(edge) {
            Some(SegmentIntersection::Point(p)) => cuts.push(p),
            Some(SegmentIntersection::Segment(s)) => cuts.extend([*s.source(), *s.target()]),
            None => {}
        }
    }
    SegmentSplit::new(
        segment,
        cuts,
        |p, q| {
            edges.iter().any(|e| e.has_on(p) && e.has_on(q))
                || polygon_side(polygon, &Point2::midpoint(p, q)) != BoundedSide::Outside
        },
        |p| polygon_side(polygon, p) != BoundedSide::Outside,
    )
}

fn boundaries_meet(a: &Polygon, b: &Polygon) -> bool {
    let (edges_a, edges_b) = (polygon_edges(a), polygon_edges(b));
    let boxes_a: Vec<BoundingBox> = edges_a.iter().map(segment_box).collect();
    let boxes_b: Vec<BoundingBox> = edges_b.iter().map(segment_box).collect();
    overlapping_pairs(&boxes_a, &boxes_b, 2, 10, |i, j| {
        if edges_a[i].intersects(&edges_b[j]) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .is_break()
}

fn first_vertex(polygon: &Polygon) -> Option<Point2> {
    polygon.exterior().0.first().map(point)
}

fn polygons_intersect(a: &Polygon, b: &Polygon) -> bool {
    if boundaries_meet(a, b) {
        return true;
    }
    // disjoint boundaries: one polygon is within the other or they are apart
    let inside = |outer: &Polygon, inner: &Polygon| {
        first_vertex(inner).is_some_and(|v| polygon_side(outer, &v) != BoundedSide::Outside)
    };
    inside(a, b) || inside(b, a)
}

fn add_intersection(out: &mut GeometrySet<Dim2>, piece: SegmentIntersection<Point2>) {
    match piece {
        SegmentIntersection::Point(p) => out.add_point(p),
        SegmentIntersection::Segment(s) => out.add_segment(s),
    }
}

/// Whether `polygon` holds `segment` entirely, boundary included
fn polygon_covers_segment(polygon: &Polygon, segment: &Segment<Point2>) -> bool {
    clip_segment(polygon, segment).is_fully_inside()
}

/// Area pieces of a `geo` boolean result, slivers dropped
pub(crate) fn area_pieces(result: geo::MultiPolygon<f64>) -> Vec<Polygon> {
    result
        .0
        .into_iter()
        .filter(|p| p.exterior().0.len() >= 4 && p.unsigned_area() > 0.0)
        .collect()
}

fn intersect_polygons(a: &Polygon, b: &Polygon, out: &mut GeometrySet<Dim2>) {
    let areas = area_pieces(a.intersection(b));

    // boundary contacts outside of the area result
    let (mut points, mut segments) = (Vec::new(), Vec::new());
    for ea in polygon_edges(a) {
        for eb in polygon_edges(b) {
            match ea.intersection(&eb) {
                Some(SegmentIntersection::Point(p)) => points.push(p),
                Some(SegmentIntersection::Segment(s)) => segments.push(s),
                None => {}
            }
        }
    }
    for s in &segments {
        if !areas.iter().any(|area| polygon_covers_segment(area, s)) {
            out.add_segment(*s);
        }
    }
    for p in &points {
        let covered = segments.iter().any(|s| s.has_on(p))
            || areas.iter().any(|area| polygon_side(area, p) != BoundedSide::Outside);
        if !covered {
            out.add_point(*p);
        }
    }
    for area in areas {
        out.add_surface(area);
    }
}

/// A point strictly inside the hole ring
fn hole_sample(hole: &geo::LineString<f64>) -> Option<Point2> {
    let region = to_geo_polygon(&ring_points(hole), &[]);
    triangulate_polygon_2d(&region).first().map(|[a, b, c]| {
        Point2::new((a.x() + b.x() + c.x()) / 3.0, (a.y() + b.y() + c.y()) / 3.0)
    })
}

fn polygon_covers_polygon(a: &Polygon, b: &Polygon) -> bool {
    polygon_edges(b).iter().all(|edge| polygon_covers_segment(a, edge))
        && a
            .interiors()
            .iter()
            .filter_map(hole_sample)
            .all(|sample| polygon_side(b, &sample) != BoundedSide::Inside)
}

pub fn intersects(a: PrimitiveRef<'_, Dim2>, b: PrimitiveRef<'_, Dim2>) -> bool {
    match (a, b) {
        (PrimitiveRef::Volume(v), _) | (_, PrimitiveRef::Volume(v)) => v.value.absurd(),
        (PrimitiveRef::Point(_), PrimitiveRef::Segment(_) | PrimitiveRef::Surface(_))
        | (PrimitiveRef::Segment(_), PrimitiveRef::Surface(_)) => intersects(b, a),
        (PrimitiveRef::Point(p), PrimitiveRef::Point(q)) => p.value == q.value,
        (PrimitiveRef::Segment(s), PrimitiveRef::Point(q)) => s.value.has_on(&q.value),
        (PrimitiveRef::Segment(s), PrimitiveRef::Segment(t)) => s.value.intersects(&t.value),
        (PrimitiveRef::Surface(f), PrimitiveRef::Point(q)) => {
            polygon_side(&f.value, &q.value) != BoundedSide::Outside
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Segment(s)) => {
            polygon_edges(&f.value).iter().any(|e| e.intersects(&s.value))
                || polygon_side(&f.value, s.value.source()) != BoundedSide::Outside
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Surface(g)) => polygons_intersect(&f.value, &g.value),
    }
}

pub fn intersection(a: PrimitiveRef<'_, Dim2>, b: PrimitiveRef<'_, Dim2>, out: &mut GeometrySet<Dim2>) {
    match (a, b) {
        (PrimitiveRef::Volume(v), _) | (_, PrimitiveRef::Volume(v)) => v.value.absurd(),
        (PrimitiveRef::Point(_), PrimitiveRef::Segment(_) | PrimitiveRef::Surface(_))
        | (PrimitiveRef::Segment(_), PrimitiveRef::Surface(_)) => intersection(b, a, out),
        (PrimitiveRef::Point(p), PrimitiveRef::Point(q)) => {
            if p.value == q.value {
                out.add_point(p.value);
            }
        }
        (PrimitiveRef::Segment(s), PrimitiveRef::Point(q)) => {
            if s.value.has_on(&q.value) {
                out.add_point(q.value);
            }
        }
        (PrimitiveRef::Segment(s), PrimitiveRef::Segment(t)) => {
            if let Some(piece) = s.value.intersection(&t.value) {
                add_intersection(out, piece);
            }
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Point(q)) => {
            if polygon_side(&f.value, &q.value) != BoundedSide::Outside {
                out.add_point(q.value);
            }
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Segment(s)) => {
            for piece in clip_segment(&f.value, &s.value).inside_pieces() {
                add_intersection(out, piece);
            }
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Surface(g)) => {
            intersect_polygons(&f.value, &g.value, out)
        }
    }
}

/// `a - b` for intersecting primitives
pub fn subtract(a: PrimitiveRef<'_, Dim2>, b: PrimitiveRef<'_, Dim2>) -> Remainder<Dim2> {
    match (a, b) {
        (PrimitiveRef::Volume(v), _) | (_, PrimitiveRef::Volume(v)) => v.value.absurd(),
        (PrimitiveRef::Point(_), _) => Remainder::Reduced(GeometrySet::new()),
        (PrimitiveRef::Segment(_), PrimitiveRef::Point(_))
        | (PrimitiveRef::Surface(_), PrimitiveRef::Point(_) | PrimitiveRef::Segment(_)) => {
            Remainder::Unchanged
        }
        (PrimitiveRef::Segment(s), PrimitiveRef::Segment(t)) => {
            match s.value.intersection(&t.value) {
                Some(SegmentIntersection::Segment(overlap)) => {
                    reduced_segments(s.value.without(&overlap))
                }
                _ => Remainder::Unchanged,
            }
        }
        (PrimitiveRef::Segment(s), PrimitiveRef::Surface(f)) => {
            let split = clip_segment(&f.value, &s.value);
            if split.has_inside_interval() {
                reduced_segments(split.outside_segments())
            } else {
                Remainder::Unchanged
            }
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Surface(g)) => {
            let mut rest = GeometrySet::new();
            for polygon in area_pieces(f.value.difference(&g.value)) {
                rest.add_surface(polygon);
            }
            Remainder::Reduced(rest)
        }
    }
}

fn reduced_segments(segments: Vec<Segment<Point2>>) -> Remainder<Dim2> {
    let mut rest = GeometrySet::new();
    for segment in segments {
        rest.add_segment(segment);
    }
    Remainder::Reduced(rest)
}

/// Whether `a` contains all of `b`
pub fn covers(a: PrimitiveRef<'_, Dim2>, b: PrimitiveRef<'_, Dim2>) -> bool {
    match (a, b) {
        (PrimitiveRef::Volume(v), _) | (_, PrimitiveRef::Volume(v)) => v.value.absurd(),
        (PrimitiveRef::Point(_), PrimitiveRef::Segment(_) | PrimitiveRef::Surface(_))
        | (PrimitiveRef::Segment(_), PrimitiveRef::Surface(_)) => false,
        (PrimitiveRef::Point(p), PrimitiveRef::Point(q)) => p.value == q.value,
        (PrimitiveRef::Segment(s), PrimitiveRef::Point(q)) => s.value.has_on(&q.value),
        (PrimitiveRef::Segment(s), PrimitiveRef::Segment(t)) => {
            s.value.has_on(t.value.source()) && s.value.has_on(t.value.target())
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Point(q)) => {
            polygon_side(&f.value, &q.value) != BoundedSide::Outside
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Segment(s)) => polygon_covers_segment(&f.value, &s.value),
        (PrimitiveRef::Surface(f), PrimitiveRef::Surface(g)) => polygon_covers_polygon(&f.value, &g.value),
    }
}
