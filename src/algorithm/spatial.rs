// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Pairwise rules for spatial primitives
//!
//! Coplanar triangles are handled in their common plane with `geo` polygon
//! operations. Volumes go through BSP corefinement and exact point location.

use super::planar::area_pieces;
use crate::config::{EngineConfig, NonCoplanarPolicy};
use crate::error::{Result, SetOpError};
use crate::geometry::BoundingBox;
use crate::kernel::{
    BoundedSide, PlaneFrame, Point2, Point3, Polyhedron, Segment, SegmentIntersection, Triangle3,
};
use crate::mesh::{csg, split_segment, to_geo_polygon, triangulate_in_frame, Keep};
use crate::set::{Dim3, Flagged, GeometrySet, PrimitiveFlags, PrimitiveRef, Remainder};
use geo::BooleanOps;

/// Relative volume below which a corefinement result counts as void
const VOLUME_EPSILON: f64 = 1e-9;

/// Common plane of two coplanar triangles, with both projected
struct CoplanarPair {
    frame: PlaneFrame,
    first: geo::Polygon<f64>,
    second: geo::Polygon<f64>,
}

impl CoplanarPair {
    fn new(a: &Triangle3, b: &Triangle3) -> Self {
        let mut frame = PlaneFrame::new(*a.vertex(0), a.normal());
        let first: Vec<Point2> = a.vertices().iter().map(|v| frame.register(v)).collect();
        let second: Vec<Point2> = b.vertices().iter().map(|v| frame.register(v)).collect();
        Self {
            first: to_geo_polygon(&first, &[]),
            second: to_geo_polygon(&second, &[]),
            frame,
        }
    }

    fn lift(&self, pieces: Vec<geo::Polygon<f64>>) -> Vec<Triangle3> {
        pieces
            .iter()
            .flat_map(|piece| triangulate_in_frame(piece, &self.frame))
            .collect()
    }

    fn intersection(&self) -> Vec<Triangle3> {
        self.lift(area_pieces(self.first.intersection(&self.second)))
    }

    fn difference(&self) -> Vec<Triangle3> {
        self.lift(area_pieces(self.first.difference(&self.second)))
    }
}

/// Add points and segments, skipping points that lie on one of the segments
fn add_contacts(
    out: &mut GeometrySet<Dim3>,
    pieces: impl IntoIterator<Item = SegmentIntersection<Point3>>,
) {
    let (mut points, mut segments) = (Vec::new(), Vec::new());
    for piece in pieces {
        match piece {
            SegmentIntersection::Point(p) => points.push(p),
            SegmentIntersection::Segment(s) => segments.push(s),
        }
    }
    for p in points {
        if !segments.iter().any(|s: &Segment<Point3>| s.has_on(&p)) {
            out.add_point(p);
        }
    }
    for s in segments {
        out.add_segment(s);
    }
}

fn edge_contacts(a: &Triangle3, b: &Triangle3) -> Vec<SegmentIntersection<Point3>> {
    let mut pieces = Vec::new();
    for e in a.edges() {
        pieces.extend(b.intersect_segment(&e));
    }
    for e in b.edges() {
        pieces.extend(a.intersect_segment(&e));
    }
    pieces
}

/// Lower-dimensional contacts of two triangles
fn triangle_contacts(a: &Triangle3, b: &Triangle3) -> Vec<SegmentIntersection<Point3>> {
    if a.is_coplanar_with(b) {
        edge_contacts(a, b)
    } else {
        a.crossing_section(b).into_iter().collect()
    }
}

fn intersect_triangles(a: &Triangle3, b: &Triangle3, out: &mut GeometrySet<Dim3>) {
    if a.is_coplanar_with(b) {
        let area = CoplanarPair::new(a, b).intersection();
        if area.is_empty() {
            add_contacts(out, edge_contacts(a, b));
        }
        for triangle in area {
            out.add_surface(triangle);
        }
    } else if let Some(piece) = a.crossing_section(b) {
        add_contacts(out, [piece]);
    }
}

/// Boundary triangles whose box meets `reach`
fn boundary_near(mesh: &Polyhedron, reach: BoundingBox) -> impl Iterator<Item = Triangle3> + '_ {
    mesh.triangles()
        .filter(move |t| t.bounding_box().overlaps(&reach, 3))
}

fn flagged_volume(mesh: Polyhedron) -> Flagged<Polyhedron> {
    let flags = if mesh.is_planar() {
        PrimitiveFlags::IS_PLANAR
    } else {
        PrimitiveFlags::NONE
    };
    Flagged::with_flags(mesh, flags)
}

fn is_void(mesh: &Polyhedron, reference: &Polyhedron) -> bool {
    mesh.is_empty()
        || mesh.signed_volume().abs() <= VOLUME_EPSILON * reference.signed_volume().abs().max(1.0)
}

fn volume_intersects(mesh: &Polyhedron, other: PrimitiveRef<'_, Dim3>) -> bool {
    if other
        .vertices()
        .iter()
        .any(|v| mesh.locate(v) != BoundedSide::Outside)
    {
        return true;
    }
    let reach = other.bounding_box();
    match other {
        PrimitiveRef::Point(_) => false,
        PrimitiveRef::Segment(s) => {
            boundary_near(mesh, reach).any(|t| t.intersects_segment(&s.value))
        }
        PrimitiveRef::Surface(f) => {
            boundary_near(mesh, reach).any(|t| t.intersects_triangle(&f.value))
        }
        PrimitiveRef::Volume(v) => {
            mesh.vertices()
                .iter()
                .any(|p| v.value.locate(p) != BoundedSide::Outside)
                || boundary_near(mesh, reach).any(|t| {
                    boundary_near(&v.value, t.bounding_box()).any(|u| t.intersects_triangle(&u))
                })
        }
    }
}

pub fn intersects(a: PrimitiveRef<'_, Dim3>, b: PrimitiveRef<'_, Dim3>) -> bool {
    match (a, b) {
        (PrimitiveRef::Volume(v), other) => volume_intersects(&v.value, other),
        (PrimitiveRef::Surface(f), PrimitiveRef::Surface(g)) => {
            f.value.intersects_triangle(&g.value)
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Segment(s)) => {
            f.value.intersects_segment(&s.value)
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Point(q)) => f.value.has_on(&q.value),
        (PrimitiveRef::Segment(s), PrimitiveRef::Segment(t)) => s.value.intersects(&t.value),
        (PrimitiveRef::Segment(s), PrimitiveRef::Point(q)) => s.value.has_on(&q.value),
        (PrimitiveRef::Point(p), PrimitiveRef::Point(q)) => p.value == q.value,
        // lower kind first
        (PrimitiveRef::Point(_) | PrimitiveRef::Segment(_) | PrimitiveRef::Surface(_), _) => {
            intersects(b, a)
        }
    }
}

pub fn intersection(
    a: PrimitiveRef<'_, Dim3>,
    b: PrimitiveRef<'_, Dim3>,
    out: &mut GeometrySet<Dim3>,
) {
    match (a, b) {
        (PrimitiveRef::Volume(v), PrimitiveRef::Volume(w)) => {
            intersect_volumes(&v.value, &w.value, out)
        }
        (PrimitiveRef::Volume(v), PrimitiveRef::Surface(f)) => {
            let inside = csg::clip_triangles(&[f.value], &v.value, Keep::Inside);
            if inside.is_empty() {
                let contacts: Vec<_> = boundary_near(&v.value, f.value.bounding_box())
                    .flat_map(|t| triangle_contacts(&f.value, &t))
                    .collect();
                add_contacts(out, contacts);
            }
            for triangle in inside {
                out.add_surface(triangle);
            }
        }
        (PrimitiveRef::Volume(v), PrimitiveRef::Segment(s)) => {
            add_contacts(out, split_segment(&s.value, &v.value).inside_pieces());
        }
        (PrimitiveRef::Volume(v), PrimitiveRef::Point(q)) => {
            if v.value.locate(&q.value) != BoundedSide::Outside {
                out.add_point(q.value);
            }
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Surface(g)) => {
            intersect_triangles(&f.value, &g.value, out)
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Segment(s)) => {
            add_contacts(out, f.value.intersect_segment(&s.value));
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Point(q)) => {
            if f.value.has_on(&q.value) {
                out.add_point(q.value);
            }
        }
        (PrimitiveRef::Segment(s), PrimitiveRef::Segment(t)) => {
            add_contacts(out, s.value.intersection(&t.value));
        }
        (PrimitiveRef::Segment(s), PrimitiveRef::Point(q)) => {
            if s.value.has_on(&q.value) {
                out.add_point(q.value);
            }
        }
        (PrimitiveRef::Point(p), PrimitiveRef::Point(q)) => {
            if p.value == q.value {
                out.add_point(p.value);
            }
        }
        // lower kind first
        (PrimitiveRef::Point(_) | PrimitiveRef::Segment(_) | PrimitiveRef::Surface(_), _) => {
            intersection(b, a, out)
        }
    }
}

fn intersect_volumes(a: &Polyhedron, b: &Polyhedron, out: &mut GeometrySet<Dim3>) {
    let common = csg::intersection(a, b);
    if !is_void(&common, a) {
        out.add_flagged_volume(flagged_volume(common));
        return;
    }
    // touching solids: shared faces, else edges and corners
    let faces: Vec<Triangle3> = b.triangles().collect();
    let shared = csg::clip_triangles(&faces, a, Keep::Inside);
    if shared.is_empty() {
        let mut contacts = Vec::new();
        for t in b.triangles() {
            for u in boundary_near(a, t.bounding_box()) {
                contacts.extend(triangle_contacts(&t, &u));
            }
        }
        add_contacts(out, contacts);
    }
    for triangle in shared {
        out.add_surface(triangle);
    }
}

fn reduced(build: impl FnOnce(&mut GeometrySet<Dim3>)) -> Remainder<Dim3> {
    let mut rest = GeometrySet::new();
    build(&mut rest);
    Remainder::Reduced(rest)
}

fn surfaces(triangles: Vec<Triangle3>) -> Remainder<Dim3> {
    reduced(|rest| {
        for triangle in triangles {
            rest.add_surface(triangle);
        }
    })
}

fn segments(pieces: Vec<Segment<Point3>>) -> Remainder<Dim3> {
    reduced(|rest| {
        for piece in pieces {
            rest.add_segment(piece);
        }
    })
}

fn subtract_triangles(
    a: &Triangle3,
    b: &Triangle3,
    config: &EngineConfig,
) -> Result<Remainder<Dim3>> {
    if a.is_coplanar_with(b) {
        return Ok(surfaces(CoplanarPair::new(a, b).difference()));
    }
    match config.non_coplanar {
        NonCoplanarPolicy::Reject => Err(SetOpError::NonCoplanarSurfaces {
            first: a.to_string(),
            second: b.to_string(),
        }),
        NonCoplanarPolicy::KeepMinuend => {
            tracing::warn!(
                first = %a,
                second = %b,
                "keeping the minuend of a non-coplanar surface difference"
            );
            Ok(Remainder::Unchanged)
        }
    }
}

/// `a - b` for intersecting primitives
pub fn subtract(
    a: PrimitiveRef<'_, Dim3>,
    b: PrimitiveRef<'_, Dim3>,
    config: &EngineConfig,
) -> Result<Remainder<Dim3>> {
    if a.primitive_type() > b.primitive_type() {
        return Ok(Remainder::Unchanged);
    }
    let remainder = match (a, b) {
        (PrimitiveRef::Point(_), _) => Remainder::Reduced(GeometrySet::new()),
        (PrimitiveRef::Segment(s), PrimitiveRef::Segment(t)) => {
            match s.value.intersection(&t.value) {
                Some(SegmentIntersection::Segment(overlap)) => segments(s.value.without(&overlap)),
                _ => Remainder::Unchanged,
            }
        }
        (PrimitiveRef::Segment(s), PrimitiveRef::Surface(f)) => {
            match f.value.intersect_segment(&s.value) {
                Some(SegmentIntersection::Segment(overlap)) => segments(s.value.without(&overlap)),
                _ => Remainder::Unchanged,
            }
        }
        (PrimitiveRef::Segment(s), PrimitiveRef::Volume(v)) => {
            let split = split_segment(&s.value, &v.value);
            if split.has_inside_interval() {
                segments(split.outside_segments())
            } else {
                Remainder::Unchanged
            }
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Surface(g)) => {
            return subtract_triangles(&f.value, &g.value, config)
        }
        (PrimitiveRef::Surface(f), PrimitiveRef::Volume(v)) => {
            surfaces(csg::clip_triangles(&[f.value], &v.value, Keep::Outside))
        }
        (PrimitiveRef::Volume(v), PrimitiveRef::Volume(w)) => {
            let rest = csg::difference(&v.value, &w.value);
            reduced(|set| {
                if !is_void(&rest, &v.value) {
                    set.add_flagged_volume(flagged_volume(rest));
                }
            })
        }
        // lower-dimensional subtrahends were handled above
        (PrimitiveRef::Segment(_) | PrimitiveRef::Surface(_) | PrimitiveRef::Volume(_), _) => {
            Remainder::Unchanged
        }
    };
    Ok(remainder)
}

/// Whether `a` contains all of `b`
pub fn covers(a: PrimitiveRef<'_, Dim3>, b: PrimitiveRef<'_, Dim3>) -> bool {
    if a.primitive_type() < b.primitive_type() {
        return false;
    }
    match (a, b) {
        (PrimitiveRef::Volume(v), PrimitiveRef::Volume(w)) => {
            w.value.vertices().iter().all(|p| v.value.locate(p) != BoundedSide::Outside)
                && is_void(&csg::difference(&w.value, &v.value), &w.value)
        }
        (PrimitiveRef::Volume(v), PrimitiveRef::Surface(f)) => {
            f.value.vertices().iter().all(|p| v.value.locate(p) != BoundedSide::Outside)
                && csg::clip_triangles(&[f.value], &v.value, Keep::Outside).is_empty()
        }
        (PrimitiveRef::Volume(v), PrimitiveRef::Segment(s)) => {
            split_segment(&s.value, &v.value).is_fully_inside()
        }
        (PrimitiveRef::Volume(v), PrimitiveRef::Point(q)) => {
            v.value.locate(&q.value) != BoundedSide::Outside
        }
        // triangles are convex: holding the vertices is enough
        (PrimitiveRef::Surface(f), other) => other.vertices().iter().all(|p| f.value.has_on(p)),
        (PrimitiveRef::Segment(s), other) => other.vertices().iter().all(|p| s.value.has_on(p)),
        (PrimitiveRef::Point(p), PrimitiveRef::Point(q)) => p.value == q.value,
        (PrimitiveRef::Point(_), _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::cuboid;
    use approx::assert_relative_eq;

    fn pt(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn area(set: &GeometrySet<Dim3>) -> f64 {
        set.surfaces().iter().map(|s| s.value.area()).sum()
    }

    #[test]
    fn test_volume_intersects() {
        let cube = Flagged::new(cuboid([0.0; 3], [2.0; 3]));
        let inside = Flagged::new(pt(1.0, 1.0, 1.0));
        let through = Flagged::new(Segment::new(pt(-1.0, 1.0, 1.0), pt(3.0, 1.0, 1.0)));
        let away = Flagged::new(Triangle3::new(pt(5.0, 0.0, 0.0), pt(6.0, 0.0, 0.0), pt(5.0, 1.0, 0.0)));
        let v = PrimitiveRef::Volume(&cube);
        assert!(intersects(v, PrimitiveRef::Point(&inside)));
        assert!(intersects(PrimitiveRef::Segment(&through), v));
        assert!(!intersects(v, PrimitiveRef::Surface(&away)));
    }

    #[test]
    fn test_volume_inside_volume_intersects() {
        let outer = Flagged::new(cuboid([0.0; 3], [4.0; 3]));
        let inner = Flagged::new(cuboid([1.0; 3], [2.0; 3]));
        assert!(intersects(PrimitiveRef::Volume(&inner), PrimitiveRef::Volume(&outer)));
        assert!(covers(PrimitiveRef::Volume(&outer), PrimitiveRef::Volume(&inner)));
        assert!(!covers(PrimitiveRef::Volume(&inner), PrimitiveRef::Volume(&outer)));
    }

    #[test]
    fn test_segment_minus_volume() {
        let cube = Flagged::new(cuboid([0.0; 3], [2.0; 3]));
        let through = Flagged::new(Segment::new(pt(-1.0, 1.0, 1.0), pt(3.0, 1.0, 1.0)));
        let config = EngineConfig::default();
        match subtract(PrimitiveRef::Segment(&through), PrimitiveRef::Volume(&cube), &config) {
            Ok(Remainder::Reduced(rest)) => {
                let pieces: Vec<_> = rest.segments().iter().map(|s| s.value).collect();
                assert_eq!(
                    pieces,
                    vec![
                        Segment::new(pt(-1.0, 1.0, 1.0), pt(0.0, 1.0, 1.0)),
                        Segment::new(pt(2.0, 1.0, 1.0), pt(3.0, 1.0, 1.0)),
                    ]
                );
            }
            other => panic!("unexpected remainder: {other:?}"),
        }
    }

    #[test]
    fn test_coplanar_triangle_difference() {
        let big = Flagged::new(Triangle3::new(pt(0.0, 0.0, 1.0), pt(4.0, 0.0, 1.0), pt(0.0, 4.0, 1.0)));
        let corner = Flagged::new(Triangle3::new(pt(0.0, 0.0, 1.0), pt(2.0, 0.0, 1.0), pt(0.0, 2.0, 1.0)));
        let config = EngineConfig::default();
        let rest = match subtract(PrimitiveRef::Surface(&big), PrimitiveRef::Surface(&corner), &config) {
            Ok(Remainder::Reduced(rest)) => rest,
            other => panic!("unexpected remainder: {other:?}"),
        };
        assert_relative_eq!(area(&rest), 6.0, epsilon = 1e-12);
        for t in rest.surfaces() {
            assert!(t.value.normal().z > 0.0);
            assert!(t.value.vertices().iter().all(|v| v.z() == 1.0));
        }
    }

    #[test]
    fn test_non_coplanar_policy() {
        let flat = Flagged::new(Triangle3::new(pt(0.0, 0.0, 0.0), pt(4.0, 0.0, 0.0), pt(0.0, 4.0, 0.0)));
        let upright = Flagged::new(Triangle3::new(pt(1.0, 1.0, -1.0), pt(1.0, 1.0, 1.0), pt(2.0, 1.0, 0.0)));
        let (a, b) = (PrimitiveRef::Surface(&flat), PrimitiveRef::Surface(&upright));
        assert!(intersects(a, b));

        let strict = EngineConfig::default();
        assert!(matches!(subtract(a, b, &strict), Err(SetOpError::NonCoplanarSurfaces { .. })));

        let lenient = EngineConfig {
            non_coplanar: NonCoplanarPolicy::KeepMinuend,
            ..EngineConfig::default()
        };
        assert!(matches!(subtract(a, b, &lenient), Ok(Remainder::Unchanged)));
    }

    #[test]
    fn test_crossing_triangles_meet_in_a_segment() {
        let flat = Flagged::new(Triangle3::new(pt(0.0, 0.0, 0.0), pt(4.0, 0.0, 0.0), pt(0.0, 4.0, 0.0)));
        let upright = Flagged::new(Triangle3::new(pt(1.0, 1.0, -1.0), pt(1.0, 1.0, 1.0), pt(2.0, 1.0, 0.0)));
        let mut out = GeometrySet::new();
        intersection(PrimitiveRef::Surface(&flat), PrimitiveRef::Surface(&upright), &mut out);
        assert!(!out.has_surfaces());
        assert_eq!(out.segments().len(), 1);
        let piece = out.segments().iter().next().map(|s| s.value);
        assert_eq!(piece, Some(Segment::new(pt(1.0, 1.0, 0.0), pt(2.0, 1.0, 0.0))));
    }

    #[test]
    fn test_overlapping_volumes_intersect_in_a_volume() {
        let a = Flagged::new(cuboid([0.0; 3], [2.0; 3]));
        let b = Flagged::new(cuboid([1.0; 3], [3.0; 3]));
        let mut out = GeometrySet::new();
        intersection(PrimitiveRef::Volume(&a), PrimitiveRef::Volume(&b), &mut out);
        assert_eq!(out.volumes().len(), 1);
        assert!(!out.volumes()[0].flags.contains(PrimitiveFlags::IS_PLANAR));
        assert_relative_eq!(out.volumes()[0].value.signed_volume(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_triangle_covers_by_vertices() {
        let t = Flagged::new(Triangle3::new(pt(0.0, 0.0, 0.0), pt(4.0, 0.0, 0.0), pt(0.0, 4.0, 0.0)));
        let inner = Flagged::new(Segment::new(pt(1.0, 1.0, 0.0), pt(3.0, 0.0, 0.0)));
        let off = Flagged::new(Segment::new(pt(1.0, 1.0, 0.0), pt(1.0, 1.0, 1.0)));
        assert!(covers(PrimitiveRef::Surface(&t), PrimitiveRef::Segment(&inner)));
        assert!(!covers(PrimitiveRef::Surface(&t), PrimitiveRef::Segment(&off)));
        assert!(!covers(PrimitiveRef::Segment(&inner), PrimitiveRef::Surface(&t)));
    }
}
