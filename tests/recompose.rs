// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Decomposition into primitive sets and the way back

use polyset::geometry::{
    Geometry, GeometryType, LineString, Point, PolyhedralSurface, Polygon, Solid, Triangle,
};
use polyset::set::RecomposeOptions;
use polyset::{Dim2, Dim3, GeometrySet, PrimitiveType};

fn square_xyz(z: f64) -> Polygon {
    Polygon::new(LineString::from_xyz(&[
        (0.0, 0.0, z),
        (1.0, 0.0, z),
        (1.0, 1.0, z),
        (0.0, 1.0, z),
        (0.0, 0.0, z),
    ]))
}

fn unit_cube() -> Geometry {
    let v = [
        (0.0, 0.0, 0.0),
        (1.0, 0.0, 0.0),
        (1.0, 1.0, 0.0),
        (0.0, 1.0, 0.0),
        (0.0, 0.0, 1.0),
        (1.0, 0.0, 1.0),
        (1.0, 1.0, 1.0),
        (0.0, 1.0, 1.0),
    ];
    let quads = [[0, 3, 2, 1], [4, 5, 6, 7], [0, 1, 5, 4], [1, 2, 6, 5], [2, 3, 7, 6], [3, 0, 4, 7]];
    Geometry::Solid(Solid::new(PolyhedralSurface::new(
        quads
            .iter()
            .map(|q| Polygon::new(LineString::from_xyz(&[v[q[0]], v[q[1]], v[q[2]], v[q[3]], v[q[0]]])))
            .collect(),
    )))
}

#[test]
fn test_duplicate_points_collapse() {
    let points = Geometry::MultiPoint(vec![Point::new(1.0, 2.0), Point::new(1.0, 2.0), Point::new(0.0, 0.0)]);
    let set = GeometrySet::<Dim2>::from_geometry(&points);
    assert_eq!(set.points().len(), 2);
    assert_eq!(set.recompose().to_string(), "MULTIPOINT((0 0),(1 2))");
}

#[test]
fn test_lines_are_stitched_back() {
    let line = Geometry::LineString(LineString::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]));
    let set = GeometrySet::<Dim2>::from_geometry(&line);
    assert_eq!(set.len_of(PrimitiveType::Segment), 2);
    assert_eq!(set.recompose(), line);
}

#[test]
fn test_planar_triangle_comes_back_as_triangle() {
    let polygon = Geometry::Polygon(Polygon::new(LineString::from_xy(&[
        (0.0, 0.0),
        (1.0, 0.0),
        (0.0, 1.0),
        (0.0, 0.0),
    ])));
    let set = GeometrySet::<Dim2>::from_geometry(&polygon);
    assert_eq!(set.recompose().geometry_type(), GeometryType::Triangle);
}

#[test]
fn test_solids_are_skipped_in_the_plane() {
    let mixed = Geometry::GeometryCollection(vec![unit_cube(), Geometry::Point(Point::new(3.0, 3.0))]);
    let set = GeometrySet::<Dim2>::from_geometry(&mixed);
    assert_eq!(set.len(), 1);
    assert!(!set.has_volumes());
    assert_eq!(set.maximum_dimension(), 0);
}

#[test]
fn test_spatial_polygons_are_triangulated() {
    let surface = Geometry::MultiPolygon(vec![square_xyz(0.0), square_xyz(1.0)]);
    let set = GeometrySet::<Dim3>::from_geometry(&surface);
    assert_eq!(set.surfaces().len(), 4);
    let back = set.recompose();
    assert_eq!(back.geometry_type(), GeometryType::TriangulatedSurface);
    assert_eq!(back.dimension(), 2);
}

#[test]
fn test_solid_round_trip() {
    let set = GeometrySet::<Dim3>::from_geometry(&unit_cube());
    assert_eq!(set.volumes().len(), 1);
    assert_eq!(set.maximum_dimension(), 3);

    let Geometry::Solid(merged) = set.recompose() else {
        panic!("expected a solid");
    };
    assert_eq!(merged.exterior_shell().map(|s| s.num_polygons()), Some(6));

    let Geometry::Solid(raw) = set.recompose_with(&RecomposeOptions { merge_facets: false }) else {
        panic!("expected a solid");
    };
    assert_eq!(raw.exterior_shell().map(|s| s.num_polygons()), Some(12));
}

#[test]
fn test_flat_solid_becomes_polygon() {
    // a degenerate solid lying in z = 0
    let top = square_xyz(0.0);
    let mut bottom = square_xyz(0.0);
    if let Some(ring) = bottom.rings.first_mut() {
        ring.points.reverse();
    }
    let flat = Geometry::Solid(Solid::new(PolyhedralSurface::new(vec![top, bottom])));
    let set = GeometrySet::<Dim3>::from_geometry(&flat);
    assert_eq!(set.volumes().len(), 1);
    assert_eq!(set.recompose().geometry_type(), GeometryType::Polygon);
}

#[test]
fn test_complete_set() {
    let set = GeometrySet::<Dim3>::complete();
    assert!(set.is_complete());
    assert_eq!(set.maximum_dimension(), 3);
    assert!(GeometrySet::<Dim2>::new().recompose().is_empty());
}

#[test]
fn test_triangles_in_space() {
    let triangle = Geometry::Triangle(Triangle::new(
        Point::new_3d(0.0, 0.0, 1.0),
        Point::new_3d(1.0, 0.0, 1.0),
        Point::new_3d(0.0, 1.0, 1.0),
    ));
    let set = GeometrySet::<Dim3>::from_geometry(&triangle);
    assert_eq!(set.recompose(), triangle);
}
