// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Coplanar facet merging on triangulated patches

use polyset::algorithm::merge_coplanar_facets;
use polyset::geometry::{Point, PolyhedralSurface, Polygon};
use polyset::kernel::{Point3, Polyhedron, Triangle3};

fn p(x: f64, y: f64) -> Point3 {
    Point3::new(x, y, 0.0)
}

/// Unit cell at `(i, j)` as two counter-clockwise triangles
fn cell(i: f64, j: f64, rising: bool) -> [Vec<Point3>; 2] {
    let (a, b, c, d) = (p(i, j), p(i + 1.0, j), p(i + 1.0, j + 1.0), p(i, j + 1.0));
    if rising {
        [vec![a, b, c], vec![a, c, d]]
    } else {
        [vec![a, b, d], vec![b, c, d]]
    }
}

fn grid(diagonals: u32) -> Vec<Vec<Point3>> {
    let mut facets = Vec::new();
    for (k, (i, j)) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0), (1.0, 1.0)].into_iter().enumerate() {
        facets.extend(cell(i, j, diagonals & (1 << k) != 0));
    }
    facets
}

fn corners(polygon: &Polygon) -> Vec<Point> {
    let mut points = polygon.exterior().map(|r| r.points.clone()).unwrap_or_default();
    points.pop();
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points
}

#[test]
fn test_square_grid_merges_for_every_diagonal_layout() {
    let expected = vec![
        Point::new_3d(0.0, 0.0, 0.0),
        Point::new_3d(0.0, 2.0, 0.0),
        Point::new_3d(2.0, 0.0, 0.0),
        Point::new_3d(2.0, 2.0, 0.0),
    ];
    for diagonals in 0..16 {
        let merged = merge_coplanar_facets(&grid(diagonals));
        assert_eq!(merged.len(), 1, "layout {diagonals}");
        assert_eq!(corners(&merged[0]), expected, "layout {diagonals}");
    }
}

#[test]
fn test_reversed_listing_merges_too() {
    let mut facets = grid(0b0110);
    facets.reverse();
    let merged = merge_coplanar_facets(&facets);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].exterior().map(|r| r.num_points()), Some(5));
}

#[test]
fn test_l_shape_keeps_reflex_corner() {
    let mut facets = Vec::new();
    facets.extend(cell(0.0, 0.0, true));
    facets.extend(cell(1.0, 0.0, false));
    facets.extend(cell(0.0, 1.0, true));
    let merged = merge_coplanar_facets(&facets);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].exterior().map(|r| r.num_points()), Some(7));
}

#[test]
fn test_disconnected_patches_stay_apart() {
    let mut facets = Vec::new();
    facets.extend(cell(0.0, 0.0, true));
    facets.extend(cell(5.0, 0.0, false));
    assert_eq!(merge_coplanar_facets(&facets).len(), 2);
}

#[test]
fn test_tetrahedron_faces_stay_separate() {
    let (a, b, c, d) = (
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
    );
    let mesh = Polyhedron::from_triangles([
        Triangle3::new(a, c, b),
        Triangle3::new(a, b, d),
        Triangle3::new(b, c, d),
        Triangle3::new(c, a, d),
    ]);
    let surface = PolyhedralSurface::from_polyhedron(&mesh, true);
    assert_eq!(surface.num_polygons(), 4);
    assert!(surface
        .polygons
        .iter()
        .all(|p| p.exterior().map(|r| r.num_points()) == Some(4)));
}
