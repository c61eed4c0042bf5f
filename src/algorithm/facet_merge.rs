// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Merging coplanar facets into polygons
//!
//! Facets are grouped by supporting plane. Inside a group a ring of directed
//! edges starts from one facet; other facets are grafted onto it where one
//! of their edges runs opposite to a ring edge. Facets that cannot be grafted
//! yet are retried after the ring has grown, and start a new ring once
//! nothing more fits.

use crate::geometry::{LineString, Point, PolyhedralSurface, Polygon};
use crate::kernel::{drop_collinear, newell_normal, Point3, Polyhedron, Triangle3};
use nalgebra::Vector3;

type Edge = (Point3, Point3);

struct PlaneGroup {
    reference: Triangle3,
    normal: Vector3<f64>,
    facets: Vec<usize>,
}

impl PlaneGroup {
    fn accepts(&self, facet: &[Point3], normal: &Vector3<f64>) -> bool {
        normal.dot(&self.normal) > 0.0 && facet.iter().all(|p| self.reference.side_of(p).is_zero())
    }
}

fn reference_triangle(facet: &[Point3]) -> Option<Triangle3> {
    (1..facet.len().saturating_sub(1))
        .map(|i| Triangle3::new(facet[0], facet[i], facet[i + 1]))
        .find(|t| !t.is_degenerate())
}

fn facet_edges(facet: &[Point3]) -> Vec<Edge> {
    let n = facet.len();
    (0..n)
        .map(|i| (facet[i], facet[(i + 1) % n]))
        .filter(|(a, b)| a != b)
        .collect()
}

/// Splice `facet` into `ring` at the first edge it shares in reverse
fn graft(ring: &mut Vec<Edge>, facet: &[Edge]) -> bool {
    for (k, &(u, v)) in facet.iter().enumerate() {
        let Some(at) = ring.iter().position(|&(a, b)| a == v && b == u) else {
            continue;
        };
        // path from v back to u around the facet
        let path: Vec<Edge> = facet[k + 1..].iter().chain(&facet[..k]).copied().collect();
        ring.splice(at..=at, path);
        cancel_spikes(ring);
        return true;
    }
    false
}

/// Remove consecutive edge pairs that run back and forth
fn cancel_spikes(ring: &mut Vec<Edge>) {
    loop {
        let n = ring.len();
        if n < 2 {
            return;
        }
        let Some(i) = (0..n).find(|&i| {
            let (a, b) = ring[i];
            let (c, d) = ring[(i + 1) % n];
            a == d && b == c
        }) else {
            return;
        };
        let j = (i + 1) % n;
        ring.remove(i.max(j));
        ring.remove(i.min(j));
    }
}

fn close_ring(ring: &[Edge]) -> Option<Polygon> {
    let vertices: Vec<Point3> = ring.iter().map(|&(a, _)| a).collect();
    let vertices = drop_collinear(&vertices);
    if vertices.len() < 3 {
        return None;
    }
    let mut points: Vec<Point> = vertices.iter().map(|p| Point::new_3d(p.x(), p.y(), p.z())).collect();
    points.push(points[0]);
    Some(Polygon::new(LineString::new(points)))
}

fn merge_group(facets: &[Vec<Edge>], members: &[usize], out: &mut Vec<Polygon>) {
    let mut pending: Vec<usize> = members.to_vec();
    while let Some((&seed, rest)) = pending.split_first() {
        let mut ring = facets[seed].clone();
        let mut waiting: Vec<usize> = rest.to_vec();
        loop {
            let before = waiting.len();
            waiting.retain(|&f| !graft(&mut ring, &facets[f]));
            if waiting.len() == before {
                break;
            }
        }
        out.extend(close_ring(&ring));
        pending = waiting;
    }
}

/// Merge planar facets sharing a plane and an edge into polygons
///
/// Facets are closed vertex loops without repetition of the first point.
/// Collinear vertices are dropped from the merged outlines.
pub fn merge_coplanar_facets(facets: &[Vec<Point3>]) -> Vec<Polygon> {
    let mut groups: Vec<PlaneGroup> = Vec::new();
    let mut edges: Vec<Vec<Edge>> = Vec::with_capacity(facets.len());
    for (index, facet) in facets.iter().enumerate() {
        edges.push(facet_edges(facet));
        let Some(reference) = reference_triangle(facet) else {
            continue;
        };
        let normal = newell_normal(facet);
        match groups.iter_mut().find(|g| g.accepts(facet, &normal)) {
            Some(group) => group.facets.push(index),
            None => groups.push(PlaneGroup {
                reference,
                normal,
                facets: vec![index],
            }),
        }
    }
    tracing::trace!(facets = facets.len(), planes = groups.len(), "facet merge");

    let mut polygons = Vec::new();
    for group in &groups {
        merge_group(&edges, &group.facets, &mut polygons);
    }
    polygons
}

fn facet_polygon(facet: &[Point3]) -> Polygon {
    let mut points: Vec<Point> = facet.iter().map(|p| Point::new_3d(p.x(), p.y(), p.z())).collect();
    if let Some(first) = points.first().copied() {
        points.push(first);
    }
    Polygon::new(LineString::new(points))
}

fn exterior_points(polygon: &Polygon) -> Vec<Point3> {
    let mut points: Vec<Point3> = polygon
        .exterior()
        .map(|ring| ring.points.iter().map(|p| Point3::new(p.x, p.y, p.z_or_zero())).collect())
        .unwrap_or_default();
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

impl PolyhedralSurface {
    /// Boundary of a triangle mesh
    ///
    /// With `simplify`, coplanar adjacent triangles are merged; otherwise
    /// every triangle becomes one polygon.
    pub fn from_polyhedron(mesh: &Polyhedron, simplify: bool) -> PolyhedralSurface {
        let facets: Vec<Vec<Point3>> = mesh.triangles().map(|t| t.vertices().to_vec()).collect();
        if simplify {
            PolyhedralSurface::new(merge_coplanar_facets(&facets))
        } else {
            PolyhedralSurface::new(facets.iter().map(|f| facet_polygon(f)).collect())
        }
    }

    /// Copy with coplanar adjacent polygons merged
    ///
    /// Polygons with holes are kept as they are.
    pub fn simplified(&self) -> PolyhedralSurface {
        let (holed, plain): (Vec<&Polygon>, Vec<&Polygon>) =
            self.polygons.iter().partition(|p| !p.interiors().is_empty());
        let facets: Vec<Vec<Point3>> = plain.into_iter().map(exterior_points).collect();
        let mut polygons = merge_coplanar_facets(&facets);
        polygons.extend(holed.into_iter().cloned());
        PolyhedralSurface::new(polygons)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::cuboid;

    fn pt(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn test_fan_around_center_merges_to_quad() {
        let (a, b, c, d) = (pt(0.0, 0.0, 0.0), pt(2.0, 0.0, 0.0), pt(2.0, 1.0, 0.0), pt(0.0, 1.0, 0.0));
        let m = pt(1.0, 0.5, 0.0);
        let facets = vec![vec![a, b, m], vec![b, c, m], vec![c, d, m], vec![d, a, m]];
        let merged = merge_coplanar_facets(&facets);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].exterior().map(|r| r.num_points()), Some(5));
    }

    #[test]
    fn test_out_of_order_facets_are_retried() {
        // strip of three triangles listed with the middle one last
        let (a, b, c) = (pt(0.0, 0.0, 1.0), pt(1.0, 0.0, 1.0), pt(2.0, 0.0, 1.0));
        let (d, e) = (pt(2.0, 1.0, 1.0), pt(0.0, 1.0, 1.0));
        let facets = vec![vec![a, b, e], vec![b, c, d], vec![b, d, e]];
        let merged = merge_coplanar_facets(&facets);
        assert_eq!(merged.len(), 1);
        // b lies on the edge from a to c
        assert_eq!(merged[0].exterior().map(|r| r.num_points()), Some(5));
    }

    #[test]
    fn test_separate_planes_and_islands() {
        let flat = vec![pt(0.0, 0.0, 0.0), pt(1.0, 0.0, 0.0), pt(0.0, 1.0, 0.0)];
        let island = vec![pt(5.0, 5.0, 0.0), pt(6.0, 5.0, 0.0), pt(5.0, 6.0, 0.0)];
        let upright = vec![pt(0.0, 0.0, 0.0), pt(0.0, 0.0, 1.0), pt(1.0, 0.0, 0.0)];
        let flipped = vec![pt(0.0, 0.0, 0.0), pt(0.0, 1.0, 0.0), pt(1.0, 0.0, 0.0)];
        assert_eq!(merge_coplanar_facets(&[flat.clone(), island]).len(), 2);
        assert_eq!(merge_coplanar_facets(&[flat.clone(), upright]).len(), 2);
        assert_eq!(merge_coplanar_facets(&[flat, flipped]).len(), 2);
    }

    #[test]
    fn test_cube_boundary() {
        let cube = cuboid([0.0; 3], [1.0; 3]);
        let merged = PolyhedralSurface::from_polyhedron(&cube, true);
        assert_eq!(merged.num_polygons(), 6);
        assert!(merged
            .polygons
            .iter()
            .all(|p| p.exterior().map(|r| r.num_points()) == Some(5)));
        let raw = PolyhedralSurface::from_polyhedron(&cube, false);
        assert_eq!(raw.num_polygons(), 12);
        assert_eq!(raw.simplified().num_polygons(), 6);
    }
}
