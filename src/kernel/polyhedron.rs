// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Indexed triangle meshes bounding volumes

use super::point::{KernelPoint, Point3};
use super::predicates::{orient3d, BoundedSide, Orientation};
use super::segment::Segment;
use super::triangle::Triangle3;
use crate::geometry::BoundingBox;
use ahash::{AHashMap, AHashSet};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Ray directions for point location, chosen off every axis and diagonal
const RAY_DIRECTIONS: [[f64; 3]; 6] = [
    [1.0, 0.371_932_6, 0.184_751_3],
    [0.275_318_4, 1.0, 0.412_907_1],
    [0.161_307_9, 0.592_311_7, 1.0],
    [-1.0, 0.441_719_3, -0.238_106_5],
    [0.527_193_1, -1.0, 0.129_374_8],
    [-0.318_462_9, -0.213_785_4, -1.0],
];

/// Triangle mesh with welded vertices
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyhedron {
    vertices: Vec<Point3>,
    faces: Vec<[usize; 3]>,
}

impl Polyhedron {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from triangles, welding identical points and dropping degenerate faces
    pub fn from_triangles(triangles: impl IntoIterator<Item = Triangle3>) -> Self {
        let mut mesh = Self::new();
        let mut index: AHashMap<Point3, usize> = AHashMap::new();
        for triangle in triangles {
            if triangle.is_degenerate() {
                continue;
            }
            let face = triangle.vertices().map(|v| {
                *index.entry(v).or_insert_with(|| {
                    mesh.vertices.push(v);
                    mesh.vertices.len() - 1
                })
            });
            mesh.faces.push(face);
        }
        mesh
    }

    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub fn triangle(&self, face: usize) -> Triangle3 {
        let [a, b, c] = self.faces[face];
        Triangle3::new(self.vertices[a], self.vertices[b], self.vertices[c])
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle3> + '_ {
        (0..self.faces.len()).map(move |i| self.triangle(i))
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(self.vertices.iter().map(|v| v.inner()))
    }

    /// Signed volume (divergence theorem), positive for outward-facing shells
    pub fn signed_volume(&self) -> f64 {
        self.triangles()
            .map(|t| {
                let [a, b, c] = t.vertices().map(|v| v.coords());
                a.dot(&b.cross(&c)) / 6.0
            })
            .sum()
    }

    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|t| t.area()).sum()
    }

    /// Every vertex lies in one plane
    pub fn is_planar(&self) -> bool {
        let Some(reference) = self.triangles().find(|t| !t.is_degenerate()) else {
            return true;
        };
        self.vertices.iter().all(|v| reference.side_of(v).is_zero())
    }

    /// Every directed edge is matched by its opposite
    pub fn is_closed(&self) -> bool {
        let edges: AHashSet<(usize, usize)> = self.directed_edges().collect();
        edges.iter().all(|&(a, b)| edges.contains(&(b, a)))
    }

    fn directed_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.faces
            .iter()
            .flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)])
    }

    /// Exact location of `p` relative to the enclosed volume
    ///
    /// Boundary contact is tested first. Otherwise the parity of ray
    /// crossings decides, retrying along another direction whenever a ray
    /// grazes an edge, a vertex or a face plane.
    pub fn locate(&self, p: &Point3) -> BoundedSide {
        if self.faces.is_empty() {
            return BoundedSide::Outside;
        }
        if self.triangles().any(|t| t.has_on(p)) {
            return BoundedSide::Boundary;
        }
        let bbox = self.bounding_box();
        if !bbox.contains(&BoundingBox::from_point(p.inner()), 3) {
            return BoundedSide::Outside;
        }
        let reach = bbox.size().norm() * 2.0 + 1.0;

        for direction in RAY_DIRECTIONS {
            let direction = Vector3::from(direction).normalize();
            let far = Point3::from(p.inner() + direction * reach);
            if let Some(crossings) = self.count_crossings(p, &far) {
                return inside_if_odd(crossings);
            }
        }
        tracing::warn!(point = %p, rays = RAY_DIRECTIONS.len(), "every location ray was degenerate");
        BoundedSide::Outside
    }

    /// Crossings of segment `p, q` with the faces, `None` on a degenerate hit
    fn count_crossings(&self, p: &Point3, q: &Point3) -> Option<usize> {
        let mut crossings = 0;
        for t in self.triangles() {
            let (sp, sq) = (t.side_of(p), t.side_of(q));
            if sp.is_zero() && sq.is_zero() {
                if t.intersects_segment(&Segment::new(*p, *q)) {
                    return None;
                }
                continue;
            }
            if !sp.opposes(sq) {
                // p is known to be off the faces, q is outside the box
                continue;
            }
            let [a, b, c] = t.vertices();
            let signs = [orient3d(p, q, a, b), orient3d(p, q, b, c), orient3d(p, q, c, a)];
            if signs.iter().any(|s| s.is_zero()) {
                return None;
            }
            if signs.iter().all(|s| *s == Orientation::Positive)
                || signs.iter().all(|s| *s == Orientation::Negative)
            {
                crossings += 1;
            }
        }
        Some(crossings)
    }

    /// Outer boundary of a flat mesh, with collinear vertices removed
    ///
    /// Only faces facing like the first one are used, so doubly covered
    /// patches still yield their outline.
    pub fn boundary_loop(&self) -> Vec<Point3> {
        let Some(first) = self.triangles().find(|t| !t.is_degenerate()) else {
            return Vec::new();
        };
        let reference = first.normal();
        let faces: Vec<[usize; 3]> = self
            .faces
            .iter()
            .zip(self.triangles())
            .filter(|(_, t)| t.normal().dot(&reference) > 0.0)
            .map(|(f, _)| *f)
            .collect();

        let edges: AHashSet<(usize, usize)> = faces
            .iter()
            .flat_map(|&[a, b, c]| [(a, b), (b, c), (c, a)])
            .collect();
        let mut next: AHashMap<usize, usize> = AHashMap::new();
        for &(a, b) in &edges {
            if !edges.contains(&(b, a)) {
                next.insert(a, b);
            }
        }
        let Some(start) = next.keys().copied().min_by(|a, b| self.vertices[*a].cmp(&self.vertices[*b]))
        else {
            return Vec::new();
        };

        let mut ring = vec![start];
        let mut current = start;
        while let Some(&following) = next.get(&current) {
            if following == start || ring.len() > next.len() {
                break;
            }
            ring.push(following);
            current = following;
        }

        let points: Vec<Point3> = ring.iter().map(|&i| self.vertices[i]).collect();
        drop_collinear(&points)
    }
}

fn inside_if_odd(crossings: usize) -> BoundedSide {
    if crossings % 2 == 1 {
        BoundedSide::Inside
    } else {
        BoundedSide::Outside
    }
}

/// Remove vertices lying on the line through their cyclic neighbors
pub(crate) fn drop_collinear(ring: &[Point3]) -> Vec<Point3> {
    let mut points = ring.to_vec();
    let mut changed = true;
    while changed && points.len() > 3 {
        changed = false;
        for i in 0..points.len() {
            let n = points.len();
            let (prev, cur, next) = (points[(i + n - 1) % n], points[i], points[(i + 1) % n]);
            if Point3::collinear(&prev, &cur, &next) {
                points.remove(i);
                changed = true;
                break;
            }
        }
    }
    points
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Axis-aligned box with outward-facing triangles
    pub(crate) fn cuboid(min: [f64; 3], max: [f64; 3]) -> Polyhedron {
        let [x0, y0, z0] = min;
        let [x1, y1, z1] = max;
        let v = [
            Point3::new(x0, y0, z0),
            Point3::new(x1, y0, z0),
            Point3::new(x1, y1, z0),
            Point3::new(x0, y1, z0),
            Point3::new(x0, y0, z1),
            Point3::new(x1, y0, z1),
            Point3::new(x1, y1, z1),
            Point3::new(x0, y1, z1),
        ];
        let quads = [
            [0, 3, 2, 1],
            [4, 5, 6, 7],
            [0, 1, 5, 4],
            [1, 2, 6, 5],
            [2, 3, 7, 6],
            [3, 0, 4, 7],
        ];
        Polyhedron::from_triangles(quads.iter().flat_map(|&[a, b, c, d]| {
            [
                Triangle3::new(v[a], v[b], v[c]),
                Triangle3::new(v[a], v[c], v[d]),
            ]
        }))
    }

    #[test]
    fn test_cuboid_is_closed_and_welded() {
        let mesh = cuboid([0.0; 3], [1.0; 3]);
        assert_eq!(mesh.vertices().len(), 8);
        assert_eq!(mesh.faces().len(), 12);
        assert!(mesh.is_closed());
        assert!(!mesh.is_planar());
        assert_relative_eq!(mesh.signed_volume(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(mesh.surface_area(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_locate() {
        let mesh = cuboid([0.0; 3], [2.0; 3]);
        assert_eq!(mesh.locate(&Point3::new(1.0, 1.0, 1.0)), BoundedSide::Inside);
        assert_eq!(mesh.locate(&Point3::new(1.0, 1.0, 2.0)), BoundedSide::Boundary);
        assert_eq!(mesh.locate(&Point3::new(2.0, 2.0, 2.0)), BoundedSide::Boundary);
        assert_eq!(mesh.locate(&Point3::new(3.0, 1.0, 1.0)), BoundedSide::Outside);
        assert_eq!(mesh.locate(&Point3::new(1.0, 1.0, 0.5)), BoundedSide::Inside);
    }

    #[test]
    fn test_boundary_loop_of_flat_patch() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        let c = Point3::new(2.0, 0.0, 0.0);
        let d = Point3::new(2.0, 1.0, 0.0);
        let e = Point3::new(0.0, 1.0, 0.0);
        let patch = Polyhedron::from_triangles([
            Triangle3::new(a, b, e),
            Triangle3::new(b, d, e),
            Triangle3::new(b, c, d),
        ]);
        assert!(patch.is_planar());
        let outline = patch.boundary_loop();
        assert_eq!(outline, vec![a, c, d, e]);
    }
}
