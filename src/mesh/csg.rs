// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CSG (Constructive Solid Geometry) operations using BSP tree
//!
//! Plane sides are decided with exact `orient3d` against three points that
//! define each plane. Split points are rounded.

use crate::kernel::{KernelPoint, Orientation, Point3, Polyhedron, Triangle3};
use nalgebra::Vector3;

/// BSP tree node for CSG operations
#[derive(Clone, Default)]
struct BSPNode {
    plane: Option<Plane>,
    front: Option<Box<BSPNode>>,
    back: Option<Box<BSPNode>>,
    facets: Vec<Facet>,
}

#[derive(Clone)]
struct Plane {
    a: Point3,
    b: Point3,
    c: Point3,
    normal: Vector3<f64>,
}

/// Convex planar polygon remembering its supporting plane
#[derive(Clone)]
struct Facet {
    points: Vec<Point3>,
    plane: Plane,
}

/// Where coplanar facets go during clipping
#[derive(Clone, Copy, PartialEq, Eq)]
enum Coplanar {
    /// Front when facing like the plane, back otherwise
    ByOrientation,
    Keep,
    Discard,
}

/// Which part of the clipped triangles [`clip_triangles`] returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keep {
    /// Strictly outside the solid; boundary pieces are dropped
    Outside,
    /// Inside the solid or on its boundary
    Inside,
}

impl Plane {
    fn through(points: &[Point3]) -> Option<Self> {
        let a = *points.first()?;
        for (i, b) in points.iter().enumerate().skip(1) {
            for c in &points[i + 1..] {
                if !Point3::collinear(&a, b, c) {
                    return Some(Self {
                        a,
                        b: *b,
                        c: *c,
                        normal: (*b - a).cross(&(*c - a)),
                    });
                }
            }
        }
        None
    }

    fn side(&self, p: &Point3) -> Orientation {
        crate::kernel::predicates::orient3d(&self.a, &self.b, &self.c, p)
    }

    fn distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&(*p - self.a))
    }

    fn flip(&mut self) {
        std::mem::swap(&mut self.b, &mut self.c);
        self.normal = -self.normal;
    }

    /// Split `facet` by this plane into the four destination lists
    fn split_facet(
        &self,
        facet: Facet,
        coplanar_front: &mut Vec<Facet>,
        coplanar_back: &mut Vec<Facet>,
        front: &mut Vec<Facet>,
        back: &mut Vec<Facet>,
    ) {
        let sides: Vec<Orientation> = facet.points.iter().map(|p| self.side(p)).collect();
        let has_front = sides.contains(&Orientation::Positive);
        let has_back = sides.contains(&Orientation::Negative);

        match (has_front, has_back) {
            (false, false) => {
                if self.normal.dot(&facet.plane.normal) > 0.0 {
                    coplanar_front.push(facet);
                } else {
                    coplanar_back.push(facet);
                }
            }
            (true, false) => front.push(facet),
            (false, true) => back.push(facet),
            (true, true) => {
                let n = facet.points.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);
                for i in 0..n {
                    let j = (i + 1) % n;
                    let (pi, pj) = (facet.points[i], facet.points[j]);
                    let (si, sj) = (sides[i], sides[j]);
                    if si != Orientation::Negative {
                        f.push(pi);
                    }
                    if si != Orientation::Positive {
                        b.push(pi);
                    }
                    if si.opposes(sj) {
                        let (di, dj) = (self.distance(&pi), self.distance(&pj));
                        let split = Point3::lerp(&pi, &pj, di / (di - dj));
                        f.push(split);
                        b.push(split);
                    }
                }
                if f.len() >= 3 {
                    front.push(Facet {
                        points: f,
                        plane: facet.plane.clone(),
                    });
                }
                if b.len() >= 3 {
                    back.push(Facet {
                        points: b,
                        plane: facet.plane,
                    });
                }
            }
        }
    }
}

impl Facet {
    fn new(points: Vec<Point3>) -> Option<Self> {
        let plane = Plane::through(&points)?;
        Some(Self { points, plane })
    }

    fn flip(&mut self) {
        self.points.reverse();
        self.plane.flip();
    }
}

impl BSPNode {
    fn new(facets: Vec<Facet>) -> Self {
        let mut node = Self::default();
        node.build(facets);
        node
    }

    fn build(&mut self, facets: Vec<Facet>) {
        if facets.is_empty() {
            return;
        }
        let plane = self
            .plane
            .get_or_insert_with(|| facets[0].plane.clone())
            .clone();

        let mut front_facets = Vec::new();
        let mut back_facets = Vec::new();
        let mut coplanar = Vec::new();
        for facet in facets {
            let mut coplanar_back = Vec::new();
            plane.split_facet(
                facet,
                &mut coplanar,
                &mut coplanar_back,
                &mut front_facets,
                &mut back_facets,
            );
            coplanar.append(&mut coplanar_back);
        }
        self.facets.append(&mut coplanar);

        if !front_facets.is_empty() {
            self.front
                .get_or_insert_with(|| Box::new(BSPNode::default()))
                .build(front_facets);
        }
        if !back_facets.is_empty() {
            self.back
                .get_or_insert_with(|| Box::new(BSPNode::default()))
                .build(back_facets);
        }
    }

    fn all_facets(&self) -> Vec<Facet> {
        let mut result = self.facets.clone();
        if let Some(ref front) = self.front {
            result.extend(front.all_facets());
        }
        if let Some(ref back) = self.back {
            result.extend(back.all_facets());
        }
        result
    }

    fn clip_to(&mut self, bsp: &BSPNode) {
        self.facets = bsp.clip_facets(std::mem::take(&mut self.facets), Coplanar::ByOrientation);
        if let Some(ref mut front) = self.front {
            front.clip_to(bsp);
        }
        if let Some(ref mut back) = self.back {
            back.clip_to(bsp);
        }
    }

    /// Remove the parts of `facets` inside the solid this tree bounds
    fn clip_facets(&self, facets: Vec<Facet>, coplanar: Coplanar) -> Vec<Facet> {
        let Some(ref plane) = self.plane else {
            return facets;
        };

        let mut front = Vec::new();
        let mut back = Vec::new();
        for facet in facets {
            let mut on_front = Vec::new();
            let mut on_back = Vec::new();
            plane.split_facet(facet, &mut on_front, &mut on_back, &mut front, &mut back);
            match coplanar {
                Coplanar::ByOrientation => {
                    front.append(&mut on_front);
                    back.append(&mut on_back);
                }
                Coplanar::Keep => {
                    front.append(&mut on_front);
                    front.append(&mut on_back);
                }
                Coplanar::Discard => {
                    back.append(&mut on_front);
                    back.append(&mut on_back);
                }
            }
        }

        let mut result = match self.front {
            Some(ref front_node) => front_node.clip_facets(front, coplanar),
            None => front,
        };
        if let Some(ref back_node) = self.back {
            result.extend(back_node.clip_facets(back, coplanar));
        }
        result
    }

    fn invert(&mut self) {
        for facet in &mut self.facets {
            facet.flip();
        }
        if let Some(ref mut plane) = self.plane {
            plane.flip();
        }
        std::mem::swap(&mut self.front, &mut self.back);
        if let Some(ref mut front) = self.front {
            front.invert();
        }
        if let Some(ref mut back) = self.back {
            back.invert();
        }
    }
}

fn triangle_facets(triangles: impl IntoIterator<Item = Triangle3>) -> Vec<Facet> {
    triangles
        .into_iter()
        .filter_map(|t| Facet::new(t.vertices().to_vec()))
        .collect()
}

fn fan_triangles(facets: &[Facet]) -> Vec<Triangle3> {
    facets
        .iter()
        .flat_map(|facet| {
            let p = &facet.points;
            (1..p.len().saturating_sub(1)).map(move |i| Triangle3::new(p[0], p[i], p[i + 1]))
        })
        .filter(|t| !t.is_degenerate())
        .collect()
}

/// Solid difference `a - b`
pub fn difference(a: &Polyhedron, b: &Polyhedron) -> Polyhedron {
    let mut tree_a = BSPNode::new(triangle_facets(a.triangles()));
    let mut tree_b = BSPNode::new(triangle_facets(b.triangles()));

    tree_a.invert();
    tree_a.clip_to(&tree_b);
    tree_b.clip_to(&tree_a);
    tree_b.invert();
    tree_b.clip_to(&tree_a);
    tree_b.invert();
    tree_a.build(tree_b.all_facets());
    tree_a.invert();

    Polyhedron::from_triangles(fan_triangles(&tree_a.all_facets()))
}

/// Solid intersection `a ∩ b`
pub fn intersection(a: &Polyhedron, b: &Polyhedron) -> Polyhedron {
    let mut tree_a = BSPNode::new(triangle_facets(a.triangles()));
    let mut tree_b = BSPNode::new(triangle_facets(b.triangles()));

    tree_a.invert();
    tree_b.clip_to(&tree_a);
    tree_b.invert();
    tree_a.clip_to(&tree_b);
    tree_b.clip_to(&tree_a);
    tree_a.build(tree_b.all_facets());
    tree_a.invert();

    Polyhedron::from_triangles(fan_triangles(&tree_a.all_facets()))
}

/// Clip open triangles against a closed solid
pub fn clip_triangles(triangles: &[Triangle3], solid: &Polyhedron, keep: Keep) -> Vec<Triangle3> {
    let mut tree = BSPNode::new(triangle_facets(solid.triangles()));
    let facets = triangle_facets(triangles.iter().copied());
    let kept = match keep {
        Keep::Outside => tree.clip_facets(facets, Coplanar::Discard),
        Keep::Inside => {
            tree.invert();
            tree.clip_facets(facets, Coplanar::Keep)
        }
    };
    fan_triangles(&kept)
}
