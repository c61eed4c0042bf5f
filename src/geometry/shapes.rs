// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Simple-features style geometry model

use serde::{Deserialize, Serialize};

/// A coordinate, optionally carrying a `z` value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: None }
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z: Some(z) }
    }

    pub fn is_3d(&self) -> bool {
        self.z.is_some()
    }

    /// `z`, or 0 for planar coordinates
    pub fn z_or_zero(&self) -> f64 {
        self.z.unwrap_or(0.0)
    }
}

/// Ordered sequence of points
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineString {
    pub points: Vec<Point>,
}

impl LineString {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn from_xy(coords: &[(f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    pub fn from_xyz(coords: &[(f64, f64, f64)]) -> Self {
        Self::new(coords.iter().map(|&(x, y, z)| Point::new_3d(x, y, z)).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() > 1 && first == last,
            _ => false,
        }
    }
}

/// Polygon made of an exterior ring followed by interior rings (holes)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub rings: Vec<LineString>,
}

impl Polygon {
    pub fn new(exterior: LineString) -> Self {
        Self {
            rings: vec![exterior],
        }
    }

    pub fn with_holes(exterior: LineString, holes: Vec<LineString>) -> Self {
        let mut rings = Vec::with_capacity(holes.len() + 1);
        rings.push(exterior);
        rings.extend(holes);
        Self { rings }
    }

    pub fn exterior(&self) -> Option<&LineString> {
        self.rings.first()
    }

    pub fn interiors(&self) -> &[LineString] {
        if self.rings.is_empty() {
            &[]
        } else {
            &self.rings[1..]
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exterior().map_or(true, LineString::is_empty)
    }
}

/// Triangle given by its three vertices
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub vertices: [Point; 3],
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// Closed ring `a, b, c, a`
    pub fn to_polygon(&self) -> Polygon {
        let [a, b, c] = self.vertices;
        Polygon::new(LineString::new(vec![a, b, c, a]))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriangulatedSurface {
    pub triangles: Vec<Triangle>,
}

impl TriangulatedSurface {
    pub fn new(triangles: Vec<Triangle>) -> Self {
        Self { triangles }
    }
}

/// Surface made of polygonal facets
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolyhedralSurface {
    pub polygons: Vec<Polygon>,
}

impl PolyhedralSurface {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// Volume bounded by an exterior shell and optional interior shells
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Solid {
    pub shells: Vec<PolyhedralSurface>,
}

impl Solid {
    pub fn new(exterior: PolyhedralSurface) -> Self {
        Self {
            shells: vec![exterior],
        }
    }

    pub fn exterior_shell(&self) -> Option<&PolyhedralSurface> {
        self.shells.first()
    }

    pub fn is_empty(&self) -> bool {
        self.exterior_shell().map_or(true, PolyhedralSurface::is_empty)
    }
}

/// Geometry kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    Triangle,
    TriangulatedSurface,
    PolyhedralSurface,
    Solid,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    MultiSolid,
    GeometryCollection,
}

/// Any supported geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    Polygon(Polygon),
    Triangle(Triangle),
    TriangulatedSurface(TriangulatedSurface),
    PolyhedralSurface(PolyhedralSurface),
    Solid(Solid),
    MultiPoint(Vec<Point>),
    MultiLineString(Vec<LineString>),
    MultiPolygon(Vec<Polygon>),
    MultiSolid(Vec<Solid>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// The empty geometry collection
    pub fn empty() -> Self {
        Geometry::GeometryCollection(Vec::new())
    }

    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::Triangle(_) => GeometryType::Triangle,
            Geometry::TriangulatedSurface(_) => GeometryType::TriangulatedSurface,
            Geometry::PolyhedralSurface(_) => GeometryType::PolyhedralSurface,
            Geometry::Solid(_) => GeometryType::Solid,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
            Geometry::MultiSolid(_) => GeometryType::MultiSolid,
            Geometry::GeometryCollection(_) => GeometryType::GeometryCollection,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point(_) | Geometry::Triangle(_) => false,
            Geometry::LineString(ls) => ls.is_empty(),
            Geometry::Polygon(p) => p.is_empty(),
            Geometry::TriangulatedSurface(s) => s.triangles.is_empty(),
            Geometry::PolyhedralSurface(s) => s.is_empty(),
            Geometry::Solid(s) => s.is_empty(),
            Geometry::MultiPoint(points) => points.is_empty(),
            Geometry::MultiLineString(lines) => lines.iter().all(LineString::is_empty),
            Geometry::MultiPolygon(polygons) => polygons.iter().all(Polygon::is_empty),
            Geometry::MultiSolid(solids) => solids.iter().all(Solid::is_empty),
            Geometry::GeometryCollection(parts) => parts.iter().all(Geometry::is_empty),
        }
    }

    /// Topological dimension, -1 for empty geometries
    pub fn dimension(&self) -> i32 {
        if self.is_empty() {
            return -1;
        }
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => 0,
            Geometry::LineString(_) | Geometry::MultiLineString(_) => 1,
            Geometry::Polygon(_)
            | Geometry::Triangle(_)
            | Geometry::TriangulatedSurface(_)
            | Geometry::PolyhedralSurface(_)
            | Geometry::MultiPolygon(_) => 2,
            Geometry::Solid(_) | Geometry::MultiSolid(_) => 3,
            Geometry::GeometryCollection(parts) => {
                parts.iter().map(Geometry::dimension).max().unwrap_or(-1)
            }
        }
    }

    /// Number of parts in a collection, 1 for single geometries
    pub fn num_geometries(&self) -> usize {
        match self {
            Geometry::MultiPoint(parts) => parts.len(),
            Geometry::MultiLineString(parts) => parts.len(),
            Geometry::MultiPolygon(parts) => parts.len(),
            Geometry::MultiSolid(parts) => parts.len(),
            Geometry::GeometryCollection(parts) => parts.len(),
            _ => 1,
        }
    }
}

impl From<Point> for Geometry {
    fn from(point: Point) -> Self {
        Geometry::Point(point)
    }
}

impl From<LineString> for Geometry {
    fn from(line: LineString) -> Self {
        Geometry::LineString(line)
    }
}

impl From<Polygon> for Geometry {
    fn from(polygon: Polygon) -> Self {
        Geometry::Polygon(polygon)
    }
}

impl From<Triangle> for Geometry {
    fn from(triangle: Triangle) -> Self {
        Geometry::Triangle(triangle)
    }
}

impl From<Solid> for Geometry {
    fn from(solid: Solid) -> Self {
        Geometry::Solid(solid)
    }
}

impl From<PolyhedralSurface> for Geometry {
    fn from(surface: PolyhedralSurface) -> Self {
        Geometry::PolyhedralSurface(surface)
    }
}
