// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Well-known text rendering

use super::shapes::{
    Geometry, LineString, Point, PolyhedralSurface, Polygon, Solid, Triangle, TriangulatedSurface,
};
use std::fmt::{self, Display, Formatter, Write};

fn coord(f: &mut Formatter<'_>, value: f64) -> fmt::Result {
    // -0 prints as 0
    write!(f, "{}", value + 0.0)
}

fn write_point(f: &mut Formatter<'_>, p: &Point) -> fmt::Result {
    coord(f, p.x)?;
    f.write_char(' ')?;
    coord(f, p.y)?;
    if let Some(z) = p.z {
        f.write_char(' ')?;
        coord(f, z)?;
    }
    Ok(())
}

fn write_list<T>(
    f: &mut Formatter<'_>,
    items: &[T],
    mut item: impl FnMut(&mut Formatter<'_>, &T) -> fmt::Result,
) -> fmt::Result {
    f.write_char('(')?;
    for (i, it) in items.iter().enumerate() {
        if i > 0 {
            f.write_char(',')?;
        }
        item(f, it)?;
    }
    f.write_char(')')
}

fn write_ring(f: &mut Formatter<'_>, ring: &LineString) -> fmt::Result {
    write_list(f, &ring.points, write_point)
}

fn write_polygon(f: &mut Formatter<'_>, polygon: &Polygon) -> fmt::Result {
    write_list(f, &polygon.rings, write_ring)
}

fn write_triangle(f: &mut Formatter<'_>, triangle: &Triangle) -> fmt::Result {
    let [a, b, c] = triangle.vertices;
    write_list(f, &[[a, b, c, a]], |f, ring| write_list(f, ring, write_point))
}

fn write_surface(f: &mut Formatter<'_>, surface: &PolyhedralSurface) -> fmt::Result {
    write_list(f, &surface.polygons, write_polygon)
}

fn write_solid(f: &mut Formatter<'_>, solid: &Solid) -> fmt::Result {
    write_list(f, &solid.shells, write_surface)
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("POINT(")?;
        write_point(f, self)?;
        f.write_char(')')
    }
}

impl Display for Geometry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            let name = match self {
                Geometry::Point(_) => "POINT",
                Geometry::LineString(_) => "LINESTRING",
                Geometry::Polygon(_) => "POLYGON",
                Geometry::Triangle(_) => "TRIANGLE",
                Geometry::TriangulatedSurface(_) => "TIN",
                Geometry::PolyhedralSurface(_) => "POLYHEDRALSURFACE",
                Geometry::Solid(_) => "SOLID",
                Geometry::MultiPoint(_) => "MULTIPOINT",
                Geometry::MultiLineString(_) => "MULTILINESTRING",
                Geometry::MultiPolygon(_) => "MULTIPOLYGON",
                Geometry::MultiSolid(_) => "MULTISOLID",
                Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
            };
            return write!(f, "{name} EMPTY");
        }
        match self {
            Geometry::Point(p) => write!(f, "{p}"),
            Geometry::LineString(ls) => {
                f.write_str("LINESTRING")?;
                write_ring(f, ls)
            }
            Geometry::Polygon(p) => {
                f.write_str("POLYGON")?;
                write_polygon(f, p)
            }
            Geometry::Triangle(t) => {
                f.write_str("TRIANGLE")?;
                write_triangle(f, t)
            }
            Geometry::TriangulatedSurface(TriangulatedSurface { triangles }) => {
                f.write_str("TIN")?;
                write_list(f, triangles, write_triangle)
            }
            Geometry::PolyhedralSurface(s) => {
                f.write_str("POLYHEDRALSURFACE")?;
                write_surface(f, s)
            }
            Geometry::Solid(s) => {
                f.write_str("SOLID")?;
                write_solid(f, s)
            }
            Geometry::MultiPoint(points) => {
                f.write_str("MULTIPOINT")?;
                write_list(f, points, |f, p| {
                    f.write_char('(')?;
                    write_point(f, p)?;
                    f.write_char(')')
                })
            }
            Geometry::MultiLineString(lines) => {
                f.write_str("MULTILINESTRING")?;
                write_list(f, lines, write_ring)
            }
            Geometry::MultiPolygon(polygons) => {
                f.write_str("MULTIPOLYGON")?;
                write_list(f, polygons, write_polygon)
            }
            Geometry::MultiSolid(solids) => {
                f.write_str("MULTISOLID")?;
                write_list(f, solids, write_solid)
            }
            Geometry::GeometryCollection(parts) => {
                f.write_str("GEOMETRYCOLLECTION")?;
                write_list(f, parts, |f, g| write!(f, "{g}"))
            }
        }
    }
}
