// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! The spatial instantiation

use super::{
    Dimension, Flagged, GeometrySet, PrimitiveFlags, PrimitiveRef, RecomposeOptions, Remainder,
};
use crate::algorithm::spatial;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::geometry::{
    self, BoundingBox, Geometry, LineString, PolyhedralSurface, Solid, TriangulatedSurface,
};
use crate::kernel::{Point3, Polyhedron, Triangle3};
use crate::mesh::triangulate_polygon_3d;
use std::fmt;

/// Spatial sets: points, segments, triangles and closed triangle meshes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dim3;

fn structured(p: &Point3) -> geometry::Point {
    geometry::Point::new_3d(p.x(), p.y(), p.z())
}

fn structured_triangle(t: &Triangle3) -> geometry::Triangle {
    let [a, b, c] = t.vertices().map(|v| structured(&v));
    geometry::Triangle::new(a, b, c)
}

/// Outline of a flat volume as a triangle or polygon
fn flat_outline(mesh: &Polyhedron) -> Option<Geometry> {
    let outline = mesh.boundary_loop();
    match outline.len() {
        0..=2 => None,
        3 => Some(Geometry::Triangle(structured_triangle(&Triangle3::new(
            outline[0], outline[1], outline[2],
        )))),
        _ => {
            let mut ring: Vec<geometry::Point> = outline.iter().map(structured).collect();
            ring.push(ring[0]);
            Some(Geometry::Polygon(geometry::Polygon::new(LineString::new(ring))))
        }
    }
}

impl Dimension for Dim3 {
    const DIM: usize = 3;

    type Point = Point3;
    type Surface = Triangle3;
    type Volume = Polyhedron;

    fn point(p: &geometry::Point) -> Point3 {
        Point3::new(p.x, p.y, p.z_or_zero())
    }

    fn to_point(p: &Point3) -> geometry::Point {
        structured(p)
    }

    fn decompose_triangle(triangle: &geometry::Triangle, set: &mut GeometrySet<Self>) {
        let [a, b, c] = triangle.vertices.map(|v| Self::point(&v));
        let triangle = Triangle3::new(a, b, c);
        if !triangle.is_degenerate() {
            set.add_surface(triangle);
        }
    }

    fn decompose_polygon(polygon: &geometry::Polygon, set: &mut GeometrySet<Self>) {
        for triangle in triangulate_polygon_3d(polygon) {
            set.add_surface(triangle);
        }
    }

    /// Only the exterior shell is kept
    fn decompose_solid(solid: &geometry::Solid, set: &mut GeometrySet<Self>) {
        let Some(shell) = solid.exterior_shell() else {
            return;
        };
        let mesh = Polyhedron::from_triangles(shell.polygons.iter().flat_map(triangulate_polygon_3d));
        if mesh.is_empty() {
            return;
        }
        let mut volume = Flagged::new(mesh);
        if volume.value.is_planar() {
            volume.flags.insert(PrimitiveFlags::IS_PLANAR);
        }
        set.add_flagged_volume(volume);
    }

    fn recompose_surfaces(surfaces: &[Flagged<Triangle3>], out: &mut Vec<Geometry>) {
        match surfaces {
            [] => {}
            [single] => out.push(Geometry::Triangle(structured_triangle(&single.value))),
            _ => out.push(Geometry::TriangulatedSurface(TriangulatedSurface::new(
                surfaces.iter().map(|s| structured_triangle(&s.value)).collect(),
            ))),
        }
    }

    fn recompose_volumes(
        volumes: &[Flagged<Polyhedron>],
        options: &RecomposeOptions,
        out: &mut Vec<Geometry>,
    ) {
        for volume in volumes {
            if volume.flags.contains(PrimitiveFlags::IS_PLANAR) {
                out.extend(flat_outline(&volume.value));
            } else {
                let shell = PolyhedralSurface::from_polyhedron(&volume.value, options.merge_facets);
                out.push(Geometry::Solid(Solid::new(shell)));
            }
        }
    }

    fn surface_bbox(surface: &Triangle3) -> BoundingBox {
        surface.bounding_box()
    }

    fn volume_bbox(volume: &Polyhedron) -> BoundingBox {
        volume.bounding_box()
    }

    fn surface_vertices(surface: &Triangle3) -> Vec<Point3> {
        surface.vertices().to_vec()
    }

    fn volume_vertices(volume: &Polyhedron) -> Vec<Point3> {
        volume.vertices().to_vec()
    }

    fn fmt_surface(surface: &Triangle3, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{surface}")
    }

    fn fmt_volume(volume: &Polyhedron, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shell = PolyhedralSurface::from_polyhedron(volume, false);
        write!(f, "{}", Geometry::Solid(Solid::new(shell)))
    }

    fn intersects(a: PrimitiveRef<'_, Self>, b: PrimitiveRef<'_, Self>) -> bool {
        spatial::intersects(a, b)
    }

    fn intersection(a: PrimitiveRef<'_, Self>, b: PrimitiveRef<'_, Self>, out: &mut GeometrySet<Self>) {
        spatial::intersection(a, b, out)
    }

    fn subtract(
        a: PrimitiveRef<'_, Self>,
        b: PrimitiveRef<'_, Self>,
        config: &EngineConfig,
    ) -> Result<Remainder<Self>> {
        spatial::subtract(a, b, config)
    }

    fn covers(a: PrimitiveRef<'_, Self>, b: PrimitiveRef<'_, Self>) -> bool {
        spatial::covers(a, b)
    }
}
