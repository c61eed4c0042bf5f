// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! The planar instantiation

use super::{Dimension, Flagged, GeometrySet, PrimitiveRef, RecomposeOptions, Remainder};
use crate::algorithm::planar;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::geometry::{self, BoundingBox, Geometry};
use crate::kernel::predicates::orient2d;
use crate::kernel::{Orientation, Point2};
use std::fmt;

/// Planar sets: points, segments and polygons with holes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dim2;

/// Volume type of planar sets, which has no values
#[derive(Debug, Clone, PartialEq)]
pub enum NoVolume {}

impl NoVolume {
    pub fn absurd<T>(&self) -> T {
        match *self {}
    }
}

fn coord(p: &Point2) -> geo::Coord<f64> {
    geo::Coord { x: p.x(), y: p.y() }
}

fn geo_ring(ring: &geometry::LineString) -> geo::LineString<f64> {
    geo::LineString::from(
        ring.points
            .iter()
            .map(|p| geo::Coord { x: p.x, y: p.y })
            .collect::<Vec<_>>(),
    )
}

fn ring_from_geo(ring: &geo::LineString<f64>) -> geometry::LineString {
    geometry::LineString::new(ring.0.iter().map(|c| geometry::Point::new(c.x, c.y)).collect())
}

/// Structured polygon of a planar surface
pub(crate) fn polygon_from_geo(polygon: &geo::Polygon<f64>) -> geometry::Polygon {
    geometry::Polygon::with_holes(
        ring_from_geo(polygon.exterior()),
        polygon.interiors().iter().map(ring_from_geo).collect(),
    )
}

fn open_ring(ring: &geo::LineString<f64>) -> &[geo::Coord<f64>] {
    match ring.0.split_last() {
        Some((last, rest)) if Some(last) == ring.0.first() => rest,
        _ => &ring.0,
    }
}

impl Dimension for Dim2 {
    const DIM: usize = 2;

    type Point = Point2;
    type Surface = geo::Polygon<f64>;
    type Volume = NoVolume;

    fn point(p: &geometry::Point) -> Point2 {
        Point2::new(p.x, p.y)
    }

    fn to_point(p: &Point2) -> geometry::Point {
        geometry::Point::new(p.x(), p.y())
    }

    fn decompose_triangle(triangle: &geometry::Triangle, set: &mut GeometrySet<Self>) {
        let [a, b, c] = triangle.vertices.map(|v| Self::point(&v));
        let ring = match orient2d(&a, &b, &c) {
            Orientation::Negative => vec![coord(&a), coord(&c), coord(&b)],
            _ => vec![coord(&a), coord(&b), coord(&c)],
        };
        set.add_surface(geo::Polygon::new(geo::LineString::from(ring), Vec::new()));
    }

    fn decompose_polygon(polygon: &geometry::Polygon, set: &mut GeometrySet<Self>) {
        let Some(exterior) = polygon.exterior() else {
            return;
        };
        if exterior.num_points() < 3 {
            return;
        }
        set.add_surface(geo::Polygon::new(
            geo_ring(exterior),
            polygon.interiors().iter().map(geo_ring).collect(),
        ));
    }

    fn decompose_solid(_solid: &geometry::Solid, _set: &mut GeometrySet<Self>) {}

    fn recompose_surfaces(surfaces: &[Flagged<Self::Surface>], out: &mut Vec<Geometry>) {
        for surface in surfaces {
            let polygon = &surface.value;
            let exterior = open_ring(polygon.exterior());
            if polygon.interiors().is_empty() && exterior.len() == 3 {
                let [a, b, c] = [exterior[0], exterior[1], exterior[2]]
                    .map(|q| geometry::Point::new(q.x, q.y));
                out.push(Geometry::Triangle(geometry::Triangle::new(a, b, c)));
            } else {
                out.push(Geometry::Polygon(polygon_from_geo(polygon)));
            }
        }
    }

    fn recompose_volumes(
        _volumes: &[Flagged<NoVolume>],
        _options: &RecomposeOptions,
        _out: &mut Vec<Geometry>,
    ) {
    }

    fn surface_bbox(surface: &Self::Surface) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for c in &surface.exterior().0 {
            bbox.expand_to_include(&nalgebra::Point3::new(c.x, c.y, 0.0));
        }
        bbox
    }

    fn volume_bbox(volume: &NoVolume) -> BoundingBox {
        volume.absurd()
    }

    fn surface_vertices(surface: &Self::Surface) -> Vec<Point2> {
        std::iter::once(surface.exterior())
            .chain(surface.interiors())
            .flat_map(|ring| open_ring(ring).iter().map(|c| Point2::new(c.x, c.y)))
            .collect()
    }

    fn volume_vertices(volume: &NoVolume) -> Vec<Point2> {
        volume.absurd()
    }

    fn fmt_surface(surface: &Self::Surface, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Geometry::Polygon(polygon_from_geo(surface)))
    }

    fn fmt_volume(volume: &NoVolume, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        volume.absurd()
    }

    fn intersects(a: PrimitiveRef<'_, Self>, b: PrimitiveRef<'_, Self>) -> bool {
        planar::intersects(a, b)
    }

    fn intersection(a: PrimitiveRef<'_, Self>, b: PrimitiveRef<'_, Self>, out: &mut GeometrySet<Self>) {
        planar::intersection(a, b, out)
    }

    fn subtract(
        a: PrimitiveRef<'_, Self>,
        b: PrimitiveRef<'_, Self>,
        _config: &EngineConfig,
    ) -> Result<Remainder<Self>> {
        Ok(planar::subtract(a, b))
    }

    fn covers(a: PrimitiveRef<'_, Self>, b: PrimitiveRef<'_, Self>) -> bool {
        planar::covers(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LineString, Point, Polygon, Triangle};
    use crate::set::PrimitiveType;

    #[test]
    fn test_clockwise_triangle_is_reoriented() {
        let triangle = Geometry::Triangle(Triangle::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
        ));
        let set: GeometrySet<Dim2> = GeometrySet::from_geometry(&triangle);
        assert_eq!(set.len_of(PrimitiveType::Surface), 1);
        assert_eq!(set.recompose().to_string(), "TRIANGLE((0 0,1 0,0 1,0 0))");
    }

    #[test]
    fn test_polygon_with_hole_round_trip() {
        let polygon = Geometry::Polygon(Polygon::with_holes(
            LineString::from_xy(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]),
            vec![LineString::from_xy(&[(1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0), (1.0, 1.0)])],
        ));
        let set: GeometrySet<Dim2> = GeometrySet::from_geometry(&polygon);
        assert_eq!(set.recompose(), polygon);
        let bbox = set.primitives().next().map(|p| p.bounding_box());
        assert_eq!(bbox.map(|b| b.max.x), Some(4.0));
        assert_eq!(set.primitives().next().map(|p| p.vertices().len()), Some(8));
    }

    #[test]
    fn test_triangle_shaped_polygon_recomposes_as_triangle() {
        let polygon = Geometry::Polygon(Polygon::new(LineString::from_xy(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (0.0, 1.0),
            (0.0, 0.0),
        ])));
        let set: GeometrySet<Dim2> = GeometrySet::from_geometry(&polygon);
        assert!(matches!(set.recompose(), Geometry::Triangle(_)));
    }
}
