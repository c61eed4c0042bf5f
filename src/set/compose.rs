// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Decomposition of geometries into primitives and the way back

use super::{Dimension, GeometrySet, RecomposeOptions};
use crate::geometry::{Geometry, GeometryType, LineString};
use crate::kernel::{KernelPoint, Segment};
use std::collections::{BTreeMap, VecDeque};

impl<D: Dimension> GeometrySet<D> {
    pub fn from_geometry(geometry: &Geometry) -> Self {
        let mut set = Self::new();
        set.add_geometry(geometry);
        set
    }

    /// Build a set from two geometries at once
    pub fn from_pair(first: &Geometry, second: &Geometry) -> Self {
        let mut set = Self::from_geometry(first);
        set.add_geometry(second);
        set
    }

    /// Decompose `geometry` into this set
    ///
    /// Empty parts and parts the ambient dimension cannot hold (a solid in
    /// the plane) are skipped.
    pub fn add_geometry(&mut self, geometry: &Geometry) {
        if geometry.is_empty() {
            return;
        }
        match geometry {
            Geometry::Point(p) => self.add_point(D::point(p)),
            Geometry::LineString(line) => self.add_line(line),
            Geometry::Polygon(polygon) => D::decompose_polygon(polygon, self),
            Geometry::Triangle(triangle) => D::decompose_triangle(triangle, self),
            Geometry::TriangulatedSurface(surface) => {
                for triangle in &surface.triangles {
                    D::decompose_triangle(triangle, self);
                }
            }
            Geometry::PolyhedralSurface(surface) => {
                for polygon in &surface.polygons {
                    D::decompose_polygon(polygon, self);
                }
            }
            Geometry::Solid(solid) => D::decompose_solid(solid, self),
            Geometry::MultiPoint(points) => {
                for p in points {
                    self.add_point(D::point(p));
                }
            }
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    self.add_line(line);
                }
            }
            Geometry::MultiPolygon(polygons) => {
                for polygon in polygons {
                    D::decompose_polygon(polygon, self);
                }
            }
            Geometry::MultiSolid(solids) => {
                for solid in solids {
                    D::decompose_solid(solid, self);
                }
            }
            Geometry::GeometryCollection(parts) => {
                for part in parts {
                    self.add_geometry(part);
                }
            }
        }
    }

    fn add_line(&mut self, line: &LineString) {
        for pair in line.points.windows(2) {
            self.add_segment(Segment::new(D::point(&pair[0]), D::point(&pair[1])));
        }
    }

    /// Rebuild a geometry, merging coplanar facets of solids
    pub fn recompose(&self) -> Geometry {
        self.recompose_with(&RecomposeOptions::default())
    }

    /// Rebuild a geometry
    ///
    /// One part yields that part; several parts of one kind yield the matching
    /// multi-geometry, anything else a geometry collection.
    pub fn recompose_with(&self, options: &RecomposeOptions) -> Geometry {
        let mut parts = Vec::new();
        for p in self.points().iter() {
            parts.push(Geometry::Point(D::to_point(&p.value)));
        }
        for line in self.stitch_segments() {
            parts.push(Geometry::LineString(line));
        }
        D::recompose_surfaces(self.surfaces(), &mut parts);
        D::recompose_volumes(self.volumes(), options, &mut parts);
        collect_parts(parts)
    }

    /// Chain segments into linestrings
    ///
    /// A chain grows at its tail through segments starting where it ends, and
    /// at its head through segments ending where it starts.
    fn stitch_segments(&self) -> Vec<LineString> {
        let segments: Vec<&Segment<D::Point>> = self.segments().iter().map(|s| &s.value).collect();
        let mut by_source: BTreeMap<D::Point, Vec<usize>> = BTreeMap::new();
        let mut by_target: BTreeMap<D::Point, Vec<usize>> = BTreeMap::new();
        for (i, s) in segments.iter().enumerate() {
            by_source.entry(*s.source()).or_default().push(i);
            by_target.entry(*s.target()).or_default().push(i);
        }
        let unused = |ends: &BTreeMap<D::Point, Vec<usize>>, at: Option<&D::Point>, used: &[bool]| {
            at.and_then(|q| ends.get(q))
                .and_then(|candidates| candidates.iter().copied().find(|&i| !used[i]))
        };

        let mut used = vec![false; segments.len()];
        let mut lines = Vec::new();
        for start in 0..segments.len() {
            if used[start] {
                continue;
            }
            used[start] = true;
            let mut chain = VecDeque::from([*segments[start].source(), *segments[start].target()]);
            while let Some(next) = unused(&by_source, chain.back(), &used) {
                used[next] = true;
                chain.push_back(*segments[next].target());
            }
            while let Some(prev) = unused(&by_target, chain.front(), &used) {
                used[prev] = true;
                chain.push_front(*segments[prev].source());
            }
            lines.push(LineString::new(chain.iter().map(D::to_point).collect()));
        }
        lines
    }
}

fn collect_parts(mut parts: Vec<Geometry>) -> Geometry {
    if parts.len() == 1 {
        return parts.remove(0);
    }
    if parts.is_empty() {
        return Geometry::empty();
    }
    let first = parts[0].geometry_type();
    if parts.iter().any(|g| g.geometry_type() != first) {
        return Geometry::GeometryCollection(parts);
    }
    match first {
        GeometryType::Point => Geometry::MultiPoint(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Point(p) => Some(p),
                    _ => None,
                })
                .collect(),
        ),
        GeometryType::LineString => Geometry::MultiLineString(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::LineString(l) => Some(l),
                    _ => None,
                })
                .collect(),
        ),
        GeometryType::Polygon => Geometry::MultiPolygon(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Polygon(p) => Some(p),
                    _ => None,
                })
                .collect(),
        ),
        GeometryType::Solid => Geometry::MultiSolid(
            parts
                .into_iter()
                .filter_map(|g| match g {
                    Geometry::Solid(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => Geometry::GeometryCollection(parts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Polygon, Solid};
    use crate::set::{Dim2, PrimitiveType};

    #[test]
    fn test_linestring_round_trip() {
        let line = Geometry::LineString(LineString::from_xy(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]));
        let set: GeometrySet<Dim2> = GeometrySet::from_geometry(&line);
        assert_eq!(set.len_of(PrimitiveType::Segment), 2);
        assert_eq!(set.recompose(), line);
    }

    #[test]
    fn test_lines_against_key_order_stay_whole() {
        for coords in [
            &[(2.0, 0.0), (1.0, 0.0), (0.0, 0.0)][..],
            &[(1.0, 1.0), (2.0, 0.0), (0.0, 0.0)][..],
            &[(3.0, 0.0), (0.0, 0.0), (2.0, 2.0), (1.0, 0.0)][..],
        ] {
            let line = Geometry::LineString(LineString::from_xy(coords));
            let set: GeometrySet<Dim2> = GeometrySet::from_geometry(&line);
            assert_eq!(set.recompose(), line);
        }
    }

    #[test]
    fn test_disjoint_segments_become_multilinestring() {
        let lines = Geometry::MultiLineString(vec![
            LineString::from_xy(&[(0.0, 0.0), (0.5, 0.0)]),
            LineString::from_xy(&[(0.7, 0.0), (1.0, 0.0)]),
        ]);
        let set: GeometrySet<Dim2> = GeometrySet::from_geometry(&lines);
        assert_eq!(set.recompose().to_string(), "MULTILINESTRING((0 0,0.5 0),(0.7 0,1 0))");
    }

    #[test]
    fn test_mixed_kinds_become_collection() {
        let mixed = Geometry::GeometryCollection(vec![
            Geometry::Point(Point::new(5.0, 5.0)),
            Geometry::LineString(LineString::from_xy(&[(0.0, 0.0), (1.0, 0.0)])),
        ]);
        let set: GeometrySet<Dim2> = GeometrySet::from_geometry(&mixed);
        assert_eq!(set.recompose(), mixed);
    }

    #[test]
    fn test_unsupported_and_empty_parts_are_skipped() {
        let input = Geometry::GeometryCollection(vec![
            Geometry::Solid(Solid::default()),
            Geometry::LineString(LineString::from_xy(&[(1.0, 1.0)])),
            Geometry::Polygon(Polygon::default()),
        ]);
        let set: GeometrySet<Dim2> = GeometrySet::from_geometry(&input);
        assert!(set.is_empty());
        assert_eq!(set.recompose(), Geometry::empty());
    }
}
