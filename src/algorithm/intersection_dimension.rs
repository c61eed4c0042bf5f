// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

use crate::config::EngineConfig;
use crate::index::box_intersection;
use crate::kernel::Contact;
use crate::set::{Dimension, GeometrySet, PrimitiveRef};
use std::ops::ControlFlow;
use tracing::instrument;

/// Dimension of the intersection of two primitives, -1 when they are disjoint
pub fn primitive_intersection_dimension<D: Dimension>(a: PrimitiveRef<'_, D>, b: PrimitiveRef<'_, D>) -> i32 {
    if a.primitive_type() < b.primitive_type() {
        return primitive_intersection_dimension(b, a);
    }
    if !D::intersects(a, b) {
        return -1;
    }
    match (a, b) {
        (_, PrimitiveRef::Point(_)) => 0,
        (PrimitiveRef::Segment(s), PrimitiveRef::Segment(t)) => match s.value.contact(&t.value) {
            Contact::Overlapping(..) => 1,
            _ => 0,
        },
        _ => {
            let mut out = GeometrySet::new();
            D::intersection(a, b, &mut out);
            out.maximum_dimension().max(0)
        }
    }
}

/// Highest dimension among the pairwise intersections of two sets
///
/// -1 when the sets are disjoint. A complete set yields the other set's
/// maximum dimension.
#[instrument(skip_all)]
pub fn intersection_dimension<D: Dimension>(
    a: &GeometrySet<D>,
    b: &GeometrySet<D>,
    config: &EngineConfig,
) -> i32 {
    if a.is_complete() {
        return b.maximum_dimension();
    }
    if b.is_complete() {
        return a.maximum_dimension();
    }
    tracing::debug!(left = a.len(), right = b.len(), "intersection dimension");

    let bound = a.maximum_dimension().min(b.maximum_dimension());
    let mut dimension = -1;
    let (boxes_a, boxes_b) = (a.bounding_boxes(), b.bounding_boxes());
    let flow = box_intersection(&boxes_a, &boxes_b, config.cutoff(), |pa, pb| {
        let kinds_bound = pa.handle.primitive_type().min(pb.handle.primitive_type()).dimension();
        if kinds_bound > dimension {
            dimension = dimension.max(primitive_intersection_dimension(pa.handle, pb.handle));
        }
        if dimension >= bound {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    if flow.is_break() {
        tracing::trace!(dimension, "dimension bound reached");
    }
    dimension
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, LineString, Point, Polygon};
    use crate::set::{Dim2, Dim3};

    fn planar(geometry: &Geometry) -> GeometrySet<Dim2> {
        GeometrySet::from_geometry(geometry)
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry {
        Geometry::Polygon(Polygon::new(LineString::from_xy(&[
            (x0, y0),
            (x1, y0),
            (x1, y1),
            (x0, y1),
            (x0, y0),
        ])))
    }

    #[test]
    fn test_planar_dimensions() {
        let config = EngineConfig::default();
        let a = planar(&square(0.0, 0.0, 2.0, 2.0));
        assert_eq!(intersection_dimension(&a, &planar(&square(1.0, 1.0, 3.0, 3.0)), &config), 2);
        assert_eq!(intersection_dimension(&a, &planar(&square(2.0, 0.0, 3.0, 2.0)), &config), 1);
        assert_eq!(intersection_dimension(&a, &planar(&square(2.0, 2.0, 3.0, 3.0)), &config), 0);
        assert_eq!(intersection_dimension(&a, &planar(&square(5.0, 5.0, 6.0, 6.0)), &config), -1);
        let line = planar(&Geometry::LineString(LineString::from_xy(&[(-1.0, 1.0), (3.0, 1.0)])));
        assert_eq!(intersection_dimension(&line, &a, &config), 1);
    }

    #[test]
    fn test_segment_contacts() {
        let config = EngineConfig::default();
        let a = planar(&Geometry::LineString(LineString::from_xy(&[(0.0, 0.0), (2.0, 0.0)])));
        let crossing = planar(&Geometry::LineString(LineString::from_xy(&[(1.0, -1.0), (1.0, 1.0)])));
        let overlapping = planar(&Geometry::LineString(LineString::from_xy(&[(1.0, 0.0), (3.0, 0.0)])));
        assert_eq!(intersection_dimension(&a, &crossing, &config), 0);
        assert_eq!(intersection_dimension(&a, &overlapping, &config), 1);
    }

    #[test]
    fn test_complete_set_yields_other_dimension() {
        let config = EngineConfig::default();
        let point: GeometrySet<Dim3> = GeometrySet::from_geometry(&Geometry::Point(Point::new_3d(0.0, 0.0, 0.0)));
        assert_eq!(intersection_dimension(&GeometrySet::complete(), &point, &config), 0);
        assert_eq!(intersection_dimension(&point, &GeometrySet::<Dim3>::new(), &config), -1);
    }
}
