// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Segments against closed solids

use crate::geometry::BoundingBox;
use crate::kernel::{KernelPoint, Point3, Polyhedron, Segment, SegmentIntersection, SegmentSplit};

/// Cut `segment` where it meets the boundary of `solid`
///
/// Pieces are classified by the location of their midpoint; boundary
/// contact counts as inside.
pub fn split_segment(segment: &Segment<Point3>, solid: &Polyhedron) -> SegmentSplit<Point3> {
    let reach = BoundingBox::from_points([segment.source().inner(), segment.target().inner()]);
    let mut cuts = Vec::new();
    for triangle in solid.triangles() {
        if !triangle.bounding_box().overlaps(&reach, 3) {
            continue;
        }
        match triangle.intersect_segment(segment) {
            Some(SegmentIntersection::Point(p)) => cuts.push(p),
            Some(SegmentIntersection::Segment(s)) => {
                cuts.push(*s.source());
                cuts.push(*s.target());
            }
            None => {}
        }
    }
    SegmentSplit::new(
        segment,
        cuts,
        |a, b| solid.locate(&Point3::midpoint(a, b)).is_closed_inside(),
        |p| solid.locate(p).is_closed_inside(),
    )
}
