// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

use crate::config::EngineConfig;
use crate::index::box_intersection;
use crate::set::{Dimension, GeometrySet, PrimitiveRef};
use std::ops::ControlFlow;
use tracing::instrument;

/// Whether two primitives share at least one point
pub fn primitive_intersects<D: Dimension>(a: PrimitiveRef<'_, D>, b: PrimitiveRef<'_, D>) -> bool {
    D::intersects(a, b)
}

/// Whether two sets share at least one point
///
/// A complete set meets every non-empty set. The sweep stops at the first
/// intersecting pair.
#[instrument(skip_all)]
pub fn intersects<D: Dimension>(a: &GeometrySet<D>, b: &GeometrySet<D>, config: &EngineConfig) -> bool {
    if a.is_complete() || b.is_complete() {
        return !a.is_empty() && !b.is_empty();
    }
    tracing::debug!(left = a.len(), right = b.len(), "intersects");
    let (boxes_a, boxes_b) = (a.bounding_boxes(), b.bounding_boxes());
    box_intersection(&boxes_a, &boxes_b, config.cutoff(), |pa, pb| {
        if D::intersects(pa.handle, pb.handle) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .is_break()
}
