// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

use super::covers::filter_covered;
use crate::config::EngineConfig;
use crate::index::for_each_box_pair;
use crate::set::{Dimension, GeometrySet, PrimitiveRef};
use tracing::instrument;

/// Intersection of two primitives as a new set
pub fn primitive_intersection<D: Dimension>(a: PrimitiveRef<'_, D>, b: PrimitiveRef<'_, D>) -> GeometrySet<D> {
    let mut out = GeometrySet::new();
    if D::intersects(a, b) {
        D::intersection(a, b, &mut out);
    }
    out
}

/// Intersection of two sets
///
/// A complete set is the identity. Every intersecting pair of overlapping
/// boxes contributes its primitive intersection; covered pieces are then
/// dropped when [`EngineConfig::filter_covered`] is set.
#[instrument(skip_all)]
pub fn intersection<D: Dimension>(
    a: &GeometrySet<D>,
    b: &GeometrySet<D>,
    config: &EngineConfig,
) -> GeometrySet<D> {
    if a.is_complete() {
        return b.clone();
    }
    if b.is_complete() {
        return a.clone();
    }
    tracing::debug!(left = a.len(), right = b.len(), "intersection");

    let mut out = GeometrySet::new();
    let (boxes_a, boxes_b) = (a.bounding_boxes(), b.bounding_boxes());
    for_each_box_pair(&boxes_a, &boxes_b, config.cutoff(), |pa, pb| {
        if D::intersects(pa.handle, pb.handle) {
            D::intersection(pa.handle, pb.handle, &mut out);
        }
    });

    if config.filter_covered {
        filter_covered(&out, config)
    } else {
        out
    }
}
