// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Set difference
//!
//! `(A1 ∪ A2) - B = (A1 - B) ∪ (A2 - B)` and `A - (B1 ∪ B2) = (A - B1) ∩ (A - B2)`:
//! every primitive of `A` is reduced by each primitive of `B` it meets, and
//! the partial remainders are intersected together.
//!
//! Covered pieces are cleaned up inside each reduced remainder only, so
//! primitives of `A` that no subtrahend touches come through as they are.

use super::covers::filter_covered;
use super::intersection::intersection;
use crate::config::EngineConfig;
use crate::error::{Result, SetOpError};
use crate::index::for_each_box_pair;
use crate::set::{Dimension, GeometrySet, PrimitiveRef, Remainder};
use tracing::instrument;

/// `a - b` for two primitives
///
/// Disjoint primitives leave `a` unchanged.
pub fn primitive_difference<D: Dimension>(
    a: PrimitiveRef<'_, D>,
    b: PrimitiveRef<'_, D>,
    config: &EngineConfig,
) -> Result<Remainder<D>> {
    if !D::intersects(a, b) {
        return Ok(Remainder::Unchanged);
    }
    D::subtract(a, b, config)
}

/// Difference of two sets
///
/// Subtracting a complete set leaves nothing. A complete minuend is only
/// representable when the subtrahend is empty.
#[instrument(skip_all)]
pub fn difference<D: Dimension>(
    a: &GeometrySet<D>,
    b: &GeometrySet<D>,
    config: &EngineConfig,
) -> Result<GeometrySet<D>> {
    if b.is_complete() {
        return Ok(GeometrySet::new());
    }
    if a.is_complete() {
        return if b.is_empty() {
            Ok(GeometrySet::complete())
        } else {
            Err(SetOpError::UnboundedDifference)
        };
    }
    tracing::debug!(left = a.len(), right = b.len(), "difference");

    let (boxes_a, boxes_b) = (a.bounding_boxes(), b.bounding_boxes());
    let mut candidates: Vec<Vec<usize>> = vec![Vec::new(); boxes_a.len()];
    for_each_box_pair(&boxes_a, &boxes_b, config.cutoff(), |pa, pb| {
        candidates[pa.id].push(pb.id);
    });

    let mut out = GeometrySet::new();
    for (pa, mut overlapping) in boxes_a.iter().zip(candidates) {
        overlapping.sort_unstable();
        let kind = pa.handle.primitive_type();

        // identity of intersection until a subtrahend bites
        let mut remainder: Option<GeometrySet<D>> = None;
        for j in overlapping {
            let pb = boxes_b[j].handle;
            if !D::intersects(pa.handle, pb) {
                continue;
            }
            match D::subtract(pa.handle, pb, config)? {
                Remainder::Unchanged => {
                    tracing::trace!(minuend = %pa.handle, subtrahend = %pb, "unchanged");
                }
                Remainder::Reduced(partial) => {
                    tracing::trace!(minuend = %pa.handle, subtrahend = %pb, pieces = partial.len(), "reduced");
                    let partial = partial.only(kind);
                    let reduced = match remainder {
                        None => partial,
                        Some(current) => intersection(&current, &partial, config).only(kind),
                    };
                    let exhausted = reduced.is_empty();
                    remainder = Some(reduced);
                    if exhausted {
                        break;
                    }
                }
            }
        }
        match remainder {
            None => out.add_ref(pa.handle),
            Some(rest) if config.filter_covered => out.merge(filter_covered(&rest, config)),
            Some(rest) => out.merge(rest),
        }
    }
    Ok(out)
}
