// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

use crate::config::EngineConfig;
use crate::index::for_each_self_box_pair;
use crate::set::{Dimension, GeometrySet, PrimitiveRef, PrimitiveType};

/// Whether `a` contains all of `b`
pub fn primitive_covers<D: Dimension>(a: PrimitiveRef<'_, D>, b: PrimitiveRef<'_, D>) -> bool {
    D::covers(a, b)
}

/// Copy of `set` without primitives covered by other primitives
///
/// Volumes are decided first, then surfaces, segments and points. A primitive
/// is dropped when a later primitive of its own kind covers it, or when a
/// primitive already kept does. Of several equal primitives the last one
/// survives.
pub fn filter_covered<D: Dimension>(set: &GeometrySet<D>, config: &EngineConfig) -> GeometrySet<D> {
    let boxes = set.bounding_boxes();
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); boxes.len()];
    for_each_self_box_pair(&boxes, config.cutoff(), |x, y| {
        neighbors[x.id].push(y.id);
        neighbors[y.id].push(x.id);
    });

    let mut kept = vec![false; boxes.len()];
    for kind in PrimitiveType::ALL.into_iter().rev() {
        for current in boxes.iter().filter(|b| b.handle.primitive_type() == kind) {
            let i = current.id;
            let covered = neighbors[i].iter().any(|&j| {
                let other = &boxes[j];
                let eligible = kept[j] || (other.handle.primitive_type() == kind && j > i);
                eligible && D::covers(other.handle, current.handle)
            });
            kept[i] = !covered;
        }
    }

    let mut out = GeometrySet::new();
    out.set_complete(set.is_complete());
    for b in boxes.iter().filter(|b| kept[b.id]) {
        out.add_ref(b.handle);
    }
    tracing::trace!(before = set.len(), after = out.len(), "filter covered");
    out
}

impl<D: Dimension> GeometrySet<D> {
    /// See [`filter_covered`]
    pub fn filter_covered(&self, config: &EngineConfig) -> GeometrySet<D> {
        filter_covered(self, config)
    }
}
