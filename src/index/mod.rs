// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Bounding-box index over the primitives of a set

mod sweep;

pub use sweep::{brute_force_pairs, overlapping_pairs, self_overlapping_pairs};

use crate::geometry::BoundingBox;
use crate::set::{Dimension, GeometrySet, PrimitiveRef};
use std::ops::ControlFlow;

/// Anything with an axis-aligned box
pub trait HasBox {
    fn bbox(&self) -> &BoundingBox;
}

impl HasBox for BoundingBox {
    fn bbox(&self) -> &BoundingBox {
        self
    }
}

/// Box around one primitive with a handle back into its set
///
/// `id` is the primitive's position in the set's four-phase iteration.
#[derive(Debug)]
pub struct PrimitiveBox<'a, D: Dimension> {
    pub bbox: BoundingBox,
    pub handle: PrimitiveRef<'a, D>,
    pub id: usize,
}

impl<'a, D: Dimension> Clone for PrimitiveBox<'a, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, D: Dimension> Copy for PrimitiveBox<'a, D> {}

impl<'a, D: Dimension> HasBox for PrimitiveBox<'a, D> {
    fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

/// One box per primitive, in iteration order
pub fn compute_bounding_boxes<D: Dimension>(set: &GeometrySet<D>) -> Vec<PrimitiveBox<'_, D>> {
    set.primitives()
        .enumerate()
        .map(|(id, handle)| PrimitiveBox {
            bbox: handle.bounding_box(),
            handle,
            id,
        })
        .collect()
}

impl<D: Dimension> GeometrySet<D> {
    pub fn bounding_boxes(&self) -> Vec<PrimitiveBox<'_, D>> {
        compute_bounding_boxes(self)
    }
}

/// Report every pair of overlapping boxes between `a` and `b`
///
/// Boxes are compared on the ambient axes of `D`. Returning
/// `ControlFlow::Break` from the callback stops the enumeration.
pub fn box_intersection<'a, D, F>(
    a: &[PrimitiveBox<'a, D>],
    b: &[PrimitiveBox<'a, D>],
    cutoff: usize,
    mut callback: F,
) -> ControlFlow<()>
where
    D: Dimension,
    F: FnMut(&PrimitiveBox<'a, D>, &PrimitiveBox<'a, D>) -> ControlFlow<()>,
{
    let mut pairs = 0usize;
    let flow = overlapping_pairs(a, b, D::DIM, cutoff, |i, j| {
        pairs += 1;
        callback(&a[i], &b[j])
    });
    tracing::trace!(left = a.len(), right = b.len(), pairs, "box sweep");
    flow
}

/// Report every pair of overlapping boxes within `boxes`, each pair once
pub fn self_box_intersection<'a, D, F>(
    boxes: &[PrimitiveBox<'a, D>],
    cutoff: usize,
    mut callback: F,
) -> ControlFlow<()>
where
    D: Dimension,
    F: FnMut(&PrimitiveBox<'a, D>, &PrimitiveBox<'a, D>) -> ControlFlow<()>,
{
    let mut pairs = 0usize;
    let flow = self_overlapping_pairs(boxes, D::DIM, cutoff, |i, j| {
        pairs += 1;
        callback(&boxes[i], &boxes[j])
    });
    tracing::trace!(boxes = boxes.len(), pairs, "self box sweep");
    flow
}

/// [`box_intersection`] for callbacks that never stop early
pub fn for_each_box_pair<'a, D, F>(
    a: &[PrimitiveBox<'a, D>],
    b: &[PrimitiveBox<'a, D>],
    cutoff: usize,
    mut callback: F,
) where
    D: Dimension,
    F: FnMut(&PrimitiveBox<'a, D>, &PrimitiveBox<'a, D>),
{
    let flow = box_intersection(a, b, cutoff, |x, y| {
        callback(x, y);
        ControlFlow::Continue(())
    });
    debug_assert!(flow.is_continue());
}

/// [`self_box_intersection`] for callbacks that never stop early
pub fn for_each_self_box_pair<'a, D, F>(boxes: &[PrimitiveBox<'a, D>], cutoff: usize, mut callback: F)
where
    D: Dimension,
    F: FnMut(&PrimitiveBox<'a, D>, &PrimitiveBox<'a, D>),
{
    let flow = self_box_intersection(boxes, cutoff, |x, y| {
        callback(x, y);
        ControlFlow::Continue(())
    });
    debug_assert!(flow.is_continue());
}
