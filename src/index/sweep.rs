// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Box-intersection sweep
//!
//! Both box lists are split around the median center along one axis (cycling
//! through the axes with depth). Boxes straddling the split value are matched
//! against the whole other side by a one-way scan; the two halves are handled
//! recursively. Small inputs go straight to the scan.

use super::HasBox;
use crate::geometry::BoundingBox;
use std::ops::ControlFlow;

/// Report `(i, j)` for every `a[i]` overlapping `b[j]` on the first `dims` axes
///
/// Each overlapping pair is reported exactly once, in no particular order.
pub fn overlapping_pairs<A, B, F>(
    a: &[A],
    b: &[B],
    dims: usize,
    cutoff: usize,
    mut report: F,
) -> ControlFlow<()>
where
    A: HasBox,
    B: HasBox,
    F: FnMut(usize, usize) -> ControlFlow<()>,
{
    let left: Vec<&BoundingBox> = a.iter().map(HasBox::bbox).collect();
    let right: Vec<&BoundingBox> = b.iter().map(HasBox::bbox).collect();
    let sweep = Sweep {
        a: &left,
        b: &right,
        dims: dims.clamp(1, 3),
        cutoff: cutoff.max(1),
    };
    let ids_a = (0..left.len()).filter(|&i| !left[i].is_empty()).collect();
    let ids_b = (0..right.len()).filter(|&j| !right[j].is_empty()).collect();
    sweep.run(ids_a, ids_b, 0, &mut report)
}

/// Report `(i, j)` with `i < j` for every pair of overlapping boxes in one list
pub fn self_overlapping_pairs<T, F>(
    boxes: &[T],
    dims: usize,
    cutoff: usize,
    mut report: F,
) -> ControlFlow<()>
where
    T: HasBox,
    F: FnMut(usize, usize) -> ControlFlow<()>,
{
    overlapping_pairs(boxes, boxes, dims, cutoff, |i, j| {
        if i < j {
            report(i, j)
        } else {
            ControlFlow::Continue(())
        }
    })
}

/// Quadratic reference enumeration, sorted
pub fn brute_force_pairs<A: HasBox, B: HasBox>(a: &[A], b: &[B], dims: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            if !x.bbox().is_empty() && !y.bbox().is_empty() && x.bbox().overlaps(y.bbox(), dims) {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

struct Sweep<'s> {
    a: &'s [&'s BoundingBox],
    b: &'s [&'s BoundingBox],
    dims: usize,
    cutoff: usize,
}

enum Side {
    Low,
    Straddle,
    High,
}

fn side(bbox: &BoundingBox, axis: usize, split: f64) -> Side {
    if bbox.hi(axis) < split {
        Side::Low
    } else if bbox.lo(axis) > split {
        Side::High
    } else {
        Side::Straddle
    }
}

impl<'s> Sweep<'s> {
    fn run<F>(&self, ids_a: Vec<usize>, ids_b: Vec<usize>, depth: usize, report: &mut F) -> ControlFlow<()>
    where
        F: FnMut(usize, usize) -> ControlFlow<()>,
    {
        if ids_a.is_empty() || ids_b.is_empty() {
            return ControlFlow::Continue(());
        }
        if ids_a.len() <= self.cutoff || ids_b.len() <= self.cutoff {
            return self.scan(ids_a, ids_b, report);
        }

        let axis = depth % self.dims;
        let split = self.median_center(&ids_a, &ids_b, axis);

        let (mut low_a, mut mid_a, mut high_a) = (Vec::new(), Vec::new(), Vec::new());
        for i in ids_a {
            match side(self.a[i], axis, split) {
                Side::Low => low_a.push(i),
                Side::Straddle => mid_a.push(i),
                Side::High => high_a.push(i),
            }
        }
        let (mut low_b, mut mid_b, mut high_b) = (Vec::new(), Vec::new(), Vec::new());
        for j in ids_b {
            match side(self.b[j], axis, split) {
                Side::Low => low_b.push(j),
                Side::Straddle => mid_b.push(j),
                Side::High => high_b.push(j),
            }
        }

        if mid_a.is_empty() && mid_b.is_empty() {
            // no progress possible on this axis
            low_a.append(&mut high_a);
            low_b.append(&mut high_b);
            return self.scan(low_a, low_b, report);
        }

        // straddling boxes of `a` against all of `b`
        let all_b: Vec<usize> = low_b.iter().chain(&mid_b).chain(&high_b).copied().collect();
        self.scan(mid_a, all_b, report)?;
        // the rest of `a` against straddling boxes of `b`
        let rest_a: Vec<usize> = low_a.iter().chain(&high_a).copied().collect();
        self.scan(rest_a, mid_b, report)?;

        self.run(low_a, low_b, depth + 1, report)?;
        self.run(high_a, high_b, depth + 1, report)
    }

    fn median_center(&self, ids_a: &[usize], ids_b: &[usize], axis: usize) -> f64 {
        let mut centers: Vec<f64> = ids_a
            .iter()
            .map(|&i| self.a[i])
            .chain(ids_b.iter().map(|&j| self.b[j]))
            .map(|bbox| (bbox.lo(axis) + bbox.hi(axis)) / 2.0)
            .collect();
        let mid = centers.len() / 2;
        let (_, median, _) = centers.select_nth_unstable_by(mid, f64::total_cmp);
        *median
    }

    /// Sort both lists by their lower bound on the first axis and walk them
    /// together; each box scans forward through the other list while the
    /// lower bounds stay within its extent.
    fn scan<F>(&self, mut ids_a: Vec<usize>, mut ids_b: Vec<usize>, report: &mut F) -> ControlFlow<()>
    where
        F: FnMut(usize, usize) -> ControlFlow<()>,
    {
        ids_a.sort_unstable_by(|&x, &y| self.a[x].lo(0).total_cmp(&self.a[y].lo(0)));
        ids_b.sort_unstable_by(|&x, &y| self.b[x].lo(0).total_cmp(&self.b[y].lo(0)));

        let (mut i, mut j) = (0, 0);
        while i < ids_a.len() && j < ids_b.len() {
            let (x, y) = (self.a[ids_a[i]], self.b[ids_b[j]]);
            if x.lo(0) <= y.lo(0) {
                for &k in &ids_b[j..] {
                    if self.b[k].lo(0) > x.hi(0) {
                        break;
                    }
                    if x.overlaps(self.b[k], self.dims) {
                        report(ids_a[i], k)?;
                    }
                }
                i += 1;
            } else {
                for &k in &ids_a[i..] {
                    if self.a[k].lo(0) > y.hi(0) {
                        break;
                    }
                    if self.a[k].overlaps(y, self.dims) {
                        report(k, ids_b[j])?;
                    }
                }
                j += 1;
            }
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn square(x: f64, y: f64, size: f64) -> BoundingBox {
        BoundingBox::new(Point3::new(x, y, 0.0), Point3::new(x + size, y + size, 0.0))
    }

    fn collect(a: &[BoundingBox], b: &[BoundingBox], dims: usize, cutoff: usize) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        let _ = overlapping_pairs(a, b, dims, cutoff, |i, j| {
            pairs.push((i, j));
            ControlFlow::Continue(())
        });
        pairs.sort_unstable();
        pairs
    }

    #[test]
    fn test_touching_boxes_overlap() {
        let a = [square(0.0, 0.0, 1.0)];
        let b = [square(1.0, 1.0, 1.0), square(1.5, 0.0, 1.0)];
        assert_eq!(collect(&a, &b, 2, 10), vec![(0, 0)]);
    }

    #[test]
    fn test_partitioned_sweep_matches_brute_force_on_grid() {
        let a: Vec<BoundingBox> = (0..40)
            .map(|k| square((k % 8) as f64, (k / 8) as f64, 1.5))
            .collect();
        let b: Vec<BoundingBox> = (0..30)
            .map(|k| square((k % 6) as f64 * 1.3, (k / 6) as f64 * 0.9, 0.5))
            .collect();
        let expected = brute_force_pairs(&a, &b, 2);
        assert!(!expected.is_empty());
        for cutoff in [1, 3, 100] {
            assert_eq!(collect(&a, &b, 2, cutoff), expected);
        }
    }

    #[test]
    fn test_empty_boxes_never_overlap() {
        let a = [BoundingBox::empty(), square(0.0, 0.0, 1.0)];
        let b = [square(0.5, 0.5, 1.0), BoundingBox::empty()];
        assert_eq!(collect(&a, &b, 2, 1), vec![(1, 0)]);
    }

    #[test]
    fn test_third_axis_is_ignored_in_the_plane() {
        let a = [BoundingBox::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 0.0))];
        let b = [BoundingBox::new(Point3::new(0.0, 0.0, 5.0), Point3::new(1.0, 1.0, 6.0))];
        assert_eq!(collect(&a, &b, 2, 1), vec![(0, 0)]);
        assert!(collect(&a, &b, 3, 1).is_empty());
    }

    #[test]
    fn test_self_pairs_are_ordered() {
        let boxes = [square(0.0, 0.0, 1.0), square(0.5, 0.5, 1.0), square(5.0, 5.0, 1.0)];
        let mut pairs = Vec::new();
        let _ = self_overlapping_pairs(&boxes, 2, 1, |i, j| {
            pairs.push((i, j));
            ControlFlow::Continue(())
        });
        assert_eq!(pairs, vec![(0, 1)]);
    }
}
