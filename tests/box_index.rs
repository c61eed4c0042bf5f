// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Randomised comparison of the box sweep against the quadratic scan

use nalgebra::Point3;
use polyset::geometry::{BoundingBox, Geometry, LineString, Point};
use polyset::index::{box_intersection, brute_force_pairs, overlapping_pairs, self_overlapping_pairs};
use polyset::{Dim2, GeometrySet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::ControlFlow;

fn random_boxes(rng: &mut StdRng, count: usize, spread: f64) -> Vec<BoundingBox> {
    (0..count)
        .map(|_| {
            let min = Point3::new(
                rng.gen_range(0.0..spread),
                rng.gen_range(0.0..spread),
                rng.gen_range(0.0..spread),
            );
            // some boxes are flat on an axis, like segments and points
            let size = [rng.gen_range(0.0..2.0), rng.gen_range(0.0..2.0), 0.0];
            let max = Point3::new(min.x + size[0], min.y + size[1], min.z + size[2]);
            BoundingBox::new(min, max)
        })
        .collect()
}

fn sweep_pairs(a: &[BoundingBox], b: &[BoundingBox], dims: usize, cutoff: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    let _ = overlapping_pairs(a, b, dims, cutoff, |i, j| {
        pairs.push((i, j));
        ControlFlow::Continue(())
    });
    pairs.sort_unstable();
    pairs
}

#[test]
fn test_sweep_matches_brute_force() {
    let mut rng = StdRng::seed_from_u64(7);
    for round in 0..40 {
        let (n, m) = (rng.gen_range(0..60), rng.gen_range(0..60));
        let a = random_boxes(&mut rng, n, 10.0);
        let b = random_boxes(&mut rng, m, 10.0);
        for dims in [2, 3] {
            let mut expected = brute_force_pairs(&a, &b, dims);
            expected.sort_unstable();
            for cutoff in [1, 4, 10, 1000] {
                assert_eq!(
                    sweep_pairs(&a, &b, dims, cutoff),
                    expected,
                    "round {round}, dims {dims}, cutoff {cutoff}"
                );
            }
        }
    }
}

#[test]
fn test_clustered_boxes() {
    let mut rng = StdRng::seed_from_u64(11);
    let a = random_boxes(&mut rng, 200, 1.0);
    let b = random_boxes(&mut rng, 200, 1.0);
    let mut expected = brute_force_pairs(&a, &b, 3);
    expected.sort_unstable();
    assert_eq!(sweep_pairs(&a, &b, 3, 10), expected);
}

#[test]
fn test_self_pairs_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(3);
    let boxes = random_boxes(&mut rng, 80, 10.0);
    let mut expected: Vec<(usize, usize)> = brute_force_pairs(&boxes, &boxes, 2)
        .into_iter()
        .filter(|(i, j)| i < j)
        .collect();
    expected.sort_unstable();

    let mut found = Vec::new();
    let _ = self_overlapping_pairs(&boxes, 2, 10, |i, j| {
        found.push((i.min(j), i.max(j)));
        ControlFlow::Continue(())
    });
    found.sort_unstable();
    assert_eq!(found, expected);
}

#[test]
fn test_break_stops_the_sweep() {
    let mut rng = StdRng::seed_from_u64(5);
    let boxes = random_boxes(&mut rng, 100, 1.0);
    let mut calls = 0;
    let flow = overlapping_pairs(&boxes, &boxes, 2, 10, |_, _| {
        calls += 1;
        ControlFlow::Break(())
    });
    assert!(flow.is_break());
    assert_eq!(calls, 1);
}

#[test]
fn test_primitive_boxes_carry_handles() {
    let lines = Geometry::MultiLineString(vec![
        LineString::from_xy(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0)]),
        LineString::from_xy(&[(10.0, 10.0), (11.0, 10.0)]),
    ]);
    let a = GeometrySet::<Dim2>::from_geometry(&lines);
    let b = GeometrySet::<Dim2>::from_geometry(&Geometry::Point(Point::new(1.0, 0.5)));
    let (boxes_a, boxes_b) = (a.bounding_boxes(), b.bounding_boxes());
    assert_eq!(boxes_a.len(), 3);
    assert_eq!(boxes_b.len(), 1);

    let mut hits = Vec::new();
    let _ = box_intersection(&boxes_a, &boxes_b, 10, |pa, pb| {
        hits.push((pa.id, pb.id));
        ControlFlow::Continue(())
    });
    hits.sort_unstable();
    // both segments of the first line touch x = 1
    assert_eq!(hits, vec![(0, 0), (1, 0)]);
}
