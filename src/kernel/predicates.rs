// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Exact orientation predicates
//!
//! Signs come from adaptive-precision determinants, so they are exact for
//! any finite `f64` input. Constructions elsewhere in the crate round.

use super::point::{Point2, Point3};
use robust::{Coord, Coord3D};

/// Sign of an orientation determinant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Negative,
    Zero,
    Positive,
}

impl Orientation {
    fn of(det: f64) -> Self {
        if det > 0.0 {
            Orientation::Positive
        } else if det < 0.0 {
            Orientation::Negative
        } else {
            Orientation::Zero
        }
    }

    pub fn is_zero(self) -> bool {
        self == Orientation::Zero
    }

    /// Both signs are nonzero and differ
    pub fn opposes(self, other: Orientation) -> bool {
        matches!(
            (self, other),
            (Orientation::Positive, Orientation::Negative)
                | (Orientation::Negative, Orientation::Positive)
        )
    }

    pub fn reversed(self) -> Self {
        match self {
            Orientation::Negative => Orientation::Positive,
            Orientation::Zero => Orientation::Zero,
            Orientation::Positive => Orientation::Negative,
        }
    }
}

/// Position relative to a bounded region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundedSide {
    Inside,
    Boundary,
    Outside,
}

impl BoundedSide {
    /// Inside or on the boundary
    pub fn is_closed_inside(self) -> bool {
        self != BoundedSide::Outside
    }
}

fn coord2(p: &Point2) -> Coord<f64> {
    Coord { x: p.x(), y: p.y() }
}

fn coord3(p: &Point3) -> Coord3D<f64> {
    Coord3D {
        x: p.x(),
        y: p.y(),
        z: p.z(),
    }
}

/// Positive when `a, b, c` turn counterclockwise
pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> Orientation {
    Orientation::of(robust::orient2d(coord2(a), coord2(b), coord2(c)))
}

/// Positive when `d` lies on the side of plane `a, b, c` that
/// `(b - a) x (c - a)` points to
pub fn orient3d(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> Orientation {
    // robust reports the opposite side as positive
    Orientation::of(robust::orient3d(coord3(a), coord3(b), coord3(c), coord3(d))).reversed()
}

pub fn collinear_2d(a: &Point2, b: &Point2, c: &Point2) -> bool {
    orient2d(a, b, c).is_zero()
}

/// Exact 3D collinearity: every coordinate-plane projection is degenerate
pub fn collinear_3d(a: &Point3, b: &Point3, c: &Point3) -> bool {
    (0..3).all(|drop| {
        let (pa, pb, pc) = (a.drop_axis(drop), b.drop_axis(drop), c.drop_axis(drop));
        collinear_2d(&pa, &pb, &pc)
    })
}

pub fn coplanar(a: &Point3, b: &Point3, c: &Point3, d: &Point3) -> bool {
    orient3d(a, b, c, d).is_zero()
}
