// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Predicates and boolean operations on geometry sets
//!
//! Primitive rules live in [`planar`] and [`spatial`] and are reached through
//! [`crate::set::Dimension`]. The set-level operations pair primitives with the
//! box sweep and combine the pairwise results.

mod covers;
mod difference;
mod facet_merge;
mod intersection;
mod intersection_dimension;
mod intersects;
pub mod planar;
pub mod spatial;

pub use covers::{filter_covered, primitive_covers};
pub use difference::{difference, primitive_difference};
pub use facet_merge::merge_coplanar_facets;
pub use intersection::{intersection, primitive_intersection};
pub use intersection_dimension::{intersection_dimension, primitive_intersection_dimension};
pub use intersects::{intersects, primitive_intersects};
