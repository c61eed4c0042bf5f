// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Mixed-dimension primitive sets
//!
//! A [`GeometrySet`] holds the same geometry as a [`crate::geometry::Geometry`],
//! decomposed into points, segments, surfaces and volumes. The ambient
//! dimension is a type parameter implementing [`Dimension`], which supplies the
//! concrete primitive types and the per-dimension geometric rules.

mod compose;
mod dim2;
mod dim3;
mod geometry_set;

pub use dim2::{Dim2, NoVolume};
pub use dim3::Dim3;
pub use geometry_set::GeometrySet;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::geometry::{self, BoundingBox, Geometry};
use crate::kernel::{KernelPoint, Segment};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Kind of a primitive; the discriminant is its topological dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    Point = 0,
    Segment = 1,
    Surface = 2,
    Volume = 3,
}

impl PrimitiveType {
    /// All kinds in iteration order
    pub const ALL: [PrimitiveType; 4] = [
        PrimitiveType::Point,
        PrimitiveType::Segment,
        PrimitiveType::Surface,
        PrimitiveType::Volume,
    ];

    pub fn dimension(self) -> i32 {
        self as i32
    }
}

/// Bit flags attached to a stored primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PrimitiveFlags(u32);

impl PrimitiveFlags {
    pub const NONE: PrimitiveFlags = PrimitiveFlags(0);
    /// A volume whose mesh is flat, recomposed as a polygon
    pub const IS_PLANAR: PrimitiveFlags = PrimitiveFlags(1);

    pub fn bits(self) -> u32 {
        self.0
    }

    pub fn contains(self, other: PrimitiveFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: PrimitiveFlags) {
        self.0 |= other.0;
    }
}

/// A primitive value with its flags
///
/// Equality and ordering look at the value only.
#[derive(Debug, Clone, Copy)]
pub struct Flagged<T> {
    pub value: T,
    pub flags: PrimitiveFlags,
}

impl<T> Flagged<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            flags: PrimitiveFlags::NONE,
        }
    }

    pub fn with_flags(value: T, flags: PrimitiveFlags) -> Self {
        Self { value, flags }
    }
}

impl<T: PartialEq> PartialEq for Flagged<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Flagged<T> {}

impl<T: Ord> PartialOrd for Flagged<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for Flagged<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

/// Owned primitive of any kind
pub enum Primitive<D: Dimension> {
    Point(Flagged<D::Point>),
    Segment(Flagged<Segment<D::Point>>),
    Surface(Flagged<D::Surface>),
    Volume(Flagged<D::Volume>),
}

/// Borrowed primitive of any kind, pointing into a [`GeometrySet`]
pub enum PrimitiveRef<'a, D: Dimension> {
    Point(&'a Flagged<D::Point>),
    Segment(&'a Flagged<Segment<D::Point>>),
    Surface(&'a Flagged<D::Surface>),
    Volume(&'a Flagged<D::Volume>),
}

impl<'a, D: Dimension> Clone for PrimitiveRef<'a, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, D: Dimension> Copy for PrimitiveRef<'a, D> {}

impl<D: Dimension> Clone for Primitive<D> {
    fn clone(&self) -> Self {
        self.as_ref().to_owned()
    }
}

impl<D: Dimension> Primitive<D> {
    pub fn point(p: D::Point) -> Self {
        Primitive::Point(Flagged::new(p))
    }

    pub fn segment(s: Segment<D::Point>) -> Self {
        Primitive::Segment(Flagged::new(s))
    }

    pub fn surface(s: D::Surface) -> Self {
        Primitive::Surface(Flagged::new(s))
    }

    pub fn volume(v: D::Volume) -> Self {
        Primitive::Volume(Flagged::new(v))
    }

    pub fn as_ref(&self) -> PrimitiveRef<'_, D> {
        match self {
            Primitive::Point(p) => PrimitiveRef::Point(p),
            Primitive::Segment(s) => PrimitiveRef::Segment(s),
            Primitive::Surface(s) => PrimitiveRef::Surface(s),
            Primitive::Volume(v) => PrimitiveRef::Volume(v),
        }
    }

    pub fn primitive_type(&self) -> PrimitiveType {
        self.as_ref().primitive_type()
    }
}

impl<'a, D: Dimension> PrimitiveRef<'a, D> {
    pub fn primitive_type(&self) -> PrimitiveType {
        match self {
            PrimitiveRef::Point(_) => PrimitiveType::Point,
            PrimitiveRef::Segment(_) => PrimitiveType::Segment,
            PrimitiveRef::Surface(_) => PrimitiveType::Surface,
            PrimitiveRef::Volume(_) => PrimitiveType::Volume,
        }
    }

    pub fn flags(&self) -> PrimitiveFlags {
        match self {
            PrimitiveRef::Point(p) => p.flags,
            PrimitiveRef::Segment(s) => s.flags,
            PrimitiveRef::Surface(s) => s.flags,
            PrimitiveRef::Volume(v) => v.flags,
        }
    }

    pub fn to_owned(&self) -> Primitive<D> {
        match *self {
            PrimitiveRef::Point(p) => Primitive::Point(p.clone()),
            PrimitiveRef::Segment(s) => Primitive::Segment(s.clone()),
            PrimitiveRef::Surface(s) => Primitive::Surface(s.clone()),
            PrimitiveRef::Volume(v) => Primitive::Volume(v.clone()),
        }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            PrimitiveRef::Point(p) => BoundingBox::from_point(&p.value.to_point3()),
            PrimitiveRef::Segment(s) => BoundingBox::from_points(&[
                s.value.source().to_point3(),
                s.value.target().to_point3(),
            ]),
            PrimitiveRef::Surface(s) => D::surface_bbox(&s.value),
            PrimitiveRef::Volume(v) => D::volume_bbox(&v.value),
        }
    }

    /// Every vertex of the primitive
    pub fn vertices(&self) -> Vec<D::Point> {
        match self {
            PrimitiveRef::Point(p) => vec![p.value],
            PrimitiveRef::Segment(s) => vec![*s.value.source(), *s.value.target()],
            PrimitiveRef::Surface(s) => D::surface_vertices(&s.value),
            PrimitiveRef::Volume(v) => D::volume_vertices(&v.value),
        }
    }
}

impl<'a, D: Dimension> fmt::Debug for PrimitiveRef<'a, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl<'a, D: Dimension> fmt::Display for PrimitiveRef<'a, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveRef::Point(p) => write!(f, "POINT({})", p.value),
            PrimitiveRef::Segment(s) => write!(f, "{}", s.value),
            PrimitiveRef::Surface(s) => D::fmt_surface(&s.value, f),
            PrimitiveRef::Volume(v) => D::fmt_volume(&v.value, f),
        }
    }
}

impl<D: Dimension> fmt::Debug for Primitive<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

/// Result of subtracting one primitive from another
#[derive(Debug)]
pub enum Remainder<D: Dimension> {
    /// The minuend survives as is
    Unchanged,
    /// What is left of the minuend, possibly nothing
    Reduced(GeometrySet<D>),
}

/// Options for turning a set back into a geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecomposeOptions {
    /// Merge coplanar facets of recomposed solids
    pub merge_facets: bool,
}

impl Default for RecomposeOptions {
    fn default() -> Self {
        Self { merge_facets: true }
    }
}

/// Ambient dimension of a [`GeometrySet`]
///
/// The pairwise rules take the primitive of higher (or equal) kind first;
/// implementations re-dispatch swapped pairs.
pub trait Dimension: Copy + Clone + fmt::Debug + Default + Send + Sync + 'static {
    const DIM: usize;

    type Point: KernelPoint + Send + Sync;
    type Surface: Clone + fmt::Debug + PartialEq + Send + Sync;
    type Volume: Clone + fmt::Debug + PartialEq + Send + Sync;

    fn point(p: &geometry::Point) -> Self::Point;
    fn to_point(p: &Self::Point) -> geometry::Point;

    fn decompose_triangle(triangle: &geometry::Triangle, set: &mut GeometrySet<Self>);
    fn decompose_polygon(polygon: &geometry::Polygon, set: &mut GeometrySet<Self>);
    fn decompose_solid(solid: &geometry::Solid, set: &mut GeometrySet<Self>);

    fn recompose_surfaces(surfaces: &[Flagged<Self::Surface>], out: &mut Vec<Geometry>);
    fn recompose_volumes(
        volumes: &[Flagged<Self::Volume>],
        options: &RecomposeOptions,
        out: &mut Vec<Geometry>,
    );

    fn surface_bbox(surface: &Self::Surface) -> BoundingBox;
    fn volume_bbox(volume: &Self::Volume) -> BoundingBox;
    fn surface_vertices(surface: &Self::Surface) -> Vec<Self::Point>;
    fn volume_vertices(volume: &Self::Volume) -> Vec<Self::Point>;
    fn fmt_surface(surface: &Self::Surface, f: &mut fmt::Formatter<'_>) -> fmt::Result;
    fn fmt_volume(volume: &Self::Volume, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    fn intersects(a: PrimitiveRef<'_, Self>, b: PrimitiveRef<'_, Self>) -> bool;
    fn intersection(a: PrimitiveRef<'_, Self>, b: PrimitiveRef<'_, Self>, out: &mut GeometrySet<Self>);
    /// `a - b` for primitives known to intersect
    fn subtract(
        a: PrimitiveRef<'_, Self>,
        b: PrimitiveRef<'_, Self>,
        config: &EngineConfig,
    ) -> Result<Remainder<Self>>;
    /// Whether `a` contains all of `b`
    fn covers(a: PrimitiveRef<'_, Self>, b: PrimitiveRef<'_, Self>) -> bool;
}
