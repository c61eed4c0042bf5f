// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! The primitive set container

use super::{Dimension, Flagged, Primitive, PrimitiveRef, PrimitiveType};
use crate::kernel::Segment;
use std::collections::BTreeSet;
use std::fmt;

/// Points, segments, surfaces and volumes of one geometry
///
/// Points and segments are ordered sets (a segment and its opposite count
/// once). Surfaces and volumes keep insertion order and may repeat. A
/// *complete* set stands for the whole space and is the identity of
/// intersection.
#[derive(Debug, Clone)]
pub struct GeometrySet<D: Dimension> {
    points: BTreeSet<Flagged<D::Point>>,
    segments: BTreeSet<Flagged<Segment<D::Point>>>,
    surfaces: Vec<Flagged<D::Surface>>,
    volumes: Vec<Flagged<D::Volume>>,
    complete: bool,
}

impl<D: Dimension> Default for GeometrySet<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Dimension> GeometrySet<D> {
    pub fn new() -> Self {
        Self {
            points: BTreeSet::new(),
            segments: BTreeSet::new(),
            surfaces: Vec::new(),
            volumes: Vec::new(),
            complete: false,
        }
    }

    /// The set standing for the whole space
    pub fn complete() -> Self {
        Self {
            complete: true,
            ..Self::new()
        }
    }

    pub fn from_primitive(primitive: Primitive<D>) -> Self {
        let mut set = Self::new();
        set.add_primitive(primitive);
        set
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn set_complete(&mut self, complete: bool) {
        self.complete = complete;
    }

    pub fn points(&self) -> &BTreeSet<Flagged<D::Point>> {
        &self.points
    }

    pub fn segments(&self) -> &BTreeSet<Flagged<Segment<D::Point>>> {
        &self.segments
    }

    pub fn surfaces(&self) -> &[Flagged<D::Surface>] {
        &self.surfaces
    }

    pub fn volumes(&self) -> &[Flagged<D::Volume>] {
        &self.volumes
    }

    /// No primitive stored; a complete set is never empty
    pub fn is_empty(&self) -> bool {
        !self.complete && self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.points.len() + self.segments.len() + self.surfaces.len() + self.volumes.len()
    }

    pub fn len_of(&self, kind: PrimitiveType) -> usize {
        match kind {
            PrimitiveType::Point => self.points.len(),
            PrimitiveType::Segment => self.segments.len(),
            PrimitiveType::Surface => self.surfaces.len(),
            PrimitiveType::Volume => self.volumes.len(),
        }
    }

    pub fn has_points(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn has_segments(&self) -> bool {
        !self.segments.is_empty()
    }

    pub fn has_surfaces(&self) -> bool {
        !self.surfaces.is_empty()
    }

    pub fn has_volumes(&self) -> bool {
        !self.volumes.is_empty()
    }

    /// Highest stored kind, -1 when empty and the ambient dimension when complete
    pub fn maximum_dimension(&self) -> i32 {
        if self.complete {
            return D::DIM as i32;
        }
        PrimitiveType::ALL
            .iter()
            .rev()
            .find(|kind| self.len_of(**kind) > 0)
            .map_or(-1, |kind| kind.dimension())
    }

    pub fn add_point(&mut self, point: D::Point) {
        self.points.insert(Flagged::new(point));
    }

    /// Zero-length segments are ignored
    pub fn add_segment(&mut self, segment: Segment<D::Point>) {
        self.insert_segment(Flagged::new(segment));
    }

    pub fn add_surface(&mut self, surface: D::Surface) {
        self.surfaces.push(Flagged::new(surface));
    }

    pub fn add_volume(&mut self, volume: D::Volume) {
        self.volumes.push(Flagged::new(volume));
    }

    pub fn add_flagged_volume(&mut self, volume: Flagged<D::Volume>) {
        self.volumes.push(volume);
    }

    fn insert_segment(&mut self, segment: Flagged<Segment<D::Point>>) {
        if !segment.value.is_degenerate() {
            self.segments.insert(segment);
        }
    }

    pub fn add_primitive(&mut self, primitive: Primitive<D>) {
        match primitive {
            Primitive::Point(p) => {
                self.points.insert(p);
            }
            Primitive::Segment(s) => self.insert_segment(s),
            Primitive::Surface(s) => self.surfaces.push(s),
            Primitive::Volume(v) => self.volumes.push(v),
        }
    }

    /// Copy a primitive from another set
    pub fn add_ref(&mut self, primitive: PrimitiveRef<'_, D>) {
        self.add_primitive(primitive.to_owned());
    }

    /// Insert every vertex of `primitive` into the point set
    pub fn collect_points(&mut self, primitive: PrimitiveRef<'_, D>) {
        for vertex in primitive.vertices() {
            self.add_point(vertex);
        }
    }

    /// Move all primitives of `other` into this set
    pub fn merge(&mut self, other: GeometrySet<D>) {
        self.points.extend(other.points);
        self.segments.extend(other.segments);
        self.surfaces.extend(other.surfaces);
        self.volumes.extend(other.volumes);
        self.complete |= other.complete;
    }

    /// The primitives of one kind, as a new set
    pub fn only(&self, kind: PrimitiveType) -> GeometrySet<D> {
        let mut set = GeometrySet::new();
        for primitive in self.primitives_of(kind) {
            set.add_ref(primitive);
        }
        set
    }

    /// Points, then segments, then surfaces, then volumes
    pub fn primitives(&self) -> impl Iterator<Item = PrimitiveRef<'_, D>> + '_ {
        self.points
            .iter()
            .map(PrimitiveRef::Point)
            .chain(self.segments.iter().map(PrimitiveRef::Segment))
            .chain(self.surfaces.iter().map(PrimitiveRef::Surface))
            .chain(self.volumes.iter().map(PrimitiveRef::Volume))
    }

    pub fn primitives_of(&self, kind: PrimitiveType) -> impl Iterator<Item = PrimitiveRef<'_, D>> + '_ {
        let take = |k: PrimitiveType| if k == kind { usize::MAX } else { 0 };
        self.points
            .iter()
            .take(take(PrimitiveType::Point))
            .map(PrimitiveRef::Point)
            .chain(self.segments.iter().take(take(PrimitiveType::Segment)).map(PrimitiveRef::Segment))
            .chain(self.surfaces.iter().take(take(PrimitiveType::Surface)).map(PrimitiveRef::Surface))
            .chain(self.volumes.iter().take(take(PrimitiveType::Volume)).map(PrimitiveRef::Volume))
    }
}

impl<D: Dimension> fmt::Display for GeometrySet<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.complete {
            writeln!(f, "complete")?;
        }
        let labels = ["points", "segments", "surfaces", "volumes"];
        for (kind, label) in PrimitiveType::ALL.into_iter().zip(labels) {
            if self.len_of(kind) == 0 {
                continue;
            }
            writeln!(f, "{label}:")?;
            for primitive in self.primitives_of(kind) {
                writeln!(f, "  {primitive} flags={}", primitive.flags().bits())?;
            }
        }
        Ok(())
    }
}
