// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Oriented segments, exact contact classification and interval splitting

use super::point::{KernelPoint, Point2, Point3};
use super::predicates::{collinear_2d, coplanar, orient2d};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Segment from `source` to `target`
///
/// Equality, ordering and hashing use the unordered endpoint pair, so a
/// segment and its opposite are the same set member. The stored
/// orientation is still reported by [`Segment::source`] and
/// [`Segment::target`].
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct Segment<P> {
    source: P,
    target: P,
}

/// Endpoint of one of the two segments taking part in a contact query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    A0,
    A1,
    B0,
    B1,
}

/// Exact classification of how two segments meet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    Disjoint,
    /// Proper crossing at parameter `t` along the first segment
    Crossing(f64),
    /// Single shared point, which is an existing endpoint
    Touching(Endpoint),
    /// Collinear overlap of positive length, listed along the first segment
    Overlapping(Endpoint, Endpoint),
}

/// Result of intersecting two segments
#[derive(Clone, Copy)]
pub enum SegmentIntersection<P> {
    Point(P),
    Segment(Segment<P>),
}

impl<P: KernelPoint> Segment<P> {
    pub fn new(source: P, target: P) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> &P {
        &self.source
    }

    pub fn target(&self) -> &P {
        &self.target
    }

    pub fn opposite(&self) -> Self {
        Self::new(self.target, self.source)
    }

    pub fn min(&self) -> &P {
        std::cmp::min(&self.source, &self.target)
    }

    pub fn max(&self) -> &P {
        std::cmp::max(&self.source, &self.target)
    }

    pub fn is_degenerate(&self) -> bool {
        self.source == self.target
    }

    fn key(&self) -> (&P, &P) {
        (self.min(), self.max())
    }

    /// Axis of largest extent
    pub fn dominant_axis(&self) -> usize {
        (0..P::DIM)
            .map(|axis| (axis, (self.target.coord(axis) - self.source.coord(axis)).abs()))
            .fold((0, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best })
            .0
    }

    /// Order of two points of the supporting line, from source to target
    pub fn order_along(&self, a: &P, b: &P) -> Ordering {
        let axis = self.dominant_axis();
        let forward = self.target.coord(axis) >= self.source.coord(axis);
        let along = a.coord(axis).total_cmp(&b.coord(axis));
        let along = if forward { along } else { along.reverse() };
        along.then_with(|| a.cmp(b))
    }

    /// Parameter of `p` along the segment, 0 at source and 1 at target
    pub fn position(&self, p: &P) -> f64 {
        let axis = self.dominant_axis();
        let den = self.target.coord(axis) - self.source.coord(axis);
        if den == 0.0 {
            return 0.0;
        }
        (p.coord(axis) - self.source.coord(axis)) / den
    }

    pub fn point_at(&self, t: f64) -> P {
        if t <= 0.0 {
            self.source
        } else if t >= 1.0 {
            self.target
        } else {
            P::lerp(&self.source, &self.target, t)
        }
    }

    /// Exact closed containment
    pub fn has_on(&self, p: &P) -> bool {
        P::collinear(&self.source, &self.target, p)
            && (0..P::DIM).all(|axis| {
                let (a, b) = (self.source.coord(axis), self.target.coord(axis));
                a.min(b) <= p.coord(axis) && p.coord(axis) <= a.max(b)
            })
    }

    pub fn contact(&self, other: &Self) -> Contact {
        if self.is_degenerate() {
            return if other.has_on(&self.source) {
                Contact::Touching(Endpoint::A0)
            } else {
                Contact::Disjoint
            };
        }
        if other.is_degenerate() {
            return if self.has_on(&other.source) {
                Contact::Touching(Endpoint::B0)
            } else {
                Contact::Disjoint
            };
        }
        P::segment_contact(self, other)
    }

    pub fn intersects(&self, other: &Self) -> bool {
        self.contact(other) != Contact::Disjoint
    }

    fn endpoint(&self, other: &Self, which: Endpoint) -> P {
        match which {
            Endpoint::A0 => self.source,
            Endpoint::A1 => self.target,
            Endpoint::B0 => other.source,
            Endpoint::B1 => other.target,
        }
    }

    pub fn intersection(&self, other: &Self) -> Option<SegmentIntersection<P>> {
        match self.contact(other) {
            Contact::Disjoint => None,
            Contact::Crossing(t) => Some(SegmentIntersection::Point(self.point_at(t))),
            Contact::Touching(e) => Some(SegmentIntersection::Point(self.endpoint(other, e))),
            Contact::Overlapping(e0, e1) => Some(SegmentIntersection::Segment(Segment::new(
                self.endpoint(other, e0),
                self.endpoint(other, e1),
            ))),
        }
    }

    /// Pieces of `self` left after removing `overlap`, a collinear sub-segment
    pub fn without(&self, overlap: &Segment<P>) -> Vec<Segment<P>> {
        let (lo, hi) = match self.order_along(&overlap.source, &overlap.target) {
            Ordering::Greater => (overlap.target, overlap.source),
            _ => (overlap.source, overlap.target),
        };
        let mut pieces = Vec::with_capacity(2);
        if self.order_along(&self.source, &lo) == Ordering::Less {
            pieces.push(Segment::new(self.source, lo));
        }
        if self.order_along(&hi, &self.target) == Ordering::Less {
            pieces.push(Segment::new(hi, self.target));
        }
        pieces
    }
}

/// Contact of two non-degenerate segments whose four endpoints are collinear
pub(crate) fn collinear_contact<P: KernelPoint>(a: &Segment<P>, b: &Segment<P>) -> Contact {
    let mut shared: Vec<(Endpoint, P)> = Vec::with_capacity(4);
    if a.has_on(&b.source) {
        shared.push((Endpoint::B0, b.source));
    }
    if a.has_on(&b.target) {
        shared.push((Endpoint::B1, b.target));
    }
    if b.has_on(&a.source) {
        shared.push((Endpoint::A0, a.source));
    }
    if b.has_on(&a.target) {
        shared.push((Endpoint::A1, a.target));
    }
    shared.sort_by(|x, y| a.order_along(&x.1, &y.1));
    match (shared.first(), shared.last()) {
        (Some(first), Some(last)) if first.1 == last.1 => Contact::Touching(first.0),
        (Some(first), Some(last)) => Contact::Overlapping(first.0, last.0),
        _ => Contact::Disjoint,
    }
}

fn cross(u: (f64, f64), v: (f64, f64)) -> f64 {
    u.0 * v.1 - u.1 * v.0
}

/// Planar contact of two non-degenerate segments
pub(crate) fn planar_contact(a: &Segment<Point2>, b: &Segment<Point2>) -> Contact {
    let d1 = orient2d(&b.source, &b.target, &a.source);
    let d2 = orient2d(&b.source, &b.target, &a.target);
    let d3 = orient2d(&a.source, &a.target, &b.source);
    let d4 = orient2d(&a.source, &a.target, &b.target);

    if d1.is_zero() && d2.is_zero() && d3.is_zero() && d4.is_zero() {
        return collinear_contact(a, b);
    }

    if d1.opposes(d2) && d3.opposes(d4) {
        let r = (a.target.x() - a.source.x(), a.target.y() - a.source.y());
        let s = (b.target.x() - b.source.x(), b.target.y() - b.source.y());
        let w = (b.source.x() - a.source.x(), b.source.y() - a.source.y());
        return Contact::Crossing(cross(w, s) / cross(r, s));
    }

    if d1.is_zero() && b.has_on(&a.source) {
        Contact::Touching(Endpoint::A0)
    } else if d2.is_zero() && b.has_on(&a.target) {
        Contact::Touching(Endpoint::A1)
    } else if d3.is_zero() && a.has_on(&b.source) {
        Contact::Touching(Endpoint::B0)
    } else if d4.is_zero() && a.has_on(&b.target) {
        Contact::Touching(Endpoint::B1)
    } else {
        Contact::Disjoint
    }
}

/// Spatial contact of two non-degenerate segments
///
/// Coplanar pairs that are not collinear are classified in a coordinate
/// projection that is injective on their common plane.
pub(crate) fn spatial_contact(a: &Segment<Point3>, b: &Segment<Point3>) -> Contact {
    if !coplanar(&a.source, &a.target, &b.source, &b.target) {
        return Contact::Disjoint;
    }
    if Point3::collinear(&a.source, &a.target, &b.source)
        && Point3::collinear(&a.source, &a.target, &b.target)
    {
        return collinear_contact(a, b);
    }
    for axis in 0..3 {
        let pa = Segment::new(a.source.drop_axis(axis), a.target.drop_axis(axis));
        let pb = Segment::new(b.source.drop_axis(axis), b.target.drop_axis(axis));
        let flat = collinear_2d(&pa.source, &pa.target, &pb.source)
            && collinear_2d(&pa.source, &pa.target, &pb.target);
        if !flat {
            return pa.contact(&pb);
        }
    }
    Contact::Disjoint
}

impl<P: KernelPoint> PartialEq for Segment<P> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<P: KernelPoint> Eq for Segment<P> {}

impl<P: KernelPoint> PartialOrd for Segment<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: KernelPoint> Ord for Segment<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl<P: KernelPoint> Hash for Segment<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl<P: KernelPoint> fmt::Debug for Segment<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Segment({:?} -> {:?})", self.source, self.target)
    }
}

impl<P: KernelPoint> fmt::Display for Segment<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LINESTRING({},{})", self.source, self.target)
    }
}

impl<P: KernelPoint> PartialEq for SegmentIntersection<P> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SegmentIntersection::Point(a), SegmentIntersection::Point(b)) => a == b,
            (SegmentIntersection::Segment(a), SegmentIntersection::Segment(b)) => a == b,
            _ => false,
        }
    }
}

impl<P: KernelPoint> Eq for SegmentIntersection<P> {}

impl<P: KernelPoint> fmt::Debug for SegmentIntersection<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentIntersection::Point(p) => write!(f, "Point({p:?})"),
            SegmentIntersection::Segment(s) => write!(f, "{s:?}"),
        }
    }
}

/// A segment cut at a set of points, with each piece classified
///
/// Used to clip segments against regions: pieces between consecutive cut
/// points never cross the region boundary, so one classification per piece
/// is enough.
#[derive(Debug, Clone)]
pub struct SegmentSplit<P> {
    points: Vec<P>,
    intervals: Vec<bool>,
    points_inside: Vec<bool>,
}

impl<P: KernelPoint> SegmentSplit<P> {
    pub fn new(
        segment: &Segment<P>,
        cuts: impl IntoIterator<Item = P>,
        mut interval_inside: impl FnMut(&P, &P) -> bool,
        mut point_inside: impl FnMut(&P) -> bool,
    ) -> Self {
        let (source, target) = (segment.source, segment.target);
        let mut points = vec![source, target];
        points.extend(cuts.into_iter().filter(|p| {
            segment.order_along(&source, p) == Ordering::Less
                && segment.order_along(p, &target) == Ordering::Less
        }));
        points.sort_by(|a, b| segment.order_along(a, b));
        points.dedup();

        let intervals = points
            .windows(2)
            .map(|w| interval_inside(&w[0], &w[1]))
            .collect();
        let points_inside = points.iter().map(&mut point_inside).collect();
        Self {
            points,
            intervals,
            points_inside,
        }
    }

    fn runs(&self, inside: bool) -> Vec<Segment<P>> {
        let mut runs = Vec::new();
        let mut start: Option<usize> = None;
        for (i, &flag) in self.intervals.iter().enumerate() {
            match (flag == inside, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    runs.push(Segment::new(self.points[s], self.points[i]));
                    start = None;
                }
                _ => {}
            }
        }
        if let Some(s) = start {
            runs.push(Segment::new(self.points[s], self.points[self.intervals.len()]));
        }
        runs
    }

    /// Maximal inside pieces plus isolated inside points, along the segment
    pub fn inside_pieces(&self) -> Vec<SegmentIntersection<P>> {
        let mut pieces: Vec<SegmentIntersection<P>> = self
            .runs(true)
            .into_iter()
            .map(SegmentIntersection::Segment)
            .collect();
        for (i, p) in self.points.iter().enumerate() {
            let before = i > 0 && self.intervals[i - 1];
            let after = i < self.intervals.len() && self.intervals[i];
            if self.points_inside[i] && !before && !after {
                pieces.push(SegmentIntersection::Point(*p));
            }
        }
        pieces
    }

    /// Maximal pieces outside the region
    pub fn outside_segments(&self) -> Vec<Segment<P>> {
        self.runs(false)
    }

    pub fn has_inside_interval(&self) -> bool {
        self.intervals.iter().any(|&inside| inside)
    }

    pub fn is_fully_inside(&self) -> bool {
        self.intervals.iter().all(|&inside| inside) && self.points_inside.iter().all(|&p| p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(a: (f64, f64), b: (f64, f64)) -> Segment<Point2> {
        Segment::new(Point2::new(a.0, a.1), Point2::new(b.0, b.1))
    }

    #[test]
    fn test_opposite_segments_are_equal() {
        let s = seg((0.0, 0.0), (1.0, 0.0));
        assert_eq!(s, s.opposite());
        assert_eq!(s.opposite().source(), &Point2::new(1.0, 0.0));
    }

    #[test]
    fn test_crossing() {
        let a = seg((0.0, 0.0), (2.0, 2.0));
        let b = seg((0.0, 2.0), (2.0, 0.0));
        assert_eq!(
            a.intersection(&b),
            Some(SegmentIntersection::Point(Point2::new(1.0, 1.0)))
        );
    }

    #[test]
    fn test_touching_uses_the_exact_endpoint() {
        let a = seg((0.0, 0.0), (2.0, 0.0));
        let b = seg((1.0, 0.0), (1.0, 5.0));
        assert_eq!(a.contact(&b), Contact::Touching(Endpoint::B0));
    }

    #[test]
    fn test_collinear_overlap_follows_first_segment() {
        let a = seg((1.0, 0.0), (0.0, 0.0));
        let b = seg((0.5, 0.0), (3.0, 0.0));
        assert_eq!(
            a.intersection(&b),
            Some(SegmentIntersection::Segment(seg((1.0, 0.0), (0.5, 0.0))))
        );
        assert!(matches!(a.contact(&b), Contact::Overlapping(_, _)));
    }

    #[test]
    fn test_collinear_disjoint_and_point_contact() {
        let a = seg((0.0, 0.0), (1.0, 0.0));
        assert_eq!(a.contact(&seg((2.0, 0.0), (3.0, 0.0))), Contact::Disjoint);
        assert_eq!(
            a.intersection(&seg((1.0, 0.0), (3.0, 0.0))),
            Some(SegmentIntersection::Point(Point2::new(1.0, 0.0)))
        );
    }

    #[test]
    fn test_without_keeps_direction() {
        let a = seg((1.0, 0.0), (0.0, 0.0));
        let pieces = a.without(&seg((0.3, 0.0), (0.6, 0.0)));
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].source(), &Point2::new(1.0, 0.0));
        assert_eq!(pieces[0].target(), &Point2::new(0.6, 0.0));
        assert_eq!(pieces[1].target(), &Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_spatial_contact() {
        let a = Segment::new(Point3::new(0.0, 0.0, 1.0), Point3::new(2.0, 2.0, 1.0));
        let b = Segment::new(Point3::new(0.0, 2.0, 1.0), Point3::new(2.0, 0.0, 1.0));
        let skew = Segment::new(Point3::new(0.0, 2.0, 2.0), Point3::new(2.0, 0.0, 0.5));
        assert_eq!(
            a.intersection(&b),
            Some(SegmentIntersection::Point(Point3::new(1.0, 1.0, 1.0)))
        );
        assert!(!a.intersects(&skew));
    }

    #[test]
    fn test_split_runs() {
        let s = seg((0.0, 0.0), (4.0, 0.0));
        let cuts = [1.0, 2.0, 3.0].map(|x| Point2::new(x, 0.0));
        // inside on [1, 2] and at the isolated point 3
        let split = SegmentSplit::new(
            &s,
            cuts,
            |a, b| a.x() >= 1.0 && b.x() <= 2.0,
            |p| (1.0..=2.0).contains(&p.x()) || p.x() == 3.0,
        );
        let inside = split.inside_pieces();
        assert_eq!(inside.len(), 2);
        assert_eq!(inside[0], SegmentIntersection::Segment(seg((1.0, 0.0), (2.0, 0.0))));
        assert_eq!(inside[1], SegmentIntersection::Point(Point2::new(3.0, 0.0)));
        let outside = split.outside_segments();
        assert_eq!(outside, vec![seg((0.0, 0.0), (1.0, 0.0)), seg((2.0, 0.0), (4.0, 0.0))]);
    }
}
