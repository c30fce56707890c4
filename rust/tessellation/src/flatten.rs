// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Path flattening
//!
//! Replaces quadratic and cubic curves by line segments. A curve is split at
//! its midpoint (de Casteljau) until its control points lie within the
//! flatness of the chord. Since a Bézier curve stays inside the convex hull
//! of its control points, the resulting polyline never deviates more than the
//! flatness from the true curve.

use crate::error::{Error, Result};
use crate::path::PathSegment;
use crate::shape::Shape;
use nalgebra::Point2;
use smallvec::SmallVec;

/// Maximum recursion depth of curve subdivision (at most 1024 lines per curve)
pub const SUBDIVISION_LIMIT: u32 = 10;

/// Lazy flattening adapter over a segment iterator
#[derive(Debug, Clone)]
pub struct Flatten<I> {
    inner: I,
    flatness_sq: f64,
    current: Point2<f64>,
    start: Point2<f64>,
    /// Line end points still to emit, last one first
    pending: SmallVec<[Point2<f64>; 16]>,
}

impl<I> Flatten<I>
where
    I: Iterator<Item = PathSegment>,
{
    /// Wrap a segment iterator; `flatness` must be finite and positive
    pub fn new(inner: I, flatness: f64) -> Result<Self> {
        if !flatness.is_finite() || flatness <= 0.0 {
            return Err(Error::InvalidFlatness(flatness));
        }

        Ok(Self {
            inner,
            flatness_sq: flatness * flatness,
            current: Point2::origin(),
            start: Point2::origin(),
            pending: SmallVec::new(),
        })
    }

    fn queue(&mut self, mut points: SmallVec<[Point2<f64>; 16]>) {
        points.reverse();
        self.pending = points;
    }
}

impl<I> Iterator for Flatten<I>
where
    I: Iterator<Item = PathSegment>,
{
    type Item = PathSegment;

    fn next(&mut self) -> Option<PathSegment> {
        if let Some(point) = self.pending.pop() {
            return Some(PathSegment::LineTo(point));
        }

        let segment = self.inner.next()?;
        match segment {
            PathSegment::MoveTo(p) => {
                self.current = p;
                self.start = p;
                Some(segment)
            }
            PathSegment::LineTo(p) => {
                self.current = p;
                Some(segment)
            }
            PathSegment::Close => {
                self.current = self.start;
                Some(segment)
            }
            PathSegment::QuadTo(c, p) => {
                let mut points = SmallVec::new();
                subdivide_quad(&self.current, &c, &p, self.flatness_sq, 0, &mut points);
                self.current = p;
                self.queue(points);
                self.pending.pop().map(PathSegment::LineTo)
            }
            PathSegment::CubicTo(c1, c2, p) => {
                let mut points = SmallVec::new();
                subdivide_cubic(&self.current, &c1, &c2, &p, self.flatness_sq, 0, &mut points);
                self.current = p;
                self.queue(points);
                self.pending.pop().map(PathSegment::LineTo)
            }
        }
    }
}

/// Flatten a segment sequence with the given flatness
pub fn flatten<I>(segments: I, flatness: f64) -> Result<Flatten<I::IntoIter>>
where
    I: IntoIterator<Item = PathSegment>,
{
    Flatten::new(segments.into_iter(), flatness)
}

/// Determine if a shape contains any curves (potentially, that is)
///
/// Known primitives are answered without generating their path.
pub fn contains_curves(shape: &Shape) -> bool {
    match shape {
        Shape::Line { .. } | Shape::Polygon(_) | Shape::Rectangle { .. } => false,
        Shape::Arc { .. }
        | Shape::Ellipse { .. }
        | Shape::RoundRectangle { .. }
        | Shape::QuadCurve { .. }
        | Shape::CubicCurve { .. } => true,
        Shape::Path(path) => segments_contain_curves(path.iter()),
    }
}

/// Scan a segment sequence for curves
pub fn segments_contain_curves<I>(segments: I) -> bool
where
    I: IntoIterator<Item = PathSegment>,
{
    segments.into_iter().any(|s| s.is_curve())
}

/// Squared distance from a point to a line segment
#[inline]
fn segment_distance_sq(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    let ab = b - a;
    let ap = p - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return ap.norm_squared();
    }
    let t = (ap.dot(&ab) / len_sq).clamp(0.0, 1.0);
    (ap - ab * t).norm_squared()
}

#[inline]
fn midpoint(a: &Point2<f64>, b: &Point2<f64>) -> Point2<f64> {
    nalgebra::center(a, b)
}

fn subdivide_quad(
    p0: &Point2<f64>,
    c: &Point2<f64>,
    p1: &Point2<f64>,
    flatness_sq: f64,
    depth: u32,
    out: &mut SmallVec<[Point2<f64>; 16]>,
) {
    if depth >= SUBDIVISION_LIMIT || segment_distance_sq(c, p0, p1) <= flatness_sq {
        out.push(*p1);
        return;
    }

    let l = midpoint(p0, c);
    let r = midpoint(c, p1);
    let m = midpoint(&l, &r);
    subdivide_quad(p0, &l, &m, flatness_sq, depth + 1, out);
    subdivide_quad(&m, &r, p1, flatness_sq, depth + 1, out);
}

fn subdivide_cubic(
    p0: &Point2<f64>,
    c1: &Point2<f64>,
    c2: &Point2<f64>,
    p1: &Point2<f64>,
    flatness_sq: f64,
    depth: u32,
    out: &mut SmallVec<[Point2<f64>; 16]>,
) {
    let flat = segment_distance_sq(c1, p0, p1).max(segment_distance_sq(c2, p0, p1));
    if depth >= SUBDIVISION_LIMIT || flat <= flatness_sq {
        out.push(*p1);
        return;
    }

    let a = midpoint(p0, c1);
    let b = midpoint(c1, c2);
    let c = midpoint(c2, p1);
    let ab = midpoint(&a, &b);
    let bc = midpoint(&b, &c);
    let m = midpoint(&ab, &bc);
    subdivide_cubic(p0, &a, &ab, &m, flatness_sq, depth + 1, out);
    subdivide_cubic(&m, &bc, &c, p1, flatness_sq, depth + 1, out);
}
