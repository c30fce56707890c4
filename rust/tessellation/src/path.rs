// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Path segments, winding rules and the general path type

use crate::error::{Error, Result};
use nalgebra::Point2;

/// Raw segment code for a move-to
pub const SEG_MOVETO: i32 = 0;
/// Raw segment code for a line-to
pub const SEG_LINETO: i32 = 1;
/// Raw segment code for a quadratic curve
pub const SEG_QUADTO: i32 = 2;
/// Raw segment code for a cubic curve
pub const SEG_CUBICTO: i32 = 3;
/// Raw segment code for a close
pub const SEG_CLOSE: i32 = 4;

/// Raw winding rule code for even-odd
pub const WIND_EVEN_ODD: i32 = 0;
/// Raw winding rule code for non-zero
pub const WIND_NON_ZERO: i32 = 1;

/// A single path command
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathSegment {
    /// Start a new sub-path
    MoveTo(Point2<f64>),
    /// Straight line to a point
    LineTo(Point2<f64>),
    /// Quadratic Bézier (control, end)
    QuadTo(Point2<f64>, Point2<f64>),
    /// Cubic Bézier (control 1, control 2, end)
    CubicTo(Point2<f64>, Point2<f64>, Point2<f64>),
    /// Close the current sub-path
    Close,
}

impl PathSegment {
    /// Decode a segment from a raw code and coordinate buffer
    ///
    /// The buffer holds up to three `x, y` pairs, as many as the segment type
    /// needs. Unknown codes are an upstream contract violation.
    pub fn from_raw(code: i32, coords: &[f64; 6]) -> Result<Self> {
        let p = |i: usize| Point2::new(coords[i * 2], coords[i * 2 + 1]);
        match code {
            SEG_MOVETO => Ok(Self::MoveTo(p(0))),
            SEG_LINETO => Ok(Self::LineTo(p(0))),
            SEG_QUADTO => Ok(Self::QuadTo(p(0), p(1))),
            SEG_CUBICTO => Ok(Self::CubicTo(p(0), p(1), p(2))),
            SEG_CLOSE => Ok(Self::Close),
            other => Err(Error::UnknownSegment(other)),
        }
    }

    /// End point of the segment (`None` for close)
    #[inline]
    pub fn end_point(&self) -> Option<Point2<f64>> {
        match *self {
            Self::MoveTo(p) | Self::LineTo(p) | Self::QuadTo(_, p) | Self::CubicTo(_, _, p) => {
                Some(p)
            }
            Self::Close => None,
        }
    }

    /// Check if this is a curve segment
    #[inline]
    pub fn is_curve(&self) -> bool {
        matches!(self, Self::QuadTo(..) | Self::CubicTo(..))
    }
}

/// Rule deciding which regions of overlapping contours are inside
///
/// The winding number of a region counts how often the contours wind around
/// it (counter-clockwise +1, clockwise -1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindingRule {
    /// Inside if the winding number is odd
    EvenOdd,
    /// Inside if the winding number is not zero
    #[default]
    NonZero,
    /// Inside if the winding number is positive
    Positive,
    /// Inside if the winding number is negative
    Negative,
}

impl WindingRule {
    /// Decode a winding rule from its raw code
    pub fn from_raw(code: i32) -> Result<Self> {
        match code {
            WIND_EVEN_ODD => Ok(Self::EvenOdd),
            WIND_NON_ZERO => Ok(Self::NonZero),
            other => Err(Error::UnknownWindingRule(other)),
        }
    }
}

/// General path made of segments
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path2D {
    winding_rule: WindingRule,
    segments: Vec<PathSegment>,
}

impl Path2D {
    /// Create an empty path with the non-zero winding rule
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty path with the given winding rule
    pub fn with_winding_rule(winding_rule: WindingRule) -> Self {
        Self {
            winding_rule,
            segments: Vec::new(),
        }
    }

    /// Create a closed polygon path from its vertices
    pub fn from_polygon(points: &[Point2<f64>]) -> Self {
        let mut path = Self::new();
        if let Some((first, rest)) = points.split_first() {
            path.move_to(first.x, first.y);
            for p in rest {
                path.line_to(p.x, p.y);
            }
            path.close();
        }
        path
    }

    /// Build a path from raw segment codes
    pub fn from_raw<I>(winding_rule: i32, segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = (i32, [f64; 6])>,
    {
        let mut path = Self::with_winding_rule(WindingRule::from_raw(winding_rule)?);
        for (code, coords) in segments {
            path.segments.push(PathSegment::from_raw(code, &coords)?);
        }
        Ok(path)
    }

    /// Winding rule of this path
    pub fn winding_rule(&self) -> WindingRule {
        self.winding_rule
    }

    /// Segments of this path
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Iterate over the segments
    pub fn iter(&self) -> std::iter::Copied<std::slice::Iter<'_, PathSegment>> {
        self.segments.iter().copied()
    }

    /// Check if the path has no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Append a segment
    pub fn push(&mut self, segment: PathSegment) -> &mut Self {
        self.segments.push(segment);
        self
    }

    /// Start a new sub-path
    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(PathSegment::MoveTo(Point2::new(x, y)))
    }

    /// Add a line
    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.push(PathSegment::LineTo(Point2::new(x, y)))
    }

    /// Add a quadratic curve
    pub fn quad_to(&mut self, cx: f64, cy: f64, x: f64, y: f64) -> &mut Self {
        self.push(PathSegment::QuadTo(Point2::new(cx, cy), Point2::new(x, y)))
    }

    /// Add a cubic curve
    pub fn cubic_to(&mut self, c1x: f64, c1y: f64, c2x: f64, c2y: f64, x: f64, y: f64) -> &mut Self {
        self.push(PathSegment::CubicTo(
            Point2::new(c1x, c1y),
            Point2::new(c2x, c2y),
            Point2::new(x, y),
        ))
    }

    /// Close the current sub-path
    pub fn close(&mut self) -> &mut Self {
        self.push(PathSegment::Close)
    }
}

impl Extend<PathSegment> for Path2D {
    fn extend<T: IntoIterator<Item = PathSegment>>(&mut self, iter: T) {
        self.segments.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Path2D {
    type Item = PathSegment;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, PathSegment>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
