// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Known 2D shape primitives and their path segments
//!
//! Coordinates are y-up: rectangles, ellipses and round rectangles are traced
//! counter-clockwise. Arc angles use the screen convention (degrees,
//! `y = cy - sin(angle) * height / 2`), so a positive extent traces
//! clockwise.

use crate::path::{Path2D, PathSegment, WindingRule};
use nalgebra::{Point2, Vector2};
use std::f64::consts::FRAC_PI_2;

/// How the ends of an arc are connected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArcKind {
    /// Ends are not connected
    Open,
    /// Ends are connected by a straight line
    Chord,
    /// Ends are connected to the center of the ellipse
    Pie,
}

/// A 2D shape
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// Straight line segment
    Line {
        from: Point2<f64>,
        to: Point2<f64>,
    },
    /// Axis-aligned rectangle with its minimum corner at `x, y`
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Rectangle with elliptical corners of the given arc size
    RoundRectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        arc_width: f64,
        arc_height: f64,
    },
    /// Ellipse inscribed in a bounding box
    Ellipse {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Elliptical arc inscribed in a bounding box (angles in degrees)
    Arc {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        start: f64,
        extent: f64,
        kind: ArcKind,
    },
    /// Closed polygon
    Polygon(Vec<Point2<f64>>),
    /// Open quadratic curve
    QuadCurve {
        start: Point2<f64>,
        control: Point2<f64>,
        end: Point2<f64>,
    },
    /// Open cubic curve
    CubicCurve {
        start: Point2<f64>,
        control1: Point2<f64>,
        control2: Point2<f64>,
        end: Point2<f64>,
    },
    /// General path
    Path(Path2D),
}

impl Shape {
    /// Create a line
    pub fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::Line {
            from: Point2::new(x1, y1),
            to: Point2::new(x2, y2),
        }
    }

    /// Create a rectangle
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rectangle {
            x,
            y,
            width,
            height,
        }
    }

    /// Create an ellipse
    pub fn ellipse(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Ellipse {
            x,
            y,
            width,
            height,
        }
    }

    /// Winding rule used to fill this shape
    pub fn winding_rule(&self) -> WindingRule {
        match self {
            Self::Path(path) => path.winding_rule(),
            Self::Polygon(_) => WindingRule::EvenOdd,
            _ => WindingRule::NonZero,
        }
    }

    /// Iterate over the path segments of this shape
    pub fn iter(&self) -> ShapeSegments<'_> {
        match self {
            Self::Path(path) => ShapeSegments::Borrowed(path.iter()),
            _ => ShapeSegments::Owned(self.generate().into_iter()),
        }
    }

    /// Collect the path segments of this shape
    pub fn segments(&self) -> Vec<PathSegment> {
        self.iter().collect()
    }

    fn generate(&self) -> Vec<PathSegment> {
        match self {
            Self::Line { from, to } => vec![PathSegment::MoveTo(*from), PathSegment::LineTo(*to)],
            Self::Rectangle {
                x,
                y,
                width,
                height,
            } => rectangle_segments(*x, *y, *width, *height),
            Self::RoundRectangle {
                x,
                y,
                width,
                height,
                arc_width,
                arc_height,
            } => round_rectangle_segments(*x, *y, *width, *height, *arc_width, *arc_height),
            Self::Ellipse {
                x,
                y,
                width,
                height,
            } => ellipse_segments(*x, *y, *width, *height),
            Self::Arc {
                x,
                y,
                width,
                height,
                start,
                extent,
                kind,
            } => arc_segments(*x, *y, *width, *height, *start, *extent, *kind),
            Self::Polygon(points) => Path2D::from_polygon(points).segments().to_vec(),
            Self::QuadCurve {
                start,
                control,
                end,
            } => vec![PathSegment::MoveTo(*start), PathSegment::QuadTo(*control, *end)],
            Self::CubicCurve {
                start,
                control1,
                control2,
                end,
            } => vec![
                PathSegment::MoveTo(*start),
                PathSegment::CubicTo(*control1, *control2, *end),
            ],
            Self::Path(path) => path.segments().to_vec(),
        }
    }
}

impl From<Path2D> for Shape {
    fn from(path: Path2D) -> Self {
        Self::Path(path)
    }
}

/// Segment iterator of a [`Shape`]
#[derive(Debug, Clone)]
pub enum ShapeSegments<'a> {
    Borrowed(std::iter::Copied<std::slice::Iter<'a, PathSegment>>),
    Owned(std::vec::IntoIter<PathSegment>),
}

impl Iterator for ShapeSegments<'_> {
    type Item = PathSegment;

    #[inline]
    fn next(&mut self) -> Option<PathSegment> {
        match self {
            Self::Borrowed(it) => it.next(),
            Self::Owned(it) => it.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Borrowed(it) => it.size_hint(),
            Self::Owned(it) => it.size_hint(),
        }
    }
}

fn rectangle_segments(x: f64, y: f64, width: f64, height: f64) -> Vec<PathSegment> {
    if width < 0.0 || height < 0.0 {
        return Vec::new();
    }

    vec![
        PathSegment::MoveTo(Point2::new(x, y)),
        PathSegment::LineTo(Point2::new(x + width, y)),
        PathSegment::LineTo(Point2::new(x + width, y + height)),
        PathSegment::LineTo(Point2::new(x, y + height)),
        PathSegment::LineTo(Point2::new(x, y)),
        PathSegment::Close,
    ]
}

fn ellipse_segments(x: f64, y: f64, width: f64, height: f64) -> Vec<PathSegment> {
    if width < 0.0 || height < 0.0 {
        return Vec::new();
    }

    let center = Point2::new(x + width / 2.0, y + height / 2.0);
    let radii = Vector2::new(width / 2.0, height / 2.0);

    let mut segments = Vec::with_capacity(6);
    segments.push(PathSegment::MoveTo(ellipse_point(&center, &radii, 0.0)));
    for quarter in 0..4 {
        let a0 = quarter as f64 * FRAC_PI_2;
        segments.push(arc_piece(&center, &radii, a0, a0 + FRAC_PI_2));
    }
    segments.push(PathSegment::Close);
    segments
}

fn round_rectangle_segments(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    arc_width: f64,
    arc_height: f64,
) -> Vec<PathSegment> {
    if width < 0.0 || height < 0.0 {
        return Vec::new();
    }

    let rx = arc_width.clamp(0.0, width) / 2.0;
    let ry = arc_height.clamp(0.0, height) / 2.0;
    let radii = Vector2::new(rx, ry);
    let (x1, y1) = (x + width, y + height);

    vec![
        PathSegment::MoveTo(Point2::new(x + rx, y)),
        PathSegment::LineTo(Point2::new(x1 - rx, y)),
        arc_piece(&Point2::new(x1 - rx, y + ry), &radii, -FRAC_PI_2, 0.0),
        PathSegment::LineTo(Point2::new(x1, y1 - ry)),
        arc_piece(&Point2::new(x1 - rx, y1 - ry), &radii, 0.0, FRAC_PI_2),
        PathSegment::LineTo(Point2::new(x + rx, y1)),
        arc_piece(&Point2::new(x + rx, y1 - ry), &radii, FRAC_PI_2, 2.0 * FRAC_PI_2),
        PathSegment::LineTo(Point2::new(x, y + ry)),
        arc_piece(&Point2::new(x + rx, y + ry), &radii, 2.0 * FRAC_PI_2, 3.0 * FRAC_PI_2),
        PathSegment::Close,
    ]
}

fn arc_segments(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    start: f64,
    extent: f64,
    kind: ArcKind,
) -> Vec<PathSegment> {
    if width < 0.0 || height < 0.0 {
        return Vec::new();
    }

    let center = Point2::new(x + width / 2.0, y + height / 2.0);
    let radii = Vector2::new(width / 2.0, height / 2.0);

    // Screen angles run the other way around in y-up space
    let extent = extent.clamp(-360.0, 360.0);
    let a0 = -start.to_radians();
    let sweep = -extent.to_radians();
    let pieces = (extent.abs() / 90.0).ceil() as usize;

    let mut segments = Vec::with_capacity(pieces + 3);
    segments.push(PathSegment::MoveTo(ellipse_point(&center, &radii, a0)));
    for i in 0..pieces {
        let from = a0 + sweep * i as f64 / pieces as f64;
        let to = a0 + sweep * (i + 1) as f64 / pieces as f64;
        segments.push(arc_piece(&center, &radii, from, to));
    }

    match kind {
        ArcKind::Open => {}
        ArcKind::Chord => segments.push(PathSegment::Close),
        ArcKind::Pie => {
            segments.push(PathSegment::LineTo(center));
            segments.push(PathSegment::Close);
        }
    }
    segments
}

#[inline]
fn ellipse_point(center: &Point2<f64>, radii: &Vector2<f64>, angle: f64) -> Point2<f64> {
    Point2::new(center.x + radii.x * angle.cos(), center.y + radii.y * angle.sin())
}

/// Cubic approximation of an elliptical arc of at most 90 degrees
fn arc_piece(center: &Point2<f64>, radii: &Vector2<f64>, a0: f64, a1: f64) -> PathSegment {
    let k = 4.0 / 3.0 * ((a1 - a0) / 4.0).tan();

    let p0 = ellipse_point(center, radii, a0);
    let p3 = ellipse_point(center, radii, a1);
    let t0 = Vector2::new(-radii.x * a0.sin(), radii.y * a0.cos());
    let t1 = Vector2::new(-radii.x * a1.sin(), radii.y * a1.cos());

    PathSegment::CubicTo(p0 + t0 * k, p3 - t1 * k, p3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rectangle_segments() {
        let segments = Shape::rectangle(20.0, 10.0, 100.0, 80.0).segments();
        assert_eq!(segments.len(), 6);
        assert_eq!(segments[0], PathSegment::MoveTo(Point2::new(20.0, 10.0)));
        assert_eq!(segments[2], PathSegment::LineTo(Point2::new(120.0, 90.0)));
        assert_eq!(segments[5], PathSegment::Close);
    }

    #[test]
    fn test_negative_rectangle_is_empty() {
        assert!(Shape::rectangle(0.0, 0.0, -1.0, 5.0).segments().is_empty());
    }

    #[test]
    fn test_ellipse_quarters_end_on_axes() {
        let segments = Shape::ellipse(-10.0, -5.0, 20.0, 10.0).segments();
        assert_eq!(segments.len(), 6);

        let ends: Vec<_> = segments.iter().filter_map(|s| s.end_point()).collect();
        assert_relative_eq!(ends[0].x, 10.0, epsilon = 1e-12);
        assert_relative_eq!(ends[1].y, 5.0, epsilon = 1e-12);
        assert_relative_eq!(ends[2].x, -10.0, epsilon = 1e-12);
        assert_relative_eq!(ends[3].y, -5.0, epsilon = 1e-12);
        assert_relative_eq!(ends[4].x, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn test_arc_piece_midpoint_on_circle() {
        let center = Point2::origin();
        let radii = Vector2::new(1.0, 1.0);
        let PathSegment::CubicTo(c1, c2, end) = arc_piece(&center, &radii, 0.0, FRAC_PI_2) else {
            panic!("expected cubic");
        };

        // Point at t = 0.5 of the cubic
        let start = Point2::new(1.0, 0.0);
        let mid = (start.coords + c1.coords * 3.0 + c2.coords * 3.0 + end.coords) / 8.0;
        assert_relative_eq!(mid.norm(), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_arc_pie_ends_at_center() {
        let shape = Shape::Arc {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            start: 0.0,
            extent: 180.0,
            kind: ArcKind::Pie,
        };
        let segments = shape.segments();
        // move + 2 cubic pieces + line to center + close
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[3], PathSegment::LineTo(Point2::new(5.0, 5.0)));

        // Positive extent goes below the center in y-up space
        let PathSegment::CubicTo(_, _, end) = segments[1] else {
            panic!("expected cubic");
        };
        assert_relative_eq!(end.x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(end.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_round_rectangle_corners() {
        let shape = Shape::RoundRectangle {
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 6.0,
            arc_width: 2.0,
            arc_height: 2.0,
        };
        let segments = shape.segments();
        assert_eq!(segments.len(), 10);
        assert_eq!(segments[0], PathSegment::MoveTo(Point2::new(1.0, 0.0)));
        assert_eq!(segments.iter().filter(|s| s.is_curve()).count(), 4);
    }

    #[test]
    fn test_winding_rules() {
        assert_eq!(Shape::rectangle(0.0, 0.0, 1.0, 1.0).winding_rule(), WindingRule::NonZero);
        assert_eq!(Shape::Polygon(Vec::new()).winding_rule(), WindingRule::EvenOdd);
        let path = Path2D::with_winding_rule(WindingRule::EvenOdd);
        assert_eq!(Shape::from(path).winding_rule(), WindingRule::EvenOdd);
    }
}
