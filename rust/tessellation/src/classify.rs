// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape classification without building contours
//!
//! Scans a path once and keeps only the last two vertices, the sub-path
//! start and the turn tally. Curve control points are treated as polygon
//! vertices; a curved path is never reported as a triangle or quad.

use crate::angle::{vertex_angle, TurnTally};
use crate::error::{Error, Result};
use crate::path::PathSegment;
use crate::shape::{ArcKind, Shape};
use crate::shape_class::{Orientation, ShapeClass};
use crate::tolerance::Tolerance;
use nalgebra::Point2;
use tracing::trace;

/// Streaming state of the classifier
#[derive(Debug, Clone)]
struct Scan {
    tolerance: Tolerance,
    segments: usize,
    curved: bool,
    multiple_sub_paths: bool,
    /// A sub-path with segments has been closed
    closed: bool,
    tally: TurnTally,
    start: Option<Point2<f64>>,
    current: Point2<f64>,
    previous: Option<Point2<f64>>,
    /// First vertex after the sub-path start
    first: Option<Point2<f64>>,
}

impl Scan {
    fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            segments: 0,
            curved: false,
            multiple_sub_paths: false,
            closed: false,
            tally: TurnTally::default(),
            start: None,
            current: Point2::origin(),
            previous: None,
            first: None,
        }
    }

    fn move_to(&mut self, p: Point2<f64>) {
        self.multiple_sub_paths = self.segments > 0;
        self.start = Some(p);
        self.current = p;
        self.previous = None;
        self.first = None;
    }

    fn vertex(&mut self, next: Point2<f64>) -> Result<()> {
        if self.start.is_none() {
            return Err(Error::MissingMoveTo);
        }
        if self.tolerance.points_equal(&self.current, &next) {
            return Ok(());
        }
        if self.closed {
            // Drawing on after a close starts a second sub-path at the start point
            self.multiple_sub_paths = true;
            return Ok(());
        }

        if let Some(previous) = self.previous {
            self.tally
                .record(vertex_angle(&previous, &self.current, &next, &self.tolerance));
        }
        if self.first.is_none() {
            self.first = Some(next);
        }
        self.previous = Some(self.current);
        self.current = next;
        self.segments += 1;
        Ok(())
    }

    fn close(&mut self) {
        let Some(start) = self.start else {
            return;
        };

        if !self.tolerance.points_equal(&self.current, &start) {
            if let Some(previous) = self.previous {
                self.tally
                    .record(vertex_angle(&previous, &self.current, &start, &self.tolerance));
            }
            self.previous = Some(self.current);
            self.current = start;
            self.segments += 1;
        }

        if let (Some(previous), Some(first)) = (self.previous, self.first) {
            self.tally
                .record(vertex_angle(&previous, &start, &first, &self.tolerance));
        }

        self.previous = None;
        self.first = None;
        self.closed = self.segments > 0;
    }

    fn result(&self) -> ShapeClass {
        if self.segments == 0 {
            return ShapeClass::Void;
        }
        if self.multiple_sub_paths {
            return ShapeClass::Complex;
        }
        if self.segments == 1 {
            return ShapeClass::LineSegment;
        }

        let closed = self
            .start
            .is_some_and(|start| self.tolerance.points_equal(&self.current, &start));
        if !closed {
            return ShapeClass::OpenPath;
        }

        ShapeClass::closed(self.tally.orientation(), self.segments, self.curved, &self.tally)
    }
}

/// Classify a path from its segments
///
/// The path does not need to be flattened. Scanning stops at the second
/// sub-path, which makes the result [`ShapeClass::Complex`].
pub fn classify_path<I>(segments: I, tolerance: &Tolerance) -> Result<ShapeClass>
where
    I: IntoIterator<Item = PathSegment>,
{
    let mut scan = Scan::new(*tolerance);

    for segment in segments {
        match segment {
            PathSegment::MoveTo(p) => scan.move_to(p),
            PathSegment::LineTo(p) => scan.vertex(p)?,
            PathSegment::QuadTo(c, p) => {
                scan.curved = true;
                scan.vertex(c)?;
                scan.vertex(p)?;
            }
            PathSegment::CubicTo(c1, c2, p) => {
                scan.curved = true;
                scan.vertex(c1)?;
                scan.vertex(c2)?;
                scan.vertex(p)?;
            }
            PathSegment::Close => scan.close(),
        }
        if scan.multiple_sub_paths {
            break;
        }
    }

    let result = scan.result();
    trace!(shape_class = %result, segments = scan.segments, curved = scan.curved, "Classified path");
    Ok(result)
}

/// Classify a shape
///
/// Rectangles, lines, arcs, ellipses and round rectangles are classified from
/// their parameters; everything else is scanned.
pub fn classify_shape(shape: &Shape, tolerance: &Tolerance) -> Result<ShapeClass> {
    let result = match shape {
        Shape::Rectangle { width, height, .. } => {
            if *width <= 0.0 || *height <= 0.0 {
                ShapeClass::Void
            } else {
                ShapeClass::Quad(Orientation::CounterClockwise)
            }
        }
        Shape::Line { from, to } => {
            if tolerance.points_equal(from, to) {
                ShapeClass::Void
            } else {
                ShapeClass::LineSegment
            }
        }
        Shape::Arc {
            width,
            height,
            extent,
            kind,
            ..
        } => {
            if *width <= 0.0 || *height <= 0.0 {
                ShapeClass::Void
            } else if *kind == ArcKind::Open {
                ShapeClass::OpenPath
            } else if *extent > 0.0 {
                ShapeClass::Convex(Orientation::Clockwise)
            } else {
                ShapeClass::Convex(Orientation::CounterClockwise)
            }
        }
        Shape::Ellipse { width, height, .. } | Shape::RoundRectangle { width, height, .. } => {
            if *width <= 0.0 || *height <= 0.0 {
                ShapeClass::Void
            } else {
                ShapeClass::Convex(Orientation::CounterClockwise)
            }
        }
        _ => classify_path(shape.iter(), tolerance)?,
    };
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::Path2D;
    use Orientation::*;

    fn classify(path: &Path2D) -> ShapeClass {
        classify_path(path.iter(), &Tolerance::default()).unwrap()
    }

    fn polygon(points: &[(f64, f64)]) -> Path2D {
        let points: Vec<_> = points.iter().map(|&(x, y)| Point2::new(x, y)).collect();
        Path2D::from_polygon(&points)
    }

    #[test]
    fn test_empty_and_degenerate() {
        assert_eq!(classify(&Path2D::new()), ShapeClass::Void);

        let mut point = Path2D::new();
        point.move_to(10.0, 10.0).close();
        assert_eq!(classify(&point), ShapeClass::Void);

        let mut line = Path2D::new();
        line.move_to(0.0, 0.0).line_to(0.0, 0.0).line_to(5.0, 5.0);
        assert_eq!(classify(&line), ShapeClass::LineSegment);
    }

    #[test]
    fn test_open_path() {
        let mut path = Path2D::new();
        path.move_to(0.0, 0.0).line_to(5.0, 0.0).line_to(5.0, 5.0);
        assert_eq!(classify(&path), ShapeClass::OpenPath);
    }

    #[test]
    fn test_polygons() {
        assert_eq!(
            classify(&polygon(&[(0.0, 0.0), (10.0, 0.0), (5.0, 8.66)])),
            ShapeClass::Triangle(CounterClockwise)
        );
        assert_eq!(
            classify(&polygon(&[(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (10.0, 0.0)])),
            ShapeClass::Quad(Clockwise)
        );
        assert_eq!(
            classify(&polygon(&[(0.0, 0.0), (4.0, 0.0), (6.0, 3.0), (2.0, 6.0), (-2.0, 3.0)])),
            ShapeClass::Convex(CounterClockwise)
        );
        assert_eq!(
            classify(&polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (5.0, 3.0), (0.0, 10.0)])),
            ShapeClass::Concave(CounterClockwise)
        );
    }

    #[test]
    fn test_explicitly_closed_polygon() {
        let mut path = Path2D::new();
        path.move_to(0.0, 0.0)
            .line_to(10.0, 0.0)
            .line_to(10.0, 10.0)
            .line_to(0.0, 0.0)
            .close();
        assert_eq!(classify(&path), ShapeClass::Triangle(CounterClockwise));
    }

    #[test]
    fn test_multiple_sub_paths_are_complex() {
        let mut path = polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        path.extend(polygon(&[(5.0, 0.0), (6.0, 0.0), (6.0, 1.0), (5.0, 1.0)]).iter());
        assert_eq!(classify(&path), ShapeClass::Complex);
    }

    #[test]
    fn test_line_after_close_is_complex() {
        let mut path = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        path.line_to(-10.0, 0.0).line_to(-10.0, -10.0).close();
        assert_eq!(classify(&path), ShapeClass::Complex);

        // Returning to the start point draws nothing new
        let mut path = polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        path.line_to(0.0, 0.0).close();
        assert_eq!(classify(&path), ShapeClass::Quad(CounterClockwise));
    }

    #[test]
    fn test_repeated_move_is_not_complex() {
        let mut path = Path2D::new();
        path.move_to(100.0, 100.0);
        path.extend(polygon(&[(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)]).iter());
        assert_eq!(classify(&path), ShapeClass::Triangle(CounterClockwise));
    }

    #[test]
    fn test_curved_triangle_is_convex() {
        let mut path = Path2D::new();
        path.move_to(0.0, 0.0).quad_to(5.0, -2.0, 10.0, 0.0).close();
        // Control point acts as a vertex: three vertices, but curved
        assert_eq!(classify(&path), ShapeClass::Convex(CounterClockwise));
    }

    #[test]
    fn test_line_before_move_is_error() {
        let mut path = Path2D::new();
        path.line_to(1.0, 0.0);
        assert_eq!(
            classify_path(path.iter(), &Tolerance::default()),
            Err(Error::MissingMoveTo)
        );
    }

    #[test]
    fn test_known_shape_fast_paths() {
        let tol = Tolerance::default();
        let classify = |shape: Shape| classify_shape(&shape, &tol).unwrap();

        assert_eq!(classify(Shape::rectangle(20.0, 10.0, 100.0, 80.0)), ShapeClass::Quad(CounterClockwise));
        assert_eq!(classify(Shape::rectangle(20.0, 10.0, 0.0, 0.0)), ShapeClass::Void);
        assert_eq!(classify(Shape::rectangle(20.0, 10.0, 0.0, -80.0)), ShapeClass::Void);
        assert_eq!(classify(Shape::line(20.0, 10.0, 100.0, 80.0)), ShapeClass::LineSegment);
        assert_eq!(classify(Shape::line(20.0, 10.0, 20.0, 10.0)), ShapeClass::Void);
        assert_eq!(classify(Shape::ellipse(20.0, 10.0, 100.0, 80.0)), ShapeClass::Convex(CounterClockwise));
        assert_eq!(classify(Shape::ellipse(20.0, 10.0, -100.0, 0.0)), ShapeClass::Void);

        let arc = |extent: f64, kind: ArcKind| Shape::Arc {
            x: 20.0,
            y: 10.0,
            width: 100.0,
            height: 80.0,
            start: 45.0,
            extent,
            kind,
        };
        assert_eq!(classify(arc(-90.0, ArcKind::Open)), ShapeClass::OpenPath);
        assert_eq!(classify(arc(-90.0, ArcKind::Pie)), ShapeClass::Convex(CounterClockwise));
        assert_eq!(classify(arc(90.0, ArcKind::Chord)), ShapeClass::Convex(Clockwise));
        assert_eq!(classify(arc(0.0, ArcKind::Pie)), ShapeClass::Convex(CounterClockwise));
    }

    #[test]
    fn test_fast_paths_agree_with_scan() {
        let tol = Tolerance::default();
        let shapes = [
            Shape::rectangle(-10.0, -5.0, 20.0, 10.0),
            Shape::ellipse(20.0, 10.0, 100.0, 80.0),
            Shape::Arc {
                x: 20.0,
                y: 10.0,
                width: 100.0,
                height: 80.0,
                start: -45.0,
                extent: 90.0,
                kind: ArcKind::Pie,
            },
            Shape::Arc {
                x: 20.0,
                y: 10.0,
                width: 100.0,
                height: 80.0,
                start: 45.0,
                extent: -90.0,
                kind: ArcKind::Chord,
            },
        ];

        for shape in &shapes {
            let fast = classify_shape(shape, &tol).unwrap();
            let scanned = classify_path(shape.iter(), &tol).unwrap();
            assert_eq!(fast, scanned, "shape {:?}", shape);
        }
    }
}
