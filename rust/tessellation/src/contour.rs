// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Contours built from flattened paths
//!
//! A contour is a single path whose segments are defined by a list of
//! points. Closed contours are implicitly connected from the last point back
//! to the first; the closing point is never stored twice.

use crate::angle::{closed_angles, open_angles, TurnTally};
use crate::error::{Error, Result};
use crate::flatten::{contains_curves, flatten};
use crate::path::PathSegment;
use crate::shape::Shape;
use crate::shape_class::{Orientation, ShapeClass};
use crate::tolerance::Tolerance;
use nalgebra::Point2;
use tracing::{debug, trace};

/// Point on a contour with the turn angle between its two edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourPoint {
    pub position: Point2<f64>,
    /// Signed turn angle in radians (0 at the ends of open paths)
    pub angle: f64,
}

/// A classified contour
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    shape_class: ShapeClass,
    points: Vec<ContourPoint>,
}

impl Contour {
    fn new(shape_class: ShapeClass, positions: Vec<Point2<f64>>, angles: Vec<f64>) -> Self {
        let points = positions
            .into_iter()
            .zip(angles)
            .map(|(position, angle)| ContourPoint { position, angle })
            .collect();
        Self {
            shape_class,
            points,
        }
    }

    /// Shape class of this contour
    pub fn shape_class(&self) -> ShapeClass {
        self.shape_class
    }

    /// Points that define the contour
    pub fn points(&self) -> &[ContourPoint] {
        &self.points
    }

    /// Point positions only
    pub fn positions(&self) -> Vec<Point2<f64>> {
        self.points.iter().map(|p| p.position).collect()
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the contour has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Check if the contour is closed
    pub fn is_closed(&self) -> bool {
        self.shape_class.is_closed()
    }

    /// Vertex order of a closed contour
    pub fn orientation(&self) -> Option<Orientation> {
        self.shape_class.orientation()
    }

    /// Sum of the turn angles (±2π for simple closed contours)
    pub fn total_angle(&self) -> f64 {
        self.points.iter().map(|p| p.angle).sum()
    }

    /// Signed area enclosed by the contour (positive if counter-clockwise)
    pub fn signed_area(&self) -> f64 {
        if !self.is_closed() {
            return 0.0;
        }
        let n = self.points.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = &self.points[i].position;
                let b = &self.points[(i + 1) % n].position;
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice * 0.5
    }
}

/// Options for building contours
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContourOptions {
    /// Reverse clockwise contours so that all closed contours are counter-clockwise
    pub counter_clockwise: bool,
    /// Also return open paths (as line segments or open paths)
    pub keep_open_paths: bool,
    /// Point comparison tolerance
    pub tolerance: Tolerance,
}

impl ContourOptions {
    /// Default options (closed contours only, original orientation)
    pub fn new() -> Self {
        Self::default()
    }

    /// Force counter-clockwise contours
    pub fn counter_clockwise(mut self, counter_clockwise: bool) -> Self {
        self.counter_clockwise = counter_clockwise;
        self
    }

    /// Keep open paths
    pub fn keep_open_paths(mut self, keep_open_paths: bool) -> Self {
        self.keep_open_paths = keep_open_paths;
        self
    }

    /// Replace the tolerance
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Sub-path finished by [`SubPathAccumulator`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SubPath {
    /// Closed polygon with at least 3 points, closing point removed
    Closed(Vec<Point2<f64>>),
    /// Unclosed polyline with at least 2 points
    Open(Vec<Point2<f64>>),
}

/// Collects the points of flattened sub-paths
///
/// Consecutive points that are almost equal are merged, so zero-length edges
/// never reach angle computation.
#[derive(Debug, Clone)]
pub(crate) struct SubPathAccumulator {
    tolerance: Tolerance,
    points: Vec<Point2<f64>>,
    start: Option<Point2<f64>>,
}

impl SubPathAccumulator {
    pub(crate) fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            points: Vec::new(),
            start: None,
        }
    }

    /// Feed one segment; returns a sub-path when one is finished
    pub(crate) fn push(&mut self, segment: PathSegment) -> Result<Option<SubPath>> {
        match segment {
            PathSegment::MoveTo(p) => {
                let finished = self.take_open();
                self.points.clear();
                self.points.push(p);
                self.start = Some(p);
                Ok(finished)
            }
            PathSegment::LineTo(p) => {
                match self.points.last() {
                    None => {
                        // Continue from the start of the sub-path closed last
                        let start = self.start.ok_or(Error::MissingMoveTo)?;
                        self.points.push(start);
                        if !self.tolerance.points_equal(&start, &p) {
                            self.points.push(p);
                        }
                    }
                    Some(last) => {
                        if !self.tolerance.points_equal(last, &p) {
                            self.points.push(p);
                        }
                    }
                }
                Ok(None)
            }
            PathSegment::Close => Ok(self.close()),
            PathSegment::QuadTo(..) | PathSegment::CubicTo(..) => Err(Error::UnflattenedCurve),
        }
    }

    /// End of input; returns a trailing open sub-path
    pub(crate) fn finish(&mut self) -> Option<SubPath> {
        let finished = self.take_open();
        self.points.clear();
        finished
    }

    fn take_open(&mut self) -> Option<SubPath> {
        if self.points.len() >= 2 {
            Some(SubPath::Open(std::mem::take(&mut self.points)))
        } else {
            None
        }
    }

    fn close(&mut self) -> Option<SubPath> {
        let mut points = std::mem::take(&mut self.points);
        if points.len() <= 2 {
            return None;
        }

        if self.tolerance.points_equal(&points[0], &points[points.len() - 1]) {
            points.pop();
        }

        (points.len() > 2).then_some(SubPath::Closed(points))
    }
}

/// Build contours from a flattened segment sequence
///
/// Closed sub-paths with fewer than 3 distinct points produce no contour.
/// Curves must have been flattened before; a curve segment is an error.
pub fn build_contours<I>(segments: I, options: &ContourOptions) -> Result<Vec<Contour>>
where
    I: IntoIterator<Item = PathSegment>,
{
    let mut contours = Vec::new();
    let mut accumulator = SubPathAccumulator::new(options.tolerance);

    for segment in segments {
        if let Some(sub_path) = accumulator.push(segment)? {
            add_sub_path(&mut contours, sub_path, options);
        }
    }
    if let Some(sub_path) = accumulator.finish() {
        add_sub_path(&mut contours, sub_path, options);
    }

    debug!(
        contours = contours.len(),
        counter_clockwise = options.counter_clockwise,
        keep_open_paths = options.keep_open_paths,
        "Built contours"
    );

    Ok(contours)
}

/// Build contours from a shape, flattening curves with the given flatness
///
/// The flatness is only checked when the shape contains curves.
pub fn create_contours(shape: &Shape, flatness: f64, options: &ContourOptions) -> Result<Vec<Contour>> {
    if contains_curves(shape) {
        build_contours(flatten(shape.iter(), flatness)?, options)
    } else {
        build_contours(shape.iter(), options)
    }
}

fn add_sub_path(contours: &mut Vec<Contour>, sub_path: SubPath, options: &ContourOptions) {
    let contour = match sub_path {
        SubPath::Open(points) => {
            if !options.keep_open_paths {
                return;
            }
            let angles = open_angles(&points, &options.tolerance);
            Contour::new(ShapeClass::open(points.len()), points, angles)
        }
        SubPath::Closed(mut points) => {
            let mut angles = closed_angles(&points, &options.tolerance);
            let mut tally = TurnTally::from_angles(&angles);

            if options.counter_clockwise && tally.orientation() == Orientation::Clockwise {
                points.reverse();
                angles.reverse();
                angles.iter_mut().for_each(|a| *a = -*a);
                tally = tally.reversed();
            }

            let shape_class = ShapeClass::closed(tally.orientation(), points.len(), false, &tally);
            Contour::new(shape_class, points, angles)
        }
    };

    trace!(
        shape_class = %contour.shape_class(),
        points = contour.len(),
        total_angle = contour.total_angle(),
        "Contour"
    );
    contours.push(contour);
}
