// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape classes

use crate::angle::TurnTally;
use std::fmt;

/// Vertex order of a closed shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    Clockwise,
    CounterClockwise,
}

impl Orientation {
    /// Orientation implied by an accumulated turning angle
    #[inline]
    pub fn from_total_angle(total: f64) -> Self {
        if total >= 0.0 {
            Self::CounterClockwise
        } else {
            Self::Clockwise
        }
    }

    /// The opposite orientation
    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Clockwise => "CW",
            Self::CounterClockwise => "CCW",
        }
    }
}

/// Classification of a shape or contour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeClass {
    /// Nothingness
    Void,
    /// Single line segment
    LineSegment,
    /// Path that does not return to its start
    OpenPath,
    /// Closed shape with three vertices
    Triangle(Orientation),
    /// Closed shape with four vertices
    Quad(Orientation),
    /// Convex closed shape
    Convex(Orientation),
    /// Closed shape with both left and right turns
    Concave(Orientation),
    /// Multiple sub-paths (possibly self-intersecting)
    Complex,
}

impl ShapeClass {
    /// Classify a closed polygon from its vertex count and turn angles
    ///
    /// Curved shapes are never reported as triangles or quads, since their
    /// vertices come from flattening rather than from straight sides.
    pub fn closed(orientation: Orientation, vertex_count: usize, curved: bool, tally: &TurnTally) -> Self {
        if tally.is_concave() {
            Self::Concave(orientation)
        } else if !curved && vertex_count == 3 {
            Self::Triangle(orientation)
        } else if !curved && vertex_count == 4 {
            Self::Quad(orientation)
        } else {
            Self::Convex(orientation)
        }
    }

    /// Class of an open path with the given number of points
    pub fn open(point_count: usize) -> Self {
        match point_count {
            0 | 1 => Self::Void,
            2 => Self::LineSegment,
            _ => Self::OpenPath,
        }
    }

    /// Vertex order, if this is a simple closed shape
    pub fn orientation(&self) -> Option<Orientation> {
        match *self {
            Self::Triangle(o) | Self::Quad(o) | Self::Convex(o) | Self::Concave(o) => Some(o),
            Self::Void | Self::LineSegment | Self::OpenPath | Self::Complex => None,
        }
    }

    /// Test if this shape has clockwise vertex order
    pub fn is_clockwise(&self) -> bool {
        self.orientation() == Some(Orientation::Clockwise)
    }

    /// Test if this shape has counter-clockwise vertex order
    pub fn is_counter_clockwise(&self) -> bool {
        self.orientation() == Some(Orientation::CounterClockwise)
    }

    /// Test if this is a simple closed shape
    pub fn is_closed(&self) -> bool {
        self.orientation().is_some()
    }

    /// Same class with the opposite vertex order
    pub fn reversed(self) -> Self {
        match self {
            Self::Triangle(o) => Self::Triangle(o.reversed()),
            Self::Quad(o) => Self::Quad(o.reversed()),
            Self::Convex(o) => Self::Convex(o.reversed()),
            Self::Concave(o) => Self::Concave(o.reversed()),
            other => other,
        }
    }
}

impl fmt::Display for ShapeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => f.write_str("VOID"),
            Self::LineSegment => f.write_str("LINE_SEGMENT"),
            Self::OpenPath => f.write_str("OPEN_PATH"),
            Self::Triangle(o) => write!(f, "{}_TRIANGLE", o.prefix()),
            Self::Quad(o) => write!(f, "{}_QUAD", o.prefix()),
            Self::Convex(o) => write!(f, "{}_CONVEX", o.prefix()),
            Self::Concave(o) => write!(f, "{}_CONCAVE", o.prefix()),
            Self::Complex => f.write_str("COMPLEX"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Orientation::*;

    #[test]
    fn test_display_names() {
        assert_eq!(ShapeClass::Quad(CounterClockwise).to_string(), "CCW_QUAD");
        assert_eq!(ShapeClass::Concave(Clockwise).to_string(), "CW_CONCAVE");
        assert_eq!(ShapeClass::Void.to_string(), "VOID");
        assert_eq!(ShapeClass::LineSegment.to_string(), "LINE_SEGMENT");
    }

    #[test]
    fn test_orientation_queries() {
        assert!(ShapeClass::Triangle(Clockwise).is_clockwise());
        assert!(!ShapeClass::Triangle(Clockwise).is_counter_clockwise());
        assert!(!ShapeClass::Complex.is_clockwise());
        assert!(!ShapeClass::OpenPath.is_counter_clockwise());
        assert_eq!(
            ShapeClass::Convex(Clockwise).reversed(),
            ShapeClass::Convex(CounterClockwise)
        );
        assert_eq!(ShapeClass::Complex.reversed(), ShapeClass::Complex);
    }

    #[test]
    fn test_closed_classification() {
        let mut convex = TurnTally::default();
        convex.record(1.0);
        convex.record(2.0);

        assert_eq!(ShapeClass::closed(CounterClockwise, 3, false, &convex), ShapeClass::Triangle(CounterClockwise));
        assert_eq!(ShapeClass::closed(CounterClockwise, 4, false, &convex), ShapeClass::Quad(CounterClockwise));
        assert_eq!(ShapeClass::closed(CounterClockwise, 4, true, &convex), ShapeClass::Convex(CounterClockwise));
        assert_eq!(ShapeClass::closed(Clockwise, 7, false, &convex), ShapeClass::Convex(Clockwise));

        let mut concave = convex;
        concave.record(-0.5);
        assert_eq!(ShapeClass::closed(Clockwise, 3, false, &concave), ShapeClass::Concave(Clockwise));
    }

    #[test]
    fn test_open_classification() {
        assert_eq!(ShapeClass::open(1), ShapeClass::Void);
        assert_eq!(ShapeClass::open(2), ShapeClass::LineSegment);
        assert_eq!(ShapeClass::open(5), ShapeClass::OpenPath);
    }
}
