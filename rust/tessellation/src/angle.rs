// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Turn angles between consecutive path edges
//!
//! A positive angle is a left (counter-clockwise) turn in a y-up frame. For a
//! simple closed polygon the turn angles sum to `2π` when it is traced
//! counter-clockwise and to `-2π` when traced clockwise.

use crate::shape_class::Orientation;
use crate::tolerance::Tolerance;
use nalgebra::{Point2, Vector2};

/// Signed angle from the incoming to the outgoing edge
///
/// Zero-length edges and collinear edges (including exact reversals) give
/// `0.0`, so neither contributes a turn direction.
#[inline]
pub fn turn_angle(incoming: &Vector2<f64>, outgoing: &Vector2<f64>, tolerance: &Tolerance) -> f64 {
    let cross = incoming.perp(outgoing);
    let scale = incoming.norm() * outgoing.norm();
    if scale == 0.0 || cross.abs() <= tolerance.angular * scale {
        return 0.0;
    }
    cross.atan2(incoming.dot(outgoing))
}

/// Turn angle at `current` on the way from `previous` to `next`
#[inline]
pub fn vertex_angle(
    previous: &Point2<f64>,
    current: &Point2<f64>,
    next: &Point2<f64>,
    tolerance: &Tolerance,
) -> f64 {
    turn_angle(&(current - previous), &(next - current), tolerance)
}

/// Turn angles at every vertex of a closed polygon
pub fn closed_angles(points: &[Point2<f64>], tolerance: &Tolerance) -> Vec<f64> {
    let n = points.len();
    (0..n)
        .map(|i| vertex_angle(&points[(i + n - 1) % n], &points[i], &points[(i + 1) % n], tolerance))
        .collect()
}

/// Turn angles of an open polyline (endpoints have no turn)
pub fn open_angles(points: &[Point2<f64>], tolerance: &Tolerance) -> Vec<f64> {
    let n = points.len();
    (0..n)
        .map(|i| {
            if i == 0 || i + 1 == n {
                0.0
            } else {
                vertex_angle(&points[i - 1], &points[i], &points[i + 1], tolerance)
            }
        })
        .collect()
}

/// Running summary of turn angles
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TurnTally {
    /// Encountered a left turn
    pub positive: bool,
    /// Encountered a right turn
    pub negative: bool,
    /// Sum of all turn angles
    pub total: f64,
}

impl TurnTally {
    /// Tally a sequence of angles
    pub fn from_angles<'a, I>(angles: I) -> Self
    where
        I: IntoIterator<Item = &'a f64>,
    {
        let mut tally = Self::default();
        for &angle in angles {
            tally.record(angle);
        }
        tally
    }

    /// Add one turn angle
    #[inline]
    pub fn record(&mut self, angle: f64) {
        self.positive |= angle > 0.0;
        self.negative |= angle < 0.0;
        self.total += angle;
    }

    /// Both left and right turns were seen
    #[inline]
    pub fn is_concave(&self) -> bool {
        self.positive && self.negative
    }

    /// Counter-clockwise iff the total turn is not negative
    #[inline]
    pub fn orientation(&self) -> Orientation {
        Orientation::from_total_angle(self.total)
    }

    /// Tally of the same polygon traced backwards
    pub fn reversed(&self) -> Self {
        Self {
            positive: self.negative,
            negative: self.positive,
            total: -self.total,
        }
    }
}
