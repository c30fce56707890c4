// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Floating-point comparison policy
//!
//! Every "almost equal" test in the crate goes through [`Tolerance`]. Two
//! values are almost equal when their difference is within the absolute
//! tolerance, or within the relative tolerance scaled by the larger
//! magnitude. The absolute term handles values near zero; the relative term
//! only takes over for magnitudes above `absolute / relative` (1e6 with the
//! defaults), so a fixed epsilon is never swallowed by the precision of large
//! coordinates.

use nalgebra::Point2;

/// Default absolute tolerance for coordinate comparisons
pub const DEFAULT_ABSOLUTE: f64 = 1e-6;

/// Default relative tolerance for coordinate comparisons
pub const DEFAULT_RELATIVE: f64 = 1e-12;

/// Default collinearity threshold (sine of the smallest significant turn)
pub const DEFAULT_ANGULAR: f64 = 1e-9;

/// Comparison tolerances
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerance {
    /// Absolute tolerance for coordinates
    pub absolute: f64,
    /// Relative tolerance for coordinates (fraction of the larger magnitude)
    pub relative: f64,
    /// Edges whose turn has a sine below this value are collinear
    pub angular: f64,
}

impl Tolerance {
    /// Create a tolerance
    pub const fn new(absolute: f64, relative: f64, angular: f64) -> Self {
        Self {
            absolute,
            relative,
            angular,
        }
    }

    /// Exact comparisons (only bit-identical values are equal)
    pub const fn exact() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Replace the absolute tolerance
    pub fn with_absolute(mut self, absolute: f64) -> Self {
        self.absolute = absolute;
        self
    }

    /// Replace the relative tolerance
    pub fn with_relative(mut self, relative: f64) -> Self {
        self.relative = relative;
        self
    }

    /// Replace the collinearity threshold
    pub fn with_angular(mut self, angular: f64) -> Self {
        self.angular = angular;
        self
    }

    /// Test if two values are almost equal
    #[inline]
    pub fn almost_equal(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        let delta = (a - b).abs();
        delta <= self.absolute || delta <= self.relative * a.abs().max(b.abs())
    }

    /// Test if two points are almost equal (per coordinate)
    #[inline]
    pub fn points_equal(&self, a: &Point2<f64>, b: &Point2<f64>) -> bool {
        self.almost_equal(a.x, b.x) && self.almost_equal(a.y, b.y)
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::new(DEFAULT_ABSOLUTE, DEFAULT_RELATIVE, DEFAULT_ANGULAR)
    }
}
