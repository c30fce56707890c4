// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for tessellation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during contour building and tessellation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid flatness: {0} (must be finite and positive)")]
    InvalidFlatness(f64),

    #[error("Invalid coordinate: ({0}, {1})")]
    InvalidCoordinate(f64, f64),

    #[error("Unknown path segment type: {0}")]
    UnknownSegment(i32),

    #[error("Unknown winding rule: {0}")]
    UnknownWindingRule(i32),

    #[error("Line segment before move encountered")]
    MissingMoveTo,

    #[error("Curve segment in flattened path")]
    UnflattenedCurve,

    #[error("Vertex added outside of a contour")]
    ContourNotStarted,

    #[error("Contour started before the previous one ended")]
    ContourAlreadyStarted,

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Invalid extrusion parameters: {0}")]
    InvalidExtrusion(String),
}
