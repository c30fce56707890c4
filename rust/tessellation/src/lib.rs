// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape Tessellation
//!
//! Classification and tessellation of 2D shapes. Paths are flattened into
//! polygons, split into classified contours, and resolved under a winding
//! rule into triangulated regions using i_overlay and earcutr. Tessellations
//! can be extruded into 3D meshes.

pub mod angle;
pub mod classify;
pub mod contour;
pub mod error;
pub mod extrusion;
pub mod flatten;
pub mod mesh;
pub mod path;
pub mod shape;
pub mod shape_class;
pub mod tessellation;
pub mod tessellator;
pub mod tolerance;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

pub use classify::{classify_path, classify_shape};
pub use contour::{build_contours, create_contours, Contour, ContourOptions, ContourPoint};
pub use error::{Error, Result};
pub use extrusion::{extrude_tessellation, ExtrudedMesh};
pub use flatten::{contains_curves, flatten, Flatten};
pub use mesh::Mesh;
pub use path::{Path2D, PathSegment, WindingRule};
pub use shape::{ArcKind, Shape};
pub use shape_class::{Orientation, ShapeClass};
pub use tessellation::{Region, Tessellation, TessellationPrimitive};
pub use tessellator::{
    create_tessellator, create_tessellator_from_path, tessellate_all, Tessellator, TessellatorOptions,
};
pub use tolerance::Tolerance;
