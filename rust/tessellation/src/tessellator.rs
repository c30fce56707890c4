// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape tessellation entry points

use crate::contour::{SubPath, SubPathAccumulator};
use crate::error::Result;
use crate::flatten::{contains_curves, flatten, segments_contain_curves};
use crate::mesh::Mesh;
use crate::path::{PathSegment, WindingRule};
use crate::shape::Shape;
use crate::tessellation::Tessellation;
use crate::tolerance::Tolerance;
use rayon::prelude::*;
use tracing::warn;

/// Default maximum distance between a curve and its flattened polyline
pub const DEFAULT_FLATNESS: f64 = 0.25;

/// Tessellate a shape with its own winding rule
///
/// Only closed sub-paths contribute area. The flatness is only checked when
/// the shape contains curves.
pub fn create_tessellator(shape: &Shape, flatness: f64) -> Result<Tessellation> {
    tessellate_shape(shape, flatness, &Tolerance::default())
}

/// Tessellate raw path segments under the given winding rule
pub fn create_tessellator_from_path<I>(segments: I, winding_rule: WindingRule, flatness: f64) -> Result<Tessellation>
where
    I: IntoIterator<Item = PathSegment>,
{
    let segments: Vec<PathSegment> = segments.into_iter().collect();
    let mesh = Mesh::new(winding_rule);
    if segments_contain_curves(segments.iter().copied()) {
        fill_mesh(mesh, flatten(segments, flatness)?)
    } else {
        fill_mesh(mesh, segments)
    }
}

fn tessellate_shape(shape: &Shape, flatness: f64, tolerance: &Tolerance) -> Result<Tessellation> {
    let mesh = Mesh::with_tolerance(shape.winding_rule(), *tolerance);
    if contains_curves(shape) {
        fill_mesh(mesh, flatten(shape.iter(), flatness)?)
    } else {
        fill_mesh(mesh, shape.iter())
    }
}

/// Feed every closed sub-path of a flattened segment stream into the mesh
fn fill_mesh<I>(mut mesh: Mesh, segments: I) -> Result<Tessellation>
where
    I: IntoIterator<Item = PathSegment>,
{
    let mut accumulator = SubPathAccumulator::new(mesh.tolerance());

    for segment in segments {
        if let Some(SubPath::Closed(points)) = accumulator.push(segment)? {
            mesh.begin_contour()?;
            for p in &points {
                mesh.add_vertex(p.x, p.y)?;
            }
            mesh.end_contour()?;
        }
    }

    mesh.finish()
}

/// Tessellator configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TessellatorOptions {
    /// Maximum distance between a curve and its polyline
    pub flatness: f64,
    /// Tolerance for merging vertices
    pub tolerance: Tolerance,
}

impl Default for TessellatorOptions {
    fn default() -> Self {
        Self {
            flatness: DEFAULT_FLATNESS,
            tolerance: Tolerance::default(),
        }
    }
}

impl TessellatorOptions {
    pub fn with_flatness(mut self, flatness: f64) -> Self {
        self.flatness = flatness;
        self
    }

    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// Reusable tessellator with fixed options
#[derive(Debug, Clone, Copy, Default)]
pub struct Tessellator {
    options: TessellatorOptions,
}

impl Tessellator {
    pub fn new(options: TessellatorOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &TessellatorOptions {
        &self.options
    }

    /// Tessellate a single shape
    pub fn tessellate(&self, shape: &Shape) -> Result<Tessellation> {
        tessellate_shape(shape, self.options.flatness, &self.options.tolerance)
    }
}

/// Tessellate many shapes in parallel
///
/// Results keep the input order. A failing shape does not affect the others.
pub fn tessellate_all(shapes: &[Shape], options: &TessellatorOptions) -> Vec<Result<Tessellation>> {
    let tessellator = Tessellator::new(*options);
    shapes
        .par_iter()
        .enumerate()
        .map(|(index, shape)| {
            let result = tessellator.tessellate(shape);
            if let Err(e) = &result {
                warn!(index, error = %e, "Failed to tessellate shape");
            }
            result
        })
        .collect()
}
