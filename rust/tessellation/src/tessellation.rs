// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tessellation results
//!
//! A tessellation is a shared vertex list plus a set of disjoint filled
//! regions. Every region keeps its boundary (one outer loop and any number of
//! holes) and its triangles, all as indices into the vertex list. Stored
//! outer loops and triangles are counter-clockwise, holes are clockwise.

use crate::shape_class::Orientation;
use nalgebra::Point2;

/// Filled region of a tessellation
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub(crate) outer: Vec<u32>,
    pub(crate) holes: Vec<Vec<u32>>,
    pub(crate) triangles: Vec<[u32; 3]>,
    /// Hole-free with a strictly convex outer loop
    pub(crate) convex: bool,
}

impl Region {
    /// Outer boundary (counter-clockwise)
    pub fn outer(&self) -> &[u32] {
        &self.outer
    }

    /// Hole boundaries (clockwise)
    pub fn holes(&self) -> &[Vec<u32>] {
        &self.holes
    }

    /// Counter-clockwise triangles
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Check if the region has no holes and a strictly convex boundary
    pub fn is_convex(&self) -> bool {
        self.convex
    }

    fn primitive(&self, orientation: Orientation) -> TessellationPrimitive {
        let ccw = orientation == Orientation::CounterClockwise;

        if self.convex && self.outer.len() == 4 {
            let [a, b, c, d] = [self.outer[0], self.outer[1], self.outer[2], self.outer[3]];
            return if ccw {
                TessellationPrimitive::TriangleStrip(vec![a, b, d, c])
            } else {
                TessellationPrimitive::TriangleStrip(vec![a, d, b, c])
            };
        }

        if self.convex {
            let mut fan = self.outer.clone();
            if !ccw {
                // Keep the hub, walk the rim backwards
                fan[1..].reverse();
            }
            return TessellationPrimitive::TriangleFan(fan);
        }

        let indices = self
            .triangles
            .iter()
            .flat_map(|&[a, b, c]| if ccw { [a, b, c] } else { [a, c, b] })
            .collect();
        TessellationPrimitive::Triangles(indices)
    }
}

/// Renderable primitive made of vertex indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TessellationPrimitive {
    /// Independent triangles, three indices each
    Triangles(Vec<u32>),
    /// Triangles sharing the first vertex
    TriangleFan(Vec<u32>),
    /// Triangles sharing an edge with their predecessor
    TriangleStrip(Vec<u32>),
}

impl TessellationPrimitive {
    /// Raw vertex indices
    pub fn indices(&self) -> &[u32] {
        match self {
            Self::Triangles(indices) | Self::TriangleFan(indices) | Self::TriangleStrip(indices) => indices,
        }
    }

    /// Number of indices
    pub fn vertex_count(&self) -> usize {
        self.indices().len()
    }

    /// Number of triangles described
    pub fn triangle_count(&self) -> usize {
        match self {
            Self::Triangles(indices) => indices.len() / 3,
            Self::TriangleFan(indices) | Self::TriangleStrip(indices) => indices.len().saturating_sub(2),
        }
    }

    /// Expand into independent triangles with the primitive's winding
    pub fn triangles(&self) -> Vec<[u32; 3]> {
        match self {
            Self::Triangles(indices) => indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]]).collect(),
            Self::TriangleFan(indices) => indices
                .windows(2)
                .skip(1)
                .map(|w| [indices[0], w[0], w[1]])
                .collect(),
            Self::TriangleStrip(indices) => indices
                .windows(3)
                .enumerate()
                .map(|(i, w)| {
                    // Odd triangles swap their first two vertices to keep winding
                    if i % 2 == 0 {
                        [w[0], w[1], w[2]]
                    } else {
                        [w[1], w[0], w[2]]
                    }
                })
                .collect(),
        }
    }
}

/// Result of tessellating a set of contours
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tessellation {
    pub(crate) vertices: Vec<Point2<f64>>,
    pub(crate) regions: Vec<Region>,
}

impl Tessellation {
    /// Create an empty tessellation
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared vertex list
    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    /// Disjoint filled regions
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Check if nothing is filled
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Total number of triangles
    pub fn triangle_count(&self) -> usize {
        self.regions.iter().map(|r| r.triangles.len()).sum()
    }

    /// Filled area
    pub fn area(&self) -> f64 {
        self.regions
            .iter()
            .flat_map(|r| r.triangles.iter())
            .map(|t| triangle_area(&self.vertices, t).abs())
            .sum()
    }

    /// One primitive per region, wound in the requested orientation
    ///
    /// Convex quads become strips, other convex regions fans; regions with
    /// holes or reflex vertices are emitted as plain triangles.
    pub fn primitives(&self, orientation: Orientation) -> Vec<TessellationPrimitive> {
        self.regions.iter().map(|r| r.primitive(orientation)).collect()
    }

    /// All triangles as one flat index list
    pub fn triangles(&self, orientation: Orientation) -> Vec<u32> {
        let ccw = orientation == Orientation::CounterClockwise;
        let mut indices = Vec::with_capacity(self.triangle_count() * 3);
        for &[a, b, c] in self.regions.iter().flat_map(|r| r.triangles.iter()) {
            if ccw {
                indices.extend_from_slice(&[a, b, c]);
            } else {
                indices.extend_from_slice(&[a, c, b]);
            }
        }
        indices
    }

    /// Boundary loops between inside and outside
    ///
    /// Counter-clockwise outlines keep the interior on their left: outer
    /// loops run counter-clockwise and holes clockwise. Clockwise outlines
    /// are all reversed.
    pub fn outlines(&self, orientation: Orientation) -> Vec<Vec<u32>> {
        let loops = self
            .regions
            .iter()
            .flat_map(|r| std::iter::once(&r.outer).chain(r.holes.iter()));

        match orientation {
            Orientation::CounterClockwise => loops.cloned().collect(),
            Orientation::Clockwise => loops.map(|l| l.iter().rev().copied().collect()).collect(),
        }
    }
}

/// Signed area of an indexed triangle
#[inline]
pub(crate) fn triangle_area(vertices: &[Point2<f64>], t: &[u32; 3]) -> f64 {
    let a = vertices[t[0] as usize];
    let b = vertices[t[1] as usize];
    let c = vertices[t[2] as usize];
    (b - a).perp(&(c - a)) * 0.5
}
