// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion of tessellations into 3D triangle meshes

use crate::error::{Error, Result};
use crate::shape_class::Orientation;
use crate::tessellation::Tessellation;
use nalgebra::{Matrix4, Point2, Point3, Vector3};

/// Triangle mesh with per-vertex normals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtrudedMesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl ExtrudedMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions
            .extend_from_slice(&[position.x as f32, position.y as f32, position.z as f32]);
        self.normals
            .extend_from_slice(&[normal.x as f32, normal.y as f32, normal.z as f32]);
    }

    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.extend_from_slice(&[i0, i1, i2]);
    }

    /// Append another mesh, offsetting its indices
    pub fn merge(&mut self, other: &ExtrudedMesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = self.vertex_count() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned bounds (min, max); the origin twice for an empty mesh
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);
        for chunk in self.positions.chunks_exact(3) {
            for axis in 0..3 {
                min[axis] = min[axis].min(chunk[axis]);
                max[axis] = max[axis].max(chunk[axis]);
            }
        }
        (min, max)
    }

    /// Transform positions, and normals by the inverse transpose
    pub fn apply_transform(&mut self, transform: &Matrix4<f64>) {
        for chunk in self.positions.chunks_exact_mut(3) {
            let point = Point3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            let p = transform.transform_point(&point);
            chunk.copy_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
        }

        let normal_matrix = transform.try_inverse().unwrap_or(*transform).transpose();
        for chunk in self.normals.chunks_exact_mut(3) {
            let normal = Vector3::new(chunk[0] as f64, chunk[1] as f64, chunk[2] as f64);
            let n = (normal_matrix * normal.to_homogeneous()).xyz();
            let n = n.try_normalize(1e-12).unwrap_or(n);
            chunk.copy_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
        }

        // A mirroring transform flips handedness, so the winding must flip too
        if transform.fixed_view::<3, 3>(0, 0).determinant() < 0.0 {
            for t in self.indices.chunks_exact_mut(3) {
                t.swap(1, 2);
            }
        }
    }
}

/// Extrude a tessellation along +Z
///
/// The bottom cap lies at `z = 0` facing -Z, the top cap at `z = depth`
/// facing +Z. Side walls follow every outline with outward normals.
pub fn extrude_tessellation(
    tessellation: &Tessellation,
    depth: f64,
    transform: Option<Matrix4<f64>>,
) -> Result<ExtrudedMesh> {
    if !depth.is_finite() || depth <= 0.0 {
        return Err(Error::InvalidExtrusion(format!(
            "depth must be finite and positive, got {}",
            depth
        )));
    }

    let outlines = tessellation.outlines(Orientation::CounterClockwise);
    let vertices = tessellation.vertices();
    let edge_count: usize = outlines.iter().map(Vec::len).sum();
    let triangle_count = tessellation.triangle_count();

    let mut mesh = ExtrudedMesh::with_capacity(
        vertices.len() * 2 + edge_count * 4,
        triangle_count * 6 + edge_count * 6,
    );

    add_cap(
        &mut mesh,
        vertices,
        &tessellation.triangles(Orientation::Clockwise),
        0.0,
        -Vector3::z(),
    );
    add_cap(
        &mut mesh,
        vertices,
        &tessellation.triangles(Orientation::CounterClockwise),
        depth,
        Vector3::z(),
    );

    for outline in &outlines {
        let points: Vec<Point2<f64>> = outline.iter().map(|&i| vertices[i as usize]).collect();
        add_side_walls(&mut mesh, &points, depth);
    }

    if let Some(matrix) = transform {
        mesh.apply_transform(&matrix);
    }

    Ok(mesh)
}

fn add_cap(mesh: &mut ExtrudedMesh, vertices: &[Point2<f64>], indices: &[u32], z: f64, normal: Vector3<f64>) {
    let base = mesh.vertex_count() as u32;
    for p in vertices {
        mesh.add_vertex(Point3::new(p.x, p.y, z), normal);
    }
    for t in indices.chunks_exact(3) {
        mesh.add_triangle(base + t[0], base + t[1], base + t[2]);
    }
}

/// Walls along a loop that keeps the interior on its left
fn add_side_walls(mesh: &mut ExtrudedMesh, boundary: &[Point2<f64>], depth: f64) {
    let n = boundary.len();
    for i in 0..n {
        let p0 = &boundary[i];
        let p1 = &boundary[(i + 1) % n];

        let edge = p1 - p0;
        let Some(normal) = Vector3::new(edge.y, -edge.x, 0.0).try_normalize(1e-10) else {
            continue;
        };

        let idx = mesh.vertex_count() as u32;
        mesh.add_vertex(Point3::new(p0.x, p0.y, 0.0), normal);
        mesh.add_vertex(Point3::new(p1.x, p1.y, 0.0), normal);
        mesh.add_vertex(Point3::new(p1.x, p1.y, depth), normal);
        mesh.add_vertex(Point3::new(p0.x, p0.y, depth), normal);

        mesh.add_triangle(idx, idx + 1, idx + 2);
        mesh.add_triangle(idx, idx + 2, idx + 3);
    }
}
