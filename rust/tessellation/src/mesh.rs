// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Contour mesh
//!
//! Collects polygon contours and resolves them under a winding rule into
//! disjoint regions using the i_overlay sweep-line engine. Each region is
//! then triangulated with earcutr.

use crate::error::{Error, Result};
use crate::path::WindingRule;
use crate::tessellation::{triangle_area, Region, Tessellation};
use crate::tolerance::Tolerance;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;
use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

/// Contours waiting to be tessellated
#[derive(Debug, Clone)]
pub struct Mesh {
    winding_rule: WindingRule,
    tolerance: Tolerance,
    contours: Vec<Vec<Point2<f64>>>,
    current: Option<Vec<Point2<f64>>>,
}

impl Mesh {
    /// Create an empty mesh
    pub fn new(winding_rule: WindingRule) -> Self {
        Self::with_tolerance(winding_rule, Tolerance::default())
    }

    /// Create an empty mesh with a custom tolerance for duplicate vertices
    pub fn with_tolerance(winding_rule: WindingRule, tolerance: Tolerance) -> Self {
        Self {
            winding_rule,
            tolerance,
            contours: Vec::new(),
            current: None,
        }
    }

    #[inline]
    pub fn winding_rule(&self) -> WindingRule {
        self.winding_rule
    }

    #[inline]
    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Number of accepted contours
    #[inline]
    pub fn contour_count(&self) -> usize {
        self.contours.len()
    }

    /// Start a new contour
    pub fn begin_contour(&mut self) -> Result<()> {
        if self.current.is_some() {
            return Err(Error::ContourAlreadyStarted);
        }
        self.current = Some(Vec::new());
        Ok(())
    }

    /// Append a vertex to the open contour
    pub fn add_vertex(&mut self, x: f64, y: f64) -> Result<()> {
        let current = self.current.as_mut().ok_or(Error::ContourNotStarted)?;
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::InvalidCoordinate(x, y));
        }

        let p = Point2::new(x, y);
        match current.last() {
            Some(last) if self.tolerance.points_equal(last, &p) => {}
            _ => current.push(p),
        }
        Ok(())
    }

    /// Close the open contour
    ///
    /// Contours with fewer than three distinct vertices are dropped.
    pub fn end_contour(&mut self) -> Result<()> {
        let mut contour = self.current.take().ok_or(Error::ContourNotStarted)?;

        if contour.len() > 1 && self.tolerance.points_equal(&contour[0], &contour[contour.len() - 1]) {
            contour.pop();
        }

        if contour.len() >= 3 {
            self.contours.push(contour);
        } else {
            trace!(vertices = contour.len(), "Dropped degenerate contour");
        }
        Ok(())
    }

    /// Resolve the contours and triangulate every filled region
    ///
    /// A contour still open is ended first.
    pub fn finish(mut self) -> Result<Tessellation> {
        if self.current.is_some() {
            self.end_contour()?;
        }
        if self.contours.is_empty() {
            return Ok(Tessellation::new());
        }

        let subject: Vec<Vec<[f64; 2]>> = self
            .contours
            .iter()
            .map(|c| c.iter().map(|p| [p.x, p.y]).collect())
            .collect();
        let clip: Vec<Vec<[f64; 2]>> = Vec::new();

        let shapes = subject.overlay(&clip, OverlayRule::Subject, fill_rule(self.winding_rule));

        let snap = VertexSnap::new(&self.contours, &self.tolerance);
        let mut builder = TessellationBuilder::new(self.tolerance, snap);
        for shape in &shapes {
            builder.add_shape(shape)?;
        }
        let tessellation = builder.build();

        debug!(
            winding_rule = ?self.winding_rule,
            contours = self.contours.len(),
            regions = tessellation.regions.len(),
            triangles = tessellation.triangle_count(),
            "Tessellated mesh"
        );

        Ok(tessellation)
    }
}

#[inline]
fn fill_rule(winding_rule: WindingRule) -> FillRule {
    match winding_rule {
        WindingRule::EvenOdd => FillRule::EvenOdd,
        WindingRule::NonZero => FillRule::NonZero,
        WindingRule::Positive => FillRule::Positive,
        WindingRule::Negative => FillRule::Negative,
    }
}

/// Maps overlay output back onto the input vertices
///
/// The overlay works on a snapped integer grid, so its points drift from the
/// input by up to one grid step. Any output point within the snap radius of
/// an input vertex is replaced by that vertex; only points created at edge
/// intersections stay new.
struct VertexSnap {
    radius: f64,
    origin: Point2<f64>,
    cells: FxHashMap<(i64, i64), Vec<Point2<f64>>>,
}

impl VertexSnap {
    /// Relative size of the overlay grid step, with headroom
    const GRID_STEP: f64 = 1e-8;

    fn new(contours: &[Vec<Point2<f64>>], tolerance: &Tolerance) -> Self {
        let mut min = Point2::new(f64::MAX, f64::MAX);
        let mut max = Point2::new(f64::MIN, f64::MIN);
        for p in contours.iter().flatten() {
            min = min.inf(p);
            max = max.sup(p);
        }
        let extent = (max - min).amax();
        let radius = (extent * Self::GRID_STEP)
            .max(tolerance.absolute)
            .max(f64::MIN_POSITIVE);

        let mut snap = Self {
            radius,
            origin: min,
            cells: FxHashMap::default(),
        };
        for p in contours.iter().flatten() {
            let cell = snap.cell(p);
            snap.cells.entry(cell).or_default().push(*p);
        }
        snap
    }

    #[inline]
    fn cell(&self, p: &Point2<f64>) -> (i64, i64) {
        (
            ((p.x - self.origin.x) / self.radius).floor() as i64,
            ((p.y - self.origin.y) / self.radius).floor() as i64,
        )
    }

    /// Nearest input vertex within the radius, or the point itself
    fn snap(&self, p: Point2<f64>) -> Point2<f64> {
        let (cx, cy) = self.cell(&p);
        let mut best = None;
        let mut best_distance = self.radius;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(candidates) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for c in candidates {
                    let distance = (c - p).amax();
                    if distance <= best_distance {
                        best_distance = distance;
                        best = Some(*c);
                    }
                }
            }
        }
        best.unwrap_or(p)
    }
}

/// Assembles regions over a shared, de-duplicated vertex list
struct TessellationBuilder {
    tolerance: Tolerance,
    snap: VertexSnap,
    vertices: Vec<Point2<f64>>,
    lookup: FxHashMap<(u64, u64), u32>,
    regions: Vec<Region>,
}

impl TessellationBuilder {
    fn new(tolerance: Tolerance, snap: VertexSnap) -> Self {
        Self {
            tolerance,
            snap,
            vertices: Vec::new(),
            lookup: FxHashMap::default(),
            regions: Vec::new(),
        }
    }

    fn build(self) -> Tessellation {
        Tessellation {
            vertices: self.vertices,
            regions: self.regions,
        }
    }

    fn index(&mut self, p: &Point2<f64>) -> u32 {
        // Adding 0.0 folds -0.0 into 0.0
        let key = ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits());
        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }
        let index = self.vertices.len() as u32;
        self.vertices.push(*p);
        self.lookup.insert(key, index);
        index
    }

    /// Add one overlay shape: first contour is the outer boundary, the rest are holes
    fn add_shape(&mut self, shape: &[Vec<[f64; 2]>]) -> Result<()> {
        let Some((outer, holes)) = shape.split_first() else {
            return Ok(());
        };

        let outer = oriented(self.to_points(outer), true);
        if outer.len() < 3 {
            return Ok(());
        }
        let holes: Vec<Vec<Point2<f64>>> = holes
            .iter()
            .map(|h| oriented(self.to_points(h), false))
            .filter(|h| h.len() >= 3)
            .collect();

        let convex = holes.is_empty() && is_strictly_convex(&outer);
        let local = if convex {
            fan_triangulate(outer.len())
        } else {
            triangulate_with_holes(&outer, &holes)?
        };

        let points: Vec<&Point2<f64>> = outer.iter().chain(holes.iter().flatten()).collect();
        let global: Vec<u32> = points.iter().map(|p| self.index(p)).collect();

        let min_area = degenerate_area(&outer);
        let mut triangles = Vec::with_capacity(local.len() / 3);
        for t in local.chunks_exact(3) {
            let tri = [global[t[0]], global[t[1]], global[t[2]]];
            let area = triangle_area(&self.vertices, &tri);
            if area.abs() <= min_area {
                continue;
            }
            triangles.push(if area > 0.0 { tri } else { [tri[0], tri[2], tri[1]] });
        }

        if triangles.is_empty() {
            warn!(vertices = outer.len(), holes = holes.len(), "Region produced no triangles");
            return Ok(());
        }

        let outer_indices = global[..outer.len()].to_vec();
        let mut offset = outer.len();
        let hole_indices = holes
            .iter()
            .map(|h| {
                let indices = global[offset..offset + h.len()].to_vec();
                offset += h.len();
                indices
            })
            .collect();

        trace!(
            vertices = outer.len(),
            holes = holes.len(),
            triangles = triangles.len(),
            convex,
            "Triangulated region"
        );

        self.regions.push(Region {
            outer: outer_indices,
            holes: hole_indices,
            triangles,
            convex,
        });
        Ok(())
    }

    /// Overlay contour to snapped points, without a repeated closing point
    fn to_points(&self, contour: &[[f64; 2]]) -> Vec<Point2<f64>> {
        let mut points: Vec<Point2<f64>> = Vec::with_capacity(contour.len());
        for p in contour {
            let p = self.snap.snap(Point2::new(p[0], p[1]));
            if points.last() != Some(&p) {
                points.push(p);
            }
        }
        if points.len() > 1 && self.tolerance.points_equal(&points[0], &points[points.len() - 1]) {
            points.pop();
        }
        points
    }
}

/// Triangles at or below this area are dropped
///
/// Scales with the region's bounding box, so tiny shapes keep their triangles.
fn degenerate_area(outer: &[Point2<f64>]) -> f64 {
    let mut min = Point2::new(f64::MAX, f64::MAX);
    let mut max = Point2::new(f64::MIN, f64::MIN);
    for p in outer {
        min = min.inf(p);
        max = max.sup(p);
    }
    let extent = (max - min).amax() * 1e-6;
    extent * extent
}

/// Signed area of a closed polygon (positive when counter-clockwise)
pub(crate) fn signed_area(points: &[Point2<f64>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let n = points.len();
    (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            points[i].x * points[j].y - points[j].x * points[i].y
        })
        .sum::<f64>()
        * 0.5
}

/// Reverse the points if needed to get the requested orientation
fn oriented(mut points: Vec<Point2<f64>>, counter_clockwise: bool) -> Vec<Point2<f64>> {
    let area = signed_area(&points);
    if (counter_clockwise && area < 0.0) || (!counter_clockwise && area > 0.0) {
        points.reverse();
    }
    points
}

/// Every turn of a counter-clockwise polygon is a strict left turn
fn is_strictly_convex(points: &[Point2<f64>]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    (0..n).all(|i| {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];
        (p1 - p0).perp(&(p2 - p1)) > 0.0
    })
}

fn fan_triangulate(n: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity((n - 2) * 3);
    for i in 1..n - 1 {
        indices.extend_from_slice(&[0, i, i + 1]);
    }
    indices
}

/// Triangulate with earcutr; indices refer to outer points followed by hole points
fn triangulate_with_holes(outer: &[Point2<f64>], holes: &[Vec<Point2<f64>>]) -> Result<Vec<usize>> {
    let total = outer.len() + holes.iter().map(Vec::len).sum::<usize>();
    let mut vertices = Vec::with_capacity(total * 2);
    for p in outer {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    let mut hole_indices = Vec::with_capacity(holes.len());
    for hole in holes {
        hole_indices.push(vertices.len() / 2);
        for p in hole {
            vertices.push(p.x);
            vertices.push(p.y);
        }
    }

    earcutr::earcut(&vertices, &hole_indices, 2).map_err(|e| Error::TriangulationError(format!("{:?}", e)))
}
