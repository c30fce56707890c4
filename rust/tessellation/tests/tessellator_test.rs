// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use shape_tessellation::{
    classify_path, create_tessellator, create_tessellator_from_path, extrude_tessellation, tessellate_all, ArcKind,
    Orientation, Path2D, Point2, Shape, ShapeClass, Tessellation, TessellationPrimitive, TessellatorOptions,
    Tolerance, WindingRule,
};

const FLATNESS: f64 = 0.25;

fn tessellate(path: &Path2D) -> Tessellation {
    create_tessellator(&Shape::Path(path.clone()), FLATNESS).unwrap()
}

fn signed_area(vertices: &[Point2<f64>], t: [u32; 3]) -> f64 {
    let a = vertices[t[0] as usize];
    let b = vertices[t[1] as usize];
    let c = vertices[t[2] as usize];
    (b - a).perp(&(c - a)) * 0.5
}

fn e_shape() -> Path2D {
    let mut path = Path2D::new();
    path.move_to(35.0, -0.65)
        .line_to(35.0, 0.65)
        .line_to(1.3, 0.65)
        .line_to(1.3, 39.35)
        .line_to(35.0, 39.35)
        .line_to(35.0, 40.65)
        .line_to(0.0, 40.65)
        .line_to(0.0, -40.65)
        .line_to(35.0, -40.65)
        .line_to(35.0, -39.35)
        .line_to(1.3, -39.35)
        .line_to(1.3, -0.65)
        .line_to(35.0, -0.65)
        .close();
    path
}

#[test]
fn extreme_shapes_without_area() {
    assert!(tessellate(&Path2D::new()).is_empty());

    let mut point = Path2D::new();
    point.move_to(10.0, 10.0);
    assert!(tessellate(&point).is_empty());

    point.close();
    assert!(tessellate(&point).is_empty());

    let mut line = Path2D::new();
    line.move_to(10.0, 10.0).line_to(20.0, 30.0);
    assert!(tessellate(&line).is_empty());
}

#[test]
fn clockwise_triangles_have_primitives() {
    let mut path = Path2D::new();
    path.move_to(10.0, 10.0)
        .line_to(20.0, 30.0)
        .line_to(15.0, 5.0)
        .close();
    let t = tessellate(&path);
    assert!(!t.primitives(Orientation::CounterClockwise).is_empty());

    path.move_to(110.0, 10.0)
        .line_to(120.0, 30.0)
        .line_to(115.0, 5.0)
        .close();
    let t = tessellate(&path);
    assert_eq!(t.regions().len(), 2);

    // Leaving the second triangle open drops it
    let mut path = Path2D::new();
    path.move_to(10.0, 10.0)
        .line_to(20.0, 30.0)
        .line_to(15.0, 5.0)
        .close()
        .move_to(110.0, 10.0)
        .line_to(120.0, 30.0)
        .line_to(115.0, 5.0);
    let t = tessellate(&path);
    assert_eq!(t.regions().len(), 1);
    assert!(!t.primitives(Orientation::Clockwise).is_empty());
}

#[test]
fn e_shape_area_and_class() {
    let path = e_shape();
    assert_eq!(
        classify_path(path.iter(), &Tolerance::default()).unwrap(),
        ShapeClass::Concave(Orientation::CounterClockwise)
    );

    let t = tessellate(&path);
    assert_eq!(t.regions().len(), 1);
    assert!(!t.regions()[0].is_convex());
    assert_relative_eq!(t.area(), 237.12, epsilon = 1e-3);

    let primitives = t.primitives(Orientation::CounterClockwise);
    assert!(matches!(primitives[0], TessellationPrimitive::Triangles(_)));
}

#[test]
fn primitives_follow_requested_orientation() {
    let shapes = [
        Shape::Path(e_shape()),
        Shape::rectangle(0.0, 0.0, 4.0, 2.0),
        Shape::ellipse(0.0, 0.0, 40.0, 20.0),
        Shape::Arc {
            x: 0.0,
            y: 0.0,
            width: 40.0,
            height: 40.0,
            start: 30.0,
            extent: 240.0,
            kind: ArcKind::Chord,
        },
    ];

    for shape in &shapes {
        let t = create_tessellator(shape, FLATNESS).unwrap();
        let vertices = t.vertices();
        let mut area = 0.0;
        for primitive in t.primitives(Orientation::CounterClockwise) {
            for tri in primitive.triangles() {
                let a = signed_area(vertices, tri);
                assert!(a > 0.0, "{:?} in {:?}", tri, shape);
                area += a;
            }
        }
        assert_relative_eq!(area, t.area(), max_relative = 1e-9);

        for primitive in t.primitives(Orientation::Clockwise) {
            for tri in primitive.triangles() {
                assert!(signed_area(vertices, tri) < 0.0);
            }
        }

        let flat = t.triangles(Orientation::Clockwise);
        for tri in flat.chunks_exact(3) {
            assert!(signed_area(vertices, [tri[0], tri[1], tri[2]]) < 0.0);
        }
    }
}

#[test]
fn convex_shapes_use_fans_and_strips() {
    let t = create_tessellator(&Shape::rectangle(0.0, 0.0, 4.0, 2.0), FLATNESS).unwrap();
    let primitives = t.primitives(Orientation::CounterClockwise);
    assert!(matches!(&primitives[0], TessellationPrimitive::TriangleStrip(s) if s.len() == 4));

    let t = create_tessellator(&Shape::ellipse(0.0, 0.0, 40.0, 20.0), FLATNESS).unwrap();
    let primitives = t.primitives(Orientation::CounterClockwise);
    assert_eq!(primitives.len(), 1);
    assert!(matches!(primitives[0], TessellationPrimitive::TriangleFan(_)));
    assert_eq!(primitives[0].vertex_count(), t.regions()[0].outer().len());
}

#[test]
fn nested_squares_under_each_winding_rule() {
    let mut path = Path2D::new();
    for &(lo, hi) in &[(0.0, 10.0), (3.0, 7.0)] {
        path.move_to(lo, lo).line_to(hi, lo).line_to(hi, hi).line_to(lo, hi).close();
    }

    let even_odd = create_tessellator_from_path(path.iter(), WindingRule::EvenOdd, FLATNESS).unwrap();
    assert_relative_eq!(even_odd.area(), 84.0, epsilon = 1e-9);
    assert_eq!(even_odd.regions()[0].holes().len(), 1);

    let non_zero = create_tessellator_from_path(path.iter(), WindingRule::NonZero, FLATNESS).unwrap();
    assert_relative_eq!(non_zero.area(), 100.0, epsilon = 1e-9);
    assert!(non_zero.regions()[0].holes().is_empty());

    // Outlines keep the interior on the left
    let outlines = even_odd.outlines(Orientation::CounterClockwise);
    assert_eq!(outlines.len(), 2);
    let loop_area = |indices: &Vec<u32>| {
        let points: Vec<_> = indices.iter().map(|&i| even_odd.vertices()[i as usize]).collect();
        let n = points.len();
        (0..n)
            .map(|i| points[i].x * points[(i + 1) % n].y - points[(i + 1) % n].x * points[i].y)
            .sum::<f64>()
            * 0.5
    };
    assert_relative_eq!(loop_area(&outlines[0]), 100.0, epsilon = 1e-9);
    assert_relative_eq!(loop_area(&outlines[1]), -16.0, epsilon = 1e-9);
}

#[test]
fn polygon_shape_uses_even_odd() {
    // Self-intersecting bow tie: two triangles of area 25 each
    let bow_tie = Shape::Polygon(vec![
        Point2::new(0.0, 0.0),
        Point2::new(10.0, 10.0),
        Point2::new(10.0, 0.0),
        Point2::new(0.0, 10.0),
    ]);
    let t = create_tessellator(&bow_tie, FLATNESS).unwrap();
    assert_eq!(t.regions().len(), 2);
    assert_relative_eq!(t.area(), 50.0, epsilon = 1e-9);
}

#[test]
fn tessellation_area_matches_polygon_area() {
    let mut path = Path2D::new();
    path.move_to(0.0, 0.0)
        .line_to(10.0, 0.0)
        .line_to(10.0, 10.0)
        .line_to(5.0, 3.0)
        .line_to(0.0, 10.0)
        .close();
    assert_relative_eq!(tessellate(&path).area(), 65.0, epsilon = 1e-9);

    let t = create_tessellator(&Shape::rectangle(1.0e6, 1.0e6, 2.0, 3.0), FLATNESS).unwrap();
    assert_relative_eq!(t.area(), 6.0, epsilon = 1e-6);
}

#[test]
fn batch_and_extrusion() {
    let shapes = vec![
        Shape::Path(e_shape()),
        Shape::rectangle(0.0, 0.0, 10.0, 10.0),
        Shape::line(0.0, 0.0, 1.0, 1.0),
    ];
    let results = tessellate_all(&shapes, &TessellatorOptions::default());
    let tessellations: Vec<Tessellation> = results.into_iter().map(Result::unwrap).collect();
    assert!(tessellations[2].is_empty());

    let mesh = extrude_tessellation(&tessellations[0], 5.0, None).unwrap();
    // Twelve outline edges, two caps
    assert_eq!(mesh.triangle_count(), tessellations[0].triangle_count() * 2 + 12 * 2);

    let (min, max) = mesh.bounds();
    assert!((min.y - -40.65).abs() < 1e-4);
    assert!((max.x - 35.0).abs() < 1e-4);
    assert!((max.z - 5.0).abs() < 1e-4);
}
