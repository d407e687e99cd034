// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boolean, envelope and triangulation operations on realistic footprints

use approx::assert_relative_eq;
use massing_geometry::polygon::signed_area;
use massing_geometry::{
    difference, intersection, triangulate_polygon, triangulate_polygon_with_holes,
    triangulation_deviation, union_polygons, validate_triangulation, MultiPolygon2D,
    OrientedRect, Point2, Polygon2D,
};

/// Courtyard block: 20 x 20 with a 6 x 6 courtyard
fn courtyard() -> Polygon2D {
    Polygon2D::with_holes(
        Polygon2D::rectangle(0.0, 0.0, 20.0, 20.0).outer,
        vec![Polygon2D::rectangle(7.0, 7.0, 13.0, 13.0).outer],
    )
}

#[test]
fn union_keeps_courtyard_as_clockwise_hole() {
    let union = union_polygons(&[courtyard(), Polygon2D::rectangle(18.0, 0.0, 30.0, 5.0)]);

    assert_eq!(union.len(), 1);
    let polygon = &union.polygons[0];
    assert_eq!(polygon.holes.len(), 1);
    assert!(signed_area(&polygon.outer) > 0.0);
    assert!(signed_area(&polygon.holes[0]) < 0.0);
    assert_relative_eq!(union.area(), 400.0 - 36.0 + 10.0 * 5.0, epsilon = 1e-9);
}

#[test]
fn exposed_roof_of_lower_slab() {
    let lower: MultiPolygon2D = Polygon2D::rectangle(0.0, 0.0, 20.0, 10.0).into();
    let upper: MultiPolygon2D = Polygon2D::rectangle(0.0, 0.0, 10.0, 10.0).into();

    let exposed = difference(&lower, &upper);
    assert_eq!(exposed.len(), 1);
    assert_relative_eq!(exposed.area(), 100.0, epsilon = 1e-9);

    let (min, max) = exposed.bounds().unwrap();
    assert_relative_eq!(min.x, 10.0, epsilon = 1e-9);
    assert_relative_eq!(max.x, 20.0, epsilon = 1e-9);
}

#[test]
fn grid_cell_clip_of_courtyard() {
    let cell = Polygon2D::rectangle(5.0, 5.0, 15.0, 15.0);
    let clipped = intersection(&courtyard(), &cell);

    // Cell minus the courtyard: one polygon with one hole
    assert_relative_eq!(clipped.area(), 100.0 - 36.0, epsilon = 1e-9);
    let polygon = clipped.largest().unwrap();

    let indices = triangulate_polygon_with_holes(&polygon.outer, &polygon.holes).unwrap();
    let points: Vec<Point2<f64>> = polygon.rings().flatten().cloned().collect();
    validate_triangulation(&indices, points.len()).unwrap();
    assert!(triangulation_deviation(&points, &indices, polygon.area()) < 1e-9);
}

#[test]
fn envelope_of_rotated_l_shape() {
    let l_shape = union_polygons(&[
        Polygon2D::rectangle(0.0, 0.0, 12.0, 4.0),
        Polygon2D::rectangle(0.0, 0.0, 4.0, 8.0),
    ]);
    let rotated = l_shape.polygons[0].rotated(0.7);

    let envelope = OrientedRect::of_points(&rotated.outer).unwrap();
    assert_relative_eq!(signed_area(&envelope.corners), 12.0 * 8.0, epsilon = 1e-6);

    // Undoing the alignment rotation gives an axis-aligned envelope
    let aligned = rotated.rotated(envelope.alignment_angle());
    let (min, max) = aligned.bounds().unwrap();
    assert_relative_eq!((max.x - min.x) * (max.y - min.y), 96.0, epsilon = 1e-6);
}

#[test]
fn concave_footprint_triangulates_to_its_area() {
    let ring = vec![
        Point2::new(0.0, 0.0),
        Point2::new(10.0, 0.0),
        Point2::new(10.0, 10.0),
        Point2::new(5.0, 3.0),
        Point2::new(0.0, 10.0),
    ];
    let indices = triangulate_polygon(&ring).unwrap();

    assert_eq!(indices.len(), 3 * 3);
    assert!(triangulation_deviation(&ring, &indices, signed_area(&ring).abs()) < 1e-9);
}
