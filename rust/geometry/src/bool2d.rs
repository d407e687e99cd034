// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations on footprints
//!
//! Union, difference and intersection of planar polygons using the i_overlay crate.
//! Inputs are oriented (exterior counter-clockwise, holes clockwise) and overlaid
//! with the non-zero fill rule, so self-intersecting rings are resolved rather
//! than cancelled. Results come back as oriented [`MultiPolygon2D`]s with
//! degenerate pieces removed; an empty result is a valid outcome, not an error.

use crate::polygon::{ensure_ccw, ensure_cw, is_valid_ring, MultiPolygon2D, Polygon2D};
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

type Path = Vec<[f64; 2]>;

/// Union a set of polygons into one footprint
///
/// A lone simple polygon is only re-oriented: running it through the
/// overlay would snap its vertices to the overlay grid.
pub fn union_polygons(polygons: &[Polygon2D]) -> MultiPolygon2D {
    let valid: Vec<&Polygon2D> = polygons.iter().filter(|p| p.is_valid()).collect();

    let (first, rest) = match valid.as_slice() {
        [] => return MultiPolygon2D::default(),
        [only] if only.is_simple() => return MultiPolygon2D::from(only.oriented()),
        [first, rest @ ..] => (*first, rest),
    };

    let subject = polygon_to_paths(first);
    let mut clip: Vec<Path> = rest.iter().flat_map(|p| polygon_to_paths(p)).collect();
    if clip.is_empty() {
        // Self-union still resolves self-intersections
        clip = subject.clone();
    }

    let result = subject.overlay(&clip, OverlayRule::Union, FillRule::NonZero);
    shapes_to_multipolygon(result)
}

/// Perform 2D boolean difference: subject - clip
pub fn difference(subject: &MultiPolygon2D, clip: &MultiPolygon2D) -> MultiPolygon2D {
    let subject_paths = multipolygon_to_paths(subject);
    if subject_paths.is_empty() {
        return MultiPolygon2D::default();
    }

    let clip_paths = multipolygon_to_paths(clip);
    if clip_paths.is_empty() {
        return subject.oriented();
    }

    let result = subject_paths.overlay(&clip_paths, OverlayRule::Difference, FillRule::NonZero);
    shapes_to_multipolygon(result)
}

/// Perform 2D boolean intersection of two polygons
pub fn intersection(subject: &Polygon2D, clip: &Polygon2D) -> MultiPolygon2D {
    if !subject.is_valid() || !clip.is_valid() {
        return MultiPolygon2D::default();
    }

    let result = polygon_to_paths(subject).overlay(
        &polygon_to_paths(clip),
        OverlayRule::Intersect,
        FillRule::NonZero,
    );
    shapes_to_multipolygon(result)
}

/// Whether two footprints share interior area
pub fn intersects(a: &MultiPolygon2D, b: &MultiPolygon2D) -> bool {
    let a_paths = multipolygon_to_paths(a);
    let b_paths = multipolygon_to_paths(b);
    if a_paths.is_empty() || b_paths.is_empty() {
        return false;
    }

    let result = a_paths.overlay(&b_paths, OverlayRule::Intersect, FillRule::NonZero);
    !shapes_to_multipolygon(result).is_empty()
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

/// Convert a polygon to i_overlay path format (outer CCW, holes CW)
fn polygon_to_paths(polygon: &Polygon2D) -> Vec<Path> {
    let mut paths = Vec::with_capacity(1 + polygon.holes.len());
    paths.push(ring_to_path(&ensure_ccw(&polygon.outer)));

    for hole in polygon.holes.iter().filter(|h| is_valid_ring(h)) {
        paths.push(ring_to_path(&ensure_cw(hole)));
    }

    paths
}

fn multipolygon_to_paths(multi: &MultiPolygon2D) -> Vec<Path> {
    multi
        .iter()
        .filter(|p| p.is_valid())
        .flat_map(polygon_to_paths)
        .collect()
}

fn ring_to_path(ring: &[Point2<f64>]) -> Path {
    ring.iter().map(|p| [p.x, p.y]).collect()
}

fn path_to_ring(path: &[[f64; 2]]) -> Vec<Point2<f64>> {
    path.iter().map(|p| Point2::new(p[0], p[1])).collect()
}

/// Convert i_overlay result shapes to an oriented multipolygon
///
/// i_overlay returns Vec<Vec<Vec<[f64; 2]>>> where:
/// - Outer Vec: list of shapes
/// - Middle Vec: list of contours per shape (first is outer, rest are holes)
/// - Inner Vec: list of points per contour
fn shapes_to_multipolygon(shapes: Vec<Vec<Path>>) -> MultiPolygon2D {
    let polygons = shapes
        .into_iter()
        .filter_map(|shape| {
            let mut contours = shape.into_iter();
            let outer = path_to_ring(&contours.next()?);
            let holes = contours.map(|c| path_to_ring(&c)).collect();
            let polygon = Polygon2D::with_holes(outer, holes);
            polygon.is_valid().then(|| polygon.oriented())
        })
        .collect();

    MultiPolygon2D::new(polygons)
}
