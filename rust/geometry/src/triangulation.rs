// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint triangulation
//!
//! Rings are handed to earcutr as one flat coordinate buffer. Indices in
//! the result refer to the concatenation of the exterior and hole rings,
//! in that order. Small convex rings (most clipped roof cells) skip earcut
//! and are fanned from their first vertex.

use crate::polygon::signed_area;
use crate::{Error, Point2, Result};

/// Largest ring that is fanned instead of ear-cut when convex
const FAN_MAX_VERTICES: usize = 8;

/// Turns with a smaller cross product count as straight
const COLLINEAR_EPSILON: f64 = 1e-10;

/// Whether every turn of the ring bends the same way
///
/// Collinear vertices are ignored; a fully collinear ring is not convex.
fn is_convex(ring: &[Point2<f64>]) -> bool {
    let n = ring.len();
    let mut orientation = None;

    for i in 0..n {
        let a = ring[(i + 1) % n] - ring[i];
        let b = ring[(i + 2) % n] - ring[(i + 1) % n];
        let turn = a.perp(&b);
        if turn.abs() <= COLLINEAR_EPSILON {
            continue;
        }

        let left = turn > 0.0;
        match orientation {
            None => orientation = Some(left),
            Some(o) if o != left => return false,
            Some(_) => {}
        }
    }

    orientation.is_some()
}

/// Fan of `n - 2` triangles around vertex 0
fn fan(n: usize) -> Vec<usize> {
    (1..n - 1).flat_map(|i| [0, i, i + 1]).collect()
}

/// Flat `[x0, y0, x1, y1, ...]` buffer of all rings plus the vertex index at
/// which each ring after the first starts
fn flatten_rings<'a>(rings: impl Iterator<Item = &'a [Point2<f64>]>) -> (Vec<f64>, Vec<usize>) {
    let mut coords = Vec::new();
    let mut starts = Vec::new();

    for (i, ring) in rings.enumerate() {
        if i > 0 {
            starts.push(coords.len() / 2);
        }
        coords.extend(ring.iter().flat_map(|p| [p.x, p.y]));
    }

    (coords, starts)
}

fn earcut(coords: &[f64], hole_starts: &[usize]) -> Result<Vec<usize>> {
    earcutr::earcut(coords, hole_starts, 2)
        .map_err(|e| Error::TriangulationError(format!("earcut failed: {:?}", e)))
}

/// Triangulate a simple ring
///
/// Returns flat triangle indices into `ring`.
pub fn triangulate_polygon(ring: &[Point2<f64>]) -> Result<Vec<usize>> {
    match ring.len() {
        n if n < 3 => Err(Error::TriangulationError(format!(
            "ring has {} points, need at least 3",
            n
        ))),
        3 => Ok(vec![0, 1, 2]),
        n if n <= FAN_MAX_VERTICES && is_convex(ring) => Ok(fan(n)),
        _ => {
            let (coords, _) = flatten_rings(std::iter::once(ring));
            earcut(&coords, &[])
        }
    }
}

/// Triangulate a ring with holes
///
/// Returns flat triangle indices into the exterior ring followed by every
/// hole ring.
pub fn triangulate_polygon_with_holes(
    outer: &[Point2<f64>],
    holes: &[Vec<Point2<f64>>],
) -> Result<Vec<usize>> {
    if holes.is_empty() {
        return triangulate_polygon(outer);
    }
    if outer.len() < 3 {
        return Err(Error::TriangulationError(format!(
            "exterior ring has {} points, need at least 3",
            outer.len()
        )));
    }
    // Short holes would shift the offsets of every later hole
    if let Some(hole) = holes.iter().find(|h| h.len() < 3) {
        return Err(Error::TriangulationError(format!(
            "hole ring has {} points, need at least 3",
            hole.len()
        )));
    }

    let rings = std::iter::once(outer).chain(holes.iter().map(Vec::as_slice));
    let (coords, starts) = flatten_rings(rings);
    earcut(&coords, &starts)
}

/// Reject triangulations that cannot be emitted as whole triangles
pub fn validate_triangulation(indices: &[usize], vertex_count: usize) -> Result<()> {
    let invalid = indices.is_empty()
        || indices.len() % 3 != 0
        || indices.iter().any(|&i| i >= vertex_count);

    if invalid {
        return Err(Error::InvalidTriangulation {
            triangles: indices.len() / 3,
            index_count: indices.len(),
        });
    }
    Ok(())
}

/// Relative difference between the summed triangle area and the polygon area
///
/// `points` are the concatenated ring vertices the indices refer to and
/// `polygon_area` the unsigned area of the polygon (holes subtracted).
pub fn triangulation_deviation(points: &[Point2<f64>], indices: &[usize], polygon_area: f64) -> f64 {
    let triangle_area: f64 = indices
        .chunks_exact(3)
        .map(|t| signed_area(&[points[t[0]], points[t[1]], points[t[2]]]).abs())
        .sum();

    if polygon_area <= f64::EPSILON {
        return triangle_area;
    }
    ((polygon_area - triangle_area) / polygon_area).abs()
}
