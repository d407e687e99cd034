// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall panel segmentation
//!
//! A footprint ring is cut into panels of (almost) equal arc length. The
//! panel length is retiled so it divides the ring perimeter evenly, break
//! points are placed at multiples of it, and the ring's own vertices are
//! kept as extra break points so every corner stays a vertex of the wall.

use crate::tiling::even_tiling;
use massing_geometry::polygon::open_ring;
use massing_geometry::{MultiPolygon2D, Point2};

/// Interpolated break points closer than this to a vertex are dropped
const POINT_EPSILON: f64 = 1e-8;

/// Slack when deciding that a panel has reached its length
const LENGTH_EPSILON: f64 = 1e-5;

/// Polyline along a footprint ring; the base of one wall strip
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub points: Vec<Point2<f64>>,
}

impl Panel {
    /// Number of straight edges in the panel
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Arc length of the panel
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| (w[1] - w[0]).norm()).sum()
    }
}

/// Segment every ring (exteriors and holes) of a footprint
pub fn segment_footprint(footprint: &MultiPolygon2D, target_size: f64) -> Vec<Panel> {
    footprint
        .rings()
        .flat_map(|ring| segment_ring(ring, target_size))
        .collect()
}

/// Cut a closed ring into panels of near-uniform length
///
/// The ring may be given open or with its closing point repeated. The
/// returned panels run in ring order starting at the first vertex, and
/// concatenated they trace the ring exactly once.
pub fn segment_ring(ring: &[Point2<f64>], target_size: f64) -> Vec<Panel> {
    let ring = open_ring(ring.to_vec());
    if ring.len() < 2 {
        return Vec::new();
    }

    let n = ring.len();
    let edge_lengths: Vec<f64> = (0..n).map(|i| (ring[(i + 1) % n] - ring[i]).norm()).collect();
    let perimeter: f64 = edge_lengths.iter().sum();

    let Some((count, size)) = even_tiling(perimeter, target_size) else {
        return Vec::new();
    };

    let break_points = merge_break_points(&ring, &edge_lengths, count, size);
    group_into_panels(&break_points, size)
}

/// Ring vertices interleaved with arc-length points at multiples of `size`
///
/// The result is closed: the first vertex is repeated at the end.
fn merge_break_points(
    ring: &[Point2<f64>],
    edge_lengths: &[f64],
    count: usize,
    size: f64,
) -> Vec<Point2<f64>> {
    let n = ring.len();
    let mut points = Vec::with_capacity(n + count + 1);
    let mut next = 0usize;
    let mut edge_start = 0.0;

    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        let len = edge_lengths[i];
        points.push(a);

        while next < count {
            let distance = next as f64 * size;
            if distance >= edge_start + len {
                break;
            }
            next += 1;

            if len <= 0.0 {
                continue;
            }
            let t = ((distance - edge_start) / len).clamp(0.0, 1.0);
            let p = a + (b - a) * t;
            if (p - a).norm() > POINT_EPSILON && (p - b).norm() > POINT_EPSILON {
                points.push(p);
            }
        }

        edge_start += len;
    }

    points.push(ring[0]);
    points
}

/// Walk the break points, closing a panel whenever its length reaches `size`
fn group_into_panels(points: &[Point2<f64>], size: f64) -> Vec<Panel> {
    let mut panels: Vec<Panel> = Vec::new();
    let mut current = vec![points[0]];
    let mut length = 0.0;

    for w in points.windows(2) {
        length += (w[1] - w[0]).norm();
        current.push(w[1]);

        if length >= size - LENGTH_EPSILON {
            panels.push(Panel {
                points: std::mem::replace(&mut current, vec![w[1]]),
            });
            length = 0.0;
        }
    }

    // Floating-point remainder: extend the last panel rather than leave a gap
    if current.len() > 1 {
        match panels.last_mut() {
            Some(last) => last.points.extend(current.into_iter().skip(1)),
            None => panels.push(Panel { points: current }),
        }
    }

    panels
}
