// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Convex hull and minimum-area rotated bounding rectangle

use nalgebra::{Point2, Vector2};

/// Minimum-area rectangle enclosing a point set, corners counter-clockwise
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedRect {
    pub corners: [Point2<f64>; 4],
}

impl OrientedRect {
    /// Compute the minimum rotated rectangle of a ring
    ///
    /// Returns `None` when the points do not span any area.
    pub fn of_points(points: &[Point2<f64>]) -> Option<Self> {
        let hull = convex_hull(points);
        if hull.len() < 3 {
            return None;
        }

        let n = hull.len();
        let mut best: Option<(f64, [Point2<f64>; 4])> = None;

        // The optimal rectangle has one side collinear with a hull edge
        for i in 0..n {
            let edge = hull[(i + 1) % n] - hull[i];
            let len = edge.norm();
            if len <= f64::EPSILON {
                continue;
            }
            let u = edge / len;
            let v = Vector2::new(-u.y, u.x);

            let (mut min_u, mut max_u) = (f64::MAX, f64::MIN);
            let (mut min_v, mut max_v) = (f64::MAX, f64::MIN);
            for p in &hull {
                let d = p.coords;
                let pu = d.dot(&u);
                let pv = d.dot(&v);
                min_u = min_u.min(pu);
                max_u = max_u.max(pu);
                min_v = min_v.min(pv);
                max_v = max_v.max(pv);
            }

            let area = (max_u - min_u) * (max_v - min_v);
            if best.as_ref().map_or(true, |(a, _)| area < *a) {
                let corner = |a: f64, b: f64| Point2::from(u * a + v * b);
                best = Some((
                    area,
                    [
                        corner(min_u, min_v),
                        corner(max_u, min_v),
                        corner(max_u, max_v),
                        corner(min_u, max_v),
                    ],
                ));
            }
        }

        best.map(|(_, corners)| Self { corners })
    }

    /// Counter-clockwise rotation (radians) that makes the rectangle axis-aligned
    ///
    /// Compares the two sides meeting at corner 0: when `|c0c3| <= |c0c1|`
    /// the side `c0 -> c1` is the reference, otherwise `c0 -> c3`. The
    /// reference side's azimuth (clockwise from +Y, folded into `(0, 180]`
    /// degrees) rotates it onto the Y axis.
    pub fn alignment_angle(&self) -> f64 {
        let [c0, c1, _, c3] = self.corners;
        let target = if (c3 - c0).norm() <= (c1 - c0).norm() { c1 } else { c3 };
        azimuth(&c0, &target)
    }

    /// Corners flattened to `[x0, y0, x1, y1, x2, y2, x3, y3]`
    pub fn flattened(&self) -> [f64; 8] {
        let mut flat = [0.0; 8];
        for (i, c) in self.corners.iter().enumerate() {
            flat[i * 2] = c.x;
            flat[i * 2 + 1] = c.y;
        }
        flat
    }
}

/// Azimuth between two points in radians, folded into `(0, PI]`
fn azimuth(from: &Point2<f64>, to: &Point2<f64>) -> f64 {
    let angle = (to.x - from.x).atan2(to.y - from.y);
    if angle > 0.0 {
        angle
    } else {
        angle + std::f64::consts::PI
    }
}

/// Compute convex hull of 2D points using Graham scan
///
/// Collinear points are dropped; the hull is counter-clockwise.
pub fn convex_hull(points: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if points.len() < 3 {
        return points.to_vec();
    }

    // Find bottom-most point (lowest Y, then leftmost X)
    let mut start_idx = 0;
    for (i, p) in points.iter().enumerate() {
        if p.y < points[start_idx].y || (p.y == points[start_idx].y && p.x < points[start_idx].x) {
            start_idx = i;
        }
    }

    let start = points[start_idx];

    // Sort points by polar angle with respect to start, nearest first on ties
    let mut sorted: Vec<Point2<f64>> = points.iter().filter(|p| **p != start).cloned().collect();

    sorted.sort_by(|a, b| {
        let angle_a = (a.y - start.y).atan2(a.x - start.x);
        let angle_b = (b.y - start.y).atan2(b.x - start.x);
        angle_a
            .total_cmp(&angle_b)
            .then_with(|| (a - start).norm_squared().total_cmp(&(b - start).norm_squared()))
    });

    let mut hull = vec![start];

    for p in sorted {
        while hull.len() > 1 {
            let top = hull[hull.len() - 1];
            let second = hull[hull.len() - 2];

            let cross = (top.x - second.x) * (p.y - second.y) - (top.y - second.y) * (p.x - second.x);

            if cross <= 0.0 {
                hull.pop();
            } else {
                break;
            }
        }
        hull.push(p);
    }

    hull
}
