// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar polygon types in projected (linear-unit) coordinates
//!
//! Rings are stored open: the closing point is never repeated.

use nalgebra::{Point2, Rotation2, Vector2};

/// Minimum area threshold - polygons smaller than this are considered degenerate
pub const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Polygon with an exterior ring and optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    /// Exterior ring (counter-clockwise once oriented)
    pub outer: Vec<Point2<f64>>,
    /// Holes (clockwise once oriented)
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Polygon2D {
    /// Create a polygon without holes
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer: open_ring(outer),
            holes: Vec::new(),
        }
    }

    /// Create a polygon with holes
    pub fn with_holes(outer: Vec<Point2<f64>>, holes: Vec<Vec<Point2<f64>>>) -> Self {
        Self {
            outer: open_ring(outer),
            holes: holes.into_iter().map(open_ring).collect(),
        }
    }

    /// Axis-aligned rectangle `[xmin, ymin] - [xmax, ymax]`, counter-clockwise
    pub fn rectangle(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self::new(vec![
            Point2::new(xmin, ymin),
            Point2::new(xmax, ymin),
            Point2::new(xmax, ymax),
            Point2::new(xmin, ymax),
        ])
    }

    /// Area of the exterior minus the holes
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| signed_area(h).abs()).sum();
        signed_area(&self.outer).abs() - holes
    }

    /// Whether the exterior ring encloses any area
    pub fn is_valid(&self) -> bool {
        is_valid_ring(&self.outer)
    }

    /// Exterior ring followed by the holes
    pub fn rings(&self) -> impl Iterator<Item = &Vec<Point2<f64>>> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// Exterior counter-clockwise, holes clockwise, degenerate holes dropped
    pub fn oriented(&self) -> Self {
        Self {
            outer: ensure_ccw(&self.outer),
            holes: self
                .holes
                .iter()
                .filter(|h| is_valid_ring(h))
                .map(|h| ensure_cw(h))
                .collect(),
        }
    }

    /// Rotate counter-clockwise by `angle` radians about the world origin
    pub fn rotated(&self, angle: f64) -> Self {
        let rotation = Rotation2::new(angle);
        let rotate = |ring: &Vec<Point2<f64>>| -> Vec<Point2<f64>> {
            ring.iter().map(|p| rotation * *p).collect()
        };
        Self {
            outer: rotate(&self.outer),
            holes: self.holes.iter().map(rotate).collect(),
        }
    }

    /// Axis-aligned bounds of the exterior ring
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        ring_bounds(&self.outer)
    }

    /// Whether no two edges of any rings cross or touch, no ring folds back
    /// on itself and every hole starts inside the exterior
    ///
    /// A simple polygon only needs re-orienting to be a valid footprint.
    pub fn is_simple(&self) -> bool {
        if !self.is_valid() || !self.holes.iter().all(|h| is_valid_ring(h)) {
            return false;
        }

        // (ring, edge index, ring length, start, end)
        let edges: Vec<(usize, usize, usize, Point2<f64>, Point2<f64>)> = self
            .rings()
            .enumerate()
            .flat_map(|(r, ring)| {
                let n = ring.len();
                (0..n).map(move |i| (r, i, n, ring[i], ring[(i + 1) % n]))
            })
            .collect();

        for (k, &(r, i, n, a, b)) in edges.iter().enumerate() {
            for &(s, j, _, c, d) in &edges[k + 1..] {
                let adjacent = r == s && (j == i + 1 || (i == 0 && j == n - 1));
                if adjacent {
                    if folds_back(b - a, d - c) {
                        return false;
                    }
                } else if segments_touch(a, b, c, d) {
                    return false;
                }
            }
        }

        self.holes.iter().all(|h| point_in_ring(&h[0], &self.outer))
    }
}

/// Collection of polygons treated as one footprint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiPolygon2D {
    pub polygons: Vec<Polygon2D>,
}

impl MultiPolygon2D {
    pub fn new(polygons: Vec<Polygon2D>) -> Self {
        Self { polygons }
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Polygon2D> {
        self.polygons.iter()
    }

    /// Every ring of every polygon, exteriors first within each polygon
    pub fn rings(&self) -> impl Iterator<Item = &Vec<Point2<f64>>> {
        self.polygons.iter().flat_map(|p| p.rings())
    }

    pub fn area(&self) -> f64 {
        self.polygons.iter().map(Polygon2D::area).sum()
    }

    /// Re-orient every polygon (see [`Polygon2D::oriented`])
    pub fn oriented(&self) -> Self {
        Self::new(self.polygons.iter().map(Polygon2D::oriented).collect())
    }

    /// Polygon with the largest area, if any
    pub fn largest(&self) -> Option<&Polygon2D> {
        self.polygons
            .iter()
            .max_by(|a, b| a.area().total_cmp(&b.area()))
    }

    /// Axis-aligned bounds over all exterior rings
    pub fn bounds(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        self.polygons
            .iter()
            .filter_map(Polygon2D::bounds)
            .reduce(|(amin, amax), (bmin, bmax)| {
                (
                    Point2::new(amin.x.min(bmin.x), amin.y.min(bmin.y)),
                    Point2::new(amax.x.max(bmax.x), amax.y.max(bmax.y)),
                )
            })
    }
}

impl From<Polygon2D> for MultiPolygon2D {
    fn from(polygon: Polygon2D) -> Self {
        Self::new(vec![polygon])
    }
}

/// Compute the signed area of a ring
/// Positive = counter-clockwise, Negative = clockwise
pub fn signed_area(ring: &[Point2<f64>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = ring.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += ring[i].x * ring[j].y;
        area -= ring[j].x * ring[i].y;
    }

    area * 0.5
}

/// Check if a ring encloses area (not degenerate)
pub fn is_valid_ring(ring: &[Point2<f64>]) -> bool {
    ring.len() >= 3 && signed_area(ring).abs() > MIN_AREA_THRESHOLD
}

/// Ensure ring has counter-clockwise winding (positive area)
pub fn ensure_ccw(ring: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if signed_area(ring) < 0.0 {
        ring.iter().rev().cloned().collect()
    } else {
        ring.to_vec()
    }
}

/// Ensure ring has clockwise winding (for holes)
pub fn ensure_cw(ring: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if signed_area(ring) > 0.0 {
        ring.iter().rev().cloned().collect()
    } else {
        ring.to_vec()
    }
}

/// Perimeter of a closed ring
pub fn ring_length(ring: &[Point2<f64>]) -> f64 {
    let n = ring.len();
    if n < 2 {
        return 0.0;
    }
    (0..n).map(|i| (ring[(i + 1) % n] - ring[i]).norm()).sum()
}

/// Drop consecutive duplicate points and a repeated closing point
pub fn open_ring(mut ring: Vec<Point2<f64>>) -> Vec<Point2<f64>> {
    ring.dedup();
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

/// Compute bounding box of a ring
pub fn ring_bounds(ring: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    let first = ring.first()?;
    let mut min = *first;
    let mut max = *first;

    for p in ring.iter().skip(1) {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }

    Some((min, max))
}

/// Even-odd point-in-ring test
pub fn point_in_ring(point: &Point2<f64>, ring: &[Point2<f64>]) -> bool {
    let n = ring.len();
    let mut inside = false;
    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if point.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

fn orientation(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>) -> f64 {
    (b - a).perp(&(c - a))
}

fn within_box(a: Point2<f64>, b: Point2<f64>, p: Point2<f64>) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Whether segments `ab` and `cd` share any point
fn segments_touch(a: Point2<f64>, b: Point2<f64>, c: Point2<f64>, d: Point2<f64>) -> bool {
    let (o1, o2) = (orientation(c, d, a), orientation(c, d, b));
    let (o3, o4) = (orientation(a, b, c), orientation(a, b, d));

    if o1 * o2 < 0.0 && o3 * o4 < 0.0 {
        return true;
    }
    (o1 == 0.0 && within_box(c, d, a))
        || (o2 == 0.0 && within_box(c, d, b))
        || (o3 == 0.0 && within_box(a, b, c))
        || (o4 == 0.0 && within_box(a, b, d))
}

/// Consecutive edges pointing in opposite directions (a zero-width spike)
fn folds_back(u: Vector2<f64>, v: Vector2<f64>) -> bool {
    u.perp(&v).abs() <= 1e-12 * u.norm() * v.norm() && u.dot(&v) < 0.0
}

/// Check if two bounding boxes overlap
pub fn bounds_overlap(
    a: &(Point2<f64>, Point2<f64>),
    b: &(Point2<f64>, Point2<f64>),
) -> bool {
    a.0.x <= b.1.x && a.1.x >= b.0.x && a.0.y <= b.1.y && a.1.y >= b.0.y
}

/// Flatten a ring into `[x0, y0, x1, y1, ...]`, repeating the first point at the end
pub fn flatten_closed(ring: &[Point2<f64>]) -> Vec<f64> {
    let mut flat = Vec::with_capacity((ring.len() + 1) * 2);
    for p in ring.iter().chain(ring.first()) {
        flat.push(p.x);
        flat.push(p.y);
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(size: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(size, 0.0),
            Point2::new(size, size),
            Point2::new(0.0, size),
        ]
    }

    #[test]
    fn test_signed_area_orientation() {
        let ccw = square(2.0);
        let cw: Vec<_> = ccw.iter().rev().cloned().collect();
        assert_relative_eq!(signed_area(&ccw), 4.0);
        assert_relative_eq!(signed_area(&cw), -4.0);
        assert!(signed_area(&ensure_ccw(&cw)) > 0.0);
        assert!(signed_area(&ensure_cw(&ccw)) < 0.0);
    }

    #[test]
    fn test_open_ring_drops_closing_point() {
        let mut closed = square(1.0);
        closed.push(closed[0]);
        closed.insert(1, closed[1]);
        assert_eq!(open_ring(closed), square(1.0));
    }

    #[test]
    fn test_polygon_area_with_hole() {
        let hole = vec![
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 2.0),
            Point2::new(2.0, 2.0),
            Point2::new(2.0, 1.0),
        ];
        let polygon = Polygon2D::with_holes(square(4.0), vec![hole]);
        assert_relative_eq!(polygon.area(), 15.0);
        assert_eq!(polygon.rings().count(), 2);
    }

    #[test]
    fn test_rotation_preserves_area() {
        let polygon = Polygon2D::new(square(3.0));
        let rotated = polygon.rotated(0.7);
        assert_relative_eq!(rotated.area(), 9.0, epsilon = 1e-9);
        let back = rotated.rotated(-0.7);
        for (a, b) in back.outer.iter().zip(polygon.outer.iter()) {
            assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
            assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_ring_length_and_flatten() {
        let ring = square(2.0);
        assert_relative_eq!(ring_length(&ring), 8.0);
        let flat = flatten_closed(&ring);
        assert_eq!(flat.len(), 10);
        assert_eq!(&flat[8..], &[0.0, 0.0]);
    }

    #[test]
    fn test_is_simple() {
        assert!(Polygon2D::rectangle(0.0, 0.0, 30.0, 12.0).rotated(0.37).is_simple());

        let courtyard = Polygon2D::with_holes(
            square(10.0),
            vec![Polygon2D::rectangle(3.0, 3.0, 6.0, 6.0).outer],
        );
        assert!(courtyard.is_simple());

        // Last edge cuts through the first one
        let crossing = Polygon2D::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(1.0, 4.0),
            Point2::new(1.0, -1.0),
        ]);
        assert!(!crossing.is_simple());

        let spike = Polygon2D::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(6.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(4.0, 4.0),
            Point2::new(0.0, 4.0),
        ]);
        assert!(!spike.is_simple());

        let hole_on_edge = Polygon2D::with_holes(
            square(10.0),
            vec![Polygon2D::rectangle(0.0, 3.0, 6.0, 6.0).outer],
        );
        assert!(!hole_on_edge.is_simple());

        let hole_outside = Polygon2D::with_holes(
            square(10.0),
            vec![Polygon2D::rectangle(20.0, 3.0, 26.0, 6.0).outer],
        );
        assert!(!hole_outside.is_simple());
    }

    #[test]
    fn test_point_in_ring() {
        let ring = square(2.0);
        assert!(point_in_ring(&Point2::new(1.0, 1.0), &ring));
        assert!(!point_in_ring(&Point2::new(3.0, 1.0), &ring));
    }

    #[test]
    fn test_multipolygon_largest_and_bounds() {
        let small = Polygon2D::rectangle(10.0, 10.0, 11.0, 11.0);
        let big = Polygon2D::rectangle(0.0, 0.0, 5.0, 5.0);
        let multi = MultiPolygon2D::new(vec![small, big.clone()]);
        assert_eq!(multi.largest(), Some(&big));
        let (min, max) = multi.bounds().unwrap();
        assert_eq!((min.x, min.y, max.x, max.y), (0.0, 0.0, 11.0, 11.0));
    }
}
