// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roof tessellation into grid-aligned cells
//!
//! The exposed part of a slab footprint (its footprint minus the footprint of
//! the slab above) is split into pieces. Each piece is rotated so its minimum
//! rotated rectangle is axis-aligned, covered by a regular grid, clipped cell
//! by cell, rotated back and triangulated. Each non-empty grid cell becomes
//! one addressable roof cell, which gives regular "shingles" that downstream
//! sampling can attach values to.

use crate::config::RoofOptions;
use massing_geometry::polygon::signed_area;
use massing_geometry::{
    difference, intersection, triangulate_polygon, triangulate_polygon_with_holes,
    triangulation_deviation, validate_triangulation, Error, MeshBuffers, MultiPolygon2D,
    OrientedRect, Point2, Point3, Polygon2D, Result,
};

/// Relative slack when counting grid cells along an axis, so rounding noise
/// on an exact multiple of the cell size does not open a new column
const GRID_TOLERANCE: f64 = 1e-6;

/// Clipped parts smaller than this fraction of their grid cell are dropped
const SLIVER_AREA_RATIO: f64 = 1e-5;

/// Tessellate the exposed roof of a slab at height `z`
///
/// `top` is the footprint of the slab directly above, if any. A
/// `cell_size` of `-1` (or any non-positive value) gives one cell per piece.
pub fn tessellate_roof(
    bottom: &MultiPolygon2D,
    top: Option<&MultiPolygon2D>,
    z: f64,
    cell_size: f64,
    options: &RoofOptions,
) -> Result<MeshBuffers> {
    let exposed = match top {
        Some(top) => difference(bottom, top),
        None => bottom.oriented(),
    };

    let mut mesh = MeshBuffers::new();

    for piece in exposed.iter().filter(|p| p.is_valid()) {
        let Some(envelope) = OrientedRect::of_points(&piece.outer) else {
            tracing::debug!(points = piece.outer.len(), "Roof piece has no envelope, skipping");
            continue;
        };

        let angle = envelope.alignment_angle();
        let aligned = piece.rotated(angle);
        let Some((min, max)) = aligned.bounds() else {
            continue;
        };

        for cell in grid_cells(min, max, cell_size) {
            let min_area = cell.area() * SLIVER_AREA_RATIO;
            let clipped = intersection(&aligned, &cell);
            let parts: Vec<&Polygon2D> = clipped.iter().filter(|p| p.area() > min_area).collect();
            if parts.is_empty() {
                continue;
            }

            let cell_id = mesh.allocate_cell()?;
            for part in parts {
                emit_cell_part(&mut mesh, &part.rotated(-angle), z, cell_id, options)?;
            }
        }
    }

    Ok(mesh)
}

/// Grid covering `[min, max]`, anchored at `min`, columns first
fn grid_cells(min: Point2<f64>, max: Point2<f64>, cell_size: f64) -> Vec<Polygon2D> {
    if cell_size <= 0.0 {
        return vec![Polygon2D::rectangle(min.x, min.y, max.x, max.y)];
    }

    let count = |extent: f64| {
        ((extent / cell_size * (1.0 - GRID_TOLERANCE)).ceil() as usize).max(1)
    };
    let (nx, ny) = (count(max.x - min.x), count(max.y - min.y));

    let mut cells = Vec::with_capacity(nx * ny);
    for ix in 0..nx {
        let x0 = min.x + ix as f64 * cell_size;
        for iy in 0..ny {
            let y0 = min.y + iy as f64 * cell_size;
            cells.push(Polygon2D::rectangle(x0, y0, x0 + cell_size, y0 + cell_size));
        }
    }
    cells
}

/// Triangulate one clipped polygon of a roof cell and append it at height `z`
fn emit_cell_part(
    mesh: &mut MeshBuffers,
    part: &Polygon2D,
    z: f64,
    cell_id: u32,
    options: &RoofOptions,
) -> Result<()> {
    let with_holes = options.retain_holes && !part.holes.is_empty();

    let (points, indices, area) = if with_holes {
        let indices = triangulate_polygon_with_holes(&part.outer, &part.holes)?;
        let points: Vec<Point2<f64>> = part.rings().flatten().cloned().collect();
        (points, indices, part.area())
    } else {
        let indices = triangulate_polygon(&part.outer)?;
        (part.outer.clone(), indices, signed_area(&part.outer).abs())
    };

    validate_triangulation(&indices, points.len())?;

    if let Some(tolerance) = options.deviation_tolerance {
        let deviation = triangulation_deviation(&points, &indices, area);
        if deviation > tolerance {
            return Err(Error::TriangulationDeviation {
                deviation,
                tolerance,
            });
        }
    }

    let vertices = points
        .iter()
        .map(|p| mesh.add_vertex(Point3::new(p.x, p.y, z)))
        .collect::<Result<Vec<u32>>>()?;
    for tri in indices.chunks_exact(3) {
        mesh.add_triangle(vertices[tri[0]], vertices[tri[1]], vertices[tri[2]], cell_id);
    }

    Ok(())
}
