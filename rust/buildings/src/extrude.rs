// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vertical extrusion of wall panels into banded quads

use crate::tiling::even_tiling;
use crate::walls::Panel;
use massing_geometry::{MeshBuffers, Point3, Result};

/// Extrude wall panels between two heights
///
/// The height span is tiled into equal bands of roughly `target_size`
/// (`-1` for a single band). Every (panel, band) pair is one cell; each
/// panel edge becomes a quad with its own four vertices, split into two
/// triangles sharing the cell id.
pub fn extrude_panels(
    panels: &[Panel],
    min_height: f64,
    height: f64,
    target_size: f64,
) -> Result<MeshBuffers> {
    let Some((bands, size)) = even_tiling(height - min_height, target_size) else {
        return Ok(MeshBuffers::new());
    };

    let edge_count: usize = panels.iter().map(Panel::edge_count).sum();
    let quads = edge_count * bands;
    let mut mesh = MeshBuffers::with_capacity(quads * 4, quads * 2);

    for panel in panels.iter().filter(|p| p.edge_count() > 0) {
        for band in 0..bands {
            let z0 = min_height + band as f64 * size;
            // Snap the last band so the wall ends exactly at the slab top
            let z1 = if band + 1 == bands {
                height
            } else {
                min_height + (band + 1) as f64 * size
            };

            let cell = mesh.allocate_cell()?;

            for edge in panel.points.windows(2) {
                let (p0, p1) = (edge[0], edge[1]);
                let i0 = mesh.add_vertex(Point3::new(p0.x, p0.y, z0))?;
                let i1 = mesh.add_vertex(Point3::new(p1.x, p1.y, z0))?;
                let i2 = mesh.add_vertex(Point3::new(p0.x, p0.y, z1))?;
                let i3 = mesh.add_vertex(Point3::new(p1.x, p1.y, z1))?;

                mesh.add_triangle(i0, i1, i2, cell);
                mesh.add_triangle(i1, i3, i2, cell);
            }
        }
    }

    Ok(mesh)
}
