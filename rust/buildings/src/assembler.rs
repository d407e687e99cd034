// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-building mesh assembly
//!
//! Slabs are processed bottom-up. Each slab contributes its exposed roof
//! followed by its walls; both are appended to the building's buffers with
//! indices and cell ids offset by what earlier slabs already emitted.

use crate::block::{BuildingId, FootprintBlock, SlabDescriptor};
use crate::config::MeshConfig;
use crate::error::{Error, Result};
use crate::extrude::extrude_panels;
use crate::merge::{merge_blocks, SkipReason, SkippedBand};
use crate::roof::tessellate_roof;
use crate::walls::segment_footprint;
use massing_geometry::{MeshBuffers, Polygon2D};

/// Mesh and descriptors of one building
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingMesh {
    pub id: BuildingId,
    /// Roof and wall triangles of all slabs, ids local to the building
    pub buffers: MeshBuffers,
    /// One descriptor per emitted slab, ascending
    pub slabs: Vec<SlabDescriptor>,
    /// Largest polygon of the lowest slab
    pub footprint: Option<Polygon2D>,
    /// Bands and slabs that contributed no geometry
    pub skipped: Vec<SkippedBand>,
}

/// Build the mesh of one building from its footprint blocks
///
/// Empty bands are skipped silently (and listed in `skipped`); a roof that
/// cannot be triangulated, or a mesh that outgrows `u32` ids, aborts the
/// building with the failing slab index.
pub fn assemble_building(
    id: BuildingId,
    blocks: &[FootprintBlock],
    config: &MeshConfig,
) -> Result<BuildingMesh> {
    let merged = merge_blocks(blocks);
    let size = config.tessellation_size;

    let mut buffers = MeshBuffers::new();
    let mut slabs = Vec::with_capacity(merged.slabs.len());
    let mut skipped = merged.skipped;

    for (i, slab) in merged.slabs.iter().enumerate() {
        let top = merged.slabs.get(i + 1).map(|s| &s.footprint);
        let in_slab = |source| Error::Building {
            building: id,
            slab: i,
            source,
        };

        let roof = tessellate_roof(&slab.footprint, top, slab.height, size, &config.roof)
            .map_err(in_slab)?;

        let panels = segment_footprint(&slab.footprint, size);
        let walls =
            extrude_panels(&panels, slab.min_height, slab.height, size).map_err(in_slab)?;

        if roof.is_empty() && walls.is_empty() {
            tracing::debug!(
                building = id,
                slab = i,
                min_height = slab.min_height,
                height = slab.height,
                "Slab produced no geometry"
            );
            skipped.push(SkippedBand {
                min_height: slab.min_height,
                height: slab.height,
                reason: SkipReason::NoGeometry,
            });
            continue;
        }

        buffers
            .append(&roof)
            .and_then(|()| buffers.append(&walls))
            .map_err(in_slab)?;

        if let Some(descriptor) = slab.descriptor() {
            slabs.push(descriptor);
        }
    }

    if config.compute_normals && !buffers.is_empty() {
        buffers.compute_normals();
    }

    let footprint = merged
        .slabs
        .first()
        .and_then(|s| s.footprint.largest())
        .cloned();

    Ok(BuildingMesh {
        id,
        buffers,
        slabs,
        footprint,
        skipped,
    })
}
