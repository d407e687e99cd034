// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dataset-wide mesh generation
//!
//! Buildings are assembled independently in parallel, then concatenated in
//! ascending id order into one set of buffers. Each building's indices and
//! cell ids are rebased by the totals of the buildings before it, so every
//! index and cell id in the dataset is globally unique.

use crate::assembler::{assemble_building, BuildingMesh};
use crate::block::{BuildingId, FootprintBlock, SlabDescriptor};
use crate::config::MeshConfig;
use crate::error::{Error, Result};
use crate::merge::SkippedBand;
use crate::overlap::group_overlapping;
use massing_geometry::{MeshBuffers, Polygon2D};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use std::ops::Range;
use std::time::Instant;

/// Where one building lives inside the dataset buffers
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingEntry {
    pub id: BuildingId,
    /// Range into `BuildingDataset::buffers.coordinates`
    pub vertex_range: Range<usize>,
    /// Range into `indices` and `cell_ids`
    pub triangle_range: Range<usize>,
    /// First global cell id of the building
    pub cell_offset: u32,
    pub cell_count: u32,
    pub footprint: Option<Polygon2D>,
    pub slabs: Vec<SlabDescriptor>,
    pub skipped: Vec<SkippedBand>,
}

/// A building that could not be meshed
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingFailure {
    pub id: BuildingId,
    pub error: Error,
}

/// Concatenated meshes of every building in a dataset
#[derive(Debug, Clone, Default)]
pub struct BuildingDataset {
    pub buffers: MeshBuffers,
    /// Ascending by building id
    pub entries: Vec<BuildingEntry>,
    pub failures: Vec<BuildingFailure>,
    lookup: FxHashMap<BuildingId, usize>,
}

impl BuildingDataset {
    /// Concatenate assembled buildings, rebasing indices and cell ids
    ///
    /// Failed buildings are recorded and contribute nothing. Fails when the
    /// concatenated mesh outgrows `u32` indices or cell ids.
    pub fn from_results(results: Vec<(BuildingId, Result<BuildingMesh>)>) -> Result<Self> {
        let (vertices, triangles) = results
            .iter()
            .filter_map(|(_, r)| r.as_ref().ok())
            .fold((0, 0), |(v, t), mesh| {
                (v + mesh.buffers.vertex_count(), t + mesh.buffers.triangle_count())
            });

        let mut dataset = Self {
            buffers: MeshBuffers::with_capacity(vertices, triangles),
            ..Self::default()
        };

        for (id, result) in results {
            match result {
                Ok(mesh) => dataset.push(mesh)?,
                Err(error) => {
                    tracing::warn!(building = id, error = %error, "Building mesh failed, skipping");
                    dataset.failures.push(BuildingFailure { id, error });
                }
            }
        }

        Ok(dataset)
    }

    fn push(&mut self, mesh: BuildingMesh) -> Result<()> {
        let vertex_start = self.buffers.vertex_count();
        let triangle_start = self.buffers.triangle_count();
        let cell_offset = self.buffers.cell_count;

        self.buffers.append(&mesh.buffers)?;

        self.lookup.insert(mesh.id, self.entries.len());
        self.entries.push(BuildingEntry {
            id: mesh.id,
            vertex_range: vertex_start..self.buffers.vertex_count(),
            triangle_range: triangle_start..self.buffers.triangle_count(),
            cell_offset,
            cell_count: mesh.buffers.cell_count,
            footprint: mesh.footprint,
            slabs: mesh.slabs,
            skipped: mesh.skipped,
        });
        Ok(())
    }

    /// Entry of a building by id
    pub fn get(&self, id: BuildingId) -> Option<&BuildingEntry> {
        self.lookup.get(&id).map(|&i| &self.entries[i])
    }

    /// 3D coordinates emitted for a building
    pub fn coordinates(&self, id: BuildingId) -> Option<&[[f64; 3]]> {
        self.get(id)
            .map(|entry| &self.buffers.coordinates[entry.vertex_range.clone()])
    }

    /// Ground footprint of a building
    pub fn footprint(&self, id: BuildingId) -> Option<&Polygon2D> {
        self.get(id).and_then(|entry| entry.footprint.as_ref())
    }

    /// Copy of one building's mesh with indices and cell ids local to it
    pub fn building_buffers(&self, id: BuildingId) -> Option<MeshBuffers> {
        let entry = self.get(id)?;
        let base = u32::try_from(entry.vertex_range.start).ok()?;
        let triangles = entry.triangle_range.clone();

        Some(MeshBuffers {
            coordinates: self.buffers.coordinates[entry.vertex_range.clone()].to_vec(),
            indices: self.buffers.indices[triangles.clone()]
                .iter()
                .map(|t| [t[0] - base, t[1] - base, t[2] - base])
                .collect(),
            cell_ids: self.buffers.cell_ids[triangles]
                .iter()
                .map(|&c| c - entry.cell_offset)
                .collect(),
            cell_count: entry.cell_count,
            normals: self
                .buffers
                .normals
                .as_ref()
                .map(|n| n[entry.vertex_range.clone()].to_vec()),
        })
    }

    /// Number of meshed buildings
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group footprint rows by building id
pub fn group_blocks<I>(rows: I) -> BTreeMap<BuildingId, Vec<FootprintBlock>>
where
    I: IntoIterator<Item = (BuildingId, FootprintBlock)>,
{
    let mut buildings: BTreeMap<BuildingId, Vec<FootprintBlock>> = BTreeMap::new();
    for (id, block) in rows {
        buildings.entry(id).or_default().push(block);
    }
    buildings
}

/// Mesh every building of a dataset
///
/// Per-building failures are logged and collected in
/// [`BuildingDataset::failures`]; only a thread pool that cannot be built, or
/// a dataset too large for `u32` indices and cell ids, fails the whole call.
pub fn build_dataset<I>(rows: I, config: &MeshConfig) -> Result<BuildingDataset>
where
    I: IntoIterator<Item = (BuildingId, FootprintBlock)>,
{
    let start = Instant::now();

    let mut buildings = group_blocks(rows);
    if config.merge_overlapping {
        buildings = group_overlapping(buildings);
    }

    tracing::info!(
        buildings = buildings.len(),
        tessellation_size = config.tessellation_size,
        "Starting building mesh generation"
    );

    let jobs: Vec<(BuildingId, Vec<FootprintBlock>)> = buildings.into_iter().collect();
    let assemble = || -> Vec<(BuildingId, Result<BuildingMesh>)> {
        jobs.par_iter()
            .map(|(id, blocks)| (*id, assemble_building(*id, blocks, config)))
            .collect()
    };

    let results = match config.worker_threads {
        Some(threads) => rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?
            .install(assemble),
        None => assemble(),
    };
    let assembly_time = start.elapsed();

    let dataset = BuildingDataset::from_results(results)?;

    tracing::info!(
        buildings = dataset.len(),
        failed = dataset.failures.len(),
        vertices = dataset.buffers.vertex_count(),
        triangles = dataset.buffers.triangle_count(),
        cells = dataset.buffers.cell_count,
        assembly_ms = assembly_time.as_millis() as u64,
        total_ms = start.elapsed().as_millis() as u64,
        "Building mesh generation complete"
    );

    Ok(dataset)
}
