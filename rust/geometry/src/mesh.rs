// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh buffers with per-triangle cell ids

use crate::{Error, Result};
use nalgebra::{Point3, Vector3};

/// Index of the vertex that follows `count` vertices, if it fits the `u32`
/// index buffer
#[inline]
pub fn vertex_index(count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| Error::VertexOverflow(count))
}

/// Triangle mesh whose triangles are grouped into addressable cells
///
/// Every triangle carries the id of the cell it belongs to; ids are
/// allocated sequentially from zero, so `cell_count` is both the number of
/// cells and the next id to hand out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffers {
    /// Vertex positions
    pub coordinates: Vec<[f64; 3]>,
    /// Triangle vertex indices
    pub indices: Vec<[u32; 3]>,
    /// Cell id of each triangle
    pub cell_ids: Vec<u32>,
    /// Number of allocated cell ids
    pub cell_count: u32,
    /// Per-vertex normals, when computed
    pub normals: Option<Vec<[f32; 3]>>,
}

impl MeshBuffers {
    /// Create empty buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create buffers with capacity
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            coordinates: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(triangle_count),
            cell_ids: Vec::with_capacity(triangle_count),
            cell_count: 0,
            normals: None,
        }
    }

    /// Add a vertex, returning its index
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) -> Result<u32> {
        let index = vertex_index(self.coordinates.len())?;
        self.coordinates.push([position.x, position.y, position.z]);
        Ok(index)
    }

    /// Hand out the next cell id
    #[inline]
    pub fn allocate_cell(&mut self) -> Result<u32> {
        let id = self.cell_count;
        self.cell_count = id.checked_add(1).ok_or(Error::CellOverflow(id))?;
        Ok(id)
    }

    /// Add a triangle belonging to `cell_id`
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32, cell_id: u32) {
        debug_assert!(cell_id < self.cell_count);
        self.indices.push([i0, i1, i2]);
        self.cell_ids.push(cell_id);
    }

    /// Append another mesh, offsetting its indices by our vertex count and
    /// its cell ids by our cell count
    ///
    /// Fails without touching either mesh when the merged vertices or cells
    /// would not fit `u32` ids.
    pub fn append(&mut self, other: &MeshBuffers) -> Result<()> {
        if other.is_empty() {
            return Ok(());
        }

        let vertex_offset = vertex_index(self.coordinates.len())?;
        vertex_index(self.coordinates.len() + other.coordinates.len())?;
        let cell_offset = self.cell_count;
        let cell_count = cell_offset
            .checked_add(other.cell_count)
            .ok_or(Error::CellOverflow(cell_offset))?;

        // Normals only survive when both sides carry them
        self.normals = match (self.normals.take(), &other.normals) {
            (Some(mut ours), Some(theirs)) => {
                ours.extend_from_slice(theirs);
                Some(ours)
            }
            (None, Some(theirs)) if self.coordinates.is_empty() => Some(theirs.clone()),
            _ => None,
        };

        self.coordinates.reserve(other.coordinates.len());
        self.indices.reserve(other.indices.len());
        self.cell_ids.reserve(other.cell_ids.len());

        self.coordinates.extend_from_slice(&other.coordinates);
        self.indices.extend(
            other
                .indices
                .iter()
                .map(|t| [t[0] + vertex_offset, t[1] + vertex_offset, t[2] + vertex_offset]),
        );
        self.cell_ids
            .extend(other.cell_ids.iter().map(|&id| id + cell_offset));
        self.cell_count = cell_count;
        Ok(())
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.coordinates.len()
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Check the buffer invariants: one id per triangle, every index in
    /// range, every id allocated
    pub fn is_consistent(&self) -> bool {
        self.indices.len() == self.cell_ids.len()
            && self
                .indices
                .iter()
                .flatten()
                .all(|&i| (i as usize) < self.coordinates.len())
            && self.cell_ids.iter().all(|&id| id < self.cell_count)
            && self
                .normals
                .as_ref()
                .map_or(true, |n| n.len() == self.coordinates.len())
    }

    /// Recompute smooth per-vertex normals from the triangles
    ///
    /// Vertices are not shared between quads or roof cells, so the result is
    /// a flat normal per cell.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vector3::<f64>::zeros(); self.coordinates.len()];

        for tri in &self.indices {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let v0 = Point3::from(self.coordinates[i0]);
            let v1 = Point3::from(self.coordinates[i1]);
            let v2 = Point3::from(self.coordinates[i2]);

            let normal = (v1 - v0).cross(&(v2 - v0));

            normals[i0] += normal;
            normals[i1] += normal;
            normals[i2] += normal;
        }

        self.normals = Some(
            normals
                .into_iter()
                .map(|n| {
                    let n = n.try_normalize(1e-12).unwrap_or_else(Vector3::z);
                    [n.x as f32, n.y as f32, n.z as f32]
                })
                .collect(),
        );
    }
}
