// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Massing Buildings
//!
//! Turns building footprint blocks into cell-addressed 3D meshes. Blocks of a
//! building are merged into height slabs; each slab contributes a gridded
//! roof over its exposed area and walls cut into uniform panels and bands.
//! Every roof cell and wall panel band gets its own cell id so downstream
//! sampling can attach one value per cell.
//!
//! ```rust,ignore
//! use massing_buildings::{build_dataset, FootprintBlock, MeshConfig};
//! use massing_geometry::Polygon2D;
//!
//! let block = FootprintBlock::new(0.0, 9.0, Polygon2D::rectangle(0.0, 0.0, 6.0, 9.0))?;
//! let dataset = build_dataset(vec![(1, block)], &MeshConfig::with_size(3.0))?;
//! println!("{} cells", dataset.buffers.cell_count);
//! ```

pub mod assembler;
pub mod block;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extrude;
pub mod layer;
pub mod merge;
pub mod overlap;
pub mod roof;
mod tiling;
pub mod walls;

pub use assembler::{assemble_building, BuildingMesh};
pub use block::{BuildingId, FootprintBlock, Slab, SlabDescriptor};
pub use config::{MeshConfig, RoofOptions, WHOLE_EXTENT};
pub use dataset::{build_dataset, group_blocks, BuildingDataset, BuildingEntry, BuildingFailure};
pub use error::{Error, Result};
pub use extrude::extrude_panels;
pub use layer::{FeatureGeometry, LayerFeature, LayerOptions, LayerRecord};
pub use merge::{merge_blocks, MergedSlabs, SkipReason, SkippedBand};
pub use overlap::group_overlapping;
pub use roof::tessellate_roof;
pub use walls::{segment_footprint, segment_ring, Panel};
