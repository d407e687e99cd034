// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::block::BuildingId;
use thiserror::Error;

/// Result type for building mesh operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while meshing buildings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid footprint block: {0}")]
    InvalidBlock(String),

    #[error("Geometry error: {0}")]
    Geometry(#[from] massing_geometry::Error),

    #[error("Building {building}, slab {slab}: {source}")]
    Building {
        building: BuildingId,
        slab: usize,
        source: massing_geometry::Error,
    },

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}
