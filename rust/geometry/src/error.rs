// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Invalid triangulation: {triangles} triangles from {index_count} indices")]
    InvalidTriangulation { triangles: usize, index_count: usize },

    #[error("Triangulation deviates from polygon area by {deviation:.6} (tolerance {tolerance})")]
    TriangulationDeviation { deviation: f64, tolerance: f64 },

    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("Mesh vertex count {0} exceeds u32 indices")]
    VertexOverflow(usize),

    #[error("Mesh cell ids exhausted after {0} cells")]
    CellOverflow(u32),
}
