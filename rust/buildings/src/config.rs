// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration, optionally loaded from environment variables.

use std::str::FromStr;

/// Tessellation size meaning "one cell or panel covering the whole extent".
pub const WHOLE_EXTENT: f64 = -1.0;

/// Roof tessellation options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoofOptions {
    /// Triangulate clipped roof cells with their holes instead of the
    /// exterior ring only.
    pub retain_holes: bool,
    /// Maximum relative difference between triangulated area and cell area.
    /// `None` disables the check.
    pub deviation_tolerance: Option<f64>,
}

/// Mesh pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshConfig {
    /// Roof cell edge, wall panel length and wall band height.
    /// [`WHOLE_EXTENT`] (-1) uses one cell/panel/band for the whole extent.
    pub tessellation_size: f64,
    /// Compute per-vertex normals for every building.
    pub compute_normals: bool,
    /// Merge buildings whose footprints overlap before meshing.
    pub merge_overlapping: bool,
    /// Worker threads for per-building assembly (global rayon pool when `None`).
    pub worker_threads: Option<usize>,
    /// Roof tessellation options.
    pub roof: RoofOptions,
}

impl MeshConfig {
    /// Configuration with the given tessellation size and defaults otherwise.
    pub fn with_size(tessellation_size: f64) -> Self {
        Self {
            tessellation_size,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tessellation_size: env_or("MASSING_TESSELLATION_SIZE", defaults.tessellation_size),
            compute_normals: env_or("MASSING_COMPUTE_NORMALS", defaults.compute_normals),
            merge_overlapping: env_or("MASSING_MERGE_OVERLAPPING", defaults.merge_overlapping),
            worker_threads: std::env::var("MASSING_WORKER_THREADS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0),
            roof: RoofOptions {
                retain_holes: env_or("MASSING_RETAIN_ROOF_HOLES", defaults.roof.retain_holes),
                deviation_tolerance: std::env::var("MASSING_DEVIATION_TOLERANCE")
                    .ok()
                    .and_then(|v| v.parse().ok()),
            },
        }
    }
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            tessellation_size: WHOLE_EXTENT,
            compute_normals: true,
            merge_overlapping: false,
            worker_threads: None,
            roof: RoofOptions::default(),
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_whole_extent() {
        let config = MeshConfig::default();
        assert_eq!(config.tessellation_size, WHOLE_EXTENT);
        assert!(config.compute_normals);
        assert!(!config.merge_overlapping);
        assert!(config.roof.deviation_tolerance.is_none());
    }

    #[test]
    fn test_with_size_keeps_other_defaults() {
        let config = MeshConfig::with_size(3.0);
        assert_eq!(config.tessellation_size, 3.0);
        assert_eq!(config.roof, RoofOptions::default());
    }

    #[test]
    fn test_env_or_falls_back_on_missing_or_garbage() {
        assert_eq!(env_or("MASSING_TEST_UNSET_VARIABLE", 7usize), 7);
    }
}
