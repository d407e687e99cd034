// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Footprint blocks, merged slabs and slab descriptors

use crate::error::{Error, Result};
use massing_geometry::polygon::flatten_closed;
use massing_geometry::{MultiPolygon2D, OrientedRect};

/// Identifier of a building in the input dataset
pub type BuildingId = u64;

/// One raw footprint block: a footprint extruded between two heights
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintBlock {
    /// Base height (>= 0)
    pub min_height: f64,
    /// Top height (> min_height)
    pub height: f64,
    /// Footprint in projected, linear-unit coordinates
    pub geometry: MultiPolygon2D,
}

impl FootprintBlock {
    /// Create a block, validating heights and geometry
    pub fn new(min_height: f64, height: f64, geometry: impl Into<MultiPolygon2D>) -> Result<Self> {
        let geometry = geometry.into();

        if !min_height.is_finite() || !height.is_finite() {
            return Err(Error::InvalidBlock(format!(
                "non-finite heights [{}, {})",
                min_height, height
            )));
        }
        if min_height < 0.0 {
            return Err(Error::InvalidBlock(format!(
                "negative base height {}",
                min_height
            )));
        }
        if height <= min_height {
            return Err(Error::InvalidBlock(format!(
                "top height {} not above base height {}",
                height, min_height
            )));
        }
        if !geometry.iter().any(|p| p.outer.len() >= 3) {
            return Err(Error::InvalidBlock(
                "footprint has no ring with at least 3 points".to_string(),
            ));
        }

        Ok(Self {
            min_height,
            height,
            geometry,
        })
    }

    /// Whether the block covers the whole band starting at `level`
    #[inline]
    pub fn is_active_at(&self, level: f64) -> bool {
        self.min_height <= level && self.height > level
    }
}

/// Height band of a building with one merged footprint
#[derive(Debug, Clone, PartialEq)]
pub struct Slab {
    pub min_height: f64,
    pub height: f64,
    /// Exterior rings counter-clockwise, holes clockwise
    pub footprint: MultiPolygon2D,
}

impl Slab {
    /// Envelope and exterior ring of the slab's largest polygon
    pub fn descriptor(&self) -> Option<SlabDescriptor> {
        let polygon = self.footprint.largest()?;
        let envelope = OrientedRect::of_points(&polygon.outer)?;
        Some(SlabDescriptor {
            oriented_envelope: envelope.flattened(),
            section_footprint: flatten_closed(&polygon.outer),
        })
    }
}

/// Per-slab geometry used by spatial joins downstream
#[derive(Debug, Clone, PartialEq)]
pub struct SlabDescriptor {
    /// Four corners of the minimum rotated rectangle, flattened
    pub oriented_envelope: [f64; 8],
    /// Exterior ring of the footprint, flattened, closing point included
    pub section_footprint: Vec<f64>,
}
