// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interchange record for rendering layers
//!
//! Flattens a dataset into the layer structure consumed by map viewers:
//! one feature per building carrying flat coordinate, index and cell id
//! arrays plus the slab descriptors used for spatial joins.

use crate::dataset::BuildingDataset;
use serde::Serialize;

/// Layer metadata written alongside the geometry
#[derive(Debug, Clone, PartialEq)]
pub struct LayerOptions {
    pub id: String,
    pub layer_type: String,
    pub render_style: Vec<String>,
    pub style_key: String,
    pub visible: bool,
    pub selectable: bool,
    pub skip: bool,
}

impl Default for LayerOptions {
    fn default() -> Self {
        Self {
            id: "buildings".to_string(),
            layer_type: "BUILDINGS_LAYER".to_string(),
            render_style: vec!["SMOOTH_COLOR".to_string()],
            style_key: "building".to_string(),
            visible: true,
            selectable: true,
            skip: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub layer_type: String,
    pub render_style: Vec<String>,
    pub style_key: String,
    pub visible: bool,
    pub selectable: bool,
    pub skip: bool,
    pub data: Vec<LayerFeature>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerFeature {
    pub geometry: FeatureGeometry,
}

/// Flat buffers of one building; indices and ids start at zero
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureGeometry {
    pub coordinates: Vec<f64>,
    pub indices: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normals: Option<Vec<f32>>,
    pub ids: Vec<u32>,
    pub oriented_envelope: Vec<[f64; 8]>,
    pub section_footprint: Vec<Vec<f64>>,
}

impl LayerRecord {
    /// Build the layer record, one feature per meshed building in id order
    pub fn from_dataset(dataset: &BuildingDataset, options: &LayerOptions) -> Self {
        let data = dataset
            .entries
            .iter()
            .filter_map(|entry| {
                let buffers = dataset.building_buffers(entry.id)?;
                Some(LayerFeature {
                    geometry: FeatureGeometry {
                        coordinates: buffers.coordinates.iter().flatten().copied().collect(),
                        indices: buffers.indices.iter().flatten().copied().collect(),
                        normals: buffers
                            .normals
                            .map(|n| n.iter().flatten().copied().collect()),
                        ids: buffers.cell_ids,
                        oriented_envelope: entry
                            .slabs
                            .iter()
                            .map(|s| s.oriented_envelope)
                            .collect(),
                        section_footprint: entry
                            .slabs
                            .iter()
                            .map(|s| s.section_footprint.clone())
                            .collect(),
                    },
                })
            })
            .collect();

        Self {
            id: options.id.clone(),
            layer_type: options.layer_type.clone(),
            render_style: options.render_style.clone(),
            style_key: options.style_key.clone(),
            visible: options.visible,
            selectable: options.selectable,
            skip: options.skip,
            data,
        }
    }
}
