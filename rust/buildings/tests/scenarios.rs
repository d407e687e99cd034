// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end scenarios over the public API

use approx::assert_relative_eq;
use massing_buildings::{
    assemble_building, build_dataset, extrude_panels, merge_blocks, segment_ring,
    tessellate_roof, FootprintBlock, LayerOptions, LayerRecord, MeshConfig, RoofOptions,
    WHOLE_EXTENT,
};
use massing_geometry::Polygon2D;
use rustc_hash::FxHashSet;

fn block(min_height: f64, height: f64, polygon: Polygon2D) -> FootprintBlock {
    FootprintBlock::new(min_height, height, polygon).unwrap()
}

#[test]
fn rectangle_block_gives_one_slab_three_bands_and_bbox_grid() {
    let footprint = Polygon2D::rectangle(0.0, 0.0, 6.0, 9.0);
    let merged = merge_blocks(&[block(0.0, 9.0, footprint)]);

    assert_eq!(merged.slabs.len(), 1);
    let slab = &merged.slabs[0];
    assert_eq!((slab.min_height, slab.height), (0.0, 9.0));

    let panels = segment_ring(&slab.footprint.polygons[0].outer, 3.0);
    let walls = extrude_panels(&panels, slab.min_height, slab.height, 3.0).unwrap();
    let bands: FxHashSet<u64> = walls
        .coordinates
        .iter()
        .map(|c| (c[2] * 1000.0).round() as u64)
        .collect();
    // Band edges at 0, 3, 6 and 9
    assert_eq!(bands.len(), 4);

    let roof = tessellate_roof(&slab.footprint, None, slab.height, 3.0, &RoofOptions::default())
        .unwrap();
    assert_eq!(roof.cell_count, (6 * 9) / 9);
}

#[test]
fn nested_blocks_merge_into_three_bands() {
    let p1 = Polygon2D::rectangle(0.0, 0.0, 10.0, 10.0);
    let p2 = Polygon2D::rectangle(2.0, 2.0, 5.0, 5.0);
    let merged = merge_blocks(&[block(0.0, 6.0, p1), block(3.0, 9.0, p2)]);

    let bands: Vec<(f64, f64)> = merged
        .slabs
        .iter()
        .map(|s| (s.min_height, s.height))
        .collect();
    assert_eq!(bands, vec![(0.0, 3.0), (3.0, 6.0), (6.0, 9.0)]);

    assert_relative_eq!(merged.slabs[0].footprint.area(), 100.0, epsilon = 1e-9);
    assert_relative_eq!(merged.slabs[1].footprint.area(), 100.0, epsilon = 1e-9);
    assert_relative_eq!(merged.slabs[2].footprint.area(), 9.0, epsilon = 1e-9);
    assert!(merged.skipped.is_empty());
}

#[test]
fn non_multiple_ring_has_no_truncated_panel() {
    // Perimeter 2 * (7 + 4) = 22 with target 5 -> 4 panels of 5.5
    let ring = Polygon2D::rectangle(0.0, 0.0, 7.0, 4.0).outer;
    let panels = segment_ring(&ring, 5.0);

    assert_eq!(panels.len(), 4);
    for panel in &panels {
        assert_relative_eq!(panel.length(), 5.5, epsilon = 1e-9);
    }
}

#[test]
fn whole_extent_gives_one_roof_cell_and_one_band_per_panel() {
    let blocks = [block(0.0, 12.0, Polygon2D::rectangle(0.0, 0.0, 8.0, 5.0))];
    let mesh = assemble_building(1, &blocks, &MeshConfig::with_size(WHOLE_EXTENT)).unwrap();

    // One roof cell plus one (panel, band) cell for the single closed panel
    assert_eq!(mesh.buffers.cell_count, 2);
    let roof_triangles = mesh
        .buffers
        .cell_ids
        .iter()
        .filter(|&&id| id == 0)
        .count();
    assert_eq!(roof_triangles, 2);
    // 4 wall quads
    assert_eq!(mesh.buffers.triangle_count() - roof_triangles, 8);
}

#[test]
fn repeated_runs_are_identical() {
    let rows = || {
        vec![
            (3, block(0.0, 6.0, Polygon2D::rectangle(0.0, 0.0, 10.0, 10.0))),
            (3, block(3.0, 9.0, Polygon2D::rectangle(2.0, 2.0, 5.0, 5.0))),
            (1, block(0.0, 4.0, Polygon2D::rectangle(20.0, 0.0, 24.0, 7.0).rotated(0.3))),
            (2, block(1.0, 5.0, Polygon2D::rectangle(40.0, 0.0, 43.0, 3.0))),
        ]
    };
    let config = MeshConfig::with_size(2.0);

    let first = build_dataset(rows(), &config).unwrap();
    let second = build_dataset(rows(), &config).unwrap();

    assert_eq!(first.buffers, second.buffers);
    assert_eq!(first.entries, second.entries);
}

#[test]
fn dataset_ids_are_globally_unique_and_contiguous() {
    let rows = vec![
        (10, block(0.0, 6.0, Polygon2D::rectangle(0.0, 0.0, 6.0, 6.0))),
        (20, block(0.0, 3.0, Polygon2D::rectangle(10.0, 0.0, 13.0, 9.0))),
        (30, block(2.0, 8.0, Polygon2D::rectangle(20.0, 0.0, 25.0, 5.0))),
    ];
    let dataset = build_dataset(rows, &MeshConfig::with_size(3.0)).unwrap();

    assert!(dataset.buffers.is_consistent());
    let used: FxHashSet<u32> = dataset.buffers.cell_ids.iter().copied().collect();
    assert_eq!(used.len() as u32, dataset.buffers.cell_count);

    let mut offset = 0;
    for entry in &dataset.entries {
        assert_eq!(entry.cell_offset, offset);
        for &id in &dataset.buffers.cell_ids[entry.triangle_range.clone()] {
            assert!((entry.cell_offset..entry.cell_offset + entry.cell_count).contains(&id));
        }
        offset += entry.cell_count;
    }
}

#[test]
fn layer_record_covers_every_building() {
    let rows = vec![
        (1, block(0.0, 3.0, Polygon2D::rectangle(0.0, 0.0, 3.0, 3.0))),
        (2, block(0.0, 3.0, Polygon2D::rectangle(5.0, 0.0, 8.0, 3.0))),
    ];
    let dataset = build_dataset(rows, &MeshConfig::with_size(3.0)).unwrap();
    let record = LayerRecord::from_dataset(&dataset, &LayerOptions::default());

    let triangles: usize = record.data.iter().map(|f| f.geometry.ids.len()).sum();
    assert_eq!(triangles, dataset.buffers.triangle_count());
}
