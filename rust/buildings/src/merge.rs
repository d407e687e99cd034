// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Merging a building's footprint blocks into height slabs
//!
//! The distinct base and top heights of all blocks cut the building into
//! bands. Each band's footprint is the union of every block active through
//! the whole band, so overlapping blocks never produce overlapping slabs.

use crate::block::{FootprintBlock, Slab};
use massing_geometry::{union_polygons, Polygon2D};

/// Why a height band produced no geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No block spans the band
    Gap,
    /// The union of the active blocks is empty or degenerate
    EmptyFootprint,
    /// The slab produced neither roof nor wall triangles
    NoGeometry,
}

/// Diagnostics marker for a band that contributes no geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkippedBand {
    pub min_height: f64,
    pub height: f64,
    pub reason: SkipReason,
}

/// Slabs of one building in ascending height order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergedSlabs {
    pub slabs: Vec<Slab>,
    pub skipped: Vec<SkippedBand>,
}

/// Merge footprint blocks into non-overlapping, ascending slabs
pub fn merge_blocks(blocks: &[FootprintBlock]) -> MergedSlabs {
    let mut levels: Vec<f64> = blocks
        .iter()
        .flat_map(|b| [b.min_height, b.height])
        .filter(|h| h.is_finite())
        .collect();
    levels.sort_by(f64::total_cmp);
    levels.dedup();

    let mut merged = MergedSlabs::default();

    for band in levels.windows(2) {
        let (lo, hi) = (band[0], band[1]);

        let active: Vec<Polygon2D> = blocks
            .iter()
            .filter(|b| b.is_active_at(lo))
            .flat_map(|b| b.geometry.iter().cloned())
            .collect();

        if active.is_empty() {
            merged.skipped.push(SkippedBand {
                min_height: lo,
                height: hi,
                reason: SkipReason::Gap,
            });
            continue;
        }

        // Union output is already oriented: exteriors CCW, holes CW
        let footprint = union_polygons(&active);
        if footprint.is_empty() {
            tracing::debug!(min_height = lo, height = hi, "Band footprint unions to empty, skipping");
            merged.skipped.push(SkippedBand {
                min_height: lo,
                height: hi,
                reason: SkipReason::EmptyFootprint,
            });
            continue;
        }

        merged.slabs.push(Slab {
            min_height: lo,
            height: hi,
            footprint,
        });
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use massing_geometry::polygon::signed_area;
    use massing_geometry::Point2;

    fn block(min_height: f64, height: f64, polygon: Polygon2D) -> FootprintBlock {
        FootprintBlock::new(min_height, height, polygon).unwrap()
    }

    #[test]
    fn test_single_block_is_one_slab() {
        let merged = merge_blocks(&[block(0.0, 9.0, Polygon2D::rectangle(0.0, 0.0, 6.0, 9.0))]);

        assert_eq!(merged.slabs.len(), 1);
        assert!(merged.skipped.is_empty());
        let slab = &merged.slabs[0];
        assert_eq!((slab.min_height, slab.height), (0.0, 9.0));
        assert_relative_eq!(slab.footprint.area(), 54.0, epsilon = 1e-9);
    }

    #[test]
    fn test_lone_block_keeps_its_exact_outline() {
        let polygon = Polygon2D::rectangle(583_000.0, 4_507_000.0, 583_030.0, 4_507_012.0)
            .rotated(1.37);
        let merged = merge_blocks(&[block(0.0, 9.0, polygon.clone())]);

        assert_eq!(merged.slabs[0].footprint.polygons, vec![polygon.oriented()]);
    }

    #[test]
    fn test_nested_blocks_produce_three_bands() {
        let p1 = Polygon2D::rectangle(0.0, 0.0, 10.0, 10.0);
        let p2 = Polygon2D::rectangle(2.0, 2.0, 5.0, 5.0);
        let merged = merge_blocks(&[block(0.0, 6.0, p1), block(3.0, 9.0, p2)]);

        let bands: Vec<_> = merged.slabs.iter().map(|s| (s.min_height, s.height)).collect();
        assert_eq!(bands, vec![(0.0, 3.0), (3.0, 6.0), (6.0, 9.0)]);
        assert_relative_eq!(merged.slabs[0].footprint.area(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(merged.slabs[1].footprint.area(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(merged.slabs[2].footprint.area(), 9.0, epsilon = 1e-9);
    }

    #[test]
    fn test_gap_between_blocks_is_skipped() {
        let square = Polygon2D::rectangle(0.0, 0.0, 1.0, 1.0);
        let merged = merge_blocks(&[block(0.0, 3.0, square.clone()), block(5.0, 8.0, square)]);

        assert_eq!(merged.slabs.len(), 2);
        assert_eq!(
            merged.skipped,
            vec![SkippedBand {
                min_height: 3.0,
                height: 5.0,
                reason: SkipReason::Gap
            }]
        );
    }

    #[test]
    fn test_slab_rings_are_counter_clockwise() {
        let clockwise = Polygon2D::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 3.0),
            Point2::new(3.0, 3.0),
            Point2::new(3.0, 0.0),
        ]);
        let merged = merge_blocks(&[block(0.0, 3.0, clockwise)]);

        assert!(signed_area(&merged.slabs[0].footprint.polygons[0].outer) > 0.0);
    }

    #[test]
    fn test_degenerate_footprint_skips_band() {
        let sliver = Polygon2D::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(2.0, 0.0),
        ]);
        let merged = merge_blocks(&[block(0.0, 3.0, sliver)]);

        assert!(merged.slabs.is_empty());
        assert_eq!(merged.skipped[0].reason, SkipReason::EmptyFootprint);
    }
}
