// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Grouping of buildings whose footprints overlap

use crate::block::{BuildingId, FootprintBlock};
use massing_geometry::polygon::bounds_overlap;
use massing_geometry::{intersects, union_polygons, MultiPolygon2D, Polygon2D};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

/// Merge buildings whose footprints share interior area
///
/// Overlap is transitive: a chain of pairwise-overlapping buildings ends up
/// in one group. Each group keeps the smallest building id and the blocks of
/// all its members.
pub fn group_overlapping(
    buildings: BTreeMap<BuildingId, Vec<FootprintBlock>>,
) -> BTreeMap<BuildingId, Vec<FootprintBlock>> {
    let entries: Vec<(BuildingId, Vec<FootprintBlock>)> = buildings.into_iter().collect();
    let n = entries.len();

    let footprints: Vec<MultiPolygon2D> = entries
        .iter()
        .map(|(_, blocks)| {
            let polygons: Vec<Polygon2D> = blocks
                .iter()
                .flat_map(|b| b.geometry.iter().cloned())
                .collect();
            union_polygons(&polygons)
        })
        .collect();

    // Sweep along x so only buildings with overlapping x-extents are tested
    let mut sorted: Vec<_> = footprints
        .iter()
        .enumerate()
        .filter_map(|(i, f)| f.bounds().map(|b| (i, b)))
        .collect();
    sorted.sort_by(|a, b| a.1 .0.x.total_cmp(&b.1 .0.x));

    let mut parent: Vec<usize> = (0..n).collect();

    for (k, (i, bi)) in sorted.iter().enumerate() {
        for (j, bj) in &sorted[k + 1..] {
            if bj.0.x > bi.1.x {
                break;
            }
            if bounds_overlap(bi, bj) && intersects(&footprints[*i], &footprints[*j]) {
                union(&mut parent, *i, *j);
            }
        }
    }

    let mut groups: FxHashMap<usize, Vec<usize>> = FxHashMap::default();
    for i in 0..n {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(i);
    }

    let merged_count = n - groups.len();
    if merged_count > 0 {
        tracing::info!(
            buildings = n,
            groups = groups.len(),
            "Grouped overlapping buildings"
        );
    }

    let mut slots: Vec<Option<Vec<FootprintBlock>>> =
        entries.iter().map(|_| None).collect();
    let ids: Vec<BuildingId> = entries.iter().map(|(id, _)| *id).collect();
    for (i, (_, blocks)) in entries.into_iter().enumerate() {
        slots[i] = Some(blocks);
    }

    groups
        .into_values()
        .map(|members| {
            // Roots are the smallest index; entries are sorted by id
            let id = ids[members[0]];
            let blocks = members
                .into_iter()
                .flat_map(|m| slots[m].take().unwrap_or_default())
                .collect();
            (id, blocks)
        })
        .collect()
}

fn find(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Join two sets, keeping the smaller index as the root
fn union(parent: &mut [usize], a: usize, b: usize) {
    let (ra, rb) = (find(parent, a), find(parent, b));
    if ra != rb {
        let (root, child) = if ra < rb { (ra, rb) } else { (rb, ra) };
        parent[child] = root;
    }
}
