// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Relative slack when counting whole tiles, above the vertex noise that
/// polygon overlays leave in footprint lengths
const TILE_COUNT_TOLERANCE: f64 = 1e-6;

/// Split `extent` into the most equal tiles of at least `target` length
///
/// Returns the tile count and the retiled size, so the last tile is never a
/// truncated remainder. A non-positive `target` (the `-1` sentinel) yields a
/// single tile. Returns `None` for empty or non-finite extents.
pub(crate) fn even_tiling(extent: f64, target: f64) -> Option<(usize, f64)> {
    if !extent.is_finite() || extent <= 0.0 {
        return None;
    }

    let size = if target > 0.0 { target.min(extent) } else { extent };
    let count = (extent / size * (1.0 + TILE_COUNT_TOLERANCE)).floor().max(1.0) as usize;

    Some((count, extent / count as f64))
}
