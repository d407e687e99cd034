// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Massing Geometry
//!
//! Planar polygon handling for building footprints: i_overlay booleans,
//! earcutr triangulation, oriented envelopes and cell-addressed mesh buffers.

pub mod bool2d;
pub mod envelope;
pub mod error;
pub mod mesh;
pub mod polygon;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use bool2d::{difference, intersection, intersects, union_polygons};
pub use envelope::{convex_hull, OrientedRect};
pub use error::{Error, Result};
pub use mesh::MeshBuffers;
pub use polygon::{MultiPolygon2D, Polygon2D};
pub use triangulation::{
    triangulate_polygon, triangulate_polygon_with_holes, triangulation_deviation,
    validate_triangulation,
};
