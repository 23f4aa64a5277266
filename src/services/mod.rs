// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - geometry and safe-zone computation.

pub mod buffer;
pub mod catalog;
pub mod geo_math;
pub mod land;
pub mod polygon_set;
pub mod rings;
pub mod safe_zone;

pub use buffer::{build_buffer_polygon, DEFAULT_BUFFER_SEGMENTS, MIN_BUFFER_SEGMENTS};
pub use catalog::{canonical_key, category_subsets, CatalogBuilder, SafeZoneCatalog};
pub use land::{
    DirectoryLandStore, InMemoryLandStore, LandError, LandGeometryStore, LandMask, LandMaskCache,
};
pub use polygon_set::{GeoClipper, PolygonClipper};
pub use safe_zone::{SafeZoneComputer, ZoneParameters, DEFAULT_MIN_ZONE_AREA_SQ_METERS};
