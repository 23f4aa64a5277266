// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the engine.

pub mod city;
pub mod place;
pub mod point;
pub mod zone;

pub use city::{CityDefinition, CityId, MAX_CATEGORIES_PER_CITY};
pub use place::{RestrictedCategory, RestrictedPoint};
pub use point::LatLng;
pub use zone::{CacheVariant, SafeZone, SafeZoneDataset, VariantMeta};
