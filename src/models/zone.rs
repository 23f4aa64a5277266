// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Safe zones and the cached catalog variants built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::{CityDefinition, CityId, LatLng, RestrictedCategory, RestrictedPoint};

/// A contiguous region of permitted land.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SafeZone {
    /// `zone-<index>`, stable only within one computation.
    pub id: String,
    pub center: LatLng,
    /// Outer ring first, then hole rings. Every ring is closed.
    pub paths: Vec<Vec<LatLng>>,
    pub area_square_meters: f64,
    /// Distance from `center` to the nearest active restricted place.
    /// Infinite when no place constrained the zone; serialized as `null`.
    #[serde(with = "unbounded_distance")]
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub min_distance_meters: f64,
}

impl SafeZone {
    pub fn outer_ring(&self) -> &[LatLng] {
        self.paths.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn holes(&self) -> &[Vec<LatLng>] {
        self.paths.get(1..).unwrap_or(&[])
    }

    pub fn is_unconstrained(&self) -> bool {
        self.min_distance_meters.is_infinite()
    }
}

/// Bookkeeping stored alongside every variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct VariantMeta {
    pub buffer_distance_meters: f64,
    pub restricted_place_count: usize,
}

/// Safe zones precomputed for one subset of restricted categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct CacheVariant {
    pub key: String,
    pub categories: Vec<RestrictedCategory>,
    pub zones: Vec<SafeZone>,
    pub meta: VariantMeta,
}

/// Everything a sync run hands to the cache writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct SafeZoneDataset {
    pub updated_at: DateTime<Utc>,
    pub city_id: CityId,
    pub buffer_distance_meters: f64,
    pub restricted_categories: Vec<RestrictedCategory>,
    pub restricted: Vec<RestrictedPoint>,
    pub safe_zone_cache: Vec<CacheVariant>,
}

impl SafeZoneDataset {
    pub fn new(
        city: &CityDefinition,
        restricted: Vec<RestrictedPoint>,
        safe_zone_cache: Vec<CacheVariant>,
    ) -> Self {
        Self {
            updated_at: Utc::now(),
            city_id: city.id,
            buffer_distance_meters: city.buffer_distance_meters,
            restricted_categories: city.restricted_categories.clone(),
            restricted,
            safe_zone_cache,
        }
    }
}

/// JSON has no infinity; map it to `null` and back.
mod unbounded_distance {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_some(value)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
