// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Safe-zone catalog: one precomputed variant per category subset.
//!
//! A city with `k` restricted categories gets `2^k` variants, each a full
//! safe-zone computation. City definitions cap `k` (see
//! [`MAX_CATEGORIES_PER_CITY`](crate::models::MAX_CATEGORIES_PER_CITY)), and
//! the variants are computed in parallel.

use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;

use super::land::LandMaskCache;
use super::safe_zone::{SafeZoneComputer, ZoneParameters};
use crate::error::Result;
use crate::models::{
    CacheVariant, CityDefinition, CityId, RestrictedCategory, RestrictedPoint, VariantMeta,
};

/// Cache key for the empty subset.
pub const EMPTY_SUBSET_KEY: &str = "none";

/// Canonical key for a category subset: sorted names joined by `|`.
pub fn canonical_key(categories: &[RestrictedCategory]) -> String {
    if categories.is_empty() {
        return EMPTY_SUBSET_KEY.to_string();
    }
    let mut names: Vec<&str> = categories.iter().map(RestrictedCategory::as_str).collect();
    names.sort_unstable();
    names.dedup();
    names.join("|")
}

/// Every subset of the distinct `categories`, each sorted.
///
/// Subsets come out in doubling order: `[]`, then every earlier subset with
/// the first category added, and so on.
pub fn category_subsets(categories: &[RestrictedCategory]) -> Vec<Vec<RestrictedCategory>> {
    let mut unique: Vec<RestrictedCategory> = Vec::with_capacity(categories.len());
    for category in categories {
        if !unique.contains(category) {
            unique.push(*category);
        }
    }

    let mut subsets: Vec<Vec<RestrictedCategory>> = vec![Vec::new()];
    for category in unique {
        let extended: Vec<_> = subsets
            .iter()
            .map(|subset| {
                let mut next = subset.clone();
                next.push(category);
                next
            })
            .collect();
        subsets.extend(extended);
    }

    for subset in &mut subsets {
        subset.sort_by_key(|c| c.as_str());
    }
    subsets
}

/// Builds catalog variants for a city.
pub struct CatalogBuilder {
    land_masks: Arc<LandMaskCache>,
    computer: SafeZoneComputer,
    min_zone_area_sq_meters: f64,
    buffer_segments: usize,
}

impl CatalogBuilder {
    pub fn new(
        land_masks: Arc<LandMaskCache>,
        computer: SafeZoneComputer,
        min_zone_area_sq_meters: f64,
        buffer_segments: usize,
    ) -> Self {
        Self {
            land_masks,
            computer,
            min_zone_area_sq_meters,
            buffer_segments,
        }
    }

    /// Compute one [`CacheVariant`] per subset of `categories`.
    ///
    /// Places outside the city land are ignored. Uncategorized places are
    /// active in every variant. Variants are returned in
    /// [`category_subsets`] order.
    pub fn build_catalog(
        &self,
        city: CityId,
        restricted: &[RestrictedPoint],
        buffer_distance_meters: f64,
        categories: &[RestrictedCategory],
    ) -> Result<Vec<CacheVariant>> {
        let land = self.land_masks.load(city)?;

        // Land containment doesn't depend on the subset; test each place once.
        let in_city: Vec<&RestrictedPoint> = restricted
            .iter()
            .filter(|place| land.contains_point(place.location))
            .collect();

        let subsets = category_subsets(categories);
        let params = ZoneParameters::new(buffer_distance_meters)
            .with_min_zone_area(self.min_zone_area_sq_meters)
            .with_segments(self.buffer_segments);

        tracing::info!(
            city = %city,
            restricted = restricted.len(),
            in_city = in_city.len(),
            variants = subsets.len(),
            buffer_distance_meters,
            "Building safe-zone catalog"
        );

        let variants = subsets
            .into_par_iter()
            .map(|subset| {
                let active: Vec<RestrictedPoint> = in_city
                    .iter()
                    .filter(|place| place.is_active_for(&subset))
                    .map(|place| (*place).clone())
                    .collect();

                let zones = self.computer.compute(land.polygons(), &active, &params)?;
                let key = canonical_key(&subset);

                tracing::debug!(
                    city = %city,
                    key = %key,
                    restricted = active.len(),
                    zones = zones.len(),
                    "Computed catalog variant"
                );

                Ok(CacheVariant {
                    key,
                    categories: subset,
                    zones,
                    meta: VariantMeta {
                        buffer_distance_meters,
                        restricted_place_count: active.len(),
                    },
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(city = %city, variants = variants.len(), "Safe-zone catalog built");
        Ok(variants)
    }
}

/// Read-side view over a built catalog.
#[derive(Debug, Clone)]
pub struct SafeZoneCatalog {
    allowed: Vec<RestrictedCategory>,
    variants: HashMap<String, CacheVariant>,
}

impl SafeZoneCatalog {
    pub fn new(city: &CityDefinition, variants: Vec<CacheVariant>) -> Self {
        Self {
            allowed: city.restricted_categories.clone(),
            variants: variants.into_iter().map(|v| (v.key.clone(), v)).collect(),
        }
    }

    /// Variant for a query's requested categories.
    ///
    /// Requests are narrowed to the city's configured categories; `None`
    /// selects all of them.
    pub fn variant_for(&self, requested: Option<&[RestrictedCategory]>) -> Option<&CacheVariant> {
        let active: Vec<RestrictedCategory> = match requested {
            Some(requested) => requested
                .iter()
                .copied()
                .filter(|c| self.allowed.contains(c))
                .collect(),
            None => self.allowed.clone(),
        };
        self.variants.get(&canonical_key(&active))
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}
