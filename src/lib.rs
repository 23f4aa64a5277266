// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Safezone Engine: where a regulated activity is permitted in a city
//!
//! Given a city's land boundary and a set of restricted places (schools,
//! rehab centers, ...), this crate computes the land that lies outside a
//! fixed-radius buffer around every restricted place, and precomputes the
//! result for every subset of the city's restricted categories.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

use std::sync::Arc;

use config::Config;
use error::Result;
use models::{CacheVariant, CityDefinition, RestrictedPoint, SafeZone};
use services::{
    CatalogBuilder, LandGeometryStore, LandMaskCache, SafeZoneComputer, ZoneParameters,
};

/// Composition root: owns the land-mask memo and the computation services.
pub struct SafeZoneEngine {
    land_masks: Arc<LandMaskCache>,
    computer: SafeZoneComputer,
    catalog_builder: CatalogBuilder,
    min_zone_area_sq_meters: f64,
    buffer_segments: usize,
}

impl SafeZoneEngine {
    pub fn new(config: &Config, store: Arc<dyn LandGeometryStore>) -> Self {
        Self::with_computer(config, store, SafeZoneComputer::default())
    }

    /// Build an engine around a custom computer (e.g. a different clipper).
    pub fn with_computer(
        config: &Config,
        store: Arc<dyn LandGeometryStore>,
        computer: SafeZoneComputer,
    ) -> Self {
        let land_masks = Arc::new(LandMaskCache::new(store));
        let catalog_builder = CatalogBuilder::new(
            Arc::clone(&land_masks),
            computer.clone(),
            config.min_zone_area_sq_meters,
            config.buffer_segments,
        );

        Self {
            land_masks,
            computer,
            catalog_builder,
            min_zone_area_sq_meters: config.min_zone_area_sq_meters,
            buffer_segments: config.buffer_segments,
        }
    }

    pub fn land_masks(&self) -> &LandMaskCache {
        &self.land_masks
    }

    /// Safe zones for one explicit set of active places.
    ///
    /// Places outside the city land are ignored, as in the catalog.
    pub fn compute_zones(
        &self,
        city: &CityDefinition,
        restricted: &[RestrictedPoint],
    ) -> Result<Vec<SafeZone>> {
        let land = self.land_masks.load(city.id)?;
        let in_city: Vec<RestrictedPoint> = restricted
            .iter()
            .filter(|place| land.contains_point(place.location))
            .cloned()
            .collect();

        let params = ZoneParameters::new(city.buffer_distance_meters)
            .with_min_zone_area(self.min_zone_area_sq_meters)
            .with_segments(self.buffer_segments);
        self.computer.compute(land.polygons(), &in_city, &params)
    }

    /// Every category-subset variant for `city`.
    pub fn build_catalog(
        &self,
        city: &CityDefinition,
        restricted: &[RestrictedPoint],
    ) -> Result<Vec<CacheVariant>> {
        city.validate()?;
        self.catalog_builder.build_catalog(
            city.id,
            restricted,
            city.buffer_distance_meters,
            &city.restricted_categories,
        )
    }
}
