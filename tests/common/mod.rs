// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use geo::{LineString, MultiPolygon, Polygon};
use safezone_engine::config::Config;
use safezone_engine::models::{CityId, LatLng, RestrictedPoint};
use safezone_engine::services::{DirectoryLandStore, InMemoryLandStore};
use safezone_engine::SafeZoneEngine;
use std::sync::Arc;

/// Engine backed by the committed land data.
#[allow(dead_code)]
pub fn fixture_engine() -> SafeZoneEngine {
    let store = DirectoryLandStore::new("data/land");
    SafeZoneEngine::new(&Config::default(), Arc::new(store))
}

/// Engine whose only city is the given land.
#[allow(dead_code)]
pub fn engine_with_land(polygons: MultiPolygon<f64>) -> SafeZoneEngine {
    let store = InMemoryLandStore::new().with_polygons(CityId::Montevideo, polygons);
    SafeZoneEngine::new(&Config::default(), Arc::new(store))
}

/// Restricted places from the committed fixture file.
#[allow(dead_code)]
pub fn fixture_places() -> Vec<RestrictedPoint> {
    let data = std::fs::read_to_string("tests/fixtures/restricted_places.json")
        .expect("Failed to read restricted places fixture - is tests/fixtures/ committed?");
    serde_json::from_str(&data).expect("Failed to parse restricted places fixture")
}

/// Axis-aligned square in degrees, `(lat, lng)` of the south-west corner.
#[allow(dead_code)]
pub fn square(south: f64, west: f64, size: f64) -> Polygon<f64> {
    Polygon::new(
        LineString::from(vec![
            (west, south),
            (west + size, south),
            (west + size, south + size),
            (west, south + size),
            (west, south),
        ]),
        vec![],
    )
}

#[allow(dead_code)]
pub fn place(id: &str, lat: f64, lng: f64) -> RestrictedPoint {
    RestrictedPoint::new(id, LatLng::new(lat, lng), None)
}
