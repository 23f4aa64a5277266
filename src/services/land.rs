// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! City land masks: loading, memoization, and containment queries.

use dashmap::DashMap;
use geo::{LineString, MultiPolygon, Polygon};
use geojson::GeoJson;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::rings::{close_ring, multi_polygon_area_square_meters, point_in_multi_polygon};
use crate::error::{EngineError, Result};
use crate::models::{CityId, LatLng};

/// Source of raw land geometry per city.
pub trait LandGeometryStore: Send + Sync {
    /// `Ok(None)` when no geometry is registered for `city`.
    fn geometry(&self, city: CityId) -> std::result::Result<Option<GeoJson>, LandError>;
}

/// Reads `<dir>/<city>.geojson`.
#[derive(Debug, Clone)]
pub struct DirectoryLandStore {
    dir: PathBuf,
}

impl DirectoryLandStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, city: CityId) -> PathBuf {
        self.dir.join(format!("{}.geojson", city))
    }
}

impl LandGeometryStore for DirectoryLandStore {
    fn geometry(&self, city: CityId) -> std::result::Result<Option<GeoJson>, LandError> {
        let path = self.path_for(city);
        let json_data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LandError::IoError(format!("{}: {}", path.display(), e))),
        };
        parse_geojson(&json_data).map(Some)
    }
}

/// Geometry held in memory, for embedded datasets and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLandStore {
    geometries: HashMap<CityId, GeoJson>,
}

impl InMemoryLandStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_geojson(
        mut self,
        city: CityId,
        json_data: &str,
    ) -> std::result::Result<Self, LandError> {
        self.geometries.insert(city, parse_geojson(json_data)?);
        Ok(self)
    }

    pub fn with_polygons(mut self, city: CityId, polygons: MultiPolygon<f64>) -> Self {
        let geometry = geojson::Geometry::new(geojson::Value::from(&polygons));
        self.geometries.insert(city, GeoJson::Geometry(geometry));
        self
    }
}

impl LandGeometryStore for InMemoryLandStore {
    fn geometry(&self, city: CityId) -> std::result::Result<Option<GeoJson>, LandError> {
        Ok(self.geometries.get(&city).cloned())
    }
}

fn parse_geojson(json_data: &str) -> std::result::Result<GeoJson, LandError> {
    json_data
        .parse()
        .map_err(|e: geojson::Error| LandError::ParseError(e.to_string()))
}

/// Permissible land for one city, with every ring closed.
#[derive(Debug, Clone)]
pub struct LandMask {
    city: CityId,
    polygons: MultiPolygon<f64>,
}

impl LandMask {
    pub fn new(city: CityId, polygons: MultiPolygon<f64>) -> Self {
        Self {
            city,
            polygons: polygons.into_iter().map(normalize_polygon).collect(),
        }
    }

    /// Collect Polygon and MultiPolygon geometries from a FeatureCollection,
    /// a single Feature, or a bare Geometry. Other geometry types are skipped.
    pub fn from_geojson(city: CityId, geojson: GeoJson) -> std::result::Result<Self, LandError> {
        let geometries: Vec<geojson::Geometry> = match geojson {
            GeoJson::FeatureCollection(collection) => collection
                .features
                .into_iter()
                .filter_map(|feature| feature.geometry)
                .collect(),
            GeoJson::Feature(feature) => feature.geometry.into_iter().collect(),
            GeoJson::Geometry(geometry) => vec![geometry],
        };

        let mut polygons = Vec::new();
        for geometry in geometries {
            polygons.extend(Self::convert_geometry(city, geometry.value)?);
        }

        let mask = Self::new(city, MultiPolygon::new(polygons));
        tracing::info!(
            city = %city,
            polygons = mask.polygons.0.len(),
            "Loaded land mask"
        );
        Ok(mask)
    }

    fn convert_geometry(
        city: CityId,
        value: geojson::Value,
    ) -> std::result::Result<Vec<Polygon<f64>>, LandError> {
        use std::convert::TryInto;

        match value {
            geojson::Value::Polygon(_) => {
                let poly: Polygon<f64> = value
                    .try_into()
                    .map_err(|e: geojson::Error| LandError::ParseError(e.to_string()))?;
                Ok(vec![poly])
            }
            geojson::Value::MultiPolygon(_) => {
                let multi: MultiPolygon<f64> = value
                    .try_into()
                    .map_err(|e: geojson::Error| LandError::ParseError(e.to_string()))?;
                Ok(multi.0)
            }
            other => {
                tracing::warn!(
                    city = %city,
                    geometry = geometry_kind(&other),
                    "Skipping non-polygon land geometry"
                );
                Ok(Vec::new())
            }
        }
    }

    pub fn city(&self) -> CityId {
        self.city
    }

    pub fn polygons(&self) -> &MultiPolygon<f64> {
        &self.polygons
    }

    /// Inside some polygon's outer ring and none of its holes.
    pub fn contains_point(&self, point: LatLng) -> bool {
        point_in_multi_polygon(point, &self.polygons)
    }

    pub fn net_area_square_meters(&self) -> f64 {
        multi_polygon_area_square_meters(&self.polygons)
    }
}

fn geometry_kind(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn normalize_polygon(polygon: Polygon<f64>) -> Polygon<f64> {
    let (exterior, interiors) = polygon.into_inner();
    let close = |ring: LineString<f64>| {
        let mut coords = ring.0;
        close_ring(&mut coords);
        LineString::new(coords)
    };
    Polygon::new(close(exterior), interiors.into_iter().map(close).collect())
}

/// Process-lifetime memo of land masks, loaded once per city on first use.
///
/// Owned by the composition root and shared by reference; concurrent first
/// accesses for the same city load it only once.
pub struct LandMaskCache {
    store: Arc<dyn LandGeometryStore>,
    masks: DashMap<CityId, Arc<LandMask>>,
}

impl LandMaskCache {
    pub fn new(store: Arc<dyn LandGeometryStore>) -> Self {
        Self {
            store,
            masks: DashMap::new(),
        }
    }

    /// Get the land mask for `city`, loading it on first use.
    pub fn load(&self, city: CityId) -> Result<Arc<LandMask>> {
        if let Some(mask) = self.masks.get(&city) {
            return Ok(Arc::clone(mask.value()));
        }

        // The entry holds the shard lock while loading, so a racing caller
        // waits for this load instead of repeating it.
        let entry = self
            .masks
            .entry(city)
            .or_try_insert_with(|| self.load_uncached(city))?;
        Ok(Arc::clone(entry.value()))
    }

    fn load_uncached(&self, city: CityId) -> Result<Arc<LandMask>> {
        let geojson = self
            .store
            .geometry(city)?
            .ok_or(EngineError::LandNotConfigured(city))?;
        Ok(Arc::new(LandMask::from_geojson(city, geojson)?))
    }

    pub fn contains_point(&self, city: CityId, point: LatLng) -> Result<bool> {
        Ok(self.load(city)?.contains_point(point))
    }

    /// Number of cities loaded so far.
    pub fn loaded(&self) -> usize {
        self.masks.len()
    }
}

/// Errors from land geometry loading.
#[derive(Debug, thiserror::Error)]
pub enum LandError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse GeoJSON: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_WITH_HOLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [
                        [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
                        [[0.4, 0.4], [0.6, 0.4], [0.6, 0.6], [0.4, 0.6], [0.4, 0.4]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [5.0, 5.0] }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_closes_rings_and_skips_points() {
        let geojson = parse_geojson(SQUARE_WITH_HOLE).unwrap();
        let mask = LandMask::from_geojson(CityId::Montevideo, geojson).unwrap();
        assert_eq!(mask.polygons().0.len(), 1);

        let exterior = &mask.polygons().0[0].exterior().0;
        assert_eq!(exterior.len(), 5);
        assert_eq!(exterior.first(), exterior.last());
    }

    #[test]
    fn test_contains_point_respects_holes() {
        let geojson = parse_geojson(SQUARE_WITH_HOLE).unwrap();
        let mask = LandMask::from_geojson(CityId::Montevideo, geojson).unwrap();
        assert!(mask.contains_point(LatLng::new(0.2, 0.2)));
        assert!(!mask.contains_point(LatLng::new(0.5, 0.5)));
        assert!(!mask.contains_point(LatLng::new(2.0, 2.0)));
    }

    #[test]
    fn test_bare_multipolygon_geometry() {
        let json = r#"{"type":"MultiPolygon","coordinates":[
            [[[0,0],[1,0],[1,1],[0,1],[0,0]]],
            [[[2,2],[3,2],[3,3],[2,3],[2,2]]]
        ]}"#;
        let mask = LandMask::from_geojson(CityId::Montevideo, parse_geojson(json).unwrap()).unwrap();
        assert_eq!(mask.polygons().0.len(), 2);
        assert!(mask.contains_point(LatLng::new(2.5, 2.5)));
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(
            parse_geojson("{not json"),
            Err(LandError::ParseError(_))
        ));
    }

    #[test]
    fn test_cache_memoizes() {
        let store = InMemoryLandStore::new()
            .with_geojson(CityId::Montevideo, SQUARE_WITH_HOLE)
            .unwrap();
        let cache = LandMaskCache::new(Arc::new(store));
        assert_eq!(cache.loaded(), 0);

        let first = cache.load(CityId::Montevideo).unwrap();
        let second = cache.load(CityId::Montevideo).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.loaded(), 1);
    }

    #[test]
    fn test_missing_city_is_configuration_error() {
        let cache = LandMaskCache::new(Arc::new(InMemoryLandStore::new()));
        let err = cache.load(CityId::Montevideo).unwrap_err();
        assert!(matches!(err, EngineError::LandNotConfigured(CityId::Montevideo)));
        assert!(err.is_configuration_error());
        assert_eq!(cache.loaded(), 0);
    }

    #[test]
    fn test_directory_store_missing_file() {
        let store = DirectoryLandStore::new("does/not/exist");
        assert!(store.geometry(CityId::Montevideo).unwrap().is_none());
        assert_eq!(
            store.path_for(CityId::Montevideo),
            PathBuf::from("does/not/exist/montevideo.geojson")
        );
    }
}
