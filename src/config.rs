// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Engine configuration loaded from environment variables.
//!
//! Per-city settings (buffer distance, restricted categories) live in
//! [`CityDefinition`](crate::models::CityDefinition); this covers the global
//! knobs and the file locations used by the sync job.

use std::env;
use std::path::PathBuf;

use crate::models::CityId;
use crate::services::{
    DEFAULT_BUFFER_SEGMENTS, DEFAULT_MIN_ZONE_AREA_SQ_METERS, MIN_BUFFER_SEGMENTS,
};

/// Engine configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// City to sync
    pub city: CityId,
    /// Directory holding `<city>.geojson` land geometry
    pub land_data_dir: PathBuf,
    /// Zones smaller than this are dropped
    pub min_zone_area_sq_meters: f64,
    /// Vertices per buffer circle
    pub buffer_segments: usize,
    /// Restricted places produced by the places source (JSON array)
    pub restricted_places_file: PathBuf,
    /// Where the sync job writes the dataset
    pub output_file: PathBuf,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            city: CityId::Montevideo,
            land_data_dir: PathBuf::from("data/land"),
            min_zone_area_sq_meters: DEFAULT_MIN_ZONE_AREA_SQ_METERS,
            buffer_segments: DEFAULT_BUFFER_SEGMENTS,
            restricted_places_file: PathBuf::from("tests/fixtures/restricted_places.json"),
            output_file: default_output_file(CityId::Montevideo),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let city = match env::var("SAFEZONE_CITY") {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid("SAFEZONE_CITY", value))?,
            Err(_) => CityId::default(),
        };

        Ok(Self {
            city,
            land_data_dir: env::var("LAND_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/land")),
            min_zone_area_sq_meters: parse_var(
                "MIN_ZONE_AREA_SQ_METERS",
                DEFAULT_MIN_ZONE_AREA_SQ_METERS,
                |v: &f64| v.is_finite() && *v >= 0.0,
            )?,
            buffer_segments: parse_var("BUFFER_SEGMENTS", DEFAULT_BUFFER_SEGMENTS, |v: &usize| {
                *v >= MIN_BUFFER_SEGMENTS
            })?,
            restricted_places_file: env::var("RESTRICTED_PLACES_FILE")
                .map(PathBuf::from)
                .map_err(|_| ConfigError::Missing("RESTRICTED_PLACES_FILE"))?,
            output_file: env::var("SAFE_ZONE_OUTPUT_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_output_file(city)),
        })
    }
}

fn default_output_file(city: CityId) -> PathBuf {
    PathBuf::from(format!("data/cache/{}-safe-zones.json", city))
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_var<T, F>(name: &'static str, default: T, valid: F) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&T) -> bool,
{
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.trim().parse::<T>() {
            Ok(value) if valid(&value) => Ok(value),
            _ => Err(ConfigError::Invalid(name, raw)),
        },
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
