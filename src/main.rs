// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Safe-zone sync job
//!
//! Reads the restricted places produced by the places source, builds the
//! safe-zone catalog for the configured city, and writes the dataset for
//! the query side to serve from.

use anyhow::Context;
use safezone_engine::{
    config::Config,
    models::{CityDefinition, RestrictedPoint, SafeZoneDataset},
    services::DirectoryLandStore,
    SafeZoneEngine,
};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    let config = Config::from_env().context("Failed to load configuration")?;
    let city = CityDefinition::registry()
        .context("Invalid city definition")?
        .into_iter()
        .find(|c| c.id == config.city)
        .with_context(|| format!("No definition for city {}", config.city))?;
    tracing::info!(
        city = %city.id,
        buffer_distance_meters = city.buffer_distance_meters,
        categories = city.restricted_categories.len(),
        "Starting safe-zone sync"
    );

    let store = Arc::new(DirectoryLandStore::new(&config.land_data_dir));
    let engine = SafeZoneEngine::new(&config, store);

    let restricted = read_restricted_places(&config.restricted_places_file)?;
    tracing::info!(
        path = %config.restricted_places_file.display(),
        count = restricted.len(),
        "Loaded restricted places"
    );

    let started = Instant::now();
    let catalog = engine
        .build_catalog(&city, &restricted)
        .context("Failed to build safe-zone catalog")?;
    let zone_count: usize = catalog.iter().map(|v| v.zones.len()).sum();

    let restricted_count = restricted.len();
    let variant_count = catalog.len();
    let dataset = SafeZoneDataset::new(&city, restricted, catalog);
    write_dataset(&config.output_file, &dataset)?;

    tracing::info!(
        city = %city.id,
        restricted_count,
        safe_zone_variants = variant_count,
        zones = zone_count,
        elapsed_ms = started.elapsed().as_millis() as u64,
        output = %config.output_file.display(),
        "Safe-zone sync complete"
    );
    Ok(())
}

fn read_restricted_places(path: &Path) -> anyhow::Result<Vec<RestrictedPoint>> {
    let json_data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read restricted places from {}", path.display()))?;
    serde_json::from_str(&json_data)
        .with_context(|| format!("Failed to parse restricted places in {}", path.display()))
}

fn write_dataset(path: &Path, dataset: &SafeZoneDataset) -> anyhow::Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(dataset).context("Failed to serialize dataset")?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("safezone_engine=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
