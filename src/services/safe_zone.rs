// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Safe-zone computation: land minus buffers around restricted places.
//!
//! Workflow for one set of restricted places:
//! 1. Buffer every place and union the buffers into one exclusion area
//! 2. Subtract the exclusion area from the city land
//! 3. Drop pieces smaller than the minimum zone area
//! 4. Describe each remaining piece as a [`SafeZone`]

use geo::{LineString, MultiPolygon, Polygon};
use std::sync::Arc;

use super::buffer::{buffer_polygon, DEFAULT_BUFFER_SEGMENTS, MIN_BUFFER_SEGMENTS};
use super::geo_math::distance_meters;
use super::polygon_set::{without_degenerate, GeoClipper, PolygonClipper};
use super::rings::{point_in_polygon, polygon_area_square_meters, ring_centroid};
use crate::error::Result;
use crate::models::{LatLng, RestrictedPoint, SafeZone};

/// Zones smaller than this (m²) are discarded by default.
pub const DEFAULT_MIN_ZONE_AREA_SQ_METERS: f64 = 5_000.0;

/// Knobs for a single computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneParameters {
    pub buffer_distance_meters: f64,
    pub min_zone_area_sq_meters: f64,
    pub buffer_segments: usize,
}

impl ZoneParameters {
    pub fn new(buffer_distance_meters: f64) -> Self {
        Self {
            buffer_distance_meters,
            min_zone_area_sq_meters: DEFAULT_MIN_ZONE_AREA_SQ_METERS,
            buffer_segments: DEFAULT_BUFFER_SEGMENTS,
        }
    }

    pub fn with_min_zone_area(mut self, min_zone_area_sq_meters: f64) -> Self {
        self.min_zone_area_sq_meters = min_zone_area_sq_meters;
        self
    }

    /// Values below [`MIN_BUFFER_SEGMENTS`] are raised to it.
    pub fn with_segments(mut self, buffer_segments: usize) -> Self {
        self.buffer_segments = buffer_segments.max(MIN_BUFFER_SEGMENTS);
        self
    }
}

/// Computes safe zones with a pluggable clipper.
#[derive(Clone)]
pub struct SafeZoneComputer {
    clipper: Arc<dyn PolygonClipper>,
}

impl Default for SafeZoneComputer {
    fn default() -> Self {
        Self::new(Arc::new(GeoClipper))
    }
}

impl SafeZoneComputer {
    pub fn new(clipper: Arc<dyn PolygonClipper>) -> Self {
        Self { clipper }
    }

    /// Compute the safe zones of `land` given the active restricted places.
    ///
    /// Empty land, or land entirely covered by buffers, yields no zones.
    /// With no restricted places the land itself is the allowed region and
    /// every zone is unconstrained (`min_distance_meters` is infinite).
    pub fn compute(
        &self,
        land: &MultiPolygon<f64>,
        restricted: &[RestrictedPoint],
        params: &ZoneParameters,
    ) -> Result<Vec<SafeZone>> {
        let land = without_degenerate(land);
        if land.0.is_empty() {
            return Ok(Vec::new());
        }

        let allowed = if restricted.is_empty() {
            land
        } else {
            let exclusion = self.exclusion_area(restricted, params)?;
            match self.clipper.difference(&land, &exclusion)? {
                Some(allowed) => allowed,
                None => {
                    tracing::debug!(
                        restricted = restricted.len(),
                        "Buffers cover all land; no safe zones"
                    );
                    return Ok(Vec::new());
                }
            }
        };

        let zones: Vec<SafeZone> = allowed
            .iter()
            .filter_map(|polygon| {
                let area = polygon_area_square_meters(polygon);
                (area >= params.min_zone_area_sq_meters).then_some((polygon, area))
            })
            .enumerate()
            .filter_map(|(index, (polygon, area))| {
                let center = representative_point(polygon)?;
                Some(SafeZone {
                    id: format!("zone-{}", index),
                    center,
                    paths: polygon_paths(polygon),
                    area_square_meters: area,
                    min_distance_meters: nearest_restricted_meters(center, restricted),
                })
            })
            .collect();

        tracing::debug!(
            candidates = allowed.0.len(),
            zones = zones.len(),
            restricted = restricted.len(),
            "Computed safe zones"
        );

        Ok(zones)
    }

    /// Union of buffers around every restricted place.
    pub fn exclusion_area(
        &self,
        restricted: &[RestrictedPoint],
        params: &ZoneParameters,
    ) -> Result<MultiPolygon<f64>> {
        // Fewer vertices give rings with no area, which would exclude nothing.
        let segments = params.buffer_segments.max(MIN_BUFFER_SEGMENTS);
        let buffers = restricted
            .iter()
            .map(|place| {
                MultiPolygon::new(vec![buffer_polygon(
                    place.location,
                    params.buffer_distance_meters,
                    segments,
                )])
            })
            .collect();
        self.clipper.union_all(buffers)
    }
}

/// Outer-ring centroid when it lies inside the zone, otherwise the outer
/// vertex nearest to it. Concave zones and zones with holes can have their
/// centroid outside the allowed region.
fn representative_point(polygon: &Polygon<f64>) -> Option<LatLng> {
    let centroid = ring_centroid(polygon.exterior())?;
    if point_in_polygon(centroid, polygon) {
        return Some(centroid);
    }

    polygon
        .exterior()
        .coords()
        .map(|c| LatLng::from(*c))
        .min_by(|a, b| distance_meters(centroid, *a).total_cmp(&distance_meters(centroid, *b)))
}

fn nearest_restricted_meters(center: LatLng, restricted: &[RestrictedPoint]) -> f64 {
    restricted
        .iter()
        .map(|place| distance_meters(center, place.location))
        .fold(f64::INFINITY, f64::min)
}

fn polygon_paths(polygon: &Polygon<f64>) -> Vec<Vec<LatLng>> {
    let ring_points =
        |ring: &LineString<f64>| -> Vec<LatLng> { ring.coords().map(|c| LatLng::from(*c)).collect() };
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring_points)
        .collect()
}
