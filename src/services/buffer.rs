// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Geodesic buffer polygons around restricted places.

use geo::{Coord, LineString, Polygon};
use std::f64::consts::TAU;

use super::geo_math::{destination, EARTH_RADIUS_METERS};
use crate::models::LatLng;

/// Vertices used to approximate a buffer circle.
pub const DEFAULT_BUFFER_SEGMENTS: usize = 64;

/// Fewest vertices that still enclose area.
pub const MIN_BUFFER_SEGMENTS: usize = 3;

/// Approximate the disk of `radius_meters` around `center` as a closed ring.
///
/// The ring has exactly `segments + 1` points (the last repeats the first),
/// or none at all when `segments` is zero. Vertices lie on the circle, so
/// the polygon is inscribed: edges sit up to `radius * (1 - cos(π / segments))`
/// inside it.
pub fn build_buffer_polygon(center: LatLng, radius_meters: f64, segments: usize) -> LineString<f64> {
    let angular_distance = radius_meters / EARTH_RADIUS_METERS;

    let mut coords: Vec<Coord<f64>> = (0..segments)
        .map(|i| {
            let bearing = TAU * i as f64 / segments as f64;
            destination(center, bearing, angular_distance).into()
        })
        .collect();

    // Push unconditionally: a zero radius yields identical vertices that
    // would already look closed.
    if let Some(first) = coords.first().copied() {
        coords.push(first);
    }

    LineString::new(coords)
}

/// Buffer ring wrapped as a hole-free polygon.
pub fn buffer_polygon(center: LatLng, radius_meters: f64, segments: usize) -> Polygon<f64> {
    Polygon::new(build_buffer_polygon(center, radius_meters, segments), vec![])
}

/// Worst-case shortfall between the inscribed polygon and the true circle.
pub fn discretization_tolerance(radius_meters: f64, segments: usize) -> f64 {
    if segments < MIN_BUFFER_SEGMENTS {
        return radius_meters;
    }
    radius_meters * (1.0 - (std::f64::consts::PI / segments as f64).cos())
}
