// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Spherical earth helpers.
//!
//! Everything here assumes a spherical earth of radius
//! [`EARTH_RADIUS_METERS`], which is accurate enough at city scale.

use crate::models::LatLng;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

pub fn degrees_to_radians(value: f64) -> f64 {
    value.to_radians()
}

pub fn radians_to_degrees(value: f64) -> f64 {
    value.to_degrees()
}

/// Great-circle distance between two points using the haversine formula.
pub fn distance_meters(a: LatLng, b: LatLng) -> f64 {
    let lat1 = degrees_to_radians(a.lat);
    let lat2 = degrees_to_radians(b.lat);
    let d_lat = degrees_to_radians(b.lat - a.lat);
    let d_lng = degrees_to_radians(b.lng - a.lng);

    let hav = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push `hav` a hair past 1 for antipodal points.
    let hav = hav.clamp(0.0, 1.0);
    let c = 2.0 * hav.sqrt().atan2((1.0 - hav).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Point reached by travelling `angular_distance` (radians of arc) from
/// `origin` along the initial `bearing` (radians clockwise from north).
pub fn destination(origin: LatLng, bearing: f64, angular_distance: f64) -> LatLng {
    let lat1 = degrees_to_radians(origin.lat);
    let lng1 = degrees_to_radians(origin.lng);

    let sin_lat2 =
        lat1.sin() * angular_distance.cos() + lat1.cos() * angular_distance.sin() * bearing.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing.sin() * angular_distance.sin() * lat1.cos();
    let x = angular_distance.cos() - lat1.sin() * sin_lat2;
    let lng2 = lng1 + y.atan2(x);

    LatLng::new(
        radians_to_degrees(lat2),
        normalize_longitude(radians_to_degrees(lng2)),
    )
}

/// Wrap a longitude into `(-180, 180]`.
pub fn normalize_longitude(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let mut lng = value % 360.0;
    while lng > 180.0 {
        lng -= 360.0;
    }
    while lng <= -180.0 {
        lng += 360.0;
    }
    lng
}
