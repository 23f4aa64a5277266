// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Properties of buffers and polygon set operations.

use geo::MultiPolygon;
use safezone_engine::models::LatLng;
use safezone_engine::services::buffer::buffer_polygon;
use safezone_engine::services::geo_math::distance_meters;
use safezone_engine::services::rings::{multi_polygon_area_square_meters, ring_area_square_meters};
use safezone_engine::services::{build_buffer_polygon, GeoClipper, PolygonClipper};

fn buffer(lat: f64, lng: f64, radius: f64) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![buffer_polygon(LatLng::new(lat, lng), radius, 64)])
}

#[test]
fn test_buffer_ring_has_segments_plus_one_points() {
    let centers = [
        LatLng::new(-34.9011, -56.1645),
        LatLng::new(0.0, 0.0),
        LatLng::new(51.5, -0.12),
        LatLng::new(-33.87, 151.21),
    ];
    for center in centers {
        for segments in [1, 4, 32, 64, 128] {
            let ring = build_buffer_polygon(center, 250.0, segments);
            assert_eq!(ring.0.len(), segments + 1);
            assert_eq!(ring.0.first(), ring.0.last());
        }
    }
}

#[test]
fn test_buffer_area_close_to_disk() {
    let ring = build_buffer_polygon(LatLng::new(-34.9, -56.16), 500.0, 64);
    let area = ring_area_square_meters(&ring);
    let disk = std::f64::consts::PI * 500.0 * 500.0;
    assert!((area - disk).abs() / disk < 0.01, "area {} vs disk {}", area, disk);
}

#[test]
fn test_union_of_disjoint_buffers_adds_areas() {
    let a = buffer(-34.90, -56.20, 200.0);
    let b = buffer(-34.90, -56.10, 200.0);
    assert!(distance_meters(LatLng::new(-34.90, -56.20), LatLng::new(-34.90, -56.10)) > 400.0);

    let area_a = multi_polygon_area_square_meters(&a);
    let area_b = multi_polygon_area_square_meters(&b);
    let union = GeoClipper.union(&a, &b).unwrap();
    let area_union = multi_polygon_area_square_meters(&union);

    assert_eq!(union.0.len(), 2);
    assert!((area_union - (area_a + area_b)).abs() / (area_a + area_b) < 1e-6);
}

#[test]
fn test_union_of_overlapping_buffers_is_smaller_than_sum() {
    let a = buffer(-34.90, -56.200, 200.0);
    let b = buffer(-34.90, -56.198, 200.0);

    let area_a = multi_polygon_area_square_meters(&a);
    let area_b = multi_polygon_area_square_meters(&b);
    let union = GeoClipper.union(&a, &b).unwrap();
    let area_union = multi_polygon_area_square_meters(&union);

    assert_eq!(union.0.len(), 1);
    assert!(area_union < area_a + area_b);
    assert!(area_union > area_a.max(area_b));
}

#[test]
fn test_union_fold_order_does_not_change_area() {
    let parts = vec![
        buffer(-34.900, -56.200, 200.0),
        buffer(-34.901, -56.198, 200.0),
        buffer(-34.880, -56.150, 200.0),
        buffer(-34.899, -56.202, 200.0),
    ];
    let mut reversed = parts.clone();
    reversed.reverse();

    let forward = multi_polygon_area_square_meters(&GeoClipper.union_all(parts).unwrap());
    let backward = multi_polygon_area_square_meters(&GeoClipper.union_all(reversed).unwrap());
    assert!((forward - backward).abs() / forward < 1e-6);
}

#[test]
fn test_difference_of_buffer_from_itself_is_empty() {
    let a = buffer(-34.90, -56.20, 200.0);
    assert!(GeoClipper.difference(&a, &a).unwrap().is_none());
}
