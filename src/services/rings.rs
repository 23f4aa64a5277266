// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ring and polygon measurements.
//!
//! Areas and centroids are computed on a local tangent plane centred on the
//! ring's mean coordinate. This is accurate for city-sized rings and breaks
//! down near the poles and for rings spanning large fractions of the globe.

use geo::{Coord, LineString, MultiPolygon, Polygon};

use super::geo_math::degrees_to_radians;
use crate::models::LatLng;

const METERS_PER_DEGREE_LAT: f64 = 111_132.0;
const METERS_PER_DEGREE_LNG_AT_EQUATOR: f64 = 111_320.0;
/// Floor for cos(lat) so longitudes near the poles don't collapse to zero width.
const MIN_COS_LAT: f64 = 1e-6;
/// Projected areas (m²) below this are treated as zero when weighting centroids.
const DEGENERATE_AREA: f64 = 1e-6;

/// Append the first coordinate if the ring is not already closed.
pub fn close_ring(points: &mut Vec<Coord<f64>>) {
    if let (Some(first), Some(last)) = (points.first().copied(), points.last()) {
        if first != *last {
            points.push(first);
        }
    }
}

/// Even-odd containment test against a single ring.
///
/// Uses a half-open crossing rule (`yi > y` vs `yj > y`), so points exactly
/// on a horizontal edge resolve the same way every time.
pub fn point_in_ring(point: LatLng, ring: &LineString<f64>) -> bool {
    let coords = &ring.0;
    if coords.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = coords.len() - 1;
    for i in 0..coords.len() {
        let (xi, yi) = (coords[i].x, coords[i].y);
        let (xj, yj) = (coords[j].x, coords[j].y);

        if (yi > point.lat) != (yj > point.lat) {
            let x_intersect = (xj - xi) * (point.lat - yi) / (yj - yi) + xi;
            if point.lng < x_intersect {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// Inside the outer ring and outside every hole.
pub fn point_in_polygon(point: LatLng, polygon: &Polygon<f64>) -> bool {
    point_in_ring(point, polygon.exterior())
        && polygon
            .interiors()
            .iter()
            .all(|hole| !point_in_ring(point, hole))
}

pub fn point_in_multi_polygon(point: LatLng, polygons: &MultiPolygon<f64>) -> bool {
    polygons.iter().any(|polygon| point_in_polygon(point, polygon))
}

/// Equirectangular projection around a reference coordinate.
#[derive(Debug, Clone, Copy)]
struct LocalProjection {
    ref_lat: f64,
    ref_lng: f64,
    meters_per_degree_lng: f64,
}

impl LocalProjection {
    fn for_ring(ring: &LineString<f64>) -> Self {
        let n = ring.0.len().max(1) as f64;
        let ref_lat = ring.0.iter().map(|c| c.y).sum::<f64>() / n;
        let ref_lng = ring.0.iter().map(|c| c.x).sum::<f64>() / n;
        let cos_lat = degrees_to_radians(ref_lat).cos().max(MIN_COS_LAT);

        Self {
            ref_lat,
            ref_lng,
            meters_per_degree_lng: METERS_PER_DEGREE_LNG_AT_EQUATOR * cos_lat,
        }
    }

    fn project(&self, coord: Coord<f64>) -> (f64, f64) {
        (
            (coord.x - self.ref_lng) * self.meters_per_degree_lng,
            (coord.y - self.ref_lat) * METERS_PER_DEGREE_LAT,
        )
    }

    fn unproject(&self, x: f64, y: f64) -> LatLng {
        LatLng::new(
            self.ref_lat + y / METERS_PER_DEGREE_LAT,
            self.ref_lng + x / self.meters_per_degree_lng,
        )
    }
}

/// Shoelace sum over consecutive vertex pairs, in projected square meters.
fn projected_signed_area(ring: &LineString<f64>, projection: &LocalProjection) -> f64 {
    ring.lines()
        .map(|line| {
            let (x1, y1) = projection.project(line.start);
            let (x2, y2) = projection.project(line.end);
            x1 * y2 - x2 * y1
        })
        .sum::<f64>()
        / 2.0
}

/// Unsigned area of a closed ring. Rings with fewer than four points have no area.
pub fn ring_area_square_meters(ring: &LineString<f64>) -> f64 {
    if ring.0.len() < 4 {
        return 0.0;
    }
    let projection = LocalProjection::for_ring(ring);
    projected_signed_area(ring, &projection).abs()
}

/// Area-weighted centroid of a closed ring.
///
/// A ring whose projected area is effectively zero has no meaningful
/// centroid; its first vertex is returned instead. Returns `None` only for
/// an empty ring.
pub fn ring_centroid(ring: &LineString<f64>) -> Option<LatLng> {
    let first = LatLng::from(*ring.0.first()?);

    let projection = LocalProjection::for_ring(ring);
    let area = projected_signed_area(ring, &projection);
    if area.abs() < DEGENERATE_AREA {
        return Some(first);
    }

    let (mut cx, mut cy) = (0.0, 0.0);
    for line in ring.lines() {
        let (x1, y1) = projection.project(line.start);
        let (x2, y2) = projection.project(line.end);
        let cross = x1 * y2 - x2 * y1;
        cx += (x1 + x2) * cross;
        cy += (y1 + y2) * cross;
    }

    Some(projection.unproject(cx / (6.0 * area), cy / (6.0 * area)))
}

/// Outer ring area minus hole areas, never negative.
pub fn polygon_area_square_meters(polygon: &Polygon<f64>) -> f64 {
    let holes: f64 = polygon
        .interiors()
        .iter()
        .map(ring_area_square_meters)
        .sum();
    (ring_area_square_meters(polygon.exterior()) - holes).max(0.0)
}

pub fn multi_polygon_area_square_meters(polygons: &MultiPolygon<f64>) -> f64 {
    polygons.iter().map(polygon_area_square_meters).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> LineString<f64> {
        LineString::from(vec![(min, min), (max, min), (max, max), (min, max), (min, min)])
    }

    #[test]
    fn test_close_ring_appends_first() {
        let mut ring = vec![
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 1.0, y: 0.0 },
            Coord { x: 1.0, y: 1.0 },
        ];
        close_ring(&mut ring);
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());

        close_ring(&mut ring);
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_close_ring_empty_is_noop() {
        let mut ring: Vec<Coord<f64>> = Vec::new();
        close_ring(&mut ring);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_point_in_ring() {
        let ring = square(0.0, 1.0);
        assert!(point_in_ring(LatLng::new(0.5, 0.5), &ring));
        assert!(!point_in_ring(LatLng::new(1.5, 0.5), &ring));
        assert!(!point_in_ring(LatLng::new(0.5, -0.1), &ring));
    }

    #[test]
    fn test_point_in_ring_degenerate() {
        let ring = LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]);
        assert!(!point_in_ring(LatLng::new(0.5, 0.5), &ring));
    }

    #[test]
    fn test_point_in_hole_is_outside() {
        let polygon = Polygon::new(square(0.0, 1.0), vec![square(0.4, 0.6)]);
        assert!(!point_in_polygon(LatLng::new(0.5, 0.5), &polygon));
        assert!(point_in_polygon(LatLng::new(0.2, 0.2), &polygon));
    }

    #[test]
    fn test_point_in_multi_polygon() {
        let polygons = MultiPolygon::new(vec![
            Polygon::new(square(0.0, 1.0), vec![]),
            Polygon::new(square(2.0, 3.0), vec![]),
        ]);
        assert!(point_in_multi_polygon(LatLng::new(2.5, 2.5), &polygons));
        assert!(!point_in_multi_polygon(LatLng::new(1.5, 1.5), &polygons));
    }

    #[test]
    fn test_ring_area_small_square_at_equator() {
        // 0.01° x 0.01° near the equator
        let area = ring_area_square_meters(&square(0.0, 0.01));
        let expected = 0.01 * 111_132.0 * 0.01 * 111_320.0;
        assert!((area - expected).abs() / expected < 1e-4, "got {}", area);
    }

    #[test]
    fn test_ring_area_ignores_orientation() {
        let ring = square(0.0, 0.01);
        let mut reversed = ring.clone();
        reversed.0.reverse();
        assert!((ring_area_square_meters(&ring) - ring_area_square_meters(&reversed)).abs() < 1e-6);
    }

    #[test]
    fn test_ring_area_short_ring_is_zero() {
        let ring = LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)]);
        assert_eq!(ring_area_square_meters(&ring), 0.0);
    }

    #[test]
    fn test_ring_centroid_of_square() {
        let c = ring_centroid(&square(0.0, 0.02)).unwrap();
        assert!((c.lat - 0.01).abs() < 1e-9);
        assert!((c.lng - 0.01).abs() < 1e-9);
    }

    #[test]
    fn test_ring_centroid_degenerate_falls_back_to_first_vertex() {
        let ring = LineString::from(vec![(0.3, 0.2), (0.4, 0.2), (0.5, 0.2), (0.3, 0.2)]);
        let c = ring_centroid(&ring).unwrap();
        assert_eq!(c, LatLng::new(0.2, 0.3));
    }

    #[test]
    fn test_ring_centroid_empty() {
        assert!(ring_centroid(&LineString::new(vec![])).is_none());
    }

    #[test]
    fn test_polygon_area_subtracts_holes() {
        let outer = square(0.0, 0.02);
        let hole = square(0.005, 0.015);
        let polygon = Polygon::new(outer.clone(), vec![hole.clone()]);
        let expected = ring_area_square_meters(&outer) - ring_area_square_meters(&hole);
        assert!((polygon_area_square_meters(&polygon) - expected).abs() < 1e-6);
    }
}
