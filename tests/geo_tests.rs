//! Tests for the map math: haversine distances, bounding-box prefilters,
//! and the marker clustering grid.

use sisciac::services::geo::{
    cell_size_deg, cluster_points, haversine_km, BoundingBox, MapMarker, MapPoint,
};
use uuid::Uuid;

fn point(name: &str, lat: f64, lng: f64) -> MapPoint {
    MapPoint {
        id: Uuid::new_v4(),
        name: name.to_string(),
        kind: "farm",
        latitude: lat,
        longitude: lng,
    }
}

#[test]
fn known_city_distances() {
    // Lima - Arequipa, roughly 766 km great-circle.
    let d = haversine_km(-12.0464, -77.0428, -16.4090, -71.5375);
    assert!((d - 766.0).abs() < 20.0, "Lima-Arequipa: {}", d);

    // Quito - Bogota, roughly 710 km.
    let d = haversine_km(-0.1807, -78.4678, 4.7110, -74.0721);
    assert!((d - 710.0).abs() < 25.0, "Quito-Bogota: {}", d);
}

#[test]
fn near_antipodal_distance_stays_finite() {
    // Rounding used to push the haversine intermediate past 1.0 here,
    // turning the result into NaN.
    for eps in [0.0, 1.0e-12, 1.5e-12, 1.0e-9] {
        let d = haversine_km(-58.14, 10.0, 58.14 + eps, -170.0);
        assert!(d.is_finite(), "NaN at eps {}", eps);
        // Antipodal pairs sit half the great circle apart.
        assert!((d - 20015.1).abs() < 1.0, "eps {}: {}", eps, d);
    }
}

#[test]
fn haversine_handles_antimeridian_neighbours() {
    // Two points straddling the 180th meridian are close, not half a
    // world apart.
    let d = haversine_km(0.0, 179.9, 0.0, -179.9);
    assert!(d < 25.0, "got {}", d);
}

#[test]
fn bbox_prefilter_never_drops_points_inside_the_radius() {
    let (lat, lng, radius) = (-12.5, -76.8, 50.0);
    let bbox = BoundingBox::around(lat, lng, radius);

    // Sweep points just inside the radius circle; every one must pass
    // the box.
    let r = radius * 0.98;
    for step in 0..36 {
        let bearing = f64::from(step) * 10.0_f64.to_radians();
        let dlat = (r / 111.195) * bearing.cos();
        let dlng = (r / (111.195 * lat.to_radians().cos())) * bearing.sin();
        let (plat, plng) = (lat + dlat, lng + dlng);

        let d = haversine_km(lat, lng, plat, plng);
        assert!(d <= radius, "sweep point left the circle: {}", d);
        assert!(bbox.contains(plat, plng), "bbox dropped bearing {}", step);
    }
}

#[test]
fn bbox_corner_fails_exact_distance_check() {
    // The box corner is at radius * sqrt(2); it belongs in the prefilter
    // result but must be rejected by the exact check.
    let (lat, lng, radius) = (-12.0, -77.0, 30.0);
    let bbox = BoundingBox::around(lat, lng, radius);

    let corner = haversine_km(lat, lng, bbox.max_lat, bbox.max_lng);
    assert!(bbox.contains(bbox.max_lat, bbox.max_lng));
    assert!(corner > radius, "corner should sit outside the circle");
}

#[test]
fn bbox_clamps_rather_than_wraps_at_the_antimeridian() {
    // Documented behavior: the prefilter box is cut at +/-180, so a
    // point across the meridian stays outside even when it is within
    // the search radius.
    let bbox = BoundingBox::around(0.0, 179.9, 50.0);
    assert!((bbox.max_lng - 180.0).abs() < 1e-9);
    let d = haversine_km(0.0, 179.9, 0.0, -179.95);
    assert!(d < 50.0, "far-side point is inside the radius: {}", d);
    assert!(!bbox.contains(0.0, -179.95));
}

#[test]
fn cluster_counts_are_preserved() {
    let points: Vec<MapPoint> = (0..20)
        .map(|i| point(&format!("farm-{}", i), -12.0 - f64::from(i) * 0.0001, -77.0))
        .collect();

    let markers = cluster_points(points, 6);
    let total: usize = markers
        .iter()
        .map(|m| match m {
            MapMarker::Cluster { count, .. } => *count,
            MapMarker::Point(_) => 1,
        })
        .sum();

    assert_eq!(total, 20);
}

#[test]
fn centroid_sits_between_members() {
    let markers = cluster_points(
        vec![point("a", -12.000, -77.000), point("b", -12.002, -77.004)],
        8,
    );
    assert_eq!(markers.len(), 1);
    match &markers[0] {
        MapMarker::Cluster {
            count,
            latitude,
            longitude,
        } => {
            assert_eq!(*count, 2);
            assert!(*latitude < -12.000 && *latitude > -12.002);
            assert!(*longitude < -77.000 && *longitude > -77.004);
        }
        other => panic!("expected a cluster, got {:?}", other),
    }
}

#[test]
fn zoom_zero_cell_spans_the_map_grid() {
    // One tile, 8x8 grid: 45 degrees per cell.
    assert!((cell_size_deg(0) - 45.0).abs() < 1e-9);
}

#[test]
fn empty_input_clusters_to_nothing() {
    assert!(cluster_points(Vec::new(), 10).is_empty());
}

#[test]
fn marker_serialization_is_tagged() {
    let markers = cluster_points(vec![point("solo", -12.0, -77.0)], 12);
    let json = serde_json::to_value(&markers).unwrap();
    assert_eq!(json[0]["type"], "point");
    assert_eq!(json[0]["name"], "solo");

    let markers = cluster_points(
        vec![point("a", -12.0, -77.0), point("b", -12.0001, -77.0001)],
        8,
    );
    let json = serde_json::to_value(&markers).unwrap();
    assert_eq!(json[0]["type"], "cluster");
    assert_eq!(json[0]["count"], 2);
}
