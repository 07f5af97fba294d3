//! Geographic helpers for the map endpoints: great-circle distance,
//! radius-to-bounding-box conversion, and grid clustering of markers.

use serde::Serialize;
use uuid::Uuid;

/// Mean earth radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Great-circle distance in km between two WGS84 points, haversine formula.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlng = (lng2 - lng1).to_radians();

    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    // Rounding can push `a` past 1.0 for near-antipodal pairs, which
    // would turn asin into NaN; clamp before inverting.
    let c = 2.0 * a.min(1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Box enclosing the circle of `radius_km` around a point. Used as a
    /// cheap SQL prefilter; corners outside the circle are dropped with an
    /// exact haversine check afterwards.
    ///
    /// Longitude is clamped at the +/-180 meridian rather than wrapped, so
    /// a search circle straddling the antimeridian loses the far side. The
    /// service area sits nowhere near it; revisit if that changes.
    pub fn around(lat: f64, lng: f64, radius_km: f64) -> Self {
        let dlat = (radius_km / EARTH_RADIUS_KM).to_degrees();

        // Longitude degrees shrink with latitude; clamp the divisor so the
        // box stays finite near the poles.
        let cos_lat = lat.to_radians().cos().max(0.01);
        let dlng = (dlat / cos_lat).min(180.0);

        BoundingBox {
            min_lat: (lat - dlat).max(-90.0),
            max_lat: (lat + dlat).min(90.0),
            min_lng: (lng - dlng).max(-180.0),
            max_lng: (lng + dlng).min(180.0),
        }
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        lat >= self.min_lat && lat <= self.max_lat && lng >= self.min_lng && lng <= self.max_lng
    }
}

/// A geolocated marker fed into the clustering grid.
#[derive(Clone, Debug, Serialize)]
pub struct MapPoint {
    pub id: Uuid,
    pub name: String,
    pub kind: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

/// Either an aggregated cell or a lone marker, as returned to the map UI.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapMarker {
    Cluster {
        count: usize,
        latitude: f64,
        longitude: f64,
    },
    Point(MapPoint),
}

/// Grid cell edge in degrees at a given zoom level. The world is 2^zoom
/// tiles wide and each tile is split into an 8x8 cluster grid, so the
/// cell size halves with every zoom step.
pub fn cell_size_deg(zoom: u8) -> f64 {
    360.0 / (1u64 << zoom.min(31)) as f64 / 8.0
}

/// Aggregate points into grid cells. Cells holding a single point return
/// the point itself; denser cells collapse into a cluster positioned at
/// the mean coordinate of its members.
pub fn cluster_points(points: Vec<MapPoint>, zoom: u8) -> Vec<MapMarker> {
    use std::collections::HashMap;

    let cell = cell_size_deg(zoom);
    let mut cells: HashMap<(i64, i64), Vec<MapPoint>> = HashMap::new();

    for point in points {
        let key = (
            (point.latitude / cell).floor() as i64,
            (point.longitude / cell).floor() as i64,
        );
        cells.entry(key).or_default().push(point);
    }

    let mut markers: Vec<MapMarker> = cells
        .into_values()
        .map(|members| {
            if members.len() == 1 {
                let point = members.into_iter().next().unwrap();
                MapMarker::Point(point)
            } else {
                let count = members.len();
                let lat = members.iter().map(|p| p.latitude).sum::<f64>() / count as f64;
                let lng = members.iter().map(|p| p.longitude).sum::<f64>() / count as f64;
                MapMarker::Cluster {
                    count,
                    latitude: lat,
                    longitude: lng,
                }
            }
        })
        .collect();

    // Deterministic output order for the UI and the tests.
    markers.sort_by(|a, b| {
        let key = |m: &MapMarker| match m {
            MapMarker::Cluster {
                latitude,
                longitude,
                ..
            } => (*latitude, *longitude),
            MapMarker::Point(p) => (p.latitude, p.longitude),
        };
        key(a).partial_cmp(&key(b)).unwrap_or(std::cmp::Ordering::Equal)
    });

    markers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(lat: f64, lng: f64) -> MapPoint {
        MapPoint {
            id: Uuid::new_v4(),
            name: "p".into(),
            kind: "farm",
            latitude: lat,
            longitude: lng,
        }
    }

    #[test]
    fn haversine_zero_for_same_point() {
        assert!(haversine_km(-12.05, -77.04, -12.05, -77.04) < 1e-9);
    }

    #[test]
    fn haversine_lima_to_cusco() {
        // Lima to Cusco is roughly 570 km great-circle.
        let d = haversine_km(-12.0464, -77.0428, -13.5320, -71.9675);
        assert!((d - 570.0).abs() < 15.0, "got {}", d);
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = haversine_km(10.0, 20.0, -30.0, 40.0);
        let b = haversine_km(-30.0, 40.0, 10.0, 20.0);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn bounding_box_encloses_radius() {
        let bbox = BoundingBox::around(-12.0, -77.0, 25.0);
        // Points 20 km due north/east must fall inside the box.
        assert!(bbox.contains(-12.0 + 20.0 / 111.0, -77.0));
        assert!(bbox.contains(-12.0, -77.0 + 20.0 / (111.0 * 0.978)));
        // A point 100 km away must not.
        assert!(!bbox.contains(-13.0, -77.0));
    }

    #[test]
    fn bounding_box_clamps_at_poles() {
        let bbox = BoundingBox::around(89.9, 0.0, 100.0);
        assert!(bbox.max_lat <= 90.0);
        assert!(bbox.min_lng >= -180.0);
        assert!(bbox.max_lng <= 180.0);
    }

    #[test]
    fn cell_size_halves_per_zoom_step() {
        assert!((cell_size_deg(5) / cell_size_deg(6) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn single_point_cell_stays_a_point() {
        let markers = cluster_points(vec![point(-12.0, -77.0)], 10);
        assert_eq!(markers.len(), 1);
        assert!(matches!(markers[0], MapMarker::Point(_)));
    }

    #[test]
    fn close_points_collapse_into_cluster() {
        // ~100 m apart, far below the zoom-8 cell size.
        let markers = cluster_points(vec![point(-12.0, -77.0), point(-12.001, -77.001)], 8);
        assert_eq!(markers.len(), 1);
        match &markers[0] {
            MapMarker::Cluster {
                count,
                latitude,
                longitude,
            } => {
                assert_eq!(*count, 2);
                assert!((latitude + 12.0005).abs() < 1e-9);
                assert!((longitude + 77.0005).abs() < 1e-9);
            }
            other => panic!("expected cluster, got {:?}", other),
        }
    }

    #[test]
    fn distant_points_stay_separate() {
        let markers = cluster_points(vec![point(-12.0, -77.0), point(-16.4, -71.5)], 8);
        assert_eq!(markers.len(), 2);
        assert!(markers.iter().all(|m| matches!(m, MapMarker::Point(_))));
    }

    #[test]
    fn higher_zoom_splits_clusters() {
        let pts = vec![point(-12.00, -77.00), point(-12.30, -77.30)];
        let low = cluster_points(pts.clone(), 4);
        let high = cluster_points(pts, 14);
        assert_eq!(low.len(), 1);
        assert_eq!(high.len(), 2);
    }
}
