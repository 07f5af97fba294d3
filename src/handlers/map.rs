use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ApiError;
use crate::services::geo::{self, BoundingBox, MapMarker, MapPoint};
use crate::services::AppState;

const MAX_RADIUS_KM: f64 = 500.0;
const MAX_ZOOM: u8 = 22;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Farms,
    Centers,
    All,
}

#[derive(Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: f64,
    pub kind: Option<EntityKind>,
}

#[derive(Deserialize)]
pub struct ClustersQuery {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
    pub zoom: u8,
}

#[derive(Serialize)]
pub struct NearbyEntry {
    #[serde(flatten)]
    pub point: MapPoint,
    pub distance_km: f64,
}

fn check_coords(lat: f64, lng: f64) -> Result<(), ApiError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ApiError::validation("latitude must be within [-90, 90]"));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(ApiError::validation("longitude must be within [-180, 180]"));
    }
    Ok(())
}

async fn points_in_bbox(
    state: &AppState,
    bbox: BoundingBox,
    kind: EntityKind,
) -> Result<Vec<MapPoint>, ApiError> {
    let mut points = Vec::new();

    if matches!(kind, EntityKind::Farms | EntityKind::All) {
        for farm in state.farms.in_bbox(bbox).await? {
            points.push(MapPoint {
                id: farm.id,
                name: farm.name,
                kind: "farm",
                latitude: farm.latitude,
                longitude: farm.longitude,
            });
        }
    }

    if matches!(kind, EntityKind::Centers | EntityKind::All) {
        for center in state.centers.in_bbox(bbox).await? {
            points.push(MapPoint {
                id: center.id,
                name: center.name,
                kind: "center",
                latitude: center.latitude,
                longitude: center.longitude,
            });
        }
    }

    Ok(points)
}

/// Entities within a radius of a point, nearest first. The bounding box
/// narrows the SQL scan; the exact haversine check drops the corners.
pub async fn nearby(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<Vec<NearbyEntry>>, ApiError> {
    check_coords(query.lat, query.lng)?;
    if query.radius_km <= 0.0 || query.radius_km > MAX_RADIUS_KM {
        return Err(ApiError::validation(format!(
            "radius must be within (0, {}] km",
            MAX_RADIUS_KM
        )));
    }

    let kind = query.kind.unwrap_or(EntityKind::All);
    let bbox = BoundingBox::around(query.lat, query.lng, query.radius_km);
    let points = points_in_bbox(&state, bbox, kind).await?;

    let mut entries: Vec<NearbyEntry> = points
        .into_iter()
        .filter_map(|point| {
            let distance_km =
                geo::haversine_km(query.lat, query.lng, point.latitude, point.longitude);
            (distance_km <= query.radius_km).then_some(NearbyEntry { point, distance_km })
        })
        .collect();

    entries.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    Ok(Json(entries))
}

/// Grid-aggregated markers for the current map viewport.
pub async fn clusters(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ClustersQuery>,
) -> Result<Json<Vec<MapMarker>>, ApiError> {
    check_coords(query.min_lat, query.min_lng)?;
    check_coords(query.max_lat, query.max_lng)?;
    if query.min_lat >= query.max_lat || query.min_lng >= query.max_lng {
        return Err(ApiError::validation("viewport bounds are inverted"));
    }
    if query.zoom > MAX_ZOOM {
        return Err(ApiError::validation("zoom must be within [0, 22]"));
    }

    let bbox = BoundingBox {
        min_lat: query.min_lat,
        max_lat: query.max_lat,
        min_lng: query.min_lng,
        max_lng: query.max_lng,
    };

    let points = points_in_bbox(&state, bbox, EntityKind::All).await?;
    Ok(Json(geo::cluster_points(points, query.zoom)))
}
