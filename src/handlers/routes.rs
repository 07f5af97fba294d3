use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::{page, ApiError};
use crate::models::route::LogisticsRoute;
use crate::repository::route_repo::NewRoute;
use crate::services::{geo, AppState};

#[derive(Deserialize)]
pub struct ListRoutesQuery {
    pub active: Option<bool>,
    pub from: Option<Uuid>,
    pub to: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct RoutePayload {
    pub name: String,
    pub origin_center_id: Uuid,
    pub destination_center_id: Uuid,
    /// Falls back to the haversine distance between the two centers.
    pub distance_km: Option<f64>,
    pub travel_minutes: i32,
    pub cost_per_ton: Decimal,
    pub is_active: Option<bool>,
}

/// Resolve the payload into an insertable route, computing the distance
/// from center coordinates when the client left it out.
async fn resolve(state: &AppState, payload: RoutePayload) -> Result<NewRoute, ApiError> {
    if payload.origin_center_id == payload.destination_center_id {
        return Err(ApiError::validation(
            "origin and destination centers must differ",
        ));
    }
    if payload.travel_minutes <= 0 {
        return Err(ApiError::validation("travel time must be positive"));
    }
    if payload.cost_per_ton < Decimal::ZERO {
        return Err(ApiError::validation("cost per ton cannot be negative"));
    }
    if let Some(d) = payload.distance_km {
        if d <= 0.0 {
            return Err(ApiError::validation("distance must be positive"));
        }
    }

    let origin = state.centers.find(payload.origin_center_id).await?;
    let destination = state.centers.find(payload.destination_center_id).await?;

    let distance_km = match payload.distance_km {
        Some(d) => d,
        None => geo::haversine_km(
            origin.latitude,
            origin.longitude,
            destination.latitude,
            destination.longitude,
        ),
    };

    Ok(NewRoute {
        name: payload.name,
        origin_center_id: payload.origin_center_id,
        destination_center_id: payload.destination_center_id,
        distance_km,
        travel_minutes: payload.travel_minutes,
        cost_per_ton: payload.cost_per_ton,
    })
}

pub async fn list_routes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListRoutesQuery>,
) -> Result<Json<Vec<LogisticsRoute>>, ApiError> {
    let routes = state
        .routes
        .list(
            query.active,
            query.from,
            query.to,
            page(query.limit, query.offset, state.config.max_page_size),
        )
        .await?;

    Ok(Json(routes))
}

pub async fn get_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<LogisticsRoute>, ApiError> {
    Ok(Json(state.routes.find(id).await?))
}

pub async fn create_route(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RoutePayload>,
) -> Result<(StatusCode, Json<LogisticsRoute>), ApiError> {
    let new = resolve(&state, payload).await?;
    let route = state.routes.insert(new).await?;
    Ok((StatusCode::CREATED, Json(route)))
}

pub async fn update_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoutePayload>,
) -> Result<Json<LogisticsRoute>, ApiError> {
    // None leaves the stored activation flag alone
    let is_active = payload.is_active;
    let new = resolve(&state, payload).await?;
    let route = state.routes.update(id, new, is_active).await?;
    Ok(Json(route))
}

pub async fn delete_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.routes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
