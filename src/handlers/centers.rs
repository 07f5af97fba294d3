use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::{page, ApiError};
use crate::models::center::CollectionCenter;
use crate::repository::center_repo::NewCenter;
use crate::services::AppState;

#[derive(Deserialize)]
pub struct ListCentersQuery {
    pub active: Option<bool>,
    pub min_capacity: Option<f64>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CenterPayload {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity_tons: f64,
    pub manager: Option<String>,
    pub is_active: Option<bool>,
}

fn validate(payload: &CenterPayload) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("center name must not be empty"));
    }
    if !(-90.0..=90.0).contains(&payload.latitude) {
        return Err(ApiError::validation("latitude must be within [-90, 90]"));
    }
    if !(-180.0..=180.0).contains(&payload.longitude) {
        return Err(ApiError::validation("longitude must be within [-180, 180]"));
    }
    if payload.capacity_tons <= 0.0 {
        return Err(ApiError::validation("capacity must be positive"));
    }
    Ok(())
}

pub async fn list_centers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCentersQuery>,
) -> Result<Json<Vec<CollectionCenter>>, ApiError> {
    let centers = state
        .centers
        .list(
            query.active,
            query.min_capacity,
            page(query.limit, query.offset, state.config.max_page_size),
        )
        .await?;

    Ok(Json(centers))
}

pub async fn get_center(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CollectionCenter>, ApiError> {
    Ok(Json(state.centers.find(id).await?))
}

pub async fn create_center(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CenterPayload>,
) -> Result<(StatusCode, Json<CollectionCenter>), ApiError> {
    validate(&payload)?;

    let center = state
        .centers
        .insert(NewCenter {
            name: payload.name,
            latitude: payload.latitude,
            longitude: payload.longitude,
            capacity_tons: payload.capacity_tons,
            manager: payload.manager,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(center)))
}

pub async fn update_center(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CenterPayload>,
) -> Result<Json<CollectionCenter>, ApiError> {
    validate(&payload)?;

    // None leaves the stored activation flag alone
    let is_active = payload.is_active;
    let center = state
        .centers
        .update(
            id,
            NewCenter {
                name: payload.name,
                latitude: payload.latitude,
                longitude: payload.longitude,
                capacity_tons: payload.capacity_tons,
                manager: payload.manager,
            },
            is_active,
        )
        .await?;

    Ok(Json(center))
}

pub async fn delete_center(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.centers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
