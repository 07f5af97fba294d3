use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::{page, ApiError};
use crate::models::crop::{Crop, CropStatus};
use crate::repository::crop_repo::NewCrop;
use crate::services::AppState;

#[derive(Deserialize)]
pub struct ListCropsQuery {
    pub status: Option<CropStatus>,
    pub producer_id: Option<Uuid>,
    pub product: Option<String>,
    #[serde(default)]
    pub in_progress: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct CropPayload {
    pub producer_id: Uuid,
    pub plot_id: Option<Uuid>,
    pub product: String,
    pub variety: Option<String>,
    pub hectares: f64,
    pub planted_at: NaiveDate,
    pub expected_harvest_at: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct StatusPayload {
    pub status: CropStatus,
}

/// Crop plus the display accessors the dashboard renders.
#[derive(Serialize)]
pub struct CropResponse {
    #[serde(flatten)]
    pub crop: Crop,
    pub status_label: &'static str,
    pub status_color: &'static str,
}

impl From<Crop> for CropResponse {
    fn from(crop: Crop) -> Self {
        let (status_label, status_color) = match crop.status() {
            Some(status) => (status.label(), status.color()),
            None => ("Unknown", "gray"),
        };
        Self {
            crop,
            status_label,
            status_color,
        }
    }
}

fn validate(payload: &CropPayload) -> Result<(), ApiError> {
    if payload.product.trim().is_empty() {
        return Err(ApiError::validation("product must not be empty"));
    }
    if payload.hectares <= 0.0 {
        return Err(ApiError::validation("hectares must be positive"));
    }
    if let Some(harvest) = payload.expected_harvest_at {
        if harvest < payload.planted_at {
            return Err(ApiError::validation(
                "expected harvest date cannot precede planting date",
            ));
        }
    }
    Ok(())
}

pub async fn list_crops(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListCropsQuery>,
) -> Result<Json<Vec<CropResponse>>, ApiError> {
    let crops = state
        .crops
        .list(
            query.status,
            query.producer_id,
            query.product.as_deref(),
            query.in_progress,
            page(query.limit, query.offset, state.config.max_page_size),
        )
        .await?;

    Ok(Json(crops.into_iter().map(Into::into).collect()))
}

pub async fn get_crop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<CropResponse>, ApiError> {
    Ok(Json(state.crops.find(id).await?.into()))
}

pub async fn create_crop(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CropPayload>,
) -> Result<(StatusCode, Json<CropResponse>), ApiError> {
    validate(&payload)?;
    state.producers.find(payload.producer_id).await?;
    if let Some(plot_id) = payload.plot_id {
        state.farms.find_plot(plot_id).await?;
    }

    let crop = state
        .crops
        .insert(NewCrop {
            producer_id: payload.producer_id,
            plot_id: payload.plot_id,
            product: payload.product,
            variety: payload.variety,
            hectares: payload.hectares,
            planted_at: payload.planted_at,
            expected_harvest_at: payload.expected_harvest_at,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(crop.into())))
}

pub async fn update_crop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CropPayload>,
) -> Result<Json<CropResponse>, ApiError> {
    validate(&payload)?;
    state.producers.find(payload.producer_id).await?;
    if let Some(plot_id) = payload.plot_id {
        state.farms.find_plot(plot_id).await?;
    }

    let crop = state
        .crops
        .update(
            id,
            NewCrop {
                producer_id: payload.producer_id,
                plot_id: payload.plot_id,
                product: payload.product,
                variety: payload.variety,
                hectares: payload.hectares,
                planted_at: payload.planted_at,
                expected_harvest_at: payload.expected_harvest_at,
            },
        )
        .await?;

    Ok(Json(crop.into()))
}

pub async fn update_crop_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<StatusPayload>,
) -> Result<Json<CropResponse>, ApiError> {
    let crop = state.crops.transition(id, payload.status).await?;
    Ok(Json(crop.into()))
}

pub async fn delete_crop(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.crops.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
