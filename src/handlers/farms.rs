use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::{page, ApiError};
use crate::models::farm::{Farm, Plot};
use crate::repository::farm_repo::{NewFarm, NewPlot};
use crate::services::AppState;

#[derive(Deserialize)]
pub struct ListFarmsQuery {
    pub producer_id: Option<Uuid>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct FarmPayload {
    pub producer_id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub hectares: f64,
}

#[derive(Deserialize)]
pub struct PlotPayload {
    pub farm_id: Uuid,
    pub name: String,
    pub hectares: f64,
    pub soil_type: Option<String>,
}

fn validate_plot(payload: &PlotPayload) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("plot name must not be empty"));
    }
    if payload.hectares <= 0.0 {
        return Err(ApiError::validation("hectares must be positive"));
    }
    Ok(())
}

fn validate_farm(payload: &FarmPayload) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("farm name must not be empty"));
    }
    if !(-90.0..=90.0).contains(&payload.latitude) {
        return Err(ApiError::validation("latitude must be within [-90, 90]"));
    }
    if !(-180.0..=180.0).contains(&payload.longitude) {
        return Err(ApiError::validation("longitude must be within [-180, 180]"));
    }
    if payload.hectares <= 0.0 {
        return Err(ApiError::validation("hectares must be positive"));
    }
    Ok(())
}

pub async fn list_farms(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListFarmsQuery>,
) -> Result<Json<Vec<Farm>>, ApiError> {
    let farms = state
        .farms
        .list(
            query.producer_id,
            page(query.limit, query.offset, state.config.max_page_size),
        )
        .await?;

    Ok(Json(farms))
}

pub async fn get_farm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Farm>, ApiError> {
    Ok(Json(state.farms.find(id).await?))
}

pub async fn create_farm(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<FarmPayload>,
) -> Result<(StatusCode, Json<Farm>), ApiError> {
    validate_farm(&payload)?;
    // Reject orphan farms up front
    state.producers.find(payload.producer_id).await?;

    let farm = state
        .farms
        .insert(NewFarm {
            producer_id: payload.producer_id,
            name: payload.name,
            latitude: payload.latitude,
            longitude: payload.longitude,
            hectares: payload.hectares,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(farm)))
}

pub async fn update_farm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<FarmPayload>,
) -> Result<Json<Farm>, ApiError> {
    validate_farm(&payload)?;
    state.producers.find(payload.producer_id).await?;

    let farm = state
        .farms
        .update(
            id,
            NewFarm {
                producer_id: payload.producer_id,
                name: payload.name,
                latitude: payload.latitude,
                longitude: payload.longitude,
                hectares: payload.hectares,
            },
        )
        .await?;

    Ok(Json(farm))
}

pub async fn delete_farm(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.farms.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_farm_plots(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Plot>>, ApiError> {
    Ok(Json(state.farms.list_plots(id).await?))
}

pub async fn get_plot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Plot>, ApiError> {
    Ok(Json(state.farms.find_plot(id).await?))
}

pub async fn create_plot(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PlotPayload>,
) -> Result<(StatusCode, Json<Plot>), ApiError> {
    validate_plot(&payload)?;

    let plot = state
        .farms
        .insert_plot(NewPlot {
            farm_id: payload.farm_id,
            name: payload.name,
            hectares: payload.hectares,
            soil_type: payload.soil_type,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(plot)))
}

pub async fn update_plot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PlotPayload>,
) -> Result<Json<Plot>, ApiError> {
    validate_plot(&payload)?;

    let plot = state
        .farms
        .update_plot(
            id,
            NewPlot {
                farm_id: payload.farm_id,
                name: payload.name,
                hectares: payload.hectares,
                soil_type: payload.soil_type,
            },
        )
        .await?;

    Ok(Json(plot))
}

pub async fn delete_plot(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.farms.delete_plot(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot_payload(name: &str, hectares: f64) -> PlotPayload {
        PlotPayload {
            farm_id: Uuid::new_v4(),
            name: name.to_string(),
            hectares,
            soil_type: None,
        }
    }

    #[test]
    fn plot_name_must_not_be_blank() {
        assert!(validate_plot(&plot_payload("  ", 1.5)).is_err());
        assert!(validate_plot(&plot_payload("", 1.5)).is_err());
        assert!(validate_plot(&plot_payload("Lote A", 1.5)).is_ok());
    }

    #[test]
    fn plot_hectares_must_be_positive() {
        assert!(validate_plot(&plot_payload("Lote A", 0.0)).is_err());
        assert!(validate_plot(&plot_payload("Lote A", -2.0)).is_err());
    }

    #[test]
    fn farm_coordinates_are_range_checked() {
        let payload = FarmPayload {
            producer_id: Uuid::new_v4(),
            name: "Fundo Santa Rosa".into(),
            latitude: -91.0,
            longitude: -77.0,
            hectares: 3.0,
        };
        assert!(validate_farm(&payload).is_err());
    }
}
