use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::{page, ApiError};
use crate::models::supply::{InventoryMovement, MovementType, Supply};
use crate::repository::supply_repo::{NewMovement, NewSupply};
use crate::services::AppState;

#[derive(Deserialize)]
pub struct ListSuppliesQuery {
    pub category: Option<String>,
    #[serde(default)]
    pub low_stock: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct SupplyPayload {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub minimum_stock: Decimal,
}

#[derive(Deserialize)]
pub struct ListMovementsQuery {
    pub supply_id: Option<Uuid>,
    pub movement_type: Option<MovementType>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct MovementPayload {
    pub supply_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub note: Option<String>,
    pub moved_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct StockResponse {
    pub supply_id: Uuid,
    pub stock: Decimal,
    pub minimum_stock: Decimal,
    pub low: bool,
}

fn validate_supply(payload: &SupplyPayload) -> Result<(), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::validation("supply name must not be empty"));
    }
    if payload.minimum_stock < Decimal::ZERO {
        return Err(ApiError::validation("minimum stock cannot be negative"));
    }
    Ok(())
}

pub async fn list_supplies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListSuppliesQuery>,
) -> Result<Json<Vec<Supply>>, ApiError> {
    let supplies = state
        .supplies
        .list(
            query.category.as_deref(),
            query.low_stock,
            page(query.limit, query.offset, state.config.max_page_size),
        )
        .await?;

    Ok(Json(supplies))
}

pub async fn get_supply(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Supply>, ApiError> {
    Ok(Json(state.supplies.find(id).await?))
}

pub async fn create_supply(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SupplyPayload>,
) -> Result<(StatusCode, Json<Supply>), ApiError> {
    validate_supply(&payload)?;

    let supply = state
        .supplies
        .insert(NewSupply {
            name: payload.name,
            category: payload.category,
            unit: payload.unit,
            minimum_stock: payload.minimum_stock,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(supply)))
}

pub async fn update_supply(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SupplyPayload>,
) -> Result<Json<Supply>, ApiError> {
    validate_supply(&payload)?;

    let supply = state
        .supplies
        .update(
            id,
            NewSupply {
                name: payload.name,
                category: payload.category,
                unit: payload.unit,
                minimum_stock: payload.minimum_stock,
            },
        )
        .await?;

    Ok(Json(supply))
}

pub async fn delete_supply(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.supplies.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_stock(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<StockResponse>, ApiError> {
    let supply = state.supplies.find(id).await?;
    let stock = state.supplies.stock(id).await?;

    Ok(Json(StockResponse {
        supply_id: id,
        stock,
        minimum_stock: supply.minimum_stock,
        low: stock <= supply.minimum_stock,
    }))
}

pub async fn list_movements(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListMovementsQuery>,
) -> Result<Json<Vec<InventoryMovement>>, ApiError> {
    let movements = state
        .supplies
        .list_movements(
            query.supply_id,
            query.movement_type,
            page(query.limit, query.offset, state.config.max_page_size),
        )
        .await?;

    Ok(Json(movements))
}

pub async fn create_movement(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<MovementPayload>,
) -> Result<(StatusCode, Json<InventoryMovement>), ApiError> {
    // In/out quantities must be positive; adjustments may be negative
    // but not zero.
    match payload.movement_type {
        MovementType::In | MovementType::Out => {
            if payload.quantity <= Decimal::ZERO {
                return Err(ApiError::validation("quantity must be positive"));
            }
        }
        MovementType::Adjustment => {
            if payload.quantity == Decimal::ZERO {
                return Err(ApiError::validation("adjustment quantity cannot be zero"));
            }
        }
    }

    let movement = state
        .supplies
        .insert_movement(NewMovement {
            supply_id: payload.supply_id,
            movement_type: payload.movement_type,
            quantity: payload.quantity,
            note: payload.note,
            moved_at: payload.moved_at,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(movement)))
}
