use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::{page, ApiError};
use crate::models::market_price::MarketPrice;
use crate::repository::price_repo::NewPrice;
use crate::services::AppState;

#[derive(Deserialize)]
pub struct ListPricesQuery {
    pub product: Option<String>,
    pub market: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct PricePayload {
    pub product: String,
    pub market: String,
    pub price_per_kg: Decimal,
    pub currency: Option<String>,
    pub recorded_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
pub struct LatestQuery {
    pub product: String,
}

pub async fn list_prices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPricesQuery>,
) -> Result<Json<Vec<MarketPrice>>, ApiError> {
    let prices = state
        .prices
        .list(
            query.product.as_deref(),
            query.market.as_deref(),
            query.from,
            query.to,
            page(query.limit, query.offset, state.config.max_page_size),
        )
        .await?;

    Ok(Json(prices))
}

pub async fn get_price(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MarketPrice>, ApiError> {
    Ok(Json(state.prices.find(id).await?))
}

pub async fn create_price(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PricePayload>,
) -> Result<(StatusCode, Json<MarketPrice>), ApiError> {
    if payload.product.trim().is_empty() || payload.market.trim().is_empty() {
        return Err(ApiError::validation("product and market must not be empty"));
    }
    if payload.price_per_kg <= Decimal::ZERO {
        return Err(ApiError::validation("price must be positive"));
    }

    let price = state
        .prices
        .insert(NewPrice {
            product: payload.product,
            market: payload.market,
            price_per_kg: payload.price_per_kg,
            currency: payload.currency.unwrap_or_else(|| "PEN".to_string()),
            recorded_at: payload.recorded_at,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(price)))
}

pub async fn delete_price(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.prices.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Newest price per market for a product.
pub async fn latest_prices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LatestQuery>,
) -> Result<Json<Vec<MarketPrice>>, ApiError> {
    Ok(Json(state.prices.latest_for_product(&query.product).await?))
}
