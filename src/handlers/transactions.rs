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
use crate::models::transaction::{Transaction, TransactionSummary, TransactionType};
use crate::repository::transaction_repo::NewTransaction;
use crate::services::AppState;

#[derive(Deserialize)]
pub struct ListTransactionsQuery {
    pub producer_id: Option<Uuid>,
    pub center_id: Option<Uuid>,
    pub transaction_type: Option<TransactionType>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct TransactionPayload {
    pub producer_id: Uuid,
    pub center_id: Uuid,
    pub transaction_type: TransactionType,
    pub product: String,
    pub quantity_kg: Decimal,
    pub unit_price: Decimal,
    pub occurred_at: Option<DateTime<Utc>>,
}

pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTransactionsQuery>,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let transactions = state
        .transactions
        .list(
            query.producer_id,
            query.center_id,
            query.transaction_type,
            query.from,
            query.to,
            page(query.limit, query.offset, state.config.max_page_size),
        )
        .await?;

    Ok(Json(transactions))
}

pub async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Transaction>, ApiError> {
    Ok(Json(state.transactions.find(id).await?))
}

pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TransactionPayload>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    if payload.product.trim().is_empty() {
        return Err(ApiError::validation("product must not be empty"));
    }
    if payload.quantity_kg <= Decimal::ZERO {
        return Err(ApiError::validation("quantity must be positive"));
    }
    if payload.unit_price < Decimal::ZERO {
        return Err(ApiError::validation("unit price cannot be negative"));
    }

    state.producers.find(payload.producer_id).await?;
    state.centers.find(payload.center_id).await?;

    let transaction = state
        .transactions
        .insert(NewTransaction {
            producer_id: payload.producer_id,
            center_id: payload.center_id,
            transaction_type: payload.transaction_type,
            product: payload.product,
            quantity_kg: payload.quantity_kg,
            unit_price: payload.unit_price,
            occurred_at: payload.occurred_at,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.transactions.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn producer_summary(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TransactionSummary>>, ApiError> {
    state.producers.find(id).await?;
    Ok(Json(state.transactions.summary_for_producer(id).await?))
}
