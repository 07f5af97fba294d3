use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::{page, ApiError};
use crate::models::producer::Producer;
use crate::repository::producer_repo::NewProducer;
use crate::services::AppState;

#[derive(Deserialize)]
pub struct ListProducersQuery {
    pub active: Option<bool>,
    pub community: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct ProducerPayload {
    pub dni: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub community: String,
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
pub struct ProducerResponse {
    #[serde(flatten)]
    pub producer: Producer,
    pub full_name: String,
}

impl From<Producer> for ProducerResponse {
    fn from(producer: Producer) -> Self {
        let full_name = producer.full_name();
        Self {
            producer,
            full_name,
        }
    }
}

fn validate(payload: &ProducerPayload) -> Result<(), ApiError> {
    if payload.dni.trim().is_empty() {
        return Err(ApiError::validation("dni must not be empty"));
    }
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(ApiError::validation("producer name must not be empty"));
    }
    Ok(())
}

pub async fn list_producers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListProducersQuery>,
) -> Result<Json<Vec<ProducerResponse>>, ApiError> {
    let producers = state
        .producers
        .list(
            query.active,
            query.community.as_deref(),
            query.search.as_deref(),
            page(query.limit, query.offset, state.config.max_page_size),
        )
        .await?;

    Ok(Json(producers.into_iter().map(Into::into).collect()))
}

pub async fn get_producer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProducerResponse>, ApiError> {
    Ok(Json(state.producers.find(id).await?.into()))
}

pub async fn create_producer(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ProducerPayload>,
) -> Result<(StatusCode, Json<ProducerResponse>), ApiError> {
    validate(&payload)?;

    let producer = state
        .producers
        .insert(NewProducer {
            dni: payload.dni,
            first_name: payload.first_name,
            last_name: payload.last_name,
            phone: payload.phone,
            email: payload.email,
            community: payload.community,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(producer.into())))
}

pub async fn update_producer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProducerPayload>,
) -> Result<Json<ProducerResponse>, ApiError> {
    validate(&payload)?;

    // None leaves the stored activation flag alone
    let is_active = payload.is_active;
    let producer = state
        .producers
        .update(
            id,
            NewProducer {
                dni: payload.dni,
                first_name: payload.first_name,
                last_name: payload.last_name,
                phone: payload.phone,
                email: payload.email,
                community: payload.community,
            },
            is_active,
        )
        .await?;

    Ok(Json(producer.into()))
}

pub async fn delete_producer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.producers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_is_active_deserializes_to_none() {
        // The update path hands this straight to COALESCE, so an update
        // without the flag must not read as "re-activate".
        let payload: ProducerPayload = serde_json::from_value(serde_json::json!({
            "dni": "45678912",
            "first_name": "Rosa",
            "last_name": "Huamán",
            "community": "Pampas",
        }))
        .unwrap();
        assert_eq!(payload.is_active, None);

        let payload: ProducerPayload = serde_json::from_value(serde_json::json!({
            "dni": "45678912",
            "first_name": "Rosa",
            "last_name": "Huamán",
            "community": "Pampas",
            "is_active": false,
        }))
        .unwrap();
        assert_eq!(payload.is_active, Some(false));
    }
}
