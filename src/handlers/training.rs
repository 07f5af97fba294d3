use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use super::{page, ApiError};
use crate::models::training::{Enrollment, EnrollmentDetail, EnrollmentStatus, TrainingSession};
use crate::repository::training_repo::NewSession;
use crate::services::AppState;

#[derive(Deserialize)]
pub struct ListSessionsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Deserialize)]
pub struct SessionPayload {
    pub topic: String,
    pub trainer: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub capacity: i32,
}

#[derive(Deserialize)]
pub struct EnrollPayload {
    pub producer_id: Uuid,
}

#[derive(Deserialize)]
pub struct EnrollmentUpdatePayload {
    pub status: EnrollmentStatus,
    pub progress_percent: i32,
}

fn validate_session(payload: &SessionPayload) -> Result<(), ApiError> {
    if payload.topic.trim().is_empty() {
        return Err(ApiError::validation("topic must not be empty"));
    }
    if payload.duration_minutes <= 0 {
        return Err(ApiError::validation("duration must be positive"));
    }
    if payload.capacity <= 0 {
        return Err(ApiError::validation("capacity must be positive"));
    }
    Ok(())
}

pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<Vec<TrainingSession>>, ApiError> {
    let sessions = state
        .training
        .list_sessions(page(query.limit, query.offset, state.config.max_page_size))
        .await?;

    Ok(Json(sessions))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TrainingSession>, ApiError> {
    Ok(Json(state.training.find_session(id).await?))
}

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SessionPayload>,
) -> Result<(StatusCode, Json<TrainingSession>), ApiError> {
    validate_session(&payload)?;

    let session = state
        .training
        .insert_session(NewSession {
            topic: payload.topic,
            trainer: payload.trainer,
            scheduled_at: payload.scheduled_at,
            duration_minutes: payload.duration_minutes,
            capacity: payload.capacity,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

pub async fn update_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SessionPayload>,
) -> Result<Json<TrainingSession>, ApiError> {
    validate_session(&payload)?;

    let session = state
        .training
        .update_session(
            id,
            NewSession {
                topic: payload.topic,
                trainer: payload.trainer,
                scheduled_at: payload.scheduled_at,
                duration_minutes: payload.duration_minutes,
                capacity: payload.capacity,
            },
        )
        .await?;

    Ok(Json(session))
}

pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.training.delete_session(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn enroll(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<EnrollPayload>,
) -> Result<(StatusCode, Json<Enrollment>), ApiError> {
    state.producers.find(payload.producer_id).await?;

    let enrollment = state.training.enroll(session_id, payload.producer_id).await?;
    Ok((StatusCode::CREATED, Json(enrollment)))
}

pub async fn update_enrollment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<EnrollmentUpdatePayload>,
) -> Result<Json<Enrollment>, ApiError> {
    if !(0..=100).contains(&payload.progress_percent) {
        return Err(ApiError::validation("progress must be within [0, 100]"));
    }

    let enrollment = state
        .training
        .update_enrollment(id, payload.status, payload.progress_percent)
        .await?;

    Ok(Json(enrollment))
}

pub async fn list_session_enrollments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<EnrollmentDetail>>, ApiError> {
    Ok(Json(state.training.enrollments_by_session(id).await?))
}

pub async fn list_producer_enrollments(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<EnrollmentDetail>>, ApiError> {
    state.producers.find(id).await?;
    Ok(Json(state.training.enrollments_by_producer(id).await?))
}
