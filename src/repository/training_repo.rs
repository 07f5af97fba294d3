use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::Page;
use crate::error::ApiError;
use crate::models::training::{Enrollment, EnrollmentDetail, EnrollmentStatus, TrainingSession};

pub struct TrainingRepository {
    pool: PgPool,
}

pub struct NewSession {
    pub topic: String,
    pub trainer: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub capacity: i32,
}

impl TrainingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_sessions(&self, page: Page) -> Result<Vec<TrainingSession>, ApiError> {
        let rows = sqlx::query_as::<_, TrainingSession>(
            "SELECT * FROM training_sessions ORDER BY scheduled_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find_session(&self, id: Uuid) -> Result<TrainingSession, ApiError> {
        sqlx::query_as::<_, TrainingSession>("SELECT * FROM training_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::NotFound("training session"))
    }

    pub async fn insert_session(&self, new: NewSession) -> Result<TrainingSession, ApiError> {
        let session = sqlx::query_as::<_, TrainingSession>(
            r#"
            INSERT INTO training_sessions (id, topic, trainer, scheduled_at, duration_minutes, capacity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.topic)
        .bind(&new.trainer)
        .bind(new.scheduled_at)
        .bind(new.duration_minutes)
        .bind(new.capacity)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    pub async fn update_session(&self, id: Uuid, new: NewSession) -> Result<TrainingSession, ApiError> {
        sqlx::query_as::<_, TrainingSession>(
            r#"
            UPDATE training_sessions
            SET topic = $2, trainer = $3, scheduled_at = $4, duration_minutes = $5,
                capacity = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&new.topic)
        .bind(&new.trainer)
        .bind(new.scheduled_at)
        .bind(new.duration_minutes)
        .bind(new.capacity)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound("training session"))
    }

    pub async fn delete_session(&self, id: Uuid) -> Result<(), ApiError> {
        let enrollments: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE session_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if enrollments > 0 {
            return Err(ApiError::conflict("session has enrollments"));
        }

        let result = sqlx::query("DELETE FROM training_sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("training session"));
        }

        Ok(())
    }

    /// Enroll a producer, enforcing the one-enrollment-per-producer rule
    /// and the session capacity inside a single transaction. The session
    /// row is locked so two concurrent enrolls cannot both pass the
    /// capacity count.
    pub async fn enroll(&self, session_id: Uuid, producer_id: Uuid) -> Result<Enrollment, ApiError> {
        let mut tx = self.pool.begin().await?;

        let session = sqlx::query_as::<_, TrainingSession>(
            "SELECT * FROM training_sessions WHERE id = $1 FOR UPDATE",
        )
        .bind(session_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound("training session"))?;

        let already: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM enrollments WHERE session_id = $1 AND producer_id = $2",
        )
        .bind(session_id)
        .bind(producer_id)
        .fetch_one(&mut *tx)
        .await?;

        if already > 0 {
            return Err(ApiError::conflict("producer is already enrolled"));
        }

        let enrolled: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE session_id = $1")
                .bind(session_id)
                .fetch_one(&mut *tx)
                .await?;

        if enrolled >= session.capacity as i64 {
            return Err(ApiError::conflict("session is at capacity"));
        }

        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (id, session_id, producer_id, status, progress_percent, enrolled_at, updated_at)
            VALUES ($1, $2, $3, $4, 0, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(session_id)
        .bind(producer_id)
        .bind(EnrollmentStatus::Enrolled.to_string())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(enrollment)
    }

    pub async fn update_enrollment(
        &self,
        id: Uuid,
        status: EnrollmentStatus,
        progress_percent: i32,
    ) -> Result<Enrollment, ApiError> {
        // Completed always reads as 100%
        let progress = if status == EnrollmentStatus::Completed {
            100
        } else {
            progress_percent
        };

        sqlx::query_as::<_, Enrollment>(
            r#"
            UPDATE enrollments
            SET status = $2, progress_percent = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.to_string())
        .bind(progress)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound("enrollment"))
    }

    pub async fn enrollments_by_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<EnrollmentDetail>, ApiError> {
        self.find_session(session_id).await?;

        let rows = sqlx::query_as::<_, EnrollmentDetail>(
            r#"
            SELECT e.id, e.session_id, e.producer_id, e.status, e.progress_percent,
                   e.enrolled_at, s.topic, p.first_name, p.last_name
            FROM enrollments e
            JOIN training_sessions s ON s.id = e.session_id
            JOIN producers p ON p.id = e.producer_id
            WHERE e.session_id = $1
            ORDER BY e.enrolled_at
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn enrollments_by_producer(
        &self,
        producer_id: Uuid,
    ) -> Result<Vec<EnrollmentDetail>, ApiError> {
        let rows = sqlx::query_as::<_, EnrollmentDetail>(
            r#"
            SELECT e.id, e.session_id, e.producer_id, e.status, e.progress_percent,
                   e.enrolled_at, s.topic, p.first_name, p.last_name
            FROM enrollments e
            JOIN training_sessions s ON s.id = e.session_id
            JOIN producers p ON p.id = e.producer_id
            WHERE e.producer_id = $1
            ORDER BY s.scheduled_at DESC
            "#,
        )
        .bind(producer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
