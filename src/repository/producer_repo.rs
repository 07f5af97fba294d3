use sqlx::PgPool;
use uuid::Uuid;

use super::Page;
use crate::error::ApiError;
use crate::models::producer::Producer;

pub struct ProducerRepository {
    pool: PgPool,
}

pub struct NewProducer {
    pub dni: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub community: String,
}

impl ProducerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        active: Option<bool>,
        community: Option<&str>,
        search: Option<&str>,
        page: Page,
    ) -> Result<Vec<Producer>, ApiError> {
        let rows = sqlx::query_as::<_, Producer>(
            r#"
            SELECT * FROM producers
            WHERE ($1::bool IS NULL OR is_active = $1)
              AND ($2::text IS NULL OR community = $2)
              AND ($3::text IS NULL OR
                   first_name ILIKE '%' || $3 || '%' OR
                   last_name ILIKE '%' || $3 || '%' OR
                   dni ILIKE '%' || $3 || '%')
            ORDER BY last_name, first_name
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(active)
        .bind(community)
        .bind(search)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find(&self, id: Uuid) -> Result<Producer, ApiError> {
        sqlx::query_as::<_, Producer>("SELECT * FROM producers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::NotFound("producer"))
    }

    pub async fn insert(&self, new: NewProducer) -> Result<Producer, ApiError> {
        let producer = sqlx::query_as::<_, Producer>(
            r#"
            INSERT INTO producers (id, dni, first_name, last_name, phone, email, community, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.dni)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(&new.community)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApiError::conflict(format!("producer with dni {} already exists", new.dni))
            }
            _ => e.into(),
        })?;

        Ok(producer)
    }

    /// `is_active: None` keeps the stored flag, so a plain field update
    /// cannot silently re-activate a deactivated producer.
    pub async fn update(
        &self,
        id: Uuid,
        new: NewProducer,
        is_active: Option<bool>,
    ) -> Result<Producer, ApiError> {
        sqlx::query_as::<_, Producer>(
            r#"
            UPDATE producers
            SET dni = $2, first_name = $3, last_name = $4, phone = $5,
                email = $6, community = $7, is_active = COALESCE($8, is_active),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&new.dni)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.phone)
        .bind(&new.email)
        .bind(&new.community)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound("producer"))
    }

    /// Hard delete, rejected while dependent rows still reference the
    /// producer.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let dependents: i64 = sqlx::query_scalar(
            r#"
            SELECT (SELECT COUNT(*) FROM crops WHERE producer_id = $1)
                 + (SELECT COUNT(*) FROM farms WHERE producer_id = $1)
                 + (SELECT COUNT(*) FROM transactions WHERE producer_id = $1)
                 + (SELECT COUNT(*) FROM enrollments WHERE producer_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if dependents > 0 {
            return Err(ApiError::conflict(
                "producer has dependent records and cannot be deleted",
            ));
        }

        let result = sqlx::query("DELETE FROM producers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("producer"));
        }

        Ok(())
    }
}
