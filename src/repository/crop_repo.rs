use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::Page;
use crate::error::ApiError;
use crate::models::crop::{Crop, CropStatus};

pub struct CropRepository {
    pool: PgPool,
}

pub struct NewCrop {
    pub producer_id: Uuid,
    pub plot_id: Option<Uuid>,
    pub product: String,
    pub variety: Option<String>,
    pub hectares: f64,
    pub planted_at: NaiveDate,
    pub expected_harvest_at: Option<NaiveDate>,
}

impl CropRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        status: Option<CropStatus>,
        producer_id: Option<Uuid>,
        product: Option<&str>,
        in_progress: bool,
        page: Page,
    ) -> Result<Vec<Crop>, ApiError> {
        let rows = sqlx::query_as::<_, Crop>(
            r#"
            SELECT * FROM crops
            WHERE ($1::text IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR producer_id = $2)
              AND ($3::text IS NULL OR product = $3)
              AND (NOT $4 OR status IN ('planted', 'growing'))
            ORDER BY planted_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(status.map(|s| s.to_string()))
        .bind(producer_id)
        .bind(product)
        .bind(in_progress)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find(&self, id: Uuid) -> Result<Crop, ApiError> {
        sqlx::query_as::<_, Crop>("SELECT * FROM crops WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::NotFound("crop"))
    }

    pub async fn insert(&self, new: NewCrop) -> Result<Crop, ApiError> {
        let crop = sqlx::query_as::<_, Crop>(
            r#"
            INSERT INTO crops (id, producer_id, plot_id, product, variety, hectares,
                               planted_at, expected_harvest_at, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.producer_id)
        .bind(new.plot_id)
        .bind(&new.product)
        .bind(&new.variety)
        .bind(new.hectares)
        .bind(new.planted_at)
        .bind(new.expected_harvest_at)
        .bind(CropStatus::Planted.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(crop)
    }

    pub async fn update(&self, id: Uuid, new: NewCrop) -> Result<Crop, ApiError> {
        sqlx::query_as::<_, Crop>(
            r#"
            UPDATE crops
            SET producer_id = $2, plot_id = $3, product = $4, variety = $5,
                hectares = $6, planted_at = $7, expected_harvest_at = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(new.producer_id)
        .bind(new.plot_id)
        .bind(&new.product)
        .bind(&new.variety)
        .bind(new.hectares)
        .bind(new.planted_at)
        .bind(new.expected_harvest_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound("crop"))
    }

    /// Lifecycle transition; the validity check against the current state
    /// happens here so the read and the write share one round-trip window.
    pub async fn transition(&self, id: Uuid, next: CropStatus) -> Result<Crop, ApiError> {
        let crop = self.find(id).await?;

        let current = crop
            .status()
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("corrupt crop status")))?;

        if !current.can_transition_to(next) {
            return Err(ApiError::validation(format!(
                "cannot move crop from {} to {}",
                current, next
            )));
        }

        let updated = sqlx::query_as::<_, Crop>(
            "UPDATE crops SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(next.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM crops WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("crop"));
        }

        Ok(())
    }
}
