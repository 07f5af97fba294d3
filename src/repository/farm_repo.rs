use sqlx::PgPool;
use uuid::Uuid;

use super::Page;
use crate::error::ApiError;
use crate::models::farm::{Farm, Plot};
use crate::services::geo::BoundingBox;

pub struct FarmRepository {
    pool: PgPool,
}

pub struct NewFarm {
    pub producer_id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub hectares: f64,
}

pub struct NewPlot {
    pub farm_id: Uuid,
    pub name: String,
    pub hectares: f64,
    pub soil_type: Option<String>,
}

impl FarmRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, producer_id: Option<Uuid>, page: Page) -> Result<Vec<Farm>, ApiError> {
        let rows = sqlx::query_as::<_, Farm>(
            r#"
            SELECT * FROM farms
            WHERE ($1::uuid IS NULL OR producer_id = $1)
            ORDER BY name
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(producer_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find(&self, id: Uuid) -> Result<Farm, ApiError> {
        sqlx::query_as::<_, Farm>("SELECT * FROM farms WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::NotFound("farm"))
    }

    pub async fn insert(&self, new: NewFarm) -> Result<Farm, ApiError> {
        let farm = sqlx::query_as::<_, Farm>(
            r#"
            INSERT INTO farms (id, producer_id, name, latitude, longitude, hectares, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.producer_id)
        .bind(&new.name)
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(new.hectares)
        .fetch_one(&self.pool)
        .await?;

        Ok(farm)
    }

    pub async fn update(&self, id: Uuid, new: NewFarm) -> Result<Farm, ApiError> {
        sqlx::query_as::<_, Farm>(
            r#"
            UPDATE farms
            SET producer_id = $2, name = $3, latitude = $4, longitude = $5,
                hectares = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(new.producer_id)
        .bind(&new.name)
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(new.hectares)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound("farm"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let plots: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM plots WHERE farm_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if plots > 0 {
            return Err(ApiError::conflict("farm still has plots"));
        }

        let result = sqlx::query("DELETE FROM farms WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("farm"));
        }

        Ok(())
    }

    /// Farms inside a bounding box, for the map prefilter.
    pub async fn in_bbox(&self, bbox: BoundingBox) -> Result<Vec<Farm>, ApiError> {
        let rows = sqlx::query_as::<_, Farm>(
            r#"
            SELECT * FROM farms
            WHERE latitude BETWEEN $1 AND $2
              AND longitude BETWEEN $3 AND $4
            "#,
        )
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lng)
        .bind(bbox.max_lng)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // Plots

    pub async fn list_plots(&self, farm_id: Uuid) -> Result<Vec<Plot>, ApiError> {
        // 404 for an unknown farm rather than an empty list
        self.find(farm_id).await?;

        let rows = sqlx::query_as::<_, Plot>(
            "SELECT * FROM plots WHERE farm_id = $1 ORDER BY name",
        )
        .bind(farm_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find_plot(&self, id: Uuid) -> Result<Plot, ApiError> {
        sqlx::query_as::<_, Plot>("SELECT * FROM plots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::NotFound("plot"))
    }

    pub async fn insert_plot(&self, new: NewPlot) -> Result<Plot, ApiError> {
        self.find(new.farm_id).await?;

        let plot = sqlx::query_as::<_, Plot>(
            r#"
            INSERT INTO plots (id, farm_id, name, hectares, soil_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.farm_id)
        .bind(&new.name)
        .bind(new.hectares)
        .bind(&new.soil_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(plot)
    }

    pub async fn update_plot(&self, id: Uuid, new: NewPlot) -> Result<Plot, ApiError> {
        sqlx::query_as::<_, Plot>(
            r#"
            UPDATE plots
            SET farm_id = $2, name = $3, hectares = $4, soil_type = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(new.farm_id)
        .bind(&new.name)
        .bind(new.hectares)
        .bind(&new.soil_type)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound("plot"))
    }

    pub async fn delete_plot(&self, id: Uuid) -> Result<(), ApiError> {
        let crops: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM crops WHERE plot_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        if crops > 0 {
            return Err(ApiError::conflict("plot still has crops"));
        }

        let result = sqlx::query("DELETE FROM plots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("plot"));
        }

        Ok(())
    }
}
