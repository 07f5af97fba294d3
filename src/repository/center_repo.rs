use sqlx::PgPool;
use uuid::Uuid;

use super::Page;
use crate::error::ApiError;
use crate::models::center::CollectionCenter;
use crate::services::geo::BoundingBox;

pub struct CenterRepository {
    pool: PgPool,
}

pub struct NewCenter {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity_tons: f64,
    pub manager: Option<String>,
}

impl CenterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        active: Option<bool>,
        min_capacity: Option<f64>,
        page: Page,
    ) -> Result<Vec<CollectionCenter>, ApiError> {
        let rows = sqlx::query_as::<_, CollectionCenter>(
            r#"
            SELECT * FROM collection_centers
            WHERE ($1::bool IS NULL OR is_active = $1)
              AND ($2::float8 IS NULL OR capacity_tons >= $2)
            ORDER BY name
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(active)
        .bind(min_capacity)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find(&self, id: Uuid) -> Result<CollectionCenter, ApiError> {
        sqlx::query_as::<_, CollectionCenter>("SELECT * FROM collection_centers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::NotFound("collection center"))
    }

    pub async fn insert(&self, new: NewCenter) -> Result<CollectionCenter, ApiError> {
        let center = sqlx::query_as::<_, CollectionCenter>(
            r#"
            INSERT INTO collection_centers (id, name, latitude, longitude, capacity_tons, manager, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(new.capacity_tons)
        .bind(&new.manager)
        .fetch_one(&self.pool)
        .await?;

        Ok(center)
    }

    /// `is_active: None` keeps the stored flag.
    pub async fn update(
        &self,
        id: Uuid,
        new: NewCenter,
        is_active: Option<bool>,
    ) -> Result<CollectionCenter, ApiError> {
        sqlx::query_as::<_, CollectionCenter>(
            r#"
            UPDATE collection_centers
            SET name = $2, latitude = $3, longitude = $4, capacity_tons = $5,
                manager = $6, is_active = COALESCE($7, is_active), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&new.name)
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(new.capacity_tons)
        .bind(&new.manager)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound("collection center"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let routes: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM logistics_routes WHERE origin_center_id = $1 OR destination_center_id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if routes > 0 {
            return Err(ApiError::conflict("center is referenced by logistics routes"));
        }

        let result = sqlx::query("DELETE FROM collection_centers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("collection center"));
        }

        Ok(())
    }

    pub async fn in_bbox(&self, bbox: BoundingBox) -> Result<Vec<CollectionCenter>, ApiError> {
        let rows = sqlx::query_as::<_, CollectionCenter>(
            r#"
            SELECT * FROM collection_centers
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
}
