use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::Page;
use crate::error::ApiError;
use crate::models::route::LogisticsRoute;

pub struct RouteRepository {
    pool: PgPool,
}

/// `distance_km` is already resolved by the handler (explicit value or
/// haversine between the two centers).
pub struct NewRoute {
    pub name: String,
    pub origin_center_id: Uuid,
    pub destination_center_id: Uuid,
    pub distance_km: f64,
    pub travel_minutes: i32,
    pub cost_per_ton: Decimal,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        active: Option<bool>,
        from: Option<Uuid>,
        to: Option<Uuid>,
        page: Page,
    ) -> Result<Vec<LogisticsRoute>, ApiError> {
        let rows = sqlx::query_as::<_, LogisticsRoute>(
            r#"
            SELECT * FROM logistics_routes
            WHERE ($1::bool IS NULL OR is_active = $1)
              AND ($2::uuid IS NULL OR origin_center_id = $2)
              AND ($3::uuid IS NULL OR destination_center_id = $3)
            ORDER BY name
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(active)
        .bind(from)
        .bind(to)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find(&self, id: Uuid) -> Result<LogisticsRoute, ApiError> {
        sqlx::query_as::<_, LogisticsRoute>("SELECT * FROM logistics_routes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::NotFound("logistics route"))
    }

    pub async fn insert(&self, new: NewRoute) -> Result<LogisticsRoute, ApiError> {
        let route = sqlx::query_as::<_, LogisticsRoute>(
            r#"
            INSERT INTO logistics_routes (id, name, origin_center_id, destination_center_id,
                                          distance_km, travel_minutes, cost_per_ton, is_active,
                                          created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, TRUE, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(new.origin_center_id)
        .bind(new.destination_center_id)
        .bind(new.distance_km)
        .bind(new.travel_minutes)
        .bind(new.cost_per_ton)
        .fetch_one(&self.pool)
        .await?;

        Ok(route)
    }

    /// `is_active: None` keeps the stored flag.
    pub async fn update(
        &self,
        id: Uuid,
        new: NewRoute,
        is_active: Option<bool>,
    ) -> Result<LogisticsRoute, ApiError> {
        sqlx::query_as::<_, LogisticsRoute>(
            r#"
            UPDATE logistics_routes
            SET name = $2, origin_center_id = $3, destination_center_id = $4,
                distance_km = $5, travel_minutes = $6, cost_per_ton = $7,
                is_active = COALESCE($8, is_active), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&new.name)
        .bind(new.origin_center_id)
        .bind(new.destination_center_id)
        .bind(new.distance_km)
        .bind(new.travel_minutes)
        .bind(new.cost_per_ton)
        .bind(is_active)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound("logistics route"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM logistics_routes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("logistics route"));
        }

        Ok(())
    }
}
