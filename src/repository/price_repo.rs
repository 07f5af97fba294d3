use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::Page;
use crate::error::ApiError;
use crate::models::market_price::MarketPrice;

pub struct PriceRepository {
    pool: PgPool,
}

pub struct NewPrice {
    pub product: String,
    pub market: String,
    pub price_per_kg: Decimal,
    pub currency: String,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl PriceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        product: Option<&str>,
        market: Option<&str>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        page: Page,
    ) -> Result<Vec<MarketPrice>, ApiError> {
        let rows = sqlx::query_as::<_, MarketPrice>(
            r#"
            SELECT * FROM market_prices
            WHERE ($1::text IS NULL OR product = $1)
              AND ($2::text IS NULL OR market = $2)
              AND ($3::timestamptz IS NULL OR recorded_at >= $3)
              AND ($4::timestamptz IS NULL OR recorded_at <= $4)
            ORDER BY recorded_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(product)
        .bind(market)
        .bind(from)
        .bind(to)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find(&self, id: Uuid) -> Result<MarketPrice, ApiError> {
        sqlx::query_as::<_, MarketPrice>("SELECT * FROM market_prices WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::NotFound("market price"))
    }

    pub async fn insert(&self, new: NewPrice) -> Result<MarketPrice, ApiError> {
        let price = sqlx::query_as::<_, MarketPrice>(
            r#"
            INSERT INTO market_prices (id, product, market, price_per_kg, currency, recorded_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.product)
        .bind(&new.market)
        .bind(new.price_per_kg)
        .bind(&new.currency)
        .bind(new.recorded_at.unwrap_or_else(Utc::now))
        .fetch_one(&self.pool)
        .await?;

        Ok(price)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM market_prices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("market price"));
        }

        Ok(())
    }

    /// Newest record per market for one product.
    pub async fn latest_for_product(&self, product: &str) -> Result<Vec<MarketPrice>, ApiError> {
        let rows = sqlx::query_as::<_, MarketPrice>(
            r#"
            SELECT DISTINCT ON (market) *
            FROM market_prices
            WHERE product = $1
            ORDER BY market, recorded_at DESC
            "#,
        )
        .bind(product)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
