use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::Page;
use crate::error::ApiError;
use crate::models::transaction::{Transaction, TransactionSummary, TransactionType};

pub struct TransactionRepository {
    pool: PgPool,
}

pub struct NewTransaction {
    pub producer_id: Uuid,
    pub center_id: Uuid,
    pub transaction_type: TransactionType,
    pub product: String,
    pub quantity_kg: Decimal,
    pub unit_price: Decimal,
    pub occurred_at: Option<DateTime<Utc>>,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn list(
        &self,
        producer_id: Option<Uuid>,
        center_id: Option<Uuid>,
        transaction_type: Option<TransactionType>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        page: Page,
    ) -> Result<Vec<Transaction>, ApiError> {
        let rows = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE ($1::uuid IS NULL OR producer_id = $1)
              AND ($2::uuid IS NULL OR center_id = $2)
              AND ($3::text IS NULL OR transaction_type = $3)
              AND ($4::timestamptz IS NULL OR occurred_at >= $4)
              AND ($5::timestamptz IS NULL OR occurred_at <= $5)
            ORDER BY occurred_at DESC
            LIMIT $6 OFFSET $7
            "#,
        )
        .bind(producer_id)
        .bind(center_id)
        .bind(transaction_type.map(|t| t.to_string()))
        .bind(from)
        .bind(to)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find(&self, id: Uuid) -> Result<Transaction, ApiError> {
        sqlx::query_as::<_, Transaction>("SELECT * FROM transactions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::NotFound("transaction"))
    }

    pub async fn insert(&self, new: NewTransaction) -> Result<Transaction, ApiError> {
        // total is derived here, never trusted from the client
        let total = new.quantity_kg * new.unit_price;

        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (id, producer_id, center_id, transaction_type, product,
                                      quantity_kg, unit_price, total, occurred_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.producer_id)
        .bind(new.center_id)
        .bind(new.transaction_type.to_string())
        .bind(&new.product)
        .bind(new.quantity_kg)
        .bind(new.unit_price)
        .bind(total)
        .bind(new.occurred_at.unwrap_or_else(Utc::now))
        .fetch_one(&self.pool)
        .await?;

        Ok(transaction)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("transaction"));
        }

        Ok(())
    }

    /// Count and total amount per transaction type for one producer.
    pub async fn summary_for_producer(
        &self,
        producer_id: Uuid,
    ) -> Result<Vec<TransactionSummary>, ApiError> {
        let rows = sqlx::query_as::<_, TransactionSummary>(
            r#"
            SELECT transaction_type, COUNT(*) AS count, COALESCE(SUM(total), 0) AS total_amount
            FROM transactions
            WHERE producer_id = $1
            GROUP BY transaction_type
            ORDER BY transaction_type
            "#,
        )
        .bind(producer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
