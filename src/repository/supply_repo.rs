use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::Page;
use crate::error::ApiError;
use crate::models::supply::{InventoryMovement, MovementType, Supply};

pub struct SupplyRepository {
    pool: PgPool,
}

pub struct NewSupply {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub minimum_stock: Decimal,
}

pub struct NewMovement {
    pub supply_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub note: Option<String>,
    pub moved_at: Option<DateTime<Utc>>,
}

impl SupplyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(
        &self,
        category: Option<&str>,
        low_stock: bool,
        page: Page,
    ) -> Result<Vec<Supply>, ApiError> {
        // Stock is derived, not stored; the low-stock scope folds the
        // ledger in SQL.
        let rows = sqlx::query_as::<_, Supply>(
            r#"
            SELECT s.* FROM supplies s
            WHERE ($1::text IS NULL OR s.category = $1)
              AND (NOT $2 OR COALESCE((
                    SELECT SUM(CASE m.movement_type WHEN 'out' THEN -m.quantity ELSE m.quantity END)
                    FROM inventory_movements m WHERE m.supply_id = s.id
                  ), 0) <= s.minimum_stock)
            ORDER BY s.name
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(category)
        .bind(low_stock)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn find(&self, id: Uuid) -> Result<Supply, ApiError> {
        sqlx::query_as::<_, Supply>("SELECT * FROM supplies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::NotFound("supply"))
    }

    pub async fn insert(&self, new: NewSupply) -> Result<Supply, ApiError> {
        let supply = sqlx::query_as::<_, Supply>(
            r#"
            INSERT INTO supplies (id, name, category, unit, minimum_stock, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.category)
        .bind(&new.unit)
        .bind(new.minimum_stock)
        .fetch_one(&self.pool)
        .await?;

        Ok(supply)
    }

    pub async fn update(&self, id: Uuid, new: NewSupply) -> Result<Supply, ApiError> {
        sqlx::query_as::<_, Supply>(
            r#"
            UPDATE supplies
            SET name = $2, category = $3, unit = $4, minimum_stock = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&new.name)
        .bind(&new.category)
        .bind(&new.unit)
        .bind(new.minimum_stock)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound("supply"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let movements: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM inventory_movements WHERE supply_id = $1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if movements > 0 {
            return Err(ApiError::conflict("supply has recorded movements"));
        }

        let result = sqlx::query("DELETE FROM supplies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("supply"));
        }

        Ok(())
    }

    /// Current stock: sum(in) - sum(out) + sum(adjustment).
    pub async fn stock(&self, supply_id: Uuid) -> Result<Decimal, ApiError> {
        self.find(supply_id).await?;

        let stock: Option<Decimal> = sqlx::query_scalar(
            r#"
            SELECT SUM(CASE movement_type WHEN 'out' THEN -quantity ELSE quantity END)
            FROM inventory_movements
            WHERE supply_id = $1
            "#,
        )
        .bind(supply_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(stock.unwrap_or(Decimal::ZERO))
    }

    pub async fn list_movements(
        &self,
        supply_id: Option<Uuid>,
        movement_type: Option<MovementType>,
        page: Page,
    ) -> Result<Vec<InventoryMovement>, ApiError> {
        let rows = sqlx::query_as::<_, InventoryMovement>(
            r#"
            SELECT * FROM inventory_movements
            WHERE ($1::uuid IS NULL OR supply_id = $1)
              AND ($2::text IS NULL OR movement_type = $2)
            ORDER BY moved_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(supply_id)
        .bind(movement_type.map(|t| t.to_string()))
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Append a ledger entry. An `out` that would drive stock negative is
    /// rejected; the stock check and the insert run in one transaction,
    /// with the supply row locked so concurrent stock-outs serialize.
    pub async fn insert_movement(&self, new: NewMovement) -> Result<InventoryMovement, ApiError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_as::<_, Supply>("SELECT * FROM supplies WHERE id = $1 FOR UPDATE")
            .bind(new.supply_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ApiError::NotFound("supply"))?;

        if new.movement_type == MovementType::Out {
            let stock: Option<Decimal> = sqlx::query_scalar(
                r#"
                SELECT SUM(CASE movement_type WHEN 'out' THEN -quantity ELSE quantity END)
                FROM inventory_movements
                WHERE supply_id = $1
                "#,
            )
            .bind(new.supply_id)
            .fetch_one(&mut *tx)
            .await?;

            let stock = stock.unwrap_or(Decimal::ZERO);
            if stock < new.quantity {
                tracing::warn!(
                    supply_id = %new.supply_id,
                    "rejected stock-out of {} with {} on hand",
                    new.quantity,
                    stock
                );
                return Err(ApiError::validation(format!(
                    "insufficient stock: {} on hand, {} requested",
                    stock, new.quantity
                )));
            }
        }

        let movement = sqlx::query_as::<_, InventoryMovement>(
            r#"
            INSERT INTO inventory_movements (id, supply_id, movement_type, quantity, note, moved_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.supply_id)
        .bind(new.movement_type.to_string())
        .bind(new.quantity)
        .bind(&new.note)
        .bind(new.moved_at.unwrap_or_else(Utc::now))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(movement)
    }
}
