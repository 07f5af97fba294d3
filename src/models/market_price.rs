use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct MarketPrice {
    pub id: Uuid,
    pub product: String,
    pub market: String,
    pub price_per_kg: Decimal,
    pub currency: String,
    pub recorded_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}
