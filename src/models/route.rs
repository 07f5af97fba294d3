use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transport path between two collection centers.
#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct LogisticsRoute {
    pub id: Uuid,
    pub name: String,
    pub origin_center_id: Uuid,
    pub destination_center_id: Uuid,
    pub distance_km: f64,
    pub travel_minutes: i32,
    pub cost_per_ton: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
