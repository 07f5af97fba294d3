use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Farm {
    pub id: Uuid,
    pub producer_id: Uuid,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub hectares: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Plot {
    pub id: Uuid,
    pub farm_id: Uuid,
    pub name: String,
    pub hectares: f64,
    pub soil_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
